//! Command dispatch: bridges CLI args -> gateway operations -> JSON output.

pub mod l2vpn;
pub mod registry;
pub mod topology;
pub mod watch;

use std::io::Read;
use std::path::Path;

use serde::Serialize;

use sdx_core::{Backend, Gateway};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Dispatch a command against a connected gateway.
pub async fn dispatch<B: Backend>(
    cmd: Command,
    gateway: &Gateway<B>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Topology => topology::handle(gateway, global).await,
        Command::Watch(args) => watch::handle(gateway, args, global).await,
        Command::L2vpn(args) => l2vpn::handle(gateway, args, global).await,
        Command::Registry(args) => registry::handle(gateway, args, global).await,
    }
}

pub(crate) fn emit<T: Serialize + ?Sized>(data: &T, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render(global.output, data)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Read a request body from `path`, or stdin when absent or "-".
pub(crate) fn read_request(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(p) if p != Path::new("-") => Ok(std::fs::read_to_string(p)?),
        _ => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            Ok(body)
        }
    }
}
