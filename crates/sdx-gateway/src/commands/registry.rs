//! Registry view handlers.

use sdx_core::{Backend, Gateway};

use crate::cli::{GlobalOpts, RegistryArgs, RegistryCommand};
use crate::error::CliError;

pub async fn handle<B: Backend>(
    gateway: &Gateway<B>,
    args: RegistryArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    gateway.refresh_topology().await?;
    match args.command {
        RegistryCommand::OessToSdx => super::emit(&gateway.oess_to_sdx(), global),
        RegistryCommand::SdxToOess => super::emit(&gateway.sdx_to_oess(), global),
    }
}
