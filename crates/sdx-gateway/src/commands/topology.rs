//! Topology command handler.

use sdx_core::{Backend, Gateway};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub async fn handle<B: Backend>(gateway: &Gateway<B>, global: &GlobalOpts) -> Result<(), CliError> {
    let topology = gateway.topology().await?;
    super::emit(&topology, global)
}
