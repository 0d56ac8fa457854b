//! L2VPN command handlers.

use serde_json::json;

use sdx_core::{
    Backend, CoreError, CreateL2vpn, CreateL2vpnPtpRequest, CreateL2vpnRequest,
    DeleteL2vpnPtpRequest, Gateway,
};

use crate::cli::{GlobalOpts, L2vpnArgs, L2vpnCommand};
use crate::error::CliError;

/// Pick the request dialect by its shape: point-to-point bodies carry `uni_a`.
fn parse_create(body: &str) -> Result<CreateL2vpn, CoreError> {
    let is_ptp = serde_json::from_str::<serde_json::Value>(body)
        .is_ok_and(|v| v.get("uni_a").is_some());
    if is_ptp {
        CreateL2vpnPtpRequest::from_json(body)
    } else {
        CreateL2vpnRequest::from_json(body)
    }
}

pub async fn handle<B: Backend>(
    gateway: &Gateway<B>,
    args: L2vpnArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        L2vpnCommand::List => {
            gateway.refresh_topology().await?;
            let services = gateway.list_l2vpns().await?;
            super::emit(&services, global)
        }

        L2vpnCommand::Get { id } => {
            gateway.refresh_topology().await?;
            let service = gateway.get_l2vpn(id).await?;
            super::emit(&service, global)
        }

        L2vpnCommand::Create { from_file } => {
            // Validate before touching OESS.
            let request = parse_create(&super::read_request(from_file.as_deref())?)?;
            gateway.refresh_topology().await?;
            let id = gateway.create_l2vpn(&request).await?;
            super::emit(&json!({ "service_id": id }), global)
        }

        L2vpnCommand::Delete { id } => {
            gateway.delete_l2vpn(id).await?;
            super::emit(&json!({ "service_id": id }), global)
        }

        L2vpnCommand::DeleteMatching { from_file } => {
            let criteria = DeleteL2vpnPtpRequest::from_json(&super::read_request(from_file.as_deref())?)?;
            gateway.refresh_topology().await?;
            let id = gateway.delete_l2vpn_matching(&criteria).await?;
            super::emit(&json!({ "service_id": id }), global)
        }
    }
}
