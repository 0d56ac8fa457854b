// ── Canonical L2VPN service record ──

use serde::{Deserialize, Serialize};

use super::native::CircuitId;
use super::status::{AdminState, OperStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2vpnService {
    pub service_id: CircuitId,
    pub name: String,
    pub status: OperStatus,
    pub state: AdminState,
    pub created_on: Option<String>,
    pub last_modified_on: Option<String>,
    pub endpoints: Vec<L2vpnEndpoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2vpnEndpoint {
    /// Canonical port URN, or `"unknown"` when the interface is unregistered.
    pub port_id: String,
    pub vlan: i64,
}
