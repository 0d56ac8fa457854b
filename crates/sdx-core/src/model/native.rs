// ── Backend-native entities ──
//
// The OESS data model as the core consumes it: stable numeric ids, raw
// status columns, and names exactly as OESS reports them. These records
// are read-only inputs; `convert` builds them from `oess_api` responses.

use serde::{Deserialize, Serialize};

pub type NodeId = u64;
pub type InterfaceId = u64;
pub type LinkId = u64;
pub type CircuitId = u64;

/// Raw status columns shared by nodes, interfaces and links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operational_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operational_state_mpls: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_maint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceRole {
    Access,
    Trunk,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendNode {
    pub id: NodeId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub signals: Signals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendInterface {
    pub id: InterfaceId,
    pub name: String,
    pub node_id: NodeId,
    pub bandwidth_mbps: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u64>,
    /// `None` when OESS omits the role column entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<InterfaceRole>,
    /// `"<low>-<high>"` as reported by OESS, unvalidated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_tag_range: Option<String>,
    #[serde(flatten)]
    pub signals: Signals,
}

/// Undirected link; which side is "A" carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendLink {
    pub id: LinkId,
    pub interface_a: InterfaceId,
    pub interface_z: InterfaceId,
    #[serde(flatten)]
    pub signals: Signals,
}

/// One refresh worth of backend topology.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NativeTopology {
    pub nodes: Vec<BackendNode>,
    /// Scoped to the authorized workgroup.
    pub interfaces: Vec<BackendInterface>,
    pub links: Vec<BackendLink>,
}

// ── Circuits ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendCircuit {
    pub id: CircuitId,
    pub description: String,
    /// Lifecycle state; only `"active"` counts as up.
    pub state: String,
    pub created_on: Option<String>,
    pub last_modified_on: Option<String>,
    pub endpoints: Vec<CircuitEndpoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitEndpoint {
    pub interface_id: InterfaceId,
    pub tag: i64,
}

/// Backend provisioning call built from a validated L2VPN request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub description: String,
    pub provision_time: i64,
    pub remove_time: i64,
    /// `-1` asks the backend to assign a new id.
    pub circuit_id: i64,
    pub endpoints: Vec<ProvisionEndpoint>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionEndpoint {
    pub node: String,
    pub interface: String,
    pub tag: i64,
    pub bandwidth: u64,
}
