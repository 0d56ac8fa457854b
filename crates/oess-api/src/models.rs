// OESS response and request types
//
// Reads are wrapped in the `OessResponse<T>` envelope. Numeric columns go
// through the lenient deserializers in `crate::de` because OESS mixes
// string and number encodings. Fields use `#[serde(default)]` wherever the
// backend omits them for some entity kinds.

use serde::{Deserialize, Serialize};

use crate::de;

// ── Response Envelope ────────────────────────────────────────────────

/// Standard OESS read envelope.
///
/// ```json
/// { "results": [...], "error_text": "optional" }
/// ```
#[derive(Debug, Deserialize)]
pub struct OessResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub error_text: Option<String>,
}

/// Answer to a `provision` call.
#[derive(Debug, Deserialize)]
pub struct ProvisionResponse {
    #[serde(default, deserialize_with = "de::opt_u64_lenient")]
    pub circuit_id: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub error_text: Option<String>,
}

// ── Shared status columns ────────────────────────────────────────────

/// Operational and administrative status columns.
///
/// Nodes, interfaces and links each carry a different subset of these;
/// missing columns stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFields {
    #[serde(default, deserialize_with = "de::opt_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub operational_state: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub operational_state_mpls: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub in_maint: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub link_state: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub admin_state: Option<String>,
}

// ── Topology ─────────────────────────────────────────────────────────

/// Node from `data.cgi?method=get_all_node_status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OessNode {
    #[serde(deserialize_with = "de::u64_lenient")]
    pub node_id: u64,
    pub name: String,
    #[serde(deserialize_with = "de::f64_lenient")]
    pub latitude: f64,
    #[serde(deserialize_with = "de::f64_lenient")]
    pub longitude: f64,
    #[serde(flatten)]
    pub state: StateFields,
}

/// Interface from `interface.cgi?method=get_workgroup_interfaces`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OessInterface {
    #[serde(deserialize_with = "de::u64_lenient")]
    pub interface_id: u64,
    pub name: String,
    #[serde(deserialize_with = "de::u64_lenient")]
    pub node_id: u64,
    /// Port speed in Mbps.
    #[serde(deserialize_with = "de::u64_lenient")]
    pub bandwidth: u64,
    #[serde(default, deserialize_with = "de::opt_u64_lenient")]
    pub mtu: Option<u64>,
    /// `"access"` or `"trunk"`; absent on some OESS versions. The outer
    /// `Option` records whether the key was sent at all, even as `null`.
    #[serde(
        default,
        deserialize_with = "de::present_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub int_role: Option<Option<String>>,
    /// Allowed VLAN range as `"<low>-<high>"`.
    #[serde(default, deserialize_with = "de::opt_text")]
    pub mpls_vlan_tag_range: Option<String>,
    #[serde(flatten)]
    pub state: StateFields,
}

/// Link from `data.cgi?method=get_all_link_status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OessLink {
    #[serde(deserialize_with = "de::u64_lenient")]
    pub link_id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(deserialize_with = "de::u64_lenient")]
    pub interface_a_id: u64,
    #[serde(deserialize_with = "de::u64_lenient")]
    pub interface_z_id: u64,
    #[serde(flatten)]
    pub state: StateFields,
}

// ── Circuits ─────────────────────────────────────────────────────────

/// Circuit from `circuit.cgi?method=get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OessCircuit {
    #[serde(deserialize_with = "de::u64_lenient")]
    pub circuit_id: u64,
    #[serde(default)]
    pub description: String,
    /// Lifecycle state: `"active"`, `"scheduled"`, `"decom"`, ...
    #[serde(default)]
    pub state: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub created_on: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub last_modified_on: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<OessEndpoint>,
}

/// One side of a circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OessEndpoint {
    #[serde(deserialize_with = "de::u64_lenient")]
    pub interface_id: u64,
    #[serde(deserialize_with = "de::i64_lenient")]
    pub tag: i64,
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub interface: Option<String>,
}

// ── Provisioning ─────────────────────────────────────────────────────

/// Parameters of a `circuit.cgi` `provision` call (workgroup added by the client).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionCircuit {
    pub description: String,
    /// Epoch seconds, or `-1` for "now".
    pub provision_time: i64,
    /// Epoch seconds, or `-1` for "never".
    pub remove_time: i64,
    /// Existing circuit to edit, or `-1` to create a new one.
    pub circuit_id: i64,
    pub endpoints: Vec<ProvisionEndpoint>,
}

/// Endpoint entry, sent as a JSON string in a repeated `endpoint` form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionEndpoint {
    pub tag: i64,
    pub interface: String,
    pub node: String,
    pub bandwidth: u64,
}
