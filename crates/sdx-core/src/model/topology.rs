// ── Canonical SDX topology document ──
//
// Field names and nesting are the SDX topology contract; do not rename.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::{AdminState, LinkType, OperStatus, SpeedClass};

/// The only service type the gateway offers.
pub const L2VPN_PTP: &str = "l2vpn-ptp";

/// Inclusive VLAN ranges, serialized as `[[low, high], ...]`.
pub type VlanRange = Vec<(u16, u16)>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanService {
    pub vlan_range: VlanRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub id: String,
    pub name: String,
    /// URN of the owning node.
    pub node: String,
    #[serde(rename = "type")]
    pub speed: SpeedClass,
    pub status: OperStatus,
    pub state: AdminState,
    pub mtu: u64,
    /// Empty, a link URN (trunks) or a configured peer port URN.
    pub nni: String,
    pub services: BTreeMap<String, VlanService>,
    pub private: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub private: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub id: String,
    pub location: Location,
    pub ports: Vec<Port>,
    pub status: OperStatus,
    pub state: AdminState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Canonical, order-independent label.
    pub name: String,
    pub id: String,
    /// Both port URNs, sorted.
    pub ports: Vec<String>,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    /// Gbps.
    pub bandwidth: f64,
    #[serde(serialize_with = "metric::serialize")]
    pub residual_bandwidth: f64,
    #[serde(serialize_with = "metric::serialize")]
    pub latency: f64,
    #[serde(serialize_with = "metric::serialize")]
    pub packet_loss: f64,
    #[serde(serialize_with = "metric::serialize")]
    pub availability: f64,
    pub status: OperStatus,
    pub state: AdminState,
    pub private: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub name: String,
    pub id: String,
    pub model_version: String,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub services: Vec<String>,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub version: u64,
}

impl Topology {
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.nodes.iter().flat_map(|n| n.ports.iter())
    }
}

/// `YYYY-MM-DDTHH:MM:SSZ`, second precision.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.format(FORMAT).to_string()
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

/// Unmeasured link metrics go out as integers when they are whole numbers
/// (`100`, not `100.0`); anything fractional stays a float.
mod metric {
    use serde::Serializer;

    // Largest magnitude below which every f64 integer is exact.
    const EXACT: f64 = 9_007_199_254_740_992.0;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < EXACT {
            #[allow(clippy::as_conversions, clippy::cast_possible_truncation)]
            return s.serialize_i64(*value as i64);
        }
        s.serialize_f64(*value)
    }
}
