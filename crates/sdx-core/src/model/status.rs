// ── Shared status vocabulary ──
//
// Enumerations that appear in both the topology and L2VPN documents.
// Serialized spellings are part of the SDX wire contract.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Operational status. `Error` means "indeterminate", not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OperStatus {
    Up,
    Down,
    Error,
}

/// Administrative state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdminState {
    Enabled,
    Disabled,
    Maintenance,
}

/// Port speed class, derived from the exact interface bandwidth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum SpeedClass {
    #[serde(rename = "400GE")]
    #[strum(serialize = "400GE")]
    Ge400,
    #[serde(rename = "100GE")]
    #[strum(serialize = "100GE")]
    Ge100,
    #[serde(rename = "50GE")]
    #[strum(serialize = "50GE")]
    Ge50,
    #[serde(rename = "40GE")]
    #[strum(serialize = "40GE")]
    Ge40,
    #[serde(rename = "25GE")]
    #[strum(serialize = "25GE")]
    Ge25,
    #[serde(rename = "10GE")]
    #[strum(serialize = "10GE")]
    Ge10,
    #[serde(rename = "1GE")]
    #[strum(serialize = "1GE")]
    Ge1,
    #[serde(rename = "100FE")]
    #[strum(serialize = "100FE")]
    Fe100,
    Other,
}

impl SpeedClass {
    /// Exact-match lookup on the bandwidth in Mbps. No interpolation.
    pub fn from_mbps(mbps: u64) -> Self {
        match mbps {
            400_000 => Self::Ge400,
            100_000 => Self::Ge100,
            50_000 => Self::Ge50,
            40_000 => Self::Ge40,
            25_000 => Self::Ge25,
            10_000 => Self::Ge10,
            1_000 => Self::Ge1,
            100 => Self::Fe100,
            _ => Self::Other,
        }
    }
}

/// Link class. Every link the gateway publishes is inside the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LinkType {
    Intra,
}
