// ── Runtime gateway configuration ──
//
// These types describe the exchange identity, the OESS backend to talk
// to, and the per-entity static overrides. They never touch disk; the
// sdx-config crate builds a `GatewayConfig` and hands it in.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::{AdminState, InterfaceId, LinkId, VlanRange};

pub const DEFAULT_MODEL_VERSION: &str = "2.0.0";
pub const DEFAULT_VERSION_FILE: &str = "/tmp/oess_sdx.ver";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TLS verification strategy for the backend connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. OESS deployments commonly use self-signed certs.
    #[default]
    DangerAcceptInvalid,
}

/// Where and as whom to reach OESS.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL; service paths (`/services/data.cgi`, ...) are appended.
    pub url: Url,
    pub workgroup_id: u64,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
}

/// Operator overrides for one interface. Every field is optional and
/// independently wins over the backend-derived value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceOverride {
    pub mtu: Option<u64>,
    pub state: Option<AdminState>,
    /// Peer port as `<domain>:<node>:<port>`, without the `urn:sdx:port:` prefix.
    pub sdx_nni: Option<String>,
    pub sdx_vlan_range: Option<VlanRange>,
}

/// Operator-supplied link metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkOverride {
    pub residual_bandwidth: Option<f64>,
    pub latency: Option<f64>,
    pub packet_loss: Option<f64>,
    pub availability: Option<f64>,
}

/// Static overrides keyed by backend id. Consulted read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticOverrides {
    pub interfaces: HashMap<InterfaceId, InterfaceOverride>,
    pub links: HashMap<LinkId, LinkOverride>,
}

impl StaticOverrides {
    pub fn interface(&self, id: InterfaceId) -> Option<&InterfaceOverride> {
        self.interfaces.get(&id)
    }

    pub fn link(&self, id: LinkId) -> Option<&LinkOverride> {
        self.links.get(&id)
    }
}

/// Everything the gateway needs at runtime.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Exchange display name (`oxp_name`).
    pub oxp_name: String,
    /// Exchange domain embedded in every URN (`oxp_url`).
    pub oxp_url: String,
    pub model_version: String,
    /// Upper bound for each backend operation.
    pub timeout: Duration,
    /// File holding the durable topology version counter.
    pub version_file: PathBuf,
    pub backend: BackendConfig,
    pub overrides: StaticOverrides,
}

impl GatewayConfig {
    /// Config with defaults for everything except identity and backend.
    pub fn new(oxp_name: impl Into<String>, oxp_url: impl Into<String>, backend: BackendConfig) -> Self {
        Self {
            oxp_name: oxp_name.into(),
            oxp_url: oxp_url.into(),
            model_version: DEFAULT_MODEL_VERSION.into(),
            timeout: DEFAULT_TIMEOUT,
            version_file: PathBuf::from(DEFAULT_VERSION_FILE),
            backend,
            overrides: StaticOverrides::default(),
        }
    }
}
