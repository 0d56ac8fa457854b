//! Translation core between the OESS circuit-provisioning backend and the
//! SDX topology / L2VPN model.
//!
//! - **[`Gateway`]**: facade over one OESS workgroup.
//!   [`refresh_topology()`](Gateway::refresh_topology) pulls a native
//!   snapshot, translates it and publishes it; the L2VPN operations
//!   resolve canonical port ids through the published registry.
//!
//! - **Translation**: [`urn`] builds identifiers, [`resolve`] derives
//!   status, state and overridable attributes, [`translate`] assembles the
//!   canonical [`Topology`] together with its [`IdentifierRegistry`].
//!
//! - **Change detection**: [`diff`] classifies administrative versus
//!   operational changes; [`version`] stamps documents and persists the
//!   version counter through a [`VersionStore`].
//!
//! - **Circuits**: [`circuit`] maps OESS circuits to [`L2vpnService`]
//!   records and validated [`requests`] back to provisioning calls.
//!
//! - **Backend seam**: [`TopologySource`] / [`CircuitSource`], with
//!   [`OessBackend`] as the `oess-api` implementation.

pub mod backend;
pub mod circuit;
pub mod config;
pub mod convert;
pub mod diff;
pub mod error;
pub mod gateway;
pub mod model;
pub mod registry;
pub mod requests;
pub mod resolve;
pub mod store;
pub mod translate;
pub mod urn;
pub mod version;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::{Backend, CircuitSource, OessBackend, TopologySource};
pub use config::{
    BackendConfig, GatewayConfig, InterfaceOverride, LinkOverride, StaticOverrides,
    TlsVerification,
};
pub use diff::{TopologyDiff, diff_topologies};
pub use error::CoreError;
pub use gateway::Gateway;
pub use registry::{IdentifierRegistry, RegisteredInterface, UNKNOWN_PORT};
pub use requests::{
    CreateL2vpn, CreateL2vpnPtpRequest, CreateL2vpnRequest, DeleteL2vpnMatch,
    DeleteL2vpnPtpRequest,
};
pub use store::{CommitOutcome, TopologySnapshot, TopologyStore};
pub use translate::{TopologyTranslator, Translation};
pub use urn::UrnCodec;
pub use version::{FileVersionStore, MemoryVersionStore, VersionStore, Versioner};

pub use model::{
    AdminState, BackendCircuit, BackendInterface, BackendLink, BackendNode, CircuitId,
    InterfaceId, L2vpnEndpoint, L2vpnService, Link, LinkType, Node, OperStatus, Port, SpeedClass,
    Topology,
};
