// ── Backend collaborators ──
//
// The gateway talks to OESS only through these two traits, so tests can
// substitute an in-memory backend. `OessBackend` is the real thing.

use std::future::Future;

use oess_api::{BasicAuth, OessClient, TlsMode, TransportConfig};
use tracing::debug;

use crate::config::{BackendConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{BackendCircuit, CircuitId, NativeTopology, ProvisionRequest};

/// Supplies one backend topology snapshot per call.
pub trait TopologySource: Send + Sync {
    fn fetch_topology(&self) -> impl Future<Output = Result<NativeTopology, CoreError>> + Send;
}

/// Workgroup-scoped circuit operations.
pub trait CircuitSource: Send + Sync {
    fn list_circuits(&self) -> impl Future<Output = Result<Vec<BackendCircuit>, CoreError>> + Send;

    /// Every circuit the backend returns for `id`; callers decide what
    /// anything other than exactly one means.
    fn get_circuit(
        &self,
        id: CircuitId,
    ) -> impl Future<Output = Result<Vec<BackendCircuit>, CoreError>> + Send;

    fn provision_circuit(
        &self,
        request: &ProvisionRequest,
    ) -> impl Future<Output = Result<CircuitId, CoreError>> + Send;

    fn remove_circuit(&self, id: CircuitId) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Both halves of the backend contract.
pub trait Backend: TopologySource + CircuitSource {}

impl<T: TopologySource + CircuitSource> Backend for T {}

// ── OESS implementation ──────────────────────────────────────────────

pub struct OessBackend {
    client: OessClient,
}

impl OessBackend {
    pub fn new(client: OessClient) -> Self {
        Self { client }
    }

    /// Build the HTTP client for `config`. `timeout` bounds each request.
    pub fn from_config(
        config: &BackendConfig,
        timeout: std::time::Duration,
    ) -> Result<Self, CoreError> {
        let tls = match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        let transport = TransportConfig {
            tls,
            timeout,
            auth: Some(BasicAuth {
                username: config.username.clone(),
                password: config.password.clone(),
            }),
        };
        let client = OessClient::new(config.url.clone(), config.workgroup_id, &transport)?;
        Ok(Self::new(client))
    }
}

impl TopologySource for OessBackend {
    async fn fetch_topology(&self) -> Result<NativeTopology, CoreError> {
        let nodes = self.client.list_nodes().await?;
        let links = self.client.list_links().await?;
        let interfaces = self.client.list_workgroup_interfaces().await?;
        debug!(
            nodes = nodes.len(),
            interfaces = interfaces.len(),
            links = links.len(),
            "fetched OESS topology"
        );
        Ok(NativeTopology {
            nodes: nodes.into_iter().map(Into::into).collect(),
            interfaces: interfaces.into_iter().map(Into::into).collect(),
            links: links.into_iter().map(Into::into).collect(),
        })
    }
}

impl CircuitSource for OessBackend {
    async fn list_circuits(&self) -> Result<Vec<BackendCircuit>, CoreError> {
        let circuits = self.client.list_circuits().await?;
        Ok(circuits.into_iter().map(Into::into).collect())
    }

    async fn get_circuit(&self, id: CircuitId) -> Result<Vec<BackendCircuit>, CoreError> {
        let circuits = self.client.get_circuit(id).await?;
        Ok(circuits.into_iter().map(Into::into).collect())
    }

    async fn provision_circuit(&self, request: &ProvisionRequest) -> Result<CircuitId, CoreError> {
        let call = oess_api::ProvisionCircuit::from(request);
        Ok(self.client.provision_circuit(&call).await?)
    }

    async fn remove_circuit(&self, id: CircuitId) -> Result<(), CoreError> {
        Ok(self.client.remove_circuit(id).await?)
    }
}
