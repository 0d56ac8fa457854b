// ── Gateway facade ──
//
// Entry point for consumers. Refreshes pull a backend snapshot, translate
// it and publish it through the `TopologyStore`; L2VPN operations consult
// the published registry and call the backend. Every backend operation is
// bounded by the configured timeout and nothing is retried.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::backend::{Backend, OessBackend};
use crate::circuit;
use crate::config::GatewayConfig;
use crate::error::CoreError;
use crate::model::{CircuitId, InterfaceId, L2vpnService, Port, Topology};
use crate::registry::{IdentifierRegistry, RegisteredInterface};
use crate::requests::{CreateL2vpn, DeleteL2vpnMatch};
use crate::store::{CommitOutcome, TopologySnapshot, TopologyStore};
use crate::translate::TopologyTranslator;
use crate::version::{FileVersionStore, VersionStore, Versioner};

/// Cheaply cloneable handle; clones share the cache and the backend.
pub struct Gateway<B> {
    inner: Arc<GatewayInner<B>>,
}

impl<B> Clone for Gateway<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct GatewayInner<B> {
    config: GatewayConfig,
    backend: B,
    store: TopologyStore,
}

impl Gateway<OessBackend> {
    /// Gateway over the configured OESS instance with a file-backed
    /// version counter.
    pub fn connect(config: GatewayConfig) -> Result<Self, CoreError> {
        let backend = OessBackend::from_config(&config.backend, config.timeout)?;
        let versions = FileVersionStore::new(config.version_file.clone());
        Ok(Self::new(config, backend, Box::new(versions)))
    }
}

impl<B: Backend> Gateway<B> {
    pub fn new(config: GatewayConfig, backend: B, versions: Box<dyn VersionStore>) -> Self {
        Self {
            inner: Arc::new(GatewayInner {
                store: TopologyStore::new(Versioner::open(versions)),
                config,
                backend,
            }),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &TopologyStore {
        &self.inner.store
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    async fn bounded<T: Send>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, CoreError>> + Send,
    ) -> Result<T, CoreError> {
        let timeout = self.inner.config.timeout;
        tokio::time::timeout(timeout, call).await.unwrap_or_else(|_| {
            warn!(operation, timeout_secs = timeout.as_secs(), "backend call timed out");
            Err(CoreError::Timeout {
                timeout_secs: timeout.as_secs(),
            })
        })
    }

    fn published(&self) -> Option<Arc<TopologySnapshot>> {
        self.inner.store.snapshot()
    }

    /// Run `f` against the published registry, or an empty one before the
    /// first successful refresh.
    fn with_registry<T>(&self, f: impl FnOnce(&IdentifierRegistry) -> T) -> T {
        match self.published() {
            Some(snapshot) => f(&snapshot.registry),
            None => f(&IdentifierRegistry::new()),
        }
    }

    // ── Topology ─────────────────────────────────────────────────────

    /// Pull, translate and publish a new topology, reporting what changed.
    ///
    /// Any failure leaves the previously published snapshot in place.
    pub async fn refresh(&self) -> Result<CommitOutcome, CoreError> {
        let native = self
            .bounded("fetch_topology", self.inner.backend.fetch_topology())
            .await?;
        let now = Utc::now();
        let translation = TopologyTranslator::from_config(&self.inner.config).translate(&native, now)?;
        let outcome = self.inner.store.commit(translation, now).await?;
        info!(
            version = outcome.snapshot.topology.version,
            administrative_changed = outcome.diff.administrative_changed,
            operational_changed = outcome.diff.operational_changed,
            cold_start = outcome.cold_start,
            "topology refreshed"
        );
        Ok(outcome)
    }

    pub async fn refresh_topology(&self) -> Result<Arc<TopologySnapshot>, CoreError> {
        Ok(self.refresh().await?.snapshot)
    }

    /// Refresh, then return the published document.
    pub async fn topology(&self) -> Result<Topology, CoreError> {
        Ok(self.refresh_topology().await?.topology.clone())
    }

    /// The last published document without touching the backend.
    pub fn cached_topology(&self) -> Option<Topology> {
        self.published().map(|s| s.topology.clone())
    }

    // ── L2VPN services ───────────────────────────────────────────────

    /// Gateway-created circuits keyed by service id. Circuits that cannot
    /// be translated are skipped.
    pub async fn list_l2vpns(&self) -> Result<BTreeMap<CircuitId, L2vpnService>, CoreError> {
        let circuits = self
            .bounded("list_circuits", self.inner.backend.list_circuits())
            .await?;
        Ok(self.with_registry(|registry| {
            circuits
                .iter()
                .filter(|c| circuit::is_sdx_circuit(c))
                .filter_map(|c| match circuit::to_l2vpn(c, registry) {
                    Ok(svc) => Some((svc.service_id, svc)),
                    Err(e) => {
                        warn!(circuit = c.id, error = %e, "skipping circuit");
                        None
                    }
                })
                .collect()
        }))
    }

    pub async fn get_l2vpn(&self, id: CircuitId) -> Result<L2vpnService, CoreError> {
        let circuits = self
            .bounded("get_circuit", self.inner.backend.get_circuit(id))
            .await?;
        let [found] = circuits.as_slice() else {
            debug!(circuit = id, results = circuits.len(), "expected exactly one circuit");
            return Err(CoreError::NotFound {
                entity: "L2VPN service".into(),
                identifier: id.to_string(),
            });
        };
        self.with_registry(|registry| circuit::to_l2vpn(found, registry))
    }

    /// Provision a new circuit and return its service id.
    ///
    /// Port ids are resolved before any backend call; an unknown port is a
    /// validation error.
    pub async fn create_l2vpn(&self, request: &CreateL2vpn) -> Result<CircuitId, CoreError> {
        let call = self.with_registry(|registry| circuit::provision_request(request, registry))?;
        let id = self
            .bounded("provision_circuit", self.inner.backend.provision_circuit(&call))
            .await?;
        info!(circuit = id, name = %request.name, "L2VPN created");
        Ok(id)
    }

    pub async fn delete_l2vpn(&self, id: CircuitId) -> Result<(), CoreError> {
        self.bounded("remove_circuit", self.inner.backend.remove_circuit(id))
            .await?;
        info!(circuit = id, "L2VPN deleted");
        Ok(())
    }

    /// Delete the first circuit matching name, endpoints and tags.
    pub async fn delete_l2vpn_matching(
        &self,
        criteria: &DeleteL2vpnMatch,
    ) -> Result<CircuitId, CoreError> {
        let circuits = self
            .bounded("list_circuits", self.inner.backend.list_circuits())
            .await?;
        let id = self
            .with_registry(|registry| circuit::find_circuit_by_attributes(&circuits, criteria, registry))
            .ok_or_else(|| CoreError::NotFound {
                entity: "L2VPN service".into(),
                identifier: criteria.name.clone(),
            })?;
        self.delete_l2vpn(id).await?;
        Ok(id)
    }

    // ── Registry views ───────────────────────────────────────────────

    /// Backend interface id to canonical port.
    pub fn oess_to_sdx(&self) -> BTreeMap<InterfaceId, Port> {
        self.with_registry(IdentifierRegistry::forward_view)
    }

    /// Canonical port id to backend interface.
    pub fn sdx_to_oess(&self) -> BTreeMap<String, RegisteredInterface> {
        self.with_registry(IdentifierRegistry::reverse_view)
    }
}
