#![allow(clippy::unwrap_used)]
// End-to-end gateway tests against an in-memory backend.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;

use sdx_core::model::{
    BackendCircuit, BackendInterface, BackendLink, BackendNode, CircuitEndpoint, CircuitId,
    InterfaceRole, NativeTopology, ProvisionRequest, Signals,
};
use sdx_core::{
    AdminState, BackendConfig, CircuitSource, CoreError, CreateL2vpnRequest, DeleteL2vpnPtpRequest,
    Gateway, GatewayConfig, MemoryVersionStore, OperStatus, SpeedClass, TlsVerification,
    TopologySource,
};

// ── Fake backend ────────────────────────────────────────────────────

#[derive(Default)]
struct FakeBackend {
    topology: Mutex<NativeTopology>,
    circuits: Mutex<Vec<BackendCircuit>>,
    provisioned: Mutex<Vec<ProvisionRequest>>,
    removed: Mutex<Vec<CircuitId>>,
    unreachable: AtomicBool,
    stall: AtomicBool,
    calls: AtomicUsize,
}

impl FakeBackend {
    async fn enter(&self) -> Result<(), CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.stall.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(CoreError::Upstream {
                message: "503 Service Unavailable".into(),
                status: Some(503),
            });
        }
        Ok(())
    }
}

impl TopologySource for FakeBackend {
    async fn fetch_topology(&self) -> Result<NativeTopology, CoreError> {
        self.enter().await?;
        Ok(self.topology.lock().unwrap().clone())
    }
}

impl CircuitSource for FakeBackend {
    async fn list_circuits(&self) -> Result<Vec<BackendCircuit>, CoreError> {
        self.enter().await?;
        Ok(self.circuits.lock().unwrap().clone())
    }

    async fn get_circuit(&self, id: CircuitId) -> Result<Vec<BackendCircuit>, CoreError> {
        self.enter().await?;
        Ok(self
            .circuits
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.id == id)
            .cloned()
            .collect())
    }

    async fn provision_circuit(&self, request: &ProvisionRequest) -> Result<CircuitId, CoreError> {
        self.enter().await?;
        self.provisioned.lock().unwrap().push(request.clone());
        Ok(4242)
    }

    async fn remove_circuit(&self, id: CircuitId) -> Result<(), CoreError> {
        self.enter().await?;
        self.removed.lock().unwrap().push(id);
        Ok(())
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

const PORT_A: &str = "urn:sdx:port:ampath.net:mia-sw1:et-0/0/1";
const PORT_Z: &str = "urn:sdx:port:ampath.net:jax-sw1:et-0/0/2";

fn config() -> GatewayConfig {
    let backend = BackendConfig {
        url: "https://oess.example.net/oess".parse().unwrap(),
        workgroup_id: 11,
        username: "sdx".into(),
        password: SecretString::from("hunter2".to_string()),
        tls: TlsVerification::DangerAcceptInvalid,
    };
    let mut config = GatewayConfig::new("AmLight-OXP", "ampath.net", backend);
    config.timeout = Duration::from_secs(5);
    config
}

fn up() -> Signals {
    Signals {
        status: Some("up".into()),
        admin_state: Some("active".into()),
        ..Signals::default()
    }
}

fn native() -> NativeTopology {
    let iface = |id, node_id, name: &str, mbps| BackendInterface {
        id,
        name: name.into(),
        node_id,
        bandwidth_mbps: mbps,
        mtu: Some(9000),
        role: Some(InterfaceRole::Access),
        vlan_tag_range: Some("2-4000".into()),
        signals: up(),
    };
    NativeTopology {
        nodes: vec![
            BackendNode {
                id: 1,
                name: "mia-sw1".into(),
                latitude: 25.75,
                longitude: -80.37,
                signals: up(),
            },
            BackendNode {
                id: 2,
                name: "jax-sw1".into(),
                latitude: 30.33,
                longitude: -81.65,
                signals: up(),
            },
        ],
        interfaces: vec![
            iface(10, 1, "et-0/0/1", 10_000),
            iface(20, 2, "et-0/0/2", 1_000),
        ],
        links: vec![BackendLink {
            id: 100,
            interface_a: 10,
            interface_z: 20,
            signals: up(),
        }],
    }
}

fn circuit(id: CircuitId, description: &str, ends: [(u64, i64); 2]) -> BackendCircuit {
    BackendCircuit {
        id,
        description: description.into(),
        state: "active".into(),
        created_on: Some("06/01/2024 12:00:00".into()),
        last_modified_on: Some("06/01/2024 12:00:00".into()),
        endpoints: ends
            .iter()
            .map(|&(interface_id, tag)| CircuitEndpoint { interface_id, tag })
            .collect(),
    }
}

fn gateway(backend: FakeBackend, stored_version: Option<u64>) -> Gateway<FakeBackend> {
    *backend.topology.lock().unwrap() = native();
    let store = match stored_version {
        Some(v) => MemoryVersionStore::with_version(v),
        None => MemoryVersionStore::new(),
    };
    Gateway::new(config(), backend, Box::new(store))
}

// ── Topology refresh ────────────────────────────────────────────────

#[tokio::test]
async fn cold_start_publishes_stored_version() {
    let gw = gateway(FakeBackend::default(), Some(9));
    let topo = gw.topology().await.unwrap();

    assert_eq!(topo.version, 9);
    assert_eq!(topo.id, "urn:sdx:topology:ampath.net");
    assert_eq!(topo.nodes.len(), 2);
    assert_eq!(topo.nodes[0].ports[0].id, PORT_A);
    assert_eq!(topo.nodes[0].ports[0].speed, SpeedClass::Ge10);
    assert_eq!(topo.nodes[1].ports[0].speed, SpeedClass::Ge1);
    assert_eq!(topo.nodes[0].ports[0].services["l2vpn-ptp"].vlan_range, vec![(2, 4000)]);
    assert!((topo.links[0].bandwidth - 10.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn unchanged_refresh_keeps_version_and_timestamp() {
    let gw = gateway(FakeBackend::default(), None);
    let first = gw.topology().await.unwrap();
    let second = gw.topology().await.unwrap();
    assert_eq!(first.version, 1);
    assert_eq!(second.version, first.version);
    assert_eq!(second.timestamp, first.timestamp);
}

#[tokio::test]
async fn administrative_change_bumps_version_once() {
    let backend = FakeBackend::default();
    let gw = gateway(backend, Some(3));
    gw.topology().await.unwrap();

    set_topology(&gw, |t| t.interfaces[0].mtu = Some(1500));
    let bumped = gw.topology().await.unwrap();
    assert_eq!(bumped.version, 4);

    let steady = gw.topology().await.unwrap();
    assert_eq!(steady.version, 4);
}

#[tokio::test]
async fn operational_change_only_touches_timestamp() {
    let gw = gateway(FakeBackend::default(), None);
    let first = gw.topology().await.unwrap();

    set_topology(&gw, |t| {
        t.links[0].signals.status = Some("down".into());
    });
    let second = gw.topology().await.unwrap();
    assert_eq!(second.version, first.version);
    assert_eq!(second.links[0].status, OperStatus::Down);
    // Link state comes from admin flags, not from status.
    assert_eq!(second.links[0].state, AdminState::Enabled);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot() {
    let gw = gateway(FakeBackend::default(), None);
    let before = gw.topology().await.unwrap();

    gw_backend(&gw).unreachable.store(true, Ordering::SeqCst);
    let err = gw.refresh_topology().await.unwrap_err();
    assert!(err.is_upstream());
    assert_eq!(gw.cached_topology().unwrap(), before);
}

#[tokio::test]
async fn dangling_reference_fails_refresh_and_keeps_cache() {
    let gw = gateway(FakeBackend::default(), None);
    let before = gw.topology().await.unwrap();

    set_topology(&gw, |t| t.links[0].interface_z = 999);
    let err = gw.refresh_topology().await.unwrap_err();
    assert!(matches!(err, CoreError::MalformedData { .. }), "{err}");
    assert_eq!(gw.cached_topology().unwrap(), before);
    assert_eq!(gw.sdx_to_oess().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn stalled_backend_times_out() {
    let gw = gateway(FakeBackend::default(), None);
    gw_backend(&gw).stall.store(true, Ordering::SeqCst);
    let err = gw.refresh_topology().await.unwrap_err();
    assert!(matches!(err, CoreError::Timeout { timeout_secs: 5 }), "{err}");
    assert!(gw.cached_topology().is_none());
}

// ── L2VPN ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_resolves_ports_through_registry() {
    let gw = gateway(FakeBackend::default(), None);
    gw.refresh_topology().await.unwrap();

    let body = format!(
        r#"{{"name": "vlan-100", "endpoints": [
            {{"port_id": "{PORT_A}", "vlan": 100}},
            {{"port_id": "{PORT_Z}", "vlan": 101}}
        ]}}"#
    );
    let request = CreateL2vpnRequest::from_json(&body).unwrap();
    assert_eq!(gw.create_l2vpn(&request).await.unwrap(), 4242);

    let provisioned = gw_backend(&gw).provisioned.lock().unwrap().clone();
    assert_eq!(provisioned.len(), 1);
    assert_eq!(provisioned[0].description, "OESS-SDX-L2VPN--vlan-100");
    assert_eq!(provisioned[0].endpoints[1].node, "jax-sw1");
    assert_eq!(provisioned[0].endpoints[1].interface, "et-0/0/2");
    assert_eq!(provisioned[0].endpoints[1].tag, 101);
}

#[tokio::test]
async fn create_with_unknown_port_never_reaches_backend() {
    let gw = gateway(FakeBackend::default(), None);
    gw.refresh_topology().await.unwrap();
    let calls_before = gw_backend(&gw).calls.load(Ordering::SeqCst);

    let body = format!(
        r#"{{"name": "x", "endpoints": [
            {{"port_id": "{PORT_A}", "vlan": 100}},
            {{"port_id": "urn:sdx:port:ampath.net:nope:et-9", "vlan": 101}}
        ]}}"#
    );
    let request = CreateL2vpnRequest::from_json(&body).unwrap();
    let err = gw.create_l2vpn(&request).await.unwrap_err();
    assert!(err.is_client_error());
    assert_eq!(gw_backend(&gw).calls.load(Ordering::SeqCst), calls_before);
}

#[tokio::test]
async fn list_filters_foreign_circuits() {
    let backend = FakeBackend::default();
    *backend.circuits.lock().unwrap() = vec![
        circuit(1, "OESS-SDX-L2VPN--alpha", [(10, 100), (20, 100)]),
        circuit(2, "hand-made circuit", [(10, 200), (20, 200)]),
        circuit(3, "OESS-SDX-L2VPN--beta", [(10, 300), (77, 300)]),
    ];
    let gw = gateway(backend, None);
    gw.refresh_topology().await.unwrap();

    let all = gw.list_l2vpns().await.unwrap();
    assert_eq!(all.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(all[&1].name, "alpha");
    assert_eq!(all[&1].endpoints[1].port_id, PORT_Z);
    assert_eq!(all[&3].endpoints[1].port_id, "unknown");
}

#[tokio::test]
async fn get_requires_exactly_one_result() {
    let backend = FakeBackend::default();
    *backend.circuits.lock().unwrap() = vec![circuit(
        8,
        "OESS-SDX-L2VPN--solo",
        [(10, 5), (20, 6)],
    )];
    let gw = gateway(backend, None);
    gw.refresh_topology().await.unwrap();

    assert_eq!(gw.get_l2vpn(8).await.unwrap().name, "solo");
    let err = gw.get_l2vpn(9).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[tokio::test]
async fn legacy_delete_removes_only_first_of_identical_circuits() {
    // Two circuits identical in every compared attribute: the first one in
    // backend enumeration order is removed and the other is left alone.
    let backend = FakeBackend::default();
    *backend.circuits.lock().unwrap() = vec![
        circuit(31, "OESS-SDX-L2VPN--twin", [(10, 100), (20, 200)]),
        circuit(17, "OESS-SDX-L2VPN--twin", [(10, 100), (20, 200)]),
    ];
    let gw = gateway(backend, None);
    gw.refresh_topology().await.unwrap();

    let body = format!(
        r#"{{"name": "twin",
            "uni_a": {{"interface_id": "{PORT_A}", "tag": {{"value": 100, "tag_type": 1}}}},
            "uni_z": {{"interface_id": "{PORT_Z}", "tag": {{"value": 200, "tag_type": 1}}}}}}"#
    );
    let criteria = DeleteL2vpnPtpRequest::from_json(&body).unwrap();
    assert_eq!(gw.delete_l2vpn_matching(&criteria).await.unwrap(), 31);
    assert_eq!(*gw_backend(&gw).removed.lock().unwrap(), vec![31]);
}

#[tokio::test]
async fn legacy_delete_without_match_is_not_found() {
    let gw = gateway(FakeBackend::default(), None);
    gw.refresh_topology().await.unwrap();
    let criteria = DeleteL2vpnPtpRequest::from_json(r#"{"name": "ghost"}"#).unwrap();
    let err = gw.delete_l2vpn_matching(&criteria).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
    assert!(gw_backend(&gw).removed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn registry_views_are_consistent() {
    let gw = gateway(FakeBackend::default(), None);
    gw.refresh_topology().await.unwrap();

    let forward = gw.oess_to_sdx();
    let reverse = gw.sdx_to_oess();
    assert_eq!(forward[&10].id, PORT_A);
    assert_eq!(reverse[PORT_Z].interface.id, 20);
    assert_eq!(reverse[PORT_Z].node_name, "jax-sw1");
    for (port_id, iface) in &reverse {
        assert_eq!(&forward[&iface.interface.id].id, port_id);
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn gw_backend(gw: &Gateway<FakeBackend>) -> &FakeBackend {
    gw.backend()
}

fn set_topology(gw: &Gateway<FakeBackend>, edit: impl FnOnce(&mut NativeTopology)) {
    edit(&mut gw_backend(gw).topology.lock().unwrap());
}
