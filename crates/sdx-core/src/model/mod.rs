// ── Domain model ──
//
// `native` mirrors the OESS backend; `topology` and `l2vpn` are the
// canonical SDX documents the gateway publishes.

pub mod l2vpn;
pub mod native;
pub mod status;
pub mod topology;

pub use l2vpn::{L2vpnEndpoint, L2vpnService};
pub use native::{
    BackendCircuit, BackendInterface, BackendLink, BackendNode, CircuitEndpoint, CircuitId,
    InterfaceId, InterfaceRole, LinkId, NativeTopology, NodeId, ProvisionEndpoint,
    ProvisionRequest, Signals,
};
pub use status::{AdminState, LinkType, OperStatus, SpeedClass};
pub use topology::{L2VPN_PTP, Link, Location, Node, Port, Topology, VlanRange, VlanService};
