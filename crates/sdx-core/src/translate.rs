// ── Topology translator ──
//
// Walks one backend snapshot and builds the canonical topology document
// plus the identifier registry that goes with it. Cross-references are
// checked up front, so a dangling id fails the whole translation and no
// partial document ever escapes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::{GatewayConfig, StaticOverrides};
use crate::error::CoreError;
use crate::model::{
    BackendInterface, BackendLink, BackendNode, InterfaceId, L2VPN_PTP, Link, LinkType, Location,
    NativeTopology, Node, NodeId, Port, SpeedClass, Topology,
};
use crate::registry::IdentifierRegistry;
use crate::resolve::{AttributeResolver, administrative_state, operational_status};
use crate::urn::{LinkSide, UrnCodec, link_label};

/// Ports longer than this are truncated in the `name` field only.
pub const MAX_PORT_NAME_LEN: usize = 30;

const PORT_PRIVATE: &[&str] = &["status"];
const LINK_PRIVATE: &[&str] = &["packet_loss"];

/// Node names are published as-is for now.
pub fn sanitize_name(name: &str) -> String {
    name.to_owned()
}

/// A freshly built document and its registry. The document is not yet
/// stamped: `version` is 0 and `timestamp` is the build time.
#[derive(Debug, Clone)]
pub struct Translation {
    pub topology: Topology,
    pub registry: IdentifierRegistry,
}

/// Cross-referenced view of a snapshot.
struct Index<'n> {
    nodes: HashMap<NodeId, &'n BackendNode>,
    /// Interfaces per node, in snapshot order.
    node_interfaces: HashMap<NodeId, Vec<&'n BackendInterface>>,
    links: Vec<(&'n BackendLink, &'n BackendInterface, &'n BackendInterface)>,
}

impl<'n> Index<'n> {
    fn build(native: &'n NativeTopology) -> Result<Self, CoreError> {
        let nodes: HashMap<_, _> = native.nodes.iter().map(|n| (n.id, n)).collect();

        let mut interfaces: HashMap<InterfaceId, &BackendInterface> = HashMap::with_capacity(native.interfaces.len());
        let mut node_interfaces: HashMap<NodeId, Vec<&BackendInterface>> = HashMap::new();
        for iface in &native.interfaces {
            if !nodes.contains_key(&iface.node_id) {
                return Err(CoreError::malformed(format!(
                    "interface {} references unknown node {}",
                    iface.id, iface.node_id
                )));
            }
            interfaces.insert(iface.id, iface);
            node_interfaces.entry(iface.node_id).or_default().push(iface);
        }

        let mut links = Vec::with_capacity(native.links.len());
        for link in &native.links {
            let side = |id: InterfaceId| {
                interfaces.get(&id).copied().ok_or_else(|| {
                    CoreError::malformed(format!(
                        "link {} references unknown interface {id}",
                        link.id
                    ))
                })
            };
            links.push((link, side(link.interface_a)?, side(link.interface_z)?));
        }

        Ok(Self {
            nodes,
            node_interfaces,
            links,
        })
    }

    fn node_name(&self, iface: &BackendInterface) -> &'n str {
        // Every indexed interface was checked against `nodes` in `build`.
        self.nodes
            .get(&iface.node_id)
            .map_or("", |n| n.name.as_str())
    }
}

pub struct TopologyTranslator<'a> {
    name: &'a str,
    model_version: &'a str,
    codec: UrnCodec,
    resolver: AttributeResolver<'a>,
}

impl<'a> TopologyTranslator<'a> {
    pub fn new(
        name: &'a str,
        domain: &str,
        model_version: &'a str,
        overrides: &'a StaticOverrides,
    ) -> Self {
        Self {
            name,
            model_version,
            codec: UrnCodec::new(domain),
            resolver: AttributeResolver::new(overrides),
        }
    }

    pub fn from_config(config: &'a GatewayConfig) -> Self {
        Self::new(
            &config.oxp_name,
            &config.oxp_url,
            &config.model_version,
            &config.overrides,
        )
    }

    pub fn translate(
        &self,
        native: &NativeTopology,
        now: DateTime<Utc>,
    ) -> Result<Translation, CoreError> {
        let index = Index::build(native)?;
        let mut registry = IdentifierRegistry::new();

        // Trunk NNI: the last link touching an interface wins.
        let mut trunk_links: HashMap<InterfaceId, String> = HashMap::new();
        let mut labels = Vec::with_capacity(index.links.len());
        for (link, a, z) in &index.links {
            let label = link_label(
                LinkSide::new(index.node_name(a), &a.name),
                LinkSide::new(index.node_name(z), &z.name),
            );
            let urn = self.codec.link_urn(&label);
            trunk_links.insert(link.interface_a, urn.clone());
            trunk_links.insert(link.interface_z, urn);
            labels.push(label);
        }

        let mut nodes = Vec::with_capacity(native.nodes.len());
        for node in &native.nodes {
            let node_name = sanitize_name(&node.name);
            let node_urn = self.codec.node_urn(&node_name);
            let ports = index
                .node_interfaces
                .get(&node.id)
                .map(Vec::as_slice)
                .unwrap_or_default()
                .iter()
                .map(|iface| {
                    let port = self.port(
                        iface,
                        &node.name,
                        &node_urn,
                        trunk_links.get(&iface.id).map(String::as_str),
                    );
                    registry.register(iface, &node.name, &port);
                    port
                })
                .collect();

            nodes.push(Node {
                name: node_name,
                id: node_urn,
                location: Location {
                    latitude: node.latitude,
                    longitude: node.longitude,
                    private: Vec::new(),
                },
                ports,
                status: operational_status(node),
                state: administrative_state(node),
            });
        }

        let links = index
            .links
            .iter()
            .zip(labels)
            .map(|((link, a, z), label)| self.link(&index, link, a, z, label))
            .collect();

        let topology = Topology {
            name: self.name.to_owned(),
            id: self.codec.topology_urn(),
            model_version: self.model_version.to_owned(),
            nodes,
            links,
            services: vec![L2VPN_PTP.to_owned()],
            timestamp: now,
            version: 0,
        };
        debug!(
            nodes = topology.nodes.len(),
            ports = registry.len(),
            links = topology.links.len(),
            "topology translated"
        );
        Ok(Translation { topology, registry })
    }

    fn port(
        &self,
        iface: &BackendInterface,
        node_name: &str,
        node_urn: &str,
        trunk_link: Option<&str>,
    ) -> Port {
        Port {
            id: self.codec.port_urn(node_name, &iface.name),
            name: iface.name.chars().take(MAX_PORT_NAME_LEN).collect(),
            node: node_urn.to_owned(),
            speed: SpeedClass::from_mbps(iface.bandwidth_mbps),
            status: operational_status(iface),
            state: self.resolver.interface_state(iface),
            mtu: self.resolver.interface_mtu(iface),
            nni: self.resolver.nni(iface, trunk_link),
            services: self.resolver.services(iface),
            private: PORT_PRIVATE.iter().map(|&f| f.to_owned()).collect(),
        }
    }

    fn link(
        &self,
        index: &Index<'_>,
        link: &BackendLink,
        a: &BackendInterface,
        z: &BackendInterface,
        label: String,
    ) -> Link {
        let mut ports = vec![
            self.codec.port_urn(index.node_name(a), &a.name),
            self.codec.port_urn(index.node_name(z), &z.name),
        ];
        ports.sort();
        let metrics = self.resolver.link_metrics(link);
        Link {
            id: self.codec.link_urn(&label),
            name: label,
            ports,
            link_type: LinkType::Intra,
            bandwidth: AttributeResolver::link_bandwidth(a, z),
            residual_bandwidth: metrics.residual_bandwidth,
            latency: metrics.latency,
            packet_loss: metrics.packet_loss,
            availability: metrics.availability,
            status: operational_status(link),
            state: administrative_state(link),
            private: LINK_PRIVATE.iter().map(|&f| f.to_owned()).collect(),
        }
    }
}
