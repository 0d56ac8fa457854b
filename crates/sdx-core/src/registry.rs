// ── Identifier registry ──
//
// Bidirectional map between backend interface ids and canonical ports.
// A registry is built once per refresh alongside its topology and is
// never edited afterwards; a new refresh produces a new registry.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::model::{BackendInterface, InterfaceId, Port};

/// Port id reported for circuit endpoints whose interface is unregistered.
pub const UNKNOWN_PORT: &str = "unknown";

/// A backend interface as seen through the reverse map, with the owning
/// node name provisioning needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredInterface {
    #[serde(flatten)]
    pub interface: BackendInterface,
    pub node_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct IdentifierRegistry {
    forward: HashMap<InterfaceId, Port>,
    reverse: HashMap<String, RegisteredInterface>,
}

impl IdentifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the translator populates registries.
    pub(crate) fn register(&mut self, interface: &BackendInterface, node_name: &str, port: &Port) {
        self.forward.insert(interface.id, port.clone());
        self.reverse.insert(
            port.id.clone(),
            RegisteredInterface {
                interface: interface.clone(),
                node_name: node_name.to_owned(),
            },
        );
    }

    pub fn port(&self, interface_id: InterfaceId) -> Option<&Port> {
        self.forward.get(&interface_id)
    }

    /// Canonical port id, or [`UNKNOWN_PORT`].
    pub fn port_id_or_unknown(&self, interface_id: InterfaceId) -> &str {
        self.port(interface_id).map_or(UNKNOWN_PORT, |p| p.id.as_str())
    }

    pub fn interface(&self, port_id: &str) -> Option<&RegisteredInterface> {
        self.reverse.get(port_id)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Sorted forward view (`oess2sdx`).
    pub fn forward_view(&self) -> BTreeMap<InterfaceId, Port> {
        self.forward
            .iter()
            .map(|(id, port)| (*id, port.clone()))
            .collect()
    }

    /// Sorted reverse view (`sdx2oess`).
    pub fn reverse_view(&self) -> BTreeMap<String, RegisteredInterface> {
        self.reverse
            .iter()
            .map(|(id, iface)| (id.clone(), iface.clone()))
            .collect()
    }
}
