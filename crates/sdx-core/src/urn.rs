// ── Identifier codec ──
//
// Canonical URNs are pure functions of the exchange domain and backend
// names. Nothing here looks anything up, so identical backend keys yield
// byte-identical identifiers on every refresh.

/// One side of a link, as the (node name, interface name) pair it is
/// labelled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSide<'a> {
    pub node: &'a str,
    pub interface: &'a str,
}

impl<'a> LinkSide<'a> {
    pub fn new(node: &'a str, interface: &'a str) -> Self {
        Self { node, interface }
    }
}

/// Order-independent link label `"<nodeA>/<ifA>_<nodeZ>/<ifZ>"`.
///
/// Sides on the same node are ordered by interface name, otherwise by node
/// name, so swapping `a` and `z` never changes the result.
pub fn link_label(a: LinkSide<'_>, z: LinkSide<'_>) -> String {
    let (first, second) = if a.node == z.node {
        if z.interface < a.interface { (z, a) } else { (a, z) }
    } else if z.node < a.node {
        (z, a)
    } else {
        (a, z)
    };
    format!(
        "{}/{}_{}/{}",
        first.node, first.interface, second.node, second.interface
    )
}

/// Builds URNs for one exchange domain (`oxp_url`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrnCodec {
    domain: String,
}

impl UrnCodec {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    pub fn topology_urn(&self) -> String {
        format!("urn:sdx:topology:{}", self.domain)
    }

    pub fn node_urn(&self, node_name: &str) -> String {
        format!("urn:sdx:node:{}:{node_name}", self.domain)
    }

    pub fn port_urn(&self, node_name: &str, interface_name: &str) -> String {
        format!("urn:sdx:port:{}:{node_name}:{interface_name}", self.domain)
    }

    pub fn link_urn(&self, label: &str) -> String {
        format!("urn:sdx:link:{}:{label}", self.domain)
    }

    /// Peer port configured by an operator as `<domain>:<node>:<port>`.
    pub fn peer_port_urn(peer: &str) -> String {
        format!("urn:sdx:port:{peer}")
    }
}
