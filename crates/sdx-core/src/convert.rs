// ── API-to-domain type conversions ──
//
// Bridges raw `oess_api` response types into the native model the core
// consumes, and provisioning requests back into the wire form.

use oess_api::{
    OessCircuit, OessEndpoint, OessInterface, OessLink, OessNode, StateFields,
};

use crate::model::{
    BackendCircuit, BackendInterface, BackendLink, BackendNode, CircuitEndpoint, InterfaceRole,
    ProvisionEndpoint, ProvisionRequest, Signals,
};

impl From<StateFields> for Signals {
    fn from(s: StateFields) -> Self {
        Self {
            status: s.status,
            operational_state: s.operational_state,
            operational_state_mpls: s.operational_state_mpls,
            in_maint: s.in_maint,
            link_state: s.link_state,
            admin_state: s.admin_state,
        }
    }
}

/// Any role column other than `trunk` counts as access, including a sent
/// `null`. Only its presence matters for administrative state.
fn parse_role(raw: Option<&str>) -> InterfaceRole {
    if raw.is_some_and(|r| r.eq_ignore_ascii_case("trunk")) {
        InterfaceRole::Trunk
    } else {
        InterfaceRole::Access
    }
}

impl From<OessNode> for BackendNode {
    fn from(n: OessNode) -> Self {
        Self {
            id: n.node_id,
            name: n.name,
            latitude: n.latitude,
            longitude: n.longitude,
            signals: n.state.into(),
        }
    }
}

impl From<OessInterface> for BackendInterface {
    fn from(i: OessInterface) -> Self {
        Self {
            id: i.interface_id,
            name: i.name,
            node_id: i.node_id,
            bandwidth_mbps: i.bandwidth,
            mtu: i.mtu,
            role: i.int_role.map(|r| parse_role(r.as_deref())),
            vlan_tag_range: i.mpls_vlan_tag_range,
            signals: i.state.into(),
        }
    }
}

impl From<OessLink> for BackendLink {
    fn from(l: OessLink) -> Self {
        Self {
            id: l.link_id,
            interface_a: l.interface_a_id,
            interface_z: l.interface_z_id,
            signals: l.state.into(),
        }
    }
}

impl From<OessEndpoint> for CircuitEndpoint {
    fn from(e: OessEndpoint) -> Self {
        Self {
            interface_id: e.interface_id,
            tag: e.tag,
        }
    }
}

impl From<OessCircuit> for BackendCircuit {
    fn from(c: OessCircuit) -> Self {
        Self {
            id: c.circuit_id,
            description: c.description,
            state: c.state,
            created_on: c.created_on,
            last_modified_on: c.last_modified_on,
            endpoints: c.endpoints.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&ProvisionRequest> for oess_api::ProvisionCircuit {
    fn from(r: &ProvisionRequest) -> Self {
        Self {
            description: r.description.clone(),
            provision_time: r.provision_time,
            remove_time: r.remove_time,
            circuit_id: r.circuit_id,
            endpoints: r.endpoints.iter().map(Into::into).collect(),
        }
    }
}

impl From<&ProvisionEndpoint> for oess_api::ProvisionEndpoint {
    fn from(e: &ProvisionEndpoint) -> Self {
        Self {
            tag: e.tag,
            interface: e.interface.clone(),
            node: e.node.clone(),
            bandwidth: e.bandwidth,
        }
    }
}
