// ── Circuit translator ──
//
// OESS circuits to canonical L2VPN records and back. Reads degrade
// gracefully (unregistered interfaces become "unknown"); writes are
// strict and refuse any port the registry cannot resolve.

use tracing::warn;

use crate::error::CoreError;
use crate::model::{
    AdminState, BackendCircuit, CircuitId, L2vpnEndpoint, L2vpnService, OperStatus,
    ProvisionEndpoint, ProvisionRequest,
};
use crate::registry::{IdentifierRegistry, UNKNOWN_PORT};
use crate::requests::{CreateL2vpn, DeleteL2vpnMatch};

/// Marks circuits created through the gateway.
pub const NAME_PREFIX: &str = "OESS-SDX-L2VPN--";

/// "Now" for provisioning, "never" for removal.
const UNSCHEDULED: i64 = -1;
/// Asks OESS to assign a fresh circuit id.
const NEW_CIRCUIT: i64 = -1;

pub fn is_sdx_circuit(circuit: &BackendCircuit) -> bool {
    circuit.description.starts_with(NAME_PREFIX)
}

pub fn description_for(name: &str) -> String {
    format!("{NAME_PREFIX}{name}")
}

/// Canonical record for one circuit. Anything but exactly two endpoints
/// is malformed upstream data.
pub fn to_l2vpn(
    circuit: &BackendCircuit,
    registry: &IdentifierRegistry,
) -> Result<L2vpnService, CoreError> {
    let [a, z] = circuit.endpoints.as_slice() else {
        return Err(CoreError::malformed(format!(
            "circuit {} has {} endpoints, expected 2",
            circuit.id,
            circuit.endpoints.len()
        )));
    };
    let active = circuit.state == "active";
    let endpoints = [a, z]
        .into_iter()
        .map(|ep| {
            let port_id = registry.port_id_or_unknown(ep.interface_id);
            if port_id == UNKNOWN_PORT {
                warn!(
                    circuit = circuit.id,
                    interface = ep.interface_id,
                    "circuit endpoint on unregistered interface"
                );
            }
            L2vpnEndpoint {
                port_id: port_id.to_owned(),
                vlan: ep.tag,
            }
        })
        .collect();

    Ok(L2vpnService {
        service_id: circuit.id,
        name: circuit
            .description
            .strip_prefix(NAME_PREFIX)
            .unwrap_or(&circuit.description)
            .to_owned(),
        status: if active { OperStatus::Up } else { OperStatus::Down },
        state: if active {
            AdminState::Enabled
        } else {
            AdminState::Disabled
        },
        created_on: circuit.created_on.clone(),
        last_modified_on: circuit.last_modified_on.clone(),
        endpoints,
    })
}

/// Backend provisioning call for a validated request. Every port must be
/// registered.
pub fn provision_request(
    request: &CreateL2vpn,
    registry: &IdentifierRegistry,
) -> Result<ProvisionRequest, CoreError> {
    let endpoints = request
        .endpoints
        .iter()
        .map(|ep| {
            let iface = registry.interface(&ep.port_id).ok_or_else(|| {
                CoreError::validation(format!("Invalid endpoint - not found: {}", ep.port_id))
            })?;
            Ok(ProvisionEndpoint {
                node: iface.node_name.clone(),
                interface: iface.interface.name.clone(),
                tag: ep.vlan,
                bandwidth: 0,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    Ok(ProvisionRequest {
        description: description_for(&request.name),
        provision_time: UNSCHEDULED,
        remove_time: UNSCHEDULED,
        circuit_id: NEW_CIRCUIT,
        endpoints,
    })
}

/// First circuit matching name, endpoint interfaces and tags, in order.
///
/// Circuits that agree on every compared attribute are indistinguishable
/// here; the earliest in `circuits` wins.
pub fn find_circuit_by_attributes(
    circuits: &[BackendCircuit],
    criteria: &DeleteL2vpnMatch,
    registry: &IdentifierRegistry,
) -> Option<CircuitId> {
    let description = description_for(&criteria.name);
    let wanted: Vec<_> = criteria
        .endpoints
        .iter()
        .map(|ep| {
            let interface = ep
                .port_id
                .as_deref()
                .and_then(|id| registry.interface(id))
                .map(|r| r.interface.id);
            (interface, ep.vlan)
        })
        .collect();

    circuits
        .iter()
        .find(|c| {
            c.description == description
                && c.endpoints.len() == 2
                && c.endpoints.iter().zip(&wanted).all(|(ep, (iface, vlan))| {
                    *iface == Some(ep.interface_id) && *vlan == Some(ep.tag)
                })
        })
        .map(|c| c.id)
}
