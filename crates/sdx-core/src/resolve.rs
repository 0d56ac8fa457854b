// ── Attribute resolver ──
//
// Derives status, state, MTU, VLAN range, NNI and link metrics from
// backend fields plus static overrides. Each overridable attribute is an
// ordered list of named layers; the first layer that yields a value wins
// and the winner is traced.

use std::collections::BTreeMap;

use tracing::trace;

use crate::config::{LinkOverride, StaticOverrides};
use crate::model::{
    AdminState, BackendInterface, BackendLink, BackendNode, InterfaceRole, L2VPN_PTP, OperStatus,
    Signals, VlanRange, VlanService,
};
use crate::urn::UrnCodec;

pub const DEFAULT_MTU: u64 = 1500;
pub const DEFAULT_VLAN_RANGE: (u16, u16) = (1, 4095);
pub const DEFAULT_RESIDUAL_BANDWIDTH: f64 = 100.0;

/// Anything carrying the raw OESS status columns.
pub trait Signalled {
    fn signals(&self) -> &Signals;

    /// Whether the record carries an interface role column at all.
    fn has_role(&self) -> bool {
        false
    }
}

impl Signalled for BackendNode {
    fn signals(&self) -> &Signals {
        &self.signals
    }
}

impl Signalled for BackendInterface {
    fn signals(&self) -> &Signals {
        &self.signals
    }

    fn has_role(&self) -> bool {
        self.role.is_some()
    }
}

impl Signalled for BackendLink {
    fn signals(&self) -> &Signals {
        &self.signals
    }
}

fn is(field: Option<&String>, expected: &str) -> bool {
    field.is_some_and(|v| v == expected)
}

/// `up` beats `down` beats `error`. Never absent: no signal at all is `error`.
pub fn operational_status(entity: &impl Signalled) -> OperStatus {
    let s = entity.signals();
    let columns = [
        s.status.as_ref(),
        s.operational_state_mpls.as_ref(),
        s.operational_state.as_ref(),
    ];
    if columns.iter().any(|c| is(*c, "up")) {
        OperStatus::Up
    } else if columns.iter().any(|c| is(*c, "down")) {
        OperStatus::Down
    } else {
        OperStatus::Error
    }
}

/// Approximates "usable now". Interfaces with a role column count as
/// enabled when their raw `status` is up, even without an admin flag.
pub fn administrative_state(entity: &impl Signalled) -> AdminState {
    let s = entity.signals();
    if is(s.in_maint.as_ref(), "yes") {
        return AdminState::Maintenance;
    }
    if is(s.link_state.as_ref(), "active")
        || is(s.admin_state.as_ref(), "active")
        || is(s.admin_state.as_ref(), "up")
    {
        return AdminState::Enabled;
    }
    if entity.has_role() && is(s.status.as_ref(), "up") {
        return AdminState::Enabled;
    }
    AdminState::Disabled
}

/// Parses `"<low>-<high>"`; anything else is `None`.
pub fn parse_tag_range(raw: &str) -> Option<(u16, u16)> {
    let (low, high) = raw.split_once('-')?;
    let number = |s: &str| {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse::<u16>().ok()
    };
    Some((number(low)?, number(high)?))
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn mbps_to_gbps(mbps: u64) -> f64 {
    mbps as f64 / 100.0
}

/// Link metrics that are published but never measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkMetrics {
    pub residual_bandwidth: f64,
    pub latency: f64,
    pub packet_loss: f64,
    pub availability: f64,
}

// ── Layered resolution ───────────────────────────────────────────────

type Layer<'a, T> = (&'static str, Box<dyn Fn() -> Option<T> + 'a>);

fn layer<'a, T>(name: &'static str, strategy: impl Fn() -> Option<T> + 'a) -> Layer<'a, T> {
    (name, Box::new(strategy))
}

fn resolve<T>(attribute: &'static str, entity: u64, layers: Vec<Layer<'_, T>>, default: T) -> T {
    for (layer, strategy) in layers {
        if let Some(value) = strategy() {
            trace!(attribute, entity, layer, "attribute resolved");
            return value;
        }
    }
    trace!(attribute, entity, layer = "default", "attribute resolved");
    default
}

/// Resolves per-entity attributes against one set of static overrides.
#[derive(Debug, Clone, Copy)]
pub struct AttributeResolver<'a> {
    overrides: &'a StaticOverrides,
}

impl<'a> AttributeResolver<'a> {
    pub fn new(overrides: &'a StaticOverrides) -> Self {
        Self { overrides }
    }

    pub fn interface_state(&self, iface: &BackendInterface) -> AdminState {
        let configured = self.overrides.interface(iface.id);
        resolve(
            "state",
            iface.id,
            vec![
                layer("override", move || configured.and_then(|o| o.state)),
                layer("derived", || Some(administrative_state(iface))),
            ],
            AdminState::Disabled,
        )
    }

    pub fn interface_mtu(&self, iface: &BackendInterface) -> u64 {
        let configured = self.overrides.interface(iface.id);
        resolve(
            "mtu",
            iface.id,
            vec![
                layer("override", move || configured.and_then(|o| o.mtu)),
                layer("backend", || iface.mtu),
            ],
            DEFAULT_MTU,
        )
    }

    /// Static range, else the backend tag range, else `[[1, 4095]]`. An
    /// empty static range or a malformed backend string falls through.
    pub fn vlan_range(&self, iface: &BackendInterface) -> VlanRange {
        let configured = self.overrides.interface(iface.id);
        resolve(
            "vlan_range",
            iface.id,
            vec![
                layer("override", move || {
                    configured
                        .and_then(|o| o.sdx_vlan_range.clone())
                        .filter(|r| !r.is_empty())
                }),
                layer("backend", || {
                    iface
                        .vlan_tag_range
                        .as_deref()
                        .and_then(parse_tag_range)
                        .map(|pair| vec![pair])
                }),
            ],
            vec![DEFAULT_VLAN_RANGE],
        )
    }

    pub fn services(&self, iface: &BackendInterface) -> BTreeMap<String, VlanService> {
        BTreeMap::from([(
            L2VPN_PTP.to_owned(),
            VlanService {
                vlan_range: self.vlan_range(iface),
            },
        )])
    }

    /// Trunks point at their link; other ports at a configured peer, if any.
    pub fn nni(&self, iface: &BackendInterface, trunk_link_urn: Option<&str>) -> String {
        if iface.role == Some(InterfaceRole::Trunk) {
            return trunk_link_urn.unwrap_or_default().to_owned();
        }
        let configured = self.overrides.interface(iface.id);
        resolve(
            "nni",
            iface.id,
            vec![layer("override", move || {
                configured
                    .and_then(|o| o.sdx_nni.as_deref())
                    .map(UrnCodec::peer_port_urn)
            })],
            String::new(),
        )
    }

    /// Gbps: the slower side's Mbps divided by 100.
    pub fn link_bandwidth(a: &BackendInterface, z: &BackendInterface) -> f64 {
        mbps_to_gbps(a.bandwidth_mbps).min(mbps_to_gbps(z.bandwidth_mbps))
    }

    pub fn link_metrics(&self, link: &BackendLink) -> LinkMetrics {
        let configured = self.overrides.link(link.id);
        let metric = |attribute: &'static str, pick: fn(&LinkOverride) -> Option<f64>, default| {
            resolve(
                attribute,
                link.id,
                vec![layer("override", move || configured.and_then(pick))],
                default,
            )
        };
        LinkMetrics {
            residual_bandwidth: metric(
                "residual_bandwidth",
                |o| o.residual_bandwidth,
                DEFAULT_RESIDUAL_BANDWIDTH,
            ),
            latency: metric("latency", |o| o.latency, 0.0),
            packet_loss: metric("packet_loss", |o| o.packet_loss, 0.0),
            availability: metric("availability", |o| o.availability, 0.0),
        }
    }
}
