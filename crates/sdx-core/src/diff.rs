// ── Topology differ ──
//
// Compares two canonical documents by identifier, never by position.
// Administrative and operational changes are tracked independently; a
// single refresh may flag both.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::{Link, Node, Port, Topology};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TopologyDiff {
    pub administrative_changed: bool,
    pub operational_changed: bool,
}

impl TopologyDiff {
    pub fn any(self) -> bool {
        self.administrative_changed || self.operational_changed
    }

    fn admin(&mut self, changed: bool) {
        self.administrative_changed |= changed;
    }

    fn oper(&mut self, changed: bool) {
        self.operational_changed |= changed;
    }
}

/// Classify every difference between `previous` and `current`.
pub fn diff_topologies(previous: &Topology, current: &Topology) -> TopologyDiff {
    let mut diff = TopologyDiff::default();

    let mut remaining: HashMap<&str, &Node> =
        previous.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    for node in &current.nodes {
        let Some(prev) = remaining.remove(node.id.as_str()) else {
            diff.admin(true);
            continue;
        };
        diff.admin(node.location != prev.location || node.state != prev.state);
        diff.oper(node.status != prev.status);
        diff_ports(&mut diff, &prev.ports, &node.ports);
    }
    diff.admin(!remaining.is_empty());

    let mut remaining: HashMap<&str, &Link> =
        previous.links.iter().map(|l| (l.id.as_str(), l)).collect();
    for link in &current.links {
        let Some(prev) = remaining.remove(link.id.as_str()) else {
            diff.admin(true);
            continue;
        };
        #[allow(clippy::float_cmp)]
        let bandwidth_changed = link.bandwidth != prev.bandwidth;
        diff.admin(bandwidth_changed || link.ports != prev.ports || link.state != prev.state);
        diff.oper(link.status != prev.status);
    }
    diff.admin(!remaining.is_empty());

    diff
}

fn diff_ports(diff: &mut TopologyDiff, previous: &[Port], current: &[Port]) {
    let mut remaining: HashMap<&str, &Port> =
        previous.iter().map(|p| (p.id.as_str(), p)).collect();
    for port in current {
        let Some(prev) = remaining.remove(port.id.as_str()) else {
            diff.admin(true);
            continue;
        };
        diff.admin(
            port.mtu != prev.mtu
                || port.nni != prev.nni
                || port.services != prev.services
                || port.state != prev.state
                || port.speed != prev.speed
                || port.private != prev.private,
        );
        diff.oper(port.status != prev.status);
    }
    diff.admin(!remaining.is_empty());
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;

    use super::*;
    use crate::model::{AdminState, LinkType, Location, OperStatus, SpeedClass};

    fn port(id: &str) -> Port {
        Port {
            id: id.into(),
            name: id.into(),
            node: "urn:sdx:node:x:n1".into(),
            speed: SpeedClass::Ge10,
            status: OperStatus::Up,
            state: AdminState::Enabled,
            mtu: 1500,
            nni: String::new(),
            services: BTreeMap::new(),
            private: vec!["status".into()],
        }
    }

    fn sample() -> Topology {
        Topology {
            name: "oxp".into(),
            id: "urn:sdx:topology:x".into(),
            model_version: "2.0.0".into(),
            nodes: vec![Node {
                name: "n1".into(),
                id: "urn:sdx:node:x:n1".into(),
                location: Location {
                    latitude: 1.0,
                    longitude: 2.0,
                    private: Vec::new(),
                },
                ports: vec![port("p1"), port("p2")],
                status: OperStatus::Up,
                state: AdminState::Enabled,
            }],
            links: vec![Link {
                name: "n1/p1_n1/p2".into(),
                id: "urn:sdx:link:x:n1/p1_n1/p2".into(),
                ports: vec!["p1".into(), "p2".into()],
                link_type: LinkType::Intra,
                bandwidth: 100.0,
                residual_bandwidth: 100.0,
                latency: 0.0,
                packet_loss: 0.0,
                availability: 0.0,
                status: OperStatus::Up,
                state: AdminState::Enabled,
                private: vec!["packet_loss".into()],
            }],
            services: vec!["l2vpn-ptp".into()],
            timestamp: Utc::now(),
            version: 1,
        }
    }

    #[test]
    fn identical_documents_have_no_diff() {
        let t = sample();
        assert_eq!(diff_topologies(&t, &t), TopologyDiff::default());
    }

    #[test]
    fn reordering_is_not_a_change() {
        let prev = sample();
        let mut cur = sample();
        cur.nodes[0].ports.reverse();
        assert!(!diff_topologies(&prev, &cur).any());
    }

    #[test]
    fn status_only_is_operational() {
        let prev = sample();
        let mut cur = sample();
        cur.nodes[0].ports[1].status = OperStatus::Down;
        assert_eq!(
            diff_topologies(&prev, &cur),
            TopologyDiff {
                administrative_changed: false,
                operational_changed: true,
            }
        );
    }

    #[test]
    fn both_flags_can_be_set_at_once() {
        let prev = sample();
        let mut cur = sample();
        cur.links[0].status = OperStatus::Down;
        cur.links[0].bandwidth = 10.0;
        let diff = diff_topologies(&prev, &cur);
        assert!(diff.administrative_changed);
        assert!(diff.operational_changed);
    }

    #[test]
    fn added_and_removed_entities_are_administrative() {
        let prev = sample();

        let mut added = sample();
        added.nodes[0].ports.push(port("p3"));
        assert!(diff_topologies(&prev, &added).administrative_changed);

        let mut removed = sample();
        removed.links.clear();
        assert!(diff_topologies(&prev, &removed).administrative_changed);

        let mut gone = sample();
        gone.nodes.clear();
        assert!(diff_topologies(&prev, &gone).administrative_changed);
    }

    #[test]
    fn port_admin_fields() {
        let prev = sample();
        let mut cur = sample();
        cur.nodes[0].ports[0].mtu = 9000;
        assert!(diff_topologies(&prev, &cur).administrative_changed);

        let mut cur = sample();
        cur.nodes[0].ports[0].nni = "urn:sdx:port:y:a:b".into();
        assert!(diff_topologies(&prev, &cur).administrative_changed);
    }

    #[test]
    fn node_location_and_state_are_administrative() {
        let prev = sample();

        let mut moved = sample();
        moved.nodes[0].location.latitude = 25.75;
        assert_eq!(
            diff_topologies(&prev, &moved),
            TopologyDiff {
                administrative_changed: true,
                operational_changed: false,
            }
        );

        let mut maintenance = sample();
        maintenance.nodes[0].state = AdminState::Maintenance;
        assert_eq!(
            diff_topologies(&prev, &maintenance),
            TopologyDiff {
                administrative_changed: true,
                operational_changed: false,
            }
        );
    }

    #[test]
    fn node_status_is_operational() {
        let prev = sample();
        let mut cur = sample();
        cur.nodes[0].status = OperStatus::Error;
        assert_eq!(
            diff_topologies(&prev, &cur),
            TopologyDiff {
                administrative_changed: false,
                operational_changed: true,
            }
        );
    }

    #[test]
    fn one_node_can_raise_both_flags() {
        let prev = sample();
        let mut cur = sample();
        cur.nodes[0].status = OperStatus::Down;
        cur.nodes[0].state = AdminState::Disabled;
        assert_eq!(
            diff_topologies(&prev, &cur),
            TopologyDiff {
                administrative_changed: true,
                operational_changed: true,
            }
        );
    }

    #[test]
    fn link_metrics_are_not_compared() {
        let prev = sample();
        let mut cur = sample();
        cur.links[0].latency = 42.0;
        assert!(!diff_topologies(&prev, &cur).any());
    }
}
