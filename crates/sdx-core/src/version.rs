// ── Version counter and document stamping ──
//
// The topology version survives restarts through a `VersionStore`. A
// `Versioner` owns the in-memory counter and decides, per refresh, which
// timestamp and version a new document carries.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::diff::{TopologyDiff, diff_topologies};
use crate::error::CoreError;
use crate::model::Topology;

/// Counter value when nothing was ever persisted.
pub const INITIAL_VERSION: u64 = 1;

/// Durable home of the version counter.
pub trait VersionStore: Send + Sync {
    /// `None` when nothing usable is stored.
    fn load(&self) -> Option<u64>;
    fn save(&self, version: u64) -> Result<(), CoreError>;
}

// ── File store ───────────────────────────────────────────────────────

/// Plain-text file holding one decimal integer.
#[derive(Debug, Clone)]
pub struct FileVersionStore {
    path: PathBuf,
}

impl FileVersionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VersionStore for FileVersionStore {
    fn load(&self) -> Option<u64> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored topology version");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read topology version");
                return None;
            }
        };
        match raw.trim().parse() {
            Ok(version) => Some(version),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unparseable topology version");
                None
            }
        }
    }

    fn save(&self, version: u64) -> Result<(), CoreError> {
        std::fs::write(&self.path, version.to_string()).map_err(|e| CoreError::VersionStore {
            message: format!("cannot write {}: {e}", self.path.display()),
        })
    }
}

// ── Memory store ─────────────────────────────────────────────────────

/// Process-local store, for tests and throwaway runs.
#[derive(Debug, Default)]
pub struct MemoryVersionStore {
    // 0 means "never saved"; real versions start at 1.
    value: AtomicU64,
}

impl MemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(version: u64) -> Self {
        Self {
            value: AtomicU64::new(version),
        }
    }
}

impl VersionStore for MemoryVersionStore {
    fn load(&self) -> Option<u64> {
        Some(self.value.load(Ordering::SeqCst)).filter(|v| *v != 0)
    }

    fn save(&self, version: u64) -> Result<(), CoreError> {
        self.value.store(version, Ordering::SeqCst);
        Ok(())
    }
}

// ── Versioner ────────────────────────────────────────────────────────

pub struct Versioner {
    store: Box<dyn VersionStore>,
    current: u64,
}

impl Versioner {
    /// Re-derive the counter from the store, never incrementing it.
    pub fn open(store: Box<dyn VersionStore>) -> Self {
        let current = store.load().unwrap_or(INITIAL_VERSION);
        debug!(version = current, "topology version loaded");
        Self { store, current }
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    /// Stamp `next` against the previously published document.
    ///
    /// With no previous document (cold start) `next` gets the stored
    /// version and `now`, and the returned diff is empty. Otherwise any
    /// change refreshes the timestamp, an administrative change also bumps
    /// and persists the version, and an unchanged document inherits both
    /// fields from `previous`. If persisting fails nothing is advanced.
    pub fn stamp(
        &mut self,
        previous: Option<&Topology>,
        next: &mut Topology,
        now: DateTime<Utc>,
    ) -> Result<TopologyDiff, CoreError> {
        let Some(previous) = previous else {
            if let Err(e) = self.store.save(self.current) {
                warn!(error = %e, "cannot persist topology version on startup");
            }
            next.version = self.current;
            next.timestamp = now;
            return Ok(TopologyDiff::default());
        };

        let diff = diff_topologies(previous, next);
        if diff.administrative_changed {
            let bumped = self.current + 1;
            self.store.save(bumped)?;
            self.current = bumped;
        }
        next.version = if diff.administrative_changed {
            self.current
        } else {
            previous.version
        };
        next.timestamp = if diff.any() { now } else { previous.timestamp };
        Ok(diff)
    }
}

impl std::fmt::Debug for Versioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Versioner")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::model::{AdminState, Location, Node, OperStatus};

    fn topology(nodes: &[&str]) -> Topology {
        Topology {
            name: "oxp".into(),
            id: "urn:sdx:topology:x".into(),
            model_version: "2.0.0".into(),
            nodes: nodes
                .iter()
                .map(|n| Node {
                    name: (*n).into(),
                    id: format!("urn:sdx:node:x:{n}"),
                    location: Location {
                        latitude: 0.0,
                        longitude: 0.0,
                        private: Vec::new(),
                    },
                    ports: Vec::new(),
                    status: OperStatus::Up,
                    state: AdminState::Enabled,
                })
                .collect(),
            links: Vec::new(),
            services: vec!["l2vpn-ptp".into()],
            timestamp: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            version: 0,
        }
    }

    #[test]
    fn cold_start_uses_stored_version_without_increment() {
        let mut v = Versioner::open(Box::new(MemoryVersionStore::with_version(7)));
        let now = Utc::now();
        let mut t = topology(&["a"]);
        let diff = v.stamp(None, &mut t, now).unwrap();
        assert!(!diff.any());
        assert_eq!(t.version, 7);
        assert_eq!(t.timestamp, now);
    }

    #[test]
    fn cold_start_defaults_to_one() {
        let mut v = Versioner::open(Box::new(MemoryVersionStore::new()));
        let mut t = topology(&["a"]);
        v.stamp(None, &mut t, Utc::now()).unwrap();
        assert_eq!(t.version, 1);
    }

    #[test]
    fn unchanged_document_carries_previous_stamp() {
        let mut v = Versioner::open(Box::new(MemoryVersionStore::new()));
        let mut first = topology(&["a"]);
        v.stamp(None, &mut first, Utc::now()).unwrap();

        let mut second = topology(&["a"]);
        let later = first.timestamp + Duration::seconds(60);
        v.stamp(Some(&first), &mut second, later).unwrap();
        assert_eq!(second.version, first.version);
        assert_eq!(second.timestamp, first.timestamp);
    }

    #[test]
    fn operational_change_refreshes_timestamp_only() {
        let mut v = Versioner::open(Box::new(MemoryVersionStore::new()));
        let mut first = topology(&["a"]);
        v.stamp(None, &mut first, Utc::now()).unwrap();

        let mut second = topology(&["a"]);
        second.nodes[0].status = OperStatus::Down;
        let later = first.timestamp + Duration::seconds(60);
        let diff = v.stamp(Some(&first), &mut second, later).unwrap();
        assert!(diff.operational_changed && !diff.administrative_changed);
        assert_eq!(second.version, first.version);
        assert_eq!(second.timestamp, later);
    }

    #[test]
    fn administrative_change_bumps_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oess_sdx.ver");
        let mut v = Versioner::open(Box::new(FileVersionStore::new(&path)));
        let mut first = topology(&["a"]);
        v.stamp(None, &mut first, Utc::now()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1");

        let mut second = topology(&["a", "b"]);
        let diff = v.stamp(Some(&first), &mut second, Utc::now()).unwrap();
        assert!(diff.administrative_changed);
        assert_eq!(second.version, 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "2");

        // A restart picks the persisted counter back up.
        let reopened = Versioner::open(Box::new(FileVersionStore::new(&path)));
        assert_eq!(reopened.current(), 2);
    }

    #[test]
    fn garbage_version_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oess_sdx.ver");
        std::fs::write(&path, "not-a-number").unwrap();
        assert_eq!(FileVersionStore::new(&path).load(), None);
    }

    #[test]
    fn failed_save_does_not_advance() {
        struct Broken;
        impl VersionStore for Broken {
            fn load(&self) -> Option<u64> {
                Some(3)
            }
            fn save(&self, _: u64) -> Result<(), CoreError> {
                Err(CoreError::VersionStore {
                    message: "read-only".into(),
                })
            }
        }

        let mut v = Versioner::open(Box::new(Broken));
        let mut first = topology(&["a"]);
        v.stamp(None, &mut first, Utc::now()).unwrap();
        let mut second = topology(&["a", "b"]);
        assert!(v.stamp(Some(&first), &mut second, Utc::now()).is_err());
        assert_eq!(v.current(), 3);
    }
}
