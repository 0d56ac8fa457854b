// ── Published topology snapshot ──
//
// The current document and its registry live together in one immutable
// `TopologySnapshot` behind an `ArcSwapOption`. Readers load it without
// locking; `commit` is the only writer and holds the versioner lock just
// long enough to diff, stamp and swap. Stamping may write the version file,
// so it runs on the blocking pool.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::diff::TopologyDiff;
use crate::error::CoreError;
use crate::model::Topology;
use crate::registry::IdentifierRegistry;
use crate::translate::Translation;
use crate::version::Versioner;

/// A published document and the registry built with it.
#[derive(Debug)]
pub struct TopologySnapshot {
    pub topology: Topology,
    pub registry: IdentifierRegistry,
}

/// Result of one successful commit.
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    pub snapshot: Arc<TopologySnapshot>,
    pub diff: TopologyDiff,
    /// No document had been published before this one.
    pub cold_start: bool,
}

pub struct TopologyStore {
    current: ArcSwapOption<TopologySnapshot>,
    versioner: Arc<Mutex<Versioner>>,
}

impl TopologyStore {
    pub fn new(versioner: Versioner) -> Self {
        Self {
            current: ArcSwapOption::empty(),
            versioner: Arc::new(Mutex::new(versioner)),
        }
    }

    /// The published snapshot, if any refresh has succeeded yet.
    pub fn snapshot(&self) -> Option<Arc<TopologySnapshot>> {
        self.current.load_full()
    }

    /// Stamp `translation` against the current snapshot and publish it.
    ///
    /// On error nothing is published and the previous snapshot stays
    /// authoritative.
    pub async fn commit(
        &self,
        translation: Translation,
        now: DateTime<Utc>,
    ) -> Result<CommitOutcome, CoreError> {
        let Translation {
            mut topology,
            registry,
        } = translation;

        let mut versioner = Arc::clone(&self.versioner).lock_owned().await;
        let previous = self.current.load_full();
        let against = previous.clone();
        let (versioner, topology, diff) = tokio::task::spawn_blocking(move || {
            let diff = versioner.stamp(against.as_deref().map(|s| &s.topology), &mut topology, now);
            (versioner, topology, diff)
        })
        .await
        .map_err(|e| CoreError::VersionStore {
            message: format!("version stamping did not complete: {e}"),
        })?;
        let diff = diff?;

        let snapshot = Arc::new(TopologySnapshot { topology, registry });
        self.current.store(Some(Arc::clone(&snapshot)));
        drop(versioner);

        Ok(CommitOutcome {
            snapshot,
            diff,
            cold_start: previous.is_none(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::StaticOverrides;
    use crate::model::NativeTopology;
    use crate::translate::TopologyTranslator;
    use crate::version::{FileVersionStore, MemoryVersionStore, VersionStore};

    fn empty_translation() -> Translation {
        let overrides = StaticOverrides::default();
        TopologyTranslator::new("oxp", "x.net", "2.0.0", &overrides)
            .translate(&NativeTopology::default(), Utc::now())
            .unwrap()
    }

    #[tokio::test]
    async fn first_commit_is_cold_start() {
        let store = TopologyStore::new(Versioner::open(Box::new(MemoryVersionStore::with_version(4))));
        assert!(store.snapshot().is_none());

        let outcome = store.commit(empty_translation(), Utc::now()).await.unwrap();
        assert!(outcome.cold_start);
        assert_eq!(outcome.snapshot.topology.version, 4);

        let again = store.commit(empty_translation(), Utc::now()).await.unwrap();
        assert!(!again.cold_start);
        assert!(!again.diff.any());
        assert_eq!(store.snapshot().unwrap().topology.version, 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn commit_persists_from_a_multi_thread_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oess_sdx.ver");
        let store = TopologyStore::new(Versioner::open(Box::new(FileVersionStore::new(&path))));

        store.commit(empty_translation(), Utc::now()).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1");
    }

    #[tokio::test]
    async fn failed_stamp_keeps_previous_snapshot() {
        struct ReadOnly;
        impl VersionStore for ReadOnly {
            fn load(&self) -> Option<u64> {
                Some(9)
            }
            fn save(&self, _: u64) -> Result<(), CoreError> {
                Err(CoreError::VersionStore {
                    message: "read-only".into(),
                })
            }
        }

        let store = TopologyStore::new(Versioner::open(Box::new(ReadOnly)));
        store.commit(empty_translation(), Utc::now()).await.unwrap();

        let mut grown = empty_translation();
        grown.topology.nodes.push(crate::model::Node {
            name: "n1".into(),
            id: "urn:sdx:node:x.net:n1".into(),
            location: crate::model::Location {
                latitude: 0.0,
                longitude: 0.0,
                private: Vec::new(),
            },
            ports: Vec::new(),
            status: crate::model::OperStatus::Up,
            state: crate::model::AdminState::Enabled,
        });
        assert!(store.commit(grown, Utc::now()).await.is_err());

        let kept = store.snapshot().unwrap();
        assert!(kept.topology.nodes.is_empty());
        assert_eq!(kept.topology.version, 9);
    }
}
