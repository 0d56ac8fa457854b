//! Long-running topology publisher.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use sdx_core::{Backend, Gateway};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;

/// Refresh every `interval` seconds against one gateway, printing each new
/// or changed document.
///
/// A failed refresh is logged and the last published document stays
/// current. The command only fails when no refresh ever succeeded.
pub async fn handle<B: Backend>(
    gateway: &Gateway<B>,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut refreshes = 0u64;
    let mut last_error = None;
    while args.count.is_none_or(|n| refreshes < n) {
        ticker.tick().await;
        refreshes += 1;

        match gateway.refresh().await {
            Ok(outcome) => {
                last_error = None;
                if outcome.cold_start || outcome.diff.any() {
                    super::emit(&outcome.snapshot.topology, global)?;
                } else {
                    info!(refresh = refreshes, "topology unchanged");
                }
            }
            Err(e) => {
                warn!(refresh = refreshes, error = %e, "topology refresh failed, keeping last document");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if gateway.cached_topology().is_none() => Err(e.into()),
        _ => Ok(()),
    }
}
