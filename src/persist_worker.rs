// Persistence worker: every persist_interval_secs, write the history file if
// anything was appended since the last successful write. Final flush on shutdown.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{Instrument, debug, instrument, warn};

use crate::history_repo::{HistoryStore, file};

#[derive(Debug, Clone)]
pub struct PersistWorkerConfig {
    pub path: PathBuf,
    pub persist_interval_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Nothing appended since the last write.
    Skipped,
    /// Whole buffer written; number of samples.
    Written(usize),
}

/// One persistence cycle. The snapshot is copied under the store lock and
/// written after it is released. On failure the store stays dirty.
#[instrument(skip_all, fields(operation = "persist_history", path = %path.display()))]
pub async fn persist_once(history: &HistoryStore, path: &Path) -> anyhow::Result<PersistOutcome> {
    let Some((generation, samples)) = history.dirty_snapshot() else {
        debug!("no changes since last save, skipping write");
        return Ok(PersistOutcome::Skipped);
    };
    let n = samples.len();
    file::save(path, samples).await?;
    history.mark_persisted(generation);
    debug!(samples_count = n, "history saved");
    Ok(PersistOutcome::Written(n))
}

/// Spawns the persistence worker. Returns a join handle; after `shutdown_rx`
/// fires it flushes once more and exits.
pub fn spawn(
    history: Arc<HistoryStore>,
    config: PersistWorkerConfig,
    mut shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    let span = tracing::debug_span!(
        "persist_worker",
        interval_secs = config.persist_interval_secs
    );
    tokio::spawn(
        async move {
            let mut persist_tick =
                tokio::time::interval(Duration::from_secs(config.persist_interval_secs));
            persist_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // Nothing to save right after startup.
            persist_tick.tick().await;

            loop {
                tokio::select! {
                    _ = persist_tick.tick() => {
                        if let Err(e) = persist_once(&history, &config.path).await {
                            warn!(error = %e, "history save failed; will retry next cycle");
                        }
                    }
                    _ = &mut shutdown_rx => break,
                }
            }
            if let Err(e) = persist_once(&history, &config.path).await {
                warn!(error = %e, "final history save failed");
            }
            debug!("Persist worker shutting down");
        }
        .instrument(span),
    )
}
