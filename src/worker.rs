// Ingestion worker: read counters each tick, compute deltas, append to history.
// A failed read skips the tick; previous counters and history stay untouched.

use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::time::{Duration, interval};
use tracing::Instrument;

use crate::history_repo::HistoryStore;
use crate::models::{CounterReading, IoCounters, Sample};
use crate::sysinfo_repo::CounterSource;

const WALL_CLOCK_FORMAT: &str = "%H:%M:%S";

/// Source, history and shutdown for the ingestion worker.
pub struct WorkerDeps<S> {
    pub source: Arc<S>,
    pub history: Arc<HistoryStore>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    pub sample_interval_ms: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

/// Last-seen cumulative counters. Owned by the ingestion loop only.
#[derive(Debug, Default)]
pub struct Ingestor {
    prev: Option<IoCounters>,
}

impl Ingestor {
    pub fn new(prev: Option<IoCounters>) -> Self {
        Self { prev }
    }

    pub fn prev(&self) -> Option<IoCounters> {
        self.prev
    }

    /// Builds the sample for `reading` taken at `at` and advances the previous counters.
    /// Without a previous reading all deltas are zero.
    pub fn record(&mut self, reading: &CounterReading, at: DateTime<Local>) -> Sample {
        let deltas = self
            .prev
            .map(|prev| reading.io.deltas_since(&prev))
            .unwrap_or_default();
        self.prev = Some(reading.io);
        Sample {
            wall_clock_label: at.format(WALL_CLOCK_FORMAT).to_string(),
            timestamp: at.timestamp_micros() as f64 / 1_000_000.0,
            cpu_percent: finite_gauge(reading.cpu_percent, "cpu_percent"),
            memory_percent: finite_gauge(reading.memory_percent, "memory_percent"),
            net_sent_kib: deltas.net_sent_kib,
            net_recv_kib: deltas.net_recv_kib,
            disk_read_kib: deltas.disk_read_kib,
            disk_write_kib: deltas.disk_write_kib,
        }
    }
}

/// NaN or infinite gauges are stored as 0.0; JSON has no encoding for them.
fn finite_gauge(value: f64, field: &'static str) -> f64 {
    if value.is_finite() {
        return value;
    }
    tracing::warn!(field, value = %value, "non-finite gauge reading, recording 0");
    0.0
}

/// Runs one ingestion tick. On error nothing is appended and `ingestor` is unchanged.
pub async fn run_one_tick<S: CounterSource>(
    source: &S,
    history: &HistoryStore,
    ingestor: &mut Ingestor,
) -> anyhow::Result<()> {
    let reading = source.read().await?;
    let sample = ingestor.record(&reading, Local::now());
    history.append(sample);
    Ok(())
}

pub fn spawn<S: CounterSource + 'static>(
    deps: WorkerDeps<S>,
    config: WorkerConfig,
) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        source,
        history,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        sample_interval_ms,
        stats_log_interval_secs,
    } = config;

    tokio::spawn(async move {
        let mut ingestor = match source.read().await {
            Ok(reading) => Ingestor::new(Some(reading.io)),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    operation = "read_counters",
                    "baseline counter read failed"
                );
                Ingestor::default()
            }
        };

        let mut tick = interval(Duration::from_millis(sample_interval_ms));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // Baseline read above stands in for the immediate first tick.
        tick.tick().await;

        let mut samples_recorded_total: u64 = 0;
        let mut ticks_failed_total: u64 = 0;

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    match run_one_tick(source.as_ref(), &history, &mut ingestor).await {
                        Ok(()) => samples_recorded_total += 1,
                        Err(e) => {
                            ticks_failed_total += 1;
                            tracing::warn!(
                                error = %e,
                                operation = "ingest_tick",
                                "counter read failed, skipping tick"
                            );
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        samples_retained = history.len(),
                        samples_recorded_total,
                        ticks_failed_total,
                        "app stats"
                    );
                }
            }
        }
    }
    .instrument(tracing::debug_span!("worker", sample_interval_ms)))
}
