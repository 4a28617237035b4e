// Counter source: CPU/memory gauges and cumulative network/disk counters via sysinfo

mod linux;

use std::future::Future;
use std::sync::Arc;

use sysinfo::{Disks, Networks, System};
use tracing::instrument;

use crate::models::{CounterReading, IoCounters};

const LOOPBACK_INTERFACE: &str = "lo";

/// Produces one reading per ingestion tick. Implementations return absolute
/// cumulative counters; the ingestion loop computes deltas.
pub trait CounterSource: Send + Sync {
    fn read(&self) -> impl Future<Output = anyhow::Result<CounterReading>> + Send;
}

pub struct SysinfoRepo {
    sys: Arc<std::sync::Mutex<System>>,
    disks: Arc<std::sync::Mutex<Disks>>,
    networks: Arc<std::sync::Mutex<Networks>>,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoRepo {
    pub fn new() -> Self {
        let mut sys = System::new();
        // Baseline for the first usage delta.
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();
        Self {
            sys: Arc::new(std::sync::Mutex::new(sys)),
            disks: Arc::new(std::sync::Mutex::new(disks)),
            networks: Arc::new(std::sync::Mutex::new(networks)),
        }
    }

    async fn read_gauges(&self) -> anyhow::Result<(f64, f64)> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_cpu_usage();
            sys.refresh_memory();

            let cpu = (sys.global_cpu_usage() as f64).clamp(0.0, 100.0);
            let total = sys.total_memory();
            let used = total.saturating_sub(sys.available_memory());
            let memory = if total > 0 {
                (used as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            Ok((cpu, memory))
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    async fn read_network_totals(&self) -> anyhow::Result<(u64, u64)> {
        let networks = self.networks.clone();
        tokio::task::spawn_blocking(move || {
            let mut networks_guard = networks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo networks lock poisoned: {}", e))?;
            networks_guard.refresh(true);
            let (sent, recv) = networks_guard
                .list()
                .iter()
                .filter(|(name, _)| name.as_str() != LOOPBACK_INTERFACE)
                .fold((0u64, 0u64), |(sent, recv), (_, data)| {
                    (
                        sent.saturating_add(data.total_transmitted()),
                        recv.saturating_add(data.total_received()),
                    )
                });
            Ok((sent, recv))
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    async fn read_disk_totals(&self) -> anyhow::Result<(u64, u64)> {
        let disks = self.disks.clone();
        tokio::task::spawn_blocking(move || {
            if let Some(totals) = linux::read_block_device_totals() {
                return Ok(totals);
            }
            let mut disks_guard = disks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo disks lock poisoned: {}", e))?;
            disks_guard.refresh(true);
            let totals = disks_guard
                .list()
                .iter()
                .fold((0u64, 0u64), |(read, written), d| {
                    let usage = d.usage();
                    (
                        read.saturating_add(usage.total_read_bytes),
                        written.saturating_add(usage.total_written_bytes),
                    )
                });
            Ok(totals)
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }
}

impl CounterSource for SysinfoRepo {
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "read_counters"))]
    async fn read(&self) -> anyhow::Result<CounterReading> {
        let (cpu_percent, memory_percent) = self.read_gauges().await?;
        let (net_sent_bytes, net_recv_bytes) = self.read_network_totals().await?;
        let (disk_read_bytes, disk_write_bytes) = self.read_disk_totals().await?;
        Ok(CounterReading {
            cpu_percent,
            memory_percent,
            io: IoCounters {
                net_sent_bytes,
                net_recv_bytes,
                disk_read_bytes,
                disk_write_bytes,
            },
        })
    }
}
