// Counter source readings and per-tick deltas

const BYTES_PER_KIB: u64 = 1024;

/// Absolute cumulative byte counters since boot (or since the interface/disk appeared).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoCounters {
    pub net_sent_bytes: u64,
    pub net_recv_bytes: u64,
    pub disk_read_bytes: u64,
    pub disk_write_bytes: u64,
}

/// One reading from the counter source: instantaneous gauges plus cumulative counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterReading {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub io: IoCounters,
}

/// Activity between two consecutive counter readings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IoDeltas {
    pub net_sent_kib: u64,
    pub net_recv_kib: u64,
    pub disk_read_kib: f64,
    pub disk_write_kib: f64,
}

impl IoCounters {
    /// Deltas against `prev`. A counter that went backwards (reboot, interface
    /// removed, wraparound) yields 0 for that field.
    pub fn deltas_since(&self, prev: &IoCounters) -> IoDeltas {
        let net_sent = self.net_sent_bytes.saturating_sub(prev.net_sent_bytes);
        let net_recv = self.net_recv_bytes.saturating_sub(prev.net_recv_bytes);
        let disk_read = self.disk_read_bytes.saturating_sub(prev.disk_read_bytes);
        let disk_write = self.disk_write_bytes.saturating_sub(prev.disk_write_bytes);
        IoDeltas {
            net_sent_kib: net_sent / BYTES_PER_KIB,
            net_recv_kib: net_recv / BYTES_PER_KIB,
            disk_read_kib: disk_read as f64 / BYTES_PER_KIB as f64,
            disk_write_kib: disk_write as f64 / BYTES_PER_KIB as f64,
        }
    }
}
