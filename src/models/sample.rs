// History sample: one observation per ingestion tick (wire + file format)

use serde::{Deserialize, Serialize};

/// One timestamped resource-usage observation.
///
/// Field names on the wire and in the history file are the short dashboard
/// names (`time`, `cpu`, `network_sent`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Local `HH:MM:SS`, display only.
    #[serde(rename = "time")]
    pub wall_clock_label: String,
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
    #[serde(rename = "cpu")]
    pub cpu_percent: f64,
    #[serde(rename = "memory")]
    pub memory_percent: f64,
    #[serde(rename = "network_sent")]
    pub net_sent_kib: u64,
    #[serde(rename = "network_recv")]
    pub net_recv_kib: u64,
    #[serde(rename = "disk_read")]
    pub disk_read_kib: f64,
    #[serde(rename = "disk_write")]
    pub disk_write_kib: f64,
}
