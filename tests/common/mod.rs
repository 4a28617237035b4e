// Shared test helpers
#![allow(dead_code)]

use hostmon::models::*;
use hostmon::sysinfo_repo::CounterSource;
use std::collections::VecDeque;
use std::sync::Mutex;

pub const TEST_CONFIG: &str = r#"
[server]
port = 5553
host = "127.0.0.1"

[storage]
path = "data/history.json"
persist_interval_secs = 300
retention_hours = 168

[monitoring]
sample_interval_ms = 3000
stats_log_interval_secs = 60
"#;

pub fn now_secs() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs_f64()
}

pub fn sample(timestamp: f64, cpu_percent: f64) -> Sample {
    Sample {
        wall_clock_label: format!("t{}", timestamp),
        timestamp,
        cpu_percent,
        memory_percent: 50.0,
        net_sent_kib: 0,
        net_recv_kib: 0,
        disk_read_kib: 0.0,
        disk_write_kib: 0.0,
    }
}

/// `n` samples one second apart ending at `end`, cpu = 5 * i for i in 1..=n.
pub fn ramp(n: usize, end: f64) -> Vec<Sample> {
    (1..=n)
        .map(|i| sample(end - (n - i) as f64, (i * 5) as f64))
        .collect()
}

pub fn reading(cpu_percent: f64, io: IoCounters) -> CounterReading {
    CounterReading {
        cpu_percent,
        memory_percent: 40.0,
        io,
    }
}

pub fn counters(net_sent: u64, net_recv: u64, disk_read: u64, disk_write: u64) -> IoCounters {
    IoCounters {
        net_sent_bytes: net_sent,
        net_recv_bytes: net_recv,
        disk_read_bytes: disk_read,
        disk_write_bytes: disk_write,
    }
}

/// Counter source replaying scripted results; once exhausted it keeps
/// returning the last successful reading.
pub struct ScriptedSource {
    script: Mutex<VecDeque<anyhow::Result<CounterReading>>>,
    last: Mutex<Option<CounterReading>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<anyhow::Result<CounterReading>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
        }
    }
}

impl CounterSource for ScriptedSource {
    async fn read(&self) -> anyhow::Result<CounterReading> {
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(r)) => {
                *self.last.lock().unwrap() = Some(r);
                Ok(r)
            }
            Some(Err(e)) => Err(e),
            None => (*self.last.lock().unwrap())
                .ok_or_else(|| anyhow::anyhow!("script exhausted")),
        }
    }
}
