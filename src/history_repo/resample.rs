// Downsampling: period filter + fixed-size chunk averaging (pure, no shared state).
// Step lookup is keyed by exact period value; unknown periods pass through.

use serde::Deserialize;

use crate::models::Sample;

const SECS_PER_HOUR: f64 = 3600.0;

/// Maps one requested period (hours) to a chunk size in samples.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct StepRule {
    pub period_hours: f64,
    pub step: usize,
}

/// Built-in period → step mapping used when `[resampling]` is absent from config.
pub fn default_step_rules() -> Vec<StepRule> {
    vec![
        StepRule {
            period_hours: 0.5,
            step: 1,
        },
        StepRule {
            period_hours: 8.0,
            step: 16,
        },
        StepRule {
            period_hours: 24.0,
            step: 48,
        },
        StepRule {
            period_hours: 168.0,
            step: 336,
        },
    ]
}

#[derive(Debug, Clone)]
pub struct StepTable {
    rules: Vec<StepRule>,
}

impl Default for StepTable {
    fn default() -> Self {
        Self::new(default_step_rules())
    }
}

impl StepTable {
    pub fn new(rules: Vec<StepRule>) -> Self {
        Self { rules }
    }

    /// Chunk size for `period_hours`; 1 when the period is not in the table.
    pub fn step_for(&self, period_hours: f64) -> usize {
        self.rules
            .iter()
            .find(|r| r.period_hours == period_hours)
            .map(|r| r.step.max(1))
            .unwrap_or(1)
    }

    pub fn contains(&self, period_hours: f64) -> bool {
        self.rules.iter().any(|r| r.period_hours == period_hours)
    }
}

/// Samples with `timestamp >= now - period_hours * 3600`, in original order.
pub fn filter_by_period(samples: &[Sample], period_hours: f64, now: f64) -> Vec<Sample> {
    let cutoff = now - period_hours * SECS_PER_HOUR;
    samples
        .iter()
        .filter(|s| s.timestamp >= cutoff)
        .cloned()
        .collect()
}

/// One record per consecutive chunk of `step` samples (last chunk may be short).
/// Label and timestamp come from the chunk's last sample; numeric fields are
/// chunk means rounded half-to-even. Step 1 returns the input unchanged.
pub fn resample(samples: &[Sample], period_hours: f64, steps: &StepTable) -> Vec<Sample> {
    let step = steps.step_for(period_hours);
    if step <= 1 {
        return samples.to_vec();
    }
    samples.chunks(step).filter_map(average_chunk).collect()
}

fn average_chunk(chunk: &[Sample]) -> Option<Sample> {
    let last = chunk.last()?;
    let mean = |field: fn(&Sample) -> f64| -> f64 {
        mean_f64(chunk.iter().map(field), chunk.len()).round_ties_even()
    };
    Some(Sample {
        wall_clock_label: last.wall_clock_label.clone(),
        timestamp: last.timestamp,
        cpu_percent: mean(|s| s.cpu_percent),
        memory_percent: mean(|s| s.memory_percent),
        net_sent_kib: mean(|s| s.net_sent_kib as f64) as u64,
        net_recv_kib: mean(|s| s.net_recv_kib as f64) as u64,
        disk_read_kib: mean(|s| s.disk_read_kib),
        disk_write_kib: mean(|s| s.disk_write_kib),
    })
}

fn mean_f64(values: impl Iterator<Item = f64>, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    values.sum::<f64>() / (len as f64)
}
