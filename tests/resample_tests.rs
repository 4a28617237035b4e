// Downsampling tests: period filter, step lookup, chunk averaging and labeling

mod common;

use common::{now_secs, ramp, sample};
use hostmon::history_repo::resample::{StepRule, StepTable, filter_by_period, resample};
use hostmon::models::Sample;

fn steps() -> StepTable {
    StepTable::default()
}

#[test]
fn step_lookup_is_exact_with_pass_through_default() {
    let t = steps();
    assert_eq!(t.step_for(0.5), 1);
    assert_eq!(t.step_for(8.0), 16);
    assert_eq!(t.step_for(24.0), 48);
    assert_eq!(t.step_for(168.0), 336);
    assert_eq!(t.step_for(7.999), 1);
    assert_eq!(t.step_for(1.0), 1);
    assert_eq!(t.step_for(0.0), 1);
    assert!(t.contains(24.0));
    assert!(!t.contains(12.0));
}

#[test]
fn filter_keeps_samples_inside_period_in_order() {
    let now = 10_000.0;
    let samples = vec![
        sample(now - 3600.0, 1.0),
        sample(now - 1800.0, 2.0),
        sample(now - 1799.0, 3.0),
        sample(now, 4.0),
    ];
    let out = filter_by_period(&samples, 0.5, now);
    assert_eq!(
        out.iter().map(|s| s.cpu_percent).collect::<Vec<_>>(),
        vec![2.0, 3.0, 4.0],
        "cutoff is inclusive"
    );
}

#[test]
fn empty_input_gives_empty_output_for_every_period() {
    for period in [0.5, 8.0, 24.0, 168.0, 3.0] {
        let filtered = filter_by_period(&[], period, now_secs());
        assert!(filtered.is_empty());
        assert!(resample(&filtered, period, &steps()).is_empty());
    }
}

#[test]
fn finest_period_passes_samples_through_unchanged() {
    let now = now_secs();
    let mut samples = ramp(30, now);
    samples[3].cpu_percent = 12.345;
    samples[4].disk_read_kib = 0.75;
    let filtered = filter_by_period(&samples, 0.5, now);
    assert_eq!(resample(&filtered, 0.5, &steps()), filtered);
}

#[test]
fn unknown_period_falls_back_to_no_averaging() {
    let now = now_secs();
    let mut samples = ramp(20, now);
    samples[0].cpu_percent = 4.4;
    let filtered = filter_by_period(&samples, 3.0, now);
    let out = resample(&filtered, 3.0, &steps());
    assert_eq!(out.len(), 20);
    assert_eq!(out, filtered);
}

#[test]
fn eight_hours_over_twenty_samples_gives_two_chunks() {
    let now = now_secs();
    let samples = ramp(20, now);
    let filtered = filter_by_period(&samples, 8.0, now);
    assert_eq!(filtered.len(), 20);

    let out = resample(&filtered, 8.0, &steps());
    assert_eq!(out.len(), 2);
    // Samples 1..=16: mean 42.5, ties to even.
    assert_eq!(out[0].cpu_percent, 42.0);
    // Samples 17..=20: mean 92.5, ties to even.
    assert_eq!(out[1].cpu_percent, 92.0);
}

#[test]
fn chunk_takes_label_and_timestamp_from_its_last_sample() {
    let now = now_secs();
    let samples = ramp(20, now);
    let out = resample(&samples, 8.0, &steps());
    assert_eq!(out[0].timestamp, samples[15].timestamp);
    assert_eq!(out[0].wall_clock_label, samples[15].wall_clock_label);
    assert_eq!(out[1].timestamp, samples[19].timestamp);
    assert_eq!(out[1].wall_clock_label, samples[19].wall_clock_label);
}

#[test]
fn every_numeric_field_is_averaged_and_rounded() {
    let mk = |cpu: f64, mem: f64, sent: u64, recv: u64, read: f64, write: f64| Sample {
        wall_clock_label: String::new(),
        timestamp: 0.0,
        cpu_percent: cpu,
        memory_percent: mem,
        net_sent_kib: sent,
        net_recv_kib: recv,
        disk_read_kib: read,
        disk_write_kib: write,
    };
    let chunk = vec![
        mk(10.0, 50.0, 1, 10, 0.5, 100.0),
        mk(11.0, 51.0, 2, 11, 1.0, 200.0),
        mk(13.0, 52.0, 2, 13, 1.5, 301.0),
    ];
    let table = StepTable::new(vec![StepRule {
        period_hours: 1.0,
        step: 3,
    }]);
    let out = resample(&chunk, 1.0, &table);
    assert_eq!(out.len(), 1);
    let r = &out[0];
    assert_eq!(r.cpu_percent, 11.0); // 11.33
    assert_eq!(r.memory_percent, 51.0);
    assert_eq!(r.net_sent_kib, 2); // 1.67
    assert_eq!(r.net_recv_kib, 11); // 11.33
    assert_eq!(r.disk_read_kib, 1.0);
    assert_eq!(r.disk_write_kib, 200.0); // 200.33
}

#[test]
fn rounding_is_half_to_even() {
    let table = StepTable::new(vec![StepRule {
        period_hours: 1.0,
        step: 2,
    }]);
    let pair = |a: f64, b: f64| vec![sample(1.0, a), sample(2.0, b)];
    let cpu = |v: Vec<Sample>| resample(&v, 1.0, &table)[0].cpu_percent;
    assert_eq!(cpu(pair(0.0, 1.0)), 0.0); // 0.5
    assert_eq!(cpu(pair(1.0, 2.0)), 2.0); // 1.5
    assert_eq!(cpu(pair(2.0, 3.0)), 2.0); // 2.5
    assert_eq!(cpu(pair(3.0, 4.0)), 4.0); // 3.5
    assert_eq!(cpu(pair(3.0, 3.2)), 3.0); // 3.1
    assert_eq!(cpu(pair(3.0, 4.2)), 4.0); // 3.6
}

#[test]
fn output_length_is_ceil_of_input_over_step() {
    let now = now_secs();
    for (period, step) in [(8.0, 16usize), (24.0, 48), (168.0, 336)] {
        for n in [1usize, step - 1, step, step + 1, 3 * step, 3 * step + 7] {
            let samples = ramp(n, now);
            let out = resample(&samples, period, &steps());
            assert_eq!(out.len(), n.div_ceil(step), "period {} n {}", period, n);
        }
    }
}

#[test]
fn output_is_chronological() {
    let now = now_secs();
    let samples = ramp(1000, now);
    for period in [0.5, 8.0, 24.0, 168.0] {
        let out = resample(&filter_by_period(&samples, period, now), period, &steps());
        assert!(
            out.windows(2).all(|w| w[0].timestamp <= w[1].timestamp),
            "period {}",
            period
        );
    }
}
