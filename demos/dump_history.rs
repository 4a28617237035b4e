// Print a persisted history file as the /data endpoint would serve it.
//
// Usage: cargo run --example dump_history -- [HISTORY_PATH] [PERIOD_HOURS]
//   HISTORY_PATH  default: ./data/history.json
//   PERIOD_HOURS  default: 0.5

use hostmon::history_repo::resample::{StepTable, filter_by_period, resample};
use hostmon::history_repo::{file, unix_now_secs};
use std::env;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let path = args
        .get(1)
        .map(String::as_str)
        .unwrap_or("./data/history.json");
    let period: f64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(0.5);

    let samples = file::load(Path::new(path));
    let window = filter_by_period(&samples, period, unix_now_secs());
    let out = resample(&window, period, &StepTable::default());

    println!("{}", serde_json::to_string_pretty(&out)?);
    eprintln!(
        "{} stored, {} in last {}h, {} after resampling",
        samples.len(),
        window.len(),
        period,
        out.len()
    );
    Ok(())
}
