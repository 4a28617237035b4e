// History file: JSON list of samples, whole-buffer overwrite.
// Writes go to a temp file in the same directory and are renamed over the target,
// so a crash mid-write leaves the previous file intact.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::instrument;

use crate::models::Sample;

/// Loads persisted samples. Missing, unreadable, malformed or non-list content
/// yields an empty history; startup never fails here. Individual records that
/// do not parse are skipped.
#[instrument(skip(path), fields(repo = "history_file", operation = "load", path = %path.display()))]
pub fn load(path: &Path) -> Vec<Sample> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("no history file, starting empty");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(error = %e, "history file unreadable, starting empty");
            return Vec::new();
        }
    };
    let records = match serde_json::from_str::<Vec<serde_json::Value>>(&content) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(error = %e, "history file malformed, starting empty");
            return Vec::new();
        }
    };
    let total = records.len();
    let samples: Vec<Sample> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Sample>(record) {
            Ok(sample) => Some(sample),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed history record");
                None
            }
        })
        .collect();
    tracing::info!(
        samples_count = samples.len(),
        skipped = total - samples.len(),
        "history loaded"
    );
    samples
}

/// Writes `samples` to `path` (blocking I/O runs off the async workers).
pub async fn save(path: &Path, samples: Vec<Sample>) -> anyhow::Result<()> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || save_blocking(&path, &samples))
        .await
        .map_err(|e| anyhow::anyhow!("history save task join: {}", e))?
}

pub fn save_blocking(path: &Path, samples: &[Sample]) -> anyhow::Result<()> {
    let dir = parent_dir(path);
    std::fs::create_dir_all(&dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer(&mut writer, samples)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| anyhow::anyhow!("rename into {}: {}", path.display(), e.error))?;
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
