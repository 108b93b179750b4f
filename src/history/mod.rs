// src/history/mod.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::warn;

const LEDGER_FILE: &str = "processed.jsonl";

/// One completed document run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedRecord {
    pub filename: String,
    pub stitched_tables: usize,
    pub sections: usize,
    pub filtered_tables: usize,
    pub finished_at: DateTime<Utc>,
}

fn ledger_path(history_dir: &Path) -> PathBuf {
    history_dir.join(LEDGER_FILE)
}

/// Filenames of documents that already completed a pipeline run. A missing
/// ledger just means nothing is done yet. Unparseable lines are skipped with
/// a warning so a truncated write can't wedge the batch.
pub fn load_processed(history_dir: impl AsRef<Path>) -> Result<HashSet<String>> {
    let path = ledger_path(history_dir.as_ref());
    if !path.exists() {
        return Ok(HashSet::new());
    }
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("reading ledger {:?}", path))?;

    let mut set = HashSet::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ProcessedRecord>(line) {
            Ok(record) => {
                set.insert(record.filename);
            }
            Err(err) => warn!(line = lineno + 1, %err, "skipping bad ledger line"),
        }
    }
    Ok(set)
}

/// Append one record to the ledger, creating the directory on first use.
pub fn record_processed(history_dir: impl AsRef<Path>, record: &ProcessedRecord) -> Result<()> {
    let history_dir = history_dir.as_ref();
    std::fs::create_dir_all(history_dir)
        .with_context(|| format!("creating history directory {:?}", history_dir))?;
    let path = ledger_path(history_dir);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening ledger {:?}", path))?;
    let line = serde_json::to_string(record).context("serializing ledger record")?;
    writeln!(file, "{}", line).with_context(|| format!("appending to {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> ProcessedRecord {
        ProcessedRecord {
            filename: name.into(),
            stitched_tables: 2,
            sections: 3,
            filtered_tables: 1,
            finished_at: Utc::now(),
        }
    }

    #[test]
    fn round_trips_processed_names() -> Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(load_processed(dir.path())?.is_empty());

        record_processed(dir.path(), &record("a.pdf"))?;
        record_processed(dir.path(), &record("b.pdf"))?;

        let names = load_processed(dir.path())?;
        assert_eq!(names.len(), 2);
        assert!(names.contains("a.pdf"));
        assert!(names.contains("b.pdf"));
        Ok(())
    }

    #[test]
    fn bad_lines_are_skipped() -> Result<()> {
        let dir = tempfile::tempdir()?;
        record_processed(dir.path(), &record("good.pdf"))?;
        std::fs::write(
            ledger_path(dir.path()),
            format!(
                "{}\nnot json\n",
                serde_json::to_string(&record("good.pdf"))?
            ),
        )?;
        let names = load_processed(dir.path())?;
        assert_eq!(names.len(), 1);
        Ok(())
    }
}
