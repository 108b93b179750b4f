// src/pipeline.rs
//
// Per-document orchestration: extract → stitch → split → filter, with every
// stage's tables persisted as CSV. Stages hand typed tables to each other
// in-process; the CSV files exist so intermediate results can be audited.

use anyhow::Result;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::extract::{extract_page_tables, PageTable};
use crate::process::filter::{filter_section, filter_table, strip_noise};
use crate::process::split::split_commodities;
use crate::process::stitch::stitch_pages;
use crate::process::validate::is_target_table;
use crate::table::csv::write_table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Stitch,
    Split,
    Filter,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extract => "extract",
            Stage::Stitch => "stitch",
            Stage::Split => "split",
            Stage::Filter => "filter",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// A stage failure local to one document. The batch keeps going.
#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: anyhow::Error,
}

impl StageFailure {
    fn new(stage: Stage) -> impl FnOnce(anyhow::Error) -> Self {
        move |error| Self { stage, error }
    }
}

/// What one document's run produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentCounts {
    pub page_tables: usize,
    pub stitched_tables: usize,
    pub sections: usize,
    pub filtered_tables: usize,
}

#[derive(Debug)]
pub enum Outcome {
    Completed(DocumentCounts),
    /// The PDF was readable but no page had a detectable table.
    NoTables,
    Failed(StageFailure),
}

#[derive(Debug)]
pub struct DocumentReport {
    pub filename: String,
    pub outcome: Outcome,
}

/// Run the whole pipeline for one PDF. Never propagates an error out: any
/// stage failure becomes part of the report.
#[tracing::instrument(level = "info", skip_all, fields(pdf = %pdf_path.as_ref().display()))]
pub fn run_document(pdf_path: impl AsRef<Path>, config: &PipelineConfig) -> DocumentReport {
    let pdf_path = pdf_path.as_ref();
    let filename = pdf_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| pdf_path.display().to_string());
    let base = pdf_path
        .file_stem()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| filename.clone());

    let outcome = match extract_page_tables(pdf_path).map_err(StageFailure::new(Stage::Extract)) {
        Ok(pieces) if pieces.is_empty() => {
            info!("no tables found");
            Outcome::NoTables
        }
        Ok(pieces) => match process_pieces(&pieces, &base, config) {
            Ok(counts) => Outcome::Completed(counts),
            Err(failure) => Outcome::Failed(failure),
        },
        Err(failure) => Outcome::Failed(failure),
    };

    DocumentReport { filename, outcome }
}

/// The post-extraction pipeline body, separated so the stages can be
/// exercised without a PDF on disk.
pub fn process_pieces(
    pieces: &[PageTable],
    base: &str,
    config: &PipelineConfig,
) -> Result<DocumentCounts, StageFailure> {
    let noise = config.noise_set().map_err(StageFailure::new(Stage::Filter))?;
    let target_lower = config.target.to_lowercase();

    let mut counts = DocumentCounts {
        page_tables: pieces.len(),
        ..Default::default()
    };

    // ─── stitch ──────────────────────────────────────────────────────
    let stitched = stitch_pages(pieces);
    counts.stitched_tables = stitched.len();
    for (i, table) in stitched.iter().enumerate() {
        let path = config
            .stitched_dir
            .join(format!("{}_stitched_{}.csv", base, i + 1));
        write_table(&path, &table.table).map_err(StageFailure::new(Stage::Write))?;
    }

    // ─── split + filter ──────────────────────────────────────────────
    let mut filtered_index = 0usize;
    let mut label_index: HashMap<String, usize> = HashMap::new();
    for table in &stitched {
        let outcome = split_commodities(table, config);
        counts.sections += outcome.sections.len();

        for section in &outcome.sections {
            let label = section.label.to_lowercase();
            let n = label_index.entry(label.clone()).or_insert(0);
            *n += 1;
            let path = config
                .split_dir
                .join(format!("{}_{}_{}.csv", base, label, n));
            write_table(&path, &section.to_table()).map_err(StageFailure::new(Stage::Write))?;

            if !section.label.eq_ignore_ascii_case(&config.target) {
                continue;
            }
            // The splitter matched the label, so the section is trusted;
            // only row-level noise filtering remains.
            let filtered = filter_section(section, &noise);
            filtered_index += 1;
            let path = config
                .filtered_dir
                .join(format!("{}_{}_{}.csv", base, target_lower, filtered_index));
            write_table(&path, &filtered).map_err(StageFailure::new(Stage::Write))?;
            counts.filtered_tables += 1;
        }

        // A table with no labeled sections may still be a single-commodity
        // table for the target. Rows that carry the label in the identifying
        // column are row-filtered; a table identified only by its header is
        // kept whole, minus noise.
        if outcome.sections.is_empty() && is_target_table(&table.table, config) {
            let row_filtered = filter_table(table, &config.target, config)
                .map_err(StageFailure::new(Stage::Filter))?;
            let filtered = if row_filtered.row_count() > 1 {
                row_filtered
            } else {
                strip_noise(&table.table, &noise)
            };
            filtered_index += 1;
            let path = config
                .filtered_dir
                .join(format!("{}_{}_{}.csv", base, target_lower, filtered_index));
            write_table(&path, &filtered).map_err(StageFailure::new(Stage::Write))?;
            counts.filtered_tables += 1;
        }
    }

    info!(
        page_tables = counts.page_tables,
        stitched = counts.stitched_tables,
        sections = counts.sections,
        filtered = counts.filtered_tables,
        "document complete"
    );
    Ok(counts)
}

/// Batch-level rollup, logged once at the end of a run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub reports: Vec<DocumentReport>,
}

impl BatchSummary {
    pub fn push(&mut self, report: DocumentReport) {
        self.reports.push(report);
    }

    pub fn completed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Completed(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Failed(_)))
            .count()
    }

    /// One line per document plus a totals line.
    pub fn log(&self) {
        for report in &self.reports {
            match &report.outcome {
                Outcome::Completed(c) => info!(
                    file = %report.filename,
                    stitched = c.stitched_tables,
                    sections = c.sections,
                    filtered = c.filtered_tables,
                    "ok"
                ),
                Outcome::NoTables => info!(file = %report.filename, "no tables"),
                Outcome::Failed(f) => warn!(
                    file = %report.filename,
                    stage = %f.stage,
                    error = %f.error,
                    "failed"
                ),
            }
        }
        info!(
            total = self.reports.len(),
            completed = self.completed(),
            failed = self.failed(),
            "batch summary"
        );
    }
}
