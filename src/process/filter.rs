// src/process/filter.rs
use regex::RegexSet;
use tracing::debug;

use crate::config::PipelineConfig;
use crate::process::split::Section;
use crate::process::stitch::StitchedTable;
use crate::table::{is_blank_row, row_text, Table};

/// Blank rows and rows matching a configured noise pattern (footers, page
/// numbers) carry no data.
pub fn is_noise_row(row: &[String], noise: &RegexSet) -> bool {
    is_blank_row(row) || noise.is_match(&row_text(row))
}

/// Filter a section that the splitter already isolated to one commodity:
/// every row passes unchanged except blanks and noise. The schema header is
/// kept as the first row of the output.
#[tracing::instrument(level = "debug", skip_all, fields(label = %section.label))]
pub fn filter_section(section: &Section, noise: &RegexSet) -> Table {
    let mut out = Table::new(vec![section.header.clone()]);
    for row in &section.rows {
        if is_noise_row(row, noise) {
            debug!(row = %row_text(row), "dropping noise row");
            continue;
        }
        out.push_row(row.clone());
    }
    out
}

/// Drop blank and noise rows, keeping everything else (header included).
pub fn strip_noise(table: &Table, noise: &RegexSet) -> Table {
    Table::new(
        table
            .rows
            .iter()
            .filter(|row| !is_noise_row(row, noise))
            .cloned()
            .collect(),
    )
}

/// Fallback for when splitting was skipped: keep the header plus rows whose
/// identifying column names the target commodity, minus noise.
#[tracing::instrument(level = "debug", skip_all, fields(target = %target))]
pub fn filter_table(
    stitched: &StitchedTable,
    target: &str,
    config: &PipelineConfig,
) -> anyhow::Result<Table> {
    let noise = config.noise_set()?;
    let mut out = Table::default();
    for (idx, row) in stitched.table.rows.iter().enumerate() {
        if idx == 0 {
            out.push_row(row.clone());
            continue;
        }
        if is_noise_row(row, &noise) {
            continue;
        }
        let cell = row.get(config.label_column).map(String::as_str).unwrap_or("");
        if config.label_matches(target, cell) {
            out.push_row(row.clone());
        }
    }
    Ok(out)
}
