// src/process/validate.rs
//
// Label-first table validation. Split tables keep or lose their place in the
// final output here: an explicit "Commodity" label is trusted outright, and
// only unlabeled tables go through the structural checks. Thresholds are
// tuned against USDA FAS report formatting.

use tracing::debug;

use crate::config::PipelineConfig;
use crate::table::{row_text, Table};

/// Rows inspected for commodity labels; headers often span several lines.
const HEADER_ROWS: usize = 20;
/// Longest cell tolerated in the leading columns before a grid stops looking
/// like a table.
const MAX_CELL_LEN: usize = 100;
/// Leading columns subjected to the cell-length check.
const STRUCTURE_COLS: usize = 5;
/// Minimum share of digit characters for a plausible data table.
const MIN_DIGIT_DENSITY: f64 = 0.02;

/// Story-telling words; tables that use two or more of these are prose that
/// the extractor mistook for a grid. Connectives like "in"/"of" are absent
/// on purpose since valid headers use them ("Prices in Pesos").
const STOP_WORDS: &[&str] = &[" the ", " is ", " that ", " are ", " with ", " they ", " was "];

fn full_text(table: &Table) -> String {
    let mut text = String::new();
    for row in &table.rows {
        text.push(' ');
        text.push_str(&row_text(row).to_lowercase());
    }
    text.push(' ');
    text
}

fn is_narrative_text(table: &Table) -> bool {
    let text = full_text(table);
    let hits = STOP_WORDS.iter().filter(|w| text.contains(*w)).count();
    hits >= 2
}

fn is_valid_data_structure(table: &Table) -> bool {
    for row in &table.rows {
        for cell in row.iter().take(STRUCTURE_COLS) {
            if cell.trim().len() > MAX_CELL_LEN {
                return false;
            }
        }
    }

    let text = full_text(table);
    let total = text.chars().filter(|c| !c.is_whitespace()).count();
    if total == 0 {
        return false;
    }
    let digits = text.chars().filter(|c| c.is_ascii_digit()).count();
    digits as f64 / total as f64 >= MIN_DIGIT_DENSITY
}

/// Decide whether `table` is a table for the target commodity.
///
/// Priority 1 — trust the label: a "Commodity" row in the header chunk that
/// names the target keeps the table immediately; one that names a different
/// recognized commodity rejects it.
///
/// Priority 2 — unlabeled tables must not read like prose, must look like a
/// data grid, and must mention the target without mentioning any other
/// recognized commodity.
pub fn is_target_table(table: &Table, config: &PipelineConfig) -> bool {
    let others: Vec<&str> = config
        .commodities
        .iter()
        .filter(|c| !c.eq_ignore_ascii_case(&config.target))
        .map(|c| c.as_str())
        .collect();

    for row in table.rows.iter().take(HEADER_ROWS) {
        let text = row_text(row).to_lowercase();
        if !text.contains("commodity") {
            continue;
        }
        if config.label_matches(&config.target, &text) {
            return true;
        }
        if others.iter().any(|&c| config.label_matches(c, &text)) {
            debug!(row = %text, "labeled for another commodity");
            return false;
        }
    }

    if is_narrative_text(table) {
        debug!("rejected: narrative text");
        return false;
    }
    if !is_valid_data_structure(table) {
        debug!("rejected: not a data grid");
        return false;
    }

    let header_chunk = Table::new(table.rows.iter().take(HEADER_ROWS).cloned().collect());
    let chunk_text = full_text(&header_chunk);
    let mentions_target = config.label_matches(&config.target, &chunk_text);
    let mentions_other = others.iter().any(|&c| config.label_matches(c, &chunk_text));
    mentions_target && !mentions_other
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(raw: &[&[&str]]) -> Table {
        Table::new(
            raw.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn config() -> PipelineConfig {
        PipelineConfig::default()
    }

    #[test]
    fn explicit_commodity_label_is_trusted() {
        let t = table(&[
            &["Country", "Philippines"],
            &["Commodity", "Rice, Milled"],
            &["the quick brown fox is here with them"],
        ]);
        // label wins even though the body would fail the prose check
        assert!(is_target_table(&t, &config()));
    }

    #[test]
    fn explicit_mismatch_is_rejected() {
        let t = table(&[
            &["Commodity", "Corn"],
            &["Jan", "23.0"],
            &["Feb", "23.5"],
        ]);
        assert!(!is_target_table(&t, &config()));
    }

    #[test]
    fn narrative_blocks_are_rejected() {
        let t = table(&[&[
            "The harvest is expected to improve and they are confident that yields will rise",
        ]]);
        assert!(!is_target_table(&t, &config()));
    }

    #[test]
    fn low_digit_density_is_rejected() {
        let t = table(&[&["Rice", "notes"], &["various", "qualitative"], &["words", "only"]]);
        assert!(!is_target_table(&t, &config()));
    }

    #[test]
    fn unlabeled_rice_grid_is_kept() {
        let t = table(&[
            &["Rice retail", "2023", "2024"],
            &["Jan", "41.2", "43.1"],
            &["Feb", "42.0", "43.8"],
        ]);
        assert!(is_target_table(&t, &config()));
    }

    #[test]
    fn mixed_commodity_grid_is_rejected() {
        let t = table(&[
            &["Rice", "Corn"],
            &["41.2", "23.0"],
        ]);
        assert!(!is_target_table(&t, &config()));
    }
}
