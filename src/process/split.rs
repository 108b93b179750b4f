// src/process/split.rs
use tracing::debug;

use crate::config::PipelineConfig;
use crate::process::stitch::StitchedTable;
use crate::table::Table;

/// A contiguous run of rows belonging to one commodity, delimited by the
/// label row that opened it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// The recognized commodity label (canonical spelling from config).
    pub label: String,
    /// The row that marked the start of this section, kept verbatim so the
    /// original row sequence can be reconstructed.
    pub marker_row: Vec<String>,
    /// Data rows of the section, in order. Does not include the marker row.
    pub rows: Vec<Vec<String>>,
    /// Column schema carried over from the stitched table.
    pub header: Vec<String>,
}

impl Section {
    /// The section as a standalone table: schema header plus data rows.
    pub fn to_table(&self) -> Table {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.push(self.header.clone());
        rows.extend(self.rows.iter().cloned());
        Table::new(rows)
    }
}

/// Result of partitioning one stitched table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitOutcome {
    /// Sections in document order. Sections never overlap.
    pub sections: Vec<Section>,
    /// Rows that appeared before the first recognized label row. Kept for
    /// traceability; no downstream stage consumes them.
    pub preamble: Vec<Vec<String>>,
}

impl SplitOutcome {
    pub fn section(&self, label: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.label == label)
    }
}

/// Partition a stitched table into per-commodity sections. A row whose cell
/// at the configured label column matches a recognized commodity opens a new
/// section; every following row belongs to it until the next label row or
/// the end of the table. Rows before the first label row (including the
/// schema header itself) land in the preamble. Strictly forward, single
/// pass.
#[tracing::instrument(level = "info", skip(stitched, config), fields(rows = stitched.table.row_count()))]
pub fn split_commodities(stitched: &StitchedTable, config: &PipelineConfig) -> SplitOutcome {
    let header = stitched.table.header().map(<[String]>::to_vec).unwrap_or_default();
    let mut outcome = SplitOutcome::default();
    let mut open: Option<Section> = None;

    for row in &stitched.table.rows {
        let label_cell = row.get(config.label_column).map(String::as_str).unwrap_or("");
        if let Some(label) = config.recognized_label(label_cell) {
            debug!(label, "section boundary");
            outcome.sections.extend(open.take());
            open = Some(Section {
                label: label.to_string(),
                marker_row: row.clone(),
                rows: Vec::new(),
                header: header.clone(),
            });
            continue;
        }
        match open.as_mut() {
            Some(section) => section.rows.push(row.clone()),
            // Unrecognized rows before any label are preamble.
            None => outcome.preamble.push(row.clone()),
        }
    }
    outcome.sections.extend(open);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stitched(rows: &[&[&str]]) -> StitchedTable {
        StitchedTable {
            table: Table::new(
                rows.iter()
                    .map(|r| r.iter().map(|c| c.to_string()).collect())
                    .collect(),
            ),
            first_page: 0,
            last_page: 0,
        }
    }

    fn config() -> PipelineConfig {
        PipelineConfig::default()
    }

    #[test]
    fn splits_label_delimited_sections() {
        let table = stitched(&[
            &["Rice", ""],
            &["Jan", "41.2"],
            &["Feb", "42.0"],
            &["Corn", ""],
            &["Jan", "23.0"],
            &["Feb", "23.5"],
            &["Mar", "24.1"],
        ]);
        let outcome = split_commodities(&table, &config());
        assert_eq!(outcome.sections.len(), 2);
        assert_eq!(outcome.section("Rice").unwrap().rows.len(), 2);
        assert_eq!(outcome.section("Corn").unwrap().rows.len(), 3);
        // the schema header row ("Rice" here) opened the first section, so
        // nothing precedes it
        assert!(outcome.preamble.is_empty());
    }

    #[test]
    fn rows_before_first_label_are_preamble() {
        let table = stitched(&[
            &["Month", "Price"],
            &["Weekly retail prices", ""],
            &["Rice", ""],
            &["Jan", "41.2"],
        ]);
        let outcome = split_commodities(&table, &config());
        assert_eq!(outcome.preamble.len(), 2);
        assert_eq!(outcome.sections.len(), 1);
        assert_eq!(outcome.sections[0].rows.len(), 1);
        assert_eq!(outcome.sections[0].header, vec!["Month", "Price"]);
    }

    #[test]
    fn no_recognized_labels_means_all_preamble() {
        let table = stitched(&[&["Month", "Price"], &["Jan", "41.2"]]);
        let outcome = split_commodities(&table, &config());
        assert!(outcome.sections.is_empty());
        assert_eq!(outcome.preamble.len(), 2);
    }

    #[test]
    fn splitting_is_idempotent() {
        let table = stitched(&[
            &["Rice", ""],
            &["Jan", "41.2"],
            &["Corn", ""],
            &["Jan", "23.0"],
        ]);
        let first = split_commodities(&table, &config());
        let second = split_commodities(&table, &config());
        assert_eq!(first, second);
    }

    #[test]
    fn sections_and_preamble_reconstruct_the_input() {
        let table = stitched(&[
            &["a note", ""],
            &["Rice", ""],
            &["Jan", "41.2"],
            &["Wheat", ""],
            &["Jan", "30.1"],
            &["Feb", "30.4"],
        ]);
        let outcome = split_commodities(&table, &config());

        let mut rebuilt = outcome.preamble.clone();
        for section in &outcome.sections {
            rebuilt.push(section.marker_row.clone());
            rebuilt.extend(section.rows.iter().cloned());
        }
        assert_eq!(rebuilt, table.table.rows);
    }

    #[test]
    fn label_column_is_configurable() {
        let cfg = PipelineConfig {
            label_column: 1,
            ..PipelineConfig::default()
        };
        let table = stitched(&[&["Commodity:", "Rice"], &["Jan", "41.2"]]);
        let outcome = split_commodities(&table, &cfg);
        assert_eq!(outcome.sections.len(), 1);
        assert_eq!(outcome.sections[0].label, "Rice");
    }
}
