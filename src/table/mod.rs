// src/table/mod.rs

pub mod csv;

/// A rectangular grid of cell strings, as pulled off a PDF page or read back
/// from an intermediate CSV. Row 0 is the header when the table has one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// First row, treated as the column schema.
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(|r| r.as_slice())
    }

    pub fn column_count(&self) -> usize {
        self.header().map(|h| h.len()).unwrap_or(0)
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Header cells trimmed and case-folded, for stitching comparisons.
    pub fn normalized_header(&self) -> Option<Vec<String>> {
        self.header().map(normalize_row)
    }
}

/// Trim whitespace and case-fold every cell of a row.
pub fn normalize_row(row: &[String]) -> Vec<String> {
    row.iter().map(|c| c.trim().to_lowercase()).collect()
}

/// Trim whitespace + strip outer quotes if present.
pub fn clean_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// True when every cell of the row is empty after trimming.
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

/// All cells of a row joined with single spaces, trimmed. Used for label and
/// noise matching where cell boundaries don't matter.
pub fn row_text(row: &[String]) -> String {
    let mut text = String::new();
    for cell in row {
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(cell);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn header_and_column_count() {
        let t = Table::new(vec![row(&["Month", "Rice", "Corn"]), row(&["Jan", "1", "2"])]);
        assert_eq!(t.header().unwrap(), &row(&["Month", "Rice", "Corn"])[..]);
        assert_eq!(t.column_count(), 3);
        assert_eq!(t.row_count(), 2);
    }

    #[test]
    fn normalized_header_folds_case_and_whitespace() {
        let t = Table::new(vec![row(&[" Month ", "RICE", "corn "])]);
        assert_eq!(t.normalized_header().unwrap(), row(&["month", "rice", "corn"]));
    }

    #[test]
    fn clean_cell_strips_outer_quotes() {
        assert_eq!(clean_cell("  \"Rice\"  "), "Rice");
        assert_eq!(clean_cell(" plain "), "plain");
        assert_eq!(clean_cell("\"\""), "");
    }

    #[test]
    fn blank_row_and_row_text() {
        assert!(is_blank_row(&row(&["", "  ", ""])));
        assert!(!is_blank_row(&row(&["", "x"])));
        assert_eq!(row_text(&row(&["Source:", "", "USDA FAS"])), "Source: USDA FAS");
    }
}
