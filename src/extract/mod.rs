// src/extract/mod.rs
use anyhow::{Context, Result};
use pdfplumber::{Pdf, TableSettings};
use std::path::Path;
use tracing::debug;

use crate::table::{clean_cell, Table};

/// One table as detected on one page, in document order.
#[derive(Debug, Clone)]
pub struct PageTable {
    /// 0-based page index.
    pub page: usize,
    pub table: Table,
}

/// Open `path` and pull every detected table off every page, preserving row
/// order and cell text as extracted. Pages with no detectable table simply
/// contribute nothing. An unreadable or malformed PDF is an error for this
/// document; the caller decides whether the batch continues.
#[tracing::instrument(level = "info", skip(path), fields(pdf = %path.as_ref().display()))]
pub fn extract_page_tables(path: impl AsRef<Path>) -> Result<Vec<PageTable>> {
    let path = path.as_ref();
    let pdf = Pdf::open_file(path, None).with_context(|| format!("unreadable PDF {:?}", path))?;

    let settings = TableSettings::default();
    let mut pieces = Vec::new();

    for page_result in pdf.pages_iter() {
        let page = page_result.with_context(|| format!("reading page of {:?}", path))?;
        let tables = page.find_tables(&settings);
        if tables.is_empty() {
            debug!(page = page.page_number(), "no table on page");
            continue;
        }
        for table in &tables {
            let rows: Vec<Vec<String>> = table
                .rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| clean_cell(cell.text.as_deref().unwrap_or("")))
                        .collect()
                })
                .collect();
            let table = Table::new(rows);
            if table.is_empty() {
                continue;
            }
            debug!(
                page = page.page_number(),
                rows = table.row_count(),
                cols = table.column_count(),
                "extracted table"
            );
            pieces.push(PageTable {
                page: page.page_number(),
                table,
            });
        }
    }

    Ok(pieces)
}
