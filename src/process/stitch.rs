// src/process/stitch.rs
use tracing::debug;

use crate::extract::PageTable;
use crate::table::Table;

/// A logical table reassembled from one or more consecutive page fragments
/// sharing the same header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StitchedTable {
    pub table: Table,
    /// 0-based page index of the first contributing fragment.
    pub first_page: usize,
    /// 0-based page index of the last contributing fragment.
    pub last_page: usize,
}

impl StitchedTable {
    fn open(piece: &PageTable) -> Self {
        Self {
            table: piece.table.clone(),
            first_page: piece.page,
            last_page: piece.page,
        }
    }
}

/// Walk the per-page tables in document order and concatenate fragments of
/// the same logical table. The first row of each fragment is the candidate
/// header: when it equals the open table's header (cells trimmed and
/// case-folded, exact sequence match, no fuzz), the fragment's remaining
/// rows are appended and the repeated header is dropped. Any other header
/// closes the open table and seeds a new one.
///
/// Row order is preserved within and across pages; repeated headers are the
/// only rows removed.
#[tracing::instrument(level = "info", skip(pieces), fields(fragments = pieces.len()))]
pub fn stitch_pages(pieces: &[PageTable]) -> Vec<StitchedTable> {
    let mut stitched: Vec<StitchedTable> = Vec::new();
    let mut current: Option<StitchedTable> = None;

    for piece in pieces {
        if piece.table.is_empty() {
            continue;
        }
        match current.as_mut() {
            Some(open)
                if open.table.normalized_header() == piece.table.normalized_header() =>
            {
                debug!(
                    page = piece.page,
                    rows = piece.table.row_count() - 1,
                    "header match; appending fragment"
                );
                open.table.rows.extend(piece.table.rows[1..].iter().cloned());
                open.last_page = piece.page;
            }
            Some(_) => {
                // Header mismatch delimits tables; it is not a failure.
                debug!(page = piece.page, "new header; closing table");
                stitched.extend(current.take());
                current = Some(StitchedTable::open(piece));
            }
            None => current = Some(StitchedTable::open(piece)),
        }
    }
    stitched.extend(current);
    stitched
}
