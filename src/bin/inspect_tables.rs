// src/bin/inspect_tables.rs
//
// Debug tool: dump the raw per-page tables of one PDF before any stitching
// or filtering, to see exactly what the extractor hands the pipeline.
//
// Usage: cargo run --bin inspect_tables -- <report.pdf>

use anyhow::{bail, Result};
use fasscraper::extract::extract_page_tables;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: inspect_tables <report.pdf>");
    };

    let pieces = extract_page_tables(&path)?;
    if pieces.is_empty() {
        println!("no tables found in {}", path);
        return Ok(());
    }

    for piece in &pieces {
        println!(
            "--- page {} ({} rows x {} cols) ---",
            piece.page + 1,
            piece.table.row_count(),
            piece.table.column_count()
        );
        for row in &piece.table.rows {
            println!("  {:?}", row);
        }
        println!();
    }
    Ok(())
}
