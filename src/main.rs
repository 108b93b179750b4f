use anyhow::Result;
use fasscraper::{
    config::PipelineConfig,
    fetch,
    history::{load_processed, record_processed, ProcessedRecord},
    pipeline::{run_document, BatchSummary, Outcome},
};
use reqwest::Client;
use std::{fs, path::PathBuf, time::Duration};
use tokio::time::sleep;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) load config & prepare dirs ───────────────────────────────
    let config = PipelineConfig::load("fasscraper.yaml")?;
    for d in [
        &config.pdfs_dir,
        &config.stitched_dir,
        &config.split_dir,
        &config.filtered_dir,
        &config.history_dir,
    ] {
        fs::create_dir_all(d)?;
    }

    // ─── 3) download report PDFs, one at a time ──────────────────────
    let client = Client::new();
    let links = fetch::links::read_links(&config.links_file)?;
    info!(count = links.len(), "links loaded");

    let mut pdf_paths: Vec<PathBuf> = Vec::new();
    for (i, url) in links.iter().enumerate() {
        match fetch::pdfs::download_pdf(&client, url, &config.pdfs_dir).await {
            Ok(path) => pdf_paths.push(path),
            // a failed download skips that report; the batch keeps going
            Err(err) => error!(%url, %err, "download failed"),
        }
        if i + 1 < links.len() {
            sleep(Duration::from_secs(config.download_delay_secs)).await;
        }
    }

    // also pick up PDFs dropped into the input directory by hand
    let pattern = format!("{}/*.pdf", config.pdfs_dir.display());
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if !pdf_paths.contains(&path) {
            pdf_paths.push(path);
        }
    }

    if pdf_paths.is_empty() {
        info!("no PDFs to process; exit");
        return Ok(());
    }

    // ─── 4) skip documents already in the ledger ─────────────────────
    let processed = load_processed(&config.history_dir)?;
    info!(count = processed.len(), "documents already done");

    // ─── 5) process each PDF sequentially ────────────────────────────
    let mut summary = BatchSummary::default();
    for pdf_path in pdf_paths {
        let name = pdf_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if processed.contains(&name) {
            info!(file = %name, "already processed; skipping");
            continue;
        }

        // table extraction is CPU-bound; keep it off the runtime threads
        let report = {
            let config = config.clone();
            let pdf_path = pdf_path.clone();
            tokio::task::spawn_blocking(move || run_document(&pdf_path, &config)).await?
        };

        if let Outcome::Completed(counts) = &report.outcome {
            record_processed(
                &config.history_dir,
                &ProcessedRecord {
                    filename: name,
                    stitched_tables: counts.stitched_tables,
                    sections: counts.sections,
                    filtered_tables: counts.filtered_tables,
                    finished_at: chrono::Utc::now(),
                },
            )?;
        }
        summary.push(report);
    }

    // ─── 6) summary ──────────────────────────────────────────────────
    summary.log();
    info!("all done");
    Ok(())
}
