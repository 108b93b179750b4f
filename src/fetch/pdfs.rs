// src/fetch/pdfs.rs
use anyhow::{Context, Result};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;
use url::Url;

static CD_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"filename="?([^";]+)"?"#).expect("content-disposition regex"));

/// Pull a filename out of a Content-Disposition header value.
fn filename_from_content_disposition(value: &str) -> Option<String> {
    CD_FILENAME
        .captures(value)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Filename for a report URL, in the order the reports site makes reliable:
/// Content-Disposition header, then a `filename=` query parameter, then the
/// last URL path segment, then a timestamped fallback.
fn resolve_filename(url: &Url, content_disposition: Option<&str>) -> String {
    if let Some(name) = content_disposition.and_then(filename_from_content_disposition) {
        return sanitize(&name);
    }
    if let Some((_, name)) = url.query_pairs().find(|(k, _)| k == "filename") {
        if !name.is_empty() {
            return sanitize(&name);
        }
    }
    if let Some(name) = url
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
    {
        return sanitize(name);
    }
    format!("report_{}.pdf", Utc::now().timestamp())
}

/// Keep only the final path component and drop characters that don't belong
/// in a filename.
fn sanitize(name: &str) -> String {
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    name.chars()
        .filter(|c| !matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect()
}

/// Download one PDF into `dest_dir`, returning the saved path. A file
/// already on disk is not re-downloaded. No retries.
pub async fn download_pdf(client: &Client, url: &Url, dest_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dest_dir = dest_dir.as_ref();
    fs::create_dir_all(dest_dir)
        .await
        .with_context(|| format!("creating {:?}", dest_dir))?;

    let resp = client
        .get(url.as_str())
        .send()
        .await
        .with_context(|| format!("requesting {}", url))?
        .error_for_status()
        .with_context(|| format!("fetching {}", url))?;

    let content_disposition = resp
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let filename = resolve_filename(url, content_disposition.as_deref());
    let dest_path = dest_dir.join(&filename);

    if dest_path.exists() {
        info!(name = %filename, "already on disk; skipping download");
        return Ok(dest_path);
    }

    let bytes = resp
        .bytes()
        .await
        .with_context(|| format!("reading body of {}", url))?;
    fs::write(&dest_path, &bytes)
        .await
        .with_context(|| format!("writing {:?}", dest_path))?;
    info!(name = %filename, bytes = bytes.len(), "downloaded");

    Ok(dest_path)
}
