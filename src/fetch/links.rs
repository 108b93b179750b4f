// src/fetch/links.rs
use anyhow::{Context, Result};
use std::path::Path;
use tracing::warn;
use url::Url;

/// Read the report link list: one URL per line, `#` comments and blank
/// lines skipped. Lines that don't parse as absolute URLs are logged and
/// dropped rather than failing the batch.
pub fn read_links(path: impl AsRef<Path>) -> Result<Vec<Url>> {
    let path = path.as_ref();
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading link list {:?}", path))?;

    let mut links = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match Url::parse(line) {
            Ok(url) => links.push(url),
            Err(err) => warn!(line = lineno + 1, %err, "skipping invalid URL"),
        }
    }
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_urls_and_skips_comments_and_junk() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(
            file,
            "# USDA FAS links\n\nhttps://apps.fas.usda.gov/report.pdf\nnot a url\nhttps://example.com/r2.pdf  "
        )?;
        let links = read_links(file.path())?;
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].as_str(), "https://apps.fas.usda.gov/report.pdf");
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_links("no/such/links.txt").is_err());
    }
}
