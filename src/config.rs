// src/config.rs
use anyhow::{Context, Result};
use regex::RegexSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// How a recognized commodity label is matched against a row cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMatch {
    /// Cell equals the label after trimming, case-insensitive.
    Exact,
    /// Cell contains the label as a whole-word run, case-insensitive.
    Substring,
}

/// Pipeline configuration, loaded from `fasscraper.yaml` when present.
/// Report formatting drifts across years, so the label and noise sets are
/// configuration rather than constants.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Recognized commodity-section labels.
    pub commodities: Vec<String>,
    /// The commodity whose tables survive filtering.
    pub target: String,
    /// Column holding the commodity label in data rows.
    pub label_column: usize,
    pub label_match: LabelMatch,
    /// Regexes matched against the joined text of a row; matches are dropped
    /// as footer/noise.
    pub noise_patterns: Vec<String>,
    /// Polite pause between PDF downloads.
    pub download_delay_secs: u64,
    pub links_file: PathBuf,
    pub pdfs_dir: PathBuf,
    pub stitched_dir: PathBuf,
    pub split_dir: PathBuf,
    pub filtered_dir: PathBuf,
    pub history_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            commodities: vec!["Rice".into(), "Corn".into(), "Wheat".into()],
            target: "Rice".into(),
            label_column: 0,
            label_match: LabelMatch::Substring,
            noise_patterns: vec![
                r"^Source:".into(),
                r"^Page \d+$".into(),
                r"^\d+$".into(),
            ],
            download_delay_secs: 2,
            links_file: PathBuf::from("links.txt"),
            pdfs_dir: PathBuf::from("pdfs"),
            stitched_dir: PathBuf::from("stitched"),
            split_dir: PathBuf::from("split"),
            filtered_dir: PathBuf::from("filtered"),
            history_dir: PathBuf::from("history"),
        }
    }
}

impl PipelineConfig {
    /// Load from a YAML file, or fall back to defaults when the file is
    /// absent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("no config at {:?}; using defaults", path);
            return Ok(Self::default());
        }
        let text =
            std::fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        let config: Self =
            serde_yaml::from_str(&text).with_context(|| format!("parsing config {:?}", path))?;
        Ok(config)
    }

    /// Compile the noise patterns once per run.
    pub fn noise_set(&self) -> Result<RegexSet> {
        RegexSet::new(&self.noise_patterns).context("compiling noise patterns")
    }

    /// True when `cell` names the given commodity label under the configured
    /// match policy. Substring matching is word-bounded so that e.g.
    /// "prices" never matches "rice".
    pub fn label_matches(&self, label: &str, cell: &str) -> bool {
        let cell = cell.trim().to_lowercase();
        let label = label.trim().to_lowercase();
        match self.label_match {
            LabelMatch::Exact => cell == label,
            LabelMatch::Substring => {
                let cell_words: Vec<&str> = cell
                    .split(|c: char| !c.is_alphanumeric())
                    .filter(|w| !w.is_empty())
                    .collect();
                let label_words: Vec<&str> = label.split_whitespace().collect();
                !label_words.is_empty()
                    && cell_words
                        .windows(label_words.len())
                        .any(|run| run == label_words)
            }
        }
    }

    /// The first recognized commodity matching `cell`, if any.
    pub fn recognized_label<'a>(&'a self, cell: &str) -> Option<&'a str> {
        self.commodities
            .iter()
            .find(|label| self.label_matches(label.as_str(), cell))
            .map(|s| s.as_str())
    }
}
