use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::images::ImagesConfig;
use crate::query::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::scoring::ScoringConfig;

pub const DEFAULT_DATASET: &str = "data/gt/gt.jsonl";
pub const DEFAULT_COLLECTIONS_DIR: &str = "data/spider";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub images: ImagesConfig,

    /// Where review progress is kept (default: ~/.config/dongjeop/review.json)
    #[serde(default)]
    pub review_state: Option<PathBuf>,

    /// Rows per page when --limit is not given
    #[serde(default)]
    pub page_size: Option<usize>,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
}

impl Config {
    pub fn page_size(&self) -> usize {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// Data locations. Each entry is a local path or an http(s) URL.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SourcesConfig {
    #[serde(default)]
    pub dataset: Option<String>,
    #[serde(default)]
    pub reviewed: Option<String>,
    #[serde(default)]
    pub queue: Option<String>,
    #[serde(default)]
    pub collections_dir: Option<PathBuf>,
}

impl SourcesConfig {
    pub fn dataset(&self) -> &str {
        self.dataset.as_deref().unwrap_or(DEFAULT_DATASET)
    }

    pub fn collections_dir(&self) -> PathBuf {
        self.collections_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_COLLECTIONS_DIR))
    }
}
