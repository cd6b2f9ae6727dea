//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,

    // Directory
    pub source_dir: String,
    pub posts_dir: String,
    pub markdown_ext: Vec<String>,

    // Writing
    /// Marker used when a post sets no `excerpt_separator` of its own
    pub excerpt_separator: String,
    /// Maximum characters of a generated plain-text summary
    pub summary_length: usize,

    // Date / Time format (Moment.js style)
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),

            source_dir: ".".to_string(),
            posts_dir: "_posts".to_string(),
            markdown_ext: vec!["md".to_string(), "markdown".to_string()],

            excerpt_separator: "<!--more-->".to_string(),
            summary_length: 200,

            date_format: "YYYY-MM-DD".to_string(),

            extra: IndexMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        tracing::debug!("Loaded site config from {:?}", path);
        Ok(config)
    }

    /// Whether a file extension (without the dot) names a post document
    pub fn is_markdown_ext(&self, ext: &str) -> bool {
        self.markdown_ext
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}
