//! postdeck: typed loading of front-matter blog posts
//!
//! Reads Markdown posts with a YAML (or JSON) front-matter block, derives
//! excerpts and summaries, and hands an external site renderer the
//! published posts newest first. Rendering itself happens elsewhere.

pub mod config;
pub mod content;
pub mod error;
pub mod export;
pub mod helpers;
pub mod logging;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use content::{Post, PostCollection, PostDate};
pub use error::{Diagnostic, PostError};

/// A blog rooted at a directory holding `_config.yml`
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory the post documents live in
    pub posts_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let posts_dir = base_dir.join(&config.source_dir).join(&config.posts_dir);

        Self {
            config,
            base_dir,
            posts_dir,
        }
    }

    /// Load every post; failures are reported, not fatal
    pub fn load(&self) -> content::loader::LoadReport {
        content::loader::PostLoader::new(&self.config).load_dir(&self.posts_dir)
    }

    /// Parse a single document held in memory
    pub fn parse(&self, source: &str, text: &str) -> Result<Post, PostError> {
        Post::from_document(source, text, &self.config)
    }

    /// JSON index of the published posts
    pub fn export_json(&self, collection: &PostCollection) -> Result<String> {
        Ok(export::to_json(collection, &self.config)?)
    }
}
