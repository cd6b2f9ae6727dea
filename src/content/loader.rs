//! Content loader - loads posts from the posts directory

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use super::{Post, PostCollection};
use crate::config::SiteConfig;
use crate::error::{Diagnostic, PostError};

/// Outcome of loading a directory: the posts that parsed and why the rest did not
#[derive(Debug, Default)]
pub struct LoadReport {
    pub collection: PostCollection,
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Loads post documents from disk
pub struct PostLoader<'a> {
    config: &'a SiteConfig,
}

impl<'a> PostLoader<'a> {
    /// Create a new post loader
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// Load every post document below `dir`.
    ///
    /// A document that fails to read or parse is reported in
    /// `diagnostics` and the remaining documents still load.
    pub fn load_dir(&self, dir: &Path) -> LoadReport {
        let mut report = LoadReport::default();

        if !dir.exists() {
            tracing::debug!("Posts directory {:?} does not exist", dir);
            return report;
        }

        for entry in WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name().to_str()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let source = e
                        .path()
                        .map(|p| source_id(dir, p))
                        .unwrap_or_else(|| source_id(dir, dir));
                    let diagnostic = Diagnostic::new(source, io::Error::from(e).into());
                    tracing::warn!("Failed to read {}", diagnostic);
                    report.diagnostics.push(diagnostic);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !self.is_post_document(path) {
                continue;
            }

            let source = source_id(dir, path);
            match self.load_file(&source, path) {
                Ok(post) => report.collection.push(post),
                Err(error) => {
                    let diagnostic = Diagnostic::new(source, error);
                    tracing::warn!("Failed to load post {}", diagnostic);
                    report.diagnostics.push(diagnostic);
                }
            }
        }

        tracing::info!(
            "Loaded {} posts from {:?} ({} failed)",
            report.collection.len(),
            dir,
            report.diagnostics.len()
        );

        report
    }

    /// Load a single post from a file
    pub fn load_file(&self, source: &str, path: &Path) -> Result<Post, PostError> {
        let content = fs::read_to_string(path)?;
        Post::from_document(source, &content, self.config)
    }

    fn is_post_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.config.is_markdown_ext(e))
            .unwrap_or(false)
    }
}

fn is_hidden(name: Option<&str>) -> bool {
    name.map(|n| n.starts_with('.')).unwrap_or(false)
}

/// Path below the posts directory, with `/` separators
fn source_id(dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(dir).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn sample_dir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir,
            "2018-06-23-rvalue.md",
            "---\ntitle: Rvalues\ndate: 2018-06-23\n---\nIntro<!--more-->rest",
        );
        write(
            &dir,
            "2019/2019-01-05-lambdas.markdown",
            "---\ntitle: Lambdas\ndate: 2019-01-05\n---\nBody",
        );
        write(
            &dir,
            "2020-02-02-no-date.md",
            "---\ntitle: Missing date\n---\nBody",
        );
        write(
            &dir,
            "2020-03-03-draft.md",
            "---\ntitle: Draft\ndate: 2020-03-03\npublished: false\n---\nBody",
        );
        write(&dir, "2020-04-04-broken.md", "no front matter at all");
        write(&dir, "notes.txt", "not a post");
        write(&dir, ".hidden/2021-01-01-x.md", "---\ntitle: x\ndate: 2021-01-01\n---\n");
        dir
    }

    #[test]
    fn test_load_dir_reports_failures_and_keeps_going() {
        let dir = sample_dir();
        let config = SiteConfig::default();
        let report = PostLoader::new(&config).load_dir(dir.path());

        assert_eq!(report.collection.len(), 3);
        assert!(!report.is_clean());

        let failed: Vec<&str> = report.diagnostics.iter().map(|d| d.source.as_str()).collect();
        assert_eq!(failed, vec!["2020-02-02-no-date.md", "2020-04-04-broken.md"]);
        assert!(matches!(
            report.diagnostics[0].error,
            PostError::MissingRequiredField("date")
        ));
        assert!(matches!(
            report.diagnostics[1].error,
            PostError::MalformedMetadata(_)
        ));

        let listed: Vec<&str> = report.collection.listing().map(|p| p.source()).collect();
        assert_eq!(listed, vec!["2019/2019-01-05-lambdas.markdown", "2018-06-23-rvalue.md"]);
        assert!(report.collection.get("2020-03-03-draft.md").is_some());
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig::default();
        let report = PostLoader::new(&config).load_dir(&dir.path().join("nope"));
        assert!(report.collection.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig::default();
        let err = PostLoader::new(&config)
            .load_file("gone.md", &dir.path().join("gone.md"))
            .unwrap_err();
        assert!(matches!(err, PostError::UnreadableSource(_)));
    }

    #[test]
    fn test_invalid_utf8_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bin.md"), [0xff, 0xfe, 0x00]).unwrap();
        let config = SiteConfig::default();
        let report = PostLoader::new(&config).load_dir(dir.path());
        assert_eq!(report.diagnostics.len(), 1);
        assert!(matches!(
            report.diagnostics[0].error,
            PostError::UnreadableSource(_)
        ));
    }
}
