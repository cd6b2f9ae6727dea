//! Post model

use indexmap::{IndexMap, IndexSet};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use super::date::PostDate;
use super::excerpt::{split_excerpt, summarize, Excerpt};
use super::FrontMatter;
use crate::config::SiteConfig;
use crate::error::{PostError, Result};

lazy_static! {
    /// Jekyll style `2018-06-23-` filename prefix
    static ref DATE_PREFIX: Regex = Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}-").unwrap();
}

/// A blog post.
///
/// Built once from a document and never changed afterwards; an edit is a
/// new `Post` parsed from the edited text.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    source: String,
    slug: String,
    title: String,
    date: PostDate,
    excerpt_marker: String,
    front_matter: FrontMatter,
    body: String,
}

impl Post {
    /// Parse one document.
    ///
    /// `source` identifies the document in diagnostics and drives the slug;
    /// posts without an `excerpt_separator` use the one from `config`.
    pub fn from_document(source: &str, text: &str, config: &SiteConfig) -> Result<Self> {
        let (front_matter, body) = FrontMatter::parse(text)?;

        let title = front_matter
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(PostError::MissingRequiredField("title"))?
            .to_string();
        let date = front_matter
            .date
            .ok_or(PostError::MissingRequiredField("date"))?;

        let excerpt_marker = front_matter
            .excerpt_separator
            .clone()
            .unwrap_or_else(|| config.excerpt_separator.clone());

        let slug = slug_for(source, &title);

        tracing::debug!("Parsed post {:?} ({}) dated {}", source, title, date);

        Ok(Self {
            source: source.to_string(),
            slug,
            title,
            date,
            excerpt_marker,
            front_matter,
            body: body.to_string(),
        })
    }

    /// Document identifier, usually the path below the posts directory
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> PostDate {
        self.date
    }

    pub fn description(&self) -> Option<&str> {
        self.front_matter.description.as_deref()
    }

    pub fn keywords(&self) -> &IndexSet<String> {
        &self.front_matter.keywords
    }

    pub fn categories(&self) -> &[String] {
        &self.front_matter.categories
    }

    pub fn tags(&self) -> &IndexSet<String> {
        &self.front_matter.tags
    }

    pub fn published(&self) -> bool {
        self.front_matter.published
    }

    pub fn author(&self) -> Option<&str> {
        self.front_matter.author.as_deref()
    }

    pub fn layout(&self) -> Option<&str> {
        self.front_matter.layout.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.front_matter.icon.as_deref()
    }

    pub fn blog(&self) -> Option<bool> {
        self.front_matter.blog
    }

    pub fn show_sidebar(&self) -> Option<bool> {
        self.front_matter.show_sidebar
    }

    pub fn excerpt_marker(&self) -> &str {
        &self.excerpt_marker
    }

    /// Raw body text after the front-matter block
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Front-matter keys this crate does not interpret
    pub fn extra(&self) -> &IndexMap<String, serde_yaml::Value> {
        &self.front_matter.extra
    }

    pub fn front_matter(&self) -> &FrontMatter {
        &self.front_matter
    }

    pub fn excerpt(&self) -> Excerpt<'_> {
        split_excerpt(&self.body, &self.excerpt_marker)
    }

    /// `desc` when present, otherwise plain text taken from the excerpt
    pub fn summary(&self, max_chars: usize) -> String {
        match self.description() {
            Some(desc) => desc.to_string(),
            None => summarize(self.excerpt().excerpt, max_chars),
        }
    }

    /// The whole document again: front-matter block followed by the body
    pub fn to_source(&self) -> Result<String> {
        let mut out = self.front_matter.to_yaml_block()?;
        out.push_str(&self.body);
        Ok(out)
    }
}

/// Slug from the file stem without its date prefix, or from the title
fn slug_for(source: &str, title: &str) -> String {
    let stem = Path::new(source)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let stem = DATE_PREFIX.replace(stem, "");

    let slug = slug::slugify(stem.as_ref());
    if slug.is_empty() {
        slug::slugify(title)
    } else {
        slug
    }
}
