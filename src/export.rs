//! JSON export of the published listing for an external renderer

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::{Post, PostCollection, PostDate};
use crate::helpers::{date_xml, format_date};

/// One listed post with everything a template needs
#[derive(Debug, Serialize)]
pub struct PostRecord<'a> {
    pub source: &'a str,
    pub slug: &'a str,
    pub title: &'a str,
    pub date: PostDate,
    pub date_display: String,
    pub date_xml: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_sidebar: Option<bool>,
    pub keywords: &'a IndexSet<String>,
    pub categories: &'a [String],
    pub tags: &'a IndexSet<String>,
    pub excerpt: &'a str,
    pub summary: String,
    pub body: &'a str,
    #[serde(skip_serializing_if = "no_extra")]
    pub extra: &'a IndexMap<String, serde_yaml::Value>,
}

fn no_extra(extra: &&IndexMap<String, serde_yaml::Value>) -> bool {
    extra.is_empty()
}

impl<'a> PostRecord<'a> {
    pub fn new(post: &'a Post, config: &SiteConfig) -> Self {
        Self {
            source: post.source(),
            slug: post.slug(),
            title: post.title(),
            date: post.date(),
            date_display: format_date(&post.date(), &config.date_format),
            date_xml: date_xml(&post.date()),
            description: post.description(),
            author: post.author(),
            layout: post.layout(),
            icon: post.icon(),
            blog: post.blog(),
            show_sidebar: post.show_sidebar(),
            keywords: post.keywords(),
            categories: post.categories(),
            tags: post.tags(),
            excerpt: post.excerpt().excerpt,
            summary: post.summary(config.summary_length),
            body: post.body(),
            extra: post.extra(),
        }
    }
}

/// Site-level index: listed posts plus tag and category groupings by slug
#[derive(Debug, Serialize)]
pub struct SiteIndex<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub posts: Vec<PostRecord<'a>>,
    pub tags: IndexMap<String, Vec<&'a str>>,
    pub categories: IndexMap<String, Vec<&'a str>>,
}

impl<'a> SiteIndex<'a> {
    pub fn new(collection: &'a PostCollection, config: &'a SiteConfig) -> Self {
        Self {
            title: &config.title,
            description: &config.description,
            posts: collection
                .listing()
                .map(|post| PostRecord::new(post, config))
                .collect(),
            tags: slugs(collection.tags()),
            categories: slugs(collection.categories()),
        }
    }
}

fn slugs<'a>(groups: IndexMap<String, Vec<&'a Post>>) -> IndexMap<String, Vec<&'a str>> {
    groups
        .into_iter()
        .map(|(name, posts)| (name, posts.into_iter().map(Post::slug).collect()))
        .collect()
}

/// Pretty-printed JSON of the site index
pub fn to_json(collection: &PostCollection, config: &SiteConfig) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&SiteIndex::new(collection, config))
}
