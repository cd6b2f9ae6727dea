//! Per-document error taxonomy

use std::fmt;

use thiserror::Error;

/// Why a single document could not become a [`Post`](crate::content::Post)
#[derive(Debug, Error)]
pub enum PostError {
    /// Front-matter block is absent, truncated, or holds an undecodable value
    #[error("malformed front-matter: {0}")]
    MalformedMetadata(String),

    /// A field every post must carry was not set
    #[error("missing required field `{0}`")]
    MissingRequiredField(&'static str),

    /// The document could not be read at all
    #[error("unreadable source: {0}")]
    UnreadableSource(#[from] std::io::Error),
}

impl PostError {
    pub(crate) fn malformed(reason: impl fmt::Display) -> Self {
        PostError::MalformedMetadata(reason.to_string())
    }
}

pub type Result<T, E = PostError> = std::result::Result<T, E>;

/// A failed document, reported next to the posts that did load
#[derive(Debug)]
pub struct Diagnostic {
    /// Identifier of the offending document (path relative to the posts dir)
    pub source: String,
    pub error: PostError,
}

impl Diagnostic {
    pub fn new(source: impl Into<String>, error: PostError) -> Self {
        Self {
            source: source.into(),
            error,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.error)
    }
}
