//! Errors raised while loading a single post.
//!
//! None of these leave the crate's query surface: [`BlogRepository`] logs them
//! and reports the post as absent.
//!
//! [`BlogRepository`]: super::BlogRepository

use std::path::PathBuf;
use thiserror::Error;

/// Why a front-matter block could not be read
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unterminated JSON front-matter")]
    UnterminatedJson,
}

/// Why a post could not be produced from its source file
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse front-matter in {path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error("invalid slug: {0:?}")]
    InvalidSlug(String),
}

impl ContentError {
    /// Missing files are an expected state, everything else deserves a warning
    pub fn is_not_found(&self) -> bool {
        match self {
            ContentError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            ContentError::InvalidSlug(_) => true,
            ContentError::FrontMatter { .. } => false,
        }
    }
}
