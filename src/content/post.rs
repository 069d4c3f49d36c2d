//! Post models and the fields derived from a post body

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker appended to excerpts cut from the body
pub const EXCERPT_ELLIPSIS: &str = "...";

/// Everything a listing shows about a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMeta {
    /// File stem of `<slug>.md`
    pub slug: String,

    pub title: String,

    /// Publication date in UTC, newest first in listings
    pub date: DateTime<Utc>,

    pub excerpt: String,

    pub author: String,

    /// Tags in front-matter order, original case
    pub tags: Vec<String>,

    /// Estimated minutes to read, never below 1
    pub read_time: u32,

    pub featured: bool,

    pub image: Option<String>,
}

/// A post with its rendered body, as shown on its own page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(flatten)]
    pub meta: PostMeta,

    /// Body rendered to HTML
    pub content: String,
}

impl Post {
    /// Drop the rendered body, keeping only listing metadata
    pub fn into_meta(self) -> PostMeta {
        self.meta
    }
}

/// Minutes needed to read `body` at `words_per_minute`, rounded up.
///
/// Words are runs of non-whitespace. The result is at least 1, even for an
/// empty body.
pub fn read_time(body: &str, words_per_minute: usize) -> u32 {
    let words = body.split_whitespace().count();
    let minutes = words.div_ceil(words_per_minute.max(1));
    u32::try_from(minutes).unwrap_or(u32::MAX).max(1)
}

/// The first `length` characters of the raw body followed by an ellipsis.
///
/// Cuts on character boundaries, not words.
pub fn fallback_excerpt(body: &str, length: usize) -> String {
    let mut excerpt: String = body.chars().take(length).collect();
    excerpt.push_str(EXCERPT_ELLIPSIS);
    excerpt
}
