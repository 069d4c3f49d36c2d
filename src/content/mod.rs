//! Content module - blog posts read from markdown files

mod error;
mod frontmatter;
mod markdown;
mod post;
mod repository;

pub use error::{ContentError, FrontMatterError};
pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use post::{fallback_excerpt, read_time, Post, PostMeta, EXCERPT_ELLIPSIS};
pub use repository::BlogRepository;
