//! Create a new post

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::Folio;

/// Front-matter written for a new post
#[derive(Serialize)]
struct Scaffold<'a> {
    title: &'a str,
    date: String,
    tags: &'a [String],
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    featured: bool,
}

/// Write `<slug>.md` with front-matter into the content directory
pub fn create_post(
    folio: &Folio,
    title: &str,
    slug: Option<&str>,
    tags: &[String],
    featured: bool,
) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from {:?}", title);
    }

    fs::create_dir_all(&folio.content_dir)?;

    let file_path = folio.content_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let scaffold = Scaffold {
        title,
        date: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        tags,
        featured,
    };
    let content = format!("---\n{}---\n\n", serde_yaml::to_string(&scaffold)?);

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}
