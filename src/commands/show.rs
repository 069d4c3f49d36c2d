//! Show a single post

use anyhow::Result;
use std::fmt::Write;

use crate::content::Post;
use crate::Folio;

/// Print a post, or fail if there is no such post
pub fn run(folio: &Folio, slug: &str, json: bool) -> Result<()> {
    let Some(post) = folio.repository().get_post(slug) else {
        anyhow::bail!("post not found: {}", slug);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&post)?);
    } else {
        print!("{}", format_post(&post));
    }
    Ok(())
}

/// Human-readable detail view
pub fn format_post(post: &Post) -> String {
    let meta = &post.meta;
    let mut out = String::new();

    let _ = writeln!(out, "{}", meta.title);
    let _ = writeln!(
        out,
        "{} | {} | {} min read",
        meta.author,
        meta.date.format("%B %-d, %Y"),
        meta.read_time
    );
    if !meta.tags.is_empty() {
        let _ = writeln!(out, "Tags: {}", meta.tags.join(", "));
    }
    if let Some(image) = &meta.image {
        let _ = writeln!(out, "Image: {}", image);
    }
    out.push('\n');
    out.push_str(&post.content);
    out
}
