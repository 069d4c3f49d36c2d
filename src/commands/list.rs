//! List site content

use anyhow::Result;
use std::fmt::Write;

use crate::content::PostMeta;
use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    print!("{}", render(folio, content_type)?);
    Ok(())
}

/// List the posts carrying a tag
pub fn run_tag(folio: &Folio, tag: &str) -> Result<()> {
    let posts = folio.repository().list_posts_by_tag(tag);
    print!("{}", format_posts(&format!("Posts tagged {:?}", tag), &posts));
    Ok(())
}

/// Build the listing text for a content type
pub fn render(folio: &Folio, content_type: &str) -> Result<String> {
    let repo = folio.repository();

    let output = match content_type {
        "post" | "posts" => format_posts("Posts", &repo.list_posts()),
        "featured" => format_posts("Featured posts", &repo.list_featured_posts()),
        "tag" | "tags" => {
            let tags = repo.list_all_tags();
            let mut out = format!("Tags ({}):\n", tags.len());
            for tag in tags {
                let _ = writeln!(out, "  {}", tag);
            }
            out
        }
        "slug" | "slugs" => {
            let slugs = repo.list_slugs();
            let mut out = format!("Slugs ({}):\n", slugs.len());
            for slug in slugs {
                let _ = writeln!(out, "  {}", slug);
            }
            out
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, featured, tag, slug",
                content_type
            );
        }
    };

    Ok(output)
}

fn format_posts(heading: &str, posts: &[PostMeta]) -> String {
    let mut out = format!("{} ({}):\n", heading, posts.len());
    for post in posts {
        let _ = write!(
            out,
            "  {} - {} [{}] {} min",
            post.date.format("%Y-%m-%d"),
            post.title,
            post.slug,
            post.read_time
        );
        if post.featured {
            out.push_str(" *");
        }
        if !post.tags.is_empty() {
            let _ = write!(out, " #{}", post.tags.join(" #"));
        }
        out.push('\n');
    }
    out
}
