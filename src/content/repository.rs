//! Blog repository - answers post queries straight from the content directory
//!
//! Nothing is cached: every call rescans and rereads the files, so edits on
//! disk show up on the next query. Failures never escape. A directory that
//! can't be read holds no posts, and a file that can't be read or parsed is
//! simply not there.

use chrono::Utc;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use super::error::ContentError;
use super::post::{fallback_excerpt, read_time};
use super::{FrontMatter, MarkdownRenderer, Post, PostMeta};
use crate::config::SiteConfig;

/// Extension recognised as a post file
const POST_EXTENSION: &str = "md";

/// Values used where front-matter is silent
#[derive(Debug, Clone)]
struct PostDefaults {
    author: String,
    excerpt_length: usize,
    words_per_minute: usize,
}

/// Read-only view over a directory of `<slug>.md` files
#[derive(Clone)]
pub struct BlogRepository {
    root: PathBuf,
    defaults: PostDefaults,
    renderer: Arc<MarkdownRenderer>,
}

impl BlogRepository {
    /// Create a repository over `root`, taking defaults from `config`
    pub fn new<P: Into<PathBuf>>(root: P, config: &SiteConfig) -> Self {
        Self {
            root: root.into(),
            defaults: PostDefaults {
                author: config.author.clone(),
                excerpt_length: config.excerpt_length,
                words_per_minute: config.words_per_minute,
            },
            renderer: Arc::new(MarkdownRenderer::with_options(&config.highlight)),
        }
    }

    /// The content directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Slugs of every post file, in file name order
    pub fn list_slugs(&self) -> Vec<String> {
        let mut slugs = Vec::new();

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry in {:?}: {}", self.root, e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(slug) = slug_for(entry.path()) {
                slugs.push(slug.to_string());
            }
        }

        slugs
    }

    /// A single post with its rendered content, or `None` if it can't be loaded
    pub fn get_post(&self, slug: &str) -> Option<Post> {
        match self.load_post(slug) {
            Ok(post) => Some(post),
            Err(e) => {
                log_skipped(&e);
                None
            }
        }
    }

    /// Metadata for every loadable post, newest first
    pub fn list_posts(&self) -> Vec<PostMeta> {
        let mut posts: Vec<PostMeta> = self
            .list_slugs()
            .iter()
            .filter_map(|slug| self.get_post(slug))
            .map(Post::into_meta)
            .collect();

        // Stable, so equal dates keep file name order
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        posts
    }

    /// Posts flagged as featured, newest first
    pub fn list_featured_posts(&self) -> Vec<PostMeta> {
        self.list_posts()
            .into_iter()
            .filter(|post| post.featured)
            .collect()
    }

    /// Posts carrying `tag`, compared case-insensitively, newest first
    pub fn list_posts_by_tag(&self, tag: &str) -> Vec<PostMeta> {
        let wanted = tag.to_lowercase();
        self.list_posts()
            .into_iter()
            .filter(|post| post.tags.iter().any(|t| t.to_lowercase() == wanted))
            .collect()
    }

    /// Every distinct tag across all posts, sorted ascending.
    ///
    /// Only front-matter is read; bodies are never rendered.
    pub fn list_all_tags(&self) -> Vec<String> {
        let mut tags = BTreeSet::new();

        for slug in self.list_slugs() {
            match self.read_front_matter(&slug) {
                Ok(fm) => tags.extend(fm.tags),
                Err(e) => log_skipped(&e),
            }
        }

        tags.into_iter().collect()
    }

    fn post_path(&self, slug: &str) -> Result<PathBuf, ContentError> {
        if !is_valid_slug(slug) {
            return Err(ContentError::InvalidSlug(slug.to_string()));
        }
        Ok(self.root.join(format!("{}.{}", slug, POST_EXTENSION)))
    }

    fn read_source(&self, slug: &str) -> Result<(PathBuf, String), ContentError> {
        let path = self.post_path(slug)?;
        match fs::read_to_string(&path) {
            Ok(source) => Ok((path, source)),
            Err(source) => Err(ContentError::Io { path, source }),
        }
    }

    fn read_front_matter(&self, slug: &str) -> Result<FrontMatter, ContentError> {
        let (path, source) = self.read_source(slug)?;
        match FrontMatter::parse(&source) {
            Ok((fm, _)) => Ok(fm),
            Err(source) => Err(ContentError::FrontMatter { path, source }),
        }
    }

    /// Load a single post from its file
    fn load_post(&self, slug: &str) -> Result<Post, ContentError> {
        let (path, source) = self.read_source(slug)?;
        let (fm, body) = match FrontMatter::parse(&source) {
            Ok(parsed) => parsed,
            Err(source) => return Err(ContentError::FrontMatter { path, source }),
        };

        let date = match fm.parse_date() {
            Some(date) => date,
            None => {
                if let Some(raw) = &fm.date {
                    tracing::warn!("Unparsable date {:?} in {:?}, using now", raw, path);
                }
                Utc::now()
            }
        };

        let meta = PostMeta {
            slug: slug.to_string(),
            title: non_empty(fm.title).unwrap_or_else(|| "Untitled".to_string()),
            date,
            excerpt: non_empty(fm.excerpt)
                .unwrap_or_else(|| fallback_excerpt(body, self.defaults.excerpt_length)),
            author: non_empty(fm.author).unwrap_or_else(|| self.defaults.author.clone()),
            tags: fm.tags,
            read_time: read_time(body, self.defaults.words_per_minute),
            featured: fm.featured,
            image: non_empty(fm.image),
        };

        Ok(Post {
            meta,
            content: self.renderer.render(body),
        })
    }
}

/// The slug for a post file, if `path` is one
fn slug_for(path: &Path) -> Option<&str> {
    if path.extension().and_then(|e| e.to_str()) != Some(POST_EXTENSION) {
        return None;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| is_valid_slug(s))
}

/// Slugs name a file directly inside the content directory, never outside it
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\'])
        && !slug.contains("..")
}

/// Front-matter treats blank strings the same as missing keys
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn log_skipped(e: &ContentError) {
    if e.is_not_found() {
        tracing::debug!("Post not available: {}", e);
    } else {
        tracing::warn!("Skipping post: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn repo(dir: &Path) -> BlogRepository {
        BlogRepository::new(dir, &SiteConfig::default())
    }

    #[test]
    fn test_list_slugs_only_markdown() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b-post.md", "B");
        write(dir.path(), "a-post.md", "A");
        write(dir.path(), "notes.txt", "ignored");
        write(dir.path(), "draft.markdown", "ignored");
        write(dir.path(), ".hidden.md", "ignored");
        fs::create_dir(dir.path().join("nested.md")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        write(&dir.path().join("sub"), "deep.md", "ignored");

        assert_eq!(repo(dir.path()).list_slugs(), vec!["a-post", "b-post"]);
    }

    #[test]
    fn test_list_slugs_missing_directory() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir.path().join("does-not-exist"));
        assert!(repo.list_slugs().is_empty());
        assert!(repo.list_posts().is_empty());
        assert!(repo.list_all_tags().is_empty());
    }

    #[test]
    fn test_get_post_applies_defaults() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "bare.md", "Just a body with *emphasis*.");

        let before = Utc::now();
        let post = repo(dir.path()).get_post("bare").unwrap();

        assert_eq!(post.meta.slug, "bare");
        assert_eq!(post.meta.title, "Untitled");
        assert_eq!(post.meta.author, "Anand Jaiswal");
        assert_eq!(post.meta.excerpt, "Just a body with *emphasis*....");
        assert!(post.meta.tags.is_empty());
        assert!(!post.meta.featured);
        assert!(post.meta.image.is_none());
        assert_eq!(post.meta.read_time, 1);
        assert!(post.meta.date >= before);
        assert!(post.content.contains("<em>emphasis</em>"));
    }

    #[test]
    fn test_get_post_reads_front_matter() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "full.md",
            "---\ntitle: Full\ndate: 2024-03-01\nexcerpt: Custom\nauthor: Guest\ntags: [Rust, Web]\nfeatured: true\nimage: /img/full.png\n---\n# Heading\n",
        );

        let post = repo(dir.path()).get_post("full").unwrap();
        assert_eq!(post.meta.title, "Full");
        assert_eq!(post.meta.date.format("%Y-%m-%d").to_string(), "2024-03-01");
        assert_eq!(post.meta.excerpt, "Custom");
        assert_eq!(post.meta.author, "Guest");
        assert_eq!(post.meta.tags, vec!["Rust", "Web"]);
        assert!(post.meta.featured);
        assert_eq!(post.meta.image.as_deref(), Some("/img/full.png"));
        assert!(post.content.contains("<h1>Heading</h1>"));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "blank.md",
            "---\ntitle: \"\"\nauthor: \"\"\nimage: \"\"\n---\nBody",
        );

        let post = repo(dir.path()).get_post("blank").unwrap();
        assert_eq!(post.meta.title, "Untitled");
        assert_eq!(post.meta.author, "Anand Jaiswal");
        assert!(post.meta.image.is_none());
    }

    #[test]
    fn test_configured_author_is_the_default() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "post.md", "---\ntitle: T\n---\nBody");

        let config = SiteConfig {
            author: "Someone Else".to_string(),
            ..Default::default()
        };
        let post = BlogRepository::new(dir.path(), &config).get_post("post").unwrap();
        assert_eq!(post.meta.author, "Someone Else");
    }

    #[test]
    fn test_read_time_ignores_front_matter() {
        let dir = TempDir::new().unwrap();
        let body = vec!["word"; 401].join(" ");
        write(
            dir.path(),
            "long.md",
            &format!("---\ntitle: Long\nreadTime: 99\n---\n{}", body),
        );

        let post = repo(dir.path()).get_post("long").unwrap();
        assert_eq!(post.meta.read_time, 3);
    }

    #[test]
    fn test_get_post_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(repo(dir.path()).get_post("nonexistent-slug").is_none());
    }

    #[test]
    fn test_get_post_rejects_path_escapes() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        fs::create_dir(&content).unwrap();
        write(dir.path(), "secret.md", "outside the content directory");

        let repo = repo(&content);
        assert!(repo.get_post("../secret").is_none());
        assert!(repo.get_post("").is_none());
        assert!(repo.get_post("a/b").is_none());
    }

    #[test]
    fn test_unparsable_post_is_excluded() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "good.md", "---\ntitle: Good\ntags: [ok]\n---\nFine");
        write(dir.path(), "bad.md", "---\ntitle: [broken\ntags: [bad]\n---\nBody");
        fs::write(dir.path().join("binary.md"), [0xffu8, 0xfe, 0x00, 0x81]).unwrap();

        let repo = repo(dir.path());
        assert!(repo.get_post("bad").is_none());
        assert!(repo.get_post("binary").is_none());

        let slugs: Vec<_> = repo.list_posts().into_iter().map(|p| p.slug).collect();
        assert_eq!(slugs, vec!["good"]);
        assert_eq!(repo.list_all_tags(), vec!["ok"]);
    }

    #[test]
    fn test_list_posts_sorted_by_date_descending() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "old.md", "---\ndate: 2023-05-01\n---\nOld");
        write(dir.path(), "new.md", "---\ndate: 2024-05-01\n---\nNew");
        write(dir.path(), "mid.md", "---\ndate: 2023-12-24 18:00\n---\nMid");

        let posts = repo(dir.path()).list_posts();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "mid", "old"]);
        assert!(posts.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn test_equal_dates_keep_file_name_order() {
        let dir = TempDir::new().unwrap();
        for name in ["c", "a", "b"] {
            write(dir.path(), &format!("{name}.md"), "---\ndate: 2024-01-01\n---\nSame day");
        }

        let slugs: Vec<_> = repo(dir.path())
            .list_posts()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_list_featured_posts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "one.md", "---\ndate: 2024-01-01\nfeatured: true\n---\nOne");
        write(dir.path(), "two.md", "---\ndate: 2024-02-01\n---\nTwo");
        write(dir.path(), "three.md", "---\ndate: 2024-03-01\nfeatured: true\n---\nThree");

        let slugs: Vec<_> = repo(dir.path())
            .list_featured_posts()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["three", "one"]);
    }

    #[test]
    fn test_list_posts_by_tag_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "react.md",
            "---\ndate: 2024-01-01\ntags: [React, Frontend]\n---\nHooks",
        );
        write(dir.path(), "rust.md", "---\ndate: 2024-01-02\ntags: [rust]\n---\nCrabs");

        let repo = repo(dir.path());
        let upper = repo.list_posts_by_tag("REACT");
        let lower = repo.list_posts_by_tag("react");
        assert_eq!(upper, lower);
        assert_eq!(upper.len(), 1);
        assert_eq!(upper[0].slug, "react");
        assert_eq!(upper[0].tags, vec!["React", "Frontend"]);

        assert!(repo.list_posts_by_tag("go").is_empty());
    }

    #[test]
    fn test_undated_posts_compare_equal_across_calls() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "undated.md", "---\ntags: [React]\n---\nNo date");

        let repo = repo(dir.path());
        let first = repo.list_posts_by_tag("REACT");
        let second = repo.list_posts_by_tag("react");
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        // Dates default to the moment of the query, the rest is stable
        assert_eq!(first[0].slug, second[0].slug);
        assert_eq!(first[0].tags, second[0].tags);
        assert!(second[0].date >= first[0].date);
    }

    #[test]
    fn test_loose_featured_values() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "yes.md", "---\ndate: 2024-01-03\nfeatured: yes\n---\nYes");
        write(dir.path(), "quoted.md", "---\ndate: 2024-01-02\nfeatured: \"true\"\n---\nQuoted");
        write(dir.path(), "zero.md", "---\ndate: 2024-01-01\nfeatured: 0\n---\nZero");

        let repo = repo(dir.path());
        assert_eq!(repo.list_posts().len(), 3);
        let featured: Vec<_> = repo
            .list_featured_posts()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(featured, vec!["yes", "quoted"]);
    }

    #[test]
    fn test_mistyped_date_keeps_the_post() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "odd.md", "---\ntitle: Odd\ndate: [2024, 1, 1]\n---\nStill here");

        let post = repo(dir.path()).get_post("odd").unwrap();
        assert_eq!(post.meta.title, "Odd");
    }

    #[test]
    fn test_body_keeps_leading_blank_lines() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "gap.md", "---\ntitle: P\n---\n\nBody text");
        write(dir.path(), "indented.md", "\n\n  Indented start");

        let repo = repo(dir.path());
        assert_eq!(repo.get_post("gap").unwrap().meta.excerpt, "\nBody text...");
        let indented = repo.get_post("indented").unwrap();
        assert_eq!(indented.meta.excerpt, "\n\n  Indented start...");
        assert_eq!(indented.meta.title, "Untitled");
    }

    #[test]
    fn test_date_without_offset_is_utc_midnight() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "new-year.md", "---\ndate: 2024-01-01\n---\nHappy");

        let post = repo(dir.path()).get_post("new-year").unwrap();
        assert_eq!(post.meta.date.timestamp(), 1_704_067_200);
    }

    #[test]
    fn test_list_all_tags_dedup_and_sort() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "first.md", "---\ntags: [b, a]\n---\nFirst");
        write(dir.path(), "second.md", "---\ntags: [a, c]\n---\nSecond");
        write(dir.path(), "untagged.md", "No front-matter at all");

        assert_eq!(repo(dir.path()).list_all_tags(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_listing_reflects_disk_changes() {
        let dir = TempDir::new().unwrap();
        let repo = repo(dir.path());
        assert!(repo.list_posts().is_empty());

        write(dir.path(), "late.md", "---\ntitle: Late\n---\nArrived later");
        assert_eq!(repo.list_posts().len(), 1);

        fs::remove_file(dir.path().join("late.md")).unwrap();
        assert!(repo.list_posts().is_empty());
        assert!(repo.get_post("late").is_none());
    }
}
