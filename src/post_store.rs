use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{fs, io};

use anyhow::{Context, Result};
use spdlog::error;

use crate::post::Post;
use crate::text_utils::normalize_date;

/// The content directory, treated as an external read-only data source
/// queried fresh per call. Every listing is a point-in-time snapshot of the
/// filesystem; there is no in-process cache. Callers only see this type, so
/// a caching decorator can be added later without touching them.
pub struct PostStore {
    posts_dir: PathBuf,
}

impl PostStore {
    pub fn new(posts_dir: PathBuf) -> PostStore {
        PostStore { posts_dir }
    }

    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    /// All public posts: drafts filtered out, one entry per slug, sorted by
    /// normalized date descending with the lexicographically greater title
    /// first on ties. Post `content` is left empty here; list views only
    /// need the preview.
    ///
    /// A single unreadable file aborts the whole listing.
    pub fn all_posts(&self) -> Result<Vec<Post>> {
        let files = self.list_post_files().with_context(|| {
            format!("Error listing posts in {}", self.posts_dir.display())
        })?;

        let mut by_slug: HashMap<String, Post> = HashMap::new();
        for file in files {
            let post = Post::from_file(&file, false)
                .with_context(|| format!("Error reading post {}", file.display()))?;
            if post.draft {
                continue;
            }
            // Files sharing a slug collapse to one entry. Enumeration is
            // sorted, so the last file in listing order wins.
            by_slug.insert(post.slug.clone(), post);
        }

        let mut posts: Vec<Post> = by_slug.into_values().collect();
        sort_posts(&mut posts);
        Ok(posts)
    }

    /// Single-post lookup with the full body. Absent or unreadable files
    /// yield `None`; the underlying error is logged, never raised. Drafts
    /// are reachable here: only listings hide them.
    pub fn post_by_slug(&self, slug: &str) -> Option<Post> {
        // .mdx shadows .md, mirroring last-wins de-duplication in listings
        for ext in ["mdx", "md"] {
            let path = self.posts_dir.join(format!("{}.{}", slug, ext));
            if !path.exists() {
                continue;
            }
            match Post::from_file(&path, true) {
                Ok(post) => return Some(post),
                Err(e) => {
                    error!("Error reading post '{}': {}", slug, e);
                    return None;
                }
            }
        }
        None
    }

    /// Tag to post count over the public corpus, most frequent first.
    pub fn all_tags(&self) -> Result<Vec<(String, u32)>> {
        let mut tag_map: HashMap<String, u32> = HashMap::new();
        for post in self.all_posts()? {
            for tag in post.tags {
                *tag_map.entry(tag).or_insert(0) += 1;
            }
        }

        let mut tag_list: Vec<(String, u32)> = tag_map.into_iter().collect();
        tag_list.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(tag_list)
    }

    pub fn posts_by_tag(&self, tag: &str) -> Result<Vec<Post>> {
        let mut posts = self.all_posts()?;
        posts.retain(|post| post.tags.iter().any(|t| t == tag));
        Ok(posts)
    }

    /// Case-insensitive substring match over title, description and tags.
    /// An empty query matches nothing.
    pub fn search(&self, query: &str) -> Result<Vec<Post>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(vec![]);
        }

        let mut posts = self.all_posts()?;
        posts.retain(|post| {
            post.title.to_lowercase().contains(&query)
                || post.description.to_lowercase().contains(&query)
                || post.tags.iter().any(|t| t.to_lowercase().contains(&query))
        });
        Ok(posts)
    }

    fn list_post_files(&self) -> io::Result<Vec<PathBuf>> {
        if !self.posts_dir.exists() {
            fs::create_dir_all(&self.posts_dir)?;
        }

        let mut files = vec![];
        for entry in fs::read_dir(&self.posts_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if name.ends_with(".md") || name.ends_with(".mdx") {
                files.push(entry.path());
            }
        }

        // read_dir order is platform-dependent; sort so slug
        // de-duplication stays deterministic
        files.sort();
        Ok(files)
    }
}

fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        let date_a = normalize_date(&a.date);
        let date_b = normalize_date(&b.date);
        date_b.cmp(&date_a).then_with(|| b.title.cmp(&a.title))
    });
}
