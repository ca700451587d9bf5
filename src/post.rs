use std::collections::HashMap;
use std::io;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use spdlog::warn;

use crate::preview::extract_preview;
use crate::text_utils::reading_time;

/// Front-matter block of a content file: known keys as named fields, plus a
/// fallback bag for whatever else the author wrote.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(deserialize_with = "tags_scalar_or_seq")]
    pub tags: Vec<String>,
    pub draft: bool,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// Authors write `tags: rust` as often as a proper YAML sequence.
fn tags_scalar_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = serde_yaml::Value::deserialize(deserializer)?;
    match value {
        serde_yaml::Value::Null => Ok(Vec::new()),
        serde_yaml::Value::String(s) => Ok(vec![s]),
        serde_yaml::Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| match item {
                serde_yaml::Value::String(s) => Ok(s),
                other => Err(Error::custom(format!("tag is not a string: {:?}", other))),
            })
            .collect(),
        other => Err(Error::custom(format!("invalid tags value: {:?}", other))),
    }
}

impl FrontMatter {
    /// Splits a raw content file into its front-matter block and body.
    ///
    /// A file without an opening `---` fence has no front-matter; the whole
    /// file is body. A fence that fails to parse as YAML is logged and the
    /// file is treated the same way, so one malformed header cannot take a
    /// post off the air.
    pub fn parse(content: &str) -> (FrontMatter, &str) {
        let trimmed = content.trim_start();
        let Some(rest) = trimmed.strip_prefix("---") else {
            return (FrontMatter::default(), content);
        };
        let Some(end) = rest.find("\n---") else {
            return (FrontMatter::default(), content);
        };

        let yaml = &rest[..end];
        let body = rest[end + 4..].trim_start_matches(['\n', '\r']);

        if yaml.trim().is_empty() {
            return (FrontMatter::default(), body);
        }

        match serde_yaml::from_str::<FrontMatter>(yaml) {
            Ok(front_matter) => (front_matter, body),
            Err(e) => {
                warn!("Failed to parse front-matter, treating file as body: {}", e);
                (FrontMatter::default(), content)
            }
        }
    }
}

/// One blog post, synthesized fresh from its content file on every load.
#[derive(Debug, Clone)]
pub struct Post {
    /// Derived from the file name, unique key
    pub slug: String,
    pub title: String,
    /// Free text as written by the author; normalized only at sort time
    pub date: String,
    pub description: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    /// Whole minutes, as a string for direct template use
    pub reading_time: String,
    /// Raw body; left empty in list views
    pub content: String,
    pub content_preview: String,
    pub draft: bool,
}

impl Post {
    pub fn from_file(file_name: &Path, full_content: bool) -> io::Result<Post> {
        let slug = file_name
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| {
                io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("Invalid post file name: {}", file_name.display()),
                )
            })?;

        let raw = std::fs::read_to_string(file_name)?;
        Ok(Self::from_string(slug, &raw, full_content))
    }

    pub fn from_string(slug: &str, raw: &str, full_content: bool) -> Post {
        let (front_matter, body) = FrontMatter::parse(raw);

        // A post without a title still has to be listable
        let title = front_matter
            .title
            .unwrap_or_else(|| slug.replace(['-', '_'], " "));

        let content = if full_content {
            body.to_string()
        } else {
            String::new()
        };

        Post {
            slug: slug.to_string(),
            title,
            date: front_matter.date.unwrap_or_default(),
            description: front_matter.description.unwrap_or_default(),
            image: front_matter.image,
            tags: front_matter.tags,
            reading_time: reading_time(body),
            content,
            content_preview: extract_preview(body),
            draft: front_matter.draft,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_data::{DRAFT_POST_DATA, POST_DATA};

    use super::*;

    #[test]
    fn test_parse_front_matter() {
        let (fm, body) = FrontMatter::parse(POST_DATA);
        assert_eq!(
            fm.title.as_deref(),
            Some("What I learned after 20 years of software development")
        );
        assert_eq!(fm.date.as_deref(), Some("2022-04-02"));
        assert_eq!(fm.tags, ["career", "software"]);
        assert_eq!(fm.image.as_deref(), Some("https://example.com/cover.png"));
        assert!(!fm.draft);
        assert!(body.starts_with("How to be a great software engineer?"));
        assert!(!body.contains("title:"));
    }

    #[test]
    fn test_draft_flag_and_inline_tags() {
        let (fm, _) = FrontMatter::parse(DRAFT_POST_DATA);
        assert!(fm.draft);
        assert_eq!(fm.tags, ["career"]);
    }

    #[test]
    fn test_scalar_tag() {
        let raw = "---\ntitle: t\ntags: rust\n---\nbody";
        let (fm, _) = FrontMatter::parse(raw);
        assert_eq!(fm.tags, ["rust"]);
    }

    #[test]
    fn test_unknown_keys_land_in_extra() {
        let raw = "---\ntitle: t\nlayout: wide\ncomments: true\n---\nbody";
        let (fm, _) = FrontMatter::parse(raw);
        assert_eq!(
            fm.extra.get("layout"),
            Some(&serde_yaml::Value::String("wide".to_string()))
        );
        assert_eq!(fm.extra.get("comments"), Some(&serde_yaml::Value::Bool(true)));
    }

    #[test]
    fn test_no_front_matter_block() {
        let raw = "Just a body, no fence.";
        let (fm, body) = FrontMatter::parse(raw);
        assert!(fm.title.is_none());
        assert_eq!(body, raw);
    }

    #[test]
    fn test_post_from_string_list_view() {
        let post = Post::from_string("what_i_learned", POST_DATA, false);
        assert_eq!(post.slug, "what_i_learned");
        assert_eq!(post.reading_time, "1");
        assert!(post.content.is_empty());
        assert!(post
            .content_preview
            .starts_with("How to be a great software engineer?"));
    }

    #[test]
    fn test_post_from_string_full_content() {
        let post = Post::from_string("what_i_learned", POST_DATA, true);
        assert!(post.content.contains("## Non technical"));
    }

    #[test]
    fn test_missing_title_falls_back_to_slug() {
        let post = Post::from_string("my_first_post", "---\ndate: 2024-01-01\n---\nhi", false);
        assert_eq!(post.title, "my first post");
    }
}
