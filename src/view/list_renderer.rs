use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::post::Post;

#[derive(ramhorns::Content)]
struct ListPage<'a> {
    heading: &'a str,
    posts: Vec<PostItem>,
    tags: Vec<ViewTag<'a>>,
}

#[derive(ramhorns::Content)]
struct PostItem {
    link: String,
    title: String,
    date: String,
    reading_time: String,
    preview: String,
    tags: Vec<OwnedTag>,
}

#[derive(ramhorns::Content)]
struct ViewTag<'a> {
    tag: &'a str,
}

#[derive(ramhorns::Content)]
struct OwnedTag {
    tag: String,
}

pub struct ListRenderer<'a> {
    template: Template<'a>,
}

impl ListRenderer<'_> {
    pub fn new(list_tpl_src: &str) -> io::Result<ListRenderer> {
        let template = match Template::new(list_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("Error parsing list template: {}", e),
                ));
            }
        };

        Ok(ListRenderer { template })
    }

    pub fn render(&self, heading: &str, posts: &[Post], tags: &[String]) -> String {
        let posts = posts
            .iter()
            .map(|post| PostItem {
                link: format!("/blog/{}/", post.slug),
                title: post.title.clone(),
                date: post.date.clone(),
                reading_time: post.reading_time.clone(),
                preview: post.content_preview.clone(),
                tags: post
                    .tags
                    .iter()
                    .map(|tag| OwnedTag { tag: tag.clone() })
                    .collect(),
            })
            .collect();

        let tags: Vec<_> = tags.iter().map(|t| ViewTag { tag: t.as_str() }).collect();

        self.template.render(&ListPage {
            heading,
            posts,
            tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::post::Post;

    use super::*;

    #[test]
    fn render_list() {
        let template_src = r##"HEADING=[{{heading}}]
POSTS=[{{#posts}}({{link}}|{{title}}|{{date}}|{{reading_time}}min){{/posts}}]
TAGS=[{{#tags}}({{tag}}){{/tags}}]"##;

        let post = Post {
            slug: "first_post".to_string(),
            title: "First post".to_string(),
            date: "2024-10-12".to_string(),
            description: "".to_string(),
            image: None,
            tags: vec!["rust".to_string()],
            reading_time: "3".to_string(),
            content: "".to_string(),
            content_preview: "Hello there".to_string(),
            draft: false,
        };

        let renderer = ListRenderer::new(template_src).unwrap();
        let res = renderer.render("All posts", &[post], &["rust".to_string()]);
        assert_eq!(
            res,
            "HEADING=[All posts]\nPOSTS=[(/blog/first_post/|First post|2024-10-12|3min)]\nTAGS=[(rust)]"
        );
    }
}
