use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::post::Post;

#[derive(ramhorns::Content)]
struct ViewItem<'a> {
    title: &'a str,
    date: &'a str,
    reading_time: &'a str,
    description: &'a str,
    image: &'a str,
    tags: Vec<ViewTag<'a>>,
    post_content: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewTag<'a> {
    tag: &'a str,
}

pub struct PostRenderer<'a> {
    template: Template<'a>,
}

impl PostRenderer<'_> {
    pub fn new(view_tpl_src: &str) -> io::Result<PostRenderer> {
        let template = match Template::new(view_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("Error parsing post view template: {}", e),
                ));
            }
        };

        Ok(PostRenderer { template })
    }

    /// Renders the post page. `rendered_content` is the body already
    /// converted to HTML; everything else comes from the post metadata.
    pub fn render(&self, post: &Post, rendered_content: &str) -> String {
        let tags: Vec<ViewTag> = post
            .tags
            .iter()
            .map(|t| ViewTag { tag: t.as_str() })
            .collect();

        self.template.render(&ViewItem {
            title: post.title.as_str(),
            date: post.date.as_str(),
            reading_time: post.reading_time.as_str(),
            description: post.description.as_str(),
            image: post.image.as_deref().unwrap_or(""),
            tags,
            post_content: rendered_content,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::post::Post;

    use super::*;

    #[test]
    fn render_view() {
        let template_src = r##"
TITLE=[{{title}}]
DATE=[{{date}}]
READ=[{{reading_time}} min read]
DESC=[{{description}}]
IMAGE=[{{#image}}<img src="{{image}}">{{/image}}]
TAGS=[{{#tags}}({{tag}}){{/tags}}]
POST_CONTENT=[{{{post_content}}}]"##;

        let post = Post {
            slug: "hello".to_string(),
            title: "<Hello>".to_string(),
            date: "Oct 12 2024".to_string(),
            description: "A greeting".to_string(),
            image: None,
            tags: vec!["<rust>".to_string(), "blog".to_string()],
            reading_time: "2".to_string(),
            content: "# ignored".to_string(),
            content_preview: "".to_string(),
            draft: false,
        };

        let renderer = PostRenderer::new(template_src).unwrap();
        let res = renderer.render(&post, "<p>rendered body</p>");
        assert_eq!(
            res,
            r##"
TITLE=[&lt;Hello&gt;]
DATE=[Oct 12 2024]
READ=[2 min read]
DESC=[A greeting]
IMAGE=[]
TAGS=[(&lt;rust&gt;)(blog)]
POST_CONTENT=[<p>rendered body</p>]"##
        );
    }
}
