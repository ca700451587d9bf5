use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

#[derive(ramhorns::Content)]
struct TagsPage {
    tags: Vec<TagItem>,
}

#[derive(ramhorns::Content)]
struct TagItem {
    tag: String,
    link: String,
    count: u32,
}

pub struct TagsRenderer<'a> {
    template: Template<'a>,
}

impl TagsRenderer<'_> {
    pub fn new(tags_tpl_src: &str) -> io::Result<TagsRenderer> {
        let template = match Template::new(tags_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("Error parsing tags template: {}", e),
                ));
            }
        };

        Ok(TagsRenderer { template })
    }

    pub fn render(&self, tag_counts: &[(String, u32)]) -> String {
        let tags = tag_counts
            .iter()
            .map(|(tag, count)| TagItem {
                tag: tag.clone(),
                link: format!("/tags/{}/", tag),
                count: *count,
            })
            .collect();

        self.template.render(&TagsPage { tags })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_tags() {
        let template_src = "{{#tags}}[{{tag}}:{{count}}:{{link}}]{{/tags}}";
        let renderer = TagsRenderer::new(template_src).unwrap();

        let res = renderer.render(&[("rust".to_string(), 2), ("web".to_string(), 1)]);
        assert_eq!(res, "[rust:2:/tags/rust/][web:1:/tags/web/]");
    }
}
