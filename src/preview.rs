use lazy_static::lazy_static;
use regex::Regex;

pub const PREVIEW_MAX_CHARS: usize = 600;
const PREVIEW_PARAGRAPHS: usize = 3;
const IMAGE_PLACEHOLDER: &str = "[image]";

/// Extracts a plain-text-ish excerpt from a raw post body, for list views.
/// Pure string transform; cannot fail for well-formed input.
///
/// Markup that would look broken in a flat excerpt is dropped: a leading
/// front-matter block, import statement lines, block-level HTML wrappers.
/// Images become a literal `[image]` token. The first 3 paragraphs are
/// kept, capped at 600 characters.
pub fn extract_preview(body: &str) -> String {
    lazy_static! {
        static ref IMPORT_REGEX: Regex = Regex::new(r"(?m)^import\s+.*$").unwrap();
        static ref MD_IMAGE_REGEX: Regex = Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap();
        static ref HTML_IMAGE_REGEX: Regex = Regex::new(r"(?is)<img\b[^>]*/?>").unwrap();
        static ref WRAPPER_TAG_REGEX: Regex = Regex::new(
            r"(?i)</?(?:div|section|article|aside|figure|figcaption|header|footer|main)\b[^>]*>"
        ).unwrap();
    }

    let body = strip_front_matter(body);
    let body = IMPORT_REGEX.replace_all(body, "");
    let body = MD_IMAGE_REGEX.replace_all(&body, IMAGE_PLACEHOLDER);
    let body = HTML_IMAGE_REGEX.replace_all(&body, IMAGE_PLACEHOLDER);
    let body = WRAPPER_TAG_REGEX.replace_all(&body, "");

    let joined = first_paragraphs(&body, PREVIEW_PARAGRAPHS);
    truncate_chars(&joined, PREVIEW_MAX_CHARS)
}

/// Bodies normally reach the preview with the front-matter already split
/// off, but raw file content is accepted too.
fn strip_front_matter(body: &str) -> &str {
    let trimmed = body.trim_start();
    let Some(rest) = trimmed.strip_prefix("---") else {
        return body;
    };

    match rest.find("\n---") {
        Some(end) => {
            let after = &rest[end + 4..];
            after.trim_start_matches(['\n', '\r'])
        }
        None => body,
    }
}

fn first_paragraphs(body: &str, count: usize) -> String {
    let paragraphs: Vec<&str> = body
        .split("\n\n")
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .take(count)
        .collect();

    paragraphs.join("\n\n")
}

fn truncate_chars(buf: &str, max_chars: usize) -> String {
    if buf.chars().count() <= max_chars {
        return buf.to_string();
    }
    buf.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use crate::test_data::PREVIEW_FIXTURE;

    use super::*;

    #[test]
    fn test_strips_markup_and_caps_length() {
        let preview = extract_preview(PREVIEW_FIXTURE);

        assert!(!preview.contains("---"));
        assert!(!preview.contains("title:"));
        assert!(!preview.contains("import"));
        assert!(!preview.contains("<div"));
        assert!(!preview.contains("</div>"));
        assert!(!preview.contains("<img"));
        assert!(preview.chars().count() <= PREVIEW_MAX_CHARS);
    }

    #[test]
    fn test_images_become_placeholder() {
        let preview = extract_preview("Look at this:\n\n![a cat](cat.png)\n\nNice.");
        assert_eq!(preview, "Look at this:\n\n[image]\n\nNice.");

        let preview = extract_preview("Before <img src=\"x.png\" alt=\"x\"> after");
        assert_eq!(preview, "Before [image] after");
    }

    #[test]
    fn test_keeps_first_three_paragraphs() {
        let body = "one\n\ntwo\n\nthree\n\nfour\n\nfive";
        assert_eq!(extract_preview(body), "one\n\ntwo\n\nthree");
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        let body = "é".repeat(700);
        let preview = extract_preview(&body);
        assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS);
    }

    #[test]
    fn test_body_without_front_matter_is_untouched() {
        let body = "Plain paragraph, nothing special.";
        assert_eq!(extract_preview(body), body);
    }
}
