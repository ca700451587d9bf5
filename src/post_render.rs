use std::io;
use std::io::ErrorKind;

use markdown::Options;

/// Renders a post body to HTML. The markdown engine is an opaque library
/// call; the only preprocessing done here is dropping HTML comments, which
/// authors use for notes that must not reach the page.
pub fn render_markdown(md_text: &str) -> io::Result<String> {
    let buf = remove_comments(md_text)?;
    match markdown::to_html_with_options(buf.as_str(), &Options::gfm()) {
        Ok(html) => Ok(html),
        Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, e.reason.as_str())),
    }
}

fn remove_comments(md_post: &str) -> io::Result<String> {
    const START_COMMENT: &str = "<!--";
    const END_COMMENT: &str = "-->";

    let mut res = String::new();
    let mut block = md_post;

    loop {
        match block.find(START_COMMENT) {
            Some(start) => {
                res.push_str(&block[..start]);

                let next = &block[(start + START_COMMENT.len())..];
                match next.find(END_COMMENT) {
                    Some(end) => block = &next[(end + END_COMMENT.len())..],
                    None => {
                        return Err(io::Error::new(
                            ErrorKind::InvalidData,
                            "Error finding end of comment",
                        ))
                    }
                }
            }
            None => {
                res.push_str(block);
                break;
            }
        }
    }

    Ok(res)
}
