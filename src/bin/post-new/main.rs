use std::fmt::Write as _;
use std::fs::File;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;

/// Scaffolds a new post file with a front-matter skeleton. The post starts
/// as a draft so it stays out of listings until the flag is removed.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Post title, also used to derive the file name
    #[arg(short, long)]
    title: String,

    /// Short description shown in listings and search results
    #[arg(short, long)]
    description: Option<String>,

    /// Comma-separated tags
    #[arg(long)]
    tags: Option<String>,

    /// Directory to create the post in. Prints to stdout when omitted
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn slug_from_title(title: &str) -> String {
    let alpha_chars: String = title
        .chars()
        .filter(|&c| c.is_alphanumeric() || c == ' ')
        .map(|c| if c == ' ' { '_' } else { c })
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let mut slug = String::new();
    let mut prev_char = None;

    for c in alpha_chars.chars() {
        if c != '_' || prev_char != Some('_') {
            slug.push(c);
        }
        prev_char = Some(c);
    }

    unidecode::unidecode(&slug)
}

fn render_front_matter(title: &str, date: &str, description: &str, tags: &[&str]) -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "---");
    let _ = writeln!(&mut buf, "title: {}", title);
    let _ = writeln!(&mut buf, "date: {}", date);
    let _ = writeln!(&mut buf, "description: {}", description);
    if tags.is_empty() {
        let _ = writeln!(&mut buf, "tags: []");
    } else {
        let _ = writeln!(&mut buf, "tags: [{}]", tags.join(", "));
    }
    let _ = writeln!(&mut buf, "draft: true");
    let _ = writeln!(&mut buf, "---");

    buf
}

fn render_body() -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "");
    let _ = writeln!(&mut buf, "This is a body example");
    let _ = writeln!(&mut buf, "Please remove it and replace with your content");

    buf
}

fn main() -> Result<()> {
    let args = Args::parse();

    let date = Utc::now().format("%Y-%m-%d").to_string();
    let tags: Vec<&str> = args
        .tags
        .as_deref()
        .map(|t| t.split(',').map(str::trim).filter(|t| !t.is_empty()).collect())
        .unwrap_or_default();

    let front_matter = render_front_matter(
        &args.title,
        &date,
        args.description.as_deref().unwrap_or(""),
        &tags,
    );
    let body = render_body();

    match args.output_dir {
        None => {
            println!("{}{}", front_matter, body);
        }
        Some(dir) => {
            let slug = slug_from_title(&args.title);
            if slug.is_empty() {
                bail!("Title produced an empty file name: {}", args.title);
            }

            let full_path = dir.join(format!("{}.md", slug));
            if full_path.exists() {
                bail!("Post already exists: {}", full_path.display());
            }

            let mut file = File::create(&full_path)
                .with_context(|| format!("Error creating {}", full_path.display()))?;
            file.write_all(front_matter.as_bytes())?;
            file.write_all(body.as_bytes())?;
            println!("Created {}", full_path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_front_matter() {
        let fm = render_front_matter(
            "This is a title",
            "2024-02-27",
            "A few words",
            &["rust", "blog"],
        );
        assert_eq!(
            fm,
            "---\ntitle: This is a title\ndate: 2024-02-27\ndescription: A few words\ntags: [rust, blog]\ndraft: true\n---\n"
        );
    }

    #[test]
    fn test_slug_from_title() {
        let slug = slug_from_title("Post title of mine ábaco - dir2");
        assert_eq!(slug, "post_title_of_mine_abaco_dir2");
    }
}
