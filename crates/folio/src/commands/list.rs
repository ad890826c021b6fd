//! List posts.

use anyhow::Result;
use folio_content::{posts_in_category, Post, PostRepository};

use crate::config::Config;

/// Run the list command.
pub async fn run(config: &Config, category: Option<&str>) -> Result<()> {
    let posts = PostRepository::new(&config.content.dir).list_posts()?;

    let shown: Vec<&Post> = match category {
        Some(category) => posts_in_category(&posts, category),
        None => posts.iter().collect(),
    };

    if shown.is_empty() {
        tracing::info!("No posts found in {}", config.content.dir.display());
        return Ok(());
    }

    for post in shown {
        println!("{}", format_row(post));
    }

    Ok(())
}

fn format_row(post: &Post) -> String {
    format!(
        "{:<10}  {:>11}  {:<24}  {}",
        post.date.as_deref().unwrap_or("-"),
        post.reading_time,
        post.slug,
        post.display_title()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_rows() {
        let post = Post::from_source("hello", "---\ntitle: Hello\ndate: 2024-01-01\n---\nHi").unwrap();

        let row = format_row(&post);

        assert!(row.starts_with("2024-01-01"));
        assert!(row.contains("1 min read"));
        assert!(row.ends_with("Hello"));
    }

    #[test]
    fn undated_posts_show_a_dash() {
        let post = Post::from_source("draft", "").unwrap();

        assert!(format_row(&post).starts_with("- "));
        assert!(format_row(&post).ends_with("draft"));
    }
}
