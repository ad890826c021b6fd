//! Create a new post.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use folio_content::PostRepository;
use folio_mdx::{slugify, Frontmatter};

use crate::config::Config;

/// Run the new command.
pub async fn run(
    config: &Config,
    title: &str,
    category: Option<String>,
    excerpt: Option<String>,
) -> Result<()> {
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();

    let path = create_post(&config.content.dir, title, category, excerpt, &date)?;

    tracing::info!("Created {}", path.display());
    Ok(())
}

/// Write a post skeleton to `<content_dir>/<slug>.mdx`.
///
/// Fails rather than replacing an existing post.
fn create_post(
    content_dir: &Path,
    title: &str,
    category: Option<String>,
    excerpt: Option<String>,
    date: &str,
) -> Result<PathBuf> {
    let slug = slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let path = PostRepository::new(content_dir).path_for(&slug);
    if path.exists() {
        anyhow::bail!("Post already exists: {}", path.display());
    }

    let frontmatter = Frontmatter {
        title: Some(title.to_string()),
        date: Some(date.to_string()),
        category,
        excerpt,
        ..Default::default()
    };
    let document = frontmatter.to_document(&format!("\n# {}\n\nStart writing here.\n", title))?;

    fs::create_dir_all(content_dir)
        .with_context(|| format!("Failed to create {}", content_dir.display()))?;
    fs::write(&path, document).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}
