//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use folio_content::{categories, posts_in_category, ContentError, Post, PostRepository};
use folio_mdx::{escape_html, slugify, HtmlRenderer};

use crate::assets::AssetPipeline;
use crate::templates::{CategoryLink, PostCard, Site, TemplateEngine};

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory holding the `.mdx` posts
    pub content_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// Number code block lines
    pub line_numbers: bool,

    /// Title, description and base URL
    pub site: Site,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from(folio_content::DEFAULT_CONTENT_DIR),
            output_dir: PathBuf::from("dist"),
            minify: true,
            line_numbers: true,
            site: Site::default(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of post pages generated
    pub posts: usize,

    /// Number of category listings generated
    pub categories: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write {}: {message}", path.display())]
    WriteError { path: PathBuf, message: String },
}

impl From<minijinja::Error> for BuildError {
    fn from(e: minijinja::Error) -> Self {
        BuildError::TemplateError(e.to_string())
    }
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    repository: PostRepository,
    renderer: HtmlRenderer,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        Ok(Self {
            repository: PostRepository::new(&config.content_dir),
            renderer: HtmlRenderer::new().with_line_numbers(config.line_numbers),
            templates: TemplateEngine::new()?,
            config,
        })
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let site = &self.config.site;

        ensure_dir(&self.config.output_dir)?;

        let posts = self.repository.list_posts()?;
        tracing::info!(
            "Building {} posts from {}",
            posts.len(),
            self.config.content_dir.display()
        );

        // Render posts in parallel
        posts
            .par_iter()
            .map(|post| self.build_post(post))
            .collect::<Result<Vec<()>, BuildError>>()?;

        let category_names = categories(&posts);
        let category_links: Vec<CategoryLink> = category_names
            .iter()
            .map(|name| CategoryLink::new(name, site))
            .collect();

        // Home page lists every post
        let cards: Vec<PostCard> = posts.iter().map(|p| PostCard::new(p, site)).collect();
        let index = self
            .templates
            .render_index(site, None, &cards, &category_links)?;
        write_file(&self.config.output_dir.join("index.html"), &index)?;

        for name in &category_names {
            self.build_category(&posts, name, &category_links)?;
        }

        let not_found = self.templates.render_not_found(site)?;
        write_file(&self.config.output_dir.join("404.html"), &not_found)?;

        self.generate_assets()?;
        self.generate_search_index(&posts)?;
        self.generate_sitemap(&posts, &category_names)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            posts: posts.len(),
            categories: category_names.len(),
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Render one post to `blog/<slug>/index.html`.
    fn build_post(&self, post: &Post) -> Result<(), BuildError> {
        let rendered = self.renderer.render(&post.content);
        let html = self
            .templates
            .render_post(&self.config.site, post, &rendered)?;

        let path = self
            .config
            .output_dir
            .join("blog")
            .join(&post.slug)
            .join("index.html");
        write_file(&path, &html)?;

        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }

    /// Render the listing for one category to `category/<slug>/index.html`.
    fn build_category(
        &self,
        posts: &[Post],
        category: &str,
        category_links: &[CategoryLink],
    ) -> Result<(), BuildError> {
        let site = &self.config.site;
        let cards: Vec<PostCard> = posts_in_category(posts, category)
            .into_iter()
            .map(|p| PostCard::new(p, site))
            .collect();

        let html = self
            .templates
            .render_index(site, Some(category), &cards, category_links)?;

        let path = self
            .config
            .output_dir
            .join("category")
            .join(slugify(category))
            .join("index.html");
        write_file(&path, &html)
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");

        write_file(
            &assets_dir.join("main.css"),
            &AssetPipeline::stylesheet(self.config.minify),
        )?;
        write_file(&assets_dir.join("main.js"), &AssetPipeline::generate_js())?;

        Ok(())
    }

    /// Generate the client-side search index.
    fn generate_search_index(&self, posts: &[Post]) -> Result<(), BuildError> {
        let site = &self.config.site;
        let index: Vec<serde_json::Value> = posts
            .iter()
            .map(|post| {
                serde_json::json!({
                    "title": post.display_title(),
                    "excerpt": post.excerpt.clone().unwrap_or_default(),
                    "category": post.category,
                    "date": post.date,
                    "url": site.post_url(&post.slug),
                    "readingTime": post.reading_time,
                })
            })
            .collect();

        let path = self.config.output_dir.join("search-index.json");
        let json = serde_json::to_string_pretty(&index).map_err(|e| BuildError::WriteError {
            path: path.clone(),
            message: e.to_string(),
        })?;

        write_file(&path, &json)
    }

    /// Generate sitemap and robots.txt.
    fn generate_sitemap(&self, posts: &[Post], category_names: &[String]) -> Result<(), BuildError> {
        let site = &self.config.site;

        let mut urls = vec![site.base_url.clone()];
        urls.extend(posts.iter().map(|p| site.post_url(&p.slug)));
        urls.extend(category_names.iter().map(|c| site.category_url(c)));

        let entries: Vec<String> = urls
            .iter()
            .map(|url| format!("  <url>\n    <loc>{}</loc>\n  </url>", escape_html(url)))
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            entries.join("\n")
        );
        write_file(&self.config.output_dir.join("sitemap.xml"), &sitemap)?;

        let robots = format!(
            "User-agent: *\nAllow: /\nSitemap: {}sitemap.xml\n",
            site.base_url
        );
        write_file(&self.config.output_dir.join("robots.txt"), &robots)
    }
}

fn ensure_dir(dir: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(dir).map_err(|e| BuildError::WriteError {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })
}

/// Write `contents` to `path`, creating parent directories.
fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    fs::write(path, contents).map_err(|e| BuildError::WriteError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_post(dir: &Path, slug: &str, source: &str) {
        fs::write(dir.join(format!("{}.mdx", slug)), source).unwrap();
    }

    fn config(content: &Path, out: &Path) -> BuildConfig {
        BuildConfig {
            content_dir: content.to_path_buf(),
            output_dir: out.to_path_buf(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn builds_simple_site() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content");
        let out = temp.path().join("dist");

        fs::create_dir_all(&content).unwrap();
        write_post(
            &content,
            "hello",
            "---\ntitle: Hello\ndate: 2024-01-01\ncategory: Web Dev\n---\n# Welcome\n",
        );
        write_post(
            &content,
            "second",
            "---\ntitle: Second\ndate: 2024-02-01\ncategory: Rust\n---\nText.\n",
        );

        let builder = StaticBuilder::new(config(&content, &out)).unwrap();
        let result = builder.build().await.unwrap();

        assert_eq!(result.posts, 2);
        assert_eq!(result.categories, 2);
        assert!(out.join("index.html").exists());
        assert!(out.join("blog/hello/index.html").exists());
        assert!(out.join("blog/second/index.html").exists());
        assert!(out.join("category/web-dev/index.html").exists());
        assert!(out.join("category/rust/index.html").exists());
        assert!(out.join("404.html").exists());
        assert!(out.join("assets/main.css").exists());
        assert!(out.join("assets/main.js").exists());
        assert!(out.join("robots.txt").exists());
    }

    #[tokio::test]
    async fn renders_post_pages() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content");
        let out = temp.path().join("dist");

        fs::create_dir_all(&content).unwrap();
        write_post(
            &content,
            "code",
            "---\ntitle: Code\n---\n## Example\n\n```js:app.js{1}\nconst x = 1;\n```\n",
        );

        StaticBuilder::new(config(&content, &out))
            .unwrap()
            .build()
            .await
            .unwrap();

        let html = fs::read_to_string(out.join("blog/code/index.html")).unwrap();
        assert!(html.contains("<title>Code - Blog</title>"));
        assert!(html.contains("app.js"));
        assert!(html.contains("line highlighted"));
        assert!(html.contains(r##"<a href="#example">Example</a>"##));
    }

    #[tokio::test]
    async fn category_pages_only_list_their_posts() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content");
        let out = temp.path().join("dist");

        fs::create_dir_all(&content).unwrap();
        write_post(&content, "a", "---\ntitle: Alpha Post\ncategory: Rust\n---\n");
        write_post(&content, "b", "---\ntitle: Beta Post\ncategory: Design\n---\n");

        StaticBuilder::new(config(&content, &out))
            .unwrap()
            .build()
            .await
            .unwrap();

        let rust = fs::read_to_string(out.join("category/rust/index.html")).unwrap();
        assert!(rust.contains("Alpha Post"));
        assert!(!rust.contains("Beta Post"));
    }

    #[tokio::test]
    async fn category_spellings_share_one_page() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content");
        let out = temp.path().join("dist");

        fs::create_dir_all(&content).unwrap();
        write_post(&content, "a", "---\ntitle: Alpha Post\ncategory: Web Dev\n---\n");
        write_post(&content, "b", "---\ntitle: Beta Post\ncategory: web dev\n---\n");

        let result = StaticBuilder::new(config(&content, &out))
            .unwrap()
            .build()
            .await
            .unwrap();

        assert_eq!(result.categories, 1);
        let page = fs::read_to_string(out.join("category/web-dev/index.html")).unwrap();
        assert!(page.contains("Alpha Post"));
        assert!(page.contains("Beta Post"));
        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert_eq!(sitemap.matches("/category/web-dev/").count(), 1);
    }

    #[tokio::test]
    async fn generates_search_index() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content");
        let out = temp.path().join("dist");

        fs::create_dir_all(&content).unwrap();
        write_post(
            &content,
            "searchable",
            "---\ntitle: Test\nexcerpt: Findable\n---\n# Searchable Content",
        );

        StaticBuilder::new(config(&content, &out))
            .unwrap()
            .build()
            .await
            .unwrap();

        let index = fs::read_to_string(out.join("search-index.json")).unwrap();
        let entries: serde_json::Value = serde_json::from_str(&index).unwrap();
        assert_eq!(entries[0]["title"], "Test");
        assert_eq!(entries[0]["excerpt"], "Findable");
        assert_eq!(entries[0]["url"], "/blog/searchable/");
    }

    #[tokio::test]
    async fn sitemap_lists_every_page() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content");
        let out = temp.path().join("dist");

        fs::create_dir_all(&content).unwrap();
        write_post(&content, "one", "---\ncategory: Notes\n---\nBody");

        StaticBuilder::new(config(&content, &out))
            .unwrap()
            .build()
            .await
            .unwrap();

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>/</loc>"));
        assert!(sitemap.contains("<loc>/blog/one/</loc>"));
        assert!(sitemap.contains("<loc>/category/notes/</loc>"));
    }

    #[tokio::test]
    async fn builds_empty_site_from_missing_content_dir() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content/blog");
        let out = temp.path().join("dist");

        let result = StaticBuilder::new(config(&content, &out))
            .unwrap()
            .build()
            .await
            .unwrap();

        assert_eq!(result.posts, 0);
        assert!(content.is_dir());
        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("No posts yet."));
    }
}
