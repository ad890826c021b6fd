//! Blog posts.

use serde::Serialize;

use folio_mdx::{extract_frontmatter, reading_time, FrontmatterError};

/// One blog entry, built fresh from its file on every read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// File name without the `.mdx` extension
    pub slug: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Sortable date string, compared as plain text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Raw body after the frontmatter, not rendered
    pub content: String,

    /// `"<n> min read"`
    pub reading_time: String,
}

impl Post {
    /// Build a post from a file's source text.
    pub fn from_source(slug: impl Into<String>, source: &str) -> Result<Self, FrontmatterError> {
        let (frontmatter, body) = extract_frontmatter(source)?;

        Ok(Self {
            slug: slug.into(),
            title: frontmatter.title,
            date: frontmatter.date,
            category: frontmatter.category,
            excerpt: frontmatter.excerpt,
            reading_time: reading_time(body),
            content: body.to_string(),
        })
    }

    /// Title, or the slug when the post has none.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.slug)
    }

    pub fn summary(&self) -> PostSummary {
        PostSummary::from(self)
    }
}

/// A post without its body, for listings and the JSON API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub reading_time: String,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            date: post.date.clone(),
            category: post.category.clone(),
            excerpt: post.excerpt.clone(),
            reading_time: post.reading_time.clone(),
        }
    }
}
