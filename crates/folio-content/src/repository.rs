//! File-backed post repository.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use folio_mdx::FrontmatterError;

use crate::post::Post;

/// Extension of post files.
pub const CONTENT_EXTENSION: &str = "mdx";

/// Content directory used when none is configured.
pub const DEFAULT_CONTENT_DIR: &str = "content/blog";

/// Errors that can occur when reading posts.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: FrontmatterError,
    },

    #[error("Post not found: {0}")]
    NotFound(String),
}

/// Reads posts from a content directory.
///
/// Stateless: every call goes back to the filesystem.
#[derive(Debug, Clone)]
pub struct PostRepository {
    root: PathBuf,
}

impl Default for PostRepository {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_DIR)
    }
}

impl PostRepository {
    /// Create a repository rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The content directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All posts, newest first.
    ///
    /// Creates the content directory when it is missing. A file that cannot be
    /// read or parsed is logged and left out; only a failure to read the
    /// directory itself is an error, as is a root that is not a directory.
    /// Dates are compared as plain strings.
    pub fn list_posts(&self) -> Result<Vec<Post>, ContentError> {
        self.ensure_root()?;

        let mut posts = Vec::new();

        for entry in WalkDir::new(&self.root)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(ContentError::Io {
                        path: self.root.clone(),
                        source: e.into(),
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.depth() == 0 || !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(slug) = slug_for(path) else {
                continue;
            };

            match self.read_post(slug, path) {
                Ok(post) => posts.push(post),
                Err(e) => tracing::warn!("Skipping post: {}", e),
            }
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date));

        tracing::debug!("Loaded {} posts from {}", posts.len(), self.root.display());

        Ok(posts)
    }

    /// The post stored as `<slug>.mdx`, or `None` when there is no such file.
    pub fn get_post(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        if !is_valid_slug(slug) {
            return Ok(None);
        }

        let path = self.path_for(slug);
        if !path.is_file() {
            return Ok(None);
        }

        match self.read_post(slug, &path) {
            Ok(post) => Ok(Some(post)),
            Err(ContentError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Like [`get_post`](Self::get_post), with a missing post as an error.
    pub fn require_post(&self, slug: &str) -> Result<Post, ContentError> {
        self.get_post(slug)?
            .ok_or_else(|| ContentError::NotFound(slug.to_string()))
    }

    /// Path a post with this slug is stored at.
    pub fn path_for(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{}.{}", slug, CONTENT_EXTENSION))
    }

    fn ensure_root(&self) -> Result<(), ContentError> {
        if self.root.is_dir() {
            return Ok(());
        }
        if self.root.exists() {
            return Err(ContentError::Io {
                path: self.root.clone(),
                source: io::Error::other("not a directory"),
            });
        }

        fs::create_dir_all(&self.root).map_err(|source| ContentError::Io {
            path: self.root.clone(),
            source,
        })?;
        tracing::info!("Created content directory {}", self.root.display());

        Ok(())
    }

    fn read_post(&self, slug: &str, path: &Path) -> Result<Post, ContentError> {
        let source = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Post::from_source(slug, &source).map_err(|source| ContentError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Slug of a post file, `None` for files that are not posts.
///
/// Every slug returned here is accepted by [`PostRepository::get_post`].
fn slug_for(path: &Path) -> Option<&str> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    if ext != CONTENT_EXTENSION {
        return None;
    }

    let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
        tracing::warn!("Skipping post with a non UTF-8 name: {}", path.display());
        return None;
    };
    if !is_valid_slug(slug) {
        tracing::warn!("Skipping post with an unusable name: {}", path.display());
        return None;
    }

    Some(slug)
}

/// Slugs name a file directly inside the content directory.
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug != "." && slug != ".." && !slug.contains(['/', '\\'])
}
