//! Blog post repository for folio.
//!
//! Posts live as `.mdx` files in a single content directory. Every call reads
//! the directory again; there is no cache between calls.

pub mod collections;
pub mod post;
pub mod repository;

pub use collections::{categories, paginate, posts_in_category, Page, Pagination};
pub use post::{Post, PostSummary};
pub use repository::{ContentError, PostRepository, CONTENT_EXTENSION, DEFAULT_CONTENT_DIR};
