//! Static site generator for folio blogs.
//!
//! Renders every post, the home listing and one listing per category to plain HTML files.

pub mod assets;
pub mod builder;
pub mod templates;

pub use assets::AssetPipeline;
pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use templates::{format_date, CategoryLink, PostCard, Site, TemplateEngine};
