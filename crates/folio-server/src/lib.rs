//! HTTP server for folio blogs.
//!
//! Serves rendered post pages, category listings and a JSON API straight from
//! the content directory.

pub mod api;
mod pages;
pub mod server;

pub use api::API_CACHE_CONTROL;
pub use server::{BlogServer, ServerConfig, ServerError};
