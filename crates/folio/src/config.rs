//! `folio.toml` configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use folio_static::Site;

/// Configuration file structure (folio.toml).
///
/// Every key is optional; a missing file means all defaults.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub content: ContentConfig,
    pub build: BuildSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: String::new(),
            base_url: "/".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContentConfig {
    pub dir: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(folio_content::DEFAULT_CONTENT_DIR),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct BuildSettings {
    pub output: PathBuf,
    pub minify: bool,
    pub line_numbers: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            output: PathBuf::from("dist"),
            minify: true,
            line_numbers: true,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Config {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the config file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Site settings with the base URL normalised to end in `/`.
    pub fn site(&self) -> Site {
        let mut base_url = self.site.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Site {
            title: self.site.title.clone(),
            description: self.site.description.clone(),
            base_url,
        }
    }
}

/// Written by `folio init`.
pub const DEFAULT_CONFIG: &str = r#"# folio configuration

[site]
title = "My Blog"
description = "Notes and articles"
# Prefix for every link (for deployment under a sub-path)
base_url = "/"

[content]
# Directory holding the .mdx posts
dir = "content/blog"

[build]
output = "dist"
minify = true
line_numbers = true

[server]
host = "127.0.0.1"
port = 3000
"#;
