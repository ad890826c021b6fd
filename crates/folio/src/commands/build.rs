//! Static site build command.

use std::path::PathBuf;

use anyhow::Result;
use folio_static::{BuildConfig, StaticBuilder};

use crate::config::Config;

/// Run the build command.
pub async fn run(config: &Config, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building static site...");

    let build_config = BuildConfig {
        content_dir: config.content.dir.clone(),
        output_dir: output.unwrap_or_else(|| config.build.output.clone()),
        minify: minify.unwrap_or(config.build.minify),
        line_numbers: config.build.line_numbers,
        site: config.site(),
    };

    let result = StaticBuilder::new(build_config)?.build().await?;

    tracing::info!(
        "Built {} posts and {} categories in {}ms",
        result.posts,
        result.categories,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
