//! Initialize a blog in the current directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{Config, DEFAULT_CONFIG};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing folio...");

    scaffold(config_path, yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'folio serve' to start the server.");

    Ok(())
}

/// Write the config file and a first post, keeping existing files unless `overwrite`.
fn scaffold(config_path: &Path, overwrite: bool) -> Result<()> {
    if !config_path.exists() || overwrite {
        fs::write(config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        tracing::info!("Created {}", config_path.display());
    } else {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
    }

    // Content dir is relative to the config file
    let base = config_path.parent().unwrap_or(Path::new(""));
    let content_dir = base.join(Config::parse(DEFAULT_CONFIG)?.content.dir);
    fs::create_dir_all(&content_dir).context("Failed to create content directory")?;

    let post_path = content_dir.join("hello-world.mdx");
    if !post_path.exists() || overwrite {
        fs::write(&post_path, HELLO_WORLD_POST)
            .with_context(|| format!("Failed to write {}", post_path.display()))?;
        tracing::info!("Created {}", post_path.display());
    }

    Ok(())
}

const HELLO_WORLD_POST: &str = r#"---
title: Hello, World
date: "2024-01-01"
category: General
excerpt: The first post on this blog.
---

Welcome to your new blog. Posts are `.mdx` files in `content/blog/`, and the
file name becomes the URL.

## Code blocks

Fences accept a filename and the lines to highlight:

```ts:src/greet.ts{2}
export function greet(name: string): string {
  return `Hello, ${name}!`;
}
```

```bash
folio new "My second post" --category General
```

## Next steps

- Edit this post or write a new one with `folio new`
- Run `folio serve` to preview posts as you write
- Run `folio build` to produce a static site in `dist/`
"#;
