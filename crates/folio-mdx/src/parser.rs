//! MDX document parser.

use std::collections::HashMap;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::codeblock::{CodeBlock, CodeFenceSpec};
use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};

/// A parsed MDX document.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed frontmatter (empty when the file has none)
    pub frontmatter: Frontmatter,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Extracted code blocks
    pub code_blocks: Vec<CodeBlock>,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Errors that can occur when parsing MDX.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Markdown extensions enabled for every document.
pub(crate) fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Parse an MDX document.
///
/// Extracts frontmatter, code blocks, and generates a table of contents.
pub fn parse_mdx(source: &str) -> Result<ParsedDoc, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    // `content` is a suffix of `source`
    let body_offset = source.len() - content.len();
    let (code_blocks, toc) = scan_body(source, body_offset);

    Ok(ParsedDoc {
        frontmatter,
        content: content.to_string(),
        code_blocks,
        toc,
    })
}

impl ParsedDoc {
    /// A document made of a body that has already had its frontmatter removed.
    ///
    /// Code block line numbers count from the start of `body`.
    pub fn from_body(body: &str) -> Self {
        let (code_blocks, toc) = scan_body(body, 0);

        Self {
            frontmatter: Frontmatter::default(),
            content: body.to_string(),
            code_blocks,
            toc,
        }
    }
}

/// Code blocks and headings of `source[body_offset..]`, in document order.
fn scan_body(source: &str, body_offset: usize) -> (Vec<CodeBlock>, Vec<TocEntry>) {
    let content = &source[body_offset..];

    let mut code_blocks = Vec::new();
    let mut toc = Vec::new();
    let mut ids = HeadingIds::default();

    let mut current_code_block: Option<(CodeFenceSpec, usize, String)> = None;
    let mut current_heading: Option<(u8, String)> = None;

    for (event, range) in Parser::new_ext(content, markdown_options()).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let fence = match &kind {
                    CodeBlockKind::Fenced(info) => CodeFenceSpec::from_info(info),
                    CodeBlockKind::Indented => CodeFenceSpec::default(),
                };
                let line = line_of(source, body_offset + range.start);
                current_code_block = Some((fence, line, String::new()));
            }

            Event::End(TagEnd::CodeBlock) => {
                if let Some((fence, line, text)) = current_code_block.take() {
                    code_blocks.push(CodeBlock::new(fence, text, line));
                }
            }

            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, ref mut code)) = current_code_block {
                    code.push_str(&text);
                } else if let Some((_, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&text);
                }
            }

            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((level as u8, String::new()));
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current_heading.take() {
                    let id = ids.assign(&title);
                    toc.push(TocEntry { title, id, level });
                }
            }

            _ => {}
        }
    }

    (code_blocks, toc)
}

/// 1-based line number of a byte offset.
fn line_of(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())].matches('\n').count() + 1
}

/// Hands out unique heading anchors within one document.
///
/// The first "Setup" heading gets `setup`, the next `setup-1`, and so on.
#[derive(Debug, Default)]
struct HeadingIds {
    seen: HashMap<String, usize>,
}

impl HeadingIds {
    fn assign(&mut self, title: &str) -> String {
        let base = slugify(title);
        let base = if base.is_empty() {
            "section".to_string()
        } else {
            base
        };

        let count = self.seen.entry(base.clone()).or_insert(0);
        let id = if *count == 0 {
            base
        } else {
            format!("{}-{}", base, count)
        };
        *count += 1;
        id
    }
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_complete_mdx() {
        let source = r#"---
title: Shipping a Blog
date: "2024-02-10"
---

# Shipping a Blog

Some intro.

```ts:app.ts{2}
const a = 1;
const b = 2;
```

## Deploying

```bash
cargo build --release
```
"#;

        let doc = parse_mdx(source).unwrap();

        assert_eq!(doc.frontmatter.title.as_deref(), Some("Shipping a Blog"));

        assert_eq!(doc.code_blocks.len(), 2);

        let first = &doc.code_blocks[0];
        assert_eq!(first.fence.language, "ts");
        assert_eq!(first.fence.filename.as_deref(), Some("app.ts"));
        assert_eq!(first.fence.highlight_lines, vec![2]);
        assert_eq!(first.source, "const a = 1;\nconst b = 2;\n");
        assert_eq!(first.line_number, 10);

        let second = &doc.code_blocks[1];
        assert!(second.fence.is_terminal);
        assert_eq!(second.line_number, 17);

        assert_eq!(
            doc.toc,
            vec![
                TocEntry {
                    title: "Shipping a Blog".to_string(),
                    id: "shipping-a-blog".to_string(),
                    level: 1
                },
                TocEntry {
                    title: "Deploying".to_string(),
                    id: "deploying".to_string(),
                    level: 2
                },
            ]
        );
    }

    #[test]
    fn parses_without_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter.";

        let doc = parse_mdx(source).unwrap();

        assert!(doc.frontmatter.is_empty());
        assert_eq!(doc.toc.len(), 1);
        assert_eq!(doc.toc[0].title, "Just Markdown");
        assert_eq!(doc.content, source);
    }

    #[test]
    fn heading_text_includes_inline_code() {
        let doc = parse_mdx("## Using `cargo test`\n").unwrap();

        assert_eq!(doc.toc[0].title, "Using cargo test");
        assert_eq!(doc.toc[0].id, "using-cargo-test");
    }

    #[test]
    fn duplicate_headings_get_unique_ids() {
        let doc = parse_mdx("## Setup\n\n## Setup\n\n## Setup\n").unwrap();

        let ids: Vec<_> = doc.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["setup", "setup-1", "setup-2"]);
    }

    #[test]
    fn indented_code_has_no_language() {
        let doc = parse_mdx("Text\n\n    let x = 1;\n").unwrap();

        assert_eq!(doc.code_blocks.len(), 1);
        assert_eq!(doc.code_blocks[0].fence, CodeFenceSpec::default());
    }

    #[test]
    fn body_lines_count_from_the_body() {
        let doc = ParsedDoc::from_body("Intro\n\n```rust{1}\nfn main() {}\n```\n\n## Usage\n");

        assert!(doc.frontmatter.is_empty());
        assert_eq!(doc.code_blocks.len(), 1);
        assert_eq!(doc.code_blocks[0].line_number, 3);
        assert_eq!(doc.code_blocks[0].fence.highlight_lines, vec![1]);
        assert_eq!(doc.toc[0].id, "usage");
    }

    #[test]
    fn propagates_unclosed_frontmatter() {
        let result = parse_mdx("---\ntitle: Broken\n");

        assert!(matches!(
            result,
            Err(ParseError::Frontmatter(FrontmatterError::Unclosed))
        ));
    }

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("API Reference"), "api-reference");
        assert_eq!(slugify("Button (Primary)"), "button-primary");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }
}
