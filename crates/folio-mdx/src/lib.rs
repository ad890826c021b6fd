//! MDX content pipeline for folio.
//!
//! Turns raw blog post files into renderable HTML. Code fences may carry a
//! filename and highlighted lines (`lang:file{1,3-5}`); their lines are
//! colorized with a small rule-ordered tokenizer.

pub mod codeblock;
pub mod frontmatter;
pub mod highlight;
pub mod parser;
pub mod reading_time;
pub mod render;
pub mod syntax;

pub use codeblock::{CodeBlock, CodeFenceSpec, FenceAnnotation};
pub use frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
pub use highlight::{parse_highlight_ranges, HighlightRangeToken};
pub use parser::{parse_mdx, slugify, ParseError, ParsedDoc, TocEntry};
pub use reading_time::{reading_time, ReadingTime, WORDS_PER_MINUTE};
pub use render::{escape_html, HtmlRenderer, RenderedContent};
pub use syntax::{highlight_line_html, tokenize_line, Span, TokenClass};
