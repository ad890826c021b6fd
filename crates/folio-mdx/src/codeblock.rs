//! Code fence annotation parsing.
//!
//! A fenced block's language tag may carry a filename and highlight ranges.
//! The accepted input space is exactly four shapes:
//!
//! - `lang`
//! - `lang:filename`
//! - `lang:filename{ranges}`
//! - `lang{ranges}`
//!
//! Anything else is kept verbatim as the language, with no filename and no
//! highlighted lines.

use std::sync::LazyLock;

use regex::Regex;

use crate::highlight::parse_highlight_ranges;

/// Languages rendered inside a terminal window frame.
const TERMINAL_LANGUAGES: &[&str] = &["terminal", "bash", "sh"];

/// The shape a fence annotation was recognised as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenceAnnotation {
    /// `lang`
    Language { language: String },

    /// `lang:filename`
    WithFile { language: String, filename: String },

    /// `lang:filename{ranges}`
    WithFileAndRanges {
        language: String,
        filename: String,
        ranges: String,
    },

    /// `lang{ranges}`
    WithRanges { language: String, ranges: String },

    /// Not one of the shapes above
    Verbatim(String),
}

impl FenceAnnotation {
    /// Recognise an annotation string.
    pub fn parse(annotation: &str) -> Self {
        static RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^([^:{}\s]*)(?::([^{}\s]+))?(?:\{([^{}]*)\})?$")
                .expect("Invalid fence annotation regex")
        });

        let Some(caps) = RE.captures(annotation) else {
            return Self::Verbatim(annotation.to_string());
        };

        let language = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let filename = caps.get(2).map(|m| m.as_str().to_string());
        let ranges = caps.get(3).map(|m| m.as_str().to_string());

        match (filename, ranges) {
            (None, None) => Self::Language { language },
            (Some(filename), None) => Self::WithFile { language, filename },
            (Some(filename), Some(ranges)) => Self::WithFileAndRanges {
                language,
                filename,
                ranges,
            },
            (None, Some(ranges)) => Self::WithRanges { language, ranges },
        }
    }

    /// The language part of the annotation.
    pub fn language(&self) -> &str {
        match self {
            Self::Language { language }
            | Self::WithFile { language, .. }
            | Self::WithFileAndRanges { language, .. }
            | Self::WithRanges { language, .. } => language,
            Self::Verbatim(raw) => raw,
        }
    }
}

/// Parsed metadata for one fenced code block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeFenceSpec {
    /// Language identifier, may be empty
    pub language: String,

    /// Filename shown above the block
    pub filename: Option<String>,

    /// 1-based lines to emphasise. Lines past the end of the block are ignored
    /// at render time.
    pub highlight_lines: Vec<u32>,

    /// Rendered in a terminal frame
    pub is_terminal: bool,
}

impl CodeFenceSpec {
    /// Parse a fenced block's info string.
    ///
    /// Only the first whitespace-separated word is the annotation; anything
    /// after it (`ts showLineNumbers`) is ignored.
    pub fn from_info(info: &str) -> Self {
        let annotation = info.split_whitespace().next().unwrap_or("");
        FenceAnnotation::parse(annotation).into()
    }

    /// Whether `line` (1-based) should be emphasised.
    pub fn is_highlighted(&self, line: u32) -> bool {
        self.highlight_lines.binary_search(&line).is_ok()
    }
}

impl From<FenceAnnotation> for CodeFenceSpec {
    fn from(annotation: FenceAnnotation) -> Self {
        let (language, filename, ranges) = match annotation {
            FenceAnnotation::Language { language } => (language, None, None),
            FenceAnnotation::WithFile { language, filename } => (language, Some(filename), None),
            FenceAnnotation::WithFileAndRanges {
                language,
                filename,
                ranges,
            } => (language, Some(filename), Some(ranges)),
            FenceAnnotation::WithRanges { language, ranges } => (language, None, Some(ranges)),
            FenceAnnotation::Verbatim(raw) => (raw, None, None),
        };

        let is_terminal = TERMINAL_LANGUAGES.contains(&language.as_str());

        Self {
            highlight_lines: parse_highlight_ranges(ranges.as_deref()),
            language,
            filename,
            is_terminal,
        }
    }
}

/// A fenced code block found in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    /// Unique identifier for this block (format: block-{line_number})
    pub id: String,

    /// Parsed fence annotation
    pub fence: CodeFenceSpec,

    /// Source code content
    pub source: String,

    /// Line number of the opening fence (1-indexed)
    pub line_number: usize,
}

impl CodeBlock {
    /// Create a new code block.
    pub fn new(fence: CodeFenceSpec, source: String, line_number: usize) -> Self {
        Self {
            id: format!("block-{}", line_number),
            fence,
            source,
            line_number,
        }
    }
}
