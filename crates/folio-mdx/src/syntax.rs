//! Lightweight, rule-ordered syntax colorization.
//!
//! This is not a lexer. Each rule is a regex applied in a fixed order to the
//! parts of a line that no earlier rule has claimed. The first rule to claim a
//! character wins, so `"let"` inside a string stays a string.

use std::sync::LazyLock;

use regex::Regex;

use crate::render::escape_html;

/// Languages that get colorized. Everything else renders as plain text.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "js",
    "jsx",
    "ts",
    "tsx",
    "go",
    "python",
    "java",
    "rust",
    "c",
    "cpp",
    "csharp",
    "php",
    "ruby",
    "json",
    "html",
    "css",
    "dockerfile",
];

/// Style class assigned to a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    String,
    Keyword,
    Number,
    Comment,
    Function,
    Property,
    Type,
    Tag,
    GoKeyword,
    RustKeyword,
    RustType,
}

impl TokenClass {
    /// CSS class emitted for this token.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::String => "tok-string",
            Self::Keyword | Self::GoKeyword | Self::RustKeyword => "tok-keyword",
            Self::Number => "tok-number",
            Self::Comment => "tok-comment",
            Self::Function => "tok-function",
            Self::Property => "tok-property",
            Self::Type => "tok-type",
            Self::Tag => "tok-tag",
            Self::RustType => "tok-builtin",
        }
    }
}

/// A slice of a source line with an optional class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub text: &'a str,
    pub class: Option<TokenClass>,
    /// Byte offset of `text` within the line
    pub offset: usize,
}

struct Rule {
    pattern: Regex,
    class: TokenClass,
}

impl Rule {
    fn new(pattern: &str, class: TokenClass) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("Invalid highlight rule"),
            class,
        }
    }
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(r#""[^"]*"|'[^']*'|`[^`]*`"#, TokenClass::String),
        Rule::new(
            r"\b(function|const|let|var|if|else|for|while|return|import|export|from|class|interface|type|extends|implements|new|this|super|async|await|try|catch|throw|finally)\b",
            TokenClass::Keyword,
        ),
        Rule::new(r"\b\d+(\.\d+)?\b", TokenClass::Number),
        Rule::new(r"//.*|/\*[\s\S]*?\*/|#.*", TokenClass::Comment),
        Rule::new(r"\b[a-zA-Z_$][a-zA-Z0-9_$]*\(", TokenClass::Function),
        Rule::new(r"\.[a-zA-Z_$][a-zA-Z0-9_$]*", TokenClass::Property),
        Rule::new(r"\b[A-Z][a-zA-Z0-9_$]*\b", TokenClass::Type),
        Rule::new(r"</?[a-zA-Z][a-zA-Z0-9]*>?", TokenClass::Tag),
        Rule::new(
            r"\b(package|import|func|struct|interface|chan|go|defer|select|case)\b",
            TokenClass::GoKeyword,
        ),
        Rule::new(
            r"\b(fn|use|let|mut|impl|trait|enum|pub|mod|match|self|crate|super|where|ref|async|await|move|dyn|type)\b",
            TokenClass::RustKeyword,
        ),
        Rule::new(
            r"\b(String|str|i32|i64|u32|u64|f32|f64|bool|char|Vec|Option|Result|Box|Arc|Rc|RefCell|Mutex)\b",
            TokenClass::RustType,
        ),
    ]
});

/// Whether `language` gets colorized.
pub fn is_supported(language: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&language)
}

/// Split one line into classified and plain spans.
///
/// Concatenating the returned spans in order always reproduces `line`.
/// Unsupported languages come back as a single plain span.
pub fn tokenize_line<'a>(line: &'a str, language: &str) -> Vec<Span<'a>> {
    if line.is_empty() {
        return Vec::new();
    }

    let mut spans = vec![Span {
        text: line,
        class: None,
        offset: 0,
    }];

    if !is_supported(language) {
        return spans;
    }

    for rule in RULES.iter() {
        let mut next = Vec::with_capacity(spans.len());

        for span in spans {
            if span.class.is_some() {
                next.push(span);
                continue;
            }
            split_span(span, rule, &mut next);
        }

        spans = next;
    }

    spans
}

/// Re-scan one plain span with `rule`, pushing the pieces in order.
fn split_span<'a>(span: Span<'a>, rule: &Rule, out: &mut Vec<Span<'a>>) {
    let text = span.text;
    let mut last = 0;

    for m in rule.pattern.find_iter(text) {
        if m.start() > last {
            out.push(Span {
                text: &text[last..m.start()],
                class: None,
                offset: span.offset + last,
            });
        }
        if m.end() > m.start() {
            out.push(Span {
                text: m.as_str(),
                class: Some(rule.class),
                offset: span.offset + m.start(),
            });
        }
        last = m.end();
    }

    if last < text.len() {
        out.push(Span {
            text: &text[last..],
            class: None,
            offset: span.offset + last,
        });
    }
}

/// Render one line as escaped HTML with `<span class="tok-…">` wrappers.
pub fn highlight_line_html(line: &str, language: &str) -> String {
    let mut html = String::with_capacity(line.len() + 16);

    for span in tokenize_line(line, language) {
        match span.class {
            Some(class) => {
                html.push_str("<span class=\"");
                html.push_str(class.css_class());
                html.push_str("\">");
                html.push_str(&escape_html(span.text));
                html.push_str("</span>");
            }
            None => html.push_str(&escape_html(span.text)),
        }
    }

    html
}
