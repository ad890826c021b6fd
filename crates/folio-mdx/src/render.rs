//! HTML rendering with component overrides.
//!
//! pulldown-cmark does the Markdown work; this module rewrites the event
//! stream so headings get stable anchors, fenced code goes through the fence
//! annotation parser and tokenizer, links and images get safe attributes, and
//! block elements carry the site's `prose-*` classes.

use pulldown_cmark::{html, CowStr, Event, Parser, Tag, TagEnd};

use crate::codeblock::CodeFenceSpec;
use crate::parser::{markdown_options, ParsedDoc, TocEntry};
use crate::syntax::highlight_line_html;

/// Output of rendering one post body.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedContent {
    /// Rendered HTML fragment
    pub html: String,
    /// Headings in document order, ids matching the rendered anchors
    pub toc: Vec<TocEntry>,
}

/// Markdown to HTML renderer.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    line_numbers: bool,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

struct PendingImage<'a> {
    src: CowStr<'a>,
    title: CowStr<'a>,
    alt: String,
}

impl HtmlRenderer {
    /// Create a renderer with line numbers enabled.
    pub fn new() -> Self {
        Self { line_numbers: true }
    }

    /// Toggle the line number gutter on code blocks.
    pub fn with_line_numbers(mut self, line_numbers: bool) -> Self {
        self.line_numbers = line_numbers;
        self
    }

    /// Render a Markdown/MDX body to HTML.
    pub fn render(&self, body: &str) -> RenderedContent {
        self.render_document(&ParsedDoc::from_body(body))
    }

    /// Render a parsed document's body to HTML.
    ///
    /// Fences and heading anchors come from the document's code blocks and
    /// table of contents, so the rendered ids always match `doc.toc`.
    pub fn render_document(&self, doc: &ParsedDoc) -> RenderedContent {
        let mut events: Vec<Event> = Vec::new();
        let mut code_blocks = doc.code_blocks.iter();
        let mut toc = doc.toc.iter();

        let mut in_code = false;
        let mut image: Option<PendingImage> = None;

        for event in Parser::new_ext(&doc.content, markdown_options()) {
            if in_code {
                if let Event::End(TagEnd::CodeBlock) = event {
                    in_code = false;
                    if let Some(block) = code_blocks.next() {
                        events.push(Event::Html(
                            self.render_code_block(&block.fence, &block.source).into(),
                        ));
                    }
                }
                continue;
            }

            if let Some(ref mut img) = image {
                match event {
                    Event::Text(t) | Event::Code(t) => img.alt.push_str(&t),
                    Event::End(TagEnd::Image) => {
                        if let Some(img) = image.take() {
                            events.push(Event::Html(render_image(&img).into()));
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(_)) => in_code = true,

                Event::Start(Tag::Heading { level, .. }) => {
                    let level = level as u8;
                    let open = match toc.next() {
                        Some(entry) => format!(
                            "<h{level} id=\"{id}\" class=\"heading heading-{level}\">\
                             <a class=\"heading-anchor\" href=\"#{id}\" aria-hidden=\"true\">#</a>",
                            id = escape_html(&entry.id),
                        ),
                        None => format!("<h{level} class=\"heading heading-{level}\">"),
                    };
                    events.push(Event::Html(open.into()));
                }

                Event::End(TagEnd::Heading(level)) => {
                    events.push(Event::Html(format!("</h{}>\n", level as u8).into()));
                }

                Event::Code(t) => {
                    events.push(Event::Html(
                        format!("<code class=\"inline-code\">{}</code>", escape_html(&t)).into(),
                    ));
                }

                Event::Start(Tag::Paragraph) => push_html(&mut events, "<p class=\"prose-p\">"),
                Event::End(TagEnd::Paragraph) => push_html(&mut events, "</p>\n"),

                Event::Start(Tag::List(Some(start))) => {
                    let open = if start == 1 {
                        "<ol class=\"prose-ol\">\n".to_string()
                    } else {
                        format!("<ol class=\"prose-ol\" start=\"{}\">\n", start)
                    };
                    events.push(Event::Html(open.into()));
                }
                Event::Start(Tag::List(None)) => push_html(&mut events, "<ul class=\"prose-ul\">\n"),
                Event::End(TagEnd::List(true)) => push_html(&mut events, "</ol>\n"),
                Event::End(TagEnd::List(false)) => push_html(&mut events, "</ul>\n"),
                Event::Start(Tag::Item) => push_html(&mut events, "<li class=\"prose-li\">"),
                Event::End(TagEnd::Item) => push_html(&mut events, "</li>\n"),

                Event::Start(Tag::Strong) => {
                    push_html(&mut events, "<strong class=\"prose-strong\">")
                }
                Event::End(TagEnd::Strong) => push_html(&mut events, "</strong>"),

                Event::Start(Tag::BlockQuote { .. }) => {
                    push_html(&mut events, "<blockquote class=\"prose-quote\">\n")
                }
                Event::End(TagEnd::BlockQuote { .. }) => push_html(&mut events, "</blockquote>\n"),

                Event::Start(Tag::Link {
                    dest_url, title, ..
                }) => {
                    events.push(Event::Html(render_link_open(&dest_url, &title).into()));
                }
                Event::End(TagEnd::Link) => push_html(&mut events, "</a>"),

                Event::Start(Tag::Image {
                    dest_url, title, ..
                }) => {
                    image = Some(PendingImage {
                        src: dest_url,
                        title,
                        alt: String::new(),
                    });
                }

                Event::Rule => push_html(&mut events, "<hr class=\"prose-hr\" />\n"),

                Event::Start(Tag::Table(alignments)) => {
                    push_html(&mut events, "<div class=\"table-wrapper\">");
                    events.push(Event::Start(Tag::Table(alignments)));
                }
                Event::End(TagEnd::Table) => {
                    events.push(Event::End(TagEnd::Table));
                    push_html(&mut events, "</div>\n");
                }

                other => events.push(other),
            }
        }

        let mut html_output = String::with_capacity(doc.content.len() * 2);
        html::push_html(&mut html_output, events.into_iter());

        RenderedContent {
            html: html_output,
            toc: doc.toc.clone(),
        }
    }

    /// Render one fenced block: header, copy button, numbered and colorized lines.
    ///
    /// Blank lines around the code are dropped before numbering, so line 1 is
    /// the first line with content.
    fn render_code_block(&self, fence: &CodeFenceSpec, source: &str) -> String {
        let code = trim_blank_lines(source);
        let language = fence.language.as_str();

        let mut out = String::with_capacity(code.len() * 3 + 256);

        out.push_str("<div class=\"code-block");
        if fence.is_terminal {
            out.push_str(" terminal");
        }
        out.push('"');
        if !language.is_empty() {
            out.push_str(&format!(" data-language=\"{}\"", escape_html(language)));
        }
        out.push_str(">\n");

        if fence.is_terminal {
            out.push_str(
                "<div class=\"terminal-bar\"><span class=\"dot dot-red\"></span>\
                 <span class=\"dot dot-yellow\"></span><span class=\"dot dot-green\"></span>\
                 <span class=\"terminal-title\">Terminal</span></div>\n",
            );
        }

        if fence.filename.is_some() || !language.is_empty() {
            out.push_str("<div class=\"code-header\">");
            if let Some(filename) = &fence.filename {
                out.push_str(&format!(
                    "<span class=\"code-filename\">{}</span>",
                    escape_html(filename)
                ));
            }
            if !language.is_empty() {
                out.push_str(&format!(
                    "<span class=\"code-language\">{}</span>",
                    escape_html(language)
                ));
            }
            out.push_str("</div>\n");
        }

        out.push_str(&format!(
            "<button class=\"copy-button\" type=\"button\" data-code=\"{}\">Copy</button>\n",
            escape_html(code)
        ));

        out.push_str("<pre class=\"code\"><code");
        if !language.is_empty() {
            out.push_str(&format!(" class=\"language-{}\"", escape_html(language)));
        }
        out.push('>');

        if !code.is_empty() {
            for (index, line) in code.split('\n').enumerate() {
                let line = line.strip_suffix('\r').unwrap_or(line);
                let number = index + 1;
                let highlighted = u32::try_from(number)
                    .map(|n| fence.is_highlighted(n))
                    .unwrap_or(false);

                out.push_str("<span class=\"line");
                if highlighted {
                    out.push_str(" highlighted");
                }
                out.push_str("\">");
                if self.line_numbers {
                    out.push_str(&format!("<span class=\"line-number\">{}</span>", number));
                }
                out.push_str("<span class=\"line-content\">");
                out.push_str(&highlight_line_html(line, language));
                out.push_str("</span></span>\n");
            }
        }

        out.push_str("</code></pre>\n</div>\n");
        out
    }
}

/// `source` without leading blank lines or trailing whitespace.
///
/// Indentation of the first remaining line is kept.
fn trim_blank_lines(source: &str) -> &str {
    let start = source
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(source.len(), |(i, _)| {
            source[..i].rfind('\n').map_or(0, |newline| newline + 1)
        });

    source[start..].trim_end()
}

fn push_html(events: &mut Vec<Event<'_>>, html: &'static str) {
    events.push(Event::Html(CowStr::Borrowed(html)));
}

/// External destinations open in a new tab without leaking the opener.
fn is_external(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}

fn render_link_open(href: &str, title: &str) -> String {
    let mut out = format!("<a href=\"{}\" class=\"prose-link\"", escape_html(href));
    if !title.is_empty() {
        out.push_str(&format!(" title=\"{}\"", escape_html(title)));
    }
    if is_external(href) {
        out.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
    }
    out.push('>');
    out
}

fn render_image(image: &PendingImage<'_>) -> String {
    let mut out = format!(
        "<img src=\"{}\" alt=\"{}\"",
        escape_html(&image.src),
        escape_html(&image.alt)
    );
    if !image.title.is_empty() {
        out.push_str(&format!(" title=\"{}\"", escape_html(&image.title)));
    }
    out.push_str(" class=\"prose-img\" loading=\"lazy\" />");
    out
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::parse_mdx;

    fn render(body: &str) -> RenderedContent {
        HtmlRenderer::new().render(body)
    }

    #[test]
    fn headings_get_anchor_ids() {
        let out = render("# Hello World\n\n## Next Steps\n");

        assert!(out.html.contains(
            "<h1 id=\"hello-world\" class=\"heading heading-1\">\
             <a class=\"heading-anchor\" href=\"#hello-world\" aria-hidden=\"true\">#</a>Hello World</h1>"
        ));
        assert!(out.html.contains("<h2 id=\"next-steps\""));
        assert_eq!(out.toc.len(), 2);
        assert_eq!(out.toc[1].id, "next-steps");
        assert_eq!(out.toc[1].level, 2);
    }

    #[test]
    fn paragraphs_and_lists_have_classes() {
        let out = render("Intro\n\n- one\n- two\n\n3. three\n");

        assert!(out.html.contains("<p class=\"prose-p\">Intro</p>"));
        assert!(out.html.contains("<ul class=\"prose-ul\">"));
        assert!(out.html.contains("<li class=\"prose-li\">one</li>"));
        assert!(out.html.contains("<ol class=\"prose-ol\" start=\"3\">"));
    }

    #[test]
    fn external_links_open_in_new_tab() {
        let out = render("[site](https://example.com) and [post](/blog/other)");

        assert!(out.html.contains(
            "<a href=\"https://example.com\" class=\"prose-link\" \
             target=\"_blank\" rel=\"noopener noreferrer\">site</a>"
        ));
        assert!(out
            .html
            .contains("<a href=\"/blog/other\" class=\"prose-link\">post</a>"));
    }

    #[test]
    fn images_are_lazy() {
        let out = render("![A *cat*](/cat.png \"Cat\")");

        assert!(out.html.contains(
            "<img src=\"/cat.png\" alt=\"A cat\" title=\"Cat\" class=\"prose-img\" loading=\"lazy\" />"
        ));
    }

    #[test]
    fn inline_code_and_blockquote() {
        let out = render("> Use `<T>` here\n\n---\n");

        assert!(out.html.contains("<blockquote class=\"prose-quote\">"));
        assert!(out
            .html
            .contains("<code class=\"inline-code\">&lt;T&gt;</code>"));
        assert!(out.html.contains("<hr class=\"prose-hr\" />"));
    }

    #[test]
    fn tables_are_wrapped() {
        let out = render("| a | b |\n|---|---|\n| 1 | 2 |\n");

        assert!(out.html.contains("<div class=\"table-wrapper\">"));
        assert!(out.html.contains("<table>"));
        assert!(out.html.contains("</table>"));
        assert!(out.html.trim_end().ends_with("</div>"));
    }

    #[test]
    fn code_fence_with_filename_and_highlights() {
        let out = render("```ts:app.ts{2,99}\nconst a = 1;\nlet b = 'x';\n```\n");
        let html = &out.html;

        assert!(html.contains("<div class=\"code-block\" data-language=\"ts\">"));
        assert!(html.contains("<span class=\"code-filename\">app.ts</span>"));
        assert!(html.contains("<span class=\"code-language\">ts</span>"));
        assert!(html.contains("data-code=\"const a = 1;\nlet b = &#39;x&#39;;\""));
        assert!(html.contains(
            "<span class=\"line\"><span class=\"line-number\">1</span>\
             <span class=\"line-content\"><span class=\"tok-keyword\">const</span> a = \
             <span class=\"tok-number\">1</span>;</span></span>"
        ));
        assert!(html.contains("<span class=\"line highlighted\"><span class=\"line-number\">2</span>"));
        assert_eq!(html.matches("<span class=\"line-number\">").count(), 2);
        assert!(!html.contains("line-number\">3"));
    }

    #[test]
    fn blank_lines_around_code_do_not_shift_numbering() {
        let out = render("```js{1}\n\n\n  const a = 1;\nlet b;\n\n```\n");
        let html = &out.html;

        assert!(html.contains(
            "<span class=\"line highlighted\"><span class=\"line-number\">1</span>\
             <span class=\"line-content\">  <span class=\"tok-keyword\">const</span>"
        ));
        assert!(html.contains("<span class=\"line\"><span class=\"line-number\">2</span>"));
        assert_eq!(html.matches("<span class=\"line-number\">").count(), 2);
        assert!(html.contains("data-code=\"  const a = 1;\nlet b;\""));
    }

    #[test]
    fn whitespace_only_fence_has_no_lines() {
        let out = render("```\n\n   \n```\n");

        assert!(!out.html.contains("class=\"line"));
        assert!(out.html.contains("<pre class=\"code\"><code></code></pre>"));
    }

    #[test]
    fn rendered_anchors_match_parsed_toc() {
        let doc = parse_mdx("---\ntitle: T\n---\n## Setup\n\n```ts:a.ts{2}\nx\ny\n```\n\n## Setup\n")
            .unwrap();

        let out = HtmlRenderer::new().render_document(&doc);

        assert_eq!(out.toc, doc.toc);
        assert!(out.html.contains("<h2 id=\"setup\""));
        assert!(out.html.contains("<h2 id=\"setup-1\""));
        assert!(out.html.contains("<span class=\"code-filename\">a.ts</span>"));
        assert!(out.html.contains("<span class=\"line highlighted\"><span class=\"line-number\">2</span>"));
        assert!(!out.html.contains("title: T"));
    }

    #[test]
    fn terminal_fences_get_chrome() {
        let out = render("```bash\ncargo run\n```\n");

        assert!(out.html.contains("<div class=\"code-block terminal\" data-language=\"bash\">"));
        assert!(out.html.contains("<span class=\"terminal-title\">Terminal</span>"));
        assert!(out
            .html
            .contains("<span class=\"line-content\">cargo run</span>"));
    }

    #[test]
    fn malformed_fence_renders_as_plain_code() {
        let out = render("```ts{1-2\nconst a = 1;\n```\n");

        assert!(out.html.contains("<span class=\"code-language\">ts{1-2</span>"));
        assert!(out
            .html
            .contains("<span class=\"line-content\">const a = 1;</span>"));
        assert!(!out.html.contains("highlighted"));
    }

    #[test]
    fn code_is_escaped() {
        let out = render("```html\n<script>alert(1)</script>\n```\n");

        assert!(!out.html.contains("<script>"));
        assert!(out.html.contains("&lt;script&gt;"));
    }

    #[test]
    fn line_numbers_can_be_disabled() {
        let out = HtmlRenderer::new()
            .with_line_numbers(false)
            .render("```\nplain\n```\n");

        assert!(!out.html.contains("line-number"));
        assert!(!out.html.contains("code-header"));
        assert!(out.html.contains("<pre class=\"code\"><code><span class=\"line\">"));
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
