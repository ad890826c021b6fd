//! Stylesheet and runtime script for blog pages.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// The site stylesheet.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// The page runtime: copy buttons and table of contents tracking.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Stylesheet, minified when `minify` is set.
    ///
    /// Falls back to the unminified source if lightningcss rejects it.
    pub fn stylesheet(minify: bool) -> String {
        let css = Self::generate_css();
        if !minify {
            return css;
        }

        match Self::minify_css(&css) {
            Ok(minified) => minified,
            Err(e) => {
                tracing::warn!("Serving unminified CSS: {}", e);
                css
            }
        }
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const DEFAULT_CSS: &str = r#"/* folio - dark blog theme */

:root {
  --background: #0a0a0a;
  --foreground: #e5e5e5;
  --muted: #1e1e1e;
  --muted-foreground: #a3a3a3;
  --subtle: #666666;
  --border: #262626;
  --primary: #9333ea;
  --code-background: #1e1e1e;
  --line-highlight: #2a2a2a;
  --content-max-width: 48rem;
  --toc-width: 16rem;
  --font-sans: system-ui, -apple-system, sans-serif;
  --font-mono: ui-monospace, SFMono-Regular, Menlo, monospace;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: var(--font-sans);
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

.site-header {
  display: flex;
  justify-content: space-between;
  align-items: center;
  max-width: calc(var(--content-max-width) + var(--toc-width) + 4rem);
  margin: 0 auto;
  padding: 1.5rem 2rem;
}

.site-title {
  font-weight: 700;
  font-size: 1.25rem;
  color: var(--foreground);
  text-decoration: none;
}

.site-nav a {
  margin-left: 1.5rem;
  color: var(--muted-foreground);
  text-decoration: none;
}

.site-nav a:hover {
  color: var(--foreground);
}

.main {
  display: grid;
  grid-template-columns: minmax(0, 1fr) var(--toc-width);
  gap: 2rem;
  max-width: calc(var(--content-max-width) + var(--toc-width) + 4rem);
  margin: 0 auto;
  padding: 2rem;
}

.main.single {
  grid-template-columns: minmax(0, 1fr);
  max-width: calc(var(--content-max-width) + 4rem);
}

/* Post list */
.post-list {
  list-style: none;
}

.post-card {
  padding: 1.5rem 0;
  border-bottom: 1px solid var(--border);
}

.post-card h2 a {
  color: var(--foreground);
  text-decoration: none;
}

.post-card h2 a:hover {
  color: var(--primary);
}

.post-meta {
  display: flex;
  gap: 0.75rem;
  font-size: 0.875rem;
  color: var(--muted-foreground);
}

.post-meta a {
  color: var(--muted-foreground);
}

.post-excerpt {
  margin-top: 0.5rem;
  color: var(--muted-foreground);
}

.categories {
  display: flex;
  flex-wrap: wrap;
  gap: 0.5rem;
  margin-bottom: 2rem;
}

.categories a {
  padding: 0.25rem 0.75rem;
  border: 1px solid var(--border);
  border-radius: 9999px;
  color: var(--muted-foreground);
  text-decoration: none;
  font-size: 0.875rem;
}

/* Post */
.post-header {
  padding-bottom: 1rem;
  margin-bottom: 2rem;
  border-bottom: 1px solid var(--border);
}

.post-header h1 {
  font-size: 2.25rem;
  font-weight: 700;
  letter-spacing: -0.02em;
}

.post-header .post-excerpt {
  font-size: 1.125rem;
  margin-bottom: 1rem;
}

.heading {
  position: relative;
  font-weight: 600;
  color: #ffffff;
  scroll-margin-top: 6rem;
  margin: 2.5rem 0 1rem;
}

.heading-1 { font-size: 2rem; }
.heading-2 { font-size: 1.5rem; }
.heading-3 { font-size: 1.25rem; }

.heading-anchor {
  position: absolute;
  margin-left: -1.5rem;
  padding-right: 0.5rem;
  color: var(--subtle);
  text-decoration: none;
  opacity: 0;
  transition: opacity 0.15s;
}

.heading:hover .heading-anchor {
  opacity: 1;
}

.prose-p {
  margin-bottom: 1rem;
  color: #d4d4d4;
}

.prose-ul,
.prose-ol {
  margin: 0 0 1rem 1.5rem;
}

.prose-li {
  margin-top: 0.5rem;
  color: #d4d4d4;
}

.prose-strong {
  font-weight: 700;
  color: #ffffff;
}

.prose-link {
  color: var(--primary);
  text-decoration: underline;
  text-underline-offset: 4px;
}

.prose-link:hover {
  color: #ffffff;
}

.prose-quote {
  margin: 1.5rem 0;
  padding-left: 1rem;
  border-left: 4px solid var(--primary);
  font-style: italic;
}

.prose-img {
  max-width: 100%;
  height: auto;
  margin: 2rem 0;
  border-radius: 0.5rem;
}

.prose-hr {
  margin: 2rem 0;
  border: 0;
  border-top: 1px solid var(--border);
}

.table-wrapper {
  overflow-x: auto;
  margin: 1.5rem 0;
}

.table-wrapper table {
  width: 100%;
  border-collapse: collapse;
}

.table-wrapper th,
.table-wrapper td {
  padding: 0.5rem 0.75rem;
  border: 1px solid var(--border);
  text-align: left;
}

.inline-code {
  font-family: var(--font-mono);
  font-size: 0.875em;
  background: var(--code-background);
  padding: 0.125rem 0.375rem;
  border-radius: 0.25rem;
}

/* Code blocks */
.code-block {
  position: relative;
  margin: 1.5rem 0;
  background: var(--code-background);
  border-radius: 0.5rem;
  overflow: hidden;
}

.code-header {
  display: flex;
  justify-content: space-between;
  padding: 0.5rem 1rem;
  border-bottom: 1px solid var(--border);
  font-family: var(--font-mono);
  font-size: 0.75rem;
  color: var(--subtle);
}

.terminal-bar {
  display: flex;
  align-items: center;
  gap: 0.5rem;
  height: 2rem;
  padding: 0 1rem;
}

.dot {
  width: 0.75rem;
  height: 0.75rem;
  border-radius: 9999px;
}

.dot-red { background: #ff5f56; }
.dot-yellow { background: #ffbd2e; }
.dot-green { background: #27c93f; }

.terminal-title {
  margin-left: 0.5rem;
  font-size: 0.875rem;
  color: var(--muted-foreground);
}

.copy-button {
  position: absolute;
  top: 0.5rem;
  right: 0.5rem;
  padding: 0.25rem 0.75rem;
  font-size: 0.75rem;
  background: #2d2d2d;
  color: var(--foreground);
  border: none;
  border-radius: 0.375rem;
  cursor: pointer;
  opacity: 0;
  transition: opacity 0.15s;
}

.code-block:hover .copy-button,
.copy-button:focus-visible {
  opacity: 1;
}

.code {
  overflow-x: auto;
  padding: 1rem 0;
  font-family: var(--font-mono);
  font-size: 0.8125rem;
  line-height: 1.5rem;
}

.code code {
  display: grid;
}

.line {
  display: block;
  padding: 0 1rem;
  white-space: pre;
  min-height: 1.5rem;
}

.line.highlighted {
  background: var(--line-highlight);
}

.line-number {
  display: inline-block;
  width: 2.5rem;
  margin-right: 1rem;
  padding-right: 1rem;
  text-align: right;
  color: var(--subtle);
  border-right: 1px solid #404040;
  user-select: none;
}

.line-content { color: #d4d4d4; }

.tok-string { color: #fde047; }
.tok-keyword { color: #c084fc; }
.tok-number { color: #67e8f9; }
.tok-comment { color: #6b7280; }
.tok-function { color: #60a5fa; }
.tok-property { color: #ffffff; }
.tok-type { color: #4ade80; }
.tok-tag { color: #f472b6; }
.tok-builtin { color: #22d3ee; }

/* Table of contents */
.toc {
  position: sticky;
  top: 2rem;
  align-self: start;
}

.toc h2 {
  font-size: 0.875rem;
  font-weight: 600;
  color: var(--subtle);
  margin-bottom: 1rem;
}

.toc ul {
  list-style: none;
}

.toc a {
  display: block;
  padding: 0.25rem 0;
  font-size: 0.8125rem;
  color: var(--subtle);
  text-decoration: none;
  transition: color 0.15s;
}

.toc a:hover {
  color: #888888;
}

.toc a.active {
  color: #ffffff;
  font-weight: 500;
}

.toc-level-2 { padding-left: 0.75rem; }
.toc-level-3 { padding-left: 1.5rem; }

.not-found {
  text-align: center;
  padding: 6rem 0;
}

@media (max-width: 1024px) {
  .main {
    grid-template-columns: minmax(0, 1fr);
  }

  .toc {
    display: none;
  }
}
"#;

const DEFAULT_JS: &str = r#"// folio - page runtime
(function() {
  'use strict';

  // Copy buttons carry the raw code in data-code
  document.querySelectorAll('.copy-button').forEach(btn => {
    btn.addEventListener('click', async () => {
      try {
        await navigator.clipboard.writeText(btn.dataset.code || '');
        btn.textContent = 'Copied!';
      } catch (err) {
        btn.textContent = 'Error';
      }
      setTimeout(() => { btn.textContent = 'Copy'; }, 2000);
    });
  });

  // Mark the heading currently in view in the table of contents
  const links = new Map();
  document.querySelectorAll('.toc a').forEach(link => {
    links.set(link.getAttribute('href').slice(1), link);
  });

  if (links.size === 0 || !('IntersectionObserver' in window)) return;

  const observer = new IntersectionObserver(entries => {
    entries.forEach(entry => {
      if (!entry.isIntersecting) return;
      links.forEach(link => link.classList.remove('active'));
      const active = links.get(entry.target.id);
      if (active) active.classList.add('active');
    });
  }, { rootMargin: '0px 0px -80% 0px' });

  links.forEach((_, id) => {
    const heading = document.getElementById(id);
    if (heading) observer.observe(heading);
  });
})();
"#;
