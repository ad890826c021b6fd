//! Frontmatter extraction and parsing.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

/// Parsed frontmatter from a post file.
///
/// The well-known keys are kept as optional strings: a key missing from the
/// source stays `None` rather than collapsing to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Post title
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,

    /// Publication date, usually `YYYY-MM-DD`
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,

    /// Category shown next to the date
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,

    /// Short summary used on the index and in page metadata
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub excerpt: Option<String>,

    /// Any other keys, preserved as-is
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Accept any YAML scalar for a string field.
///
/// Authors write `date: 2024-01-01` or `title: 1984` without quotes; both
/// should come through as text.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a scalar value, found {:?}",
            other
        ))),
    }
}

impl Frontmatter {
    /// Serialize this frontmatter and `body` back into a document.
    ///
    /// The output always parses back to the same frontmatter and body with
    /// [`extract_frontmatter`].
    pub fn to_document(&self, body: &str) -> Result<String, FrontmatterError> {
        let yaml = if self.is_empty() {
            String::new()
        } else {
            serde_yaml::to_string(self).map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
        };

        Ok(format!("---\n{}---\n{}", yaml, body))
    }

    /// True when no key at all was set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date.is_none()
            && self.category.is_none()
            && self.excerpt.is_none()
            && self.extra.is_empty()
    }
}

/// Extract frontmatter from MDX content.
///
/// A frontmatter block opens when the first line is exactly `---` and closes at
/// the next `---` line. The returned body is everything after the closing
/// line, untouched. Content without an opening line yields empty frontmatter
/// and the whole source as body.
pub fn extract_frontmatter(source: &str) -> Result<(Frontmatter, &str), FrontmatterError> {
    let text = source.strip_prefix('\u{feff}').unwrap_or(source);

    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok((Frontmatter::default(), text));
    };
    if !is_delimiter(first) {
        return Ok((Frontmatter::default(), text));
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;

    for line in lines {
        if is_delimiter(line) {
            let yaml = &text[yaml_start..offset];
            let body = &text[offset + line.len()..];
            return Ok((parse_yaml(yaml)?, body));
        }
        offset += line.len();
    }

    Err(FrontmatterError::Unclosed)
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}

fn parse_yaml(yaml: &str) -> Result<Frontmatter, FrontmatterError> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }

    let value: Value =
        serde_yaml::from_str(yaml).map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?;

    match value {
        Value::Null => Ok(Frontmatter::default()),
        Value::Mapping(_) => serde_yaml::from_value(value)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string())),
        _ => Err(FrontmatterError::NotAMapping),
    }
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),

    #[error("Frontmatter must be a mapping of keys to values")]
    NotAMapping,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_valid_frontmatter() {
        let source = r#"---
title: Building a Blog
date: "2024-03-01"
category: Rust
excerpt: Notes from the rewrite
---

# Building a Blog
"#;

        let (fm, body) = extract_frontmatter(source).unwrap();

        assert_eq!(fm.title.as_deref(), Some("Building a Blog"));
        assert_eq!(fm.date.as_deref(), Some("2024-03-01"));
        assert_eq!(fm.category.as_deref(), Some("Rust"));
        assert_eq!(fm.excerpt.as_deref(), Some("Notes from the rewrite"));
        assert_eq!(body, "\n# Building a Blog\n");
    }

    #[test]
    fn missing_keys_stay_absent() {
        let (fm, _) = extract_frontmatter("---\ntitle: Only a title\n---\nbody").unwrap();

        assert_eq!(fm.title.as_deref(), Some("Only a title"));
        assert_eq!(fm.date, None);
        assert_eq!(fm.category, None);
        assert_eq!(fm.excerpt, None);
    }

    #[test]
    fn stringifies_unquoted_scalars() {
        let source = "---\ntitle: 1984\ndate: 2024-01-01\ndraft: true\nexcerpt: ~\n---\n";

        let (fm, _) = extract_frontmatter(source).unwrap();

        assert_eq!(fm.title.as_deref(), Some("1984"));
        assert_eq!(fm.date.as_deref(), Some("2024-01-01"));
        assert_eq!(fm.excerpt, None);
        assert_eq!(fm.extra.get("draft"), Some(&Value::Bool(true)));
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (fm, body) = extract_frontmatter(source).unwrap();

        assert!(fm.is_empty());
        assert_eq!(body, source);
    }

    #[test]
    fn handles_empty_block() {
        let (fm, body) = extract_frontmatter("---\n---\nHello").unwrap();

        assert!(fm.is_empty());
        assert_eq!(body, "Hello");
    }

    #[test]
    fn handles_crlf_line_endings() {
        let (fm, body) = extract_frontmatter("---\r\ntitle: Windows\r\n---\r\nBody\r\n").unwrap();

        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn skips_byte_order_mark() {
        let (fm, body) = extract_frontmatter("\u{feff}---\ntitle: Bom\n---\nBody").unwrap();

        assert_eq!(fm.title.as_deref(), Some("Bom"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let source = "---\ntitle: Test\n# No closing";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }

    #[test]
    fn errors_on_non_mapping() {
        let result = extract_frontmatter("---\n- one\n- two\n---\n");

        assert!(matches!(result, Err(FrontmatterError::NotAMapping)));
    }

    #[test]
    fn serialized_document_parses_back() {
        let fm = Frontmatter {
            title: Some("Hello: World".to_string()),
            date: Some("2024-06-01".to_string()),
            category: Some("Notes".to_string()),
            excerpt: None,
            extra: BTreeMap::new(),
        };
        let body = "\nFirst paragraph.\n\n```ts\nconst a = 1;\n```\n";

        let document = fm.to_document(body).unwrap();
        let (parsed, parsed_body) = extract_frontmatter(&document).unwrap();

        assert_eq!(parsed, fm);
        assert_eq!(parsed_body, body);
    }

    #[test]
    fn empty_frontmatter_serializes_to_bare_delimiters() {
        let document = Frontmatter::default().to_document("text").unwrap();

        assert_eq!(document, "---\n---\ntext");
    }
}
