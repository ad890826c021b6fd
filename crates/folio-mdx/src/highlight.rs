//! Highlight range notation (`1,3-5,7`) for code fences.

use std::collections::BTreeSet;

/// Largest line number a range may name. Tokens above it are malformed.
pub const MAX_HIGHLIGHT_LINE: u32 = 10_000;

/// One comma-separated token of a highlight range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightRangeToken {
    /// A single line, `7`
    Single(u32),
    /// An inclusive span, `3-5`
    Range(u32, u32),
}

impl HighlightRangeToken {
    /// Parse a single token. Returns `None` for anything malformed.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();

        match token.split_once('-') {
            Some((start, end)) => {
                Some(Self::Range(parse_line(start)?, parse_line(end)?))
            }
            None => parse_line(token).map(Self::Single),
        }
    }

    /// Lines named by this token. An inverted range names no lines.
    pub fn lines(self) -> std::ops::RangeInclusive<u32> {
        match self {
            Self::Single(line) => line..=line,
            // `start > end` yields an empty iterator
            Self::Range(start, end) => start..=end,
        }
    }
}

fn parse_line(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let line: u32 = s.parse().ok()?;
    (1..=MAX_HIGHLIGHT_LINE).contains(&line).then_some(line)
}

/// Parse a highlight range string into ascending, unique line numbers.
///
/// Malformed tokens are skipped so a typo in one token never breaks the
/// rest of the block.
pub fn parse_highlight_ranges(input: Option<&str>) -> Vec<u32> {
    let Some(input) = input else {
        return Vec::new();
    };

    input
        .split(',')
        .filter_map(HighlightRangeToken::parse)
        .flat_map(HighlightRangeToken::lines)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_mixed_ranges() {
        assert_eq!(parse_highlight_ranges(Some("1,3-5,7")), vec![1, 3, 4, 5, 7]);
    }

    #[test]
    fn empty_and_missing_input() {
        assert_eq!(parse_highlight_ranges(Some("")), Vec::<u32>::new());
        assert_eq!(parse_highlight_ranges(None), Vec::<u32>::new());
    }

    #[test]
    fn inverted_range_is_empty() {
        assert_eq!(parse_highlight_ranges(Some("5-3")), Vec::<u32>::new());
        assert_eq!(parse_highlight_ranges(Some("5-3,8")), vec![8]);
    }

    #[test]
    fn deduplicates_and_sorts() {
        assert_eq!(parse_highlight_ranges(Some("7,2-4,3,1-2")), vec![1, 2, 3, 4, 7]);
    }

    #[test]
    fn tolerates_whitespace() {
        assert_eq!(parse_highlight_ranges(Some(" 1 , 3 - 4 ")), vec![1, 3, 4]);
    }

    #[test]
    fn skips_malformed_tokens() {
        assert_eq!(
            parse_highlight_ranges(Some("a,2,,3-,-4,1-2-3,0,+5,6")),
            vec![2, 6]
        );
    }

    #[test]
    fn skips_out_of_bounds_tokens() {
        assert_eq!(
            parse_highlight_ranges(Some("1-4000000000,99999999999,2")),
            vec![2]
        );
    }

    #[test]
    fn single_line_range() {
        assert_eq!(HighlightRangeToken::parse("4-4"), Some(HighlightRangeToken::Range(4, 4)));
        assert_eq!(parse_highlight_ranges(Some("4-4")), vec![4]);
    }
}
