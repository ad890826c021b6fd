//! Reading time estimates for post bodies.

use std::fmt;

use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

/// Words read per minute when estimating.
pub const WORDS_PER_MINUTE: usize = 200;

/// Estimated reading time for a piece of content.
///
/// Displays as `"<n> min read"`. A blank body reads in zero minutes; any
/// other body reads in at least one, even when it holds no words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ReadingTime {
    pub words: usize,
    pub minutes: usize,
}

impl ReadingTime {
    /// Estimate the reading time of `content` at `wpm` words per minute.
    pub fn for_content(content: &str, wpm: usize) -> Self {
        let wpm = wpm.max(1);
        let words = content.unicode_words().count();

        let minutes = if content.trim().is_empty() {
            0
        } else {
            words.div_ceil(wpm).max(1)
        };

        Self { words, minutes }
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min read", self.minutes)
    }
}

/// Shorthand for the display string at [`WORDS_PER_MINUTE`].
pub fn reading_time(content: &str) -> String {
    ReadingTime::for_content(content, WORDS_PER_MINUTE).to_string()
}
