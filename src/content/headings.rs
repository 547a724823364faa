//! Heading detection.

use std::sync::LazyLock;

use regex::Regex;

/// Number of blocks an answer is split into.
pub const BLOCK_COUNT: usize = 3;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)block\s+([123])").expect("heading pattern is valid"));

/// Byte span of a located heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingMatch {
    /// Offset of the first heading byte.
    pub start: usize,
    /// Offset just past the heading digit.
    pub end: usize,
}

/// Finds the first occurrence of each heading, indexed by block number - 1.
///
/// Matching is case-insensitive, tolerates any whitespace run between the
/// word and the digit, and is not anchored to line starts.
#[must_use]
pub fn locate_headings(text: &str) -> [Option<HeadingMatch>; BLOCK_COUNT] {
    let mut found = [None; BLOCK_COUNT];

    for caps in HEADING.captures_iter(text) {
        let (Some(whole), Some(digit)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let index = match digit.as_str() {
            "1" => 0,
            "2" => 1,
            _ => 2,
        };
        found[index].get_or_insert(HeadingMatch {
            start: whole.start(),
            end: whole.end(),
        });
    }

    found
}
