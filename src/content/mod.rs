//! Segmentation of AI-generated answers into display blocks.
//!
//! The upstream workflow answers with one free-form text blob that is
//! supposed to contain three sections introduced by `Block 1`, `Block 2`
//! and `Block 3`. In practice the blob arrives with mixed casing, escaped
//! newlines, stray quotes and leaked JSON braces. [`parse`] recovers the
//! three sections and [`clean`] strips the noise from each one.
//!
//! # Example
//!
//! ```
//! use n8n_dispatch::content::parse;
//!
//! let blocks = parse("BLOCK 1\nHome win\nblock 3\n\"Low scoring\"}");
//! assert_eq!(blocks.block1, "Home win");
//! assert_eq!(blocks.block2, "");
//! assert_eq!(blocks.block3, "Low scoring");
//! ```

mod clean;
mod headings;

#[cfg(test)]
mod clean_tests;

pub use clean::{CleanStep, clean};
pub use headings::{BLOCK_COUNT, HeadingMatch, locate_headings};

use serde::Serialize;

/// The three recovered sections of one answer.
///
/// A section whose heading never appears is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentBlocks {
    pub block1: String,
    pub block2: String,
    pub block3: String,
}

impl ContentBlocks {
    /// Returns true if all three blocks are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.block1.is_empty() && self.block2.is_empty() && self.block3.is_empty()
    }

    /// Returns the blocks in heading order.
    #[must_use]
    pub fn as_array(&self) -> [&str; BLOCK_COUNT] {
        [&self.block1, &self.block2, &self.block3]
    }
}

/// Converts CRLF and lone CR line endings to `\n`.
#[must_use]
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Splits `text` into its three blocks and cleans each one.
///
/// Only the first occurrence of each heading counts. A section runs from
/// the end of its heading to the start of the nearest higher-numbered
/// heading that follows it, or to the end of the text. Anything before the
/// first heading is discarded.
#[must_use]
pub fn parse(text: &str) -> ContentBlocks {
    let text = normalize_line_endings(text);
    let headings = locate_headings(&text);

    let mut sections: [String; BLOCK_COUNT] = Default::default();
    for (index, heading) in headings.iter().enumerate() {
        let Some(heading) = heading else {
            continue;
        };

        let end = headings[index + 1..]
            .iter()
            .flatten()
            .map(|later| later.start)
            .filter(|&start| start >= heading.end)
            .min()
            .unwrap_or(text.len());

        sections[index] = clean(&text[heading.end..end]);
    }

    let [block1, block2, block3] = sections;
    ContentBlocks {
        block1,
        block2,
        block3,
    }
}
