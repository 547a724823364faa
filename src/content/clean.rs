//! Ordered cleaning pipeline applied to each block.

use std::sync::LazyLock;

use regex::Regex;

/// Leading `: Some Label` followed by a real or escaped line break.
static LEADING_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*:[ \t]*\w[\w \t]*(?:\\n|\r?\n)").expect("label pattern is valid")
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("whitespace pattern is valid"));

/// Quote/brace pairs left behind when the model leaks its JSON envelope.
const BRACE_ARTIFACTS: [&str; 4] = ["\"}", "\" }", "}\"", "} \""];

/// One pure string transform of the cleaning pipeline.
///
/// Steps are applied in [`CleanStep::PIPELINE`] order; each is usable on its
/// own. After [`CleanStep::BraceArtifacts`], [`clean`] reruns the steps
/// that can expose work for one another until the text stops changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanStep {
    /// Drops a single leading `: Words` label line.
    StripLabel,
    /// Replaces the two-character `\n` escape with a space.
    EscapedNewlines,
    /// Replaces real line breaks with a space.
    LineBreaks,
    /// Drops one leading and one trailing `"`.
    EdgeQuotes,
    /// Removes `"}`, `" }`, `}"` and `} "` wherever they occur.
    BraceArtifacts,
    /// Collapses runs of two or more whitespace characters.
    CollapseWhitespace,
    /// Trims surrounding whitespace.
    Trim,
}

impl CleanStep {
    /// Application order.
    pub const PIPELINE: [Self; 7] = [
        Self::StripLabel,
        Self::EscapedNewlines,
        Self::LineBreaks,
        Self::EdgeQuotes,
        Self::BraceArtifacts,
        Self::CollapseWhitespace,
        Self::Trim,
    ];

    /// Applies this step to `input`.
    #[must_use]
    pub fn apply(self, input: &str) -> String {
        match self {
            Self::StripLabel => LEADING_LABEL.replace(input, "").into_owned(),
            Self::EscapedNewlines => input.replace("\\n", " "),
            Self::LineBreaks => input.replace(['\r', '\n'], " "),
            Self::EdgeQuotes => strip_edge_quotes(input).to_string(),
            Self::BraceArtifacts => remove_brace_artifacts(input),
            Self::CollapseWhitespace => WHITESPACE_RUN.replace_all(input, " ").into_owned(),
            Self::Trim => input.trim().to_string(),
        }
    }
}

/// Runs the full pipeline over one section.
///
/// Empty input stays empty.
#[must_use]
pub fn clean(section: &str) -> String {
    if section.is_empty() {
        return String::new();
    }

    CleanStep::PIPELINE.iter().fold(section.to_string(), |text, &step| {
        let text = step.apply(&text);
        if step == CleanStep::BraceArtifacts {
            settle(text)
        } else {
            text
        }
    })
}

/// Steps that can expose new work for each other once something is removed.
const SETTLE_STEPS: [CleanStep; 3] = [
    CleanStep::EscapedNewlines,
    CleanStep::EdgeQuotes,
    CleanStep::BraceArtifacts,
];

// Dropping `}"` from `}""x` leaves a fresh leading quote, so rerun until
// nothing changes.
fn settle(mut text: String) -> String {
    loop {
        let next = SETTLE_STEPS
            .iter()
            .fold(text.clone(), |acc, step| step.apply(&acc));
        if next == text {
            return text;
        }
        text = next;
    }
}

// Surrounding whitespace is ignored so a quote next to a removed line break
// still counts as leading/trailing.
fn strip_edge_quotes(input: &str) -> &str {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    trimmed.strip_suffix('"').unwrap_or(trimmed)
}

// Removal can splice a new artifact together (`""}}`), so repeat until stable.
fn remove_brace_artifacts(input: &str) -> String {
    let mut text = input.to_string();
    loop {
        let before = text.len();
        for artifact in BRACE_ARTIFACTS {
            text = text.replace(artifact, "");
        }
        if text.len() == before {
            return text;
        }
    }
}
