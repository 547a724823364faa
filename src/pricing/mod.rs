//! Tool registry and token pricing.
//!
//! Every tool the dashboard can dispatch to is a [`ToolId`] variant with a
//! static [`ToolDescriptor`]. Unknown ids are still priced, using
//! [`DEFAULT_PRICE`].

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Price charged for tool ids that are not in the registry.
pub const DEFAULT_PRICE: u32 = 5;

/// Gradient tag used for unregistered tools without caller metadata.
pub const DEFAULT_GRADIENT: &str = "from-slate-500 to-slate-700";

/// Descriptive metadata and price for one tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Stable kebab-case identifier sent to the webhook.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Token price per submission.
    pub price: u32,
    /// Styling tag the dashboard renders the tool card with.
    pub gradient_tag: String,
}

/// Caller-provided metadata for a tool.
///
/// Only consulted for ids missing from the registry; registered tools keep
/// their static name and price.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolMeta {
    /// Display name override.
    pub name: Option<String>,
    /// Gradient tag override.
    pub gradient_tag: Option<String>,
}

/// Group of tools that share one webhook endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolFamily {
    /// Text analysis workflows.
    Analysis,
    /// Image-based workflows.
    Vision,
}

impl ToolFamily {
    /// Every family, in configuration order.
    pub const ALL: [Self; 2] = [Self::Analysis, Self::Vision];

    /// Name used in config files and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::Vision => "vision",
        }
    }
}

impl fmt::Display for ToolFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    /// Bookmaker odds breakdown.
    OddsAnalyzer,
    /// Pre-match summary.
    MatchPreview,
    /// Free one-line tip.
    QuickTip,
    /// Reads an uploaded bet slip image.
    SlipScanner,
    /// General image analysis.
    ImageInsight,
}

/// Error returned when a string is not a registered tool id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown tool id '{0}'")]
pub struct UnknownTool(pub String);

impl ToolId {
    /// Every registered tool.
    pub const ALL: [Self; 5] = [
        Self::OddsAnalyzer,
        Self::MatchPreview,
        Self::QuickTip,
        Self::SlipScanner,
        Self::ImageInsight,
    ];

    /// Kebab-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OddsAnalyzer => "odds-analyzer",
            Self::MatchPreview => "match-preview",
            Self::QuickTip => "quick-tip",
            Self::SlipScanner => "slip-scanner",
            Self::ImageInsight => "image-insight",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::OddsAnalyzer => "Odds Analyzer",
            Self::MatchPreview => "Match Preview",
            Self::QuickTip => "Quick Tip",
            Self::SlipScanner => "Slip Scanner",
            Self::ImageInsight => "Image Insight",
        }
    }

    /// Token price. Zero is a legitimate price.
    #[must_use]
    pub const fn price(self) -> u32 {
        match self {
            Self::OddsAnalyzer => 10,
            Self::MatchPreview => 5,
            Self::QuickTip => 0,
            Self::SlipScanner => 8,
            Self::ImageInsight => 15,
        }
    }

    #[must_use]
    pub const fn gradient_tag(self) -> &'static str {
        match self {
            Self::OddsAnalyzer => "from-emerald-500 to-teal-600",
            Self::MatchPreview => "from-blue-500 to-cyan-500",
            Self::QuickTip => "from-amber-400 to-orange-500",
            Self::SlipScanner => "from-fuchsia-500 to-pink-600",
            Self::ImageInsight => "from-violet-500 to-indigo-600",
        }
    }

    /// Endpoint family this tool is dispatched through.
    #[must_use]
    pub const fn family(self) -> ToolFamily {
        match self {
            Self::OddsAnalyzer | Self::MatchPreview | Self::QuickTip => ToolFamily::Analysis,
            Self::SlipScanner | Self::ImageInsight => ToolFamily::Vision,
        }
    }

    /// Full descriptor for this tool.
    #[must_use]
    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor {
            id: self.as_str().to_string(),
            name: self.name().to_string(),
            price: self.price(),
            gradient_tag: self.gradient_tag().to_string(),
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolId {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

/// Returns the registered price for `tool_id`, or [`DEFAULT_PRICE`].
///
/// A registered price of `0` is returned as `0`.
///
/// ```
/// use n8n_dispatch::pricing::{price_of, DEFAULT_PRICE};
///
/// assert_eq!(price_of("quick-tip"), 0);
/// assert_eq!(price_of("no-such-tool"), DEFAULT_PRICE);
/// ```
#[must_use]
pub fn price_of(tool_id: &str) -> u32 {
    tool_id
        .parse::<ToolId>()
        .ok()
        .map_or(DEFAULT_PRICE, ToolId::price)
}

/// Resolves the descriptor stamped onto an outgoing payload.
///
/// Registered ids use the static registry entry. Unknown ids get
/// [`DEFAULT_PRICE`] and whatever metadata the caller supplied.
#[must_use]
pub fn descriptor_for(tool_id: &str, meta: &ToolMeta) -> ToolDescriptor {
    if let Ok(tool) = tool_id.parse::<ToolId>() {
        return tool.descriptor();
    }

    let id = tool_id.trim().to_string();
    ToolDescriptor {
        name: meta.name.clone().unwrap_or_else(|| id.clone()),
        price: price_of(&id),
        gradient_tag: meta
            .gradient_tag
            .clone()
            .unwrap_or_else(|| DEFAULT_GRADIENT.to_string()),
        id,
    }
}
