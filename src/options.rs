//! Summary options: the kind of summary and how long it should be.
//!
//! Both enumerations carry their own prompt instruction, so the supported
//! lists and the prompt tables are the same data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("unknown summary type: {0}")]
    UnknownSummaryType(String),
    #[error("unknown summary length: {0}")]
    UnknownSummaryLength(String),
}

/// The framing of the summary requested from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryType {
    #[default]
    General,
    BulletPoints,
    Executive,
    Technical,
    Academic,
    KeyInsights,
    ActionItems,
}

impl SummaryType {
    /// Every supported summary type, in display order
    pub const ALL: [SummaryType; 7] = [
        SummaryType::General,
        SummaryType::BulletPoints,
        SummaryType::Executive,
        SummaryType::Technical,
        SummaryType::Academic,
        SummaryType::KeyInsights,
        SummaryType::ActionItems,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryType::General => "general",
            SummaryType::BulletPoints => "bullet_points",
            SummaryType::Executive => "executive",
            SummaryType::Technical => "technical",
            SummaryType::Academic => "academic",
            SummaryType::KeyInsights => "key_insights",
            SummaryType::ActionItems => "action_items",
        }
    }

    /// Task framing sentence used in the prompt
    pub fn instruction(&self) -> &'static str {
        match self {
            SummaryType::General => {
                "Provide a comprehensive summary covering all main points and key information."
            }
            SummaryType::BulletPoints => {
                "Create a bullet-point summary with clear, concise bullet points."
            }
            SummaryType::Executive => {
                "Write an executive summary focusing on key decisions and strategic implications."
            }
            SummaryType::Technical => {
                "Provide a technical summary emphasizing methodologies and technical details."
            }
            SummaryType::Academic => {
                "Create an academic summary with main arguments and conclusions."
            }
            SummaryType::KeyInsights => "Extract and summarize the key insights and takeaways.",
            SummaryType::ActionItems => "Focus on actionable items and recommendations.",
        }
    }

    /// Parse a name, falling back to `General` for anything unrecognised
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!(summary_type = name, "unknown summary type, using general");
            SummaryType::default()
        })
    }
}

impl fmt::Display for SummaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryType {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        SummaryType::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| OptionsError::UnknownSummaryType(s.to_string()))
    }
}

/// Target length of the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    /// Every supported length, shortest first
    pub const ALL: [SummaryLength; 3] = [
        SummaryLength::Short,
        SummaryLength::Medium,
        SummaryLength::Long,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Long => "long",
        }
    }

    /// Length framing sentence used in the prompt
    pub fn instruction(&self) -> &'static str {
        match self {
            SummaryLength::Short => "Keep the summary brief (2-3 sentences or 3-5 bullet points).",
            SummaryLength::Medium => {
                "Provide a moderate-length summary (1-2 paragraphs or 5-8 bullet points)."
            }
            SummaryLength::Long => {
                "Create a detailed summary (2-3 paragraphs or 8-12 bullet points)."
            }
        }
    }

    /// Parse a name, falling back to `Medium` for anything unrecognised
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!(summary_length = name, "unknown summary length, using medium");
            SummaryLength::default()
        })
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryLength {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        SummaryLength::ALL
            .into_iter()
            .find(|l| l.as_str() == needle)
            .ok_or_else(|| OptionsError::UnknownSummaryLength(s.to_string()))
    }
}

/// Focus areas offered by the interactive form
pub const FOCUS_AREA_CHOICES: [&str; 6] = [
    "Key findings",
    "Recommendations",
    "Data analysis",
    "Methodology",
    "Conclusions",
    "Future work",
];
