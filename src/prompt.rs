//! Prompt construction.
//!
//! The prompt is a pure function of the request: the same text, options and
//! focus areas always produce byte-identical output.

use crate::options::{SummaryLength, SummaryType};
use serde::{Deserialize, Serialize};

/// Everything needed to ask the model for one summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub text: String,
    pub summary_type: SummaryType,
    pub summary_length: SummaryLength,
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

impl SummaryRequest {
    pub fn new(
        text: impl Into<String>,
        summary_type: SummaryType,
        summary_length: SummaryLength,
        focus_areas: Vec<String>,
    ) -> Self {
        Self {
            text: text.into(),
            summary_type,
            summary_length,
            focus_areas,
        }
    }

    /// True if the text has at least one non-whitespace character
    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Compose the instruction text sent to the model
pub fn build_prompt(request: &SummaryRequest) -> String {
    let mut prompt = format!(
        "Please analyze and summarize the following text.

**Summary Instructions:**
- {}
- {}
",
        request.summary_type.instruction(),
        request.summary_length.instruction()
    );

    if !request.focus_areas.is_empty() {
        prompt.push_str("\n**Special Focus Areas:**\nPay particular attention to:\n");
        let bullets: Vec<String> = request
            .focus_areas
            .iter()
            .map(|area| format!("• {}", area))
            .collect();
        prompt.push_str(&bullets.join("\n"));
        prompt.push('\n');
    }

    prompt.push_str("\n**Text to Summarize:**\n");
    prompt.push_str(&request.text);
    prompt.push_str("\n\n**Summary:**");

    prompt
}
