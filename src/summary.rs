//! Summary struct - the successful outcome of a summarisation call.

use crate::agent::AgentError;
use crate::options::{SummaryLength, SummaryType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io;
use std::path::{Path, PathBuf};

/// Provider identifier reported with every summary
pub const PROVIDER: &str = "google_gemini";

/// Outcome of one `summarize` call.
///
/// Failures carry an [`AgentError`] whose message is meant to be shown to
/// the user as-is.
pub type SummaryResult = Result<Summary, AgentError>;

/// A generated summary and the options that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Text returned by the model
    pub summary: String,
    pub provider: String,
    pub model: String,
    pub summary_type: SummaryType,
    pub summary_length: SummaryLength,
    pub focus_areas: Vec<String>,
    /// When the model answered
    pub timestamp: DateTime<Utc>,
    /// Character count of the source text
    pub original_text_length: usize,
    /// Character count of the returned text
    pub summary_text_length: usize,
}

impl Summary {
    /// Name used when offering the summary as a download
    pub fn download_file_name(&self) -> String {
        format!("summary_{}.txt", self.timestamp.timestamp())
    }

    /// Seconds since the epoch, with sub-second precision
    pub fn epoch_seconds(&self) -> f64 {
        self.timestamp.timestamp_millis() as f64 / 1000.0
    }
}

/// Render a result in the uniform `{success, summary | error, ...}` shape
pub fn report(result: &SummaryResult) -> Value {
    match result {
        Ok(summary) => json!({
            "success": true,
            "summary": summary.summary,
            "provider": summary.provider,
            "model": summary.model,
            "summary_type": summary.summary_type,
            "summary_length": summary.summary_length,
            "focus_areas": summary.focus_areas,
            "timestamp": summary.epoch_seconds(),
            "original_text_length": summary.original_text_length,
            "summary_text_length": summary.summary_text_length,
        }),
        Err(e) => json!({
            "success": false,
            "error": e.to_string(),
        }),
    }
}

/// Write the summary text into `dir` and return the file path
pub fn save_summary(summary: &Summary, dir: &Path) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(summary.download_file_name());
    std::fs::write(&path, &summary.summary)?;
    Ok(path)
}
