//! # Summa PDF
//!
//! A terminal application for PDF summarisation using Google Gemini.
//!
//! ## Features
//!
//! - **Deterministic prompts**: summary type, length and focus areas map to a fixed prompt layout
//! - **Uniform results**: every failure is folded into a typed [`AgentError`], nothing escapes as a panic
//! - **Page-limited extraction**: only the leading pages of a PDF are read

pub mod agent;
pub mod cache;
pub mod config;
pub mod gemini;
pub mod options;
pub mod pdf;
pub mod prompt;
pub mod summary;
pub mod ui;

pub use agent::{AgentError, Backend, BackendError, FailureKind, SummarizerAgent};
pub use cache::AgentCache;
pub use config::Config;
pub use options::{SummaryLength, SummaryType};
pub use prompt::{build_prompt, SummaryRequest};
pub use summary::{Summary, SummaryResult};
