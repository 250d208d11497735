//! Terminal presentation layer.
//!
//! Form-style interactive session built on dialoguer, plus the printers
//! shared with the one-shot commands.

use crate::agent::SummarizerAgent;
use crate::cache::AgentCache;
use crate::config::{clamp_max_pages, Config, MAX_PAGES_LIMIT};
use crate::options::{SummaryLength, SummaryType, FOCUS_AREA_CHOICES};
use crate::pdf::{self, PdfExtraction};
use crate::summary::{save_summary, Summary};
use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, MultiSelect, Password, Select};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// Characters shown in the extracted text preview
pub const PREVIEW_CHARS: usize = 1000;

/// Options chosen in the settings form
#[derive(Debug, Clone)]
pub struct FormSettings {
    pub summary_type: SummaryType,
    pub summary_length: SummaryLength,
    pub focus_areas: Vec<String>,
    pub max_pages: usize,
}

impl FormSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            summary_type: SummaryType::default(),
            summary_length: SummaryLength::default(),
            focus_areas: Vec::new(),
            max_pages: clamp_max_pages(config.extraction.max_pages),
        }
    }
}

/// State kept between menu actions; nothing is persisted
struct Session {
    config: Config,
    cache: AgentCache,
    agent: Option<Arc<SummarizerAgent>>,
    settings: FormSettings,
    extraction: Option<PdfExtraction>,
    result: Option<Summary>,
}

#[derive(Clone, Copy)]
enum Action {
    Extract,
    Summarise,
    TestKey,
    Settings,
    ChangeKey,
    Save,
    Quit,
}

const ACTIONS: [(Action, &str); 7] = [
    (Action::Extract, "📝 Extract text from PDF"),
    (Action::Summarise, "🤖 Generate summary"),
    (Action::TestKey, "🔍 Test API key"),
    (Action::Settings, "⚙️  Summary settings"),
    (Action::ChangeKey, "🔑 Change API key"),
    (Action::Save, "💾 Save summary"),
    (Action::Quit, "Quit"),
];

/// Run the interactive session until the user quits
pub async fn run(config: Config) -> Result<()> {
    println!("{}", "📄 PDF Summarizer with Google Gemini".bold());
    println!("Extract text from a PDF and get an AI-powered summary.\n");

    let cache = AgentCache::new(config.agent.model.clone(), config.request_timeout());
    let settings = FormSettings::from_config(&config);
    let mut session = Session {
        config,
        cache,
        agent: None,
        settings,
        extraction: None,
        result: None,
    };

    match session.config.api_key().map(str::to_string) {
        Some(key) => session.use_key(&key),
        None => session.ask_key()?,
    }

    let labels: Vec<&str> = ACTIONS.iter().map(|(_, label)| *label).collect();
    loop {
        let choice = Select::new()
            .with_prompt("What would you like to do?")
            .default(0)
            .items(&labels)
            .interact()?;

        match ACTIONS[choice].0 {
            Action::Extract => session.extract()?,
            Action::Summarise => session.summarise().await,
            Action::TestKey => session.test_key().await,
            Action::Settings => session.edit_settings()?,
            Action::ChangeKey => session.ask_key()?,
            Action::Save => session.save(),
            Action::Quit => break,
        }
        println!();
    }

    Ok(())
}

impl Session {
    fn use_key(&mut self, key: &str) {
        let agent = self.cache.get_or_create(key);
        if !agent.is_initialized() {
            println!("{}", "⚠️  Could not initialise the Gemini client".yellow());
        }
        self.agent = Some(agent);
    }

    fn ask_key(&mut self) -> Result<()> {
        println!("🔑 Get your API key from https://aistudio.google.com/app/apikey");
        let key = Password::new()
            .with_prompt("Google Gemini API key")
            .allow_empty_password(true)
            .interact()?;

        if key.trim().is_empty() {
            println!("{}", "⚠️  Please enter your API key".yellow());
            self.agent = None;
        } else {
            self.use_key(&key);
        }
        Ok(())
    }

    fn extract(&mut self) -> Result<()> {
        let path: String = Input::new().with_prompt("PDF file").interact_text()?;
        let path = PathBuf::from(path.trim());

        if let Ok(meta) = std::fs::metadata(&path) {
            println!("📄 {}  📊 {:.1} KB", path.display(), meta.len() as f64 / 1024.0);
        }

        match pdf::extract(&path, self.settings.max_pages) {
            Ok(extraction) => {
                let done = format!("✅ Text extracted! Pages: {}", extraction.pages_processed);
                println!("{}", done.green());
                print_extraction(&extraction, false);
                self.extraction = Some(extraction);
            }
            Err(e) => println!("{}", format!("❌ Failed to extract text: {}", e).red()),
        }
        Ok(())
    }

    async fn summarise(&mut self) {
        let Some(agent) = self.agent.clone() else {
            println!("{}", "⚠️  Please enter your API key".yellow());
            return;
        };
        let Some(extraction) = &self.extraction else {
            println!("{}", "⚠️  Extract text from a PDF first".yellow());
            return;
        };

        println!("Generating summary...");
        let result = agent
            .summarize(
                &extraction.full_text,
                self.settings.summary_type,
                &self.settings.focus_areas,
                self.settings.summary_length,
            )
            .await;

        match result {
            Ok(summary) => {
                println!("{}\n", "✅ Summary generated!".green());
                print_summary(&summary);
                self.result = Some(summary);
            }
            Err(e) => println!("{}", format!("❌ Failed to generate summary: {}", e).red()),
        }
    }

    async fn test_key(&self) {
        let Some(agent) = &self.agent else {
            println!("{}", "⚠️  Please enter your API key".yellow());
            return;
        };
        println!("Testing API key...");
        if agent.validate_api_key().await {
            println!("{}", "✅ API key is valid!".green());
        } else {
            println!("{}", "❌ Invalid API key".red());
        }
    }

    fn edit_settings(&mut self) -> Result<()> {
        let types: Vec<&str> = SummaryType::ALL.iter().map(|t| t.as_str()).collect();
        let type_idx = Select::new()
            .with_prompt("Summary type")
            .items(&types)
            .default(index_of(&SummaryType::ALL, &self.settings.summary_type))
            .interact()?;

        let lengths: Vec<&str> = SummaryLength::ALL.iter().map(|l| l.as_str()).collect();
        let length_idx = Select::new()
            .with_prompt("Summary length")
            .items(&lengths)
            .default(index_of(&SummaryLength::ALL, &self.settings.summary_length))
            .interact()?;

        let checked: Vec<bool> = FOCUS_AREA_CHOICES
            .iter()
            .map(|area| self.settings.focus_areas.iter().any(|f| f == area))
            .collect();
        let focus_idx = MultiSelect::new()
            .with_prompt("Focus areas (optional, space to toggle)")
            .items(&FOCUS_AREA_CHOICES)
            .defaults(&checked)
            .interact()?;

        let max_pages: usize = Input::new()
            .with_prompt(format!("Max pages to process (1-{})", MAX_PAGES_LIMIT))
            .default(self.settings.max_pages)
            .validate_with(|n: &usize| {
                if (1..=MAX_PAGES_LIMIT).contains(n) {
                    Ok(())
                } else {
                    Err(format!("enter a number between 1 and {}", MAX_PAGES_LIMIT))
                }
            })
            .interact_text()?;

        self.settings = FormSettings {
            summary_type: SummaryType::ALL[type_idx],
            summary_length: SummaryLength::ALL[length_idx],
            focus_areas: focus_idx
                .into_iter()
                .map(|i| FOCUS_AREA_CHOICES[i].to_string())
                .collect(),
            max_pages,
        };
        Ok(())
    }

    fn save(&self) {
        let Some(summary) = &self.result else {
            println!("{}", "⚠️  No summary to save yet".yellow());
            return;
        };
        if let Some(path) = save_or_warn(summary, &self.config.output.path) {
            println!("{}", format!("💾 Saved to {}", path.display()).green());
        }
    }
}

/// Save the summary, reporting a failure on stderr instead of aborting
pub fn save_or_warn(summary: &Summary, dir: &Path) -> Option<PathBuf> {
    match save_summary(summary, dir) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "could not save summary");
            eprintln!("{}", format!("❌ Failed to save summary: {}", e).red());
            None
        }
    }
}

fn index_of<T: PartialEq>(items: &[T], item: &T) -> usize {
    items.iter().position(|i| i == item).unwrap_or(0)
}

/// Print extraction statistics and the text (or a preview of it)
pub fn print_extraction(extraction: &PdfExtraction, full: bool) {
    println!(
        "Pages processed: {} of {}  |  Total words: {}  |  Characters: {}",
        extraction.pages_processed,
        extraction.total_pages,
        extraction.total_words,
        extraction.char_count()
    );
    println!("\n{}", "--- Extracted text ---".dimmed());
    if full {
        println!("{}", extraction.full_text);
    } else {
        println!("{}", pdf::preview(&extraction.full_text, PREVIEW_CHARS));
    }
    println!("{}", "----------------------".dimmed());
}

/// Print a summary with its metadata
pub fn print_summary(summary: &Summary) {
    println!("{}", "📋 Summary".bold());
    println!("{}\n", summary.summary);

    println!("{}", "ℹ️  Summary Information".bold());
    println!("  Summary Type:    {}", summary.summary_type);
    println!("  Length:          {}", summary.summary_length);
    println!("  Original Length: {} chars", summary.original_text_length);
    println!("  Summary Length:  {} chars", summary.summary_text_length);
    if !summary.focus_areas.is_empty() {
        println!("  Focus Areas:     {}", summary.focus_areas.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_start_from_config() {
        let mut config = Config::default();
        config.extraction.max_pages = 200;
        let settings = FormSettings::from_config(&config);
        assert_eq!(settings.summary_type, SummaryType::General);
        assert_eq!(settings.summary_length, SummaryLength::Medium);
        assert!(settings.focus_areas.is_empty());
        assert_eq!(settings.max_pages, MAX_PAGES_LIMIT);
    }

    fn sample_summary() -> Summary {
        Summary {
            summary: "• fox summary".to_string(),
            provider: crate::summary::PROVIDER.to_string(),
            model: "gemini-1.5-flash".to_string(),
            summary_type: SummaryType::BulletPoints,
            summary_length: SummaryLength::Short,
            focus_areas: Vec::new(),
            timestamp: chrono::Utc::now(),
            original_text_length: 20,
            summary_text_length: 13,
        }
    }

    #[test]
    fn save_failure_keeps_summary() {
        // a regular file where the output directory should be
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let summary = sample_summary();

        assert_eq!(save_or_warn(&summary, blocker.path()), None);
        assert_eq!(summary.summary, "• fox summary");
    }

    #[test]
    fn save_writes_into_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out");
        let path = save_or_warn(&sample_summary(), &nested).unwrap();
        assert!(path.starts_with(&nested));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "• fox summary");
    }

    #[test]
    fn finds_default_selection() {
        assert_eq!(index_of(&SummaryLength::ALL, &SummaryLength::Medium), 1);
        assert_eq!(index_of(&SummaryType::ALL, &SummaryType::ActionItems), 6);
    }
}
