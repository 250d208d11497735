//! Summa PDF CLI - PDF summarisation with Google Gemini
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use summa_pdf::config::clamp_max_pages;
use summa_pdf::{pdf, summary, ui, Config, SummarizerAgent, SummaryLength, SummaryType};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "summa-pdf")]
#[command(author, version, about = "PDF summarisation with Google Gemini", long_about = None)]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a PDF file
    Summarise {
        /// PDF to summarise
        file: PathBuf,
        /// Summary type (general, bullet_points, executive, technical, academic, key_insights, action_items)
        #[arg(long = "type", default_value = "general")]
        summary_type: String,
        /// Summary length (short, medium, long)
        #[arg(long = "length", default_value = "medium")]
        summary_length: String,
        /// Area the summary should pay attention to (repeatable)
        #[arg(long = "focus")]
        focus_areas: Vec<String>,
        /// Pages to read from the start of the document (1-50)
        #[arg(long)]
        max_pages: Option<usize>,
        /// Gemini model to use
        #[arg(long)]
        model: Option<String>,
        /// API key, overrides config and environment
        #[arg(long)]
        api_key: Option<String>,
        /// Write the summary to a timestamped text file
        #[arg(long)]
        save: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Extract and show the text of a PDF without summarising
    Extract {
        /// PDF to read
        file: PathBuf,
        /// Pages to read from the start of the document (1-50)
        #[arg(long)]
        max_pages: Option<usize>,
        /// Show the whole text instead of a preview
        #[arg(long)]
        full: bool,
    },
    /// Check that the API key works (makes one real request)
    ValidateKey {
        /// API key, overrides config and environment
        #[arg(long)]
        api_key: Option<String>,
    },
    /// List supported summary types and lengths
    Options,
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Summarise {
            file,
            summary_type,
            summary_length,
            focus_areas,
            max_pages,
            model,
            api_key,
            save,
            json,
        }) => {
            let config = Config::load()?;
            let max_pages = clamp_max_pages(max_pages.unwrap_or(config.extraction.max_pages));

            let extraction = pdf::extract(&file, max_pages)
                .with_context(|| format!("could not read {}", file.display()))?;
            if !json {
                println!(
                    "Summarising {} characters from {} of {} pages...\n",
                    extraction.char_count(),
                    extraction.pages_processed,
                    extraction.total_pages
                );
            }

            let agent = SummarizerAgent::new(
                api_key.or_else(|| config.api_key().map(str::to_string)),
                model.unwrap_or_else(|| config.agent.model.clone()),
                config.request_timeout(),
            );
            let result = agent
                .summarize(
                    &extraction.full_text,
                    SummaryType::from_name_or_default(&summary_type),
                    &focus_areas,
                    SummaryLength::from_name_or_default(&summary_length),
                )
                .await;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary::report(&result))?);
            } else {
                match &result {
                    Ok(s) => ui::print_summary(s),
                    Err(e) => {
                        eprintln!("{}", format!("❌ Failed to generate summary: {}", e).red())
                    }
                }
            }

            // Save only after the result is printed; a failed write just warns
            match &result {
                Ok(s) if save => {
                    if let Some(path) = ui::save_or_warn(s, &config.output.path) {
                        eprintln!("💾 Saved to {}", path.display());
                    }
                }
                Ok(_) => {}
                Err(_) => return Ok(ExitCode::FAILURE),
            }
        }
        Some(Commands::Extract {
            file,
            max_pages,
            full,
        }) => {
            let config = Config::load()?;
            let max_pages = clamp_max_pages(max_pages.unwrap_or(config.extraction.max_pages));
            let extraction = pdf::extract(&file, max_pages)
                .with_context(|| format!("could not read {}", file.display()))?;
            ui::print_extraction(&extraction, full);
        }
        Some(Commands::ValidateKey { api_key }) => {
            let config = Config::load()?;
            let agent = SummarizerAgent::new(
                api_key.or_else(|| config.api_key().map(str::to_string)),
                config.agent.model.clone(),
                config.request_timeout(),
            );
            if agent.validate_api_key().await {
                println!("{}", "✅ API key is valid!".green());
            } else {
                println!("{}", "❌ Invalid API key".red());
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Options) => {
            println!("Summary types:");
            for t in SummaryType::ALL {
                println!("  • {}", t);
            }
            println!("\nSummary lengths:");
            for l in SummaryLength::ALL {
                println!("  • {}", l);
            }
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
        None => {
            // Default: interactive session
            let config = Config::load()?;
            ui::run(config).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
