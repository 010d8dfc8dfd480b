//! Zhaiyao CLI - article summarisation in Traditional Chinese
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use zhaiyao::{extractor::Extractor, Config, Digest, DigestError, Pipeline, Source};

#[derive(Parser)]
#[command(name = "zhaiyao")]
#[command(author, version, about = "Summarise web articles in Traditional Chinese", long_about = None)]
struct Cli {
    /// Path to a zhaiyao.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a webpage by URL
    Summarise {
        /// URL to summarise
        url: String,
        /// Show raw extracted text instead of summary
        #[arg(long)]
        raw: bool,
    },
    /// Summarise pasted text (from --file, piped stdin, or $EDITOR)
    Paste {
        /// Title of the pasted article
        #[arg(long)]
        title: Option<String>,
        /// Read the text from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    zhaiyao::setup_logging();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let load_config = || match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    match cli.command {
        Commands::Summarise { ref url, raw } => {
            let config = load_config()?;
            println!("Fetching: {}", url);

            if raw {
                // Just show raw extracted text
                let extractor = Extractor::new(&config.extractor)?;
                let article = extractor
                    .fetch_article(url)
                    .await
                    .map_err(DigestError::from)?;
                println!("\n=== {} ===\n", article.title);
                println!("{}", article.content);
                println!(
                    "\n--- Extracted {} characters ({} extractor) ---",
                    article.content.chars().count(),
                    article.strategy
                );
            } else {
                let pipeline = Pipeline::from_config(&config)?;
                let digest = pipeline.run(&Source::Url(url.clone())).await?;
                print_digest(&digest);
            }
        }
        Commands::Paste {
            ref title,
            ref file,
        } => {
            let config = load_config()?;
            let content = read_pasted(file.as_deref())?;

            // Reject blank input before any client is built
            if content.trim().is_empty() {
                return Err(DigestError::EmptyContent.into());
            }

            let title = match title {
                Some(title) => Some(title.clone()),
                None => prompt_title()?,
            };

            let pipeline = Pipeline::from_config(&config)?;
            let digest = pipeline.run(&Source::Text { content, title }).await?;
            print_digest(&digest);
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "zhaiyao", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Pasted text from a file, piped stdin, or an editor buffer
fn read_pasted(file: Option<&Path>) -> anyhow::Result<String> {
    if let Some(path) = file {
        return Ok(std::fs::read_to_string(path)?);
    }

    if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }

    Ok(edit::edit("")?)
}

/// Ask for an optional title when running interactively
fn prompt_title() -> anyhow::Result<Option<String>> {
    if atty::isnt(atty::Stream::Stdin) {
        return Ok(None);
    }

    let title: String = dialoguer::Input::new()
        .with_prompt("Title (optional)")
        .allow_empty(true)
        .interact_text()?;
    Ok(Some(title).filter(|t| !t.trim().is_empty()))
}

fn print_digest(digest: &Digest) {
    println!("\n{}", digest);
}

/// Print one of the distinct user-facing failure messages
fn report(err: &anyhow::Error) {
    let message = match err.downcast_ref::<DigestError>() {
        Some(DigestError::Extraction(_)) => {
            "❌ Could not extract content from this URL. Try `zhaiyao paste` instead.".to_string()
        }
        Some(DigestError::EmptyContent) => "❌ Content cannot be empty.".to_string(),
        Some(DigestError::Generation(_)) => {
            "❌ Summary generation failed. Please try again later.".to_string()
        }
        None => format!("Error: {:#}", err),
    };

    tracing::debug!(error = %err, "command failed");
    eprintln!("{}", message.red());
}
