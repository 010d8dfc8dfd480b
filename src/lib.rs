//! # Zhaiyao
//!
//! Fetch a web article, or take pasted text, and summarise it in Traditional
//! Chinese with an LLM.
//!
//! ## Features
//!
//! - **Fallback Extraction**: a boilerplate-stripping extractor backed by a readability-style parser
//! - **Normalized Results**: every strategy yields the same `ArticleContent`, titles always set
//! - **Prompt-Formatted Output**: headed, bulleted summaries with a short closing synthesis

pub mod config;
pub mod extractor;
pub mod pipeline;
pub mod summarizer;

pub use config::Config;
pub use extractor::{ArticleContent, ExtractionFailure, Extractor};
pub use pipeline::{Digest, DigestError, Pipeline, Source};
pub use summarizer::{GenerationError, Summarizer, SummaryError};

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` overrides the default `warn` level.
///
/// Safe to call more than once; later calls are no-ops.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
