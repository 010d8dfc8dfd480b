//! URL-or-text to summary control flow.

use crate::config::Config;
use crate::extractor::{ArticleContent, ExtractionFailure, Extractor, FetchError};
use crate::summarizer::{
    ClientInitError, GenerationError, GenerationSettings, OpenAiClient, Summarizer, SummaryError,
};
use std::fmt;
use thiserror::Error;
use tracing::info;

/// What the user asked to summarize
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    Text {
        content: String,
        title: Option<String>,
    },
}

/// The three user-facing failure states
#[derive(Error, Debug)]
pub enum DigestError {
    #[error("could not extract content from this URL; try pasting the text instead")]
    Extraction(#[from] ExtractionFailure),
    #[error("content cannot be empty")]
    EmptyContent,
    #[error("summary generation failed: {0}")]
    Generation(#[from] GenerationError),
}

impl From<SummaryError> for DigestError {
    fn from(error: SummaryError) -> Self {
        match error {
            SummaryError::EmptyContent => DigestError::EmptyContent,
            SummaryError::Generation(e) => DigestError::Generation(e),
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineInitError {
    #[error("failed to build HTTP client: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Client(#[from] ClientInitError),
}

/// A finished summary together with the title it was produced under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub title: Option<String>,
    pub summary: String,
}

/// Display text is the summary alone; it already opens with the title heading
impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary)
    }
}

pub struct Pipeline {
    extractor: Extractor,
    summarizer: Summarizer,
}

impl Pipeline {
    pub fn new(extractor: Extractor, summarizer: Summarizer) -> Self {
        Self {
            extractor,
            summarizer,
        }
    }

    /// Build the HTTP-backed pipeline; requires an API key in `config`
    pub fn from_config(config: &Config) -> Result<Self, PipelineInitError> {
        let extractor = Extractor::new(&config.extractor)?;
        let client = OpenAiClient::from_config(config)?;
        let summarizer = Summarizer::new(client, GenerationSettings::from(&config.agent));
        Ok(Self::new(extractor, summarizer))
    }

    /// Extract if needed, then summarize
    pub async fn run(&self, source: &Source) -> Result<Digest, DigestError> {
        match source {
            Source::Url(url) => {
                let ArticleContent {
                    content,
                    title,
                    strategy,
                } = self.extractor.fetch_article(url).await?;
                info!(url = %url, %strategy, %title, "article extracted");

                let summary = self
                    .summarizer
                    .summarize_article(&content, Some(&title))
                    .await?;
                Ok(Digest {
                    title: Some(title),
                    summary,
                })
            }
            Source::Text { content, title } => {
                let summary = self
                    .summarizer
                    .summarize_article(content, title.as_deref())
                    .await?;
                Ok(Digest {
                    title: title.clone(),
                    summary,
                })
            }
        }
    }
}
