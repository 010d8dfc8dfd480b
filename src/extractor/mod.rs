//! Article extraction with a two-strategy fallback chain.
//!
//! The primary strategy downloads the page once and reads the body and the
//! title from that markup in two independent passes. When it produces no
//! text, the fallback strategy downloads and parses the page on its own.
//! Whatever the strategies return, callers only ever see [`ArticleContent`]
//! or [`ExtractionFailure`].

mod fetch;
mod markup;
mod readability;

pub use fetch::{FetchError, HttpFetcher};
pub use markup::BoilerplateExtractor;
pub use readability::{parse_html, ReadabilityParser};

use crate::config::ExtractorConfig;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Title used when the primary strategy finds no title metadata
pub const PRIMARY_PLACEHOLDER_TITLE: &str = "Untitled (primary extractor)";

/// Title used when the fallback strategy finds no title
pub const FALLBACK_PLACEHOLDER_TITLE: &str = "Untitled (fallback extractor)";

/// Errors raised inside the fallback strategy
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("readability parse failed: {0}")]
    Parse(String),
}

/// Both strategies failed to produce non-empty text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not extract article content from {url}")]
pub struct ExtractionFailure {
    pub url: String,
    /// Why the primary strategy produced nothing
    pub primary: String,
    /// Why the fallback strategy produced nothing
    pub fallback: String,
}

/// Which strategy produced an article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Primary,
    Fallback,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Primary => f.write_str("primary"),
            Strategy::Fallback => f.write_str("fallback"),
        }
    }
}

/// Normalized extraction result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleContent {
    /// Main text content, never blank
    pub content: String,
    /// Page title or the placeholder of the strategy that succeeded
    pub title: String,
    pub strategy: Strategy,
}

/// Output of the fallback strategy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArticle {
    pub text: String,
    pub title: Option<String>,
}

/// Downloads raw page markup
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn download(&self, url: &str) -> Result<String, FetchError>;
}

/// Pulls text and title metadata out of already downloaded markup
pub trait MarkupExtractor: Send + Sync {
    fn extract_text(&self, html: &str) -> Option<String>;
    fn extract_title(&self, html: &str) -> Option<String>;
}

/// Fetches and parses a page in one step
#[async_trait]
pub trait ArticleParser: Send + Sync {
    async fn parse(&self, url: &str) -> Result<ParsedArticle, ExtractError>;
}

/// Runs the primary strategy, then the fallback on failure
pub struct Extractor {
    fetcher: Box<dyn PageFetcher>,
    markup: Box<dyn MarkupExtractor>,
    fallback: Box<dyn ArticleParser>,
}

impl Extractor {
    /// Build the default HTTP-backed extractor
    pub fn new(config: &ExtractorConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(config)?;
        Ok(Self::with_strategies(
            fetcher.clone(),
            BoilerplateExtractor::new(config.min_block_chars),
            ReadabilityParser::new(fetcher),
        ))
    }

    /// Build an extractor from explicit strategies
    pub fn with_strategies(
        fetcher: impl PageFetcher + 'static,
        markup: impl MarkupExtractor + 'static,
        fallback: impl ArticleParser + 'static,
    ) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            markup: Box::new(markup),
            fallback: Box::new(fallback),
        }
    }

    /// Fetch `url` and extract its article.
    ///
    /// Each strategy runs at most once and no strategy error escapes: when
    /// neither yields non-blank text the result is [`ExtractionFailure`].
    pub async fn fetch_article(&self, url: &str) -> Result<ArticleContent, ExtractionFailure> {
        let primary = match self.try_primary(url).await {
            Ok(article) => return Ok(article),
            Err(reason) => reason,
        };
        info!(url, reason = %primary, "primary extraction failed, trying fallback");

        let fallback = match self.try_fallback(url).await {
            Ok(article) => return Ok(article),
            Err(reason) => reason,
        };
        warn!(url, %primary, %fallback, "article extraction failed");

        Err(ExtractionFailure {
            url: url.to_string(),
            primary,
            fallback,
        })
    }

    async fn try_primary(&self, url: &str) -> Result<ArticleContent, String> {
        let html = self
            .fetcher
            .download(url)
            .await
            .map_err(|e| e.to_string())?;

        let content = self
            .markup
            .extract_text(&html)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| "no text extracted from page".to_string())?;

        let title = self.markup.extract_title(&html);
        if title.is_none() {
            debug!(url, "no title metadata, using placeholder");
        }

        Ok(ArticleContent {
            content,
            title: resolve_title(title, PRIMARY_PLACEHOLDER_TITLE),
            strategy: Strategy::Primary,
        })
    }

    async fn try_fallback(&self, url: &str) -> Result<ArticleContent, String> {
        let parsed = self.fallback.parse(url).await.map_err(|e| e.to_string())?;

        if parsed.text.trim().is_empty() {
            return Err("fallback produced no text".to_string());
        }

        Ok(ArticleContent {
            content: parsed.text,
            title: resolve_title(parsed.title, FALLBACK_PLACEHOLDER_TITLE),
            strategy: Strategy::Fallback,
        })
    }
}

/// Trimmed title, or the placeholder when the title is missing or blank
fn resolve_title(title: Option<String>, placeholder: &str) -> String {
    title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| placeholder.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_titles_resolve_to_placeholder() {
        assert_eq!(resolve_title(None, "P"), "P");
        assert_eq!(resolve_title(Some(" \n ".to_string()), "P"), "P");
        assert_eq!(resolve_title(Some(" Real ".to_string()), "P"), "Real");
    }
}
