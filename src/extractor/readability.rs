//! Readability fallback strategy.
//!
//! Downloads the page itself and hands it to dom_smoothie, a port of
//! Mozilla's Readability, so it can recover pages the primary pass misses.

use super::{ArticleParser, ExtractError, HttpFetcher, PageFetcher, ParsedArticle};
use async_trait::async_trait;
use dom_smoothie::{Config, Readability};
use tracing::debug;

/// Upper bound on elements dom_smoothie will walk
const MAX_ELEMENTS_TO_PARSE: usize = 9000;

/// Fallback strategy that performs its own download and parse
#[derive(Debug, Clone)]
pub struct ReadabilityParser {
    fetcher: HttpFetcher,
}

impl ReadabilityParser {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ArticleParser for ReadabilityParser {
    async fn parse(&self, url: &str) -> Result<ParsedArticle, ExtractError> {
        let html = self.fetcher.download(url).await?;
        parse_html(&html, Some(url))
    }
}

/// Run Readability over `html`; `url` resolves relative links when given
pub fn parse_html(html: &str, url: Option<&str>) -> Result<ParsedArticle, ExtractError> {
    let cfg = Config {
        max_elements_to_parse: MAX_ELEMENTS_TO_PARSE,
        ..Default::default()
    };

    let mut readability = Readability::new(html, url, Some(cfg))
        .map_err(|e| ExtractError::Parse(e.to_string()))?;
    let article = readability
        .parse()
        .map_err(|e| ExtractError::Parse(e.to_string()))?;

    let text = tidy_text(&article.text_content.to_string());
    let title = Some(article.title.trim().to_string()).filter(|t| !t.is_empty());
    debug!(chars = text.chars().count(), "readability parsed article");

    Ok(ParsedArticle { text, title })
}

/// Trim every line and drop the blank ones Readability leaves between blocks
fn tidy_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
