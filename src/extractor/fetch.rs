//! Raw page download.
//!
//! Uses reqwest for fetching. The body is decoded with encoding_rs, honouring
//! a byte-order mark, then a `<meta charset>` / `http-equiv` declaration, then
//! the `Content-Type` header, then UTF-8.

use super::PageFetcher;
use crate::config::ExtractorConfig;
use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// How far into the document a charset declaration is looked for
const META_SNIFF_BYTES: usize = 2048;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to fetch URL: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("empty response body")]
    EmptyBody,
}

/// Plain HTTP GET downloader
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the configured User-Agent and timeout
    pub fn new(config: &ExtractorConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn download(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        let html = decode_html(&bytes, content_type.as_deref());
        if html.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }

        debug!(url, bytes = bytes.len(), "downloaded page");
        Ok(html)
    }
}

/// Decode a page body to UTF-8 text
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> String {
    let declared = sniff_meta_charset(bytes)
        .or_else(|| content_type.and_then(charset_label).map(str::to_string))
        .and_then(|label| Encoding::for_label(label.as_bytes()));
    let encoding = declared.unwrap_or(UTF_8);

    // decode() still lets a BOM override the declared encoding
    let (text, used, _) = encoding.decode(bytes);
    if used != UTF_8 {
        debug!(encoding = used.name(), "decoded non-UTF-8 page");
    }
    text.into_owned()
}

/// Charset named by a `<meta charset>` or `http-equiv` tag near the top of the page
fn sniff_meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_SNIFF_BYTES)];
    // Declarations are ASCII, so a lossy view is enough to find them
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    head.match_indices("<meta")
        .filter_map(|(start, _)| {
            let tag = &head[start..];
            let tag = &tag[..tag.find('>').unwrap_or(tag.len())];
            charset_label(tag).map(str::to_string)
        })
        .next()
}

/// The value following `charset=` in a header or tag, without quotes
fn charset_label(text: &str) -> Option<&str> {
    let lower = text.to_ascii_lowercase();
    let start = lower.find("charset=")? + "charset=".len();
    let rest = text[start..].trim_start_matches(['"', '\'', ' ']);
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')))
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}
