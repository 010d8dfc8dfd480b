//! LLM summarization.
//!
//! Builds the fixed instruction prompt and sends it as a single user message.
//! The reply is trimmed and returned as-is; its structure is not validated.

pub mod client;
pub mod prompt;

pub use client::{
    ChatMessage, ChatRequest, ChatResponse, ClientInitError, CompletionClient, GenerationError,
    OpenAiClient, Role,
};
pub use prompt::{build_prompt, DEFAULT_TITLE};

use crate::config::AgentConfig;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("content cannot be empty")]
    EmptyContent,
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// A validated summarization request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    content: String,
    title: String,
}

impl SummaryRequest {
    /// Fails with [`SummaryError::EmptyContent`] when `content` is blank.
    /// A missing or blank title becomes [`DEFAULT_TITLE`].
    pub fn new(content: &str, title: Option<&str>) -> Result<Self, SummaryError> {
        if content.trim().is_empty() {
            return Err(SummaryError::EmptyContent);
        }
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE);

        Ok(Self {
            content: content.to_string(),
            title: title.to_string(),
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn prompt(&self) -> String {
        build_prompt(&self.title, &self.content)
    }
}

/// Fixed parameters sent with every generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl From<&AgentConfig> for GenerationSettings {
    fn from(agent: &AgentConfig) -> Self {
        Self {
            model: agent.model.clone(),
            temperature: agent.temperature,
            max_tokens: agent.max_tokens,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        (&AgentConfig::default()).into()
    }
}

pub struct Summarizer {
    client: Box<dyn CompletionClient>,
    settings: GenerationSettings,
}

impl Summarizer {
    pub fn new(client: impl CompletionClient + 'static, settings: GenerationSettings) -> Self {
        Self {
            client: Box::new(client),
            settings,
        }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Summarize `content`; blank content is rejected before any request is made.
    pub async fn summarize_article(
        &self,
        content: &str,
        title: Option<&str>,
    ) -> Result<String, SummaryError> {
        let request = SummaryRequest::new(content, title)?;
        self.summarize(&request).await
    }

    /// Send a validated request and return the first completion, trimmed
    pub async fn summarize(&self, request: &SummaryRequest) -> Result<String, SummaryError> {
        let chat = ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![ChatMessage::user(request.prompt())],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        info!(
            model = %chat.model,
            title = request.title(),
            content_chars = request.content().chars().count(),
            "requesting summary"
        );

        let response = self.client.complete(&chat).await?;
        let text = response
            .first_text()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        info!(summary_chars = text.chars().count(), "summary received");
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_title() {
        let request = SummaryRequest::new("body", None).unwrap();
        assert_eq!(request.title(), DEFAULT_TITLE);

        let request = SummaryRequest::new("body", Some("   ")).unwrap();
        assert_eq!(request.title(), DEFAULT_TITLE);

        let request = SummaryRequest::new("body", Some(" Real ")).unwrap();
        assert_eq!(request.title(), "Real");
    }

    #[test]
    fn request_rejects_blank_content() {
        assert!(matches!(
            SummaryRequest::new(" \n\t ", Some("Title")),
            Err(SummaryError::EmptyContent)
        ));
    }

    #[test]
    fn request_keeps_content_verbatim() {
        let request = SummaryRequest::new("  padded body \n", None).unwrap();
        assert_eq!(request.content(), "  padded body \n");
    }

    #[test]
    fn settings_default_to_reference_values() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.model, "gpt-4");
        assert_eq!(settings.max_tokens, 2000);
    }
}
