//! Fake strategies and completion clients with call counters.

#![allow(dead_code)]

pub mod server;

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use zhaiyao::extractor::{
    ArticleParser, ExtractError, FetchError, MarkupExtractor, PageFetcher, ParsedArticle,
};
use zhaiyao::summarizer::{ChatRequest, ChatResponse, CompletionClient, GenerationError};

#[derive(Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Returns a fixed page, or fails like a dead host
pub struct FakeFetcher {
    pub page: Option<String>,
    pub calls: Calls,
}

impl FakeFetcher {
    pub fn serving(page: &str) -> Self {
        Self {
            page: Some(page.to_string()),
            calls: Calls::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            page: None,
            calls: Calls::default(),
        }
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn download(&self, _url: &str) -> Result<String, FetchError> {
        self.calls.hit();
        self.page.clone().ok_or(FetchError::EmptyBody)
    }
}

/// Ignores the markup and answers with canned text and title
pub struct FakeMarkup {
    pub text: Option<String>,
    pub title: Option<String>,
    pub calls: Calls,
}

impl FakeMarkup {
    pub fn new(text: Option<&str>, title: Option<&str>) -> Self {
        Self {
            text: text.map(str::to_string),
            title: title.map(str::to_string),
            calls: Calls::default(),
        }
    }
}

impl MarkupExtractor for FakeMarkup {
    fn extract_text(&self, _html: &str) -> Option<String> {
        self.calls.hit();
        self.text.clone()
    }

    fn extract_title(&self, _html: &str) -> Option<String> {
        self.title.clone()
    }
}

pub enum FallbackBehavior {
    Article(ParsedArticle),
    Error,
}

pub struct FakeFallback {
    pub behavior: FallbackBehavior,
    pub calls: Calls,
}

impl FakeFallback {
    pub fn returning(text: &str, title: Option<&str>) -> Self {
        Self {
            behavior: FallbackBehavior::Article(ParsedArticle {
                text: text.to_string(),
                title: title.map(str::to_string),
            }),
            calls: Calls::default(),
        }
    }

    pub fn erroring() -> Self {
        Self {
            behavior: FallbackBehavior::Error,
            calls: Calls::default(),
        }
    }
}

#[async_trait]
impl ArticleParser for FakeFallback {
    async fn parse(&self, _url: &str) -> Result<ParsedArticle, ExtractError> {
        self.calls.hit();
        match &self.behavior {
            FallbackBehavior::Article(article) => Ok(article.clone()),
            FallbackBehavior::Error => Err(ExtractError::Parse("no article".to_string())),
        }
    }
}

/// Records every request and replies with a canned response
#[derive(Clone)]
pub struct FakeCompletion {
    pub reply: Option<String>,
    pub requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl FakeCompletion {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            requests: Arc::default(),
        }
    }

    /// Fails every call with a quota-style API error
    pub fn failing() -> Self {
        Self {
            reply: None,
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletion {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Some(text) => Ok(serde_json::from_value(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": text}}]
            }))?),
            None => Err(GenerationError::Api {
                status: 429,
                message: "You exceeded your current quota".to_string(),
            }),
        }
    }
}
