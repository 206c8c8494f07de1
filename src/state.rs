// src/state.rs
use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::error::StartupError;
use crate::services::{
    chatbot::ChatBot,
    completion::OpenAiClient,
    context::ContextAssembler,
    intent::KeywordSet,
    retrieval::DocumentIndex,
    scraper::WebScraper,
    throttle::Throttled,
};

pub type SharedState = Arc<AppState>;

/// Read-only after startup.
pub struct AppState {
    pub bot: ChatBot,
}

impl AppState {
    pub fn new(bot: ChatBot) -> Self {
        Self { bot }
    }

    /// Wire the production collaborators, each behind its own concurrency cap.
    pub fn from_config(cfg: &AppConfig) -> Result<Self, StartupError> {
        let index = match &cfg.retrieval.knowledge_base {
            Some(path) => DocumentIndex::load(path, cfg.retrieval.top_k)?,
            None => {
                info!("no KNOWLEDGE_BASE_PATH set, every query falls back to scraping");
                DocumentIndex::empty(cfg.retrieval.top_k)
            }
        };
        let scraper = WebScraper::new(&cfg.scrape).map_err(|e| StartupError::Client(e.into()))?;
        let completion = OpenAiClient::new(&cfg.completion).map_err(StartupError::Client)?;

        let context = ContextAssembler::new(
            Arc::new(Throttled::new(index, cfg.limits.retrieval)),
            Arc::new(Throttled::new(scraper, cfg.limits.scrape)),
        );
        let bot = ChatBot::new(
            KeywordSet::new(&cfg.keywords),
            context,
            Arc::new(Throttled::new(completion, cfg.limits.completion)),
        );

        Ok(Self::new(bot))
    }
}
