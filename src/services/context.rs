// src/services/context.rs
//! Context assembly: retrieval index first, live scraping as fallback.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::ChatError;

/// Lookup against the retrieval index.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn query_index(&self, query: &str) -> Result<Vec<String>, ChatError>;
}

/// Live scraping of source pages.
#[async_trait]
pub trait Scraper: Send + Sync {
    async fn get_scraped_context(&self, query: &str) -> Result<Vec<String>, ChatError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextSource {
    Index,
    Scraper,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledContext {
    pub source: ContextSource,
    pub documents: Vec<String>,
}

impl AssembledContext {
    /// Documents joined with newlines, in the order the collaborator returned them.
    pub fn text(&self) -> String {
        self.documents.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[derive(Clone)]
pub struct ContextAssembler {
    retriever: Arc<dyn Retriever>,
    scraper: Arc<dyn Scraper>,
}

impl ContextAssembler {
    pub fn new(retriever: Arc<dyn Retriever>, scraper: Arc<dyn Scraper>) -> Self {
        Self { retriever, scraper }
    }

    /// Collaborator errors are returned as-is.
    pub async fn assemble(&self, query: &str) -> Result<AssembledContext, ChatError> {
        let documents = self.retriever.query_index(query).await?;
        if !documents.is_empty() {
            debug!(count = documents.len(), "context from retrieval index");
            return Ok(AssembledContext {
                source: ContextSource::Index,
                documents,
            });
        }

        warn!("retrieval index returned nothing, falling back to scraper");
        let documents = self.scraper.get_scraped_context(query).await?;
        debug!(count = documents.len(), "context from scraper");
        Ok(AssembledContext {
            source: ContextSource::Scraper,
            documents,
        })
    }
}
