// src/services/throttle.rs
//! Caps the number of in-flight calls to one external dependency.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::error::ChatError;
use crate::services::completion::{Completion, CompletionClient};
use crate::services::context::{Retriever, Scraper};

/// Wraps a collaborator; callers beyond `limit` wait for a permit.
pub struct Throttled<T> {
    inner: T,
    permits: Arc<Semaphore>,
}

impl<T> Throttled<T> {
    pub fn new(inner: T, limit: usize) -> Self {
        Self {
            inner,
            permits: Arc::new(Semaphore::new(limit.max(1))),
        }
    }

    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    async fn run<'a, F, R>(&'a self, call: impl FnOnce(&'a T) -> F) -> Result<R, ChatError>
    where
        F: Future<Output = Result<R, ChatError>>,
    {
        // The semaphore is never closed.
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ChatError::LimiterClosed)?;
        call(&self.inner).await
    }
}

#[async_trait]
impl<T: Retriever> Retriever for Throttled<T> {
    async fn query_index(&self, query: &str) -> Result<Vec<String>, ChatError> {
        self.run(|inner| inner.query_index(query)).await
    }
}

#[async_trait]
impl<T: Scraper> Scraper for Throttled<T> {
    async fn get_scraped_context(&self, query: &str) -> Result<Vec<String>, ChatError> {
        self.run(|inner| inner.get_scraped_context(query)).await
    }
}

#[async_trait]
impl<T: CompletionClient> CompletionClient for Throttled<T> {
    async fn complete(&self, prompt: &str) -> Result<Completion, ChatError> {
        self.run(|inner| inner.complete(prompt)).await
    }
}
