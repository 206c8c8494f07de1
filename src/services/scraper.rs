// src/services/scraper.rs
//! Live scraping fallback used when the retrieval index has nothing.

use std::collections::HashSet;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::config::ScrapeConfig;
use crate::error::{ChatError, make_snippet};
use crate::services::context::Scraper;
use crate::services::retrieval::terms;

const TEXT_SELECTOR: &str = "h1, h2, h3, p, li";

pub struct WebScraper {
    client: reqwest::Client,
    urls: Vec<String>,
    max_passages: usize,
}

impl WebScraper {
    pub fn new(cfg: &ScrapeConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("planville-chatbot/", env!("CARGO_PKG_VERSION")))
            .timeout(cfg.timeout)
            .build()?;
        Ok(Self {
            client,
            urls: cfg.urls.clone(),
            max_passages: cfg.max_passages,
        })
    }

    async fn fetch(&self, url: &str) -> Result<String, ChatError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status,
                url: url.to_string(),
                snippet: make_snippet(&text),
            });
        }
        Ok(resp.text().await?)
    }
}

/// Text blocks of a page, whitespace-collapsed, in document order.
pub fn extract_passages(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(TEXT_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Passages sharing a term with the query, de-duplicated, capped at `max`.
pub fn select_relevant(passages: Vec<String>, query: &str, max: usize) -> Vec<String> {
    let query_terms = terms(query);
    let mut seen = HashSet::new();
    passages
        .into_iter()
        .filter(|p| !terms(p).is_disjoint(&query_terms))
        .filter(|p| seen.insert(p.clone()))
        .take(max)
        .collect()
}

#[async_trait]
impl Scraper for WebScraper {
    async fn get_scraped_context(&self, query: &str) -> Result<Vec<String>, ChatError> {
        let mut passages = Vec::new();
        let mut last_err = None;
        let mut fetched = 0usize;

        for url in &self.urls {
            match self.fetch(url).await {
                Ok(html) => {
                    fetched += 1;
                    passages.extend(extract_passages(&html));
                }
                Err(e) => {
                    warn!(%url, error = %e, "scrape failed, skipping page");
                    last_err = Some(e);
                }
            }
        }

        if fetched == 0 {
            if let Some(e) = last_err {
                return Err(ChatError::Scrape(e.to_string()));
            }
        }

        let relevant = select_relevant(passages, query, self.max_passages);
        debug!(pages = fetched, passages = relevant.len(), "scraped context");
        Ok(relevant)
    }
}
