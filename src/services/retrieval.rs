// src/services/retrieval.rs
//! In-memory retrieval index over the Planville knowledge base.
//!
//! The corpus is loaded once at startup from either a JSON array of strings
//! or a JSON Lines file (each line a string or an object with a `text`
//! field). Ranking is plain term overlap: a document scores one point per
//! distinct query term it contains.

use std::{collections::HashSet, path::Path};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::ConfigError;
use crate::error::ChatError;
use crate::services::context::Retriever;

const MIN_TERM_LEN: usize = 3;

/// Lower-cased alphanumeric terms of at least three characters.
pub fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TERM_LEN)
        .map(str::to_lowercase)
        .collect()
}

struct Document {
    text: String,
    terms: HashSet<String>,
}

pub struct DocumentIndex {
    docs: Vec<Document>,
    top_k: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Entry {
    Text(String),
    Object { text: String },
}

impl Entry {
    fn into_text(self) -> String {
        match self {
            Entry::Text(t) | Entry::Object { text: t } => t,
        }
    }
}

impl DocumentIndex {
    pub fn new<I>(documents: I, top_k: usize) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let docs = documents
            .into_iter()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .map(|text| Document {
                terms: terms(&text),
                text,
            })
            .collect();
        Self { docs, top_k }
    }

    pub fn empty(top_k: usize) -> Self {
        Self::new(Vec::new(), top_k)
    }

    /// Load the corpus from disk. JSON array or JSON Lines.
    pub fn load(path: &Path, top_k: usize) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::KnowledgeBase {
            path: path.to_path_buf(),
            source,
        })?;
        let documents = parse_corpus(&raw).map_err(|(line, message)| {
            ConfigError::KnowledgeBaseFormat {
                path: path.to_path_buf(),
                line,
                message,
            }
        })?;

        let index = Self::new(documents, top_k);
        info!(path = %path.display(), documents = index.len(), "knowledge base loaded");
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Best `top_k` documents sharing at least one term with the query.
    pub fn search(&self, query: &str) -> Vec<String> {
        let query_terms = terms(query);
        if query_terms.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, usize)> = self
            .docs
            .iter()
            .enumerate()
            .filter_map(|(i, doc)| {
                let score = query_terms.iter().filter(|t| doc.terms.contains(*t)).count();
                (score > 0).then_some((i, score))
            })
            .collect();

        // stable: ties keep load order
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored
            .into_iter()
            .take(self.top_k)
            .map(|(i, _)| self.docs[i].text.clone())
            .collect()
    }
}

fn parse_corpus(raw: &str) -> Result<Vec<String>, (usize, String)> {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('[') {
        let entries: Vec<Entry> = serde_json::from_str(trimmed).map_err(|e| (e.line(), e.to_string()))?;
        return Ok(entries.into_iter().map(Entry::into_text).collect());
    }

    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str::<Entry>(line)
                .map(Entry::into_text)
                .map_err(|e| (n + 1, e.to_string()))
        })
        .collect()
}

#[async_trait]
impl Retriever for DocumentIndex {
    async fn query_index(&self, query: &str) -> Result<Vec<String>, ChatError> {
        let hits = self.search(query);
        debug!(hits = hits.len(), "retrieval index queried");
        Ok(hits)
    }
}
