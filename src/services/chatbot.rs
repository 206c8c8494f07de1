// src/services/chatbot.rs
//! Request orchestration: intent gate, context, prompt, completion.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::error::ChatError;
use crate::message::{ChatRequest, Lang};
use crate::services::{
    completion::{Completion, CompletionClient},
    context::ContextAssembler,
    intent::{Intent, KeywordSet},
    prompt::compose_prompt,
    replies,
};

/// How a chat request ended. Every variant maps to a non-empty reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    OutOfScope,
    NoInformation,
    Answered(String),
    Failed,
}

impl ChatOutcome {
    pub fn into_reply(self, lang: Lang) -> String {
        match self {
            ChatOutcome::OutOfScope => replies::out_of_scope(lang).to_string(),
            ChatOutcome::NoInformation => replies::no_information(lang).to_string(),
            ChatOutcome::Answered(text) => text,
            ChatOutcome::Failed => replies::failure(lang).to_string(),
        }
    }
}

#[derive(Clone)]
pub struct ChatBot {
    keywords: Arc<KeywordSet>,
    context: ContextAssembler,
    completion: Arc<dyn CompletionClient>,
}

impl ChatBot {
    pub fn new(
        keywords: KeywordSet,
        context: ContextAssembler,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            keywords: Arc::new(keywords),
            context,
            completion,
        }
    }

    pub async fn reply(&self, request: &ChatRequest) -> ChatOutcome {
        if self.keywords.classify(&request.message) == Intent::OutOfScope {
            info!("message rejected by intent gate");
            return ChatOutcome::OutOfScope;
        }

        match self.answer(&request.message).await {
            Ok(Completion::Reply(text)) => ChatOutcome::Answered(text),
            Ok(Completion::Empty) => {
                info!("model returned no text");
                ChatOutcome::NoInformation
            }
            Err(e) => {
                error!(error = %e, details = ?e, "chat pipeline failed");
                ChatOutcome::Failed
            }
        }
    }

    async fn answer(&self, question: &str) -> Result<Completion, ChatError> {
        let context = self.context.assemble(question).await?;
        let prompt = compose_prompt(question, &context.text());
        debug!(source = ?context.source, documents = context.documents.len(), "prompt composed");
        self.completion.complete(&prompt).await
    }
}
