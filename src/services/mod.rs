// src/services/mod.rs
pub mod chatbot;
pub mod completion;
pub mod context;
pub mod intent;
pub mod prompt;
pub mod replies;
pub mod retrieval;
pub mod scraper;
pub mod throttle;
