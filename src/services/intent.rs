// src/services/intent.rs
//! Keyword gate deciding whether a message is about Planville services.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    InScope,
    OutOfScope,
}

/// Lower-cased topic terms, fixed after startup.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    /// Plain substring match, so "roof" also hits "rooftop".
    pub fn is_valid_intent(&self, message: &str) -> bool {
        let msg = message.to_lowercase();
        self.keywords.iter().any(|k| msg.contains(k.as_str()))
    }

    pub fn classify(&self, message: &str) -> Intent {
        if self.is_valid_intent(message) {
            Intent::InScope
        } else {
            Intent::OutOfScope
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}
