// src/config.rs
//! Process configuration, read once at startup from the environment.

use std::{path::PathBuf, time::Duration};

use thiserror::Error;

pub const DEFAULT_KEYWORDS: &[&str] = &[
    "photovoltaik",
    "photovoltaics",
    "dach",
    "roof",
    "wärmepumpe",
    "heat pump",
    "klimaanlage",
    "air conditioner",
    "beratung",
    "consultation",
    "angebot",
    "quote",
    "kontakt",
    "contact",
    "termin",
    "appointment",
    "montage",
    "installation",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("failed to read knowledge base {path}: {source}")]
    KnowledgeBase {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed knowledge base {path} (line {line}): {message}")]
    KnowledgeBaseFormat {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

/// Settings for the hosted completion API.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// `None` only when `REQUIRE_API_KEY=false`; the provider then rejects the call.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    pub knowledge_base: Option<PathBuf>,
    pub top_k: usize,
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub urls: Vec<String>,
    pub max_passages: usize,
    pub timeout: Duration,
}

/// In-flight call caps, one per external dependency.
#[derive(Debug, Clone, Copy)]
pub struct ConcurrencyLimits {
    pub retrieval: usize,
    pub scrape: usize,
    pub completion: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub keywords: Vec<String>,
    pub completion: CompletionConfig,
    pub retrieval: RetrievalConfig,
    pub scrape: ScrapeConfig,
    pub limits: ConcurrencyLimits,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let require_key = parse_bool("REQUIRE_API_KEY", get("REQUIRE_API_KEY"), true)?;
        let api_key = get("OPENAI_API_KEY");
        if require_key && api_key.is_none() {
            return Err(ConfigError::MissingEnv("OPENAI_API_KEY"));
        }

        let base_url = get("OPENAI_BASE_URL").unwrap_or_else(|| "https://api.openai.com".into());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "OPENAI_BASE_URL",
                value: base_url,
            });
        }

        let keywords = match get("INTENT_KEYWORDS") {
            Some(raw) => {
                let list = split_list(&raw);
                if list.is_empty() {
                    return Err(ConfigError::Invalid {
                        key: "INTENT_KEYWORDS",
                        value: raw,
                    });
                }
                list
            }
            None => DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        };

        let scrape_urls = get("SCRAPE_URLS")
            .map(|raw| split_list(&raw))
            .unwrap_or_else(|| vec!["https://planville.de".to_string()]);

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            keywords,
            completion: CompletionConfig {
                api_key,
                base_url,
                model: get("OPENAI_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".into()),
                temperature: 0.4,
                timeout: Duration::from_secs(parse_num(
                    "COMPLETION_TIMEOUT_SECS",
                    get("COMPLETION_TIMEOUT_SECS"),
                    60,
                )?),
            },
            retrieval: RetrievalConfig {
                knowledge_base: get("KNOWLEDGE_BASE_PATH").map(PathBuf::from),
                top_k: parse_num("RETRIEVAL_TOP_K", get("RETRIEVAL_TOP_K"), 3)?,
            },
            scrape: ScrapeConfig {
                urls: scrape_urls,
                max_passages: parse_num("SCRAPE_MAX_PASSAGES", get("SCRAPE_MAX_PASSAGES"), 5)?,
                timeout: Duration::from_secs(parse_num(
                    "SCRAPE_TIMEOUT_SECS",
                    get("SCRAPE_TIMEOUT_SECS"),
                    10,
                )?),
            },
            limits: ConcurrencyLimits {
                retrieval: parse_num(
                    "MAX_CONCURRENT_RETRIEVALS",
                    get("MAX_CONCURRENT_RETRIEVALS"),
                    8,
                )?,
                scrape: parse_num("MAX_CONCURRENT_SCRAPES", get("MAX_CONCURRENT_SCRAPES"), 4)?,
                completion: parse_num(
                    "MAX_CONCURRENT_COMPLETIONS",
                    get("MAX_CONCURRENT_COMPLETIONS"),
                    8,
                )?,
            },
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(key: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value: raw }),
    }
}

fn parse_num<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_with_api_key() {
        let cfg = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3000");
        assert_eq!(cfg.completion.model, "gpt-3.5-turbo");
        assert_eq!(cfg.completion.temperature, 0.4);
        assert_eq!(cfg.completion.timeout, Duration::from_secs(60));
        assert_eq!(cfg.keywords.len(), DEFAULT_KEYWORDS.len());
        assert_eq!(cfg.scrape.urls, vec!["https://planville.de".to_string()]);
        assert!(cfg.retrieval.knowledge_base.is_none());
    }

    #[test]
    fn missing_key_is_fatal_by_default() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv("OPENAI_API_KEY")));
    }

    #[test]
    fn missing_key_tolerated_when_not_required() {
        let cfg = AppConfig::from_lookup(lookup(&[("REQUIRE_API_KEY", "false")])).unwrap();
        assert!(cfg.completion.api_key.is_none());
    }

    #[test]
    fn keyword_override_and_bad_numbers() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "k"),
            ("INTENT_KEYWORDS", " Solar , ,Speicher "),
        ]))
        .unwrap();
        assert_eq!(cfg.keywords, vec!["Solar".to_string(), "Speicher".to_string()]);

        let err = AppConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "k"),
            ("RETRIEVAL_TOP_K", "many"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "RETRIEVAL_TOP_K", .. }));
    }
}
