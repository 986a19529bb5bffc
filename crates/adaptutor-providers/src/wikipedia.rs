//! Wikipedia knowledge lookup.
//!
//! Fetches the introductory extract of a page through the MediaWiki action
//! API and, when a content generator is attached, restructures it into a
//! learner-facing summary. Every failure mode ends in a placeholder summary
//! instead of an error.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use adaptutor_core::model::ResearchSummary;
use adaptutor_core::prompts::research_summary_prompt;
use adaptutor_core::traits::{
    GenerateRequest, KnowledgeLookup, LlmProvider, DEFAULT_SYSTEM_PROMPT,
};

pub const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org/w/api.php";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const SUMMARY_MAX_TOKENS: u32 = 1024;
const SUMMARY_TEMPERATURE: f64 = 0.7;

/// Placeholder for a title that names several pages.
pub fn disambiguation_summary(topic: &str, suggestions: &[String]) -> ResearchSummary {
    ResearchSummary {
        raw_info: format!("Multiple topics found for '{topic}'"),
        structured_summary: format!(
            "Topic: {topic}\n\nPlease be more specific. Did you mean one of these?\n{}",
            suggestions.join(", ")
        ),
    }
}

/// Placeholder for a title with no page.
pub fn missing_page_summary(topic: &str) -> ResearchSummary {
    ResearchSummary {
        raw_info: format!("Could not find Wikipedia page for '{topic}'"),
        structured_summary: format!(
            "Topic: {topic}\n\nNo Wikipedia page found. Please check the spelling or try a different topic."
        ),
    }
}

/// Placeholder for transport and decoding failures.
pub fn lookup_error_summary(topic: &str, error: &anyhow::Error) -> ResearchSummary {
    ResearchSummary {
        raw_info: format!("Could not fetch Wikipedia info: {error:#}"),
        structured_summary: format!(
            "Topic: {topic}\n\nAn error occurred while fetching information. Please try again or choose a different topic."
        ),
    }
}

struct Summarizer {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

/// [`KnowledgeLookup`] backed by Wikipedia.
pub struct WikipediaLookup {
    base_url: String,
    sentences: u32,
    suggestion_limit: usize,
    summarizer: Option<Summarizer>,
    client: reqwest::Client,
}

/// What a page query found.
enum PageLookup {
    Found(String),
    Missing,
    Disambiguation,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryBody>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<WikiPage>,
}

#[derive(Deserialize)]
struct WikiPage {
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    pageprops: Option<PageProps>,
}

#[derive(Deserialize)]
struct PageProps {
    #[serde(default)]
    disambiguation: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    code: String,
    info: String,
}

impl WikipediaLookup {
    pub fn new(base_url: Option<String>, sentences: u32, suggestion_limit: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(concat!("adaptutor/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            sentences,
            suggestion_limit,
            summarizer: None,
            client,
        }
    }

    /// Restructure extracts with `provider` using `model`.
    pub fn with_summarizer(mut self, provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        self.summarizer = Some(Summarizer {
            provider,
            model: model.into(),
        });
        self
    }

    async fn fetch_page(&self, topic: &str) -> anyhow::Result<PageLookup> {
        let sentences = self.sentences.to_string();
        let response: QueryResponse = self
            .client
            .get(&self.base_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("prop", "extracts|pageprops"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("exsentences", sentences.as_str()),
                ("redirects", "1"),
                ("titles", topic),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            anyhow::bail!("{}: {}", error.code, error.info);
        }

        let Some(page) = response.query.and_then(|q| q.pages.into_iter().next()) else {
            return Ok(PageLookup::Missing);
        };
        if page.missing || page.invalid {
            return Ok(PageLookup::Missing);
        }
        if page
            .pageprops
            .is_some_and(|props| props.disambiguation.is_some())
        {
            return Ok(PageLookup::Disambiguation);
        }
        match page.extract {
            Some(extract) if !extract.trim().is_empty() => Ok(PageLookup::Found(extract)),
            _ => Ok(PageLookup::Missing),
        }
    }

    /// Titles close to `topic`, excluding `topic` itself.
    async fn suggestions(&self, topic: &str) -> anyhow::Result<Vec<String>> {
        // One extra slot for the ambiguous title itself.
        let limit = (self.suggestion_limit + 1).to_string();
        let body: serde_json::Value = self
            .client
            .get(&self.base_url)
            .query(&[
                ("action", "opensearch"),
                ("format", "json"),
                ("namespace", "0"),
                ("limit", limit.as_str()),
                ("search", topic),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let titles = body
            .get(1)
            .and_then(|v| v.as_array())
            .map(|titles| {
                titles
                    .iter()
                    .filter_map(|t| t.as_str())
                    .filter(|t| !t.eq_ignore_ascii_case(topic))
                    .take(self.suggestion_limit)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(titles)
    }

    async fn summarize(&self, topic: &str, extract: &str) -> String {
        let Some(summarizer) = &self.summarizer else {
            return extract.to_string();
        };

        let request = GenerateRequest {
            model: summarizer.model.clone(),
            prompt: research_summary_prompt(topic, extract),
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
            max_tokens: SUMMARY_MAX_TOKENS,
            temperature: SUMMARY_TEMPERATURE,
        };
        match summarizer.provider.generate(&request).await {
            Ok(response) => response.content,
            Err(e) => {
                tracing::warn!(topic, error = %format!("{e:#}"), "summary generation failed, using raw extract");
                extract.to_string()
            }
        }
    }
}

#[async_trait]
impl KnowledgeLookup for WikipediaLookup {
    #[instrument(skip(self))]
    async fn lookup(&self, topic: &str) -> ResearchSummary {
        match self.fetch_page(topic).await {
            Ok(PageLookup::Found(extract)) => {
                let structured_summary = self.summarize(topic, &extract).await;
                ResearchSummary {
                    raw_info: extract,
                    structured_summary,
                }
            }
            Ok(PageLookup::Missing) => {
                tracing::warn!(topic, "no Wikipedia page found");
                missing_page_summary(topic)
            }
            Ok(PageLookup::Disambiguation) => {
                tracing::warn!(topic, "ambiguous Wikipedia title");
                let suggestions = self.suggestions(topic).await.unwrap_or_else(|e| {
                    tracing::debug!(error = %e, "could not fetch suggestions");
                    Vec::new()
                });
                disambiguation_summary(topic, &suggestions)
            }
            Err(e) => {
                tracing::warn!(topic, error = %format!("{e:#}"), "Wikipedia lookup failed");
                lookup_error_summary(topic, &e)
            }
        }
    }
}
