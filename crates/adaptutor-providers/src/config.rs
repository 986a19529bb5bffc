//! File configuration and collaborator factories.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use adaptutor_core::config::LearningConfig;
use adaptutor_core::engine::TutorConfig;
use adaptutor_core::traits::LlmProvider;

use crate::gemini::GeminiProvider;
use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;
use crate::wikipedia::{self, WikipediaLookup};

/// Configuration for a single content-generation backend.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    OpenAI {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::Ollama { base_url } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

/// Settings for the Wikipedia knowledge lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikipediaConfig {
    /// MediaWiki action API endpoint.
    #[serde(default = "default_wikipedia_url")]
    pub base_url: String,
    /// Sentences of the page introduction to fetch.
    #[serde(default = "default_sentences")]
    pub sentences: u32,
    /// Ask the content generator to restructure the extract.
    #[serde(default = "default_true")]
    pub summarize: bool,
    /// Maximum suggestions offered for an ambiguous title.
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

fn default_wikipedia_url() -> String {
    wikipedia::DEFAULT_BASE_URL.to_string()
}
fn default_sentences() -> u32 {
    10
}
fn default_true() -> bool {
    true
}
fn default_suggestion_limit() -> usize {
    5
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            base_url: default_wikipedia_url(),
            sentences: default_sentences(),
            summarize: true,
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

/// Top-level adaptutor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptutorConfig {
    /// Default provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Generation model identifier.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Sampling temperature for generated content.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Max tokens per generation.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Replaces the built-in tutor system prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// JSON file holding every user's progress.
    #[serde(default = "default_progress_file")]
    pub progress_file: PathBuf,
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    #[serde(default)]
    pub wikipedia: WikipediaConfig,
    #[serde(default)]
    pub learning: LearningConfig,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_progress_file() -> PathBuf {
    PathBuf::from("data/progress.json")
}

impl Default for AdaptutorConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            system_prompt: None,
            progress_file: default_progress_file(),
            providers: HashMap::new(),
            wikipedia: WikipediaConfig::default(),
            learning: LearningConfig::default(),
        }
    }
}

impl AdaptutorConfig {
    /// Reject settings no component could work with.
    pub fn validate(&self) -> Result<()> {
        self.learning.validate()?;
        if !(0.0..=2.0).contains(&self.temperature) {
            anyhow::bail!("temperature must be between 0.0 and 2.0, got {}", self.temperature);
        }
        if self.max_tokens == 0 {
            anyhow::bail!("max_tokens must be at least 1");
        }
        if self.wikipedia.sentences == 0 {
            anyhow::bail!("wikipedia.sentences must be at least 1");
        }
        Ok(())
    }

    /// Generation settings for the tutor.
    pub fn tutor_config(&self) -> TutorConfig {
        TutorConfig {
            model: self.default_model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            system_prompt_override: self
                .system_prompt
                .clone()
                .filter(|prompt| !prompt.trim().is_empty()),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini { api_key, base_url } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
        ProviderConfig::Ollama { base_url } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `adaptutor.toml` in the current directory
/// 2. `~/.config/adaptutor/config.toml`
///
/// Environment variable overrides: `ADAPTUTOR_GEMINI_KEY` (or `GEMINI_API_KEY`),
/// `ADAPTUTOR_OPENAI_KEY`.
pub fn load_config() -> Result<AdaptutorConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<AdaptutorConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("adaptutor.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<AdaptutorConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => AdaptutorConfig::default(),
    };

    // Apply env var overrides
    let gemini_key = std::env::var("ADAPTUTOR_GEMINI_KEY")
        .or_else(|_| std::env::var("GEMINI_API_KEY"))
        .ok()
        .filter(|k| !k.is_empty());
    if let Some(key) = gemini_key {
        let entry = config
            .providers
            .entry("gemini".into())
            .or_insert(ProviderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::Gemini { api_key, .. } = entry {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("ADAPTUTOR_OPENAI_KEY") {
        let entry = config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let ProviderConfig::OpenAI { api_key, .. } = entry {
            *api_key = key;
        }
    }

    // Resolve env vars in all provider configs
    let resolved: HashMap<String, ProviderConfig> = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.providers = resolved;

    config.validate().with_context(|| match &config_path {
        Some(path) => format!("invalid config: {}", path.display()),
        None => "invalid built-in config".to_string(),
    })?;
    tracing::debug!(?config_path, ?config, "configuration loaded");

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("adaptutor"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    match config {
        ProviderConfig::Gemini { api_key, base_url } => {
            if api_key.is_empty() {
                anyhow::bail!(
                    "provider '{name}' has no API key; set ADAPTUTOR_GEMINI_KEY or api_key in the config"
                );
            }
            Ok(Box::new(GeminiProvider::new(api_key, base_url.clone())))
        }
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => {
            if api_key.is_empty() {
                anyhow::bail!(
                    "provider '{name}' has no API key; set ADAPTUTOR_OPENAI_KEY or api_key in the config"
                );
            }
            Ok(Box::new(OpenAiProvider::new(
                api_key,
                base_url.clone(),
                org_id.clone(),
            )))
        }
        ProviderConfig::Ollama { base_url } => Ok(Box::new(OllamaProvider::new(base_url))),
    }
}

/// Create the named provider, or the configured default when `name` is `None`.
pub fn create_named_provider(
    config: &AdaptutorConfig,
    name: Option<&str>,
) -> Result<Arc<dyn LlmProvider>> {
    let name = name.unwrap_or(&config.default_provider);
    let provider_config = config.providers.get(name).with_context(|| {
        format!("provider '{name}' is not configured. Run `adaptutor init` or set its API key")
    })?;
    Ok(Arc::from(create_provider(name, provider_config)?))
}

/// Create the Wikipedia lookup, wiring in `summarizer` when summaries are
/// enabled.
pub fn create_lookup(
    config: &AdaptutorConfig,
    summarizer: Option<Arc<dyn LlmProvider>>,
) -> WikipediaLookup {
    let wiki = &config.wikipedia;
    let lookup = WikipediaLookup::new(
        Some(wiki.base_url.clone()),
        wiki.sentences,
        wiki.suggestion_limit,
    );
    match summarizer {
        Some(provider) if wiki.summarize => {
            lookup.with_summarizer(provider, config.default_model.clone())
        }
        _ => lookup,
    }
}
