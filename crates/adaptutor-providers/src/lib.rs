//! adaptutor-providers: content generation backends and knowledge lookup.
//!
//! Implements the `LlmProvider` trait for Gemini, OpenAI, and Ollama, and
//! `KnowledgeLookup` for Wikipedia, plus the config file that wires them up.

pub mod config;
pub mod error;
pub mod gemini;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod wikipedia;

pub use config::{
    create_lookup, create_named_provider, create_provider, load_config, load_config_from,
    AdaptutorConfig, ProviderConfig, WikipediaConfig,
};
pub use error::ProviderError;
