//! adaptutor-core: Adaptive tutoring engine, traits, and progress tracking.
//!
//! This crate defines the data model, the difficulty and recommendation
//! policies, the quiz parser and evaluator, the progress store, and the
//! orchestrator that the rest of adaptutor builds on.

pub mod config;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod parser;
pub mod personalize;
pub mod prompts;
pub mod recommendation;
pub mod store;
pub mod traits;
