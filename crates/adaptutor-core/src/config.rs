//! Learning policy configuration.
//!
//! Constructed once (usually from the `[learning]` table of the config file)
//! and passed into each component's constructor.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TutorError};
use crate::model::DifficultyTier;

/// Settings for the core learning components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Quiz length used when the caller does not ask for one.
    #[serde(default = "default_num_questions")]
    pub default_num_questions: u32,
    /// Tier used for content generation while a user has no quiz history.
    #[serde(default)]
    pub default_difficulty: DifficultyTier,
    /// How many recent quizzes the dashboard shows.
    #[serde(default = "default_dashboard_recent")]
    pub dashboard_recent: usize,
    #[serde(default)]
    pub difficulty: DifficultyConfig,
    #[serde(default)]
    pub recommendation: RecommendationConfig,
}

/// Cut points for the difficulty policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Mean percentage at or above which the tier is advanced.
    #[serde(default = "default_advanced_threshold")]
    pub advanced_threshold: f64,
    /// Mean percentage at or above which the tier is intermediate.
    #[serde(default = "default_intermediate_threshold")]
    pub intermediate_threshold: f64,
    /// Number of most recent quizzes averaged.
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
}

/// Bands and messages for the recommendation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    #[serde(default = "default_advance_threshold")]
    pub advance_threshold: f64,
    #[serde(default = "default_continue_threshold")]
    pub continue_threshold: f64,
    #[serde(default)]
    pub messages: SuggestionMessages,
}

/// Text shown for each suggestion band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionMessages {
    #[serde(default = "default_start_message")]
    pub start: String,
    #[serde(default = "default_review_message")]
    pub review: String,
    #[serde(default = "default_continue_message", rename = "continue")]
    pub keep_going: String,
    #[serde(default = "default_advance_message")]
    pub advance: String,
}

fn default_num_questions() -> u32 {
    5
}
fn default_dashboard_recent() -> usize {
    5
}
fn default_advanced_threshold() -> f64 {
    85.0
}
fn default_intermediate_threshold() -> f64 {
    70.0
}
fn default_recent_window() -> usize {
    3
}
fn default_advance_threshold() -> f64 {
    80.0
}
fn default_continue_threshold() -> f64 {
    60.0
}
fn default_start_message() -> String {
    "Start your learning journey!".to_string()
}
fn default_review_message() -> String {
    "Review fundamentals and try easier topics.".to_string()
}
fn default_continue_message() -> String {
    "Good work! Keep practising to improve.".to_string()
}
fn default_advance_message() -> String {
    "Great progress! Try more advanced topics.".to_string()
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            default_num_questions: default_num_questions(),
            default_difficulty: DifficultyTier::Beginner,
            dashboard_recent: default_dashboard_recent(),
            difficulty: DifficultyConfig::default(),
            recommendation: RecommendationConfig::default(),
        }
    }
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            advanced_threshold: default_advanced_threshold(),
            intermediate_threshold: default_intermediate_threshold(),
            recent_window: default_recent_window(),
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            advance_threshold: default_advance_threshold(),
            continue_threshold: default_continue_threshold(),
            messages: SuggestionMessages::default(),
        }
    }
}

impl Default for SuggestionMessages {
    fn default() -> Self {
        Self {
            start: default_start_message(),
            review: default_review_message(),
            keep_going: default_continue_message(),
            advance: default_advance_message(),
        }
    }
}

impl LearningConfig {
    /// Reject settings the components cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.default_num_questions == 0 {
            return Err(TutorError::InvalidConfig(
                "default_num_questions must be at least 1".into(),
            ));
        }
        self.difficulty.validate()?;
        self.recommendation.validate()
    }
}

impl DifficultyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.recent_window == 0 {
            return Err(TutorError::InvalidConfig(
                "recent_window must be at least 1".into(),
            ));
        }
        finite("advanced_threshold", self.advanced_threshold)?;
        finite("intermediate_threshold", self.intermediate_threshold)?;
        if self.advanced_threshold <= self.intermediate_threshold {
            return Err(TutorError::InvalidConfig(format!(
                "advanced_threshold ({}) must be greater than intermediate_threshold ({})",
                self.advanced_threshold, self.intermediate_threshold
            )));
        }
        Ok(())
    }
}

impl RecommendationConfig {
    pub fn validate(&self) -> Result<()> {
        finite("advance_threshold", self.advance_threshold)?;
        finite("continue_threshold", self.continue_threshold)?;
        if self.advance_threshold <= self.continue_threshold {
            return Err(TutorError::InvalidConfig(format!(
                "advance_threshold ({}) must be greater than continue_threshold ({})",
                self.advance_threshold, self.continue_threshold
            )));
        }
        Ok(())
    }
}

/// NaN compares false against everything, so ordering checks alone let it through.
fn finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TutorError::InvalidConfig(format!(
            "{name} must be a finite number, got {value}"
        )))
    }
}
