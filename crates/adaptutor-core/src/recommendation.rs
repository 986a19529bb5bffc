//! Recommendation engine: summary statistics and a suggestion over the
//! whole quiz history.

use serde::{Deserialize, Serialize};

use crate::config::RecommendationConfig;
use crate::error::Result;
use crate::model::{DifficultyTier, QuizRecord, UserProgress};

/// Which suggestion band an average falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionBand {
    /// No quiz taken yet.
    Start,
    Review,
    Continue,
    Advance,
}

/// Recommendation for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub difficulty: DifficultyTier,
    pub topics_completed: usize,
    /// Mean over the entire history, rounded to one decimal place.
    pub average_score: f64,
    pub band: SuggestionBand,
    pub suggestion: String,
}

/// Maps an average score to a suggestion using configured bands.
#[derive(Debug, Clone)]
pub struct Recommender {
    config: RecommendationConfig,
}

impl Default for Recommender {
    fn default() -> Self {
        Self {
            config: RecommendationConfig::default(),
        }
    }
}

impl Recommender {
    pub fn new(config: RecommendationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Build a recommendation from a user's progress record.
    pub fn recommend(&self, progress: &UserProgress) -> Recommendation {
        let history = &progress.quiz_history;
        let average_score = average_percentage(history);
        let band = self.band_for(history, average_score);

        Recommendation {
            difficulty: progress.current_difficulty,
            topics_completed: progress.topics_studied.len(),
            average_score,
            band,
            suggestion: self.message(band).to_string(),
        }
    }

    fn band_for(&self, history: &[QuizRecord], average: f64) -> SuggestionBand {
        if history.is_empty() {
            SuggestionBand::Start
        } else if average >= self.config.advance_threshold {
            SuggestionBand::Advance
        } else if average >= self.config.continue_threshold {
            SuggestionBand::Continue
        } else {
            SuggestionBand::Review
        }
    }

    /// Configured text for a band.
    pub fn message(&self, band: SuggestionBand) -> &str {
        let messages = &self.config.messages;
        match band {
            SuggestionBand::Start => &messages.start,
            SuggestionBand::Review => &messages.review,
            SuggestionBand::Continue => &messages.keep_going,
            SuggestionBand::Advance => &messages.advance,
        }
    }
}

/// Mean percentage over all records, rounded to one decimal; `0.0` if empty.
pub fn average_percentage(history: &[QuizRecord]) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    let mean = history.iter().map(|r| r.percentage).sum::<f64>() / history.len() as f64;
    (mean * 10.0).round() / 10.0
}
