//! Personalisation: ties the progress store to the difficulty policy and
//! the recommendation engine.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::LearningConfig;
use crate::difficulty::DifficultyPolicy;
use crate::error::Result;
use crate::model::{DifficultyTier, QuizRecord, UserProgress};
use crate::recommendation::{Recommendation, Recommender};
use crate::store::ProgressStore;

/// Progress overview for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub user_id: String,
    pub current_difficulty: DifficultyTier,
    pub topics_studied: Vec<String>,
    pub total_quizzes: usize,
    /// The most recent quizzes, oldest first.
    pub recent_scores: Vec<QuizRecord>,
    pub average_score: f64,
    pub recommendation: String,
}

/// Per-user progress tracking and adaptation.
#[derive(Debug, Clone)]
pub struct Personalizer {
    store: ProgressStore,
    policy: DifficultyPolicy,
    recommender: Recommender,
    config: LearningConfig,
}

impl Personalizer {
    pub fn new(store: ProgressStore, config: LearningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            policy: DifficultyPolicy::new(&config.difficulty)?,
            recommender: Recommender::new(config.recommendation.clone())?,
            store,
            config,
        })
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    /// Load a user's progress with `current_difficulty` recomputed from the
    /// history under the configured policy.
    pub fn load(&self, user_id: &str) -> Result<UserProgress> {
        let mut progress = self.store.load(user_id)?;
        progress.current_difficulty = self.policy.compute(&progress.quiz_history);
        Ok(progress)
    }

    /// Tier used to shape generated content for this user.
    pub fn content_difficulty(&self, user_id: &str) -> Result<DifficultyTier> {
        let progress = self.load(user_id)?;
        Ok(if progress.quiz_history.is_empty() {
            self.config.default_difficulty
        } else {
            progress.current_difficulty
        })
    }

    /// Append a quiz outcome, track its topic, re-derive the tier and persist.
    ///
    /// Rejects `total == 0` before anything is written.
    pub fn record_quiz(
        &self,
        user_id: &str,
        topic: &str,
        score: u32,
        total: u32,
    ) -> Result<UserProgress> {
        let record = QuizRecord::new(topic, score, total, Utc::now())?;

        let mut progress = self.load(user_id)?;
        let previous = progress.current_difficulty;
        progress.push_record(record);
        progress.add_topic(topic);
        progress.current_difficulty = self.policy.compute(&progress.quiz_history);
        self.store.save(user_id, &progress)?;

        tracing::info!(
            user_id,
            topic,
            score,
            total,
            from = %previous,
            to = %progress.current_difficulty,
            "quiz recorded"
        );
        Ok(progress)
    }

    pub fn recommendations(&self, user_id: &str) -> Result<Recommendation> {
        Ok(self.recommender.recommend(&self.load(user_id)?))
    }

    pub fn dashboard(&self, user_id: &str) -> Result<Dashboard> {
        let progress = self.load(user_id)?;
        let recommendation = self.recommender.recommend(&progress);
        let history = &progress.quiz_history;
        let start = history.len().saturating_sub(self.config.dashboard_recent);

        Ok(Dashboard {
            user_id: user_id.to_string(),
            current_difficulty: progress.current_difficulty,
            total_quizzes: history.len(),
            recent_scores: history[start..].to_vec(),
            average_score: recommendation.average_score,
            recommendation: recommendation.suggestion,
            topics_studied: progress.topics_studied,
        })
    }

    pub fn reset(&self, user_id: &str) -> Result<UserProgress> {
        self.store.reset(user_id)
    }
}
