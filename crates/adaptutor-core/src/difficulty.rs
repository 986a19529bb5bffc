//! Difficulty policy: maps a quiz history to a difficulty tier.
//!
//! The tier is a pure function of the mean percentage over the most recent
//! window of quizzes, so it can move up or down freely between quizzes.

use crate::config::DifficultyConfig;
use crate::error::Result;
use crate::model::{DifficultyTier, QuizRecord};

/// Threshold-based difficulty policy.
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyPolicy {
    advanced_threshold: f64,
    intermediate_threshold: f64,
    window: usize,
}

impl Default for DifficultyPolicy {
    fn default() -> Self {
        Self::from_config(&DifficultyConfig::default())
    }
}

impl DifficultyPolicy {
    /// Build a policy, rejecting a zero window or unordered thresholds.
    pub fn new(config: &DifficultyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: &DifficultyConfig) -> Self {
        Self {
            advanced_threshold: config.advanced_threshold,
            intermediate_threshold: config.intermediate_threshold,
            window: config.recent_window,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Tier for `history` using the configured window.
    pub fn compute(&self, history: &[QuizRecord]) -> DifficultyTier {
        self.compute_with_window(history, self.window)
    }

    /// Tier for the last `window` records of `history`.
    ///
    /// A window larger than the history uses the whole history. An empty
    /// history (or a zero window) yields `Beginner`.
    pub fn compute_with_window(&self, history: &[QuizRecord], window: usize) -> DifficultyTier {
        let start = history.len().saturating_sub(window);
        let recent = &history[start..];
        if recent.is_empty() {
            return DifficultyTier::Beginner;
        }

        let mean = recent.iter().map(|r| r.percentage).sum::<f64>() / recent.len() as f64;
        self.tier_for(mean)
    }

    /// Apply the thresholds top-down to a mean percentage.
    pub fn tier_for(&self, mean_percentage: f64) -> DifficultyTier {
        if mean_percentage >= self.advanced_threshold {
            DifficultyTier::Advanced
        } else if mean_percentage >= self.intermediate_threshold {
            DifficultyTier::Intermediate
        } else {
            DifficultyTier::Beginner
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn history(percentages: &[u32]) -> Vec<QuizRecord> {
        percentages
            .iter()
            .map(|&p| QuizRecord::new("topic", p, 100, Utc::now()).unwrap())
            .collect()
    }

    #[test]
    fn default_matches_default_config() {
        let configured = DifficultyPolicy::new(&DifficultyConfig::default()).unwrap();
        assert_eq!(DifficultyPolicy::default(), configured);
        assert_eq!(configured.window(), 3);
    }

    #[test]
    fn empty_history_is_beginner() {
        assert_eq!(
            DifficultyPolicy::default().compute(&[]),
            DifficultyTier::Beginner
        );
    }

    #[test]
    fn high_recent_scores_are_advanced() {
        let policy = DifficultyPolicy::default();
        assert_eq!(
            policy.compute(&history(&[90, 95, 88])),
            DifficultyTier::Advanced
        );
    }

    #[test]
    fn single_low_score_is_beginner() {
        let policy = DifficultyPolicy::default();
        assert_eq!(policy.compute(&history(&[50])), DifficultyTier::Beginner);
    }

    #[test]
    fn thresholds_are_inclusive() {
        let policy = DifficultyPolicy::default();
        assert_eq!(policy.tier_for(85.0), DifficultyTier::Advanced);
        assert_eq!(policy.tier_for(84.99), DifficultyTier::Intermediate);
        assert_eq!(policy.tier_for(70.0), DifficultyTier::Intermediate);
        assert_eq!(policy.tier_for(69.99), DifficultyTier::Beginner);
    }

    #[test]
    fn only_the_recent_window_counts() {
        let policy = DifficultyPolicy::default();
        // Old failures fall outside the window of 3.
        let h = history(&[0, 0, 0, 90, 90, 90]);
        assert_eq!(policy.compute(&h), DifficultyTier::Advanced);
        // Same tail, different prefix: same answer.
        let h2 = history(&[100, 10, 90, 90, 90]);
        assert_eq!(policy.compute(&h2), policy.compute(&h));
    }

    #[test]
    fn tier_can_fall() {
        let policy = DifficultyPolicy::default();
        let h = history(&[95, 95, 95, 40, 40]);
        assert_eq!(policy.compute(&h), DifficultyTier::Beginner);
    }

    #[test]
    fn window_larger_than_history_uses_everything() {
        let policy = DifficultyPolicy::default();
        let h = history(&[80, 60]);
        assert_eq!(
            policy.compute_with_window(&h, 10),
            DifficultyTier::Intermediate
        );
        assert_eq!(policy.compute_with_window(&h, 1), DifficultyTier::Beginner);
    }

    #[test]
    fn new_rejects_bad_config() {
        let config = DifficultyConfig {
            advanced_threshold: 60.0,
            intermediate_threshold: 60.0,
            recent_window: 3,
        };
        assert!(DifficultyPolicy::new(&config).is_err());

        let custom = DifficultyConfig {
            advanced_threshold: 95.0,
            intermediate_threshold: 50.0,
            recent_window: 2,
        };
        let policy = DifficultyPolicy::new(&custom).unwrap();
        assert_eq!(policy.window(), 2);
        assert_eq!(
            policy.compute(&history(&[90, 90])),
            DifficultyTier::Intermediate
        );
    }
}
