//! Core data model types for adaptutor.
//!
//! These are the records the rest of the system passes around: per-user
//! progress, quiz history entries, parsed quiz questions, and the bundled
//! learning package handed back to callers.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TutorError};

/// Tolerance when checking a stored percentage against the derived value.
const PERCENTAGE_EPSILON: f64 = 1e-6;

/// Difficulty tier, totally ordered `Beginner < Intermediate < Advanced`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Beginner,
        DifficultyTier::Intermediate,
        DifficultyTier::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Beginner => "beginner",
            DifficultyTier::Intermediate => "intermediate",
            DifficultyTier::Advanced => "advanced",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyTier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(DifficultyTier::Beginner),
            "intermediate" => Ok(DifficultyTier::Intermediate),
            "advanced" => Ok(DifficultyTier::Advanced),
            other => Err(format!("unknown difficulty tier: {other}")),
        }
    }
}

/// One completed quiz in a user's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRecord {
    /// Topic the quiz was about.
    pub topic: String,
    /// Number of correct answers.
    pub score: u32,
    /// Number of questions; always greater than zero.
    pub total: u32,
    /// `100 * score / total`, stored for convenience.
    pub percentage: f64,
    /// When the quiz was recorded.
    pub timestamp: DateTime<Utc>,
}

impl QuizRecord {
    /// Build a record, rejecting `total == 0` and `score > total`.
    pub fn new(
        topic: impl Into<String>,
        score: u32,
        total: u32,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        if total == 0 {
            return Err(TutorError::Validation(
                "quiz record must cover at least one question".into(),
            ));
        }
        if score > total {
            return Err(TutorError::Validation(format!(
                "score {score} exceeds total {total}"
            )));
        }
        Ok(Self {
            topic: topic.into(),
            score,
            total,
            percentage: percentage_of(score, total),
            timestamp,
        })
    }

    /// Check the record invariants, describing the first violation found.
    pub fn check(&self) -> std::result::Result<(), String> {
        if self.total == 0 {
            return Err("total is zero".into());
        }
        if self.score > self.total {
            return Err(format!("score {} exceeds total {}", self.score, self.total));
        }
        let derived = percentage_of(self.score, self.total);
        if (self.percentage - derived).abs() > PERCENTAGE_EPSILON {
            return Err(format!(
                "percentage {} does not match {}/{}",
                self.percentage, self.score, self.total
            ));
        }
        Ok(())
    }
}

/// `100 * score / total`, or `0.0` for an empty quiz.
pub fn percentage_of(score: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        score as f64 / total as f64 * 100.0
    }
}

/// Durable per-user study record.
///
/// `user_id` is the key the record is stored under and is not part of the
/// persisted body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    #[serde(skip)]
    pub user_id: String,
    /// Deduplicated topic names, in first-studied order.
    #[serde(default)]
    pub topics_studied: Vec<String>,
    /// Chronological, append-only quiz history.
    #[serde(default, rename = "quiz_scores")]
    pub quiz_history: Vec<QuizRecord>,
    /// Cached tier; always what the difficulty policy yields for the history.
    #[serde(default)]
    pub current_difficulty: DifficultyTier,
    /// Reserved; currently always zero.
    #[serde(default)]
    pub total_time: u64,
}

impl UserProgress {
    /// A fresh record: no history, beginner tier.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            topics_studied: Vec::new(),
            quiz_history: Vec::new(),
            current_difficulty: DifficultyTier::Beginner,
            total_time: 0,
        }
    }

    /// Add a topic unless it is already present.
    pub fn add_topic(&mut self, topic: &str) {
        if !self.topics_studied.iter().any(|t| t == topic) {
            self.topics_studied.push(topic.to_string());
        }
    }

    /// Append a record, clamping its timestamp so the history stays
    /// non-decreasing.
    pub fn push_record(&mut self, mut record: QuizRecord) {
        if let Some(last) = self.quiz_history.last() {
            if record.timestamp < last.timestamp {
                record.timestamp = last.timestamp;
            }
        }
        self.quiz_history.push(record);
    }
}

/// A multiple-choice question produced by the quiz parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    /// Option label (`A`, `B`, ...) to answer text.
    pub options: BTreeMap<char, String>,
    /// Label of the correct option; always a key of `options`.
    pub correct: char,
    /// May be empty when the source omitted it.
    #[serde(default)]
    pub explanation: String,
}

/// Why a candidate question was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionDefect {
    EmptyQuestion,
    TooFewOptions(usize),
    CorrectNotInOptions(char),
}

impl fmt::Display for QuestionDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionDefect::EmptyQuestion => write!(f, "question text is empty"),
            QuestionDefect::TooFewOptions(n) => {
                write!(f, "only {n} option(s), at least 2 required")
            }
            QuestionDefect::CorrectNotInOptions(c) => {
                write!(f, "correct answer '{c}' is not among the options")
            }
        }
    }
}

impl QuizQuestion {
    /// Minimum number of options a question must offer.
    pub const MIN_OPTIONS: usize = 2;

    /// Check the question invariants.
    pub fn validate(&self) -> std::result::Result<(), QuestionDefect> {
        if self.question.trim().is_empty() {
            return Err(QuestionDefect::EmptyQuestion);
        }
        if self.options.len() < Self::MIN_OPTIONS {
            return Err(QuestionDefect::TooFewOptions(self.options.len()));
        }
        if !self.options.contains_key(&self.correct) {
            return Err(QuestionDefect::CorrectNotInOptions(self.correct));
        }
        Ok(())
    }
}

/// Output of the knowledge lookup: the raw source text plus a learner-facing
/// version of it. Both are always displayable, even when the lookup failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchSummary {
    pub raw_info: String,
    pub structured_summary: String,
}

/// The bundled result of one research + plan + quiz cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningPackage {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub topic: String,
    pub goal: String,
    pub difficulty: DifficultyTier,
    pub research: ResearchSummary,
    pub learning_plan: String,
    pub quiz: Vec<QuizQuestion>,
}

impl LearningPackage {
    /// Save the package as pretty JSON, creating parent directories.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| TutorError::Validation(format!("failed to serialize package: {e}")))?;
        crate::store::write_atomic(path, json.as_bytes())
    }

    /// Load a package from JSON, re-validating every question.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TutorError::storage(path, format!("failed to read package: {e}")))?;
        let package: LearningPackage = serde_json::from_str(&content)
            .map_err(|e| TutorError::storage(path, format!("failed to parse package: {e}")))?;
        for (i, question) in package.quiz.iter().enumerate() {
            question.validate().map_err(|defect| {
                TutorError::Validation(format!("question {} is malformed: {defect}", i + 1))
            })?;
        }
        Ok(package)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: char, labels: &[char]) -> QuizQuestion {
        QuizQuestion {
            question: "What is 2 + 2?".into(),
            options: labels.iter().map(|&l| (l, format!("option {l}"))).collect(),
            correct,
            explanation: String::new(),
        }
    }

    #[test]
    fn tier_ordering_and_parse() {
        assert!(DifficultyTier::Beginner < DifficultyTier::Intermediate);
        assert!(DifficultyTier::Intermediate < DifficultyTier::Advanced);
        assert_eq!(
            "Advanced".parse::<DifficultyTier>().unwrap(),
            DifficultyTier::Advanced
        );
        assert!("expert".parse::<DifficultyTier>().is_err());
        assert_eq!(DifficultyTier::Intermediate.to_string(), "intermediate");
    }

    #[test]
    fn record_rejects_zero_total() {
        let err = QuizRecord::new("Rust", 0, 0, Utc::now()).unwrap_err();
        assert!(matches!(err, TutorError::Validation(_)));
    }

    #[test]
    fn record_rejects_score_above_total() {
        assert!(QuizRecord::new("Rust", 5, 4, Utc::now()).is_err());
    }

    #[test]
    fn record_derives_percentage() {
        let record = QuizRecord::new("Rust", 3, 4, Utc::now()).unwrap();
        assert_eq!(record.percentage, 75.0);
        assert!(record.check().is_ok());

        let tampered = QuizRecord {
            percentage: 80.0,
            ..record
        };
        assert!(tampered.check().is_err());
    }

    #[test]
    fn topics_are_deduplicated_in_order() {
        let mut progress = UserProgress::new("u1");
        progress.add_topic("Rust");
        progress.add_topic("Go");
        progress.add_topic("Rust");
        assert_eq!(progress.topics_studied, vec!["Rust", "Go"]);
    }

    #[test]
    fn push_record_keeps_timestamps_non_decreasing() {
        let mut progress = UserProgress::new("u1");
        let later = Utc::now();
        let earlier = later - chrono::Duration::seconds(30);
        progress.push_record(QuizRecord::new("a", 1, 1, later).unwrap());
        progress.push_record(QuizRecord::new("b", 1, 1, earlier).unwrap());
        assert_eq!(progress.quiz_history[1].timestamp, later);
    }

    #[test]
    fn progress_serializes_with_persisted_field_names() {
        let mut progress = UserProgress::new("u1");
        progress.push_record(QuizRecord::new("Rust", 1, 2, Utc::now()).unwrap());
        let value = serde_json::to_value(&progress).unwrap();
        assert!(value.get("quiz_scores").is_some());
        assert!(value.get("user_id").is_none());
        assert_eq!(value["current_difficulty"], "beginner");
        assert_eq!(value["total_time"], 0);
    }

    #[test]
    fn question_validation() {
        assert!(question('B', &['A', 'B', 'C', 'D']).validate().is_ok());
        assert_eq!(
            question('E', &['A', 'B']).validate(),
            Err(QuestionDefect::CorrectNotInOptions('E'))
        );
        assert_eq!(
            question('A', &['A']).validate(),
            Err(QuestionDefect::TooFewOptions(1))
        );
        let mut blank = question('A', &['A', 'B']);
        blank.question = "  ".into();
        assert_eq!(blank.validate(), Err(QuestionDefect::EmptyQuestion));
    }

    #[test]
    fn package_json_roundtrip_and_revalidation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("packages").join("rust.json");
        let package = LearningPackage {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            topic: "Rust".into(),
            goal: "Learn ownership".into(),
            difficulty: DifficultyTier::Intermediate,
            research: ResearchSummary {
                raw_info: "raw".into(),
                structured_summary: "structured".into(),
            },
            learning_plan: "plan".into(),
            quiz: vec![question('C', &['A', 'B', 'C'])],
        };
        package.save_json(&path).unwrap();

        let loaded = LearningPackage::load_json(&path).unwrap();
        assert_eq!(loaded.id, package.id);
        assert_eq!(loaded.quiz, package.quiz);
        assert_eq!(loaded.difficulty, DifficultyTier::Intermediate);

        let broken = LearningPackage {
            quiz: vec![question('Z', &['A', 'B'])],
            ..package
        };
        broken.save_json(&path).unwrap();
        let err = LearningPackage::load_json(&path).unwrap_err();
        assert!(matches!(err, TutorError::Validation(_)));
    }
}
