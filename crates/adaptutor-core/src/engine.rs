//! Central tutoring orchestrator.
//!
//! Runs one request at a time: research, plan and quiz generation for a
//! learning package, or grading and progress recording for a quiz
//! submission. Collaborator calls are awaited one after another.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TutorError};
use crate::evaluator::{self, QuizResult};
use crate::model::{DifficultyTier, LearningPackage, QuizQuestion};
use crate::parser::parse_quiz;
use crate::personalize::{Dashboard, Personalizer};
use crate::prompts;
use crate::recommendation::Recommendation;
use crate::traits::{GenerateRequest, KnowledgeLookup, LlmProvider, DEFAULT_SYSTEM_PROMPT};

/// Generation settings for the tutor.
#[derive(Debug, Clone)]
pub struct TutorConfig {
    /// Model identifier passed to the provider.
    pub model: String,
    /// Temperature for generation.
    pub temperature: f64,
    /// Max tokens for generation.
    pub max_tokens: u32,
    /// Optional system prompt override.
    pub system_prompt_override: Option<String>,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.7,
            max_tokens: 4096,
            system_prompt_override: None,
        }
    }
}

/// Stage of learning-package assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageStep {
    Research,
    Plan,
    Quiz,
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_step_start(&self, step: PackageStep, difficulty: DifficultyTier);
    fn on_step_complete(&self, step: PackageStep);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_step_start(&self, _: PackageStep, _: DifficultyTier) {}
    fn on_step_complete(&self, _: PackageStep) {}
}

/// Evaluation of a submitted quiz plus what it changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOutcome {
    #[serde(flatten)]
    pub evaluation: QuizResult,
    pub new_difficulty: DifficultyTier,
    pub recommendation: Recommendation,
}

/// The tutoring orchestrator.
pub struct Tutor {
    provider: Arc<dyn LlmProvider>,
    lookup: Arc<dyn KnowledgeLookup>,
    personalizer: Personalizer,
    config: TutorConfig,
}

impl Tutor {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        lookup: Arc<dyn KnowledgeLookup>,
        personalizer: Personalizer,
        config: TutorConfig,
    ) -> Self {
        Self {
            provider,
            lookup,
            personalizer,
            config,
        }
    }

    pub fn personalizer(&self) -> &Personalizer {
        &self.personalizer
    }

    /// Research a topic and generate a plan and quiz pitched at the user's
    /// current tier.
    ///
    /// The quiz holds however many questions survived parsing, which may be
    /// fewer than requested. Any generation failure aborts the whole package.
    pub async fn create_learning_package(
        &self,
        topic: &str,
        goal: &str,
        user_id: &str,
        num_questions: Option<u32>,
        progress: &dyn ProgressReporter,
    ) -> Result<LearningPackage> {
        let difficulty = self.personalizer.content_difficulty(user_id)?;
        let requested = num_questions.unwrap_or(self.personalizer.config().default_num_questions);
        tracing::info!(topic, user_id, %difficulty, "creating learning package");

        progress.on_step_start(PackageStep::Research, difficulty);
        let research = self.lookup.lookup(topic).await;
        progress.on_step_complete(PackageStep::Research);

        progress.on_step_start(PackageStep::Plan, difficulty);
        let learning_plan = self
            .generate(prompts::learning_plan_prompt(topic, goal, difficulty))
            .await?;
        progress.on_step_complete(PackageStep::Plan);

        progress.on_step_start(PackageStep::Quiz, difficulty);
        let raw_quiz = self
            .generate(prompts::quiz_prompt(topic, difficulty, requested))
            .await?;
        let quiz = parse_quiz(&raw_quiz);
        if quiz.len() < requested as usize {
            tracing::warn!(
                requested,
                parsed = quiz.len(),
                "quiz has fewer questions than requested"
            );
        }
        progress.on_step_complete(PackageStep::Quiz);

        tracing::info!(topic, questions = quiz.len(), "learning package complete");
        Ok(LearningPackage {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            topic: topic.to_string(),
            goal: goal.to_string(),
            difficulty,
            research,
            learning_plan,
            quiz,
        })
    }

    /// Grade a quiz, record it, and return the result with the new tier and
    /// recommendation.
    pub fn evaluate_quiz(
        &self,
        questions: &[QuizQuestion],
        answers: &HashMap<usize, String>,
        topic: &str,
        user_id: &str,
    ) -> Result<QuizOutcome> {
        submit_quiz(&self.personalizer, questions, answers, topic, user_id)
    }

    /// Generate a lesson for one module of a topic at the user's tier.
    pub async fn generate_lesson(
        &self,
        topic: &str,
        module_name: &str,
        user_id: &str,
    ) -> Result<String> {
        let difficulty = self.personalizer.content_difficulty(user_id)?;
        tracing::info!(topic, module_name, %difficulty, "generating lesson");
        self.generate(prompts::lesson_prompt(topic, module_name, difficulty))
            .await
    }

    pub fn dashboard(&self, user_id: &str) -> Result<Dashboard> {
        self.personalizer.dashboard(user_id)
    }

    pub fn reset_progress(&self, user_id: &str) -> Result<()> {
        self.personalizer.reset(user_id).map(|_| ())
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt,
            system_prompt: Some(
                self.config
                    .system_prompt_override
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            ),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .provider
            .generate(&request)
            .await
            .map_err(TutorError::Generation)?;
        tracing::debug!(
            provider = self.provider.name(),
            model = %response.model,
            latency_ms = response.latency_ms,
            tokens = response.token_usage.total_tokens,
            "generation complete"
        );
        Ok(response.content)
    }
}

/// Quiz submission flow: grade, persist the record, then recommend from the
/// updated history.
///
/// Needs no collaborators, so it also serves callers that only hold a
/// [`Personalizer`].
pub fn submit_quiz(
    personalizer: &Personalizer,
    questions: &[QuizQuestion],
    answers: &HashMap<usize, String>,
    topic: &str,
    user_id: &str,
) -> Result<QuizOutcome> {
    let evaluation = evaluator::evaluate(questions, answers);
    let progress =
        personalizer.record_quiz(user_id, topic, evaluation.score, evaluation.total)?;
    let recommendation = personalizer.recommendations(user_id)?;

    tracing::info!(
        score = evaluation.score,
        total = evaluation.total,
        percentage = evaluation.percentage,
        new_difficulty = %progress.current_difficulty,
        "quiz evaluated"
    );
    Ok(QuizOutcome {
        evaluation,
        new_difficulty: progress.current_difficulty,
        recommendation,
    })
}
