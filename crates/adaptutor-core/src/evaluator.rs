//! Quiz evaluator: grades submitted answers against the answer key.
//!
//! Pure and side-effect free; recording the outcome is the engine's job.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{percentage_of, QuizQuestion};

/// Shown when a question carries no explanation.
pub const NO_EXPLANATION: &str = "No explanation available.";

/// Verdict for a single answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerVerdict {
    pub correct: bool,
    pub correct_answer: char,
    pub explanation: String,
}

/// Per-question result line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    /// 1-based position in the quiz.
    pub question_num: usize,
    pub question: String,
    /// What the learner submitted; empty when no answer was given.
    pub user_answer: String,
    pub correct_answer: char,
    pub is_correct: bool,
    pub explanation: String,
}

/// Aggregate quiz result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub score: u32,
    pub total: u32,
    /// `100 * score / total`, or `0.0` for an empty quiz.
    pub percentage: f64,
    pub results: Vec<QuestionResult>,
}

/// Grade one answer. Labels compare case-insensitively; a blank answer is
/// never correct.
pub fn evaluate_answer(question: &QuizQuestion, answer: &str) -> AnswerVerdict {
    let correct = label_matches(answer, question.correct);
    let explanation = if question.explanation.trim().is_empty() {
        NO_EXPLANATION.to_string()
    } else {
        question.explanation.clone()
    };

    AnswerVerdict {
        correct,
        correct_answer: question.correct,
        explanation,
    }
}

fn label_matches(answer: &str, expected: char) -> bool {
    let mut chars = answer.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_uppercase().eq(expected.to_uppercase()),
        _ => false,
    }
}

/// Grade a whole quiz. `answers` maps 0-based question index to the
/// submitted label; a missing index is graded as incorrect.
pub fn evaluate(questions: &[QuizQuestion], answers: &HashMap<usize, String>) -> QuizResult {
    let mut score = 0u32;
    let mut results = Vec::with_capacity(questions.len());

    for (i, question) in questions.iter().enumerate() {
        let user_answer = answers
            .get(&i)
            .map(|a| a.trim().to_string())
            .unwrap_or_default();
        let verdict = evaluate_answer(question, &user_answer);
        if verdict.correct {
            score += 1;
        }

        results.push(QuestionResult {
            question_num: i + 1,
            question: question.question.clone(),
            user_answer,
            correct_answer: verdict.correct_answer,
            is_correct: verdict.correct,
            explanation: verdict.explanation,
        });
    }

    let total = questions.len() as u32;
    QuizResult {
        score,
        total,
        percentage: percentage_of(score, total),
        results,
    }
}
