//! Free-text quiz parser.
//!
//! Turns generator output of the form
//!
//! ```text
//! Q1: Question text
//! A) First option
//! B) Second option
//! Correct: B
//! Explanation: Why B is right
//!
//! ---
//!
//! Q2: ...
//! ```
//!
//! into validated [`QuizQuestion`]s. Parsing is lossy: a block that is too
//! short, lacks a question or a correct-answer line, or fails the question
//! invariants is dropped whole and the rest of the input still parses.
//!
//! Within a block, a repeated option label overwrites the earlier option and
//! a repeated `Correct:`/`Explanation:` line overwrites the earlier one. This
//! is tolerated rather than corrected.

use std::collections::BTreeMap;
use std::fmt;
use std::str::Lines;

use crate::model::{QuestionDefect, QuizQuestion};

/// Minimum non-blank lines in a block: question, two options, correct answer.
pub const MIN_BLOCK_LINES: usize = 4;

const CORRECT_TOKEN: &str = "Correct";
const EXPLANATION_TOKEN: &str = "Explanation";

/// Parse every well-formed question in `raw`, in input order.
pub fn parse_quiz(raw: &str) -> Vec<QuizQuestion> {
    parse_quiz_iter(raw).collect()
}

/// Lazily parse `raw`, yielding only blocks that pass validation.
pub fn parse_quiz_iter(raw: &str) -> impl Iterator<Item = QuizQuestion> + '_ {
    Blocks::new(raw)
        .enumerate()
        .filter_map(|(index, block)| match parse_block(&block) {
            Ok(question) => Some(question),
            Err(reason) => {
                tracing::debug!(block = index + 1, %reason, "dropping malformed quiz block");
                None
            }
        })
}

/// Why a block was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockRejection {
    TooShort(usize),
    MissingQuestion,
    MissingCorrect,
    Invalid(QuestionDefect),
}

impl fmt::Display for BlockRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockRejection::TooShort(n) => {
                write!(f, "only {n} line(s), need at least {MIN_BLOCK_LINES}")
            }
            BlockRejection::MissingQuestion => write!(f, "no question line"),
            BlockRejection::MissingCorrect => write!(f, "no correct-answer line"),
            BlockRejection::Invalid(defect) => write!(f, "{defect}"),
        }
    }
}

/// Iterator over blocks of trimmed, non-blank lines between separator lines.
struct Blocks<'a> {
    lines: Lines<'a>,
    done: bool,
}

impl<'a> Blocks<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            lines: raw.lines(),
            done: false,
        }
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Vec<&'a str>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let mut block = Vec::new();
            loop {
                match self.lines.next() {
                    Some(line) if is_separator(line) => break,
                    Some(line) => {
                        let trimmed = line.trim();
                        if !trimmed.is_empty() {
                            block.push(trimmed);
                        }
                    }
                    None => {
                        self.done = true;
                        break;
                    }
                }
            }
            // Blank stretches between separators are not blocks at all.
            if !block.is_empty() {
                return Some(block);
            }
        }
        None
    }
}

/// A separator is a line holding nothing but three or more dashes.
fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-')
}

enum Line<'a> {
    Option(char, &'a str),
    Correct(Option<char>),
    Explanation(&'a str),
    Question(&'a str),
    Other,
}

fn classify(line: &str) -> Line<'_> {
    let mut chars = line.chars();
    if let (Some(label), Some(')')) = (chars.next(), chars.next()) {
        if label.is_ascii_uppercase() {
            return Line::Option(label, line[2..].trim());
        }
    }

    if let Some(rest) = strip_token(line, CORRECT_TOKEN) {
        let letter = rest
            .split_once(':')
            .and_then(|(_, value)| value.trim_start().chars().next())
            .map(|c| c.to_ascii_uppercase());
        return Line::Correct(letter);
    }

    if let Some(rest) = strip_token(line, EXPLANATION_TOKEN) {
        let text = rest.split_once(':').map(|(_, v)| v.trim()).unwrap_or("");
        return Line::Explanation(text);
    }

    if is_question_line(line) {
        let body = match line.split_once(':') {
            Some((_, body)) => body.trim(),
            None => line,
        };
        return Line::Question(body);
    }

    Line::Other
}

/// Case-insensitive prefix match on a whole ASCII word ("Correctly" is not
/// "Correct").
fn strip_token<'a>(line: &'a str, token: &str) -> Option<&'a str> {
    let head = line.get(..token.len())?;
    if !head.eq_ignore_ascii_case(token) {
        return None;
    }
    let rest = &line[token.len()..];
    if rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(rest)
}

/// `Q1: ...`, `Q: ...`, `Question 3: ...` and the like. The identifying
/// token must end at a digit, colon, period, whitespace, or end of line, so
/// prose such as "Quantum ..." is not mistaken for a question.
fn is_question_line(line: &str) -> bool {
    let rest = line
        .strip_prefix("Question")
        .or_else(|| line.strip_prefix('Q'));
    match rest {
        None => false,
        Some(rest) => match rest.chars().next() {
            None => true,
            Some(c) => c.is_ascii_digit() || c == ':' || c == '.' || c.is_whitespace(),
        },
    }
}

/// Parse one block of trimmed, non-blank lines.
pub fn parse_block(lines: &[&str]) -> Result<QuizQuestion, BlockRejection> {
    if lines.len() < MIN_BLOCK_LINES {
        return Err(BlockRejection::TooShort(lines.len()));
    }

    let mut question: Option<&str> = None;
    let mut options = BTreeMap::new();
    let mut correct: Option<char> = None;
    let mut explanation = "";

    for line in lines {
        match classify(line) {
            Line::Option(label, text) => {
                options.insert(label, text.to_string());
            }
            Line::Correct(letter) => correct = letter,
            Line::Explanation(text) => explanation = text,
            Line::Question(body) => {
                if question.is_none() {
                    question = Some(body);
                }
            }
            Line::Other => {}
        }
    }

    let question = question.ok_or(BlockRejection::MissingQuestion)?;
    let correct = correct.ok_or(BlockRejection::MissingCorrect)?;

    let candidate = QuizQuestion {
        question: question.to_string(),
        options,
        correct,
        explanation: explanation.to_string(),
    };
    candidate.validate().map_err(BlockRejection::Invalid)?;
    Ok(candidate)
}
