//! The `adaptutor quiz` command.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use adaptutor_core::engine::{submit_quiz, QuizOutcome};
use adaptutor_core::model::{LearningPackage, QuizQuestion};

pub fn execute(
    package_path: PathBuf,
    user: String,
    answers: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = super::load(config_path.as_deref())?;
    let package = LearningPackage::load_json(&package_path)
        .with_context(|| format!("failed to load package: {}", package_path.display()))?;
    anyhow::ensure!(
        !package.quiz.is_empty(),
        "package {} has no quiz questions",
        package_path.display()
    );

    let answers = match answers {
        Some(list) => parse_answer_list(&list, package.quiz.len())?,
        None => {
            let stdin = io::stdin();
            ask_interactively(&package.quiz, &mut stdin.lock())?
        }
    };

    let personalizer = super::personalizer(&config)?;
    let outcome = submit_quiz(&personalizer, &package.quiz, &answers, &package.topic, &user)?;
    print_outcome(&outcome);

    Ok(())
}

/// Parse `"A,C,,B"` into answers keyed by 0-based question index. Blank
/// slots are unanswered questions.
fn parse_answer_list(list: &str, num_questions: usize) -> Result<HashMap<usize, String>> {
    let slots: Vec<&str> = list.split(',').map(str::trim).collect();
    anyhow::ensure!(
        slots.len() <= num_questions,
        "got {} answers for {} questions",
        slots.len(),
        num_questions
    );

    Ok(slots
        .into_iter()
        .enumerate()
        .filter(|(_, answer)| !answer.is_empty())
        .map(|(i, answer)| (i, answer.to_string()))
        .collect())
}

fn ask_interactively(
    questions: &[QuizQuestion],
    input: &mut impl BufRead,
) -> Result<HashMap<usize, String>> {
    let mut answers = HashMap::new();
    let mut stdout = io::stdout();

    for (i, question) in questions.iter().enumerate() {
        println!("\n{}. {}", i + 1, question.question);
        for (label, text) in &question.options {
            println!("   {label}) {text}");
        }
        print!("Your answer: ");
        stdout.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let answer = line.trim();
        if !answer.is_empty() {
            answers.insert(i, answer.to_string());
        }
    }

    Ok(answers)
}

fn print_outcome(outcome: &QuizOutcome) {
    let evaluation = &outcome.evaluation;

    let mut table = Table::new();
    table.set_header(vec!["#", "Your answer", "Correct", "Result", "Explanation"]);
    for result in &evaluation.results {
        let given = if result.user_answer.is_empty() {
            "-".to_string()
        } else {
            result.user_answer.clone()
        };
        table.add_row(vec![
            Cell::new(result.question_num),
            Cell::new(given),
            Cell::new(result.correct_answer),
            Cell::new(if result.is_correct { "OK" } else { "WRONG" }),
            Cell::new(&result.explanation),
        ]);
    }

    println!("\n{table}");
    println!(
        "\nScore: {}/{} ({:.1}%)",
        evaluation.score, evaluation.total, evaluation.percentage
    );
    println!("Difficulty: {}", outcome.new_difficulty);
    println!("Recommendation: {}", outcome.recommendation.suggestion);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn question(text: &str) -> QuizQuestion {
        QuizQuestion {
            question: text.into(),
            options: BTreeMap::from([('A', "yes".to_string()), ('B', "no".to_string())]),
            correct: 'A',
            explanation: String::new(),
        }
    }

    #[test]
    fn answer_list_skips_blank_slots() {
        let answers = parse_answer_list("A, c ,,B", 4).unwrap();
        assert_eq!(answers.len(), 3);
        assert_eq!(answers[&0], "A");
        assert_eq!(answers[&1], "c");
        assert!(!answers.contains_key(&2));
        assert_eq!(answers[&3], "B");
    }

    #[test]
    fn answer_list_longer_than_quiz_is_rejected() {
        let err = parse_answer_list("A,B,C", 2).unwrap_err();
        assert!(err.to_string().contains("3 answers for 2 questions"));
    }

    #[test]
    fn interactive_answers_stop_at_end_of_input() {
        let questions = vec![question("One?"), question("Two?"), question("Three?")];
        let mut input = io::Cursor::new("b\n\n");
        let answers = ask_interactively(&questions, &mut input).unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[&0], "b");
    }
}
