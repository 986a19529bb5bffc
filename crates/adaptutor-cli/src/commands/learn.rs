//! The `adaptutor learn` command.

use std::path::PathBuf;

use anyhow::Result;

use adaptutor_core::engine::{PackageStep, ProgressReporter};
use adaptutor_core::model::{DifficultyTier, LearningPackage};

pub struct LearnArgs {
    pub topic: String,
    pub goal: String,
    pub user: String,
    pub questions: Option<u32>,
    pub save: Option<PathBuf>,
    pub provider: Option<String>,
    pub config: Option<PathBuf>,
}

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_step_start(&self, step: PackageStep, difficulty: DifficultyTier) {
        let label = match step {
            PackageStep::Research => "Researching topic",
            PackageStep::Plan => "Writing learning plan",
            PackageStep::Quiz => "Generating quiz",
        };
        eprintln!("  {label} ({difficulty})...");
    }

    fn on_step_complete(&self, step: PackageStep) {
        eprintln!("  Done: {step:?}");
    }
}

pub async fn execute(args: LearnArgs) -> Result<()> {
    if let Some(n) = args.questions {
        anyhow::ensure!(n >= 1, "--questions must be at least 1");
    }

    let config = super::load(args.config.as_deref())?;
    let tutor = super::tutor(&config, args.provider.as_deref())?;

    eprintln!("adaptutor v{}: {}", env!("CARGO_PKG_VERSION"), args.topic);
    let package = tutor
        .create_learning_package(
            &args.topic,
            &args.goal,
            &args.user,
            args.questions,
            &ConsoleReporter,
        )
        .await?;

    print_package(&package);

    if let Some(path) = &args.save {
        package.save_json(path)?;
        eprintln!("\nPackage saved to: {}", path.display());
        eprintln!(
            "Take the quiz with: adaptutor quiz --package {} --user {}",
            path.display(),
            args.user
        );
    }

    Ok(())
}

fn print_package(package: &LearningPackage) {
    println!("# {} ({})", package.topic, package.difficulty);
    println!("\n## Research\n\n{}", package.research.structured_summary);
    println!("\n## Learning plan\n\n{}", package.learning_plan);

    println!("\n## Quiz ({} questions)", package.quiz.len());
    for (i, question) in package.quiz.iter().enumerate() {
        println!("\n{}. {}", i + 1, question.question);
        for (label, text) in &question.options {
            println!("   {label}) {text}");
        }
    }
}
