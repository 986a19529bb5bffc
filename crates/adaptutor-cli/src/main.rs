//! adaptutor CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "adaptutor", version, about = "Adaptive LLM tutoring assistant")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Research a topic and build a learning plan and quiz
    Learn {
        /// Topic to study
        #[arg(long)]
        topic: String,

        /// What the learner wants to achieve
        #[arg(long)]
        goal: String,

        /// Learner id
        #[arg(long, default_value = "default")]
        user: String,

        /// Number of quiz questions (default from config)
        #[arg(long)]
        questions: Option<u32>,

        /// Save the package as JSON for `adaptutor quiz`
        #[arg(long)]
        save: Option<PathBuf>,

        /// Provider to generate with (default from config)
        #[arg(long)]
        provider: Option<String>,
    },

    /// Take the quiz from a saved learning package
    Quiz {
        /// Learning package JSON written by `adaptutor learn --save`
        #[arg(long)]
        package: PathBuf,

        /// Learner id
        #[arg(long, default_value = "default")]
        user: String,

        /// Comma-separated answers (e.g. "A,C,,B"); prompts on stdin when omitted
        #[arg(long)]
        answers: Option<String>,
    },

    /// Generate a lesson for one module of a topic
    Lesson {
        /// Topic the module belongs to
        #[arg(long)]
        topic: String,

        /// Module name from the learning plan
        #[arg(long)]
        module: String,

        /// Learner id
        #[arg(long, default_value = "default")]
        user: String,

        /// Provider to generate with (default from config)
        #[arg(long)]
        provider: Option<String>,
    },

    /// Show a learner's progress
    Dashboard {
        /// Learner id
        #[arg(long, default_value = "default")]
        user: String,

        /// Print the dashboard as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clear a learner's progress
    Reset {
        /// Learner id
        #[arg(long, default_value = "default")]
        user: String,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,
    },

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("adaptutor=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Learn {
            topic,
            goal,
            user,
            questions,
            save,
            provider,
        } => {
            commands::learn::execute(commands::learn::LearnArgs {
                topic,
                goal,
                user,
                questions,
                save,
                provider,
                config,
            })
            .await
        }
        Commands::Quiz {
            package,
            user,
            answers,
        } => commands::quiz::execute(package, user, answers, config),
        Commands::Lesson {
            topic,
            module,
            user,
            provider,
        } => commands::lesson::execute(topic, module, user, provider, config).await,
        Commands::Dashboard { user, json } => commands::dashboard::execute(user, json, config),
        Commands::Reset { user } => commands::reset::execute(user, config),
        Commands::ListModels { provider } => {
            commands::list_models::execute(provider, config).await
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
