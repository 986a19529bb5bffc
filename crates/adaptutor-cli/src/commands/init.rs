//! The `adaptutor init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("adaptutor.toml").exists() {
        println!("adaptutor.toml already exists, skipping.");
    } else {
        std::fs::write("adaptutor.toml", SAMPLE_CONFIG)?;
        println!("Created adaptutor.toml");
    }

    println!("\nNext steps:");
    println!("  1. Export GEMINI_API_KEY (or edit adaptutor.toml)");
    println!("  2. Run: adaptutor learn --topic \"Rust ownership\" --goal \"write safe code\" --save package.json");
    println!("  3. Run: adaptutor quiz --package package.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# adaptutor configuration

default_provider = "gemini"
default_model = "gemini-2.5-flash"
temperature = 0.7
max_tokens = 4096
# system_prompt = "You are a patient tutor."
progress_file = "data/progress.json"

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"

[wikipedia]
sentences = 10
summarize = true
suggestion_limit = 5

[learning]
default_num_questions = 5
default_difficulty = "beginner"
dashboard_recent = 5

[learning.difficulty]
advanced_threshold = 85.0
intermediate_threshold = 70.0
recent_window = 3

[learning.recommendation]
advance_threshold = 80.0
continue_threshold = 60.0
"#;
