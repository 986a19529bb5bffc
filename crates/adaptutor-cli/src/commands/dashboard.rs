//! The `adaptutor dashboard` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use adaptutor_core::personalize::Dashboard;

pub fn execute(user: String, json: bool, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::load(config_path.as_deref())?;
    let personalizer = super::personalizer(&config)?;
    let dashboard = personalizer.dashboard(&user)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        print_dashboard(&dashboard);
    }
    Ok(())
}

fn print_dashboard(dashboard: &Dashboard) {
    println!("User: {}", dashboard.user_id);
    println!("Difficulty: {}", dashboard.current_difficulty);
    println!("Quizzes taken: {}", dashboard.total_quizzes);
    println!("Average score: {:.1}%", dashboard.average_score);
    if dashboard.topics_studied.is_empty() {
        println!("Topics studied: none yet");
    } else {
        println!("Topics studied: {}", dashboard.topics_studied.join(", "));
    }

    if !dashboard.recent_scores.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Date", "Topic", "Score", "Percentage"]);
        for record in &dashboard.recent_scores {
            table.add_row(vec![
                Cell::new(record.timestamp.format("%Y-%m-%d %H:%M")),
                Cell::new(&record.topic),
                Cell::new(format!("{}/{}", record.score, record.total)),
                Cell::new(format!("{:.1}%", record.percentage)),
            ]);
        }
        println!("\n{table}");
    }

    println!("\nRecommendation: {}", dashboard.recommendation);
}
