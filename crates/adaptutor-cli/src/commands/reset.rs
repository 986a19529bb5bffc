//! The `adaptutor reset` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(user: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::load(config_path.as_deref())?;
    let personalizer = super::personalizer(&config)?;
    personalizer.reset(&user)?;
    println!("Progress reset for user '{user}'.");
    Ok(())
}
