//! The `adaptutor lesson` command.

use std::path::PathBuf;

use anyhow::Result;

pub async fn execute(
    topic: String,
    module: String,
    user: String,
    provider: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = super::load(config_path.as_deref())?;
    let tutor = super::tutor(&config, provider.as_deref())?;

    let lesson = tutor.generate_lesson(&topic, &module, &user).await?;
    println!("# {module}\n\n{lesson}");

    Ok(())
}
