//! Subcommand implementations and the wiring they share.

pub mod dashboard;
pub mod init;
pub mod learn;
pub mod lesson;
pub mod list_models;
pub mod quiz;
pub mod reset;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adaptutor_core::engine::Tutor;
use adaptutor_core::personalize::Personalizer;
use adaptutor_core::store::ProgressStore;
use adaptutor_providers::config::{create_lookup, create_named_provider, load_config_from};
use adaptutor_providers::AdaptutorConfig;

/// Load the config file, honouring an explicit `--config` path.
pub(crate) fn load(config_path: Option<&Path>) -> Result<AdaptutorConfig> {
    load_config_from(config_path)
}

/// Open the progress store named by the config. Needs no provider.
pub(crate) fn personalizer(config: &AdaptutorConfig) -> Result<Personalizer> {
    let store = ProgressStore::open(config.progress_file.clone())?;
    Ok(Personalizer::new(store, config.learning.clone())?)
}

/// Build the full tutor: generator, Wikipedia lookup and progress store.
pub(crate) fn tutor(config: &AdaptutorConfig, provider: Option<&str>) -> Result<Tutor> {
    let provider = create_named_provider(config, provider)?;
    let lookup = Arc::new(create_lookup(config, Some(Arc::clone(&provider))));
    Ok(Tutor::new(
        provider,
        lookup,
        personalizer(config)?,
        config.tutor_config(),
    ))
}
