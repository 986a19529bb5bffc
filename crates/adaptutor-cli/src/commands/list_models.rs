//! The `adaptutor list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use adaptutor_core::traits::ModelInfo;
use adaptutor_providers::config::ProviderConfig;
use adaptutor_providers::create_provider;
use adaptutor_providers::ollama::OllamaProvider;

pub async fn execute(provider_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::load(config_path.as_deref())?;

    let mut names: Vec<&String> = config.providers.keys().collect();
    names.sort();

    let mut found_any = false;

    for name in names {
        if let Some(filter) = &provider_filter {
            if name != filter {
                continue;
            }
        }

        let models = match &config.providers[name] {
            // Local models are only known to the running server.
            ProviderConfig::Ollama { base_url } => {
                match OllamaProvider::new(base_url).list_models_async().await {
                    Ok(models) => models,
                    Err(e) => {
                        eprintln!("Provider {name}: {e}");
                        continue;
                    }
                }
            }
            provider_config => match create_provider(name, provider_config) {
                Ok(provider) => provider.available_models(),
                Err(e) => {
                    eprintln!("Provider {name}: {e}");
                    continue;
                }
            },
        };

        if !models.is_empty() {
            found_any = true;
            println!("Provider: {name}");
            for model in &models {
                println!("  {}", describe(model));
            }
            println!();
        }
    }

    if !found_any {
        println!("No providers configured. Run `adaptutor init` to create a config file.");
    }

    Ok(())
}

fn describe(model: &ModelInfo) -> String {
    if model.max_context > 0 {
        format!(
            "{} ({}, {}K context)",
            model.id,
            model.name,
            model.max_context / 1000
        )
    } else {
        format!("{} ({})", model.id, model.name)
    }
}
