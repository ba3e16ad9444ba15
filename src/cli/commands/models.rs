//! Local model listing command.

use console::style;

use crate::cli::icons::{error, warn};
use crate::config::Config;
use crate::llm::{choose_model, OllamaClient, OLLAMA_SETUP_HINT};

/// Show the local LLM configuration and the models the server lists.
pub async fn cmd_models(config: &Config) -> anyhow::Result<()> {
    let local = &config.llm.local;
    let client = OllamaClient::new(local.clone())?;

    println!("\n{}", style("LLM Configuration").bold());
    println!("{}", "-".repeat(40));
    println!("{:<20} {}", "Endpoint:", local.endpoint);
    println!(
        "{:<20} {}",
        "Configured Model:",
        local.model.as_deref().unwrap_or("(first available)")
    );
    println!("{:<20} {:.2}", "Temperature:", local.temperature);
    println!("{:<20} {}s", "Timeout:", local.request_timeout_secs);
    println!("{:<20} {}", "Hosted Model:", config.llm.hosted.model);
    println!(
        "{:<20} {}",
        "Hosted API Key:",
        if config.llm.hosted.api_key.is_some() {
            "set"
        } else {
            "not set"
        }
    );

    let models = match client.list_models().await {
        Ok(models) => models,
        Err(e) => {
            println!("\n{} {}", error(), e);
            println!("{}", style(OLLAMA_SETUP_HINT).dim());
            return Ok(());
        }
    };

    println!("\n{}", style("Available Models").bold());
    println!("{}", "-".repeat(40));

    let Some(selected) = choose_model(local.model.as_deref(), &models) else {
        println!("{} No models installed", warn());
        println!("{}", style(OLLAMA_SETUP_HINT).dim());
        return Ok(());
    };

    for model in &models {
        let marker = if *model == selected {
            style("*").green().to_string()
        } else {
            " ".to_string()
        };
        println!("{} {}", marker, model);
    }
    if !models.contains(&selected) {
        println!(
            "{} Configured model {} is not installed",
            warn(),
            selected
        );
    }

    Ok(())
}
