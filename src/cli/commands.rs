//! Command execution.
//!
//! Each command returns the text to print; `main` owns stdout.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::parser::{Cli, Commands, PromptCommands};
use crate::config::RagConfig;
use crate::core::Conversation;
use crate::rag::{PromptSet, RagService};

/// Executes the parsed command and returns its output.
///
/// # Errors
///
/// Returns an error if configuration is incomplete, a service call fails,
/// or prompt files cannot be written.
pub async fn execute(cli: &Cli) -> Result<String> {
    match &cli.command {
        #[cfg(feature = "server")]
        Commands::Serve {
            host,
            port,
            prompt_dir,
        } => cmd_serve(host, *port, prompt_dir.as_deref()).await,
        Commands::Ask {
            question,
            agent,
            prompt_dir,
        } => cmd_ask(question, *agent, prompt_dir.as_deref()).await,
        Commands::Prompts(PromptCommands::Init { dir }) => cmd_init_prompts(dir.as_deref()),
    }
}

/// Loads configuration, with an explicit prompt directory taking precedence
/// over `RAG_PROMPT_DIR`.
fn load_config(prompt_dir: Option<&Path>) -> Result<RagConfig> {
    let mut builder = RagConfig::builder();
    if let Some(dir) = prompt_dir {
        builder = builder.prompt_dir(dir);
    }
    builder
        .from_env()
        .build()
        .context("failed to load configuration")
}

#[cfg(feature = "server")]
async fn cmd_serve(host: &str, port: u16, prompt_dir: Option<&Path>) -> Result<String> {
    let config = load_config(prompt_dir)?;
    let service = RagService::from_config(&config).context("failed to start RAG service")?;
    crate::server::serve(service, host, port).await?;
    Ok(String::new())
}

async fn cmd_ask(question: &str, agent: bool, prompt_dir: Option<&Path>) -> Result<String> {
    let config = load_config(prompt_dir)?;
    let service = RagService::from_config(&config).context("failed to start RAG service")?;

    let mut conversation = Conversation::new();
    conversation.append_user(question);

    let result = if agent {
        service.agent().run(&conversation).await?
    } else {
        service.pipeline().run(&conversation).await?
    };

    let mut output = serde_json::to_string_pretty(&result)?;
    output.push('\n');
    Ok(output)
}

fn cmd_init_prompts(dir: Option<&Path>) -> Result<String> {
    let target_dir = dir
        .map(PathBuf::from)
        .or_else(PromptSet::default_dir)
        .context("could not determine home directory for default prompt path")?;

    let written = PromptSet::write_defaults(&target_dir)
        .with_context(|| format!("failed to write prompt templates to {}", target_dir.display()))?;

    if written.is_empty() {
        return Ok(format!(
            "All prompt templates already exist in: {}\n",
            target_dir.display()
        ));
    }

    let mut output = format!(
        "Wrote {} prompt template(s) to: {}\n",
        written.len(),
        target_dir.display()
    );
    for path in &written {
        let _ = writeln!(
            output,
            "  {}",
            path.file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
        );
    }
    output.push_str("\nSet RAG_PROMPT_DIR (or pass --prompt-dir) to use them.\n");
    Ok(output)
}
