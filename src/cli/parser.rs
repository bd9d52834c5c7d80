//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// RAG-RS: grounded answers from a document index.
///
/// Serves the RAG HTTP API, answers one-off questions, and manages prompt
/// templates. Connection settings come from the environment
/// (`AZURE_OPENAI_*`, `AZURE_AI_SEARCH_*`, `RAG_*`).
#[derive(Parser, Debug)]
#[command(name = "rag-rs")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API.
    ///
    /// Serves `POST /rag`, `POST /rag-agent`, `GET /status`, and `GET /`
    /// until interrupted with Ctrl-C.
    #[cfg(feature = "server")]
    #[command(after_help = r#"Examples:
  rag-rs serve                            # Listen on 0.0.0.0:8000
  rag-rs serve --host 127.0.0.1 -p 9000   # Custom address
  rag-rs serve --prompt-dir ./prompts     # Use edited prompt templates
"#)]
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "0.0.0.0", env = "RAG_HOST")]
        host: String,

        /// Port to bind.
        #[arg(short, long, default_value_t = 8000, env = "RAG_PORT")]
        port: u16,

        /// Directory containing `<Name>.txt` prompt templates.
        #[arg(long)]
        prompt_dir: Option<PathBuf>,
    },

    /// Answer a single question and print the result as JSON.
    #[command(after_help = r#"Examples:
  rag-rs ask "Which oil filter fits my car?"
  rag-rs ask "Which oil filter fits my car?" --agent
"#)]
    Ask {
        /// The question to answer.
        question: String,

        /// Use the tool-calling agent instead of the fixed pipeline.
        #[arg(long)]
        agent: bool,

        /// Directory containing `<Name>.txt` prompt templates.
        #[arg(long)]
        prompt_dir: Option<PathBuf>,
    },

    /// Prompt template management.
    #[command(subcommand)]
    Prompts(PromptCommands),
}

/// Prompt template subcommands.
#[derive(Subcommand, Debug)]
pub enum PromptCommands {
    /// Write the default prompt templates to disk for customization.
    ///
    /// Existing files are left untouched.
    #[command(after_help = r#"Examples:
  rag-rs prompts init                  # Write to ~/.config/rag-rs/prompts/
  rag-rs prompts init ./my-prompts     # Write to a custom directory
"#)]
    Init {
        /// Target directory. Defaults to `~/.config/rag-rs/prompts/`.
        dir: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_agent() {
        let cli = Cli::try_parse_from(["rag-rs", "ask", "Which filter?", "--agent"])
            .unwrap_or_else(|_| unreachable!());
        assert!(matches!(
            cli.command,
            Commands::Ask { ref question, agent: true, .. } if question == "Which filter?"
        ));
    }

    #[test]
    fn test_parse_prompts_init() {
        let cli = Cli::try_parse_from(["rag-rs", "-v", "prompts", "init", "/tmp/p"])
            .unwrap_or_else(|_| unreachable!());
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Prompts(PromptCommands::Init { dir: Some(_) })
        ));
    }

    #[cfg(feature = "server")]
    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["rag-rs", "serve"]).unwrap_or_else(|_| unreachable!());
        if let Commands::Serve { host, port, .. } = cli.command {
            assert_eq!(host, "0.0.0.0");
            assert_eq!(port, 8000);
        } else {
            unreachable!("expected serve");
        }
    }
}
