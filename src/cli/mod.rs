//! CLI layer for RAG-RS.
//!
//! Provides the command-line interface using clap, with commands for
//! serving the API, asking one-off questions, and scaffolding prompts.

pub mod commands;
pub mod parser;

pub use commands::execute;
pub use parser::{Cli, Commands, PromptCommands};
