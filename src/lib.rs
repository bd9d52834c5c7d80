//! # rag-rs
//!
//! Retrieval-augmented generation over a vector index.
//!
//! A conversation comes in; an answer grounded in retrieved passages goes out,
//! together with a diagnostics trace of every step taken. Two orchestration
//! modes share the same collaborators:
//!
//! - [`PipelineOrchestrator`]: rewrite the conversation into a search query,
//!   retrieve, assemble a grounded prompt, generate.
//! - [`AgentOrchestrator`]: give the model a `get_sources` tool and let it
//!   decide when to retrieve, bounded by a round limit.
//!
//! Chat completion and retrieval sit behind the [`ChatClient`] and
//! [`RetrievalClient`] traits. Production implementations use Azure `OpenAI`
//! (or `OpenAI`) through `async-openai` and Azure AI Search over `reqwest`.
//!
//! ## Example
//!
//! ```no_run
//! use rag_rs::{Conversation, RagConfig, RagService};
//!
//! # async fn run() -> rag_rs::Result<()> {
//! let config = RagConfig::from_env()?;
//! let service = RagService::from_config(&config)?;
//!
//! let mut conversation = Conversation::new();
//! conversation.append_user("Which oil filter fits my car?");
//! let result = service.pipeline().run(&conversation).await?;
//! println!("{}", result.content);
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod rag;
pub mod retrieval;
#[cfg(feature = "server")]
pub mod server;

pub use chat::{ChatClient, ChatOutcome, ChatSettings};
pub use config::{RagConfig, RagConfigBuilder};
pub use crate::core::{
    Conversation, ConversationTurn, DiagnosticStep, Diagnostics, RequestResult, RetrievedPassage,
    Role, StepKind,
};
pub use error::{RagError, Result};
pub use rag::{AgentOrchestrator, PipelineOrchestrator, PromptSet, RagService};
pub use retrieval::RetrievalClient;
