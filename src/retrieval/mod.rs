//! Passage retrieval.
//!
//! The [`RetrievalClient`] trait the orchestrators depend on, plus the
//! embedding + Azure AI Search implementation used in production.

pub mod azure_search;
pub mod client;
pub mod embedding;
pub mod provider;

pub use azure_search::AzureSearchRetriever;
pub use client::{create_embedder, create_retrieval_client};
pub use embedding::{Embedder, OpenAiEmbedder};
pub use provider::RetrievalClient;
