//! Service configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{RagError, Result};

/// Default chat provider.
const DEFAULT_CHAT_PROVIDER: &str = "azure";
/// Azure `OpenAI` REST API version.
const DEFAULT_API_VERSION: &str = "2024-10-21";
/// Azure AI Search REST API version.
const DEFAULT_SEARCH_API_VERSION: &str = "2024-07-01";
/// Index field holding the passage embedding.
const DEFAULT_VECTOR_FIELD: &str = "text_vector";
/// Index field holding the source name.
const DEFAULT_TITLE_FIELD: &str = "title";
/// Index field holding the passage text.
const DEFAULT_CONTENT_FIELD: &str = "chunk";
/// Default number of passages returned per search.
const DEFAULT_TOP_K: usize = 10;
/// Default nearest-neighbour breadth of the vector query.
const DEFAULT_NEAREST_NEIGHBORS: usize = 5;
/// Default model rounds allowed in agent mode.
const DEFAULT_MAX_ROUNDS: usize = 5;
/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the RAG service.
#[derive(Debug, Clone)]
pub struct RagConfig {
    /// Chat provider name (`"azure"` or `"openai"`).
    pub chat_provider: String,
    /// API key for the chat and embedding service.
    pub api_key: String,
    /// Azure `OpenAI` endpoint, or a base URL override for `OpenAI`.
    pub endpoint: Option<String>,
    /// Azure `OpenAI` API version.
    pub api_version: String,
    /// Chat model or deployment name.
    pub chat_deployment: String,
    /// Embedding model or deployment name.
    pub embedding_deployment: String,
    /// Requested embedding dimensions, if the model supports truncation.
    pub embedding_dimensions: Option<u32>,
    /// Azure AI Search service endpoint.
    pub search_endpoint: String,
    /// Search index name.
    pub search_index: String,
    /// Search admin or query key.
    pub search_api_key: String,
    /// Azure AI Search API version.
    pub search_api_version: String,
    /// Index field holding the passage embedding.
    pub vector_field: String,
    /// Index field holding the source name.
    pub title_field: String,
    /// Index field holding the passage text.
    pub content_field: String,
    /// Passages returned per search.
    pub top_k: usize,
    /// Nearest-neighbour breadth of the vector query.
    pub nearest_neighbors: usize,
    /// Model rounds allowed in agent mode before giving up.
    pub max_rounds: usize,
    /// Sampling temperature for every chat call.
    pub temperature: Option<f32>,
    /// Maximum tokens for every chat call.
    pub max_tokens: Option<u32>,
    /// Timeout applied to each outbound HTTP request.
    pub timeout: Duration,
    /// Directory containing prompt template files.
    ///
    /// When set, every prompt must exist as `<Name>.txt` in this directory.
    /// When unset, the compiled-in defaults are used.
    pub prompt_dir: Option<PathBuf>,
}

impl RagConfig {
    /// Creates a new builder for `RagConfig`.
    #[must_use]
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::MissingConfig`] for absent required values and
    /// [`RagError::InvalidConfig`] for unusable ones.
    pub fn from_env() -> Result<Self> {
        Self::builder().from_env().build()
    }

    /// Builds the HTTP client shared by outbound adapters.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfig`] if the TLS backend cannot be initialised.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| RagError::InvalidConfig {
                message: format!("failed to build HTTP client: {e}"),
            })
    }
}

/// Builder for [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    chat_provider: Option<String>,
    api_key: Option<String>,
    endpoint: Option<String>,
    api_version: Option<String>,
    chat_deployment: Option<String>,
    embedding_deployment: Option<String>,
    embedding_dimensions: Option<u32>,
    search_endpoint: Option<String>,
    search_index: Option<String>,
    search_api_key: Option<String>,
    search_api_version: Option<String>,
    vector_field: Option<String>,
    title_field: Option<String>,
    content_field: Option<String>,
    top_k: Option<usize>,
    nearest_neighbors: Option<usize>,
    max_rounds: Option<usize>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout: Option<Duration>,
    prompt_dir: Option<PathBuf>,
    invalid_env: Vec<String>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parses a numeric environment value. Unparseable values are recorded in
/// `invalid` so that `build()` can reject them.
fn env_parse<T: std::str::FromStr>(key: &str, invalid: &mut Vec<String>) -> Option<T> {
    parse_setting(key, env_string(key), invalid)
}

fn parse_setting<T: std::str::FromStr>(
    key: &str,
    raw: Option<String>,
    invalid: &mut Vec<String>,
) -> Option<T> {
    let raw = raw?;
    raw.trim().parse().map_or_else(
        |_| {
            invalid.push(format!("{key}: {raw}"));
            None
        },
        Some,
    )
}

impl RagConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.chat_provider.is_none() {
            self.chat_provider = env_string("RAG_CHAT_PROVIDER");
        }
        if self.api_key.is_none() {
            self.api_key =
                env_string("AZURE_OPENAI_API_KEY").or_else(|| env_string("OPENAI_API_KEY"));
        }
        if self.endpoint.is_none() {
            self.endpoint =
                env_string("AZURE_OPENAI_ENDPOINT").or_else(|| env_string("OPENAI_BASE_URL"));
        }
        if self.api_version.is_none() {
            self.api_version = env_string("AZURE_OPENAI_API_VERSION");
        }
        if self.chat_deployment.is_none() {
            self.chat_deployment = env_string("AZURE_OPENAI_CHAT_DEPLOYMENT_NAME");
        }
        if self.embedding_deployment.is_none() {
            self.embedding_deployment = env_string("AZURE_OPENAI_EMBEDDING_DEPLOYMENT_NAME");
        }
        if self.embedding_dimensions.is_none() {
            self.embedding_dimensions =
                env_parse("RAG_EMBEDDING_DIMENSIONS", &mut self.invalid_env);
        }
        if self.search_endpoint.is_none() {
            self.search_endpoint = env_string("AZURE_AI_SEARCH_ENDPOINT");
        }
        if self.search_index.is_none() {
            self.search_index = env_string("AZURE_AI_SEARCH_INDEX_NAME");
        }
        if self.search_api_key.is_none() {
            self.search_api_key = env_string("AZURE_AI_SEARCH_API_KEY");
        }
        if self.search_api_version.is_none() {
            self.search_api_version = env_string("AZURE_AI_SEARCH_API_VERSION");
        }
        if self.top_k.is_none() {
            self.top_k = env_parse("RAG_TOP_K", &mut self.invalid_env);
        }
        if self.nearest_neighbors.is_none() {
            self.nearest_neighbors =
                env_parse("RAG_NEAREST_NEIGHBORS", &mut self.invalid_env);
        }
        if self.max_rounds.is_none() {
            self.max_rounds = env_parse("RAG_MAX_ROUNDS", &mut self.invalid_env);
        }
        if self.prompt_dir.is_none() {
            self.prompt_dir = env_string("RAG_PROMPT_DIR").map(PathBuf::from);
        }
        self
    }

    /// Sets the chat provider name.
    #[must_use]
    pub fn chat_provider(mut self, provider: impl Into<String>) -> Self {
        self.chat_provider = Some(provider.into());
        self
    }

    /// Sets the chat/embedding API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the chat/embedding endpoint.
    #[must_use]
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Sets the Azure `OpenAI` API version.
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Sets the chat deployment.
    #[must_use]
    pub fn chat_deployment(mut self, name: impl Into<String>) -> Self {
        self.chat_deployment = Some(name.into());
        self
    }

    /// Sets the embedding deployment.
    #[must_use]
    pub fn embedding_deployment(mut self, name: impl Into<String>) -> Self {
        self.embedding_deployment = Some(name.into());
        self
    }

    /// Sets the embedding dimensions.
    #[must_use]
    pub const fn embedding_dimensions(mut self, n: u32) -> Self {
        self.embedding_dimensions = Some(n);
        self
    }

    /// Sets the search service endpoint.
    #[must_use]
    pub fn search_endpoint(mut self, url: impl Into<String>) -> Self {
        self.search_endpoint = Some(url.into());
        self
    }

    /// Sets the search index name.
    #[must_use]
    pub fn search_index(mut self, name: impl Into<String>) -> Self {
        self.search_index = Some(name.into());
        self
    }

    /// Sets the search API key.
    #[must_use]
    pub fn search_api_key(mut self, key: impl Into<String>) -> Self {
        self.search_api_key = Some(key.into());
        self
    }

    /// Sets the search API version.
    #[must_use]
    pub fn search_api_version(mut self, version: impl Into<String>) -> Self {
        self.search_api_version = Some(version.into());
        self
    }

    /// Sets the index field names (vector, title, content).
    #[must_use]
    pub fn index_fields(
        mut self,
        vector: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.vector_field = Some(vector.into());
        self.title_field = Some(title.into());
        self.content_field = Some(content.into());
        self
    }

    /// Sets the number of passages per search.
    #[must_use]
    pub const fn top_k(mut self, n: usize) -> Self {
        self.top_k = Some(n);
        self
    }

    /// Sets the nearest-neighbour breadth.
    #[must_use]
    pub const fn nearest_neighbors(mut self, n: usize) -> Self {
        self.nearest_neighbors = Some(n);
        self
    }

    /// Sets the agent round limit.
    #[must_use]
    pub const fn max_rounds(mut self, n: usize) -> Self {
        self.max_rounds = Some(n);
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    /// Sets the max tokens per completion.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the prompt template directory.
    #[must_use]
    pub fn prompt_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prompt_dir = Some(dir.into());
        self
    }

    /// Builds the [`RagConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfig`] if a numeric environment value
    /// did not parse or `top_k` or `max_rounds` is zero, and
    /// [`RagError::MissingConfig`] if a required value was not set.
    pub fn build(self) -> Result<RagConfig> {
        if !self.invalid_env.is_empty() {
            return Err(RagError::InvalidConfig {
                message: self.invalid_env.join(", "),
            });
        }
        let chat_provider = self
            .chat_provider
            .unwrap_or_else(|| DEFAULT_CHAT_PROVIDER.to_string());
        let api_key = self.api_key.ok_or(RagError::MissingConfig {
            key: "AZURE_OPENAI_API_KEY",
        })?;
        if chat_provider == "azure" && self.endpoint.is_none() {
            return Err(RagError::MissingConfig {
                key: "AZURE_OPENAI_ENDPOINT",
            });
        }
        let chat_deployment = self.chat_deployment.ok_or(RagError::MissingConfig {
            key: "AZURE_OPENAI_CHAT_DEPLOYMENT_NAME",
        })?;
        let embedding_deployment = self.embedding_deployment.ok_or(RagError::MissingConfig {
            key: "AZURE_OPENAI_EMBEDDING_DEPLOYMENT_NAME",
        })?;
        let search_endpoint = self.search_endpoint.ok_or(RagError::MissingConfig {
            key: "AZURE_AI_SEARCH_ENDPOINT",
        })?;
        let search_index = self.search_index.ok_or(RagError::MissingConfig {
            key: "AZURE_AI_SEARCH_INDEX_NAME",
        })?;
        let search_api_key = self.search_api_key.ok_or(RagError::MissingConfig {
            key: "AZURE_AI_SEARCH_API_KEY",
        })?;

        let top_k = self.top_k.unwrap_or(DEFAULT_TOP_K);
        if top_k == 0 {
            return Err(RagError::InvalidConfig {
                message: "top_k must be at least 1".to_string(),
            });
        }
        let max_rounds = self.max_rounds.unwrap_or(DEFAULT_MAX_ROUNDS);
        if max_rounds == 0 {
            return Err(RagError::InvalidConfig {
                message: "max_rounds must be at least 1".to_string(),
            });
        }

        Ok(RagConfig {
            chat_provider,
            api_key,
            endpoint: self.endpoint,
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            chat_deployment,
            embedding_deployment,
            embedding_dimensions: self.embedding_dimensions,
            search_endpoint,
            search_index,
            search_api_key,
            search_api_version: self
                .search_api_version
                .unwrap_or_else(|| DEFAULT_SEARCH_API_VERSION.to_string()),
            vector_field: self
                .vector_field
                .unwrap_or_else(|| DEFAULT_VECTOR_FIELD.to_string()),
            title_field: self
                .title_field
                .unwrap_or_else(|| DEFAULT_TITLE_FIELD.to_string()),
            content_field: self
                .content_field
                .unwrap_or_else(|| DEFAULT_CONTENT_FIELD.to_string()),
            top_k,
            nearest_neighbors: self.nearest_neighbors.unwrap_or(DEFAULT_NEAREST_NEIGHBORS),
            max_rounds,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            prompt_dir: self.prompt_dir,
        })
    }
}
