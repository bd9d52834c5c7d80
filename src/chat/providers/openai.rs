//! `OpenAI` / Azure `OpenAI` chat client using the `async-openai` crate.
//!
//! One generic adapter serves both services; only the SDK configuration
//! differs (`OpenAIConfig` vs. `AzureConfig`).

use async_openai::Client;
use async_openai::config::{AzureConfig, Config, OpenAIConfig};
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessage,
    ChatCompletionRequestAssistantMessageContent, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessage, ChatCompletionRequestSystemMessageContent,
    ChatCompletionRequestToolMessage, ChatCompletionRequestToolMessageContent,
    ChatCompletionRequestUserMessage, ChatCompletionRequestUserMessageContent, ChatCompletionTool,
    ChatCompletionToolType, CreateChatCompletionRequest, CreateChatCompletionResponse, FinishReason,
    FunctionCall, FunctionObject,
};
use async_trait::async_trait;
use tracing::debug;

use crate::chat::message::{ChatMessage, ChatRequest, ChatResponse, MessageRole, TokenUsage};
use crate::chat::provider::ChatClient;
use crate::chat::tool::ToolCall;
use crate::config::RagConfig;
use crate::error::{RagError, Result};

/// Chat client for any `OpenAI`-compatible API.
pub struct OpenAiChatClient<C: Config> {
    client: Client<C>,
    name: &'static str,
}

impl OpenAiChatClient<OpenAIConfig> {
    /// Creates a client for the `OpenAI` API (or a compatible proxy via
    /// [`RagConfig::endpoint`]).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfig`] if the HTTP client cannot be built.
    pub fn openai(config: &RagConfig) -> Result<Self> {
        let mut openai_config = OpenAIConfig::new().with_api_key(&config.api_key);
        if let Some(ref base_url) = config.endpoint {
            openai_config = openai_config.with_api_base(base_url);
        }

        Ok(Self {
            client: Client::with_config(openai_config).with_http_client(config.http_client()?),
            name: "openai",
        })
    }
}

impl OpenAiChatClient<AzureConfig> {
    /// Creates a client for an Azure `OpenAI` chat deployment.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::MissingConfig`] without an endpoint, or
    /// [`RagError::InvalidConfig`] if the HTTP client cannot be built.
    pub fn azure(config: &RagConfig) -> Result<Self> {
        let endpoint = config.endpoint.as_deref().ok_or(RagError::MissingConfig {
            key: "AZURE_OPENAI_ENDPOINT",
        })?;

        let azure_config = AzureConfig::new()
            .with_api_base(endpoint)
            .with_api_key(&config.api_key)
            .with_deployment_id(&config.chat_deployment)
            .with_api_version(&config.api_version);

        Ok(Self {
            client: Client::with_config(azure_config).with_http_client(config.http_client()?),
            name: "azure",
        })
    }
}

impl<C: Config> OpenAiChatClient<C> {
    /// Converts our message type to the SDK type.
    fn convert_message(msg: &ChatMessage) -> ChatCompletionRequestMessage {
        match msg.role {
            MessageRole::System => {
                ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(msg.content.clone()),
                    name: None,
                })
            }
            MessageRole::User => {
                ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                    name: None,
                })
            }
            MessageRole::Assistant => {
                let tool_calls = if msg.tool_calls.is_empty() {
                    None
                } else {
                    Some(
                        msg.tool_calls
                            .iter()
                            .map(|tc| ChatCompletionMessageToolCall {
                                id: tc.id.clone(),
                                r#type: ChatCompletionToolType::Function,
                                function: FunctionCall {
                                    name: tc.name.clone(),
                                    arguments: tc.arguments.clone(),
                                },
                            })
                            .collect(),
                    )
                };

                let content = if msg.content.is_empty() {
                    None
                } else {
                    Some(ChatCompletionRequestAssistantMessageContent::Text(
                        msg.content.clone(),
                    ))
                };

                #[allow(deprecated)]
                ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                    content,
                    name: None,
                    tool_calls,
                    refusal: None,
                    audio: None,
                    function_call: None,
                })
            }
            MessageRole::Tool => {
                ChatCompletionRequestMessage::Tool(ChatCompletionRequestToolMessage {
                    content: ChatCompletionRequestToolMessageContent::Text(msg.content.clone()),
                    tool_call_id: msg.tool_call_id.clone().unwrap_or_default(),
                })
            }
        }
    }

    /// Builds an SDK chat completion request from our generic request.
    fn build_request(request: &ChatRequest) -> CreateChatCompletionRequest {
        let messages: Vec<_> = request.messages.iter().map(Self::convert_message).collect();

        let tools = if request.tools.is_empty() {
            None
        } else {
            Some(
                request
                    .tools
                    .iter()
                    .map(|td| ChatCompletionTool {
                        r#type: ChatCompletionToolType::Function,
                        function: FunctionObject {
                            name: td.name.clone(),
                            description: Some(td.description.clone()),
                            parameters: Some(td.parameters.clone()),
                            strict: None,
                        },
                    })
                    .collect(),
            )
        };

        CreateChatCompletionRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
            max_completion_tokens: request.max_tokens,
            tools,
            ..Default::default()
        }
    }
}

impl<C: Config> std::fmt::Debug for OpenAiChatClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChatClient")
            .field("name", &self.name)
            .field("client", &"<async-openai::Client>")
            .finish()
    }
}

#[async_trait]
impl<C> ChatClient for OpenAiChatClient<C>
where
    C: Config + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let sdk_request = Self::build_request(request);
        debug!(
            client = self.name,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "sending chat completion"
        );

        let response = self
            .client
            .chat()
            .create(sdk_request)
            .await
            .map_err(|e| RagError::ChatServiceUnavailable {
                message: e.to_string(),
            })?;

        into_chat_response(response)
    }
}

/// Converts an SDK completion into our response type.
///
/// A completion without choices, or a choice the content filter emptied,
/// carries no answer and is reported as a service failure.
fn into_chat_response(response: CreateChatCompletionResponse) -> Result<ChatResponse> {
    let usage = response
        .usage
        .map_or_else(TokenUsage::default, |u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| RagError::ChatServiceUnavailable {
            message: "completion returned no choices".to_string(),
        })?;

    let tool_calls: Vec<ToolCall> = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| ToolCall {
            id: tc.id,
            name: tc.function.name,
            arguments: tc.function.arguments,
        })
        .collect();

    if choice.message.content.is_none()
        && tool_calls.is_empty()
        && matches!(choice.finish_reason, Some(FinishReason::ContentFilter))
    {
        return Err(RagError::ChatServiceUnavailable {
            message: "completion was blocked by the content filter".to_string(),
        });
    }

    Ok(ChatResponse {
        content: choice.message.content.unwrap_or_default(),
        usage,
        tool_calls,
        finish_reason: choice.finish_reason.and_then(|fr| {
            serde_json::to_value(fr)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
        }),
    })
}
