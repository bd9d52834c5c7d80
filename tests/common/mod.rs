//! Shared scripted collaborators for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rag_rs::chat::{ChatClient, ChatRequest, ChatResponse, ChatSettings, ToolCall};
use rag_rs::{PromptSet, RagError, RagService, RetrievalClient, RetrievedPassage};

/// Chat client that replays scripted responses in order.
pub struct ScriptedChat {
    script: Mutex<VecDeque<Result<ChatResponse, RagError>>>,
    fallback: Option<ChatResponse>,
    pub requests: Mutex<Vec<ChatRequest>>,
    calls: AtomicUsize,
}

impl ScriptedChat {
    pub fn new(script: Vec<Result<ChatResponse, RagError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn repeating(response: ChatResponse) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(response),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatClient for ScriptedChat {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, RagError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut r) = self.requests.lock() {
            r.push(request.clone());
        }
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match (next, &self.fallback) {
            (Some(step), _) => step,
            (None, Some(fallback)) => Ok(fallback.clone()),
            (None, None) => Err(RagError::ChatServiceUnavailable {
                message: "script exhausted".to_string(),
            }),
        }
    }
}

/// Retrieval client with fixed passages, or a permanent outage.
pub struct StaticRetrieval {
    passages: Vec<RetrievedPassage>,
    fail: bool,
    pub queries: Mutex<Vec<String>>,
}

impl StaticRetrieval {
    pub fn returning(passages: Vec<RetrievedPassage>) -> Arc<Self> {
        Arc::new(Self {
            passages,
            fail: false,
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            passages: Vec::new(),
            fail: true,
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RetrievalClient for StaticRetrieval {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedPassage>, RagError> {
        if let Ok(mut q) = self.queries.lock() {
            q.push(query.to_string());
        }
        if self.fail {
            return Err(RagError::RetrievalUnavailable {
                message: "search service returned HTTP 503".to_string(),
            });
        }
        Ok(self.passages.iter().take(top_k).cloned().collect())
    }
}

pub fn service(
    chat: Arc<ScriptedChat>,
    retrieval: Arc<StaticRetrieval>,
    max_rounds: usize,
) -> RagService {
    RagService::new(
        chat,
        retrieval,
        PromptSet::defaults(),
        ChatSettings::new("gpt-4o"),
        10,
        max_rounds,
    )
}

pub fn get_sources(id: &str, query: &str) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: "get_sources".to_string(),
        arguments: serde_json::json!({ "query": query }).to_string(),
    }
}
