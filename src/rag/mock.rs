//! Scripted collaborators for orchestrator unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::chat::{ChatClient, ChatRequest, ChatResponse, ToolCall};
use crate::core::RetrievedPassage;
use crate::error::{RagError, Result};
use crate::retrieval::RetrievalClient;

/// Chat client that replays a script and records every request.
pub struct ScriptedChat {
    script: Mutex<VecDeque<Result<ChatResponse>>>,
    fallback: Option<ChatResponse>,
    requests: Mutex<Vec<ChatRequest>>,
    calls: AtomicUsize,
}

impl ScriptedChat {
    pub fn new(script: Vec<Result<ChatResponse>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Answers every call with `response` once the script runs out.
    pub fn repeating(response: ChatResponse) -> Self {
        Self {
            fallback: Some(response),
            ..Self::new(Vec::new())
        }
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

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
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

/// Retrieval client returning fixed passages (or failing) and recording queries.
pub struct MockRetrieval {
    passages: Vec<RetrievedPassage>,
    fail: bool,
    delay: Duration,
    queries: Mutex<Vec<String>>,
}

impl MockRetrieval {
    pub fn returning(passages: Vec<RetrievedPassage>) -> Self {
        Self {
            passages,
            fail: false,
            delay: Duration::ZERO,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::returning(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RetrievalClient for MockRetrieval {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedPassage>> {
        if let Ok(mut q) = self.queries.lock() {
            q.push(query.to_string());
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(RagError::RetrievalUnavailable {
                message: "index offline".to_string(),
            });
        }
        Ok(self.passages.iter().take(top_k).cloned().collect())
    }
}

pub fn tool_call(id: &str, arguments: &str) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: "get_sources".to_string(),
        arguments: arguments.to_string(),
    }
}
