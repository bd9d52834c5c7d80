//! Per-request execution diagnostics.
//!
//! Each orchestration run owns one [`Diagnostics`] accumulator, appends a
//! [`DiagnosticStep`] for every externally observable action, and hands it
//! back by value inside the [`RequestResult`].

use serde::{Deserialize, Serialize};

/// Kind of action a diagnostic step records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Query rewriting call.
    Rewrite,
    /// Retrieval call.
    Retrieval,
    /// Grounded prompt assembly.
    Assembly,
    /// Final generation call.
    Generation,
    /// Agent tool invocation.
    ToolCall,
}

impl StepKind {
    /// Step name as it appears in the diagnostics trace.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rewrite => "rewrite",
            Self::Retrieval => "retrieval",
            Self::Assembly => "assembly",
            Self::Generation => "generation",
            Self::ToolCall => "tool_call",
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticStep {
    /// Step name (see [`StepKind::as_str`]).
    pub name: String,
    /// Free-form description of what happened.
    pub content: String,
}

/// Append-only trace of one orchestration run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Steps in the order they were recorded.
    pub steps: Vec<DiagnosticStep>,
}

impl Diagnostics {
    /// Creates an empty trace.
    #[must_use]
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends a step.
    pub fn record(&mut self, kind: StepKind, content: impl Into<String>) {
        self.steps.push(DiagnosticStep {
            name: kind.as_str().to_string(),
            content: content.into(),
        });
    }

    /// Number of recorded steps.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    /// Finishes the run, pairing the trace with the answer.
    #[must_use]
    pub fn into_result(self, content: String) -> RequestResult {
        RequestResult {
            content,
            execution_diagnostics: self,
        }
    }
}

/// Terminal, caller-visible artifact of one orchestration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestResult {
    /// The generated answer.
    pub content: String,
    /// Trace of the actions taken to produce it.
    pub execution_diagnostics: Diagnostics,
}
