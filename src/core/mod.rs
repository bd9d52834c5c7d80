//! Request-scoped data model.
//!
//! Plain data types with their invariants: conversation turns, retrieved
//! passages, and the diagnostics trace returned with every answer. Nothing
//! here performs I/O.

pub mod conversation;
pub mod diagnostics;
pub mod passage;

pub use conversation::{Conversation, ConversationTurn, Role};
pub use diagnostics::{DiagnosticStep, Diagnostics, RequestResult, StepKind};
pub use passage::RetrievedPassage;
