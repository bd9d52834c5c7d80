//! Retrieved reference passages.

use serde::{Deserialize, Serialize};

/// A passage returned by a retrieval backend.
///
/// Sequences of passages are ordered by relevance rank (most similar first)
/// and that order is preserved through prompt assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Display name of the source document.
    pub source_name: String,
    /// Passage text.
    pub content: String,
}

impl RetrievedPassage {
    /// Creates a passage.
    #[must_use]
    pub fn new(source_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            content: content.into(),
        }
    }
}
