//! Shared handler state.

use tokio_util::sync::CancellationToken;

use crate::rag::RagService;

/// State cloned into every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    service: RagService,
    shutdown: CancellationToken,
}

impl AppState {
    /// Creates state around a built service and the server's shutdown token.
    #[must_use]
    pub const fn new(service: RagService, shutdown: CancellationToken) -> Self {
        Self { service, shutdown }
    }

    /// The orchestrators.
    #[must_use]
    pub const fn service(&self) -> &RagService {
        &self.service
    }

    /// Token for one request; cancelled when the server shuts down.
    #[must_use]
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}
