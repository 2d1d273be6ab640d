use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::generation::generator::ContentGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once in `main` around the single completion client.
    pub generator: Arc<ContentGenerator>,
    /// Fired on shutdown; cancels in-flight generations.
    pub shutdown: CancellationToken,
}
