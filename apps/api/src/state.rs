use crate::store::Records;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Record store facade. Owns the warehouse → local-copy fallback.
    pub records: Records,
}
