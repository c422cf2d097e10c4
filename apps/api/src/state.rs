use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Screening is stateless; handlers only need the configuration.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}
