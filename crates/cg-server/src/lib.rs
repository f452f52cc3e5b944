//! HTTP API over a capture session (Axum).
//!
//! Collaborators post candidate blocks, list/rename/clear snippets, fetch a
//! single snippet or a ZIP bundle, and manage settings.

pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use state::AppState;

/// Build the application router with a fresh session.
pub fn app() -> Router {
    app_with_state(AppState::new())
}

/// Build the application router with a custom state.
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::snippet_routes())
        .merge(routes::download_routes())
        .merge(routes::settings_routes())
        .with_state(state)
}

#[cfg(test)]
mod tests;
