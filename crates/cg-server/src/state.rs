//! Application state shared across all handlers.

use cg_core::Settings;
use cg_session::{CaptureSession, SharedSession};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub session: SharedSession,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            session: SharedSession::new(CaptureSession::new(settings)),
            start_time: std::time::Instant::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
