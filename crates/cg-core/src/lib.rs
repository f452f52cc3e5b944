//! Shared types for the snippet capture workspace: settings, candidate blocks,
//! snippets, errors and filename helpers.

pub mod config;
pub mod error;
pub mod naming;
pub mod types;

pub use config::{ClassifierConfig, Settings};
pub use error::{CgError, Result};
pub use naming::{bundle_filename, mime_for_extension, sanitize_filename};
pub use types::{CandidateBlock, CaptureStats, Identity, NamedPayload, Snippet, StructuralHint};
