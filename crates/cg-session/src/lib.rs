//! Capture session state: deduplication, the snippet registry, and
//! collection across independent sources.

pub mod dedup;
pub mod registry;
pub mod session;
pub mod sources;

pub use dedup::{merge_by_identity, Admission, DeduplicationIndex, IgnoreSet};
pub use registry::SnippetRegistry;
pub use session::{CaptureSession, SharedSession};
pub use sources::{collect_from_sources, SnippetSource, DEFAULT_SOURCE_TIMEOUT};
