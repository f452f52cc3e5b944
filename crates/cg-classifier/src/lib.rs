//! Content classifier. Decides whether a captured block is real content or
//! UI noise, then normalizes and names it.
//!
//! Stages, applied in order:
//! 1. Extract: visible text only, gutter removal
//! 2. Line numbers: majority-vote stripping of injected line numbers
//! 3. Noise: length floor and UI-chrome marker heuristics
//! 4. Language: extension from class hints
//! 5. Naming: filename from a header comment or preceding labels

pub mod stage1_extract;
pub mod stage2_line_numbers;
pub mod stage3_noise;
pub mod stage4_language;
pub mod stage5_naming;
pub mod pipeline;

pub use pipeline::{classify, CandidateSnippet, Classification, ContentClassifier};
pub use stage3_noise::RejectReason;
