//! Classification pipeline: runs the five stages over one block.

use crate::{stage1_extract, stage2_line_numbers, stage3_noise, stage4_language, stage5_naming};
use crate::stage3_noise::RejectReason;
use cg_core::{CandidateBlock, ClassifierConfig, Identity, Snippet};
use tracing::debug;

/// A block that passed classification but has not been deduplicated yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSnippet {
    pub filename: String,
    pub extension: String,
    /// Normalized content (line numbers stripped, untrimmed).
    pub content: String,
    pub synthesized_name: bool,
    pub position_index: usize,
}

impl CandidateSnippet {
    /// Identity of the normalized, trimmed content.
    pub fn identity(&self) -> Identity {
        Identity::of(&self.content)
    }

    pub fn into_snippet(self, id: Identity) -> Snippet {
        Snippet {
            id,
            filename: self.filename,
            extension: self.extension,
            content: self.content,
            synthesized_name: self.synthesized_name,
        }
    }
}

/// Outcome of classifying one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Candidate(CandidateSnippet),
    Rejected(RejectReason),
}

impl Classification {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn candidate(self) -> Option<CandidateSnippet> {
        match self {
            Self::Candidate(c) => Some(c),
            Self::Rejected(_) => None,
        }
    }
}

/// Normalized text of a block: extraction, then optional line-number stripping.
pub fn normalize(block: &CandidateBlock, config: &ClassifierConfig) -> String {
    let text = stage1_extract::extract(block);
    if config.strip_line_numbers {
        stage2_line_numbers::strip_line_numbers(&text)
    } else {
        text
    }
}

/// Classify one block under `config`.
pub fn classify(block: &CandidateBlock, config: &ClassifierConfig) -> Classification {
    let content = normalize(block, config);

    if let Some(reason) = stage3_noise::detect_noise(&content, config) {
        debug!(position = block.position_index, %reason, "block rejected");
        return Classification::Rejected(reason);
    }

    let extension = stage4_language::resolve_extension(block, config);

    let inferred = if config.infer_filename {
        stage5_naming::infer_filename(&content, block.labels(), &extension)
    } else {
        None
    };
    let (filename, synthesized_name) =
        stage5_naming::resolve_filename(inferred, block.position_index, &extension);

    Classification::Candidate(CandidateSnippet {
        filename,
        extension,
        content,
        synthesized_name,
        position_index: block.position_index,
    })
}

/// Classifier bound to one pass's configuration.
#[derive(Debug, Clone, Default)]
pub struct ContentClassifier {
    pub config: ClassifierConfig,
}

impl ContentClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, block: &CandidateBlock) -> Classification {
        classify(block, &self.config)
    }

    /// Classify a batch, keeping only candidates, in input order.
    pub fn classify_all<'a>(&self, blocks: impl IntoIterator<Item = &'a CandidateBlock>) -> Vec<CandidateSnippet> {
        blocks
            .into_iter()
            .filter_map(|b| self.classify(b).candidate())
            .collect()
    }
}
