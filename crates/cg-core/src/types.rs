use serde::{Deserialize, Serialize};
use std::fmt;

/// 32-bit content identity used as the dedup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub i32);

impl Identity {
    /// Polynomial rolling hash (`h = h * 31 + unit`) over the UTF-16 code
    /// units of `content.trim()`, wrapping in signed 32 bits.
    pub fn of(content: &str) -> Self {
        let mut h: i32 = 0;
        for unit in content.trim().encode_utf16() {
            h = h.wrapping_mul(31).wrapping_add(i32::from(unit));
        }
        Identity(h)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural context captured next to a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum StructuralHint {
    /// A class-like token of the block or its container, e.g. `language-rust`.
    Class(String),
    /// Text of a preceding label element. Nearest label first.
    Label(String),
}

/// A raw text fragment proposed for classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateBlock {
    pub raw_text: String,
    #[serde(default)]
    pub structural_hints: Vec<StructuralHint>,
    #[serde(default)]
    pub position_index: usize,
    /// Whether the text was read from a nested code element rather than the
    /// bare container (which may include a line-number gutter).
    #[serde(default = "default_true")]
    pub from_code_element: bool,
}

fn default_true() -> bool {
    true
}

impl CandidateBlock {
    pub fn new(raw_text: impl Into<String>, position_index: usize) -> Self {
        Self {
            raw_text: raw_text.into(),
            structural_hints: Vec::new(),
            position_index,
            from_code_element: true,
        }
    }

    pub fn with_class(mut self, token: impl Into<String>) -> Self {
        self.structural_hints.push(StructuralHint::Class(token.into()));
        self
    }

    pub fn with_label(mut self, text: impl Into<String>) -> Self {
        self.structural_hints.push(StructuralHint::Label(text.into()));
        self
    }

    pub fn without_code_element(mut self) -> Self {
        self.from_code_element = false;
        self
    }

    pub fn class_tokens(&self) -> impl Iterator<Item = &str> {
        self.structural_hints.iter().filter_map(|h| match h {
            StructuralHint::Class(c) => Some(c.as_str()),
            StructuralHint::Label(_) => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.structural_hints.iter().filter_map(|h| match h {
            StructuralHint::Label(l) => Some(l.as_str()),
            StructuralHint::Class(_) => None,
        })
    }
}

/// A classified, deduplicated snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: Identity,
    pub filename: String,
    pub extension: String,
    pub content: String,
    /// True when the filename was synthesized rather than inferred.
    #[serde(default)]
    pub synthesized_name: bool,
}

const PREVIEW_CHARS: usize = 50;

impl Snippet {
    /// Short single-line preview of the content.
    pub fn preview(&self) -> String {
        let head: String = self.content.trim().chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head.replace('\n', " "))
    }

    /// Button label: `.ext` for synthesized names, else the filename.
    pub fn label(&self) -> String {
        if self.synthesized_name {
            format!(".{}", self.extension)
        } else {
            self.filename.clone()
        }
    }

    pub fn to_payload(&self) -> NamedPayload {
        NamedPayload::new(self.filename.clone(), self.content.as_bytes().to_vec())
    }
}

/// One named byte payload handed to the archive serializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedPayload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl NamedPayload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), bytes: bytes.into() }
    }
}

/// Usage counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureStats {
    pub files_detected: u64,
    pub downloads: u64,
    pub zips: u64,
}
