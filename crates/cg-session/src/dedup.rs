//! Identity-keyed deduplication with full-content verification on hash hits.

use cg_core::{Identity, Snippet};
use std::collections::HashMap;
use tracing::warn;

/// Identities the user cleared. Grows for the life of the registry.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    entries: HashMap<Identity, Vec<String>>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: Identity, content: &str) {
        let trimmed = content.trim();
        let bucket = self.entries.entry(id).or_default();
        if !bucket.iter().any(|c| c == trimmed) {
            bucket.push(trimmed.to_string());
        }
    }

    /// True only when `content` itself was cleared, not merely a colliding one.
    pub fn contains(&self, id: Identity, content: &str) -> bool {
        let trimmed = content.trim();
        self.entries
            .get(&id)
            .is_some_and(|bucket| bucket.iter().any(|c| c == trimmed))
    }

    pub fn contains_identity(&self, id: Identity) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Result of offering content to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted(Identity),
    Duplicate(Identity),
    Ignored(Identity),
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn identity(&self) -> Identity {
        match *self {
            Self::Accepted(id) | Self::Duplicate(id) | Self::Ignored(id) => id,
        }
    }
}

/// Identities seen during one classification pass.
#[derive(Debug, Clone, Default)]
pub struct DeduplicationIndex {
    seen: HashMap<Identity, Vec<String>>,
    collisions: usize,
}

impl DeduplicationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer normalized content. Duplicates are rejected only when
    /// `dedup_enabled`; ignored content is rejected regardless.
    pub fn admit(&mut self, content: &str, ignore: &IgnoreSet, dedup_enabled: bool) -> Admission {
        let trimmed = content.trim();
        let id = Identity::of(trimmed);

        let seen_before = self
            .seen
            .get(&id)
            .is_some_and(|bucket| bucket.iter().any(|c| c == trimmed));

        if dedup_enabled && seen_before {
            return Admission::Duplicate(id);
        }
        if ignore.contains(id, trimmed) {
            return Admission::Ignored(id);
        }

        if !seen_before {
            let bucket = self.seen.entry(id).or_default();
            if !bucket.is_empty() {
                self.collisions += 1;
                warn!(identity = %id, "identity collision between distinct contents");
            }
            bucket.push(trimmed.to_string());
        }
        Admission::Accepted(id)
    }

    /// Distinct contents seen.
    pub fn len(&self) -> usize {
        self.seen.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct contents that shared an identity with an earlier one.
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    pub fn reset(&mut self) {
        self.seen.clear();
        self.collisions = 0;
    }
}

/// Merge per-source snippet lists in order; later entries with the same
/// identity and content are dropped (first seen wins).
pub fn merge_by_identity<I>(lists: I) -> Vec<Snippet>
where
    I: IntoIterator<Item = Vec<Snippet>>,
{
    let mut seen: HashMap<Identity, Vec<String>> = HashMap::new();
    let mut merged = Vec::new();
    for snippet in lists.into_iter().flatten() {
        let trimmed = snippet.content.trim();
        let bucket = seen.entry(snippet.id).or_default();
        if bucket.iter().any(|c| c == trimmed) {
            continue;
        }
        bucket.push(trimmed.to_string());
        merged.push(snippet);
    }
    merged
}
