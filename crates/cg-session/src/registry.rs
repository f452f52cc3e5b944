use crate::dedup::IgnoreSet;
use cg_core::{sanitize_filename, CgError, Identity, NamedPayload, Result, Snippet};

/// Ordered snippets of the active pass plus the session's ignore-set.
#[derive(Debug, Clone, Default)]
pub struct SnippetRegistry {
    snippets: Vec<Snippet>,
    ignored: IgnoreSet,
}

impl SnippetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn get(&self, index: usize) -> Option<&Snippet> {
        self.snippets.get(index)
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn ignore_set(&self) -> &IgnoreSet {
        &self.ignored
    }

    /// Swap in the result of a new pass.
    pub fn replace(&mut self, snippets: Vec<Snippet>) {
        self.snippets = snippets;
    }

    pub(crate) fn push(&mut self, snippet: Snippet) {
        self.snippets.push(snippet);
    }

    /// Move every held snippet into the ignore-set and empty the list.
    /// Returns how many were cleared.
    pub fn clear(&mut self) -> usize {
        let cleared = self.snippets.len();
        for s in self.snippets.drain(..) {
            self.ignored.insert(s.id, &s.content);
        }
        cleared
    }

    /// Change a snippet's filename. The identity is left untouched.
    pub fn rename(&mut self, index: usize, new_name: &str) -> Result<&Snippet> {
        let len = self.snippets.len();
        let name = sanitize_filename(new_name);
        if name.is_empty() {
            return Err(CgError::InvalidName(new_name.to_string()));
        }
        let snippet = self
            .snippets
            .get_mut(index)
            .ok_or(CgError::IndexOutOfRange { index, len })?;
        snippet.filename = name;
        snippet.synthesized_name = false;
        Ok(snippet)
    }

    /// Rename the first snippet carrying `id`.
    pub fn rename_identity(&mut self, id: Identity, new_name: &str) -> Result<&Snippet> {
        let index = self
            .snippets
            .iter()
            .position(|s| s.id == id)
            .ok_or(CgError::UnknownIdentity(id))?;
        self.rename(index, new_name)
    }

    /// Payloads for an archive. `None` selects every snippet; otherwise the
    /// given indices, in the given order.
    pub fn payloads(&self, selection: Option<&[usize]>) -> Result<Vec<NamedPayload>> {
        let len = self.snippets.len();
        match selection {
            None => Ok(self.snippets.iter().map(Snippet::to_payload).collect()),
            Some(indices) => indices
                .iter()
                .map(|&index| {
                    self.snippets
                        .get(index)
                        .map(Snippet::to_payload)
                        .ok_or(CgError::IndexOutOfRange { index, len })
                })
                .collect(),
        }
    }

    /// Copy of this registry with every rename applied, or the first error.
    /// `self` is never touched.
    pub fn with_renames<'a>(&self, renames: impl IntoIterator<Item = (usize, &'a str)>) -> Result<Self> {
        let mut staged = self.clone();
        for (index, name) in renames {
            staged.rename(index, name)?;
        }
        Ok(staged)
    }

    /// Drop the list and the ignore-set.
    pub fn reset(&mut self) {
        self.snippets.clear();
        self.ignored.clear();
    }
}
