use crate::dedup::{Admission, DeduplicationIndex};
use crate::registry::SnippetRegistry;
use cg_classifier::{classify, Classification};
use cg_core::{CandidateBlock, CaptureStats, ClassifierConfig, NamedPayload, Result, Settings, Snippet};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};
use uuid::Uuid;

/// Capture context for one session: settings, registry, per-pass dedup
/// index and counters. Passes take `&mut self`, so one writer at a time.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    pub id: String,
    pub created_at: DateTime<Utc>,
    settings: Settings,
    config: ClassifierConfig,
    registry: SnippetRegistry,
    pass_index: DeduplicationIndex,
    stats: CaptureStats,
}

impl CaptureSession {
    pub fn new(settings: Settings) -> Self {
        let config = settings.classifier_config();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            settings,
            config,
            registry: SnippetRegistry::new(),
            pass_index: DeduplicationIndex::new(),
            stats: CaptureStats::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// New settings apply from the next pass on.
    pub fn update_settings(&mut self, settings: Settings) {
        self.config = settings.classifier_config();
        self.settings = settings;
    }

    pub fn registry(&self) -> &SnippetRegistry {
        &self.registry
    }

    pub fn snippets(&self) -> &[Snippet] {
        self.registry.list()
    }

    pub fn stats(&self) -> CaptureStats {
        self.stats
    }

    /// Classify one block and, if it survives dedup, append it to the
    /// current pass.
    pub fn classify_and_admit(&mut self, block: &CandidateBlock) -> Option<Snippet> {
        if !self.settings.auto_detect {
            return None;
        }
        let candidate = match classify(block, &self.config) {
            Classification::Candidate(c) => c,
            Classification::Rejected(_) => return None,
        };

        match self.pass_index.admit(&candidate.content, self.registry.ignore_set(), self.config.dedup_enabled) {
            Admission::Accepted(id) => {
                let snippet = candidate.into_snippet(id);
                self.registry.push(snippet.clone());
                self.stats.files_detected += 1;
                Some(snippet)
            }
            other => {
                debug!(position = block.position_index, identity = %other.identity(), admission = ?other, "block not admitted");
                None
            }
        }
    }

    /// Run a full pass: the previous list is replaced by whatever survives.
    /// With detection off the pass is skipped and the list kept as is.
    pub fn run_pass<'a>(&mut self, blocks: impl IntoIterator<Item = &'a CandidateBlock>) -> &[Snippet] {
        if !self.settings.auto_detect {
            debug!(session = %self.id, "detection disabled, pass skipped");
            return self.registry.list();
        }
        self.pass_index.reset();
        self.registry.replace(Vec::new());

        let mut offered = 0usize;
        for block in blocks {
            offered += 1;
            self.classify_and_admit(block);
        }

        info!(
            session = %self.id,
            offered,
            admitted = self.registry.len(),
            collisions = self.pass_index.collisions(),
            "classification pass finished"
        );
        self.registry.list()
    }

    pub fn clear(&mut self) -> usize {
        let cleared = self.registry.clear();
        info!(session = %self.id, cleared, ignored = self.registry.ignore_set().len(), "snippets cleared");
        cleared
    }

    pub fn rename(&mut self, index: usize, new_name: &str) -> Result<&Snippet> {
        self.registry.rename(index, new_name)
    }

    /// Full reset: snippets, ignore-set and pass index.
    pub fn reset(&mut self) {
        self.registry.reset();
        self.pass_index.reset();
    }

    /// Payloads for an archive. `None` selects every snippet; otherwise the
    /// given indices, in the given order.
    pub fn payloads(&self, selection: Option<&[usize]>) -> Result<Vec<NamedPayload>> {
        self.registry.payloads(selection)
    }

    /// Install a registry staged with [`SnippetRegistry::with_renames`].
    pub fn commit_registry(&mut self, registry: SnippetRegistry) {
        self.registry = registry;
    }

    pub fn record_download(&mut self) {
        self.stats.downloads += 1;
    }

    pub fn record_zip(&mut self) {
        self.stats.zips += 1;
    }
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

/// A session shared between an owner and readers such as source collection.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<CaptureSession>>,
}

impl SharedSession {
    pub fn new(session: CaptureSession) -> Self {
        Self { inner: Arc::new(Mutex::new(session)) }
    }

    /// Run `f` with exclusive access to the session.
    pub fn with<R>(&self, f: impl FnOnce(&mut CaptureSession) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    pub fn snapshot(&self) -> Vec<Snippet> {
        self.with(|s| s.snippets().to_vec())
    }
}
