//! Fan-out/fan-in collection from independent snippet sources.

use crate::dedup::merge_by_identity;
use crate::session::SharedSession;
use async_trait::async_trait;
use cg_core::Snippet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(2);

/// Anything that can hand over its current snippet list, e.g. one frame.
#[async_trait]
pub trait SnippetSource: Send + Sync {
    fn name(&self) -> String;

    async fn snippets(&self) -> anyhow::Result<Vec<Snippet>>;
}

#[async_trait]
impl SnippetSource for SharedSession {
    fn name(&self) -> String {
        self.with(|s| format!("session:{}", s.id))
    }

    async fn snippets(&self) -> anyhow::Result<Vec<Snippet>> {
        Ok(self.snapshot())
    }
}

/// Ask every source at once and merge the answers by identity, in source
/// order. A source that fails, panics, or misses the shared deadline
/// contributes nothing.
pub async fn collect_from_sources(sources: Vec<Arc<dyn SnippetSource>>, timeout: Duration) -> Vec<Snippet> {
    let deadline = tokio::time::Instant::now() + timeout;
    let total = sources.len();

    let pending: Vec<_> = sources
        .into_iter()
        .map(|source| {
            let name = source.name();
            let handle = tokio::spawn(async move { source.snippets().await });
            (name, handle)
        })
        .collect();

    let mut lists = Vec::with_capacity(pending.len());
    for (name, mut handle) in pending {
        let list = match tokio::time::timeout_at(deadline, &mut handle).await {
            Ok(Ok(Ok(list))) => list,
            Ok(Ok(Err(e))) => {
                warn!(source = %name, error = %e, "snippet source failed");
                Vec::new()
            }
            Ok(Err(e)) => {
                warn!(source = %name, error = %e, "snippet source task aborted");
                Vec::new()
            }
            Err(_) => {
                handle.abort();
                warn!(source = %name, "snippet source timed out");
                Vec::new()
            }
        };
        lists.push(list);
    }

    let merged = merge_by_identity(lists);
    info!(sources = total, unique = merged.len(), "collected snippets from sources");
    merged
}
