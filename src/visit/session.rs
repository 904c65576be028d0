//! Handoff of the in-progress visit between UI steps.

use crate::error::{LedgerError, Result};
use crate::storage::{MemoryBackend, StorageBackend};
use crate::visit::VisitDraft;
use tracing::{debug, warn};

/// Key the in-progress visit is kept under.
pub const SESSION_KEY: &str = "currentCustomer";

/// Session-scoped slot holding at most one draft.
pub struct VisitSession<B: StorageBackend = MemoryBackend> {
    backend: B,
}

impl VisitSession<MemoryBackend> {
    pub fn new() -> Self {
        Self {
            backend: MemoryBackend::new(),
        }
    }
}

impl Default for VisitSession<MemoryBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: StorageBackend> VisitSession<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Keep `draft` for the next step, replacing any earlier one.
    pub fn stash(&self, draft: &VisitDraft) -> Result<()> {
        let encoded = serde_json::to_vec(draft)?;
        self.backend.write(SESSION_KEY, &encoded)?;
        debug!(customer = %draft.details().name, "stashed visit draft");
        Ok(())
    }

    /// Pick up the stashed draft. An empty or unreadable slot means the caller
    /// has to restart from the entry step. Totals do not travel with the draft.
    pub fn resume(&self) -> Result<VisitDraft> {
        let bytes = self
            .backend
            .read(SESSION_KEY)?
            .ok_or(LedgerError::NoActiveVisit)?;

        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(error = %e, "discarding unreadable visit draft");
            LedgerError::NoActiveVisit
        })
    }

    /// Drop the stashed draft, if any.
    pub fn clear(&self) -> Result<()> {
        self.backend.remove(SESSION_KEY)
    }
}
