//! The ledger: committed customer records and everything read from them.

use crate::error::{LedgerError, Result};
use crate::query::{self, ListingRow};
use crate::report::{self, Granularity, IncomeReport};
use crate::storage::{FileBackend, MemoryBackend, StorageBackend};
use crate::subscriptions::{
    SubscriptionConfig, SubscriptionHandle, SubscriptionId, SubscriptionManager,
};
use crate::types::{CustomerRecord, RecordId};
use crate::visit::VisitDraft;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Key the record list is persisted under.
pub const RECORDS_KEY: &str = "customers";

/// Ledger configuration.
#[derive(Clone, Debug)]
pub struct LedgerConfig {
    /// Directory the ledger is kept in.
    pub path: PathBuf,

    /// Whether to create the directory if it doesn't exist.
    pub create_if_missing: bool,

    /// Prefix for formatted amounts in reports.
    pub currency_symbol: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./ledger"),
            create_if_missing: true,
            currency_symbol: "₹".to_string(),
        }
    }
}

/// In-memory copy of the persisted state.
struct LedgerState {
    /// Display and report order.
    records: Vec<CustomerRecord>,

    /// Next id to hand out. Only ever grows.
    next_id: RecordId,
}

/// Ordered list of committed customer visits.
///
/// The whole list is written back to the backend after every mutation.
pub struct Ledger {
    config: LedgerConfig,

    backend: Box<dyn StorageBackend>,

    state: RwLock<LedgerState>,

    subscriptions: SubscriptionManager,
}

impl Ledger {
    /// Open the ledger directory, creating it if the config allows.
    pub fn open_or_create(config: LedgerConfig) -> Result<Self> {
        let backend = FileBackend::open(&config.path, config.create_if_missing)?;
        Self::with_backend(Box::new(backend), config)
    }

    /// Create (or reuse) the ledger directory.
    pub fn create(config: LedgerConfig) -> Result<Self> {
        let backend = FileBackend::open(&config.path, true)?;
        Self::with_backend(Box::new(backend), config)
    }

    /// Open an existing ledger directory.
    pub fn open(config: LedgerConfig) -> Result<Self> {
        let backend = FileBackend::open(&config.path, false)?;
        Self::with_backend(Box::new(backend), config)
    }

    /// A ledger that lives only in memory.
    pub fn in_memory() -> Self {
        Self::from_records(Box::new(MemoryBackend::new()), LedgerConfig::default(), Vec::new())
    }

    /// Load the ledger from `backend`.
    ///
    /// Missing content yields an empty ledger. Records that cannot be read are
    /// skipped, and the stored content is first copied aside so later writes
    /// never destroy it.
    pub fn with_backend(backend: Box<dyn StorageBackend>, config: LedgerConfig) -> Result<Self> {
        let records = Self::load_records(backend.as_ref())?;
        info!(records = records.len(), "opened ledger");
        Ok(Self::from_records(backend, config, records))
    }

    fn from_records(
        backend: Box<dyn StorageBackend>,
        config: LedgerConfig,
        records: Vec<CustomerRecord>,
    ) -> Self {
        let next_id = records
            .iter()
            .map(|r| r.id)
            .max()
            .map_or(RecordId(1), RecordId::next);

        Self {
            config,
            backend,
            state: RwLock::new(LedgerState { records, next_id }),
            subscriptions: SubscriptionManager::new(),
        }
    }

    fn load_records(backend: &dyn StorageBackend) -> Result<Vec<CustomerRecord>> {
        let Some(bytes) = backend.read(RECORDS_KEY)? else {
            return Ok(Vec::new());
        };

        let entries: Vec<serde_json::Value> = match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "persisted records unreadable, starting empty");
                Self::preserve_unreadable(backend, &bytes)?;
                return Ok(Vec::new());
            }
        };

        let stored = entries.len();
        let mut records = Vec::with_capacity(stored);
        for (position, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<CustomerRecord>(entry) {
                Ok(record) => records.push(record),
                Err(e) => warn!(position, error = %e, "skipping unreadable record"),
            }
        }

        if records.len() < stored {
            Self::preserve_unreadable(backend, &bytes)?;
        }
        Ok(records)
    }

    /// Copy content that could not be fully loaded to `customers.corrupt-<n>`
    /// before the next write replaces it. Identical content is kept only once.
    fn preserve_unreadable(backend: &dyn StorageBackend, bytes: &[u8]) -> Result<String> {
        let mut n = 1u32;
        loop {
            let key = format!("{RECORDS_KEY}.corrupt-{n}");
            match backend.read(&key)? {
                None => {
                    backend.write(&key, bytes)?;
                    warn!(%key, "kept unreadable ledger content");
                    return Ok(key);
                }
                Some(existing) if existing == bytes => return Ok(key),
                Some(_) => n += 1,
            }
        }
    }

    fn persist(&self, records: &[CustomerRecord]) -> Result<()> {
        let encoded = serde_json::to_vec(records)?;
        self.backend.write(RECORDS_KEY, &encoded)?;
        debug!(records = records.len(), bytes = encoded.len(), "persisted ledger");
        Ok(())
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn currency_symbol(&self) -> &str {
        &self.config.currency_symbol
    }

    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().records.is_empty()
    }

    /// Snapshot of every record in display order.
    pub fn records(&self) -> Vec<CustomerRecord> {
        self.state.read().records.clone()
    }

    /// Record at display `index`.
    pub fn get(&self, index: usize) -> Option<CustomerRecord> {
        self.state.read().records.get(index).cloned()
    }

    pub fn find(&self, id: RecordId) -> Option<CustomerRecord> {
        self.state.read().records.iter().find(|r| r.id == id).cloned()
    }

    // --- Mutations ---

    /// Commit a finished visit and return its id.
    ///
    /// The draft's totals must have been computed; otherwise nothing is stored
    /// and [`LedgerError::TotalNotComputed`] is returned.
    pub fn commit(&self, draft: VisitDraft) -> Result<RecordId> {
        let record = {
            let mut state = self.state.write();
            let id = state.next_id;
            let record = draft.into_record(id)?;

            state.records.push(record.clone());
            if let Err(e) = self.persist(&state.records) {
                state.records.pop();
                return Err(e);
            }
            state.next_id = id.next();
            record
        };

        info!(id = %record.id, customer = %record.name, total = record.total, "saved customer visit");
        self.subscriptions.broadcast_saved(&record);
        Ok(record.id)
    }

    /// Remove the record at display `index`. There is no undo.
    pub fn delete_at(&self, index: usize) -> Result<CustomerRecord> {
        self.remove(|records| {
            if index < records.len() {
                Ok(index)
            } else {
                Err(LedgerError::IndexOutOfRange {
                    index,
                    len: records.len(),
                })
            }
        })
    }

    /// Remove the record with `id`, wherever it currently sits.
    pub fn delete_by_id(&self, id: RecordId) -> Result<CustomerRecord> {
        self.remove(|records| {
            records
                .iter()
                .position(|r| r.id == id)
                .ok_or(LedgerError::RecordNotFound(id))
        })
    }

    /// Remove the record at `index` once `confirm` agrees. Declining leaves the
    /// ledger untouched and returns `Ok(None)`.
    ///
    /// The record confirmed is the one removed, even if the ledger changed
    /// while `confirm` ran.
    pub fn delete_confirmed<F>(&self, index: usize, confirm: F) -> Result<Option<CustomerRecord>>
    where
        F: FnOnce(&CustomerRecord) -> bool,
    {
        let candidate = self.get(index).ok_or_else(|| LedgerError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;

        if !confirm(&candidate) {
            debug!(index, "delete declined");
            return Ok(None);
        }

        self.delete_by_id(candidate.id).map(Some)
    }

    /// Remove the record `locate` picks, under the write lock.
    fn remove<F>(&self, locate: F) -> Result<CustomerRecord>
    where
        F: FnOnce(&[CustomerRecord]) -> Result<usize>,
    {
        let (index, removed) = {
            let mut state = self.state.write();
            let index = locate(&state.records)?;

            let removed = state.records.remove(index);
            if let Err(e) = self.persist(&state.records) {
                state.records.insert(index, removed);
                return Err(e);
            }
            (index, removed)
        };

        info!(id = %removed.id, index, "deleted customer record");
        self.subscriptions.broadcast_deleted(&removed, index);
        Ok(removed)
    }

    /// Editing committed records is not supported; always an error.
    pub fn edit_at(&self, index: usize) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(LedgerError::IndexOutOfRange { index, len });
        }
        Err(LedgerError::EditNotSupported(index))
    }

    // --- Views ---

    /// Records matching `term` in display order. Empty term returns all.
    pub fn search(&self, term: &str) -> Vec<CustomerRecord> {
        let state = self.state.read();
        query::filter_records(&state.records, term)
            .into_iter()
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// Customer table rows for `term`.
    pub fn listing(&self, term: &str) -> Vec<ListingRow> {
        query::listing(&self.state.read().records, term)
    }

    /// Income grouped by `granularity`.
    pub fn income_report(&self, granularity: Granularity) -> Result<IncomeReport> {
        report::group_by_period(&self.state.read().records, granularity)
    }

    /// CSV of every record.
    pub fn export_csv(&self) -> Result<Vec<u8>> {
        report::to_csv(&self.state.read().records)
    }

    /// Write the CSV export into `dir`.
    pub fn export_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        report::export_to_dir(&self.state.read().records, dir)
    }

    // --- Subscriptions ---

    /// Be told about future saves and deletes.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        self.subscriptions.subscribe(config)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.unsubscribe(id)
    }
}
