//! # Visit Ledger
//!
//! Record keeping for a service business: capture a customer visit with
//! itemized charges and a discount, keep the visits in a persisted ledger, and
//! report income by day, month or year.
//!
//! ## Core Concepts
//!
//! - **Drafts**: a visit under construction, committed once its totals are computed
//! - **Ledger**: ordered list of committed visits, written in full on every change
//! - **Reports**: per-period income sums for the chart plus the flat report table
//! - **Export**: the whole ledger as `income_report.csv`
//!
//! ## Example
//!
//! ```ignore
//! use visit_ledger::{Granularity, Ledger, LedgerConfig, VisitDraft, VisitorDetails};
//!
//! let ledger = Ledger::open_or_create(LedgerConfig {
//!     path: "./my-ledger".into(),
//!     ..Default::default()
//! })?;
//!
//! let mut draft = VisitDraft::begin(VisitorDetails::today("Glow Studio", "Asha", "98765", "Lake Rd"));
//! draft.add_service("Haircut", 250.0);
//! draft.set_discount(50.0);
//! draft.compute_total();
//! ledger.commit(draft)?;
//!
//! let report = ledger.income_report(Granularity::Monthly)?;
//! println!("{:?} {:?}", report.labels(), report.sums());
//! ```

pub mod error;
pub mod query;
pub mod report;
pub mod storage;
pub mod store;
pub mod subscriptions;
pub mod types;
pub mod visit;

// Re-exports
pub use error::{LedgerError, Result};
pub use query::{filter_records, listing, ListingRow};
pub use report::{
    export_to_dir, group_by_period, to_csv, Bucket, ChartSink, Granularity, IncomeReport,
    PeriodKey, ReportRow, CSV_HEADER, EXPORT_FILE_NAME,
};
pub use storage::{FileBackend, MemoryBackend, StorageBackend};
pub use store::{Ledger, LedgerConfig, RECORDS_KEY};
pub use subscriptions::{
    DropReason, LedgerEvent, RecordSummary, SubscriptionConfig, SubscriptionFilter,
    SubscriptionHandle, SubscriptionId, SubscriptionManager,
};
pub use types::*;
pub use visit::{parse_amount, Totals, VisitDraft, VisitSession, VisitorDetails, SESSION_KEY};
