//! Change notifications for ledger views.
//!
//! Views that render from the ledger (the income chart, the customer table)
//! subscribe here and re-render when a record is saved or deleted.
//!
//! - Filtering by event kind
//! - Bounded buffers with slow-subscriber dropping
//!
//! # Example
//!
//! ```ignore
//! let handle = ledger.subscribe(SubscriptionConfig::default());
//!
//! loop {
//!     match handle.recv() {
//!         Ok(LedgerEvent::Saved { record }) => println!("saved {}", record.id),
//!         Ok(LedgerEvent::Deleted { record, .. }) => println!("deleted {}", record.id),
//!         Ok(LedgerEvent::Dropped { .. }) | Err(_) => break,
//!     }
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    DropReason, LedgerEvent, RecordSummary, SubscriptionConfig, SubscriptionFilter,
    SubscriptionHandle, SubscriptionId,
};
