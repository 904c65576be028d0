//! Subscription types for ledger change notifications.

use crate::types::{CustomerRecord, RecordId, VisitDate};
use serde::{Deserialize, Serialize};

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before dropping subscriber.
    /// Default: 256
    pub buffer_size: usize,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 256,
            filter: SubscriptionFilter::all(),
        }
    }
}

/// Which events a subscriber wants.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// Include committed records.
    pub include_saves: bool,

    /// Include deleted records.
    pub include_deletes: bool,
}

impl SubscriptionFilter {
    pub fn saves() -> Self {
        Self {
            include_saves: true,
            ..Default::default()
        }
    }

    pub fn deletes() -> Self {
        Self {
            include_deletes: true,
            ..Default::default()
        }
    }

    pub fn all() -> Self {
        Self {
            include_saves: true,
            include_deletes: true,
        }
    }
}

/// Events emitted to subscribers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A visit was committed.
    Saved { record: RecordSummary },

    /// The record at `index` was removed.
    Deleted { record: RecordSummary, index: usize },

    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// The parts of a record views need to refresh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: RecordId,
    pub date: VisitDate,
    pub name: String,
    pub total: f64,
}

impl RecordSummary {
    pub fn from_record(record: &CustomerRecord) -> Self {
        Self {
            id: record.id,
            date: record.date,
            name: record.name.clone(),
            total: record.total,
        }
    }
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to manage a subscription.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<LedgerEvent>,
}

impl SubscriptionHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<LedgerEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<LedgerEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<LedgerEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}
