//! Building a visit before it is committed to the ledger.
//!
//! A visit starts from the customer's identity fields, collects itemized
//! service charges and a discount, and is committed once its totals have been
//! computed. Between the entry step and the details step the draft travels
//! through a [`VisitSession`].

mod draft;
mod session;

pub use draft::{parse_amount, Totals, VisitDraft, VisitorDetails};
pub use session::{VisitSession, SESSION_KEY};
