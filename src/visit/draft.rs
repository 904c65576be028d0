//! In-progress visit.

use crate::error::{LedgerError, Result};
use crate::types::{CustomerRecord, RecordId, ServiceCharge, VisitDate};
use serde::{Deserialize, Serialize};

/// Parse a form amount the lenient way: surrounding whitespace is ignored and
/// anything that is not a finite number counts as zero.
pub fn parse_amount(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Identity fields captured on the entry step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorDetails {
    pub entity_name: String,
    pub date: VisitDate,
    pub name: String,
    pub number: String,
    pub address: String,
}

impl VisitorDetails {
    /// Details stamped with today's local date.
    pub fn today(
        entity_name: impl Into<String>,
        name: impl Into<String>,
        number: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            date: VisitDate::today(),
            name: name.into(),
            number: number.into(),
            address: address.into(),
        }
    }
}

/// Computed totals of a draft.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of all valid service charges.
    pub grand_total: f64,
    pub discount: f64,
    /// `grand_total - discount`; may be negative.
    pub final_total: f64,
}

impl Totals {
    pub fn display_grand_total(&self) -> String {
        format!("{:.2}", self.grand_total)
    }

    pub fn display_final_total(&self) -> String {
        format!("{:.2}", self.final_total)
    }
}

/// A visit under construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitDraft {
    details: VisitorDetails,
    services: Vec<ServiceCharge>,
    discount: f64,
    /// Cleared whenever services or discount change. Never serialized, so a
    /// resumed draft must be totalled again.
    #[serde(skip)]
    totals: Option<Totals>,
}

impl VisitDraft {
    pub fn begin(details: VisitorDetails) -> Self {
        Self {
            details,
            services: Vec::new(),
            discount: 0.0,
            totals: None,
        }
    }

    pub fn details(&self) -> &VisitorDetails {
        &self.details
    }

    /// Valid service lines in entry order.
    pub fn services(&self) -> &[ServiceCharge] {
        &self.services
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    /// Totals from the last [`compute_total`](Self::compute_total), if still current.
    pub fn totals(&self) -> Option<Totals> {
        self.totals
    }

    /// Add a service line. Rows with an empty name or a non-positive charge are
    /// dropped and `false` is returned.
    pub fn add_service(&mut self, name: impl Into<String>, charge: f64) -> bool {
        match ServiceCharge::new(name, charge) {
            Some(service) => {
                self.services.push(service);
                self.totals = None;
                true
            }
            None => false,
        }
    }

    /// Add a service line from raw form text.
    pub fn add_service_input(&mut self, name: impl Into<String>, charge: &str) -> bool {
        self.add_service(name, parse_amount(charge))
    }

    /// Replace the whole row set, keeping only the valid rows. Returns how many
    /// rows were kept.
    pub fn set_services<I, S>(&mut self, rows: I) -> usize
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        self.services = rows
            .into_iter()
            .filter_map(|(name, charge)| ServiceCharge::new(name, charge))
            .collect();
        self.totals = None;
        self.services.len()
    }

    /// Set the discount. Non-finite values count as no discount.
    pub fn set_discount(&mut self, discount: f64) {
        self.discount = if discount.is_finite() { discount } else { 0.0 };
        self.totals = None;
    }

    pub fn set_discount_input(&mut self, discount: &str) {
        self.set_discount(parse_amount(discount));
    }

    /// Recompute totals from the current row set and discount.
    pub fn compute_total(&mut self) -> Totals {
        let grand_total: f64 = self.services.iter().map(|s| s.charge).sum();
        let totals = Totals {
            grand_total,
            discount: self.discount,
            final_total: grand_total - self.discount,
        };
        self.totals = Some(totals);
        totals
    }

    /// Turn the draft into a record carrying `id`.
    ///
    /// Totals must be computed and finite; a sum that overflowed `f64` cannot
    /// be persisted as JSON.
    pub(crate) fn into_record(self, id: RecordId) -> Result<CustomerRecord> {
        let totals = self.totals.ok_or(LedgerError::TotalNotComputed)?;
        if !totals.grand_total.is_finite() || !totals.final_total.is_finite() {
            return Err(LedgerError::InvalidAmount(format!(
                "grand total {} less discount {} is out of range",
                totals.grand_total, totals.discount
            )));
        }
        let VisitorDetails {
            entity_name,
            date,
            name,
            number,
            address,
        } = self.details;

        Ok(CustomerRecord {
            id,
            entity_name,
            date,
            name,
            number,
            address,
            services: self.services,
            grand_total: totals.grand_total,
            discount: totals.discount,
            total: totals.final_total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> VisitorDetails {
        VisitorDetails {
            entity_name: "Glow Studio".to_string(),
            date: "3/14/2024".parse().unwrap(),
            name: "Asha".to_string(),
            number: "9876543210".to_string(),
            address: "12 Lake Road".to_string(),
        }
    }

    #[test]
    fn test_invalid_rows_are_dropped() {
        let mut draft = VisitDraft::begin(details());
        assert!(draft.add_service("Haircut", 250.0));
        assert!(!draft.add_service("", 100.0));
        assert!(!draft.add_service("Wash", 0.0));
        assert!(!draft.add_service("Wash", -5.0));
        assert!(!draft.add_service_input("Wash", "abc"));
        assert!(draft.add_service_input("Facial", " 400.5 "));

        assert_eq!(draft.services().len(), 2);
        assert_eq!(draft.compute_total().grand_total, 650.5);
    }

    #[test]
    fn test_discount_can_exceed_grand_total() {
        let mut draft = VisitDraft::begin(details());
        draft.add_service("Haircut", 100.0);
        draft.set_discount(150.0);

        let totals = draft.compute_total();
        assert_eq!(totals.final_total, -50.0);
        assert_eq!(totals.display_final_total(), "-50.00");
        assert_eq!(totals.display_grand_total(), "100.00");
    }

    #[test]
    fn test_missing_discount_is_zero() {
        let mut draft = VisitDraft::begin(details());
        draft.add_service("Haircut", 100.0);
        draft.set_discount_input("");

        assert_eq!(draft.compute_total().final_total, 100.0);
    }

    #[test]
    fn test_changes_invalidate_totals() {
        let mut draft = VisitDraft::begin(details());
        draft.add_service("Haircut", 100.0);
        draft.compute_total();
        assert!(draft.totals().is_some());

        draft.set_discount(10.0);
        assert!(draft.totals().is_none());

        draft.compute_total();
        draft.set_services(vec![("Shave", 40.0), ("", 10.0)]);
        assert!(draft.totals().is_none());
        assert_eq!(draft.compute_total().final_total, 30.0);
    }

    #[test]
    fn test_into_record_requires_totals() {
        let mut draft = VisitDraft::begin(details());
        draft.add_service("Haircut", 100.0);

        let result = draft.clone().into_record(RecordId(1));
        assert!(matches!(result, Err(LedgerError::TotalNotComputed)));

        draft.set_discount(20.0);
        draft.compute_total();
        let record = draft.into_record(RecordId(7)).unwrap();
        assert_eq!(record.id, RecordId(7));
        assert_eq!(record.grand_total, 100.0);
        assert_eq!(record.discount, 20.0);
        assert_eq!(record.total, 80.0);
        assert_eq!(record.name, "Asha");
    }

    #[test]
    fn test_overflowing_totals_are_rejected() {
        let mut draft = VisitDraft::begin(details());
        draft.add_service("Gold facial", 1e308);
        draft.add_service("Gold facial", 1e308);
        assert!(draft.compute_total().grand_total.is_infinite());

        let result = draft.into_record(RecordId(1));
        assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));

        let mut draft = VisitDraft::begin(details());
        draft.add_service("Gold facial", 1e308);
        draft.set_discount(-1e308);
        assert!(draft.compute_total().final_total.is_infinite());

        let result = draft.into_record(RecordId(1));
        assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));
    }
}
