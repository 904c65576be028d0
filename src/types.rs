//! Core types for the ledger.

use crate::error::LedgerError;
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a customer record.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl RecordId {
    pub fn next(self) -> Self {
        RecordId(self.0 + 1)
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Formats accepted when parsing a visit date, canonical first.
const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

/// Calendar date of a visit.
///
/// Stored and displayed as `M/D/YYYY` without zero padding (`1/1/2024`).
/// Parsing also accepts zero-padded `MM/DD/YYYY` and ISO `YYYY-MM-DD`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VisitDate(NaiveDate);

impl VisitDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, LedgerError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(VisitDate)
            .ok_or_else(|| LedgerError::InvalidDate(format!("{year}-{month}-{day}")))
    }

    /// Today's date in the local time zone.
    pub fn today() -> Self {
        VisitDate(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// 1-based month.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for VisitDate {
    fn from(date: NaiveDate) -> Self {
        VisitDate(date)
    }
}

impl FromStr for VisitDate {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
            .map(VisitDate)
            .ok_or_else(|| LedgerError::InvalidDate(s.to_string()))
    }
}

impl fmt::Display for VisitDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.month(), self.day(), self.year())
    }
}

impl fmt::Debug for VisitDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VisitDate({self})")
    }
}

impl Serialize for VisitDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VisitDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One itemized service line on a visit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceCharge {
    pub name: String,
    pub charge: f64,
}

impl ServiceCharge {
    /// Build a line item, or `None` when the name is empty or the charge is not
    /// a finite positive amount.
    pub fn new(name: impl Into<String>, charge: f64) -> Option<Self> {
        let name = name.into();
        if name.is_empty() || !charge.is_finite() || charge <= 0.0 {
            return None;
        }
        Some(Self { name, charge })
    }
}

/// A committed customer visit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    /// Assigned by the ledger at commit; never reused.
    pub id: RecordId,

    /// Business the visit was recorded for.
    pub entity_name: String,

    pub date: VisitDate,

    /// Customer name.
    pub name: String,

    /// Customer phone number.
    pub number: String,

    pub address: String,

    pub services: Vec<ServiceCharge>,

    /// Sum of service charges before discount.
    #[serde(default)]
    pub grand_total: f64,

    #[serde(default)]
    pub discount: f64,

    /// `grand_total - discount` at commit time.
    pub total: f64,
}
