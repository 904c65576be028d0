//! Grouping records by time period.

use crate::error::{LedgerError, Result};
use crate::types::{CustomerRecord, VisitDate};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Time resolution of an income report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Granularity {
    #[default]
    Daily,
    Monthly,
    Yearly,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [
        Granularity::Daily,
        Granularity::Monthly,
        Granularity::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Monthly => "monthly",
            Granularity::Yearly => "yearly",
        }
    }

    /// Bucket a date falls into at this resolution.
    pub fn key_for(&self, date: VisitDate) -> PeriodKey {
        match self {
            Granularity::Daily => PeriodKey::Day(date),
            Granularity::Monthly => PeriodKey::Month {
                year: date.year(),
                month: date.month(),
            },
            Granularity::Yearly => PeriodKey::Year(date.year()),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Granularity::Daily),
            "monthly" => Ok(Granularity::Monthly),
            "yearly" => Ok(Granularity::Yearly),
            _ => Err(LedgerError::InvalidGranularity(s.to_string())),
        }
    }
}

/// Identity of a report bucket.
///
/// Orders chronologically. A single report only ever holds one variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    Day(VisitDate),
    /// `month` is 1-based.
    Month { year: i32, month: u32 },
    Year(i32),
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::Day(date) => write!(f, "{date}"),
            PeriodKey::Month { year, month } => write!(f, "{year}-{month}"),
            PeriodKey::Year(year) => write!(f, "{year}"),
        }
    }
}

/// Income summed over one period.
#[derive(Clone, Debug, PartialEq)]
pub struct Bucket {
    pub key: PeriodKey,
    pub label: String,
    pub total: f64,
}

/// One line of the report table.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportRow {
    pub date: VisitDate,
    pub name: String,
    pub total: f64,
}

impl ReportRow {
    /// Amount with a currency symbol and two decimals, e.g. `₹150.00`.
    pub fn formatted_amount(&self, currency_symbol: &str) -> String {
        format!("{currency_symbol}{:.2}", self.total)
    }
}

/// Receives chart series. Rendering is up to the implementor.
pub trait ChartSink {
    fn update(&mut self, labels: &[String], data: &[f64]);
}

/// Grouped income plus the flat table behind it.
#[derive(Clone, Debug, PartialEq)]
pub struct IncomeReport {
    granularity: Granularity,
    /// Chronological.
    buckets: Vec<Bucket>,
    /// Record order.
    rows: Vec<ReportRow>,
}

impl IncomeReport {
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn labels(&self) -> Vec<String> {
        self.buckets.iter().map(|b| b.label.clone()).collect()
    }

    pub fn sums(&self) -> Vec<f64> {
        self.buckets.iter().map(|b| b.total).collect()
    }

    /// Sum of every bucket.
    pub fn total(&self) -> f64 {
        self.buckets.iter().map(|b| b.total).sum()
    }

    /// Feed the chart its labels and bucket sums.
    pub fn render(&self, chart: &mut dyn ChartSink) {
        chart.update(&self.labels(), &self.sums());
    }
}

/// Group `records` into buckets of `granularity`.
///
/// Fails with [`LedgerError::NoData`] when there are no records.
pub fn group_by_period(
    records: &[CustomerRecord],
    granularity: Granularity,
) -> Result<IncomeReport> {
    if records.is_empty() {
        return Err(LedgerError::NoData);
    }

    let mut sums: BTreeMap<PeriodKey, f64> = BTreeMap::new();
    let mut rows = Vec::with_capacity(records.len());

    for record in records {
        *sums.entry(granularity.key_for(record.date)).or_insert(0.0) += record.total;
        rows.push(ReportRow {
            date: record.date,
            name: record.name.clone(),
            total: record.total,
        });
    }

    let buckets: Vec<Bucket> = sums
        .into_iter()
        .map(|(key, total)| Bucket {
            key,
            label: key.to_string(),
            total,
        })
        .collect();

    debug!(
        %granularity,
        records = records.len(),
        buckets = buckets.len(),
        "grouped income report"
    );

    Ok(IncomeReport {
        granularity,
        buckets,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordId;

    fn record(id: u64, date: &str, name: &str, total: f64) -> CustomerRecord {
        CustomerRecord {
            id: RecordId(id),
            entity_name: "Glow".to_string(),
            date: date.parse().unwrap(),
            name: name.to_string(),
            number: String::new(),
            address: String::new(),
            services: vec![],
            grand_total: total,
            discount: 0.0,
            total,
        }
    }

    #[derive(Default)]
    struct RecordingChart {
        labels: Vec<String>,
        data: Vec<f64>,
        updates: usize,
    }

    impl ChartSink for RecordingChart {
        fn update(&mut self, labels: &[String], data: &[f64]) {
            self.labels = labels.to_vec();
            self.data = data.to_vec();
            self.updates += 1;
        }
    }

    #[test]
    fn test_empty_is_no_data() {
        for granularity in Granularity::ALL {
            let result = group_by_period(&[], granularity);
            assert!(matches!(result, Err(LedgerError::NoData)));
        }
    }

    #[test]
    fn test_daily_same_date_single_bucket() {
        let records = vec![record(1, "1/1/2024", "A", 100.0), record(2, "1/1/2024", "B", 50.0)];
        let report = group_by_period(&records, Granularity::Daily).unwrap();

        assert_eq!(report.labels(), vec!["1/1/2024"]);
        assert_eq!(report.sums(), vec![150.0]);
        assert_eq!(report.rows().len(), 2);
    }

    #[test]
    fn test_monthly_orders_chronologically() {
        let records = vec![
            record(1, "10/5/2024", "A", 10.0),
            record(2, "9/5/2024", "B", 20.0),
            record(3, "1/5/2025", "C", 30.0),
            record(4, "10/20/2024", "D", 5.0),
        ];
        let report = group_by_period(&records, Granularity::Monthly).unwrap();

        assert_eq!(report.labels(), vec!["2024-9", "2024-10", "2025-1"]);
        assert_eq!(report.sums(), vec![20.0, 15.0, 30.0]);
    }

    #[test]
    fn test_daily_orders_by_date_not_text() {
        let records = vec![
            record(1, "12/1/2024", "A", 1.0),
            record(2, "2/1/2024", "B", 2.0),
            record(3, "2/10/2024", "C", 3.0),
        ];
        let report = group_by_period(&records, Granularity::Daily).unwrap();

        assert_eq!(report.labels(), vec!["2/1/2024", "2/10/2024", "12/1/2024"]);
    }

    #[test]
    fn test_yearly_rows_keep_record_order() {
        let records = vec![
            record(1, "3/3/2025", "Late", 40.0),
            record(2, "3/3/2023", "Early", 60.0),
            record(3, "7/7/2025", "Later", 10.0),
        ];
        let report = group_by_period(&records, Granularity::Yearly).unwrap();

        assert_eq!(report.labels(), vec!["2023", "2025"]);
        assert_eq!(report.sums(), vec![60.0, 50.0]);
        assert_eq!(report.total(), 110.0);

        let names: Vec<&str> = report.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Late", "Early", "Later"]);
        assert_eq!(report.rows()[0].formatted_amount("₹"), "₹40.00");
    }

    #[test]
    fn test_render_feeds_chart() {
        let records = vec![record(1, "1/1/2024", "A", 100.0), record(2, "2/1/2024", "B", 50.0)];
        let report = group_by_period(&records, Granularity::Monthly).unwrap();

        let mut chart = RecordingChart::default();
        report.render(&mut chart);

        assert_eq!(chart.updates, 1);
        assert_eq!(chart.labels, vec!["2024-1", "2024-2"]);
        assert_eq!(chart.data, vec![100.0, 50.0]);
    }

    #[test]
    fn test_granularity_parse() {
        assert_eq!("Monthly".parse::<Granularity>().unwrap(), Granularity::Monthly);
        assert_eq!(Granularity::Yearly.to_string(), "yearly");
        assert!(matches!(
            "weekly".parse::<Granularity>(),
            Err(LedgerError::InvalidGranularity(_))
        ));
    }
}
