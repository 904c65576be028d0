//! Income reporting over committed records.
//!
//! Records are grouped into day, month or year buckets for the income chart,
//! listed row by row for the report table, and exported as CSV.

mod aggregate;
mod export;

pub use aggregate::{
    group_by_period, Bucket, ChartSink, Granularity, IncomeReport, PeriodKey, ReportRow,
};
pub use export::{export_to_dir, to_csv, CSV_HEADER, EXPORT_FILE_NAME};
