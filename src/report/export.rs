//! CSV export of the ledger.

use crate::error::{LedgerError, Result};
use crate::types::CustomerRecord;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name the export is saved under.
pub const EXPORT_FILE_NAME: &str = "income_report.csv";

/// First line of every export.
pub const CSV_HEADER: &str = "Date,Customer Name,Amount\n";

/// Serialize `records` as CSV: date and name always quoted, amount bare.
///
/// Quotes inside a field are doubled. Fails with
/// [`LedgerError::NothingToExport`] when there are no records.
pub fn to_csv(records: &[CustomerRecord]) -> Result<Vec<u8>> {
    if records.is_empty() {
        return Err(LedgerError::NothingToExport);
    }

    let mut out = CSV_HEADER.as_bytes().to_vec();
    for record in records {
        // Quoted fields end in the delimiter; the amount closes the line.
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b','))
            .from_writer(out);
        writer.write_record([record.date.to_string(), record.name.clone()])?;
        out = writer
            .into_inner()
            .map_err(|e| LedgerError::Io(e.into_error()))?;

        writeln!(out, "{}", record.total)?;
    }

    Ok(out)
}

/// Write the CSV export into `dir` as [`EXPORT_FILE_NAME`].
pub fn export_to_dir(records: &[CustomerRecord], dir: impl AsRef<Path>) -> Result<PathBuf> {
    let bytes = to_csv(records)?;
    let path = dir.as_ref().join(EXPORT_FILE_NAME);
    fs::write(&path, &bytes)?;

    info!(path = %path.display(), records = records.len(), "exported income report");
    Ok(path)
}
