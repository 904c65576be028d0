//! Searching and listing records.

use crate::types::{CustomerRecord, RecordId, VisitDate};

/// Records matching `term`, paired with their position in `records`.
///
/// Name matches ignore case; phone number and date match as typed. An empty
/// term matches everything.
pub fn filter_records<'a>(
    records: &'a [CustomerRecord],
    term: &str,
) -> Vec<(usize, &'a CustomerRecord)> {
    if term.is_empty() {
        return records.iter().enumerate().collect();
    }

    let needle = term.to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| is_match(record, &needle))
        .collect()
}

fn is_match(record: &CustomerRecord, needle: &str) -> bool {
    record.name.to_lowercase().contains(needle)
        || record.number.contains(needle)
        || record.date.to_string().contains(needle)
}

/// One row of the customer table.
#[derive(Clone, Debug, PartialEq)]
pub struct ListingRow {
    /// 1-based number shown in the table.
    pub position: usize,
    /// Index into the ledger; pass this to delete.
    pub index: usize,
    pub id: RecordId,
    pub name: String,
    pub number: String,
    pub address: String,
    pub date: VisitDate,
}

/// Build table rows for the records matching `term`.
pub fn listing(records: &[CustomerRecord], term: &str) -> Vec<ListingRow> {
    filter_records(records, term)
        .into_iter()
        .enumerate()
        .map(|(shown, (index, record))| ListingRow {
            position: shown + 1,
            index,
            id: record.id,
            name: record.name.clone(),
            number: record.number.clone(),
            address: record.address.clone(),
            date: record.date,
        })
        .collect()
}
