//! TSV report output.
//!
//! Both reports are tab-separated files with a header row and every field
//! double-quoted. Rows are buffered by the CSV writer and flushed once after
//! the last record, so a failed run leaves the report for the failing stage
//! absent or truncated while completed reports stay intact. An existing file
//! of the same name is overwritten.

use csv::{QuoteStyle, WriterBuilder};
use std::path::Path;
use tracing::debug;

/// File name of the group membership report
pub const PERMISSIONS_REPORT_FILE: &str = "permissions.tsv";
/// File name of the saved-query inventory report
pub const QUERIES_REPORT_FILE: &str = "queries.tsv";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Trait for producing TSV records from report rows
pub trait TsvRecordProducer {
    /// Returns the header row for the report
    fn tsv_header() -> Vec<String>;

    /// Converts one row into its TSV record
    fn as_tsv_record(&self) -> Vec<String>;
}

/// Write one report to the given path, header first, one record per row
pub fn write_report<R, P>(path: P, records: &[R]) -> Result<(), ReportError>
where
    R: TsvRecordProducer,
    P: AsRef<Path>,
{
    debug!(
        "Writing {} rows to {}...",
        records.len(),
        path.as_ref().display()
    );

    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Always)
        .from_path(path)?;

    writer.write_record(R::tsv_header())?;
    for record in records {
        writer.write_record(record.as_tsv_record())?;
    }
    writer.flush()?;

    Ok(())
}
