//! Streaming CSV reader with iterator interface
//!
//! Provides a streaming iterator over operation records from a CSV
//! file. Delegates CSV format concerns to the csv_format module.
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, unreadable header) are returned from
//!   `new()`
//! - Individual record parsing errors are yielded as Err variants with
//!   the physical line the record starts on, taken from the csv
//!   reader's own position tracking so quoted multi-line fields cannot
//!   skew the numbering
//!
//! # Memory Efficiency
//!
//! Records are read one at a time; memory is O(1) per record, not
//! O(file size).

use crate::io::csv_format::{convert_csv_record, CsvRecord, OperationRecord};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader over operation records
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (most columns are optional)
    /// - Use an 8KB buffer
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| format!("Failed to read CSV header: {}", e))?
            .clone();

        Ok(Self { reader, headers })
    }
}

impl Iterator for SyncReader {
    type Item = Result<OperationRecord, String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(false) => None,
            Ok(true) => {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                let converted = record
                    .deserialize::<CsvRecord>(Some(&self.headers))
                    .map_err(|e| format!("Line {}: CSV parse error: {}", line, e))
                    .and_then(|csv_record| {
                        convert_csv_record(csv_record)
                            .map_err(|e| format!("Line {}: {}", line, e))
                    });
                Some(converted)
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                Some(Err(format!("Line {}: CSV parse error: {}", line, e)))
            }
        }
    }
}
