//! Utilities for working with CSV files.
//!
//! Fields containing a separator, a quote or a line break are quoted on write. Quoted fields may
//! span lines on read.

use std::fs::File;
use std::io;
use std::path::Path;

use ::csv::{ReaderBuilder, StringRecordsIntoIter, Writer, WriterBuilder};

pub use ::csv::Error;

pub struct CsvWriter {
    writer: Writer<File>,
}
impl CsvWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, Error> {
        let writer = WriterBuilder::new().from_path(path)?;
        Ok(Self { writer })
    }

    pub fn append<R>(&mut self, record: R) -> Result<(), Error>
    where
        R: IntoIterator,
        R::Item: AsRef<[u8]>,
    {
        self.writer.write_record(record)
    }

    pub fn flush(&mut self) -> Result<(), io::Error> {
        self.writer.flush()
    }
}

/// Reads records without interpreting a header. Records may differ in length.
pub struct CsvReader {
    records: StringRecordsIntoIter<File>,
}
impl CsvReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;
        Ok(Self {
            records: reader.into_records(),
        })
    }

    pub fn read(&mut self) -> Option<Result<Vec<String>, Error>> {
        self.records
            .next()
            .map(|record| record.map(|record| record.iter().map(str::to_string).collect()))
    }
}

impl Iterator for CsvReader {
    type Item = Result<Vec<String>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read()
    }
}
