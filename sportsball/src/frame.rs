//! A column-major table of games, one row per game.

use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::csv;
use crate::csv::{CsvReader, CsvWriter};
use crate::hash_lookup::HashLookup;

pub mod columns;
pub mod flatten;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATETIME_PARSE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("duplicate column {0}")]
    DuplicateColumn(String),

    #[error("column {name} has {actual} cells, expected {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("missing header")]
    MissingHeader,

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    DateTime(NaiveDateTime),
}
impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// The numeric value of the cell, parsing text if necessary.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            Cell::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// The cell rendered as a string, or `None` if the cell is empty.
    pub fn as_text(&self) -> Option<Cow<str>> {
        match self {
            Cell::Null => None,
            Cell::Text(text) if text.is_empty() => None,
            Cell::Text(text) => Some(Cow::Borrowed(text)),
            other => Some(Cow::Owned(other.to_string())),
        }
    }

    /// The datetime value of the cell, parsing text if necessary. A bare date is taken as midnight.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::DateTime(dt) => Some(*dt),
            Cell::Text(text) => parse_datetime(text.trim()),
            _ => None,
        }
    }

    fn parse(text: String) -> Self {
        if text.is_empty() {
            Cell::Null
        } else {
            Cell::Text(text)
        }
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    DATETIME_PARSE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Bool(value) => write!(f, "{value}"),
            Cell::Number(value) => write!(f, "{value}"),
            Cell::Text(text) => write!(f, "{text}"),
            Cell::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(value: NaiveDateTime) -> Self {
        Cell::DateTime(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Frame {
    names: HashLookup<String>,
    columns: Vec<Vec<Cell>>,
    rows: usize,
}
impl Frame {
    /// Creates a frame with `rows` rows and no columns.
    pub fn with_rows(rows: usize) -> Self {
        Self {
            names: HashLookup::default(),
            columns: vec![],
            rows,
        }
    }

    /// Builds a frame from a header and a sequence of equal-length records.
    pub fn from_records(
        header: Vec<String>,
        records: impl IntoIterator<Item = Vec<Cell>>,
    ) -> Result<Self, FrameError> {
        let mut columns: Vec<Vec<Cell>> = vec![vec![]; header.len()];
        let mut rows = 0;
        for (row, record) in records.into_iter().enumerate() {
            if record.len() != header.len() {
                return Err(FrameError::RaggedRow {
                    row,
                    expected: header.len(),
                    actual: record.len(),
                });
            }
            for (column, cell) in columns.iter_mut().zip(record) {
                column.push(cell);
            }
            rows += 1;
        }

        let mut frame = Self::with_rows(rows);
        for (name, column) in header.into_iter().zip(columns) {
            frame.push_column(name, column)?;
        }
        Ok(frame)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn names(&self) -> &[String] {
        self.names.items()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn column(&self, name: &str) -> Option<&[Cell]> {
        self.names
            .index_of(name)
            .map(|index| self.columns[index].as_slice())
    }

    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        self.column(name).and_then(|column| column.get(row))
    }

    pub fn push_column(&mut self, name: impl Into<String>, cells: Vec<Cell>) -> Result<(), FrameError> {
        let name = name.into();
        if self.names.contains(name.as_str()) {
            return Err(FrameError::DuplicateColumn(name));
        }
        if cells.len() != self.rows {
            return Err(FrameError::ColumnLength {
                name,
                expected: self.rows,
                actual: cells.len(),
            });
        }
        self.names.push(name);
        self.columns.push(cells);
        Ok(())
    }

    /// Reads a frame from a CSV file with a header line. Empty fields load as [Cell::Null]; all
    /// others load as [Cell::Text] and are interpreted on access.
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self, FrameError> {
        let mut reader = CsvReader::open(path)?;
        let header = reader.read().ok_or(FrameError::MissingHeader)??;
        let mut records = vec![];
        for record in reader {
            records.push(record?.into_iter().map(Cell::parse).collect());
        }
        Self::from_records(header, records)
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), FrameError> {
        let mut writer = CsvWriter::create(path)?;
        writer.append(self.names())?;
        for row in 0..self.rows {
            writer.append(self.columns.iter().map(|column| column[row].to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }
}
