//! JSON file helpers.

use std::ffi::OsStr;
use std::fs;
use std::fs::File;
use std::io::{BufReader, BufWriter, Error};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{from_reader, to_writer_pretty};

/// Reads a JSON-encoded type from a given file `path`.
pub fn read_json<D: DeserializeOwned>(path: impl AsRef<Path>) -> Result<D, Error> {
    let file = File::open(path)?;
    Ok(from_reader(BufReader::new(file))?)
}

/// JSON-encodes `value` in pretty-printed form and writes it to `path`.
pub fn write_json(path: impl AsRef<Path>, value: &impl Serialize) -> Result<(), Error> {
    let file = File::create(path)?;
    Ok(to_writer_pretty(BufWriter::new(file), value)?)
}

pub trait ReadJsonFile<D> {
    fn read_json_file(path: impl AsRef<Path>) -> Result<D, Error>;
}

impl<D: DeserializeOwned> ReadJsonFile<D> for D {
    fn read_json_file(path: impl AsRef<Path>) -> Result<D, Error> {
        read_json(path)
    }
}

pub trait WriteJsonFile<S: Serialize> {
    fn write_json_file(&self, path: impl AsRef<Path>) -> Result<(), Error>;
}

impl<S: Serialize> WriteJsonFile<S> for S {
    fn write_json_file(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        write_json(path, self)
    }
}

/// Lists the `.json` files under `path`, descending into directories. A plain file is returned
/// as-is regardless of its extension. The listing is sorted so that callers see a stable order.
pub fn json_files(path: impl Into<PathBuf>) -> Result<Vec<PathBuf>, Error> {
    let path = path.into();
    let mut files = vec![];
    if fs::metadata(&path)?.is_dir() {
        collect_json(path, &mut files)?;
        files.sort();
    } else {
        files.push(path);
    }
    Ok(files)
}

fn collect_json(path: PathBuf, files: &mut Vec<PathBuf>) -> Result<(), Error> {
    if fs::metadata(&path)?.is_dir() {
        for entry in fs::read_dir(path)? {
            collect_json(entry?.path(), files)?;
        }
    } else if path.extension() == Some(OsStr::new("json")) {
        files.push(path);
    }
    Ok(())
}
