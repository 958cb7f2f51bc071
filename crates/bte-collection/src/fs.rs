//! JSON file helpers

use crate::error::{CollectionError, CollectionResult};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Read and parse a JSON file
///
/// # Errors
/// Returns [`CollectionError::Io`] or [`CollectionError::Json`].
pub fn read_json(path: &Path) -> CollectionResult<Value> {
    let file = File::open(path).map_err(|e| CollectionError::io_error(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| CollectionError::json_error(path, e))
}

/// Write a JSON value indented by two spaces with sorted keys
///
/// Parent directories are created as needed.
///
/// # Errors
/// Returns [`CollectionError::Io`] or [`CollectionError::Json`].
pub fn write_json(path: &Path, value: &Value) -> CollectionResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CollectionError::io_error(parent, e))?;
    }
    let file = File::create(path).map_err(|e| CollectionError::io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| CollectionError::json_error(path, e))?;
    writer.flush().map_err(|e| CollectionError::io_error(path, e))
}
