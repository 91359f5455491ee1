//! Binary object assets
//!
//! Application-defined values stored with bincode. Decoding is driven by the
//! caller's type, so a file can only ever produce a `T`.

use crate::error::{AssetError, AssetResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Decode a bincode file into `T`
///
/// # Errors
/// Returns error if the file cannot be opened or does not decode as `T`.
pub fn read_object<T: DeserializeOwned>(path: &Path) -> AssetResult<T> {
    let file = File::open(path).map_err(|e| AssetError::io_error(path, e))?;
    bincode::deserialize_from(BufReader::new(file)).map_err(|e| AssetError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Encode `value` to a bincode file (used by asset preparation tooling)
///
/// # Errors
/// Returns error if the file cannot be created or written.
pub fn write_object<T: Serialize>(path: &Path, value: &T) -> AssetResult<()> {
    let file = File::create(path).map_err(|e| AssetError::io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, value).map_err(|e| AssetError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    writer.flush().map_err(|e| AssetError::io_error(path, e))
}
