//! Persistence of the run arguments.
//!
//! Arguments are any value that serializes to a mapping. They are written
//! once as pretty-printed JSON and never mutated afterwards.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use super::finite::check_finite;
use crate::errors::{ExperimentError, Result};

/// Record of an args blob written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedArgs {
    /// Where the blob was written.
    pub path: PathBuf,
    /// Hex SHA-256 of the written bytes.
    pub sha256: String,
    /// Size of the blob in bytes.
    pub len: usize,
}

/// Encodes `args` into a blob.
///
/// Fails unless it serializes to a mapping whose floats are all finite.
pub fn encode_args<T>(args: &T) -> Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    check_finite(args).map_err(|err| ExperimentError::Serialization(err.to_string()))?;
    let value = serde_json::to_value(args)?;
    if !value.is_object() {
        return Err(ExperimentError::Serialization(format!(
            "arguments must serialize to a mapping, got {}",
            json_kind(&value)
        )));
    }
    Ok(serde_json::to_vec_pretty(&value)?)
}

/// Writes `args` to `path`, replacing any previous blob.
pub fn persist_args<T>(path: &Path, args: &T) -> Result<PersistedArgs>
where
    T: Serialize + ?Sized,
{
    let bytes = encode_args(args)?;
    fs::write(path, &bytes)?;

    Ok(PersistedArgs {
        path: path.to_path_buf(),
        sha256: hex::encode(Sha256::digest(&bytes)),
        len: bytes.len(),
    })
}

/// Reads an args blob back.
pub fn load_args<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a sequence",
        serde_json::Value::Object(_) => "a mapping",
    }
}
