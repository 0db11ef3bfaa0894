use std::fs;
use std::path::Path;

use crate::data_models::CollectionResult;
use crate::error::StorageError;

/// Write a collection as pretty-printed JSON, creating the parent directory
/// if it doesn't exist yet.
pub fn write_collection(path: &Path, result: &CollectionResult) -> Result<(), StorageError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let data = serde_json::to_vec_pretty(result).map_err(|source| StorageError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, data).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), total = result.total_tweets, "collection written");
    Ok(())
}

/// Read back a collection file.
pub fn read_collection(path: &Path) -> Result<CollectionResult, StorageError> {
    let raw = fs::read(path).map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&raw).map_err(|source| StorageError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
