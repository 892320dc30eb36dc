#![cfg(test)]
use std::path::PathBuf;

/// Unique throwaway JSON path under the system temp dir, so parallel tests
/// never share a backing file.
pub fn temp_json_path(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{prefix}_{}.json", uuid::Uuid::new_v4()))
}
