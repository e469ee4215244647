//! Write-replace helper shared by the JSON/CSV writers.

use crate::domain::DomainError;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Atomic save using the write-replace pattern.
/// 1. Write to a temp file next to the target
/// 2. sync_all() to flush to disk
/// 3. Rename over the target
///
/// A crash mid-write leaves the previous file intact.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), DomainError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| DomainError::Persistence(format!("create {}: {}", parent.display(), e)))?;
    }

    let mut temp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut f = fs::File::create(&temp_path)
        .await
        .map_err(|e| DomainError::Persistence(format!("create temp file: {}", e)))?;
    f.write_all(contents)
        .await
        .map_err(|e| DomainError::Persistence(format!("write temp file: {}", e)))?;
    f.sync_all()
        .await
        .map_err(|e| DomainError::Persistence(format!("sync temp file: {}", e)))?;
    drop(f);

    fs::rename(&temp_path, path)
        .await
        .map_err(|e| DomainError::Persistence(format!("atomic rename failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_atomic_replaces_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");

        write_atomic(&path, b"first").await.unwrap();
        write_atomic(&path, b"second").await.unwrap();

        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "second");
        assert!(!dir.path().join("nested").join("out.json.tmp").exists());
    }
}
