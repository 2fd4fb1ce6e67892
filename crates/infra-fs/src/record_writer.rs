// Filesystem RecordWriter
// reason: tokio::fs so persistence never blocks the runtime thread

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use jobscout_core::domain::JobRecord;
use jobscout_core::port::RecordWriter;
use jobscout_core::{Result, ScoutError};

/// Writes each record as pretty-printed JSON.
///
/// Missing parent directories are created. An existing file at the target
/// path is replaced; the write goes through a sibling temp file and a rename
/// so a crash never leaves a truncated record behind.
#[derive(Debug, Default, Clone)]
pub struct FsRecordWriter;

impl FsRecordWriter {
    pub fn new() -> Self {
        Self
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn persistence_error(path: &Path, action: &str, e: std::io::Error) -> ScoutError {
    ScoutError::Persistence(format!("failed to {} {}: {}", action, path.display(), e))
}

#[async_trait]
impl RecordWriter for FsRecordWriter {
    async fn write_record(&self, path: &Path, record: &JobRecord) -> Result<()> {
        if path.file_name().is_none() {
            return Err(ScoutError::Persistence(format!(
                "not a file path: {}",
                path.display()
            )));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| persistence_error(parent, "create directory", e))?;
        }

        let mut bytes = serde_json::to_vec_pretty(record)?;
        bytes.push(b'\n');

        let tmp = temp_path(path);
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| persistence_error(&tmp, "write", e))?;
        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(persistence_error(path, "replace", e));
        }

        debug!(path = %path.display(), bytes = bytes.len(), "Wrote record");
        Ok(())
    }
}
