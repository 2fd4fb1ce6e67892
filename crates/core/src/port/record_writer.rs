// Record Writer Port (Interface)

use async_trait::async_trait;
use std::path::Path;

use crate::domain::JobRecord;
use crate::error::Result;

/// Durable storage of one extracted record per location.
///
/// Overwrite semantics and directory creation belong to the implementation.
#[async_trait]
pub trait RecordWriter: Send + Sync {
    async fn write_record(&self, path: &Path, record: &JobRecord) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::ScoutError;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// In-memory writer; records titled `fail_title` are rejected
    #[derive(Default)]
    pub struct MemoryRecordWriter {
        written: Mutex<Vec<(PathBuf, JobRecord)>>,
        fail_title: Option<String>,
    }

    impl MemoryRecordWriter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_on(title: impl Into<String>) -> Self {
            Self {
                written: Mutex::new(Vec::new()),
                fail_title: Some(title.into()),
            }
        }

        pub fn written(&self) -> Vec<(PathBuf, JobRecord)> {
            self.written.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RecordWriter for MemoryRecordWriter {
        async fn write_record(&self, path: &Path, record: &JobRecord) -> Result<()> {
            if self.fail_title.as_deref() == Some(record.title.as_str()) {
                return Err(ScoutError::Persistence(format!(
                    "mock write rejected for {}",
                    path.display()
                )));
            }
            self.written
                .lock()
                .unwrap()
                .push((path.to_path_buf(), record.clone()));
            Ok(())
        }
    }
}
