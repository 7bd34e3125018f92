use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::models::SkillRecord;
use crate::store::{RecordStore, StoreError};

/// The whole record list in one pretty-printed JSON file.
///
/// Every write loads the file, edits the list in memory and rewrites the file
/// through a temp file + rename. `write_lock` serializes writers inside this
/// process; separate processes are last-writer-wins.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file has been created. An existing `[]` file is an empty store.
    pub async fn exists(&self) -> Result<bool, StoreError> {
        tokio::fs::try_exists(&self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.display().to_string(),
                source,
            })
    }

    async fn load(&self) -> Result<Vec<SkillRecord>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Store file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.display().to_string(),
                    source,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Malformed {
            path: self.path.display().to_string(),
            source,
        })
    }

    async fn save(&self, records: Vec<SkillRecord>) -> Result<(), StoreError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &records))
            .await
            .map_err(|e| StoreError::Task(format!("store write task failed: {e}")))?
    }
}

/// Writes `records` to a sibling temp file, then renames it over `path`.
fn write_atomically(path: &Path, records: &[SkillRecord]) -> Result<(), StoreError> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.display().to_string(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(io_err)?;
    serde_json::to_writer_pretty(&mut tmp, records).map_err(|source| StoreError::Malformed {
        path: path.display().to_string(),
        source,
    })?;
    tmp.write_all(b"\n").map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

#[async_trait]
impl RecordStore for JsonFileStore {
    fn backend(&self) -> &'static str {
        "JSON"
    }

    async fn list(&self) -> Result<Vec<SkillRecord>, StoreError> {
        let records = self.load().await?;
        debug!(count = records.len(), "Loaded records from JSON store");
        Ok(records)
    }

    async fn replace(&self, id: i64, mut record: SkillRecord) -> Result<SkillRecord, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        let slot = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        record.id = id;
        *slot = record.clone();

        self.save(records).await?;
        info!(id, "Record replaced");
        Ok(record)
    }

    async fn remove(&self, id: i64) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        let idx = records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        records.remove(idx);

        self.save(records).await?;
        info!(id, "Record removed");
        Ok(())
    }

    async fn overwrite(&self, records: Vec<SkillRecord>) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let count = records.len();
        self.save(records).await?;
        info!(count, path = %self.path.display(), "Store overwritten");
        Ok(())
    }
}
