//! Record stores: where skill records live between requests.
//!
//! `RecordStore` is the seam: a JSON file for local deployments and a warehouse
//! table for the hosted one. Handlers never see a concrete store; they go through
//! `Records`, which also owns the local-copy fallback for read-only backends.

pub mod json_file;
pub mod seed;
pub mod warehouse;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::models::SkillRecord;

pub use json_file::JsonFileStore;
pub use warehouse::WarehouseStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record {0} not found")]
    NotFound(i64),

    /// The backend is read-only for this operation. Not a failure: callers fall back
    /// to a local copy.
    #[error("{backend} does not support {operation}")]
    Unsupported {
        backend: &'static str,
        operation: &'static str,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed store contents in {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Warehouse query failed: {0}")]
    Warehouse(#[from] sqlx::Error),

    #[error("Store task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend name for logs and the root banner.
    fn backend(&self) -> &'static str;

    async fn list(&self) -> Result<Vec<SkillRecord>, StoreError>;

    /// Replaces the record with `id` wholesale. The stored record keeps `id`.
    async fn replace(&self, id: i64, record: SkillRecord) -> Result<SkillRecord, StoreError>;

    async fn remove(&self, id: i64) -> Result<(), StoreError>;

    /// Replaces the entire contents of the store.
    async fn overwrite(&self, records: Vec<SkillRecord>) -> Result<(), StoreError>;
}

/// Store facade carried in `AppState`.
///
/// In JSON mode `local` is `None` and every call goes straight to `primary`.
/// In warehouse mode writes the warehouse refuses land in `local`, seeded from the
/// warehouse listing the first time. Once the copy's file exists it is the source
/// of truth for reads, even when deletes have emptied it.
#[derive(Clone)]
pub struct Records {
    primary: Arc<dyn RecordStore>,
    local: Option<Arc<JsonFileStore>>,
    /// Held across seeding and the redirected write so concurrent first writes
    /// cannot seed over each other.
    local_lock: Arc<Mutex<()>>,
}

impl Records {
    pub fn new(primary: Arc<dyn RecordStore>, local: Option<Arc<JsonFileStore>>) -> Self {
        Self {
            primary,
            local,
            local_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn backend(&self) -> &'static str {
        self.primary.backend()
    }

    pub async fn list(&self) -> Result<Vec<SkillRecord>, StoreError> {
        if let Some(local) = &self.local {
            if local.exists().await? {
                return local.list().await;
            }
        }
        self.primary.list().await
    }

    pub async fn replace(&self, id: i64, record: SkillRecord) -> Result<SkillRecord, StoreError> {
        match self.primary.replace(id, record.clone()).await {
            Err(StoreError::Unsupported { .. }) => {
                let _guard = self.local_lock.lock().await;
                let local = self.materialize_local().await?;
                local.replace(id, record).await
            }
            other => other,
        }
    }

    pub async fn remove(&self, id: i64) -> Result<(), StoreError> {
        match self.primary.remove(id).await {
            Err(StoreError::Unsupported { .. }) => {
                let _guard = self.local_lock.lock().await;
                let local = self.materialize_local().await?;
                local.remove(id).await
            }
            other => other,
        }
    }

    pub async fn overwrite(&self, records: Vec<SkillRecord>) -> Result<(), StoreError> {
        match self.primary.overwrite(records.clone()).await {
            Err(StoreError::Unsupported { .. }) => match &self.local {
                Some(local) => {
                    let _guard = self.local_lock.lock().await;
                    local.overwrite(records).await
                }
                None => Err(StoreError::Unsupported {
                    backend: self.primary.backend(),
                    operation: "overwrite",
                }),
            },
            other => other,
        }
    }

    /// Returns the local copy, seeding it from the primary listing if its file
    /// does not exist yet. Callers hold `local_lock`.
    async fn materialize_local(&self) -> Result<&JsonFileStore, StoreError> {
        let Some(local) = self.local.as_deref() else {
            warn!(
                backend = self.primary.backend(),
                "Write refused by backend and no local copy is configured"
            );
            return Err(StoreError::Unsupported {
                backend: self.primary.backend(),
                operation: "writes",
            });
        };

        if !local.exists().await? {
            let snapshot = self.primary.list().await?;
            info!(
                records = snapshot.len(),
                path = %local.path().display(),
                "Seeding local copy from {}", self.primary.backend()
            );
            local.overwrite(snapshot).await?;
        }
        Ok(local)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// In-memory read-only store standing in for the warehouse.
    pub struct ReadOnlyStore {
        pub records: std::sync::Mutex<Vec<SkillRecord>>,
    }

    impl ReadOnlyStore {
        pub fn new(records: Vec<SkillRecord>) -> Self {
            Self {
                records: std::sync::Mutex::new(records),
            }
        }
    }

    #[async_trait]
    impl RecordStore for ReadOnlyStore {
        fn backend(&self) -> &'static str {
            "read-only"
        }

        async fn list(&self) -> Result<Vec<SkillRecord>, StoreError> {
            Ok(self.records.lock().unwrap().clone())
        }

        async fn replace(&self, _id: i64, _record: SkillRecord) -> Result<SkillRecord, StoreError> {
            Err(StoreError::Unsupported {
                backend: "read-only",
                operation: "replace",
            })
        }

        async fn remove(&self, _id: i64) -> Result<(), StoreError> {
            Err(StoreError::Unsupported {
                backend: "read-only",
                operation: "remove",
            })
        }

        async fn overwrite(&self, _records: Vec<SkillRecord>) -> Result<(), StoreError> {
            Err(StoreError::Unsupported {
                backend: "read-only",
                operation: "overwrite",
            })
        }
    }

    pub fn record(id: i64, band: &str, competency: &str, level: u8) -> SkillRecord {
        SkillRecord {
            id,
            group: "Raymond Group".to_string(),
            sbu: "Textiles".to_string(),
            bu: "Suiting".to_string(),
            function: "Engineering".to_string(),
            ujr_in_ujr_master: format!("ENG_{id:03}"),
            job_role_name: "Process Engineer".to_string(),
            l1_ujr: "Operational".to_string(),
            competency_type: competency.to_string(),
            skill_name: format!("Skill {id}"),
            skill_definition: "Applies the skill on the shop floor.".to_string(),
            proficiency_level: level,
            band: band.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{record, ReadOnlyStore};
    use super::*;

    fn warehouse_with_copy(dir: &tempfile::TempDir) -> (Records, Arc<JsonFileStore>) {
        let primary = Arc::new(ReadOnlyStore::new(vec![
            record(1, "Band 1A", "Technical", 3),
            record(2, "Band 2A", "Behavioral", 4),
        ]));
        let local = Arc::new(JsonFileStore::new(dir.path().join("copy.json")));
        (Records::new(primary, Some(local.clone())), local)
    }

    #[tokio::test]
    async fn test_list_reads_primary_until_copy_exists() {
        let dir = tempfile::tempdir().unwrap();
        let (records, local) = warehouse_with_copy(&dir);

        assert_eq!(records.list().await.unwrap().len(), 2);
        assert!(local.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refused_write_falls_back_to_seeded_copy() {
        let dir = tempfile::tempdir().unwrap();
        let (records, local) = warehouse_with_copy(&dir);

        let mut updated = record(1, "Band 1A", "Technical", 5);
        updated.skill_name = "Root Cause Analysis".to_string();
        let saved = records.replace(1, updated).await.unwrap();
        assert_eq!(saved.skill_name, "Root Cause Analysis");

        let copy = local.list().await.unwrap();
        assert_eq!(copy.len(), 2, "copy must be seeded with the full listing");
        let listed = records.list().await.unwrap();
        assert_eq!(listed[0].skill_name, "Root Cause Analysis");
    }

    #[tokio::test]
    async fn test_refused_remove_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (records, _local) = warehouse_with_copy(&dir);

        let err = records.remove(99).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(99)));
        assert_eq!(records.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_refused_write_without_copy_is_unsupported() {
        let primary = Arc::new(ReadOnlyStore::new(vec![record(1, "Band 3", "", 1)]));
        let records = Records::new(primary, None);

        let err = records.remove(1).await.unwrap_err();
        assert!(matches!(err, StoreError::Unsupported { .. }));
    }

    #[tokio::test]
    async fn test_overwrite_goes_to_copy_in_warehouse_mode() {
        let dir = tempfile::tempdir().unwrap();
        let (records, local) = warehouse_with_copy(&dir);

        records
            .overwrite(vec![record(10, "Band 5", "Functional", 2)])
            .await
            .unwrap();
        assert_eq!(local.list().await.unwrap()[0].id, 10);
        assert_eq!(records.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deleting_last_record_leaves_list_empty() {
        let dir = tempfile::tempdir().unwrap();
        let primary = Arc::new(ReadOnlyStore::new(vec![record(1, "Band 1A", "Technical", 3)]));
        let local = Arc::new(JsonFileStore::new(dir.path().join("copy.json")));
        let records = Records::new(primary, Some(local.clone()));

        records.remove(1).await.unwrap();
        assert!(records.list().await.unwrap().is_empty());

        // Later writes must not re-seed the deleted record.
        let err = records
            .replace(1, record(1, "Band 1A", "Technical", 4))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(1)));
        assert!(local.list().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_writes_both_survive() {
        let dir = tempfile::tempdir().unwrap();
        let (records, _local) = warehouse_with_copy(&dir);

        let mut first = record(1, "Band 1A", "Technical", 5);
        first.skill_name = "Kaizen".to_string();
        let mut second = record(2, "Band 2A", "Behavioral", 1);
        second.skill_name = "Stakeholder Management".to_string();

        let a = tokio::spawn({
            let records = records.clone();
            async move { records.replace(1, first).await }
        });
        let b = tokio::spawn({
            let records = records.clone();
            async move { records.replace(2, second).await }
        });
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let names: Vec<String> = records
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.skill_name)
            .collect();
        assert_eq!(names, vec!["Kaizen", "Stakeholder Management"]);
    }
}
