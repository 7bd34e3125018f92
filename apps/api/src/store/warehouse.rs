//! Warehouse-backed store: reads the skills matrix table through a Postgres pool.
//!
//! The warehouse is loaded in bulk by the ingestion job. Row-level DML is not
//! supported here; writes report `Unsupported` and `Records` redirects them to
//! the local copy.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{info, warn};

use crate::models::record::{normalize_proficiency, SkillRecord, UNASSIGNED_BAND};
use crate::store::{RecordStore, StoreError};

const BACKEND: &str = "Warehouse";

pub struct WarehouseStore {
    pool: PgPool,
    table: String,
}

impl WarehouseStore {
    /// Fails if `table` is not a plain identifier (optionally `schema.table`),
    /// since it is spliced into the query text.
    pub fn new(pool: PgPool, table: &str) -> anyhow::Result<Self> {
        if !is_valid_table_name(table) {
            anyhow::bail!("WAREHOUSE_TABLE '{table}' is not a valid table identifier");
        }
        info!(table, "Warehouse store initialized");
        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }

    fn select_all_sql(&self) -> String {
        format!(
            r#"SELECT id, "Group", "SBU", "BU", "Function", "UJR_in_UJR_Master",
                      "Job_Role_Name_without_concat", "L1_UJR", "Competency_Type",
                      "Skill_Name", "Skill_Definition",
                      "Proficiency_Level"::text AS "Proficiency_Level", "Band"
               FROM {}
               ORDER BY id"#,
            self.table
        )
    }
}

pub fn is_valid_table_name(table: &str) -> bool {
    let parts: Vec<&str> = table.split('.').collect();
    parts.len() <= 2
        && parts.iter().all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

fn row_to_record(row: &PgRow) -> Result<SkillRecord, sqlx::Error> {
    let id = match row.try_get::<Option<i64>, _>("id") {
        Ok(id) => id,
        Err(_) => row.try_get::<Option<i32>, _>("id")?.map(i64::from),
    };
    let text = |column: &str| -> Result<String, sqlx::Error> {
        Ok(row.try_get::<Option<String>, _>(column)?.unwrap_or_default())
    };

    let proficiency = text("Proficiency_Level")?;
    let band = text("Band")?;

    Ok(SkillRecord {
        id: id.unwrap_or(0),
        group: text("Group")?,
        sbu: text("SBU")?,
        bu: text("BU")?,
        function: text("Function")?,
        ujr_in_ujr_master: text("UJR_in_UJR_Master")?,
        job_role_name: text("Job_Role_Name_without_concat")?,
        l1_ujr: text("L1_UJR")?,
        competency_type: text("Competency_Type")?,
        skill_name: text("Skill_Name")?,
        skill_definition: text("Skill_Definition")?,
        proficiency_level: normalize_proficiency(&serde_json::Value::String(proficiency)),
        band: if band.trim().is_empty() {
            UNASSIGNED_BAND.to_string()
        } else {
            band
        },
    })
}

#[async_trait]
impl RecordStore for WarehouseStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn list(&self) -> Result<Vec<SkillRecord>, StoreError> {
        let rows = sqlx::query(&self.select_all_sql())
            .fetch_all(&self.pool)
            .await?;

        let records = rows
            .iter()
            .map(row_to_record)
            .collect::<Result<Vec<_>, _>>()?;

        info!(count = records.len(), table = %self.table, "Fetched records from warehouse");
        Ok(records)
    }

    async fn replace(&self, id: i64, _record: SkillRecord) -> Result<SkillRecord, StoreError> {
        warn!(id, table = %self.table, "Update requested; warehouse row updates are not supported");
        Err(StoreError::Unsupported {
            backend: BACKEND,
            operation: "replace",
        })
    }

    async fn remove(&self, id: i64) -> Result<(), StoreError> {
        warn!(id, table = %self.table, "Delete requested; warehouse row deletes are not supported");
        Err(StoreError::Unsupported {
            backend: BACKEND,
            operation: "remove",
        })
    }

    async fn overwrite(&self, records: Vec<SkillRecord>) -> Result<(), StoreError> {
        warn!(
            count = records.len(),
            table = %self.table,
            "Bulk overwrite requested; warehouse loads run outside this service"
        );
        Err(StoreError::Unsupported {
            backend: BACKEND,
            operation: "overwrite",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_accepts_plain_and_qualified() {
        assert!(is_valid_table_name("manpower_skills_matrix"));
        assert!(is_valid_table_name("analytics.manpower_skills_matrix"));
        assert!(is_valid_table_name("_staging2"));
    }

    #[tokio::test]
    async fn test_backend_name_is_display_cased() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/skills")
            .unwrap();
        let store = WarehouseStore::new(pool, "manpower_skills_matrix").unwrap();
        assert_eq!(store.backend(), "Warehouse");
    }

    #[test]
    fn test_table_name_rejects_injection_and_oddities() {
        assert!(!is_valid_table_name(""));
        assert!(!is_valid_table_name("a.b.c"));
        assert!(!is_valid_table_name("1table"));
        assert!(!is_valid_table_name("skills; DROP TABLE users"));
        assert!(!is_valid_table_name("skills--"));
        assert!(!is_valid_table_name("schema."));
    }
}
