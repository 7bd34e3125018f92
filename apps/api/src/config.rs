use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Where skill records are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A JSON file on local disk (`DATA_FILE`).
    Json,
    /// A warehouse table behind `DATABASE_URL`. Writes land in `LOCAL_COPY_FILE`.
    Warehouse {
        database_url: String,
        table: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_source: DataSource,
    pub data_file: PathBuf,
    pub local_copy_file: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let data_source = match get_or("DATA_SOURCE", "json").to_ascii_lowercase().as_str() {
            "json" => DataSource::Json,
            "warehouse" => DataSource::Warehouse {
                database_url: lookup("DATABASE_URL").context(
                    "Required environment variable 'DATABASE_URL' is not set (DATA_SOURCE=warehouse)",
                )?,
                table: get_or("WAREHOUSE_TABLE", "manpower_skills_matrix"),
            },
            other => bail!("DATA_SOURCE must be 'json' or 'warehouse', got '{other}'"),
        };

        Ok(Config {
            data_source,
            data_file: PathBuf::from(get_or("DATA_FILE", "mock_db.json")),
            local_copy_file: PathBuf::from(get_or("LOCAL_COPY_FILE", "warehouse_local_copy.json")),
            port: get_or("PORT", "8001")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get_or("RUST_LOG", "info"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_json_mode() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.data_source, DataSource::Json);
        assert_eq!(config.data_file, PathBuf::from("mock_db.json"));
        assert_eq!(config.port, 8001);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_warehouse_mode_requires_database_url() {
        let err = Config::from_lookup(lookup(&[("DATA_SOURCE", "warehouse")])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_warehouse_mode_reads_table() {
        let config = Config::from_lookup(lookup(&[
            ("DATA_SOURCE", "Warehouse"),
            ("DATABASE_URL", "postgres://localhost/hr"),
            ("WAREHOUSE_TABLE", "analytics.skills"),
        ]))
        .unwrap();
        assert_eq!(
            config.data_source,
            DataSource::Warehouse {
                database_url: "postgres://localhost/hr".to_string(),
                table: "analytics.skills".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_unknown_source_and_bad_port() {
        assert!(Config::from_lookup(lookup(&[("DATA_SOURCE", "excel")])).is_err());
        assert!(Config::from_lookup(lookup(&[("PORT", "eighty")])).is_err());
    }
}
