use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{EtlError, Result};
use crate::tables::Table;

/// Locations shared by the ingestion and report jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtlConfig {
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    pub report_path: PathBuf,
}

impl EtlConfig {
    pub fn from_base_dir(base_dir: impl AsRef<Path>) -> Self {
        let base_dir = base_dir.as_ref();
        let data_dir = base_dir.join("data");
        Self {
            report_path: data_dir.join("order_report.csv"),
            database_path: base_dir.join("ecommerce.db"),
            data_dir,
        }
    }

    pub fn source_path(&self, table: Table) -> PathBuf {
        self.data_dir.join(table.file_name())
    }
}

pub fn get_base_dir() -> PathBuf {
    std::env::var("ETL_BASE_DIR")
        .map(PathBuf::from)
        .unwrap_or(PathBuf::from(env!("CARGO_MANIFEST_DIR")))
}

/// Builds the configuration from the environment. Call `bootstrap::init_env()` first
/// so values from `.env` are visible.
pub fn load() -> Result<EtlConfig> {
    let base_dir = get_base_dir();
    if base_dir.as_os_str().is_empty() {
        return Err(EtlError::Config("ETL_BASE_DIR is empty".into()));
    }

    let mut config = EtlConfig::from_base_dir(&base_dir);
    if let Ok(data_dir) = std::env::var("ETL_DATA_DIR") {
        config.data_dir = PathBuf::from(data_dir);
    }
    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.database_path = PathBuf::from(url);
    }
    if let Ok(report_path) = std::env::var("ETL_REPORT_PATH") {
        config.report_path = PathBuf::from(report_path);
    }

    debug!("Resolved configuration: {:?}", config);
    Ok(config)
}
