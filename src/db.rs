use std::path::Path;

use diesel::{
    Connection, QueryDsl, RunQueryDsl, SqliteConnection, connection::SimpleConnection,
};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::{
    error::{EtlError, Result},
    schema::{customers, order_items, orders, payments, products},
    tables::Table,
};

/// Migrations embedded into the binary so both jobs run without the diesel CLI
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Opens the store, creating the file (and its directory) when absent.
pub fn establish_connection(path: &Path) -> Result<SqliteConnection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| EtlError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let url = path.to_str().ok_or_else(|| {
        EtlError::Config(format!("store path {} is not valid UTF-8", path.display()))
    })?;
    let mut conn = SqliteConnection::establish(url)?;

    // No foreign keys are declared, so this only matters for tables created elsewhere.
    conn.batch_execute("PRAGMA foreign_keys = ON;")?;

    debug!("Opened store at {}", path.display());
    Ok(conn)
}

/// `CREATE TABLE IF NOT EXISTS` for all five tables; safe to run on every start.
const CREATE_TABLES: &str =
    include_str!("../migrations/2024-01-01-000000_create_ecommerce_tables/up.sql");

/// Creates any of the five tables that do not exist yet. Existing tables are kept as
/// they are, whatever their columns.
pub fn ensure_schema(conn: &mut SqliteConnection) -> Result<usize> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| EtlError::Schema(err.to_string()))?
        .len();

    // The harness skips recorded migrations, so tables dropped since then come back here.
    conn.batch_execute(CREATE_TABLES)
        .map_err(|err| EtlError::Schema(err.to_string()))?;

    info!("Schema ready ({} new migrations applied)", applied);
    Ok(applied)
}

pub fn count_rows(conn: &mut SqliteConnection, table: Table) -> Result<i64> {
    let count = match table {
        Table::Customers => customers::table.count().get_result::<i64>(conn),
        Table::Products => products::table.count().get_result::<i64>(conn),
        Table::Orders => orders::table.count().get_result::<i64>(conn),
        Table::OrderItems => order_items::table.count().get_result::<i64>(conn),
        Table::Payments => payments::table.count().get_result::<i64>(conn),
    }?;
    Ok(count)
}
