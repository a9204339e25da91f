//! Ingestion job: schema, source files, bulk load.
//!
//! Everything happens inside one immediate transaction on one connection, so a
//! failure at any step (including a primary-key collision on a re-run) leaves the
//! store as it was before the run. Rows are only ever appended; there is no upsert.

use diesel::{
    ExpressionMethods, NullableExpressionMethods, QueryDsl, RunQueryDsl, SqliteConnection,
};
use tracing::{info, warn};

use crate::{
    config::EtlConfig,
    db::{ensure_schema, establish_connection},
    error::{EtlError, Result},
    load::append_rows,
    schema::{customers, order_items, orders, payments, products},
    sources::{SourceTables, load_sources},
    tables::Table,
};

/// Rows whose reference column points at no row of the parent table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub table: Table,
    pub column: &'static str,
    pub parent: Table,
    pub rows: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestionSummary {
    pub migrations_applied: usize,
    /// Rows appended per table, in load order.
    pub loaded: Vec<(Table, usize)>,
    pub dangling: Vec<DanglingReference>,
}

impl IngestionSummary {
    pub fn total_rows(&self) -> usize {
        self.loaded.iter().map(|(_, rows)| rows).sum()
    }

    pub fn rows_for(&self, table: Table) -> Option<usize> {
        self.loaded
            .iter()
            .find(|(t, _)| *t == table)
            .map(|(_, rows)| *rows)
    }
}

pub fn run(config: &EtlConfig) -> Result<IngestionSummary> {
    info!("Ingesting {} into {}", config.data_dir.display(), config.database_path.display());
    let mut conn = establish_connection(&config.database_path)?;

    let summary = conn.immediate_transaction::<_, EtlError, _>(|conn| {
        let migrations_applied = ensure_schema(conn)?;
        let sources = load_sources(config)?;
        let loaded = insert_data(conn, &sources)?;

        let dangling = dangling_references(conn)?;
        for reference in &dangling {
            warn!(
                "{} rows of {}.{} do not match any {} row",
                reference.rows, reference.table, reference.column, reference.parent
            );
        }

        Ok(IngestionSummary {
            migrations_applied,
            loaded,
            dangling,
        })
    })?;

    info!("Ingested {} rows", summary.total_rows());
    Ok(summary)
}

/// Appends every source table in `Table::LOAD_ORDER`.
pub fn insert_data(
    conn: &mut SqliteConnection,
    sources: &SourceTables,
) -> Result<Vec<(Table, usize)>> {
    let mut loaded = Vec::with_capacity(Table::LOAD_ORDER.len());
    for table in Table::LOAD_ORDER {
        let rows = match table {
            Table::Customers => append_rows(conn, &sources.customers)?,
            Table::Products => append_rows(conn, &sources.products)?,
            Table::Orders => append_rows(conn, &sources.orders)?,
            Table::OrderItems => append_rows(conn, &sources.order_items)?,
            Table::Payments => append_rows(conn, &sources.payments)?,
        };
        loaded.push((table, rows));
    }
    Ok(loaded)
}

/// Counts unresolved references. The store declares no foreign keys, so this is the
/// only place they are looked at; the result is informational.
pub fn dangling_references(conn: &mut SqliteConnection) -> Result<Vec<DanglingReference>> {
    let checks = [
        (
            Table::Orders,
            "customer_id",
            Table::Customers,
            orders::table
                .left_join(customers::table)
                .filter(customers::customer_id.nullable().is_null())
                .count()
                .get_result::<i64>(conn)?,
        ),
        (
            Table::OrderItems,
            "order_id",
            Table::Orders,
            order_items::table
                .left_join(orders::table)
                .filter(orders::order_id.nullable().is_null())
                .count()
                .get_result::<i64>(conn)?,
        ),
        (
            Table::OrderItems,
            "product_id",
            Table::Products,
            order_items::table
                .left_join(products::table)
                .filter(products::product_id.nullable().is_null())
                .count()
                .get_result::<i64>(conn)?,
        ),
        (
            Table::Payments,
            "order_id",
            Table::Orders,
            payments::table
                .left_join(orders::table)
                .filter(orders::order_id.nullable().is_null())
                .count()
                .get_result::<i64>(conn)?,
        ),
    ];

    Ok(checks
        .into_iter()
        .filter(|(_, _, _, rows)| *rows > 0)
        .map(|(table, column, parent, rows)| DanglingReference {
            table,
            column,
            parent,
            rows,
        })
        .collect())
}
