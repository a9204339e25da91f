use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use diesel::{
    ExpressionMethods, JoinOnDsl, NullableExpressionMethods, QueryDsl, RunQueryDsl,
    SqliteConnection,
};
use tracing::info;

use crate::{
    config::EtlConfig,
    db::establish_connection,
    error::{EtlError, Result},
    models::OrderReportRow,
    schema::{customers, order_items, orders, payments, products},
};

pub const REPORT_COLUMNS: [&str; 7] = [
    "customer_name",
    "product_name",
    "quantity",
    "price",
    "total_amount",
    "payment_method",
    "payment_status",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub rows: usize,
    pub path: PathBuf,
}

/// One row per (order, item) pair. Orders without items drop out; orders without a
/// payment keep their rows with empty payment fields.
pub fn query_order_report(conn: &mut SqliteConnection) -> Result<Vec<OrderReportRow>> {
    let rows = orders::table
        .inner_join(customers::table)
        .inner_join(order_items::table.inner_join(products::table))
        .left_join(payments::table.on(payments::order_id.eq(orders::order_id)))
        .select((
            customers::name,
            products::name,
            order_items::quantity,
            products::price,
            orders::total_amount,
            payments::payment_method.nullable(),
            payments::payment_status.nullable(),
        ))
        .order_by((orders::order_id.asc(), order_items::order_item_id.asc()))
        .load::<OrderReportRow>(conn)?;

    Ok(rows)
}

/// Replaces `path` with a header line followed by `rows`.
pub fn write_report(path: &Path, rows: &[OrderReportRow]) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| EtlError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let output = |source: csv::Error| EtlError::Output {
        path: path.to_path_buf(),
        source,
    };

    // Header is written by hand so an empty report still carries it.
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(output)?;
    writer.write_record(REPORT_COLUMNS).map_err(output)?;
    for row in rows {
        writer.serialize(row).map_err(output)?;
    }
    writer.flush().map_err(|source| EtlError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(rows.len())
}

pub fn run(config: &EtlConfig) -> Result<ReportSummary> {
    let mut conn = establish_connection(&config.database_path)?;
    let rows = query_order_report(&mut conn)?;
    drop(conn);

    let written = write_report(&config.report_path, &rows)?;
    info!("Saved {} rows to {}", written, config.report_path.display());

    Ok(ReportSummary {
        rows: written,
        path: config.report_path.clone(),
    })
}
