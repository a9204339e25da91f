//! Reads the five source CSV files into typed rows.
//!
//! Identifier and text columns come through as `String`, monetary columns as `f64`
//! and quantities as `i64`. A cell that does not fit its column type fails the whole
//! read; nothing is skipped.

use std::{fs::File, io, path::Path};

use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::{
    config::EtlConfig,
    error::{EtlError, Result},
    models::{CustomerEntity, OrderEntity, OrderItemEntity, PaymentEntity, ProductEntity},
    tables::Table,
};

/// In-memory copy of every source file, rows in file order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SourceTables {
    pub customers: Vec<CustomerEntity>,
    pub products: Vec<ProductEntity>,
    pub orders: Vec<OrderEntity>,
    pub order_items: Vec<OrderItemEntity>,
    pub payments: Vec<PaymentEntity>,
}

impl SourceTables {
    pub fn row_count(&self, table: Table) -> usize {
        match table {
            Table::Customers => self.customers.len(),
            Table::Products => self.products.len(),
            Table::Orders => self.orders.len(),
            Table::OrderItems => self.order_items.len(),
            Table::Payments => self.payments.len(),
        }
    }
}

pub fn load_sources(config: &EtlConfig) -> Result<SourceTables> {
    let sources = SourceTables {
        customers: read_table(&config.source_path(Table::Customers), Table::Customers)?,
        products: read_table(&config.source_path(Table::Products), Table::Products)?,
        orders: read_table(&config.source_path(Table::Orders), Table::Orders)?,
        order_items: read_table(&config.source_path(Table::OrderItems), Table::OrderItems)?,
        payments: read_table(&config.source_path(Table::Payments), Table::Payments)?,
    };

    for table in Table::LOAD_ORDER {
        info!("Read {} rows for {}", sources.row_count(table), table);
    }
    Ok(sources)
}

/// Reads one source file. The header must list exactly `table.columns()`, in order.
pub fn read_table<T: DeserializeOwned>(path: &Path, table: Table) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => EtlError::MissingSource {
            table: table.name(),
            path: path.to_path_buf(),
        },
        _ => EtlError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let coercion = |source: csv::Error| EtlError::Coercion {
        table: table.name(),
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let found: Vec<String> = reader
        .headers()
        .map_err(coercion)?
        .iter()
        .map(str::to_string)
        .collect();
    if found != table.columns() {
        return Err(EtlError::HeaderMismatch {
            path: path.to_path_buf(),
            expected: table.columns().iter().map(|c| c.to_string()).collect(),
            found,
        });
    }

    reader
        .deserialize::<T>()
        .map(|row| row.map_err(coercion))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_typed_rows_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "products.csv",
            "product_id,name,category,price\nP2,Keyboard,Electronics,35.5\nP1,Mouse,Electronics,10\n",
        );

        let rows: Vec<ProductEntity> = read_table(&path, Table::Products).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_id, "P2");
        assert_eq!(rows[0].price, 35.5);
        assert_eq!(rows[1].name, "Mouse");
        assert_eq!(rows[1].price, 10.0);
    }

    #[test]
    fn numeric_looking_ids_stay_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "customers.csv",
            "customer_id,name,email,country\n007,Bond,jb@x.com,UK\n",
        );

        let rows: Vec<CustomerEntity> = read_table(&path, Table::Customers).unwrap();

        assert_eq!(rows[0].customer_id, "007");
    }

    #[test]
    fn non_numeric_quantity_is_a_coercion_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "order_items.csv",
            "order_item_id,order_id,product_id,quantity\nI1,O1,P1,two\n",
        );

        let err = read_table::<OrderItemEntity>(&path, Table::OrderItems).unwrap_err();

        assert!(matches!(err, EtlError::Coercion { table: "order_items", .. }));
    }

    #[test]
    fn fractional_quantity_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "order_items.csv",
            "order_item_id,order_id,product_id,quantity\nI1,O1,P1,1.5\n",
        );

        assert!(read_table::<OrderItemEntity>(&path, Table::OrderItems).is_err());
    }

    #[test]
    fn numeric_cells_tolerate_surrounding_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let products = write_file(
            dir.path(),
            "products.csv",
            "product_id,name,category,price\nP1, Mouse ,E, 10.0 \n",
        );
        let items = write_file(
            dir.path(),
            "order_items.csv",
            "order_item_id,order_id,product_id,quantity\nI1,O1,P1, 3\n",
        );

        let products: Vec<ProductEntity> = read_table(&products, Table::Products).unwrap();
        let items: Vec<OrderItemEntity> = read_table(&items, Table::OrderItems).unwrap();

        assert_eq!(products[0].price, 10.0);
        assert_eq!(products[0].name, " Mouse ");
        assert_eq!(items[0].quantity, 3);
    }

    #[test]
    fn header_must_match_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "payments.csv",
            "payment_id,order_id,method,payment_status\nPAY1,O1,card,paid\n",
        );

        let err = read_table::<PaymentEntity>(&path, Table::Payments).unwrap_err();

        match err {
            EtlError::HeaderMismatch { found, .. } => assert_eq!(found[2], "method"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn absent_file_is_reported_as_missing_source() {
        let dir = tempfile::tempdir().unwrap();

        let err = read_table::<OrderEntity>(&dir.path().join("orders.csv"), Table::Orders)
            .unwrap_err();

        assert!(matches!(err, EtlError::MissingSource { table: "orders", .. }));
    }
}
