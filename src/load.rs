use diesel::{Connection, QueryResult, RunQueryDsl, SqliteConnection};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::{
    error::{EtlError, Result},
    models::{CustomerEntity, OrderEntity, OrderItemEntity, PaymentEntity, ProductEntity},
    schema::{customers, order_items, orders, payments, products},
    tables::Table,
};

/// Rows per INSERT statement. Every entity has four columns, which keeps a batch well
/// below SQLite's default limit of 999 bound parameters.
pub const INSERT_BATCH_SIZE: usize = 200;

/// A row type that can be read from its source file and appended to its store table.
pub trait Entity: DeserializeOwned {
    const TABLE: Table;

    fn insert_batch(conn: &mut SqliteConnection, rows: &[Self]) -> QueryResult<usize>;
}

macro_rules! impl_entity {
    ($entity:ty, $table:ident, $kind:expr) => {
        impl Entity for $entity {
            const TABLE: Table = $kind;

            fn insert_batch(conn: &mut SqliteConnection, rows: &[Self]) -> QueryResult<usize> {
                diesel::insert_into($table::table).values(rows).execute(conn)
            }
        }
    };
}

impl_entity!(CustomerEntity, customers, Table::Customers);
impl_entity!(ProductEntity, products, Table::Products);
impl_entity!(OrderEntity, orders, Table::Orders);
impl_entity!(OrderItemEntity, order_items, Table::OrderItems);
impl_entity!(PaymentEntity, payments, Table::Payments);

/// Appends every row to the entity's table without looking for existing keys.
///
/// The append runs in its own transaction (a savepoint when the caller already holds
/// one), so a key collision leaves the table exactly as it was.
pub fn append_rows<E: Entity>(conn: &mut SqliteConnection, rows: &[E]) -> Result<usize> {
    let table = E::TABLE;
    let inserted = conn
        .transaction::<_, diesel::result::Error, _>(|conn| {
            let mut inserted = 0;
            for (batch, chunk) in rows.chunks(INSERT_BATCH_SIZE).enumerate() {
                inserted += E::insert_batch(conn, chunk)?;
                debug!("{}: batch #{} wrote {} rows", table, batch, chunk.len());
            }
            Ok(inserted)
        })
        .map_err(|source| EtlError::Append {
            table: table.name(),
            source,
        })?;

    info!("Appended {} rows to {}", inserted, table);
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{count_rows, establish_connection, ensure_schema};

    fn customer(id: &str) -> CustomerEntity {
        CustomerEntity {
            customer_id: id.into(),
            name: format!("Customer {id}"),
            email: format!("{id}@example.com"),
            country: "PE".into(),
        }
    }

    #[test]
    fn appends_more_rows_than_one_batch() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = establish_connection(&dir.path().join("store.db")).unwrap();
        ensure_schema(&mut conn).unwrap();

        let rows: Vec<CustomerEntity> = (0..INSERT_BATCH_SIZE * 2 + 7)
            .map(|i| customer(&format!("C{i}")))
            .collect();

        assert_eq!(append_rows(&mut conn, &rows).unwrap(), rows.len());
        assert_eq!(
            count_rows(&mut conn, Table::Customers).unwrap(),
            rows.len() as i64
        );
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = establish_connection(&dir.path().join("store.db")).unwrap();
        ensure_schema(&mut conn).unwrap();

        assert_eq!(append_rows::<PaymentEntity>(&mut conn, &[]).unwrap(), 0);
    }

    #[test]
    fn key_collision_rolls_back_the_whole_append() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = establish_connection(&dir.path().join("store.db")).unwrap();
        ensure_schema(&mut conn).unwrap();
        append_rows(&mut conn, &[customer("C1")]).unwrap();

        // A full batch of fresh keys goes in before the colliding one.
        let mut rows: Vec<CustomerEntity> = (0..INSERT_BATCH_SIZE)
            .map(|i| customer(&format!("N{i}")))
            .collect();
        rows.push(customer("C1"));
        let err = append_rows(&mut conn, &rows).unwrap_err();

        assert!(err.is_unique_violation(), "unexpected error: {err}");
        assert_eq!(count_rows(&mut conn, Table::Customers).unwrap(), 1);
    }
}
