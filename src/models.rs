use diesel::{
    Selectable,
    prelude::{Insertable, Queryable},
};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::{fmt::Display, str::FromStr};

// Rows are deserialized straight from the source CSV files, so field names must
// match both the CSV header and the store column.

#[derive(Queryable, Selectable, Insertable, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::customers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CustomerEntity {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub country: String,
}

#[derive(Queryable, Selectable, Insertable, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductEntity {
    pub product_id: String,
    pub name: String,
    pub category: String,
    #[serde(deserialize_with = "trimmed_number")]
    pub price: f64,
}

// Orders

#[derive(Queryable, Selectable, Insertable, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderEntity {
    pub order_id: String,
    pub customer_id: String,
    pub order_date: String,
    #[serde(deserialize_with = "trimmed_number")]
    pub total_amount: f64,
}

#[derive(Queryable, Selectable, Insertable, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderItemEntity {
    pub order_item_id: String,
    pub order_id: String,
    pub product_id: String,
    #[serde(deserialize_with = "trimmed_number")]
    pub quantity: i64,
}

#[derive(Queryable, Selectable, Insertable, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::payments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PaymentEntity {
    pub payment_id: String,
    pub order_id: String,
    pub payment_method: String,
    pub payment_status: String,
}

// Report

/// One (order, item) pair of the denormalized order report.
#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
pub struct OrderReportRow {
    pub customer_name: String,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    pub total_amount: f64,
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
}

/// Parses a numeric cell, ignoring surrounding whitespace. Text cells keep theirs.
fn trimmed_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim().parse().map_err(de::Error::custom)
}
