pub mod bootstrap;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod load;
pub mod models;
pub mod report;
pub mod schema;
pub mod sources;
pub mod tables;
