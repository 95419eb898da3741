//! HTTP API handlers for fundlens-api

pub mod health;
pub mod tables;

pub use health::health_routes;
pub use tables::{get_data_table, get_transaction_data};
