//! # Fundlens Common Library
//!
//! Shared code for the Fundlens services including:
//! - Record store schema and query adapters (sqlite)
//! - Transaction models and extraction
//! - Report aggregation (the five table operations)
//! - Filter criteria normalization
//! - Configuration resolution
//! - Error types

pub mod aggregate;
pub mod config;
pub mod criteria;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod reports;
pub mod table;

pub use criteria::Criteria;
pub use error::{Error, Result};
pub use reports::{Report, TableType};
