//! Database module for dynamic table storage.
//!
//! This module holds everything between the HTTP layer and PostgreSQL:
//! configuration, statement construction, row decoding, error classification,
//! and the table service itself.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                             │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Table Service (tables.rs)                              │
//! │  - One method per REST operation                        │
//! │  - Outcome messages and failure wrapping                │
//! └──────┬──────────────────────┬───────────────────────────┘
//!        │                      │
//! ┌──────▼──────────┐  ┌────────▼────────────────────────────┐
//! │  SQL Builders   │  │  Connection Pool (sqlx::PgPool)     │
//! │  (sql.rs)       │  │  - configured by config.rs          │
//! │  - quoting      │  │  - rows decoded by row.rs           │
//! └─────────────────┘  └─────────────────────────────────────┘
//! ```
//!
//! The module includes:
//! - `tables`: the service layer, one method per operation (use this!)
//! - `sql`: dynamic statement construction with identifier quoting
//! - `row`: `SELECT *` result decoding into JSON objects
//! - `error`: error types and SQLSTATE classification
//! - `config`: pool configuration from environment variables

pub mod config;
pub mod error;
pub mod row;
pub mod sql;
pub mod tables;

pub use config::{DbConfig, DbTarget};
pub use error::{
    classify, classify_message, classify_sqlstate, driver_message, ErrorClass, TableError,
    TableResult,
};
pub use sql::{ColumnSpec, Statement};
pub use tables::{RowDeletion, TableRepository};
