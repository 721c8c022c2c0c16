//! HTTP server module for the dynamic table backend.
//!
//! This module provides an axum-based HTTP server exposing the table service
//! as a REST API: eight routes that create, populate, reshape, and drop
//! PostgreSQL tables at runtime.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                              │
//! │  - Request parsing and validation                        │
//! │  - Per-route failure policy (transport vs envelope)      │
//! │  - CORS, compression, error handling                     │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Table Service (db/tables.rs)                            │
//! │  - Statement construction and execution                  │
//! │  - Outcome messages                                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  PostgreSQL (sqlx connection pool)                       │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
