//! # dyntable
//!
//! HTTP passthrough service for ad hoc PostgreSQL tables.
//!
//! This crate exposes a small REST API that lets a frontend create, populate,
//! reshape, and drop PostgreSQL tables at runtime, without any schema known
//! at compile time. Statements are assembled dynamically from client-supplied
//! table and column names; identifiers are quoted and values are bound, never
//! interpolated.
//!
//! ## Features
//!
//! - **Table lifecycle**: create and drop tables with an `id SERIAL PRIMARY KEY`
//! - **Row operations**: batch insert with NULL padding, fetch, per-id update
//!   and delete
//! - **Schema changes**: add and drop columns on live tables
//! - **Error classification**: driver failures classified by SQLSTATE, with a
//!   message-text fallback
//! - **HTTP API**: axum-based REST endpoints with per-route failure policies
//!
//! ## Architecture
//!
//! The crate is organized into two logical modules:
//!
//! - [`db`]: configuration, dynamic SQL construction, row decoding, and the
//!   table service
//! - [`http`]: axum router, handlers, DTOs, and error mapping

pub mod db;

pub mod http;
