//! Table operations against PostgreSQL.
//!
//! [`TableRepository`] is the service layer of the crate: one method per REST
//! operation, each assembling a statement via [`super::sql`] and running it on
//! the shared connection pool.
//!
//! Statements without bind parameters (DDL and `SELECT *`) run over the simple
//! query protocol. Prepared statements are cached per connection, and a cached
//! `SELECT *` plan fails with `cached plan must not change result type` as
//! soon as a column is added or dropped; the simple protocol re-plans every
//! execution. Statements with bind parameters have a fixed result shape
//! (`RETURNING id` or no rows at all) and stay on the prepared path.

use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, PgPool};
use sqlx::query::Query;
use sqlx::{Executor, Postgres};
use tracing::{debug, error, info};

use super::error::{classify, driver_message, ErrorClass, TableError, TableResult};
use super::row::rows_to_json;
use super::sql::{self, ColumnSpec};

/// Outcome of a row deletion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDeletion {
    /// Whether a row was actually deleted
    pub deleted: bool,
    /// Human-readable outcome message
    pub message: String,
}

/// Service for dynamic table operations backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct TableRepository {
    pool: PgPool,
}

impl TableRepository {
    /// Create a new repository on top of an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a table with an `id SERIAL PRIMARY KEY` plus the given columns.
    pub async fn create_table(&self, table: &str, columns: &[ColumnSpec]) -> TableResult<String> {
        let statement = sql::create_table(table, columns)?;
        debug!(table, %statement, "creating table");
        self.execute_raw(&statement).await?;
        info!(table, "table created");
        Ok(format!("Table {table} created successfully."))
    }

    /// Insert one or more rows, padding fields missing from a row with NULL.
    pub async fn insert_rows(
        &self,
        table: &str,
        rows: &[Map<String, Value>],
    ) -> TableResult<String> {
        let statement = sql::insert_rows(table, rows)?;
        debug!(table, rows = rows.len(), sql = %statement.text, "inserting rows");
        bind_json_values(sqlx::query(&statement.text), &statement.binds)
            .execute(&self.pool)
            .await
            .map_err(TableError::database)?;
        Ok(format!("Data inserted into {table} Table successfully."))
    }

    /// Fetch every row of a table as JSON objects in column order.
    ///
    /// A missing table surfaces as [`TableError::MissingTable`]; any other
    /// failure is wrapped with the table name.
    pub async fn fetch_rows(&self, table: &str) -> TableResult<Vec<Value>> {
        let statement = sql::select_rows(table)?;
        debug!(table, %statement, "fetching rows");
        match self.pool.fetch_all(statement.as_str()).await {
            Ok(rows) => Ok(rows_to_json(&rows)),
            Err(err) if classify(&err) == ErrorClass::NotFound => {
                Err(TableError::MissingTable {
                    table: table.to_string(),
                })
            }
            Err(err) => {
                let class = classify(&err);
                Err(TableError::Database {
                    class,
                    message: format!(
                        "Error fetching data from table '{table}': {}",
                        driver_message(&err)
                    ),
                })
            }
        }
    }

    /// Add a column to an existing table.
    pub async fn add_column(
        &self,
        table: &str,
        column: &str,
        column_type: &str,
    ) -> TableResult<String> {
        let statement = sql::add_column(table, column, column_type)?;
        debug!(table, column, %statement, "adding column");
        self.execute_raw(&statement).await?;
        Ok(format!("Column {column} added to {table}."))
    }

    /// Set one column of one row, identified by id.
    ///
    /// Resolves to a message whether a row was updated or no row matched.
    /// Database failures are wrapped with the column and id.
    pub async fn update_column_for_id(
        &self,
        table: &str,
        id: i64,
        column: &str,
        value: &Value,
    ) -> TableResult<String> {
        let statement = sql::update_column(table, column, value, id)?;
        debug!(table, column, id, sql = %statement.text, "updating column");
        let result = bind_json_values(sqlx::query(&statement.text), &statement.binds)
            .fetch_all(&self.pool)
            .await;
        match result {
            Ok(rows) if !rows.is_empty() => Ok(format!(
                "Column '{column}' updated successfully for row with id {id}."
            )),
            Ok(_) => Ok(format!("Row with id {id} does not exist or no changes made.")),
            Err(err) => {
                error!(table, column, id, %err, "update failed");
                let class = classify(&err);
                Err(TableError::Database {
                    class,
                    message: format!(
                        "Error updating column '{column}' for id {id}: {}",
                        driver_message(&err)
                    ),
                })
            }
        }
    }

    /// Drop a column if it exists. Dropping an absent column is a no-op.
    pub async fn delete_column(&self, table: &str, column: &str) -> TableResult<String> {
        let statement = sql::drop_column(table, column)?;
        debug!(table, column, %statement, "dropping column");
        self.execute_raw(&statement).await?;
        Ok(format!("Column {column} deleted from {table}."))
    }

    /// Delete one row by id, reporting whether it existed.
    ///
    /// A single DELETE .. RETURNING statement performs and verifies the
    /// deletion; existence derives from the returned row set.
    pub async fn delete_row_by_id(&self, table: &str, id: i64) -> TableResult<RowDeletion> {
        let statement = sql::delete_row(table, id)?;
        debug!(table, id, sql = %statement.text, "deleting row");
        let result = bind_json_values(sqlx::query(&statement.text), &statement.binds)
            .fetch_all(&self.pool)
            .await;
        match result {
            Ok(rows) if !rows.is_empty() => Ok(RowDeletion {
                deleted: true,
                message: format!("Row with id '{id}' deleted successfully."),
            }),
            Ok(_) => Ok(RowDeletion {
                deleted: false,
                message: format!("Row with id '{id}' does not exist."),
            }),
            Err(err) => {
                let class = classify(&err);
                Err(TableError::Database {
                    class,
                    message: format!(
                        "Error deleting row with id '{id}': {}",
                        driver_message(&err)
                    ),
                })
            }
        }
    }

    /// Drop a table if it exists. Dropping an absent table is a no-op.
    pub async fn delete_table(&self, table: &str) -> TableResult<String> {
        let statement = sql::drop_table(table)?;
        debug!(table, %statement, "dropping table");
        self.execute_raw(&statement).await?;
        info!(table, "table dropped");
        Ok(format!("Table {table} deleted successfully."))
    }

    /// Verify the database answers a trivial query.
    pub async fn health_check(&self) -> TableResult<()> {
        self.execute_raw("SELECT 1").await
    }

    /// Run a statement without bind parameters over the simple query protocol.
    async fn execute_raw(&self, statement: &str) -> TableResult<()> {
        self.pool
            .execute(statement)
            .await
            .map(|_| ())
            .map_err(TableError::database)
    }
}

/// Attach JSON bind values to a query, mapping each to the closest SQL type.
///
/// Strings bind as TEXT, integers as BIGINT, other numbers as DOUBLE
/// PRECISION, booleans as BOOL, and objects/arrays as JSONB. PostgreSQL's
/// assignment casts cover narrower column types on the other side.
fn bind_json_values<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    values: &'q [Value],
) -> Query<'q, Postgres, PgArguments> {
    for value in values {
        query = match value {
            Value::Null => query.bind(Option::<String>::None),
            Value::Bool(b) => query.bind(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    query.bind(i)
                } else if let Some(f) = n.as_f64() {
                    query.bind(f)
                } else {
                    query.bind(n.to_string())
                }
            }
            Value::String(s) => query.bind(s.as_str()),
            other => query.bind(other.clone()),
        };
    }
    query
}
