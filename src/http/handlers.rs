//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the table
//! service, then shapes the outcome through [`respond`] according to the
//! route's failure policy.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use super::dto::{
    AddColumnRequest, CreateTableRequest, DeleteColumnRequest, DeleteRowsRequest, HealthResponse,
    InsertPayload, MessageResponse, OutcomeResponse, UpdateColumnRequest,
};
use super::error::AppError;
use super::router::{failure_policy, success_status, FailurePolicy, Route};
use super::state::AppState;
use crate::db::{TableError, TableResult};

/// Successful handler payload, shaped per route by [`respond`].
pub enum Reply {
    /// Plain `{message}` body
    Message(String),
    /// Raw rows from a fetch
    Rows(Vec<serde_json::Value>),
    /// `{success, message}` outcome for the enveloped routes
    Outcome { success: bool, message: String },
}

/// Shape a service outcome into a response under the route's failure policy.
///
/// Transport routes answer their success status or an error status; envelope
/// routes always answer their success status and report failure through the
/// success flag, with errors prefixed `Error: `.
pub fn respond(route: Route, result: TableResult<Reply>) -> Response {
    match (failure_policy(route), result) {
        (_, Ok(Reply::Rows(rows))) => (success_status(route), Json(rows)).into_response(),
        (FailurePolicy::Transport, Ok(Reply::Message(message)))
        | (FailurePolicy::Transport, Ok(Reply::Outcome { message, .. })) => {
            (success_status(route), Json(MessageResponse { message })).into_response()
        }
        (FailurePolicy::Transport, Err(err)) => AppError::from(err).into_response(),
        (FailurePolicy::Envelope, Ok(Reply::Message(message))) => (
            success_status(route),
            Json(OutcomeResponse {
                success: true,
                message,
            }),
        )
            .into_response(),
        (FailurePolicy::Envelope, Ok(Reply::Outcome { success, message })) => (
            success_status(route),
            Json(OutcomeResponse { success, message }),
        )
            .into_response(),
        (FailurePolicy::Envelope, Err(err)) => {
            warn!(%err, "failure reported inside envelope");
            (
                success_status(route),
                Json(OutcomeResponse {
                    success: false,
                    message: format!("Error: {err}"),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health
///
/// Health check endpoint to verify the service is running and database is accessible.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.tables.health_check().await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database,
    })
}

/// POST /dynamic-table/create
///
/// Create a table with an id primary key plus the requested columns.
pub async fn create_table(
    State(state): State<AppState>,
    Json(request): Json<CreateTableRequest>,
) -> Response {
    let result = state
        .tables
        .create_table(&request.table_name, &request.columns)
        .await
        .map(Reply::Message);
    respond(Route::CreateTable, result)
}

/// POST /dynamic-table/insert/{table_name}
///
/// Insert a single row or a batch of rows into the table.
pub async fn insert_rows(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
    Json(payload): Json<InsertPayload>,
) -> Response {
    let rows = payload.into_rows();
    let result = state
        .tables
        .insert_rows(&table_name, &rows)
        .await
        .map(Reply::Message);
    respond(Route::InsertRows, result)
}

/// GET /dynamic-table/fetch/{table_name}
///
/// Return every row of the table. Answers 404 when the table does not exist.
pub async fn fetch_rows(State(state): State<AppState>, Path(table_name): Path<String>) -> Response {
    let result = state
        .tables
        .fetch_rows(&table_name)
        .await
        .map(Reply::Rows)
        .map_err(|err| match err {
            // The route wraps generic fetch failures a second time; the
            // missing-table error passes through for the 404 mapping.
            TableError::Database { class, message } => TableError::Database {
                class,
                message: format!("Error fetching data: {message}"),
            },
            other => other,
        });
    respond(Route::FetchRows, result)
}

/// POST /dynamic-table/add-column/{table_name}
///
/// Add a column to an existing table.
pub async fn add_column(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
    Json(request): Json<AddColumnRequest>,
) -> Response {
    let result = state
        .tables
        .add_column(&table_name, &request.column_name, &request.column_type)
        .await
        .map(Reply::Message);
    respond(Route::AddColumn, result)
}

/// PUT /dynamic-table/update-column/{table_name}
///
/// Set one column of one row. Always answers 200; failures are reported
/// through the `{success, message}` envelope.
pub async fn update_column(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
    Json(request): Json<UpdateColumnRequest>,
) -> Response {
    let (id, column, value) = match request.validate() {
        Ok(parts) => parts,
        Err(message) => {
            return respond(
                Route::UpdateColumn,
                Ok(Reply::Outcome {
                    success: false,
                    message,
                }),
            )
        }
    };
    let result = state
        .tables
        .update_column_for_id(&table_name, id, column, value)
        .await
        .map(Reply::Message);
    respond(Route::UpdateColumn, result)
}

/// POST /dynamic-table/delete-column/{table_name}
///
/// Drop a column if it exists.
pub async fn delete_column(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
    Json(request): Json<DeleteColumnRequest>,
) -> Response {
    let result = state
        .tables
        .delete_column(&table_name, &request.column_name)
        .await
        .map(Reply::Message);
    respond(Route::DeleteColumn, result)
}

/// POST /dynamic-table/delete-rows/{table_name}
///
/// Delete one row by id. Always answers 200; the success flag reflects
/// whether the row existed.
pub async fn delete_rows(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
    Json(request): Json<DeleteRowsRequest>,
) -> Response {
    let Some(id) = request.id else {
        return respond(Route::DeleteRows, Err(TableError::invalid("id is required.")));
    };
    let result = state
        .tables
        .delete_row_by_id(&table_name, id)
        .await
        .map(|outcome| Reply::Outcome {
            success: outcome.deleted,
            message: outcome.message,
        });
    respond(Route::DeleteRows, result)
}

/// POST /dynamic-table/delete/{table_name}
///
/// Drop a table if it exists.
pub async fn delete_table(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
) -> Response {
    let result = state
        .tables
        .delete_table(&table_name)
        .await
        .map(Reply::Message);
    respond(Route::DeleteTable, result)
}
