//! Data Transfer Objects for the HTTP API.
//!
//! Request bodies mirror the camelCase JSON the frontend sends. The update
//! request is the one subtle shape: it has to tell a field that is absent
//! apart from a field explicitly set to `null`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub use crate::db::ColumnSpec;

/// Request body for creating a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableRequest {
    /// Name of the table to create
    pub table_name: String,
    /// Column definitions (an `id SERIAL PRIMARY KEY` column is always added)
    pub columns: Vec<ColumnSpec>,
}

/// Request body for inserting rows: a single object or an array of objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InsertPayload {
    /// Multiple rows
    Many(Vec<Map<String, Value>>),
    /// A single row
    One(Map<String, Value>),
}

impl InsertPayload {
    /// Normalize to a list of rows.
    pub fn into_rows(self) -> Vec<Map<String, Value>> {
        match self {
            InsertPayload::Many(rows) => rows,
            InsertPayload::One(row) => vec![row],
        }
    }
}

/// Request body for adding a column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddColumnRequest {
    /// Name of the new column
    pub column_name: String,
    /// SQL type expression for the new column
    pub column_type: String,
}

/// Request body for updating one column of one row.
///
/// All three fields are required by the route contract, but each arrives as
/// an `Option` so a missing field produces the validation envelope instead of
/// a deserialization rejection. For `value`, absent and explicit `null` are
/// different things: absent fails validation, `null` clears the column.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateColumnRequest {
    /// Row id to update
    pub id: Option<i64>,
    /// Column to set
    pub column_name: Option<String>,
    /// New value (explicit `null` clears the column)
    #[serde(default, deserialize_with = "some_if_present")]
    pub value: Option<Value>,
}

/// Deserialize a field as `Some(value)` whenever it is present, keeping
/// `None` for the absent case only.
fn some_if_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl UpdateColumnRequest {
    /// Check that id, columnName, and value are all present.
    pub fn validate(&self) -> Result<(i64, &str, &Value), String> {
        match (self.id, self.column_name.as_deref(), self.value.as_ref()) {
            (Some(id), Some(column), Some(value)) if !column.is_empty() => Ok((id, column, value)),
            _ => Err("Invalid input: id, columnName, and value are required.".to_string()),
        }
    }
}

/// Request body for dropping a column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteColumnRequest {
    /// Column to drop
    pub column_name: String,
}

/// Request body for deleting a row by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRowsRequest {
    /// Row id to delete
    pub id: Option<i64>,
}

/// Plain `{message}` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Outcome description
    pub message: String,
}

/// `{success, message}` envelope used by the update and delete-row routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeResponse {
    /// Whether the operation succeeded
    pub success: bool,
    /// Outcome description
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_payload_single_object() {
        let payload: InsertPayload = serde_json::from_value(json!({"name": "ada"})).unwrap();
        let rows = payload.into_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some(&json!("ada")));
    }

    #[test]
    fn test_insert_payload_array() {
        let payload: InsertPayload =
            serde_json::from_value(json!([{"a": 1}, {"b": 2}])).unwrap();
        assert_eq!(payload.into_rows().len(), 2);
    }

    #[test]
    fn test_create_table_request_field_names() {
        let request: CreateTableRequest = serde_json::from_value(json!({
            "tableName": "people",
            "columns": [{"name": "age", "type": "INT"}]
        }))
        .unwrap();
        assert_eq!(request.table_name, "people");
        assert_eq!(request.columns[0].name, "age");
        assert_eq!(request.columns[0].column_type, "INT");
    }

    #[test]
    fn test_update_request_distinguishes_absent_from_null() {
        let absent: UpdateColumnRequest =
            serde_json::from_value(json!({"id": 1, "columnName": "c"})).unwrap();
        assert!(absent.value.is_none());
        assert!(absent.validate().is_err());

        let null: UpdateColumnRequest =
            serde_json::from_value(json!({"id": 1, "columnName": "c", "value": null})).unwrap();
        assert_eq!(null.value, Some(Value::Null));
        let (id, column, value) = null.validate().unwrap();
        assert_eq!(id, 1);
        assert_eq!(column, "c");
        assert!(value.is_null());
    }

    #[test]
    fn test_update_request_validation_message() {
        let request: UpdateColumnRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(
            request.validate().unwrap_err(),
            "Invalid input: id, columnName, and value are required."
        );
    }

    #[test]
    fn test_update_request_rejects_empty_column_name() {
        let request: UpdateColumnRequest =
            serde_json::from_value(json!({"id": 1, "columnName": "", "value": 2})).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_delete_rows_request_optional_id() {
        let missing: DeleteRowsRequest = serde_json::from_value(json!({})).unwrap();
        assert!(missing.id.is_none());
        let present: DeleteRowsRequest = serde_json::from_value(json!({"id": 4})).unwrap();
        assert_eq!(present.id, Some(4));
    }

    #[test]
    fn test_outcome_response_serialization() {
        let body = serde_json::to_value(OutcomeResponse {
            success: false,
            message: "Error: boom".to_string(),
        })
        .unwrap();
        assert_eq!(body, json!({"success": false, "message": "Error: boom"}));
    }
}
