//! Dynamic SQL construction.
//!
//! Every statement in this crate is assembled at runtime from client-supplied
//! table and column names. Identifiers are always double-quoted (with embedded
//! quotes doubled) before they are spliced into the statement text, and column
//! type expressions are checked against a strict character allow-list since
//! they cannot be quoted. Values never appear in the text: they bind to `$N`
//! placeholders, except for NULL which is emitted as a literal keyword so the
//! slot stays untyped.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{TableError, TableResult};

/// A column definition for CREATE TABLE.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,
    /// SQL type expression (e.g. `TEXT`, `NUMERIC(10, 2)`)
    #[serde(rename = "type")]
    pub column_type: String,
}

/// A SQL statement together with the values for its `$N` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Statement text with `$1..$N` placeholders
    pub text: String,
    /// Bind values in placeholder order
    pub binds: Vec<Value>,
}

/// Quote a client-supplied identifier for splicing into statement text.
///
/// A quoted PostgreSQL identifier accepts any character once embedded double
/// quotes are doubled. Empty names are invalid identifiers and NUL bytes
/// cannot be represented in the wire protocol, so both are rejected up front.
pub fn quote_ident(raw: &str) -> TableResult<String> {
    if raw.is_empty() {
        return Err(TableError::invalid("Identifier must not be empty."));
    }
    if raw.contains('\0') {
        return Err(TableError::invalid("Identifier must not contain NUL bytes."));
    }
    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');
    for ch in raw.chars() {
        if ch == '"' {
            quoted.push('"');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    Ok(quoted)
}

/// Validate a column type expression (e.g. `VARCHAR(255)`, `NUMERIC(10, 2)`).
///
/// Type expressions cannot be identifier-quoted, so they are restricted to a
/// character set that covers the type grammar but cannot terminate the
/// statement, quote a string, or open a comment.
pub fn check_type_expr(raw: &str) -> TableResult<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TableError::invalid("Column type must not be empty."));
    }
    let allowed = trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '(' | ')' | ',' | '_' | '[' | ']'));
    if !allowed {
        return Err(TableError::invalid(format!(
            "Unsupported column type expression: '{trimmed}'"
        )));
    }
    Ok(trimmed)
}

/// CREATE TABLE with an `id SERIAL PRIMARY KEY` column plus the given columns.
pub fn create_table(table: &str, columns: &[ColumnSpec]) -> TableResult<String> {
    let table = quote_ident(table)?;
    let mut definitions = Vec::with_capacity(columns.len());
    for column in columns {
        let name = quote_ident(&column.name)?;
        let type_expr = check_type_expr(&column.column_type)?;
        definitions.push(format!("{name} {type_expr}"));
    }
    if definitions.is_empty() {
        Ok(format!("CREATE TABLE {table} (id SERIAL PRIMARY KEY);"))
    } else {
        Ok(format!(
            "CREATE TABLE {table} (id SERIAL PRIMARY KEY, {});",
            definitions.join(", ")
        ))
    }
}

/// Multi-row INSERT over the union of keys present across all rows.
///
/// Columns appear in first-seen order. A slot whose row lacks the key, or
/// holds an explicit JSON null, becomes a literal NULL; everything else binds
/// to a placeholder.
pub fn insert_rows(table: &str, rows: &[Map<String, Value>]) -> TableResult<Statement> {
    let table = quote_ident(table)?;
    if rows.is_empty() {
        return Err(TableError::invalid(
            "Insert payload must contain at least one row.",
        ));
    }

    let mut seen = HashSet::new();
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if seen.insert(key.as_str()) {
                columns.push(key);
            }
        }
    }
    if columns.is_empty() {
        return Err(TableError::invalid(
            "Insert payload must name at least one column.",
        ));
    }

    let column_list = columns
        .iter()
        .map(|column| quote_ident(column))
        .collect::<TableResult<Vec<_>>>()?
        .join(", ");

    let mut binds = Vec::new();
    let mut tuples = Vec::with_capacity(rows.len());
    for row in rows {
        let mut slots = Vec::with_capacity(columns.len());
        for column in &columns {
            match row.get(*column) {
                None | Some(Value::Null) => slots.push("NULL".to_string()),
                Some(value) => {
                    binds.push(value.clone());
                    slots.push(format!("${}", binds.len()));
                }
            }
        }
        tuples.push(format!("({})", slots.join(", ")));
    }

    Ok(Statement {
        text: format!(
            "INSERT INTO {table} ({column_list}) VALUES {};",
            tuples.join(", ")
        ),
        binds,
    })
}

/// SELECT every column of every row.
pub fn select_rows(table: &str) -> TableResult<String> {
    Ok(format!("SELECT * FROM {}", quote_ident(table)?))
}

/// ALTER TABLE .. ADD COLUMN.
pub fn add_column(table: &str, column: &str, column_type: &str) -> TableResult<String> {
    Ok(format!(
        "ALTER TABLE {} ADD COLUMN {} {};",
        quote_ident(table)?,
        quote_ident(column)?,
        check_type_expr(column_type)?
    ))
}

/// UPDATE one column of one row, returning the id when a row matched.
///
/// An explicit JSON null is emitted as a literal NULL instead of a bound
/// parameter: a bound null carries a concrete wire type and fails the
/// assignment cast on columns of any other type.
pub fn update_column(table: &str, column: &str, value: &Value, id: i64) -> TableResult<Statement> {
    let table = quote_ident(table)?;
    let column = quote_ident(column)?;
    if value.is_null() {
        Ok(Statement {
            text: format!("UPDATE {table} SET {column} = NULL WHERE id = $1 RETURNING id"),
            binds: vec![Value::from(id)],
        })
    } else {
        Ok(Statement {
            text: format!("UPDATE {table} SET {column} = $1 WHERE id = $2 RETURNING id"),
            binds: vec![value.clone(), Value::from(id)],
        })
    }
}

/// DELETE one row by id, returning the id when a row matched.
///
/// The RETURNING clause makes the delete and the existence check a single
/// atomic statement.
pub fn delete_row(table: &str, id: i64) -> TableResult<Statement> {
    Ok(Statement {
        text: format!(
            "DELETE FROM {} WHERE id = $1 RETURNING id",
            quote_ident(table)?
        ),
        binds: vec![Value::from(id)],
    })
}

/// ALTER TABLE .. DROP COLUMN IF EXISTS.
pub fn drop_column(table: &str, column: &str) -> TableResult<String> {
    Ok(format!(
        "ALTER TABLE {} DROP COLUMN IF EXISTS {};",
        quote_ident(table)?,
        quote_ident(column)?
    ))
}

/// DROP TABLE IF EXISTS.
pub fn drop_table(table: &str) -> TableResult<String> {
    Ok(format!("DROP TABLE IF EXISTS {};", quote_ident(table)?))
}
