//! Error types and failure classification for table operations.
//!
//! Driver failures are classified by SQLSTATE code rather than by matching
//! substrings of the error text. The substring check survives only as a
//! fallback for errors that carry no code at all.

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

/// Broad classification of a database failure.
///
/// The class decides how a failure is reported (the fetch route turns
/// `NotFound` into a 404) and what `code` the error body carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// A referenced table or row does not exist
    NotFound,
    /// The statement collided with existing state (duplicate table, constraint)
    Conflict,
    /// The statement or its inputs were rejected as invalid
    Validation,
    /// A failure that may succeed on retry (connection, deadlock, resources)
    Transient,
    /// Anything that could not be classified
    Unknown,
}

impl ErrorClass {
    /// Error code string for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorClass::NotFound => "NOT_FOUND",
            ErrorClass::Conflict => "CONFLICT",
            ErrorClass::Validation => "VALIDATION",
            ErrorClass::Transient => "TRANSIENT",
            ErrorClass::Unknown => "DATABASE_ERROR",
        }
    }
}

/// Error type for table operations
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Input rejected before any statement reached the database.
    #[error("{0}")]
    Invalid(String),

    /// The referenced table is missing. Raised by fetch, which maps it to 404.
    #[error("Table '{table}' does not exist.")]
    MissingTable { table: String },

    /// A statement failed inside PostgreSQL.
    #[error("{message}")]
    Database { class: ErrorClass, message: String },
}

impl TableError {
    /// Create a validation error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// Wrap a driver error, classifying it by SQLSTATE.
    pub fn database(err: sqlx::Error) -> Self {
        Self::Database {
            class: classify(&err),
            message: driver_message(&err),
        }
    }

    /// The classification of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            TableError::Invalid(_) => ErrorClass::Validation,
            TableError::MissingTable { .. } => ErrorClass::NotFound,
            TableError::Database { class, .. } => *class,
        }
    }
}

/// Classify a driver error.
///
/// Database errors are classified by SQLSTATE when one is present, falling
/// back to [`classify_message`] otherwise. Pool and I/O failures are
/// transient by definition.
pub fn classify(err: &sqlx::Error) -> ErrorClass {
    match err {
        sqlx::Error::Database(db) => db
            .code()
            .and_then(|code| classify_sqlstate(&code))
            .unwrap_or_else(|| classify_message(db.message())),
        sqlx::Error::RowNotFound => ErrorClass::NotFound,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::WorkerCrashed => {
            ErrorClass::Transient
        }
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::Protocol(_) => {
            ErrorClass::Transient
        }
        other => classify_message(&other.to_string()),
    }
}

/// Classify a PostgreSQL SQLSTATE code.
///
/// Returns `None` for codes outside the handled set so the caller can fall
/// back to message inspection.
pub fn classify_sqlstate(code: &str) -> Option<ErrorClass> {
    // Specific codes first, then whole classes by two-character prefix.
    match code {
        "42P01" => return Some(ErrorClass::NotFound), // undefined_table
        "42P07" => return Some(ErrorClass::Conflict), // duplicate_table
        "42701" => return Some(ErrorClass::Conflict), // duplicate_column
        "40001" | "40P01" => return Some(ErrorClass::Transient), // serialization, deadlock
        "57014" => return Some(ErrorClass::Transient), // query_canceled
        _ => {}
    }
    match code.get(0..2)? {
        "22" => Some(ErrorClass::Validation), // data exception
        "23" => Some(ErrorClass::Conflict),   // integrity constraint violation
        "42" => Some(ErrorClass::Validation), // syntax error or access rule violation
        "08" => Some(ErrorClass::Transient),  // connection exception
        "53" => Some(ErrorClass::Transient),  // insufficient resources
        _ => None,
    }
}

/// Classify an error by its message text.
///
/// Fallback for errors without a SQLSTATE. The substrings match what
/// PostgreSQL and MySQL emit for missing tables.
pub fn classify_message(message: &str) -> ErrorClass {
    let lower = message.to_lowercase();
    if lower.contains("does not exist") || lower.contains("unknown table") {
        ErrorClass::NotFound
    } else if lower.contains("already exists") || lower.contains("duplicate") {
        ErrorClass::Conflict
    } else if lower.contains("timed out")
        || lower.contains("timeout")
        || lower.contains("connection")
    {
        ErrorClass::Transient
    } else {
        ErrorClass::Unknown
    }
}

/// The raw driver message, without sqlx's "error returned from database" framing.
pub fn driver_message(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db) => db.message().to_string(),
        other => other.to_string(),
    }
}
