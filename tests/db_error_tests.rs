//! Tests for db::error classification.

use dyntable::db::{classify, classify_message, classify_sqlstate, ErrorClass, TableError};

#[test]
fn test_sqlstate_undefined_table_is_not_found() {
    assert_eq!(classify_sqlstate("42P01"), Some(ErrorClass::NotFound));
}

#[test]
fn test_sqlstate_duplicates_are_conflicts() {
    assert_eq!(classify_sqlstate("42P07"), Some(ErrorClass::Conflict));
    assert_eq!(classify_sqlstate("42701"), Some(ErrorClass::Conflict));
    assert_eq!(classify_sqlstate("23505"), Some(ErrorClass::Conflict));
}

#[test]
fn test_sqlstate_validation_classes() {
    // undefined_column, datatype_mismatch, syntax_error, data exceptions
    assert_eq!(classify_sqlstate("42703"), Some(ErrorClass::Validation));
    assert_eq!(classify_sqlstate("42804"), Some(ErrorClass::Validation));
    assert_eq!(classify_sqlstate("42601"), Some(ErrorClass::Validation));
    assert_eq!(classify_sqlstate("22P02"), Some(ErrorClass::Validation));
}

#[test]
fn test_sqlstate_transient_classes() {
    assert_eq!(classify_sqlstate("40001"), Some(ErrorClass::Transient));
    assert_eq!(classify_sqlstate("40P01"), Some(ErrorClass::Transient));
    assert_eq!(classify_sqlstate("57014"), Some(ErrorClass::Transient));
    assert_eq!(classify_sqlstate("08006"), Some(ErrorClass::Transient));
    assert_eq!(classify_sqlstate("53300"), Some(ErrorClass::Transient));
}

#[test]
fn test_sqlstate_unhandled_codes_are_none() {
    assert_eq!(classify_sqlstate("P0001"), None);
    assert_eq!(classify_sqlstate("XX000"), None);
    assert_eq!(classify_sqlstate(""), None);
    assert_eq!(classify_sqlstate("4"), None);
}

#[test]
fn test_message_fallback_not_found_substrings() {
    assert_eq!(
        classify_message("relation \"people\" does not exist"),
        ErrorClass::NotFound
    );
    assert_eq!(
        classify_message("Unknown table 'db.people'"),
        ErrorClass::NotFound
    );
}

#[test]
fn test_message_fallback_is_case_insensitive() {
    assert_eq!(
        classify_message("Table 'x' DOES NOT EXIST"),
        ErrorClass::NotFound
    );
}

#[test]
fn test_message_fallback_conflict_and_transient() {
    assert_eq!(
        classify_message("relation \"people\" already exists"),
        ErrorClass::Conflict
    );
    assert_eq!(classify_message("connection refused"), ErrorClass::Transient);
    assert_eq!(classify_message("statement timeout"), ErrorClass::Transient);
}

#[test]
fn test_message_fallback_unknown() {
    assert_eq!(classify_message("something odd happened"), ErrorClass::Unknown);
}

#[test]
fn test_classify_driver_variants() {
    assert_eq!(classify(&sqlx::Error::RowNotFound), ErrorClass::NotFound);
    assert_eq!(classify(&sqlx::Error::PoolTimedOut), ErrorClass::Transient);
    assert_eq!(classify(&sqlx::Error::PoolClosed), ErrorClass::Transient);
}

#[test]
fn test_missing_table_display() {
    let err = TableError::MissingTable {
        table: "ghost".to_string(),
    };
    assert_eq!(err.to_string(), "Table 'ghost' does not exist.");
    assert_eq!(err.class(), ErrorClass::NotFound);
}

#[test]
fn test_invalid_display_is_the_message() {
    let err = TableError::invalid("id is required.");
    assert_eq!(err.to_string(), "id is required.");
    assert_eq!(err.class(), ErrorClass::Validation);
}

#[test]
fn test_database_display_is_the_wrapped_message() {
    let err = TableError::Database {
        class: ErrorClass::Unknown,
        message: "Error fetching data from table 't': boom".to_string(),
    };
    assert_eq!(err.to_string(), "Error fetching data from table 't': boom");
    assert_eq!(err.class(), ErrorClass::Unknown);
}

#[test]
fn test_error_class_codes() {
    assert_eq!(ErrorClass::NotFound.code(), "NOT_FOUND");
    assert_eq!(ErrorClass::Conflict.code(), "CONFLICT");
    assert_eq!(ErrorClass::Validation.code(), "VALIDATION");
    assert_eq!(ErrorClass::Transient.code(), "TRANSIENT");
    assert_eq!(ErrorClass::Unknown.code(), "DATABASE_ERROR");
}
