//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `RepositoryError` from `eventdesk_core::storage`.
//! Specific errors are mapped to semantic variants (e.g., PRIMARY KEY constraint to AlreadyExists).

use eventdesk_core::storage::RepositoryError;

/// Maps a rusqlite error to a RepositoryError.
///
/// # Error Mapping
///
/// - `SQLITE_CONSTRAINT_PRIMARYKEY` / `SQLITE_CONSTRAINT_UNIQUE` → `RepositoryError::AlreadyExists`
/// - `CannotOpen` → `RepositoryError::ConnectionFailed`
/// - `QueryReturnedNoRows` → `RepositoryError::NotFound`
/// - Row conversion failures → `RepositoryError::Serialization`
/// - All other errors → `RepositoryError::QueryFailed`
fn map_rusqlite_error(err: &rusqlite::Error, entity_type: &'static str, id: &str) -> RepositoryError {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepositoryError::AlreadyExists {
                entity_type,
                id: id.to_string(),
            }
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            RepositoryError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
            entity_type,
            id: id.to_string(),
        },

        rusqlite::Error::FromSqlConversionFailure(..) => {
            RepositoryError::Serialization(err.to_string())
        }

        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to a RepositoryError.
///
/// This is the main entry point for error mapping in async code.
/// It extracts the inner `rusqlite::Error` if present, otherwise
/// maps to a generic `QueryFailed` error.
pub fn map_tokio_rusqlite_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
) -> RepositoryError {
    map_tokio_rusqlite_error_with_id(err, entity_type, "unknown")
}

/// Maps a tokio_rusqlite error with a known ID to a RepositoryError.
///
/// Use this variant when the entity ID is known at the call site.
pub fn map_tokio_rusqlite_error_with_id(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    let id_str = id.into();
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => {
            map_rusqlite_error(rusqlite_err, entity_type, &id_str)
        }
        tokio_rusqlite::Error::Close(_) => {
            RepositoryError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::ffi;

    #[test]
    fn test_primary_key_constraint_maps_to_already_exists() {
        let sqlite_err = rusqlite::ffi::Error {
            code: rusqlite::ErrorCode::ConstraintViolation,
            extended_code: ffi::SQLITE_CONSTRAINT_PRIMARYKEY,
        };
        let rusqlite_err = rusqlite::Error::SqliteFailure(sqlite_err, None);
        let err = tokio_rusqlite::Error::Rusqlite(rusqlite_err);

        let result = map_tokio_rusqlite_error_with_id(err, "Event", "evt-1");

        assert_eq!(
            result,
            RepositoryError::AlreadyExists {
                entity_type: "Event",
                id: "evt-1".to_string(),
            }
        );
    }

    #[test]
    fn test_no_rows_maps_to_not_found() {
        let err = tokio_rusqlite::Error::Rusqlite(rusqlite::Error::QueryReturnedNoRows);

        let result = map_tokio_rusqlite_error(err, "Event");

        assert!(matches!(
            result,
            RepositoryError::NotFound {
                entity_type: "Event",
                ..
            }
        ));
    }

    #[test]
    fn test_conversion_failure_maps_to_serialization() {
        let cause = std::io::Error::other("bad json");
        let rusqlite_err = rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            Box::new(cause),
        );
        let err = tokio_rusqlite::Error::Rusqlite(rusqlite_err);

        let result = map_tokio_rusqlite_error(err, "Event");

        assert!(matches!(result, RepositoryError::Serialization(_)));
    }

    #[test]
    fn test_other_error_maps_to_query_failed() {
        // tokio_rusqlite::Error::Close contains a connection, which we can't easily construct
        let err = tokio_rusqlite::Error::Other(Box::new(std::io::Error::other("test error")));

        let result = map_tokio_rusqlite_error(err, "Event");

        assert!(matches!(result, RepositoryError::QueryFailed(_)));
    }
}
