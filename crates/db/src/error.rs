//! Conversions from storage failures into [`CoreError`].

use showcase_core::error::CoreError;

/// PostgreSQL SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Map a sqlx error onto the domain taxonomy. Duplicate keys become
/// `Conflict`; everything else is an upstream failure of the database.
pub fn from_sqlx(entity: &'static str, err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return CoreError::Conflict(format!("{entity} with this id already exists"));
        }
    }
    tracing::error!(entity, error = %err, "Database error");
    CoreError::Upstream(format!("Database error: {err}"))
}

pub fn from_io(context: &str, err: std::io::Error) -> CoreError {
    CoreError::Persistence(format!("{context}: {err}"))
}

pub fn from_json(context: &str, err: serde_json::Error) -> CoreError {
    CoreError::Persistence(format!("{context}: {err}"))
}
