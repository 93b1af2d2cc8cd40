//! Shared error mapping for sqlx persistence layer

use application::error::ApplicationError;

/// Map a sqlx error to an application-layer error
pub fn map_sqlx_error(e: sqlx::Error) -> ApplicationError {
    match e {
        sqlx::Error::Database(db_err) => {
            ApplicationError::PersistenceFailed(format!("Database error: {db_err}"))
        },
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            ApplicationError::PersistenceFailed("Database pool unavailable".to_string())
        },
        other => ApplicationError::PersistenceFailed(format!("Database error: {other}")),
    }
}
