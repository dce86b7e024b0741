//! Store error types.
//!
//! thiserror provides the derives, miette the diagnostic codes that
//! surface in logs and CLI output. Variants classify failures the way
//! callers need them: connection problems, migration problems, failed
//! statements, and exceeded time budgets.

use miette::Diagnostic;
use thiserror::Error;

/// Store operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Connection error: {message}")]
    #[diagnostic(code(tagreg::db::connection_error))]
    Connection { message: String },

    #[error("Migration error: {message}")]
    #[diagnostic(code(tagreg::db::migration_error))]
    Migration { message: String },

    #[error("Database error: {message}")]
    #[diagnostic(code(tagreg::db::database_error))]
    Database { message: String },

    #[error("Query exceeded the {seconds}s time budget")]
    #[diagnostic(
        code(tagreg::db::timeout),
        help("Narrow the filters, or raise --query-timeout if the register is large.")
    )]
    Timeout { seconds: u64 },
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => DbError::Connection {
                message: e.to_string(),
            },
            _ => DbError::Database {
                message: e.to_string(),
            },
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration {
            message: e.to_string(),
        }
    }
}

/// Result type for store operations.
pub type DbResult<T> = Result<T, DbError>;
