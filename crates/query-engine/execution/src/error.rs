//! Errors for query execution.

/// How a database call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseErrorKind {
    ConnectionLost,
    Timeout,
    ConstraintViolation,
    Unknown,
}

impl DatabaseErrorKind {
    /// A short label used in logs and metrics.
    pub fn label(self) -> &'static str {
        match self {
            DatabaseErrorKind::ConnectionLost => "connection_lost",
            DatabaseErrorKind::Timeout => "timeout",
            DatabaseErrorKind::ConstraintViolation => "constraint_violation",
            DatabaseErrorKind::Unknown => "unknown",
        }
    }
}

/// A failed database call. The message is for logs only, never for clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("database error ({}): {message}", .kind.label())]
pub struct DatabaseError {
    pub kind: DatabaseErrorKind,
    pub message: String,
}

impl DatabaseError {
    pub fn new(kind: DatabaseErrorKind, message: impl Into<String>) -> DatabaseError {
        DatabaseError {
            kind,
            message: message.into(),
        }
    }

    /// The deadline of the request passed before the database answered.
    pub fn timeout() -> DatabaseError {
        DatabaseError::new(DatabaseErrorKind::Timeout, "deadline elapsed")
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> DatabaseError {
        let kind = match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => DatabaseErrorKind::ConnectionLost,
            sqlx::Error::PoolTimedOut => DatabaseErrorKind::Timeout,
            sqlx::Error::Database(db_error) => db_error
                .code()
                .map_or(DatabaseErrorKind::Unknown, |code| sqlstate_kind(&code)),
            _ => DatabaseErrorKind::Unknown,
        };
        DatabaseError::new(kind, err.to_string())
    }
}

/// Classify a PostgreSQL SQLSTATE code.
fn sqlstate_kind(code: &str) -> DatabaseErrorKind {
    match code {
        // query_canceled, raised by statement_timeout
        "57014" => DatabaseErrorKind::Timeout,
        // admin_shutdown, crash_shutdown, cannot_connect_now
        "57P01" | "57P02" | "57P03" => DatabaseErrorKind::ConnectionLost,
        code if code.starts_with("08") => DatabaseErrorKind::ConnectionLost,
        code if code.starts_with("23") => DatabaseErrorKind::ConstraintViolation,
        _ => DatabaseErrorKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_sqlstates() {
        assert_eq!(sqlstate_kind("23505"), DatabaseErrorKind::ConstraintViolation);
        assert_eq!(sqlstate_kind("08006"), DatabaseErrorKind::ConnectionLost);
        assert_eq!(sqlstate_kind("57P01"), DatabaseErrorKind::ConnectionLost);
        assert_eq!(sqlstate_kind("57014"), DatabaseErrorKind::Timeout);
        assert_eq!(sqlstate_kind("42P01"), DatabaseErrorKind::Unknown);
    }

    #[test]
    fn classifies_driver_errors() {
        assert_eq!(
            DatabaseError::from(sqlx::Error::PoolTimedOut).kind,
            DatabaseErrorKind::Timeout
        );
        assert_eq!(
            DatabaseError::from(sqlx::Error::PoolClosed).kind,
            DatabaseErrorKind::ConnectionLost
        );
        assert_eq!(
            DatabaseError::from(sqlx::Error::RowNotFound).kind,
            DatabaseErrorKind::Unknown
        );
    }
}
