//! Shared Diesel error mapping for the repositories in this module.

use tracing::debug;

use super::models::RowDecodeError;
use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout(message) | PoolError::Build(message) => message,
    };
    connection(message)
}

/// Map Diesel errors into query/connection constructors.
///
/// Closed connections surface as connection errors; everything else is a
/// query failure.
pub(crate) fn map_basic_diesel_error<E, Q, C>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Name of the violated unique constraint, if `error` is a unique violation.
pub(crate) fn unique_violation(error: &diesel::result::Error) -> Option<String> {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => Some(
            info.constraint_name()
                .unwrap_or("unique constraint")
                .to_owned(),
        ),
        _ => None,
    }
}

/// Failure inside a transaction that also decodes rows.
#[derive(Debug, thiserror::Error)]
pub(crate) enum TransactionError {
    #[error(transparent)]
    Diesel(#[from] diesel::result::Error),
    #[error(transparent)]
    Decode(#[from] RowDecodeError),
}

impl TransactionError {
    /// Route the failure through a repository's query/connection constructors.
    pub(crate) fn map_into<E, Q, C>(self, query: Q, connection: C) -> E
    where
        Q: Fn(String) -> E,
        C: Fn(String) -> E,
    {
        match self {
            Self::Diesel(error) => map_basic_diesel_error(
                error,
                |message| query(message.to_owned()),
                |message| connection(message.to_owned()),
            ),
            Self::Decode(error) => query(decode_failure_message(&error)),
        }
    }
}

/// Log a stored row that failed to decode and return its message.
pub(crate) fn decode_failure_message(error: &RowDecodeError) -> String {
    debug!(%error, "stored row failed to decode");
    error.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Probe {
        Query(String),
        Connection(String),
    }

    fn query(message: &'static str) -> Probe {
        Probe::Query(message.to_owned())
    }

    fn connection(message: &'static str) -> Probe {
        Probe::Connection(message.to_owned())
    }

    #[rstest]
    fn not_found_is_a_query_error() {
        let mapped = map_basic_diesel_error(diesel::result::Error::NotFound, query, connection);
        assert_eq!(mapped, Probe::Query("record not found".to_owned()));
    }

    #[rstest]
    fn pool_checkout_failure_is_a_connection_error() {
        let mapped = map_basic_pool_error(PoolError::Checkout("timed out".to_owned()), Probe::Connection);
        assert_eq!(mapped, Probe::Connection("timed out".to_owned()));
    }

    #[rstest]
    fn non_database_errors_are_not_unique_violations() {
        assert!(unique_violation(&diesel::result::Error::NotFound).is_none());
    }
}
