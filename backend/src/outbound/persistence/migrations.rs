//! Embedded schema migrations.

use diesel::Connection as _;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness as _, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failures while bringing the schema up to date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {message}")]
    Connect { message: String },
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
}

/// Apply pending migrations on a blocking thread.
///
/// # Errors
///
/// Returns [`MigrationError`] when the database is unreachable or a migration
/// fails.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || apply(&url))
        .await
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?
}

fn apply(database_url: &str) -> Result<(), MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| MigrationError::Connect {
        message: err.to_string(),
    })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    info!(applied = applied.len(), "database migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    const CREATE_TABLES: &str =
        include_str!("../../../migrations/2026-01-05-000000_create_layout_tables/up.sql");

    fn column(table: &str, name: &str) -> &'static str {
        let body = CREATE_TABLES
            .split(&format!("CREATE TABLE {table} ("))
            .nth(1)
            .and_then(|rest| rest.split(");").next())
            .expect("table present");
        body.lines()
            .map(str::trim)
            .find(|line| line.starts_with(&format!("{name} ")))
            .expect("column present")
    }

    #[rstest]
    fn text_columns_have_no_length_cap() {
        assert!(!CREATE_TABLES.to_ascii_uppercase().contains("VARCHAR"));
    }

    #[rstest]
    #[case("layouts", "name")]
    #[case("users", "username")]
    #[case("templates", "category")]
    #[case("custom_objects", "object_type")]
    fn free_text_columns_are_unbounded(#[case] table: &str, #[case] name: &str) {
        assert!(column(table, name).starts_with(&format!("{name} TEXT")));
    }

    #[rstest]
    fn template_descriptions_default_to_empty() {
        assert_eq!(
            column("templates", "description"),
            "description TEXT NOT NULL DEFAULT '',"
        );
    }
}
