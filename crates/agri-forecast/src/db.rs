//! Database bootstrap: pool construction and the startup connectivity check.

use std::str::FromStr;

use agri_core::{DatabaseError, DatabaseSettings};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

/// Extension trait for classifying sqlx errors raised while connecting.
pub trait SqlxErrorExt {
    fn classify_startup_error(self) -> DatabaseError;
}

impl SqlxErrorExt for sqlx::Error {
    fn classify_startup_error(self) -> DatabaseError {
        match &self {
            sqlx::Error::Configuration(_) => DatabaseError::Argument(self.to_string()),
            sqlx::Error::Database(_)
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_) => DatabaseError::Driver(self.to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::WorkerCrashed => {
                DatabaseError::InvalidOperation(self.to_string())
            }
            _ => DatabaseError::Unexpected(self.to_string()),
        }
    }
}

/// Build a connection pool from resolved settings.
///
/// The pool connects lazily; call [`verify_connection`] to fail fast.
/// Must be called from within a tokio runtime.
pub fn connect(settings: &DatabaseSettings) -> Result<PgPool, DatabaseError> {
    let options = PgConnectOptions::from_str(settings.connection_string())
        .map_err(SqlxErrorExt::classify_startup_error)?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_lazy_with(options);

    tracing::debug!("Database pool created for {}", settings.target());
    Ok(pool)
}

/// Open one connection and run a trivial query.
pub async fn verify_connection(pool: &PgPool, target: &str) -> Result<(), DatabaseError> {
    tracing::info!("Testing database connection to {}...", target);

    let result = async {
        let mut conn = pool.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok::<_, sqlx::Error>(())
    }
    .await;

    let outcome = match result {
        Ok(()) => {
            tracing::info!("Database connection successful.");
            Ok(())
        }
        Err(e) => {
            let err = e.classify_startup_error();
            tracing::error!("{}", err);
            Err(err)
        }
    };

    tracing::info!("Database connection test complete.");
    outcome
}
