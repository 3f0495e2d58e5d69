mod attendance_repository;
mod employee_repository;

pub use attendance_repository::PostgresAttendanceRepository;
pub use employee_repository::PostgresEmployeeRepository;

use anyhow::Result;
use domain::DomainError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// Open a connection pool and bring the schema up to date
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!(max_connections, "Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("✅ Migrations applied successfully");
    Ok(())
}

/// Constraint violations surface as the domain error they stand for;
/// everything else is a storage failure.
pub(crate) fn map_db_error(e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return DomainError::Conflict(format!(
                "unique constraint violated: {}",
                db_err.constraint().unwrap_or(db_err.message())
            ));
        }
        if db_err.is_check_violation() {
            return DomainError::InvalidState(format!(
                "check constraint violated: {}",
                db_err.constraint().unwrap_or(db_err.message())
            ));
        }
    }
    DomainError::Storage(format!("Database error: {}", e))
}
