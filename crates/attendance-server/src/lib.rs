pub mod api;
pub mod error;
pub mod rfid_bridge;
pub mod state;

use anyhow::Result;
use application::{AttendanceService, SystemClock};
use domain::{AttendanceRepository, EmployeeRepository};
use infrastructure::config::DatabaseConfig;
use infrastructure::{
    InMemoryAttendanceRepository, InMemoryEmployeeRepository, PostgresAttendanceRepository,
    PostgresEmployeeRepository,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Wire the service to PostgreSQL when a URL is configured, else to
/// process-local storage.
pub async fn build_service(database: &DatabaseConfig) -> Result<Arc<AttendanceService>> {
    let (employees, attendances): (Arc<dyn EmployeeRepository>, Arc<dyn AttendanceRepository>) =
        match &database.url {
            Some(url) => {
                let pool = infrastructure::database::connect(url, database.max_connections).await?;
                info!("✅ Using PostgreSQL storage");
                (
                    Arc::new(PostgresEmployeeRepository::new(pool.clone())),
                    Arc::new(PostgresAttendanceRepository::new(pool)),
                )
            }
            None => {
                warn!("database.url not set, records are kept in memory only");
                (
                    Arc::new(InMemoryEmployeeRepository::new()),
                    Arc::new(InMemoryAttendanceRepository::new()),
                )
            }
        };

    Ok(Arc::new(AttendanceService::new(
        employees,
        attendances,
        Arc::new(SystemClock),
    )))
}
