use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use tracing::debug;

use crate::common::DatabaseError;

/// `SELECT 1` round trip, for readiness probes
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
    db.query_one_raw(stmt)
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))?;

    debug!("PostgreSQL health check passed");
    Ok(())
}

/// Verify that an extension is installed in the connected database.
///
/// Spatial queries fail at runtime without `postgis`, so readiness
/// checks it explicitly rather than waiting for the first search.
pub async fn check_extension(db: &DatabaseConnection, extension: &str) -> Result<(), DatabaseError> {
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        "SELECT extname FROM pg_extension WHERE extname = $1",
        [extension.into()],
    );

    let row = db
        .query_one_raw(stmt)
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))?;

    match row {
        Some(_) => Ok(()),
        None => Err(DatabaseError::MissingExtension(extension.to_string())),
    }
}
