//! Database module - PostgreSQL connection and schema

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Create database connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Postgres rejects multiple statements in one prepared query
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
///
/// Rows are loaded by an external import; `id` preserves import order.
const SCHEMA_SQL: &str = r#"
-- Traffic stops
CREATE TABLE IF NOT EXISTS police_logs (
    id BIGSERIAL PRIMARY KEY,
    stop_date DATE,
    stop_time TIME,
    country_name VARCHAR(100),
    driver_gender VARCHAR(10),
    driver_age INT,
    driver_race VARCHAR(50),
    violation VARCHAR(100),
    search_conducted BOOLEAN,
    search_type VARCHAR(100),
    drug_related_stop BOOLEAN,
    stop_outcome VARCHAR(50),
    is_arrested BOOLEAN,
    stop_duration VARCHAR(50),
    vehicle_number VARCHAR(50)
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_police_logs_violation ON police_logs(violation);
CREATE INDEX IF NOT EXISTS idx_police_logs_country ON police_logs(country_name);
CREATE INDEX IF NOT EXISTS idx_police_logs_driver ON police_logs(driver_gender, driver_age);
CREATE INDEX IF NOT EXISTS idx_police_logs_vehicle ON police_logs(vehicle_number);
"#;
