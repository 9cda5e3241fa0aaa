//! Traffic stop model

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection};
use chrono::{NaiveDate, NaiveTime};

/// One row of `police_logs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StopRecord {
    pub id: i64,
    pub stop_date: Option<NaiveDate>,
    pub stop_time: Option<NaiveTime>,
    pub country_name: Option<String>,
    pub driver_gender: Option<String>,
    pub driver_age: Option<i32>,
    pub driver_race: Option<String>,
    pub violation: Option<String>,
    pub search_conducted: Option<bool>,
    pub search_type: Option<String>,
    pub drug_related_stop: Option<bool>,
    pub stop_outcome: Option<String>,
    pub is_arrested: Option<bool>,
    pub stop_duration: Option<String>,
    pub vehicle_number: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct StopListParams {
    pub limit: Option<i64>,
}

impl StopRecord {
    /// First `limit` rows in import order.
    pub async fn list(conn: &mut PgConnection, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, StopRecord>("SELECT * FROM police_logs ORDER BY id LIMIT $1")
            .bind(limit)
            .fetch_all(conn)
            .await
    }

    /// Full historical dataset in import order.
    pub async fn load_all(conn: &mut PgConnection) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, StopRecord>("SELECT * FROM police_logs ORDER BY id")
            .fetch_all(conn)
            .await
    }
}

#[cfg(test)]
impl StopRecord {
    /// Minimal record for tests; everything outside the predictor's fields is unset.
    pub fn fixture(id: i64, gender: &str, age: i32, violation: &str, outcome: &str) -> Self {
        Self {
            id,
            stop_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            stop_time: NaiveTime::from_hms_opt(14, 30, 0),
            country_name: Some("Canada".to_string()),
            driver_gender: Some(gender.to_string()),
            driver_age: Some(age),
            driver_race: None,
            violation: Some(violation.to_string()),
            search_conducted: Some(false),
            search_type: None,
            drug_related_stop: Some(false),
            stop_outcome: Some(outcome.to_string()),
            is_arrested: Some(false),
            stop_duration: Some("0-15 Min".to_string()),
            vehicle_number: Some(format!("VEH{id:04}")),
        }
    }
}
