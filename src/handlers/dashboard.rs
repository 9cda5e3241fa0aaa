//! Dashboard handler: key metrics and visual insights

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use crate::catalog;
use crate::stats::{self, Chart, ChartKind, Metric, MetricUnit};
use crate::store;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub metrics: Vec<Metric>,
    pub charts: Vec<Chart>,
    pub notices: Vec<String>,
}

struct MetricQuery {
    key: &'static str,
    label: &'static str,
    sql: &'static str,
    column: &'static str,
    unit: MetricUnit,
}

const METRICS: &[MetricQuery] = &[
    MetricQuery {
        key: "avg_stop_duration",
        label: "Avg Stop Duration",
        sql: catalog::AVG_STOP_DURATION,
        column: "average_stop_duration",
        unit: MetricUnit::Minutes,
    },
    MetricQuery {
        key: "avg_driver_age",
        label: "Avg Driver Age",
        sql: catalog::AVG_DRIVER_AGE,
        column: "avg_driver_age",
        unit: MetricUnit::Years,
    },
    MetricQuery {
        key: "arrest_rate",
        label: "Arrest Rate",
        sql: catalog::ARREST_RATE,
        column: "arrest_rate",
        unit: MetricUnit::Percent,
    },
    MetricQuery {
        key: "peak_hour",
        label: "Peak Stop Hour",
        sql: catalog::PEAK_HOUR,
        column: "peak_hour",
        unit: MetricUnit::Hour,
    },
    MetricQuery {
        key: "top_violation",
        label: "Top Violation",
        sql: catalog::TOP_VIOLATION,
        column: "violation",
        unit: MetricUnit::Plain,
    },
];

/// Key metrics plus the violation and gender charts.
///
/// Each query degrades independently: a failing one leaves its metric at the
/// placeholder and adds a notice, the rest still render.
pub async fn summary(State(state): State<AppState>) -> Json<DashboardResponse> {
    let db = state.store.as_ref();
    let mut notices = Vec::new();
    let mut metrics = Vec::with_capacity(METRICS.len());

    for query in METRICS {
        let fetched = store::fetch_or_empty(db, query.sql).await;
        notices.extend(fetched.error);
        metrics.push(Metric::new(
            query.key,
            query.label,
            stats::scalar(&fetched.data, query.column),
            query.unit,
        ));
    }

    let violations = store::fetch_or_empty(db, catalog::VIOLATION_COUNTS).await;
    notices.extend(violations.error);
    let gender = store::fetch_or_empty(db, catalog::GENDER_DISTRIBUTION).await;
    notices.extend(gender.error);

    let charts = vec![
        Chart::from_table(
            ChartKind::Bar,
            "Stops by Violation",
            &violations.data,
            ("violation", "Violation"),
            ("total_stops", "Number of Stops"),
        ),
        Chart::from_table(
            ChartKind::Donut,
            "Driver Gender Distribution",
            &gender.data,
            ("driver_gender", "Driver Gender"),
            ("total", "Stops"),
        ),
    ];

    tracing::debug!("Dashboard rendered with {} notices", notices.len());

    Json(DashboardResponse { metrics, charts, notices })
}
