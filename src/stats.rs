//! Scalar extraction for summary queries

use serde::Serialize;

use crate::models::{Cell, Table};

/// Shown in place of a metric whose query produced nothing.
pub const PLACEHOLDER: &str = "N/A";

/// First-row value of `column`.
///
/// Falls back to the only column when the name does not match (aliases
/// differ between SQL dialects). Returns `None` for an empty table or when
/// neither rule applies.
pub fn scalar<'a>(table: &'a Table, column: &str) -> Option<&'a Cell> {
    if table.is_empty() {
        return None;
    }

    if let Some(idx) = table.column_index(column) {
        return table.get(0, idx);
    }

    if table.columns.len() == 1 {
        return table.get(0, 0);
    }

    None
}

/// Unit attached to a metric's display value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricUnit {
    Minutes,
    Years,
    Percent,
    Hour,
    Plain,
}

impl MetricUnit {
    fn render(&self, value: &Cell) -> String {
        match self {
            MetricUnit::Minutes => format!("{value} min"),
            MetricUnit::Years => format!("{value} yrs"),
            MetricUnit::Percent => format!("{value}%"),
            MetricUnit::Hour => format!("{value}:00"),
            MetricUnit::Plain => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub key: &'static str,
    pub label: &'static str,
    pub value: Option<Cell>,
    pub display: String,
}

impl Metric {
    /// NULL is treated like an absent value (AVG over no rows).
    pub fn new(key: &'static str, label: &'static str, value: Option<&Cell>, unit: MetricUnit) -> Self {
        let value = value.filter(|v| !v.is_null()).cloned();
        let display = value
            .as_ref()
            .map_or_else(|| PLACEHOLDER.to_string(), |v| unit.render(v));

        Self { key, label, value, display }
    }
}

/// Label/value pair of a chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Donut,
}

/// Chart specification handed to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub points: Vec<ChartPoint>,
}

impl Chart {
    /// Build points from a label column and a numeric column. Rows with a
    /// non-numeric value are skipped; NULL labels become "Unknown".
    pub fn from_table(
        kind: ChartKind,
        title: &'static str,
        table: &Table,
        (label_col, x_label): (&str, &'static str),
        (value_col, y_label): (&str, &'static str),
    ) -> Self {
        let points = match (table.column_index(label_col), table.column_index(value_col)) {
            (Some(l), Some(v)) => table
                .rows
                .iter()
                .filter_map(|row| {
                    let value = row.get(v)?.as_f64()?;
                    let label = match row.get(l)? {
                        Cell::Null => "Unknown".to_string(),
                        cell => cell.to_string(),
                    };
                    Some(ChartPoint { label, value })
                })
                .collect(),
            _ => Vec::new(),
        };

        Self { kind, title, x_label, y_label, points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(column: &str, value: Cell) -> Table {
        Table::new(vec![column.to_string()], vec![vec![value]])
    }

    #[test]
    fn test_empty_table_is_absent() {
        assert_eq!(scalar(&Table::empty(), "avg_driver_age"), None);

        let no_rows = Table::new(vec!["avg_driver_age".to_string()], vec![]);
        assert_eq!(scalar(&no_rows, "avg_driver_age"), None);
    }

    #[test]
    fn test_named_column() {
        let table = Table::new(
            vec!["peak_hour".to_string(), "cnt".to_string()],
            vec![vec![Cell::Int(22), Cell::Int(310)], vec![Cell::Int(9), Cell::Int(200)]],
        );
        assert_eq!(scalar(&table, "peak_hour"), Some(&Cell::Int(22)));
        assert_eq!(scalar(&table, "cnt"), Some(&Cell::Int(310)));
    }

    #[test]
    fn test_single_column_fallback() {
        let table = single("AVG(driver_age)", Cell::Float(34.2));
        assert_eq!(scalar(&table, "avg_driver_age"), Some(&Cell::Float(34.2)));
    }

    #[test]
    fn test_missing_column_among_many() {
        let table = Table::new(
            vec!["violation".to_string(), "cnt".to_string()],
            vec![vec![Cell::from("Speeding"), Cell::Int(10)]],
        );
        assert_eq!(scalar(&table, "top_violation"), None);
    }

    #[test]
    fn test_metric_display() {
        let table = single("average_stop_duration", Cell::Float(12.5));
        let metric = Metric::new(
            "avg_stop_duration",
            "Avg Stop Duration",
            scalar(&table, "average_stop_duration"),
            MetricUnit::Minutes,
        );
        assert_eq!(metric.display, "12.5 min");

        let hour = Metric::new("peak_hour", "Peak Stop Hour", Some(&Cell::Int(22)), MetricUnit::Hour);
        assert_eq!(hour.display, "22:00");

        let rate = Metric::new("arrest_rate", "Arrest Rate", Some(&Cell::Float(3.75)), MetricUnit::Percent);
        assert_eq!(rate.display, "3.75%");
    }

    #[test]
    fn test_metric_placeholder_not_zero() {
        let absent = Metric::new("avg_driver_age", "Avg Driver Age", None, MetricUnit::Years);
        assert_eq!(absent.display, PLACEHOLDER);
        assert_eq!(absent.value, None);

        let null = Metric::new("avg_driver_age", "Avg Driver Age", Some(&Cell::Null), MetricUnit::Years);
        assert_eq!(null.display, PLACEHOLDER);
        assert_eq!(null.value, None);
    }

    #[test]
    fn test_chart_from_table() {
        let table = Table::new(
            vec!["driver_gender".to_string(), "total".to_string()],
            vec![
                vec![Cell::from("male"), Cell::Int(60)],
                vec![Cell::from("female"), Cell::Int(35)],
                vec![Cell::Null, Cell::Int(5)],
                vec![Cell::from("other"), Cell::Null],
            ],
        );
        let chart = Chart::from_table(
            ChartKind::Donut,
            "Driver Gender Distribution",
            &table,
            ("driver_gender", "Gender"),
            ("total", "Stops"),
        );
        let labels: Vec<&str> = chart.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["male", "female", "Unknown"]);
        assert_eq!(chart.points[0].value, 60.0);

        let missing = Chart::from_table(
            ChartKind::Bar,
            "Stops by Violation",
            &table,
            ("violation", "Violation"),
            ("total_stops", "Number of Stops"),
        );
        assert!(missing.points.is_empty());
    }
}
