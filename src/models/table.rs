//! Tabular query results
//!
//! Catalog queries return arbitrary columns, so rows are decoded into
//! dynamically typed cells keyed by the Postgres type name.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{Column, Decode, Postgres, Row, Type, TypeInfo};

/// A single value in a result table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Numeric view used by chart series.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "None"),
            Cell::Bool(v) => write!(f, "{v}"),
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Text(v) => write!(f, "{v}"),
            Cell::Date(v) => write!(f, "{v}"),
            Cell::Time(v) => write!(f, "{v}"),
            Cell::Timestamp(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Int(v)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

/// Column names plus row-major cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// No rows. A table with columns but no rows is still empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Decode Postgres rows. Column names come from the first row; callers
    /// with an empty result set take them from the prepared statement.
    pub fn from_pg_rows(rows: &[PgRow]) -> Self {
        let columns = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();

        let rows = rows
            .iter()
            .map(|row| (0..row.columns().len()).map(|i| decode_cell(row, i)).collect())
            .collect();

        Self { columns, rows }
    }
}

fn decode_cell(row: &PgRow, idx: usize) -> Cell {
    let type_name = row.columns()[idx].type_info().name().to_string();

    match type_name.as_str() {
        "BOOL" => get::<bool>(row, idx).map(Cell::Bool),
        "INT2" => get::<i16>(row, idx).map(|v| Cell::Int(v.into())),
        "INT4" => get::<i32>(row, idx).map(|v| Cell::Int(v.into())),
        "INT8" => get::<i64>(row, idx).map(Cell::Int),
        "FLOAT4" => get::<f32>(row, idx).map(|v| Cell::Float(v.into())),
        "FLOAT8" => get::<f64>(row, idx).map(Cell::Float),
        "NUMERIC" => get::<Decimal>(row, idx).and_then(|v| v.to_f64()).map(Cell::Float),
        "DATE" => get::<NaiveDate>(row, idx).map(Cell::Date),
        "TIME" => get::<NaiveTime>(row, idx).map(Cell::Time),
        "TIMESTAMP" => get::<NaiveDateTime>(row, idx).map(Cell::Timestamp),
        "TIMESTAMPTZ" => get::<DateTime<Utc>>(row, idx).map(|v| Cell::Timestamp(v.naive_utc())),
        _ => {
            let text = get::<String>(row, idx);
            if text.is_none() {
                tracing::debug!("Unsupported column type {} at index {}", type_name, idx);
            }
            text.map(Cell::Text)
        }
    }
    .unwrap_or(Cell::Null)
}

fn get<'r, T>(row: &'r PgRow, idx: usize) -> Option<T>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    row.try_get::<Option<T>, _>(idx).ok().flatten()
}
