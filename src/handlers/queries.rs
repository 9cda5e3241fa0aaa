//! Query catalog handlers

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde::Serialize;

use crate::{AppState, AppResult, AppError};
use crate::catalog::{self, CatalogEntry, QueryGroup};
use crate::models::Table;
use crate::store;

#[derive(Debug, Serialize)]
pub struct CatalogListing {
    pub simple: &'static [CatalogEntry],
    pub advanced: &'static [CatalogEntry],
}

#[derive(Debug, Serialize)]
pub struct CatalogEntryDetail {
    pub group: QueryGroup,
    pub id: &'static str,
    pub label: &'static str,
    pub sql: &'static str,
}

#[derive(Debug, Serialize)]
pub struct QueryRunResponse {
    pub group: QueryGroup,
    pub id: &'static str,
    pub label: &'static str,
    pub result: Table,
    pub warning: Option<String>,
    pub notices: Vec<String>,
}

fn lookup(group: QueryGroup, id: &str) -> AppResult<&'static CatalogEntry> {
    catalog::find(group, id).ok_or_else(|| AppError::NotFound(format!("Query '{}' not found", id)))
}

/// List catalog questions by group
pub async fn list() -> Json<CatalogListing> {
    Json(CatalogListing {
        simple: catalog::SIMPLE_QUERIES,
        advanced: catalog::ADVANCED_QUERIES,
    })
}

/// Get single catalog entry including its SQL
pub async fn get(
    path: Result<Path<(QueryGroup, String)>, PathRejection>,
) -> AppResult<Json<CatalogEntryDetail>> {
    let Path((group, id)) = path?;
    let entry = lookup(group, &id)?;

    Ok(Json(CatalogEntryDetail {
        group,
        id: entry.id,
        label: entry.label,
        sql: entry.sql,
    }))
}

/// Run a catalog question
pub async fn run(
    State(state): State<AppState>,
    path: Result<Path<(QueryGroup, String)>, PathRejection>,
) -> AppResult<Json<QueryRunResponse>> {
    let Path((group, id)) = path?;
    let entry = lookup(group, &id)?;
    tracing::info!("Running {:?} query '{}'", group, entry.id);

    let fetched = store::fetch_or_empty(state.store.as_ref(), entry.sql).await;
    let warning = fetched
        .data
        .is_empty()
        .then(|| "No results found for this query.".to_string());

    Ok(Json(QueryRunResponse {
        group,
        id: entry.id,
        label: entry.label,
        result: fetched.data,
        warning,
        notices: fetched.error.into_iter().collect(),
    }))
}
