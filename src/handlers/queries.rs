//! Query relay routes against the Jira search and metadata APIs.
//!
//! Each route makes exactly one outbound call. Upstream failures are
//! logged and surfaced as HTTP 500 with no body-level envelope.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use tracing::error;

use crate::models::{ComponentInfo, IssueSummary, VersionName};
use crate::server::AppState;

fn relay_error(e: anyhow::Error) -> StatusCode {
    error!(error = %e, "Jira relay request failed");
    StatusCode::INTERNAL_SERVER_ERROR
}

/// GET /projects - raw project list.
pub async fn get_projects(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    state.jira.list_projects().await.map(Json).map_err(relay_error)
}

/// GET /epics
pub async fn get_epics(
    State(state): State<AppState>,
) -> Result<Json<Vec<IssueSummary>>, StatusCode> {
    state
        .jira
        .search_issue_summaries("Epic")
        .await
        .map(Json)
        .map_err(relay_error)
}

/// GET /stories
pub async fn get_stories(
    State(state): State<AppState>,
) -> Result<Json<Vec<IssueSummary>>, StatusCode> {
    state
        .jira
        .search_issue_summaries("Story")
        .await
        .map(Json)
        .map_err(relay_error)
}

/// GET /tasks
pub async fn get_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<IssueSummary>>, StatusCode> {
    state
        .jira
        .search_issue_summaries("Task")
        .await
        .map(Json)
        .map_err(relay_error)
}

/// GET /bugs
pub async fn get_bugs(
    State(state): State<AppState>,
) -> Result<Json<Vec<IssueSummary>>, StatusCode> {
    state
        .jira
        .search_issue_summaries("Bug")
        .await
        .map(Json)
        .map_err(relay_error)
}

/// GET /versions - project version names.
pub async fn get_versions(
    State(state): State<AppState>,
) -> Result<Json<Vec<VersionName>>, StatusCode> {
    state.jira.list_versions().await.map(Json).map_err(relay_error)
}

/// GET /components - project components.
pub async fn get_components(
    State(state): State<AppState>,
) -> Result<Json<Vec<ComponentInfo>>, StatusCode> {
    state
        .jira
        .list_components()
        .await
        .map(Json)
        .map_err(relay_error)
}

/// GET /labels - raw label search.
pub async fn get_labels(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    state.jira.search_labels().await.map(Json).map_err(relay_error)
}

/// GET /issues/component/{name} - raw search filtered by component.
pub async fn get_issues_by_component(
    State(state): State<AppState>,
    Path(component_name): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    state
        .jira
        .search_by_component(&component_name)
        .await
        .map(Json)
        .map_err(relay_error)
}

/// GET /issues/label/{name} - raw search filtered by label.
pub async fn get_issues_by_label(
    State(state): State<AppState>,
    Path(label_name): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    state
        .jira
        .search_by_label(&label_name)
        .await
        .map(Json)
        .map_err(relay_error)
}
