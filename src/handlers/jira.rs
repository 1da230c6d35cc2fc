//! Jira webhook receiver.
//!
//! Jira webhooks carry no signature; the envelope is reshaped into a
//! flat event summary with null for any missing field. No outbound
//! calls are made.

use axum::{body::Bytes, http::StatusCode, response::Json};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::webhooks::str_at;

/// Handle Jira webhook.
pub async fn handle_jira_webhook(body: Bytes) -> Result<Json<Value>, StatusCode> {
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "Failed to parse Jira webhook payload");
        StatusCode::BAD_REQUEST
    })?;

    let event = payload.get("webhookEvent").and_then(Value::as_str);
    info!(event = ?event, "Received Jira webhook");

    Ok(Json(json!({
        "event": event,
        "issue_key": str_at(&payload, &["issue", "key"]),
        "summary": str_at(&payload, &["issue", "fields", "summary"]),
        "issue_type": str_at(&payload, &["issue", "fields", "issuetype", "name"]),
        "status": str_at(&payload, &["issue", "fields", "status", "name"]),
        "reporter": str_at(&payload, &["issue", "fields", "reporter", "displayName"]),
    })))
}
