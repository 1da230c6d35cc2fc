//! GitHub webhook receiver.
//!
//! Verifies the `X-Hub-Signature-256` HMAC, classifies the payload into
//! an event summary, and forwards opened issues and pushes to the
//! ticket automation endpoint.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::server::AppState;
use crate::webhooks::{classify_github_event, verify_github_signature, GithubEvent};

/// Repository recorded on forwarded automation tickets.
const AUTOMATION_REPO: &str = "ssn-team/ecsa";
/// Assignee recorded on forwarded automation tickets.
const AUTOMATION_ASSIGNEE_EMAIL: &str = "ecsa-automation@ssn.edu.in";

/// Handle GitHub webhook.
pub async fn handle_github_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    let event_header = headers
        .get("X-GitHub-Event")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    let delivery_id = headers
        .get("X-GitHub-Delivery")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    info!(
        event = %event_header,
        delivery_id = %delivery_id,
        "Received GitHub webhook"
    );

    let signature = headers
        .get("X-Hub-Signature-256")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !verify_github_signature(&body, signature, &state.config.github_webhook_secret) {
        // Intentionally a 200-status envelope: GitHub marks the delivery
        // as succeeded and will not retry it.
        warn!(delivery_id = %delivery_id, "Invalid webhook signature");
        return Ok(Json(json!({"message": "Invalid signature"})));
    }

    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "Failed to parse GitHub webhook payload");
        StatusCode::BAD_REQUEST
    })?;

    let event = classify_github_event(&payload);
    debug!(event = ?event, "Classified webhook event");

    if let GithubEvent::Unhandled { action } = &event {
        return Ok(Json(json!({
            "message": format!("Unhandled action: {}", action.as_deref().unwrap_or("null"))
        })));
    }

    // Opened issues and pushes create a ticket downstream; the outcome
    // rides along in the response whether it succeeded or not.
    let automation = match &event {
        GithubEvent::IssueOpened { title, .. } => Some(
            state
                .automation
                .create_ticket(
                    title.as_deref().unwrap_or_default(),
                    AUTOMATION_REPO,
                    AUTOMATION_ASSIGNEE_EMAIL,
                )
                .await,
        ),
        GithubEvent::Push { commit_message, .. } => Some(
            state
                .automation
                .create_ticket(
                    commit_message.as_deref().unwrap_or_default(),
                    AUTOMATION_REPO,
                    AUTOMATION_ASSIGNEE_EMAIL,
                )
                .await,
        ),
        _ => None,
    };

    let mut response = serde_json::to_value(&event).map_err(|e| {
        error!(error = %e, "Failed to serialize event summary");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if let Some(result) = automation {
        let status = serde_json::to_value(&result).map_err(|e| {
            error!(error = %e, "Failed to serialize automation result");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        if let Some(object) = response.as_object_mut() {
            object.insert("automation_status".to_string(), status);
        }
    }

    Ok(Json(response))
}
