//! Client for the third-party ticket automation endpoint.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

/// Outcome of a forwarding attempt. Failures are returned as data and
/// embedded in the webhook response, never raised past this boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AutomationResult {
    /// Endpoint accepted the ticket.
    Success {
        /// Parsed response body; null when the body is not JSON.
        response: Value,
    },
    /// Endpoint rejected the ticket or was unreachable.
    Error {
        /// Response body text, or the transport error text.
        detail: String,
    },
}

/// Ticket creation request body.
#[derive(Debug, Serialize)]
struct TicketRequest<'a> {
    commit_message: &'a str,
    repo: &'a str,
    assignee_email: &'a str,
}

/// Client for the automation endpoint that turns webhook events into
/// tracked tickets.
#[derive(Debug, Clone)]
pub struct AutomationClient {
    client: reqwest::Client,
    endpoint: String,
}

impl AutomationClient {
    /// Create a new automation client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// Forward one event as a ticket creation request.
    ///
    /// Infallible by contract: connection errors and non-2xx responses
    /// both come back as [`AutomationResult::Error`].
    pub async fn create_ticket(
        &self,
        commit_message: &str,
        repo: &str,
        assignee_email: &str,
    ) -> AutomationResult {
        let request = TicketRequest {
            commit_message,
            repo,
            assignee_email,
        };

        let response = match self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Automation endpoint unreachable");
                return AutomationResult::Error {
                    detail: e.to_string(),
                };
            }
        };

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_else(|e| e.to_string());
            warn!(status = %status, detail = %detail, "Automation endpoint rejected ticket");
            return AutomationResult::Error { detail };
        }

        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        info!("Ticket forwarded to automation endpoint");
        AutomationResult::Success { response: body }
    }
}
