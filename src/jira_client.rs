//! Jira Cloud REST API client for the query relay.

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::models::{ComponentInfo, IssueSummary, VersionName};

/// Jira REST client using basic auth (account email + API token).
#[derive(Debug, Clone)]
pub struct JiraClient {
    client: reqwest::Client,
    base_url: String,
    email: String,
    api_token: String,
    project_key: String,
}

impl JiraClient {
    /// Create a new Jira client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: &str, email: &str, api_token: &str, project_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            email: email.to_string(),
            api_token: api_token.to_string(),
            project_key: project_key.to_string(),
        })
    }

    /// One authenticated GET, parsed as JSON. No retries, no timeout
    /// override; a slow Jira blocks the caller for the duration.
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "Sending Jira request");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.email, Some(&self.api_token))
            .query(query)
            .send()
            .await
            .context("Failed to send Jira request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Jira API error: {status} - {body}"));
        }

        response.json().await.context("Failed to parse Jira response")
    }

    /// List all visible projects, raw JSON.
    pub async fn list_projects(&self) -> Result<Value> {
        self.get_json("/rest/api/3/project", &[]).await
    }

    /// Search issues of one type within the configured project,
    /// projected down to [`IssueSummary`] records.
    pub async fn search_issue_summaries(&self, issue_type: &str) -> Result<Vec<IssueSummary>> {
        let jql = format!("project={} AND issuetype={issue_type}", self.project_key);
        let body = self
            .get_json(
                "/rest/api/3/search",
                &[
                    ("jql", jql.as_str()),
                    ("fields", "summary"),
                    ("maxResults", "1000"),
                ],
            )
            .await?;

        let issues = body
            .get("issues")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(issues
            .iter()
            .map(|issue| {
                let fields = issue.get("fields");
                IssueSummary {
                    summary: fields
                        .and_then(|f| f.get("summary"))
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    description: fields
                        .and_then(|f| f.get("description"))
                        .filter(|d| !d.is_null())
                        .cloned(),
                }
            })
            .collect())
    }

    /// List the configured project's versions, names only.
    pub async fn list_versions(&self) -> Result<Vec<VersionName>> {
        let body = self
            .get_json(
                &format!("/rest/api/3/project/{}/versions", self.project_key),
                &[],
            )
            .await?;

        let versions = body.as_array().cloned().unwrap_or_default();
        Ok(versions
            .iter()
            .map(|v| VersionName {
                name: v
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect())
    }

    /// List the configured project's components.
    pub async fn list_components(&self) -> Result<Vec<ComponentInfo>> {
        let body = self
            .get_json(
                &format!("/rest/api/3/project/{}/components", self.project_key),
                &[],
            )
            .await?;

        let components = body.as_array().cloned().unwrap_or_default();
        Ok(components
            .iter()
            .map(|c| ComponentInfo {
                name: c
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                description: c
                    .get("description")
                    .and_then(Value::as_str)
                    .map(String::from),
            })
            .collect())
    }

    /// Search the whole project with only the `labels` field, raw JSON.
    pub async fn search_labels(&self) -> Result<Value> {
        let jql = format!("project={}", self.project_key);
        self.get_json(
            "/rest/api/3/search",
            &[
                ("jql", jql.as_str()),
                ("fields", "labels"),
                ("maxResults", "1000"),
            ],
        )
        .await
    }

    /// Search issues in one component, raw JSON. The component name is
    /// interpolated into JQL verbatim.
    pub async fn search_by_component(&self, component: &str) -> Result<Value> {
        let jql = format!(
            "project={} AND component=\"{component}\"",
            self.project_key
        );
        self.get_json("/rest/api/3/search", &[("jql", jql.as_str())])
            .await
    }

    /// Search issues carrying one label, raw JSON. The label name is
    /// interpolated into JQL verbatim.
    pub async fn search_by_label(&self, label: &str) -> Result<Value> {
        let jql = format!("project={} AND labels=\"{label}\"", self.project_key);
        self.get_json("/rest/api/3/search", &[("jql", jql.as_str())])
            .await
    }
}
