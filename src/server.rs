//! HTTP server and routing for the relay service.

use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::automation::AutomationClient;
use crate::config::Config;
use crate::handlers::github::handle_github_webhook;
use crate::handlers::jira::handle_jira_webhook;
use crate::handlers::queries;
use crate::jira_client::JiraClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Configuration.
    pub config: Config,
    /// Jira API client.
    pub jira: JiraClient,
    /// Ticket automation client.
    pub automation: AutomationClient,
}

/// Build the HTTP router for the relay service.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Query relay endpoints
        .route("/projects", get(queries::get_projects))
        .route("/epics", get(queries::get_epics))
        .route("/stories", get(queries::get_stories))
        .route("/tasks", get(queries::get_tasks))
        .route("/bugs", get(queries::get_bugs))
        .route("/versions", get(queries::get_versions))
        .route("/components", get(queries::get_components))
        .route("/labels", get(queries::get_labels))
        .route(
            "/issues/component/{component_name}",
            get(queries::get_issues_by_component),
        )
        .route("/issues/label/{label_name}", get(queries::get_issues_by_label))
        // Webhook endpoints
        .route("/webhook/github", post(handle_github_webhook))
        .route("/webhook/jira", post(handle_jira_webhook))
        // Health check
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Readiness check endpoint.
async fn readiness_check() -> Json<Value> {
    Json(json!({ "status": "ready" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use hmac::{Hmac, Mac};
    use http_body_util::BodyExt;
    use sha2::Sha256;
    use tower::ServiceExt;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_state(jira_url: &str, automation_url: &str) -> AppState {
        let config = Config {
            port: 0,
            jira_email: "dev@example.com".to_string(),
            jira_api_token: "token".to_string(),
            jira_base_url: jira_url.to_string(),
            project_key: "ECSA".to_string(),
            github_webhook_secret: "github_webhook_secret".to_string(),
            automation_url: automation_url.to_string(),
        };
        AppState {
            jira: JiraClient::new(
                &config.jira_base_url,
                &config.jira_email,
                &config.jira_api_token,
                &config.project_key,
            )
            .unwrap(),
            automation: AutomationClient::new(&config.automation_url).unwrap(),
            config,
        }
    }

    fn sign(body: &[u8], secret: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }

    fn github_post(body: Vec<u8>, signature: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/webhook/github")
            .header("X-Hub-Signature-256", signature)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_signature_returns_message_envelope() {
        let app = build_router(test_state("http://127.0.0.1:1", "http://127.0.0.1:1"));

        let body = br#"{"action": "opened"}"#.to_vec();
        let response = app
            .oneshot(github_post(body, "sha256=deadbeef"))
            .await
            .unwrap();

        // Preserved upstream behavior: 200 with a message, not 401.
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response_json(response).await,
            json!({"message": "Invalid signature"})
        );
    }

    #[tokio::test]
    async fn test_issue_opened_invokes_automation() {
        let automation = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/tickets"))
            .and(body_partial_json(json!({"commit_message": "Fix bug"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ticket_id": 42})))
            .expect(1)
            .mount(&automation)
            .await;

        let app = build_router(test_state(
            "http://127.0.0.1:1",
            &format!("{}/v1/tickets", automation.uri()),
        ));

        let body = serde_json::to_vec(&json!({
            "action": "opened",
            "issue": {"title": "Fix bug", "number": 7, "user": {"login": "octocat"}},
            "repository": {"full_name": "org/repo"}
        }))
        .unwrap();
        let signature = sign(&body, "github_webhook_secret");

        let response = app.oneshot(github_post(body, &signature)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let summary = response_json(response).await;
        assert_eq!(summary["event"], "issue_opened");
        assert_eq!(summary["title"], "Fix bug");
        assert_eq!(summary["repository"], "org/repo");
        assert_eq!(summary["automation_status"]["status"], "success");
        assert_eq!(summary["automation_status"]["response"]["ticket_id"], 42);
    }

    #[tokio::test]
    async fn test_push_automation_failure_reported_in_body() {
        let automation = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&automation)
            .await;

        let app = build_router(test_state("http://127.0.0.1:1", &automation.uri()));

        let body = serde_json::to_vec(&json!({
            "ref": "refs/heads/main",
            "commits": [{"id": "a"}],
            "head_commit": {"message": "Fix typo"},
            "pusher": {"name": "carol"},
            "repository": {"full_name": "org/repo"}
        }))
        .unwrap();
        let signature = sign(&body, "github_webhook_secret");

        let response = app.oneshot(github_post(body, &signature)).await.unwrap();
        // The webhook itself still succeeds
        assert_eq!(response.status(), StatusCode::OK);

        let summary = response_json(response).await;
        assert_eq!(summary["event"], "push");
        assert_eq!(summary["commit_message"], "Fix typo");
        assert_eq!(summary["automation_status"]["status"], "error");
        assert_eq!(summary["automation_status"]["detail"], "upstream exploded");
    }

    #[tokio::test]
    async fn test_unhandled_action_is_echoed() {
        let app = build_router(test_state("http://127.0.0.1:1", "http://127.0.0.1:1"));

        let body = serde_json::to_vec(&json!({"action": "deleted"})).unwrap();
        let signature = sign(&body, "github_webhook_secret");

        let response = app.oneshot(github_post(body, &signature)).await.unwrap();
        assert_eq!(
            response_json(response).await,
            json!({"message": "Unhandled action: deleted"})
        );
    }

    #[tokio::test]
    async fn test_pull_request_assigned_makes_no_automation_call() {
        let app = build_router(test_state("http://127.0.0.1:1", "http://127.0.0.1:1"));

        let body = serde_json::to_vec(&json!({
            "action": "assigned",
            "pull_request": {"title": "Add login", "number": 5},
            "assignee": {"login": "bob"},
            "repository": {"full_name": "org/repo"}
        }))
        .unwrap();
        let signature = sign(&body, "github_webhook_secret");

        let response = app.oneshot(github_post(body, &signature)).await.unwrap();
        let summary = response_json(response).await;
        assert_eq!(summary["event"], "pull_request_assigned");
        assert_eq!(summary["assignee"], "bob");
        assert!(summary.get("automation_status").is_none());
    }

    #[tokio::test]
    async fn test_epics_empty_search_returns_empty_list() {
        let jira = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"issues": []})))
            .mount(&jira)
            .await;

        let app = build_router(test_state(&jira.uri(), "http://127.0.0.1:1"));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/epics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_jira_relay_failure_is_500() {
        // Nothing listening on the Jira side
        let app = build_router(test_state("http://127.0.0.1:1", "http://127.0.0.1:1"));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/projects")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_jira_webhook_summarizes_envelope() {
        let app = build_router(test_state("http://127.0.0.1:1", "http://127.0.0.1:1"));

        let body = serde_json::to_vec(&json!({
            "webhookEvent": "jira:issue_created",
            "issue": {
                "key": "ECSA-12",
                "fields": {"summary": "Set up CI", "issuetype": {"name": "Task"}}
            }
        }))
        .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook/jira")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let summary = response_json(response).await;
        assert_eq!(summary["event"], "jira:issue_created");
        assert_eq!(summary["issue_key"], "ECSA-12");
        assert_eq!(summary["status"], Value::Null);
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = build_router(test_state("http://127.0.0.1:1", "http://127.0.0.1:1"));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await, json!({"status": "healthy"}));
    }
}
