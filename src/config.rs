//! Configuration for the relay service.

use std::env;

/// Relay configuration, loaded from the environment once at startup and
/// carried inside [`crate::server::AppState`]. Handlers never read the
/// environment directly.
#[derive(Clone)]
pub struct Config {
    /// HTTP server port.
    pub port: u16,
    /// Jira account email for basic auth.
    pub jira_email: String,
    /// Jira API token for basic auth.
    pub jira_api_token: String,
    /// Jira Cloud base URL.
    pub jira_base_url: String,
    /// Jira project key scoping every relayed query.
    pub project_key: String,
    /// Shared secret for GitHub webhook signatures. Must match the value
    /// configured on the repository's webhook settings.
    pub github_webhook_secret: String,
    /// Ticket automation endpoint URL.
    pub automation_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            jira_email: env::var("JIRA_EMAIL").unwrap_or_default(),
            jira_api_token: env::var("JIRA_API_TOKEN").unwrap_or_default(),
            jira_base_url: env::var("JIRA_BASE_URL")
                .unwrap_or_else(|_| "https://ssn-team-j7z071w8.atlassian.net".to_string()),
            project_key: env::var("PROJECT_KEY").unwrap_or_else(|_| "ECSA".to_string()),
            github_webhook_secret: env::var("GITHUB_WEBHOOK_SECRET")
                .unwrap_or_else(|_| "github_webhook_secret".to_string()),
            automation_url: env::var("AUTOMATION_URL")
                .unwrap_or_else(|_| "https://api.ticketflow.dev/v1/tickets".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Use a mutex to serialize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let _lock = ENV_MUTEX.lock().unwrap();

        env::remove_var("PORT");
        env::remove_var("JIRA_BASE_URL");
        env::remove_var("PROJECT_KEY");
        env::remove_var("GITHUB_WEBHOOK_SECRET");

        let config = Config::default();
        assert_eq!(config.port, 8000);
        assert_eq!(
            config.jira_base_url,
            "https://ssn-team-j7z071w8.atlassian.net"
        );
        assert_eq!(config.project_key, "ECSA");
        assert_eq!(config.github_webhook_secret, "github_webhook_secret");
    }

    #[test]
    fn test_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();

        env::set_var("PORT", "9000");
        env::set_var("JIRA_BASE_URL", "https://other.atlassian.net");
        env::set_var("PROJECT_KEY", "OPS");

        let config = Config::default();
        assert_eq!(config.port, 9000);
        assert_eq!(config.jira_base_url, "https://other.atlassian.net");
        assert_eq!(config.project_key, "OPS");

        env::remove_var("PORT");
        env::remove_var("JIRA_BASE_URL");
        env::remove_var("PROJECT_KEY");
    }
}
