//! HTTP relay between a Jira project and its GitHub repository.
//!
//! This crate provides:
//! - REST routes that proxy fixed search/metadata queries to Jira Cloud
//! - GitHub webhook receiver with HMAC-SHA256 signature verification
//! - Jira webhook receiver that reshapes events into flat summaries
//! - Client for a third-party ticket automation endpoint

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Many async API methods can fail

pub mod automation;
pub mod config;
pub mod handlers;
pub mod jira_client;
pub mod models;
pub mod server;
pub mod webhooks;

pub use automation::{AutomationClient, AutomationResult};
pub use config::Config;
pub use jira_client::JiraClient;
pub use models::*;
pub use webhooks::{classify_github_event, verify_github_signature, GithubEvent};
