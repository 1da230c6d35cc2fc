//! HTTP request handlers.

pub mod github;
pub mod jira;
pub mod queries;
