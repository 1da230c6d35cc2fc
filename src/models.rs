//! Response record types for the query relay.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Narrow issue projection returned by the typed search routes
/// (`/epics`, `/stories`, `/tasks`, `/bugs`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueSummary {
    /// Issue summary line.
    pub summary: String,
    /// Issue description. Jira Cloud v3 returns descriptions as ADF
    /// documents, so this passes through as raw JSON.
    #[serde(default)]
    pub description: Option<Value>,
}

/// Project version, name only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionName {
    /// Version name (e.g., "1.4.0").
    pub name: String,
}

/// Project component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentInfo {
    /// Component name.
    pub name: String,
    /// Component description. Some components have none.
    #[serde(default)]
    pub description: Option<String>,
}
