//! GitHub webhook signature verification and event classification.

use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Verify a GitHub webhook signature.
///
/// GitHub sends `sha256=<hex(hmac_sha256(secret, body))>` in the
/// `X-Hub-Signature-256` header.
///
/// # Arguments
/// * `body` - Raw webhook body bytes
/// * `signature` - Full header value, including the `sha256=` prefix
/// * `secret` - Webhook signing secret
///
/// # Returns
/// `true` if signature is valid, `false` otherwise
#[must_use]
pub fn verify_github_signature(body: &[u8], signature: &str, secret: &str) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    let expected = format!("sha256={}", hex::encode(mac.finalize().into_bytes()));

    // Constant-time comparison to prevent timing attacks
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}

/// Read a nested string field. Missing keys read as `None`, never an error.
#[must_use]
pub fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |v, key| v.get(key))
        .and_then(Value::as_str)
}

/// Read a nested numeric field. Missing keys read as `None`, never an error.
#[must_use]
pub fn u64_at(value: &Value, path: &[&str]) -> Option<u64> {
    path.iter()
        .try_fold(value, |v, key| v.get(key))
        .and_then(Value::as_u64)
}

/// Classified GitHub webhook event, each variant carrying its own field
/// projection of the raw payload. Serializes with an `event` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GithubEvent {
    /// A sub-issue was attached to a parent issue.
    SubIssueAdded {
        parent_issue: Option<String>,
        sub_issue: Option<String>,
        repository: Option<String>,
    },
    /// An issue was assigned.
    IssueAssigned {
        issue: Option<String>,
        number: Option<u64>,
        assignee: Option<String>,
        repository: Option<String>,
    },
    /// An issue whose title carries the `sub-issue` prefix was opened.
    SubIssueOpened {
        title: Option<String>,
        number: Option<u64>,
        repository: Option<String>,
    },
    /// A regular issue was opened. Forwarded to the automation endpoint.
    IssueOpened {
        title: Option<String>,
        number: Option<u64>,
        author: Option<String>,
        repository: Option<String>,
    },
    /// Commits were pushed. Forwarded to the automation endpoint.
    Push {
        #[serde(rename = "ref")]
        git_ref: Option<String>,
        commit_message: Option<String>,
        pusher: Option<String>,
        commit_count: Option<u64>,
        repository: Option<String>,
    },
    /// A parent issue was attached to a sub-issue.
    ParentIssueAdded {
        parent_issue: Option<String>,
        sub_issue: Option<String>,
        repository: Option<String>,
    },
    /// A pull request was assigned.
    PullRequestAssigned {
        title: Option<String>,
        number: Option<u64>,
        assignee: Option<String>,
        repository: Option<String>,
    },
    /// A label was added to a pull request.
    PullRequestLabeled {
        title: Option<String>,
        number: Option<u64>,
        label: Option<String>,
        repository: Option<String>,
    },
    /// A pull request was opened.
    PullRequestOpened {
        title: Option<String>,
        number: Option<u64>,
        author: Option<String>,
        repository: Option<String>,
    },
    /// No branch matched.
    Unhandled { action: Option<String> },
}

/// Classify a GitHub webhook payload.
///
/// Predicates are tried in declared priority order and the first match
/// wins. Every extracted field defaults to `None` when absent.
#[must_use]
pub fn classify_github_event(payload: &Value) -> GithubEvent {
    let action = payload.get("action").and_then(Value::as_str);
    let repository = str_at(payload, &["repository", "full_name"]).map(String::from);

    if action == Some("sub_issue_added") {
        return GithubEvent::SubIssueAdded {
            parent_issue: str_at(payload, &["issue", "title"]).map(String::from),
            sub_issue: str_at(payload, &["sub_issue", "title"]).map(String::from),
            repository,
        };
    }

    if action == Some("assigned") {
        if payload.get("pull_request").is_some() {
            return GithubEvent::PullRequestAssigned {
                title: str_at(payload, &["pull_request", "title"]).map(String::from),
                number: u64_at(payload, &["pull_request", "number"]),
                assignee: str_at(payload, &["assignee", "login"]).map(String::from),
                repository,
            };
        }
        return GithubEvent::IssueAssigned {
            issue: str_at(payload, &["issue", "title"]).map(String::from),
            number: u64_at(payload, &["issue", "number"]),
            assignee: str_at(payload, &["assignee", "login"]).map(String::from),
            repository,
        };
    }

    if action == Some("opened") && payload.get("issue").is_some() {
        let title = str_at(payload, &["issue", "title"]);
        let number = u64_at(payload, &["issue", "number"]);
        if title.is_some_and(|t| t.starts_with("sub-issue")) {
            return GithubEvent::SubIssueOpened {
                title: title.map(String::from),
                number,
                repository,
            };
        }
        return GithubEvent::IssueOpened {
            title: title.map(String::from),
            number,
            author: str_at(payload, &["issue", "user", "login"]).map(String::from),
            repository,
        };
    }

    if payload.get("commits").is_some() && payload.get("head_commit").is_some() {
        return GithubEvent::Push {
            git_ref: payload
                .get("ref")
                .and_then(Value::as_str)
                .map(String::from),
            commit_message: str_at(payload, &["head_commit", "message"]).map(String::from),
            pusher: str_at(payload, &["pusher", "name"]).map(String::from),
            commit_count: payload
                .get("commits")
                .and_then(Value::as_array)
                .map(|commits| commits.len() as u64),
            repository,
        };
    }

    if action == Some("parent_issue_added") {
        return GithubEvent::ParentIssueAdded {
            parent_issue: str_at(payload, &["parent_issue", "title"]).map(String::from),
            sub_issue: str_at(payload, &["issue", "title"]).map(String::from),
            repository,
        };
    }

    if action == Some("labeled") && payload.get("pull_request").is_some() {
        return GithubEvent::PullRequestLabeled {
            title: str_at(payload, &["pull_request", "title"]).map(String::from),
            number: u64_at(payload, &["pull_request", "number"]),
            label: str_at(payload, &["label", "name"]).map(String::from),
            repository,
        };
    }

    if action == Some("opened") && payload.get("pull_request").is_some() {
        return GithubEvent::PullRequestOpened {
            title: str_at(payload, &["pull_request", "title"]).map(String::from),
            number: u64_at(payload, &["pull_request", "number"]),
            author: str_at(payload, &["pull_request", "user", "login"]).map(String::from),
            repository,
        };
    }

    GithubEvent::Unhandled {
        action: action.map(String::from),
    }
}
