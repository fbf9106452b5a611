//! Run context supplied by the host environment
//!
//! Values are read from the GitHub Actions environment once, at startup:
//! - GITHUB_REPOSITORY: `owner/repo`
//! - GITHUB_EVENT_PATH: JSON payload of the triggering event
//! - GITHUB_SHA: commit to read the rule document from (optional)
//!
//! Everything downstream receives these values explicitly.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::{Error, Result};

/// Identity of the repository and pull request a run acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionContext {
    /// Repository as `owner/repo`
    pub repository: String,
    /// Pull request number from the triggering event
    pub pull_number: u64,
    /// Commit the rule document is read from; default branch when `None`
    pub sha: Option<String>,
}

/// Pull request facts the resolver needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestContext {
    pub number: u64,
    /// Login of the pull request author
    pub author: String,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<PullRequestRef>,
    number: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct PullRequestRef {
    number: u64,
}

impl ActionContext {
    /// Read the context from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the context through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let repository = var("GITHUB_REPOSITORY")
            .ok_or_else(|| Error::Fetch("GITHUB_REPOSITORY is not set".to_string()))?;
        let event_path = var("GITHUB_EVENT_PATH")
            .ok_or_else(|| Error::Fetch("GITHUB_EVENT_PATH is not set".to_string()))?;
        let pull_number = pull_number_from_event(Path::new(&event_path))?;
        let sha = var("GITHUB_SHA");

        debug!(repository = %repository, pull_number, sha = ?sha, "Loaded action context");

        Ok(Self {
            repository,
            pull_number,
            sha,
        })
    }
}

/// Extract the pull request number from an event payload file
pub fn pull_number_from_event(path: &Path) -> Result<u64> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        Error::Fetch(format!(
            "Failed to read event payload {}: {}",
            path.display(),
            e
        ))
    })?;
    pull_number_from_payload(&contents)
}

fn pull_number_from_payload(contents: &str) -> Result<u64> {
    let payload: EventPayload = serde_json::from_str(contents)
        .map_err(|e| Error::Fetch(format!("Failed to parse event payload: {}", e)))?;

    payload
        .pull_request
        .map(|pr| pr.number)
        .or(payload.number)
        .ok_or_else(|| {
            Error::Fetch("Event payload does not reference a pull request".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn event_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", json).unwrap();
        file
    }

    #[test]
    fn test_pull_request_event() {
        let number = pull_number_from_payload(
            r#"{"action":"opened","number":7,"pull_request":{"number":7,"user":{"login":"a"}}}"#,
        )
        .unwrap();
        assert_eq!(number, 7);
    }

    #[test]
    fn test_top_level_number_fallback() {
        assert_eq!(pull_number_from_payload(r#"{"number": 12}"#).unwrap(), 12);
    }

    #[test]
    fn test_non_pull_request_event() {
        let err = pull_number_from_payload(r#"{"ref":"refs/heads/main"}"#).unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
    }

    #[test]
    fn test_from_lookup() {
        let file = event_file(r#"{"pull_request":{"number":42}}"#);
        let vars: HashMap<&str, String> = HashMap::from([
            ("GITHUB_REPOSITORY", "octo/widgets".to_string()),
            (
                "GITHUB_EVENT_PATH",
                file.path().to_string_lossy().into_owned(),
            ),
            ("GITHUB_SHA", "abc123".to_string()),
        ]);

        let ctx = ActionContext::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(
            ctx,
            ActionContext {
                repository: "octo/widgets".to_string(),
                pull_number: 42,
                sha: Some("abc123".to_string()),
            }
        );
    }

    #[test]
    fn test_missing_repository() {
        let err = ActionContext::from_lookup(|_| None).unwrap_err();
        assert!(err.to_string().contains("GITHUB_REPOSITORY"));
    }

    #[test]
    fn test_blank_sha_is_none() {
        let file = event_file(r#"{"number":3}"#);
        let path = file.path().to_string_lossy().into_owned();
        let ctx = ActionContext::from_lookup(|k| match k {
            "GITHUB_REPOSITORY" => Some("o/r".to_string()),
            "GITHUB_EVENT_PATH" => Some(path.clone()),
            "GITHUB_SHA" => Some("  ".to_string()),
            _ => None,
        })
        .unwrap();
        assert!(ctx.sha.is_none());
    }

    #[test]
    fn test_missing_event_file() {
        let err = pull_number_from_event(Path::new("/nonexistent/event.json")).unwrap_err();
        assert!(err.to_string().contains("event payload"));
    }
}
