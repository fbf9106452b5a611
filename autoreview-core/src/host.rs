//! Collaborator interface to the code host

use async_trait::async_trait;

use crate::context::PullRequestContext;
use crate::Result;

/// Remote operations the orchestrator depends on
///
/// Implementations own pagination, authentication and transport, and report
/// failures with the underlying reason in the message.
#[async_trait]
pub trait ReviewHost: Send + Sync {
    /// Raw text of the file at `path`, or `None` if there is no such file
    async fn fetch_config_text(&self, path: &str, git_ref: Option<&str>)
        -> Result<Option<String>>;

    /// Number and author of a pull request
    async fn pull_request(&self, number: u64) -> Result<PullRequestContext>;

    /// Every changed path in the pull request, across all pages, in host order
    async fn list_changed_files(&self, number: u64) -> Result<Vec<String>>;

    /// Request review from the given handles
    async fn request_review(&self, number: u64, reviewers: &[String]) -> Result<()>;

    /// Post a comment on the pull request
    async fn post_comment(&self, number: u64, body: &str) -> Result<()>;
}
