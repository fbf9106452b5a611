//! [`ReviewHost`] implementation for GitHub

use async_trait::async_trait;
use autoreview_core::{Error as CoreError, PullRequestContext, Result as CoreResult, ReviewHost};

use crate::error::describe;
use crate::review::ReviewerSplit;
use crate::{Error, GitHubClient};

fn reason(err: &Error) -> String {
    match err {
        Error::Api(e) => describe(e),
        other => other.to_string(),
    }
}

fn fetch_error(err: Error) -> CoreError {
    CoreError::Fetch(reason(&err))
}

#[async_trait]
impl ReviewHost for GitHubClient {
    async fn fetch_config_text(
        &self,
        path: &str,
        git_ref: Option<&str>,
    ) -> CoreResult<Option<String>> {
        self.get_file_text(path, git_ref).await.map_err(fetch_error)
    }

    async fn pull_request(&self, number: u64) -> CoreResult<PullRequestContext> {
        let pr = self.get_pr(number).await.map_err(fetch_error)?;
        Ok(PullRequestContext {
            number: pr.number,
            author: pr.author,
        })
    }

    async fn list_changed_files(&self, number: u64) -> CoreResult<Vec<String>> {
        self.list_pr_files(number).await.map_err(fetch_error)
    }

    async fn request_review(&self, number: u64, reviewers: &[String]) -> CoreResult<()> {
        let split = ReviewerSplit::from_handles(reviewers);
        self.request_reviewers(number, &split)
            .await
            .map_err(|e| CoreError::ReviewRequest(reason(&e)))
    }

    async fn post_comment(&self, number: u64, body: &str) -> CoreResult<()> {
        self.add_pr_comment(number, body)
            .await
            .map(|_| ())
            .map_err(|e| CoreError::Template(autoreview_core::TemplateError::Delivery(reason(&e))))
    }
}
