//! Review requests and pull request comments

use crate::{Error, GitHubClient, Result};
use serde::Serialize;
use tracing::{debug, info};

/// Reviewer handles split into the user and team lists GitHub expects
///
/// `org/team-slug` handles become team reviewers (by slug). A bare handle may
/// be a user login or a team slug in the repository's organization, so it goes
/// in both lists. A leading `@` is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewerSplit {
    pub reviewers: Vec<String>,
    pub team_reviewers: Vec<String>,
}

impl ReviewerSplit {
    pub fn from_handles<S: AsRef<str>>(handles: &[S]) -> Self {
        let mut split = Self::default();
        for handle in handles {
            let handle = handle.as_ref().trim().trim_start_matches('@');
            if handle.is_empty() {
                continue;
            }
            match handle.split_once('/') {
                Some((_org, slug)) => push_unique(&mut split.team_reviewers, slug),
                None => {
                    push_unique(&mut split.reviewers, handle);
                    push_unique(&mut split.team_reviewers, handle);
                }
            }
        }
        split
    }

    pub fn is_empty(&self) -> bool {
        self.reviewers.is_empty() && self.team_reviewers.is_empty()
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

impl GitHubClient {
    /// Request review on a pull request from users and teams
    pub async fn request_reviewers(&self, number: u64, split: &ReviewerSplit) -> Result<()> {
        if split.is_empty() {
            debug!(number, "No reviewers to request");
            return Ok(());
        }

        let route = self.route(&format!("pulls/{}/requested_reviewers", number));
        let _: serde_json::Value = self
            .client()
            .post(route, Some(split))
            .await
            .map_err(Error::Api)?;

        info!(
            number,
            users = ?split.reviewers,
            teams = ?split.team_reviewers,
            "Requested reviewers"
        );
        Ok(())
    }

    /// Add a comment to a pull request's conversation
    pub async fn add_pr_comment(&self, number: u64, body: &str) -> Result<u64> {
        let comment = self
            .client()
            .issues(self.owner(), self.repo())
            .create_comment(number, body)
            .await
            .map_err(Error::Api)?;

        debug!(number, comment_id = comment.id.0, "Created comment");
        Ok(comment.id.0)
    }
}
