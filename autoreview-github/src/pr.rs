//! Pull request lookup and changed-file listing

use crate::{Error, GitHubClient, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Files requested per page; GitHub's maximum for this endpoint
const FILES_PER_PAGE: u8 = 100;

/// The pull request fields autoreview needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestInfo {
    /// PR number
    pub number: u64,
    /// Author login
    pub author: String,
}

#[derive(Debug, Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

/// One entry of `GET /repos/{owner}/{repo}/pulls/{number}/files`
#[derive(Debug, Deserialize)]
struct ChangedFile {
    filename: String,
}

impl GitHubClient {
    /// Get a pull request's number and author
    pub async fn get_pr(&self, number: u64) -> Result<PullRequestInfo> {
        debug!(number, "Fetching pull request");

        let pr = self
            .client()
            .pulls(self.owner(), self.repo())
            .get(number)
            .await
            .map_err(|e| match &e {
                octocrab::Error::GitHub { source, .. }
                    if source.message.contains("Not Found") =>
                {
                    Error::PrNotFound(number)
                }
                _ => Error::Api(e),
            })?;

        let author = pr
            .user
            .map(|u| u.login)
            .ok_or_else(|| Error::Parse(format!("Pull request #{} has no author", number)))?;

        Ok(PullRequestInfo {
            number: pr.number,
            author,
        })
    }

    /// List every file changed by a pull request
    ///
    /// Pages are requested until GitHub returns an empty one; the result keeps
    /// GitHub's order across pages.
    pub async fn list_pr_files(&self, number: u64) -> Result<Vec<String>> {
        let route = self.route(&format!("pulls/{}/files", number));
        let mut files = Vec::new();
        let mut page = 1;

        loop {
            let params = PageParams {
                per_page: FILES_PER_PAGE,
                page,
            };
            let batch: Vec<ChangedFile> = self
                .client()
                .get(&route, Some(&params))
                .await
                .map_err(Error::Api)?;

            if batch.is_empty() {
                break;
            }

            debug!(page, count = batch.len(), "Fetched page of changed files");
            files.extend(batch.into_iter().map(|f| f.filename));
            page += 1;
        }

        for file in &files {
            debug!(file = %file, "Changed file");
        }
        info!(number, count = files.len(), "Found changed files");

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_query() {
        let params = PageParams {
            per_page: FILES_PER_PAGE,
            page: 3,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({"per_page": 100, "page": 3}));
    }

    #[test]
    fn test_changed_file_ignores_extra_fields() {
        let batch: Vec<ChangedFile> = serde_json::from_str(
            r#"[{"sha":"abc","filename":".github/workflows/ci.yml","status":"modified","additions":1}]"#,
        )
        .unwrap();
        assert_eq!(batch[0].filename, ".github/workflows/ci.yml");
    }
}
