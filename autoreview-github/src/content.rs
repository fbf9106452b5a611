//! Repository file contents

use crate::{Error, GitHubClient, Result};
use tracing::{debug, warn};

impl GitHubClient {
    /// Read a text file from the repository at `git_ref` (default branch when `None`)
    ///
    /// Returns `None` when the path does not exist or names a directory.
    pub async fn get_file_text(&self, path: &str, git_ref: Option<&str>) -> Result<Option<String>> {
        debug!(path, git_ref = ?git_ref, "Fetching file contents");

        let repos = self.client().repos(self.owner(), self.repo());
        let mut builder = repos.get_content().path(path);
        if let Some(r) = git_ref {
            builder = builder.r#ref(r);
        }

        let contents = match builder.send().await {
            Ok(contents) => contents,
            Err(e) => {
                let err = Error::Api(e);
                if err.is_not_found() {
                    debug!(path, "File not found");
                    return Ok(None);
                }
                return Err(err);
            }
        };

        let [item] = contents.items.as_slice() else {
            warn!(path, entries = contents.items.len(), "Path is a directory, not a file");
            return Ok(None);
        };

        if item.r#type != "file" || item.path.trim_start_matches('/') != path.trim_start_matches('/') {
            warn!(path, kind = %item.r#type, "Path is not a regular file");
            return Ok(None);
        }

        match item.decoded_content() {
            Some(text) => Ok(Some(text)),
            None => Err(Error::Parse(format!(
                "Could not decode contents of {}",
                path
            ))),
        }
    }
}
