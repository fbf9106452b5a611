//! Error types for GitHub operations

use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during GitHub operations
#[derive(Error, Debug)]
pub enum Error {
    /// GitHub API error
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    /// Authentication error
    #[error("GitHub authentication error: {0}")]
    Auth(String),

    /// Pull request not found
    #[error("Pull request #{0} not found")]
    PrNotFound(u64),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Whether GitHub answered 404 Not Found
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Api(octocrab::Error::GitHub { source, .. }) => {
                source.message.contains("Not Found")
            }
            Error::PrNotFound(_) => true,
            _ => false,
        }
    }
}

/// Describe an API failure with GitHub's own message and any field errors
pub(crate) fn describe(err: &octocrab::Error) -> String {
    match err {
        octocrab::Error::GitHub { source, .. } => match &source.errors {
            Some(details) if !details.is_empty() => {
                let details: Vec<String> = details.iter().map(|d| d.to_string()).collect();
                format!("{} ({})", source.message, details.join("; "))
            }
            _ => source.message.clone(),
        },
        other => other.to_string(),
    }
}
