//! Error types for autoreview

use thiserror::Error;

/// Result type alias for autoreview operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for autoreview operations
///
/// Every failure the engine reports is one of these kinds. Collaborator
/// failures are converted at the boundary and keep their underlying reason.
#[derive(Error, Debug)]
pub enum Error {
    /// The reviewer-rule document could not be found at the configured path
    #[error("Config missing: no reviewer rules found at {path}")]
    ConfigMissing { path: String },

    /// The reviewer-rule document is empty or not a valid rule mapping
    #[error("Config invalid: {0}")]
    ConfigInvalid(String),

    /// Reading the config, the pull request, or its file listing failed
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Submitting the review request failed
    #[error("Review request error: {0}")]
    ReviewRequest(String),

    /// Rendering or posting the notification comment failed
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

impl Error {
    /// Whether this error aborts the run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ConfigMissing { .. } | Error::ConfigInvalid(_) | Error::Fetch(_)
        )
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::ConfigInvalid(err.to_string())
    }
}

/// Errors raised while rendering a comment template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A placeholder names a value that was not bound
    #[error("no value bound for placeholder `{name}`")]
    Unbound { name: String },

    /// A `${` opener without a closing brace
    #[error("unterminated placeholder starting at byte {offset}")]
    Unterminated { offset: usize },

    /// A placeholder containing something other than a plain name
    #[error("unsupported placeholder expression `{expression}`")]
    Unsupported { expression: String },

    /// The rendered comment could not be delivered
    #[error("failed to post comment: {0}")]
    Delivery(String),
}
