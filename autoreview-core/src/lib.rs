//! Autoreview Core - reviewer assignment from glob rules
//!
//! This crate turns a reviewer rule document and the list of files changed
//! by a pull request into the set of reviewers to request, and renders the
//! notification comment. Talking to the code host goes through the
//! [`ReviewHost`] trait.

pub mod config;
pub mod context;
pub mod error;
pub mod host;
pub mod matcher;
pub mod orchestrator;
pub mod resolver;
pub mod template;

pub use config::{MatchRule, ReviewConfig, DEFAULT_CONFIG_PATH, DEFAULT_TEMPLATE};
pub use context::{ActionContext, PullRequestContext};
pub use error::{Error, Result, TemplateError};
pub use host::ReviewHost;
pub use matcher::GlobPattern;
pub use orchestrator::{Orchestrator, RunReport, RunStage};
pub use resolver::{resolve, ReviewerSet};
