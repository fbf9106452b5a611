//! Autoreview GitHub - GitHub integration for autoreview
//!
//! This crate implements [`autoreview_core::ReviewHost`] on top of the GitHub
//! REST API: reading the rule document, listing a pull request's changed
//! files, requesting reviewers and posting comments.

mod client;
mod content;
mod error;
mod host;
mod pr;
mod review;

pub use client::GitHubClient;
pub use error::{Error, Result};
pub use review::ReviewerSplit;
