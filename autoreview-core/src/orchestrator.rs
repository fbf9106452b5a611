//! Run orchestration
//!
//! A run moves through the stages
//! `Start -> ConfigLoaded -> FilesFetched -> ReviewersResolved ->
//! ReviewRequested -> [CommentPosted] -> Done`.
//!
//! Failing to load the config, the pull request, or its files aborts the run
//! with an `Err`. Review-request and comment failures are recorded on the
//! [`RunReport`] instead; both side effects are always attempted.

use tracing::{debug, error, info};

use crate::config::{ReviewConfig, DEFAULT_CONFIG_PATH};
use crate::context::ActionContext;
use crate::error::TemplateError;
use crate::host::ReviewHost;
use crate::resolver::{self, ReviewerSet};
use crate::template::{self, Bindings};
use crate::{Error, Result};

/// Furthest stage a run reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunStage {
    Start,
    ConfigLoaded,
    FilesFetched,
    ReviewersResolved,
    ReviewRequested,
    CommentPosted,
    Done,
}

impl std::fmt::Display for RunStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunStage::Start => "start",
            RunStage::ConfigLoaded => "config loaded",
            RunStage::FilesFetched => "files fetched",
            RunStage::ReviewersResolved => "reviewers resolved",
            RunStage::ReviewRequested => "review requested",
            RunStage::CommentPosted => "comment posted",
            RunStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Outcome of a completed run
#[derive(Debug)]
pub struct RunReport {
    /// Last stage the run passed through before finishing
    pub last_stage: RunStage,
    /// Resolved reviewers, empty when nothing matched
    pub reviewers: ReviewerSet,
    /// Whether a review request was accepted by the host
    pub review_requested: bool,
    /// Body of the posted comment, if one was posted
    pub comment: Option<String>,
    /// Non-fatal failures, in the order they happened
    pub failures: Vec<Error>,
}

impl RunReport {
    fn new() -> Self {
        Self {
            last_stage: RunStage::Start,
            reviewers: ReviewerSet::new(),
            review_requested: false,
            comment: None,
            failures: Vec::new(),
        }
    }

    fn advance(&mut self, stage: RunStage) {
        debug!(from = %self.last_stage, to = %stage, "Run stage");
        self.last_stage = stage;
    }

    fn record(&mut self, failure: Error) {
        error!(error = %failure, stage = %self.last_stage, "Recorded run failure");
        self.failures.push(failure);
    }

    /// True when no failure was recorded
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives one run against a [`ReviewHost`]
pub struct Orchestrator<'h, H: ReviewHost + ?Sized> {
    host: &'h H,
    config_path: String,
}

impl<'h, H: ReviewHost + ?Sized> Orchestrator<'h, H> {
    /// Create an orchestrator reading rules from [`DEFAULT_CONFIG_PATH`]
    pub fn new(host: &'h H) -> Self {
        Self {
            host,
            config_path: DEFAULT_CONFIG_PATH.to_string(),
        }
    }

    /// Read rules from a different repository path
    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = path.into();
        self
    }

    pub fn config_path(&self) -> &str {
        &self.config_path
    }

    /// Execute the run for the pull request in `ctx`
    pub async fn run(&self, ctx: &ActionContext) -> Result<RunReport> {
        let mut report = RunReport::new();

        let config = self.load_config(ctx).await?;
        report.advance(RunStage::ConfigLoaded);

        if config.matches.is_none() {
            info!("No match rules provided");
            report.advance(RunStage::Done);
            return Ok(report);
        }

        let pr = self.host.pull_request(ctx.pull_number).await?;
        let changed_files = self.host.list_changed_files(pr.number).await?;
        debug!(count = changed_files.len(), files = ?changed_files, "Found changed files");
        report.advance(RunStage::FilesFetched);

        report.reviewers = resolver::resolve(&changed_files, &config, &pr.author);
        report.advance(RunStage::ReviewersResolved);

        if report.reviewers.is_empty() {
            info!(pr = pr.number, "No reviewers matched the changed files");
            report.advance(RunStage::Done);
            return Ok(report);
        }

        info!(reviewers = ?report.reviewers.as_slice(), "Assigning reviewers");
        match self
            .host
            .request_review(pr.number, report.reviewers.as_slice())
            .await
        {
            Ok(()) => report.review_requested = true,
            Err(e) => report.record(into_review_request_error(e)),
        }
        report.advance(RunStage::ReviewRequested);

        if config.add_comment {
            match self.post_comment(pr.number, &config, &report.reviewers).await {
                Ok(body) => {
                    report.comment = Some(body);
                    report.advance(RunStage::CommentPosted);
                }
                Err(e) => report.record(Error::Template(e)),
            }
        }

        info!(
            reviewers = report.reviewers.len(),
            failures = report.failures.len(),
            "Finished"
        );
        report.advance(RunStage::Done);
        Ok(report)
    }

    async fn load_config(&self, ctx: &ActionContext) -> Result<ReviewConfig> {
        let raw = self
            .host
            .fetch_config_text(&self.config_path, ctx.sha.as_deref())
            .await?;

        if raw.is_none() {
            error!(path = %self.config_path, "Invalid config path");
        }

        let config = ReviewConfig::from_source(raw.as_deref(), &self.config_path)?;
        debug!(config = ?config, "Loaded reviewer config");
        Ok(config)
    }

    async fn post_comment(
        &self,
        number: u64,
        config: &ReviewConfig,
        reviewers: &ReviewerSet,
    ) -> std::result::Result<String, TemplateError> {
        let template = config.template();
        debug!(template, "Rendering comment template");

        let bindings = Bindings::from([("reviewers".to_string(), reviewers.mentions())]);
        let body = template::render(template, &bindings)?;

        self.host
            .post_comment(number, &body)
            .await
            .map_err(|e| match e {
                Error::Template(inner) => inner,
                other => TemplateError::Delivery(other.to_string()),
            })?;

        info!(pr = number, "Posted review comment");
        Ok(body)
    }
}

fn into_review_request_error(err: Error) -> Error {
    match err {
        Error::ReviewRequest(_) => err,
        other => Error::ReviewRequest(other.to_string()),
    }
}
