//! Reviewer rule configuration
//!
//! The rule document is YAML with three top-level keys:
//!
//! ```yaml
//! addComment: true
//! template: ":wave: ${reviewers} please take a look"
//! matches:
//!   "*.go": [alice, bob]
//!   ".github/**": [org/platform]
//! ```
//!
//! Patterns under `matches` are kept in document order, which is the order
//! the resolver evaluates them in.

use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Conventional location of the rule document inside the repository
pub const DEFAULT_CONFIG_PATH: &str = ".github/reviewers.yml";

/// Comment template used when the document does not set one
pub const DEFAULT_TEMPLATE: &str =
    ":wave: ${reviewers} have been assigned to review this pull request.";

const EMPTY_CONFIG: &str = "config is empty or unparseable";

/// A glob pattern and the reviewers it assigns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRule {
    /// Glob pattern evaluated against changed file paths
    pub pattern: String,
    /// Reviewer handles (users or `org/team` slugs), never empty
    pub reviewers: Vec<String>,
}

impl MatchRule {
    pub fn new<I, S>(pattern: impl Into<String>, reviewers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pattern: pattern.into(),
            reviewers: reviewers.into_iter().map(Into::into).collect(),
        }
    }
}

/// Parsed reviewer rule document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewConfig {
    /// Pattern rules in document order; `None` when the document has no `matches` key
    pub matches: Option<Vec<MatchRule>>,
    /// Whether to post a notification comment after requesting review
    pub add_comment: bool,
    /// Comment template; see [`ReviewConfig::template`]
    pub template: Option<String>,
}

impl ReviewConfig {
    /// Build a config from text fetched at `path`
    ///
    /// `None` means the collaborator found nothing at the path.
    pub fn from_source(raw: Option<&str>, path: &str) -> Result<Self> {
        match raw {
            Some(text) => Self::parse(text),
            None => Err(Error::ConfigMissing {
                path: path.to_string(),
            }),
        }
    }

    /// Parse the rule document
    ///
    /// Empty documents, empty lists and anything other than a mapping at the
    /// top level are rejected. An empty mapping is a valid config with no rules.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(Error::ConfigInvalid(EMPTY_CONFIG.to_string()));
        }

        let document: Value = serde_yaml::from_str(text)?;
        let mapping = match document {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Err(Error::ConfigInvalid(EMPTY_CONFIG.to_string())),
            Value::Sequence(seq) if seq.is_empty() => {
                return Err(Error::ConfigInvalid(EMPTY_CONFIG.to_string()))
            }
            other => {
                return Err(Error::ConfigInvalid(format!(
                    "expected a mapping at the top level, found {}",
                    kind(&other)
                )))
            }
        };

        let mut config = Self::default();

        for (key, value) in &mapping {
            match key.as_str() {
                Some("matches") => config.matches = parse_matches(value)?,
                Some("addComment") => config.add_comment = parse_add_comment(value),
                Some("template") => config.template = parse_template(value)?,
                _ => debug!(key = ?key, "Ignoring unknown config key"),
            }
        }

        Ok(config)
    }

    /// The comment template to render, falling back to [`DEFAULT_TEMPLATE`]
    pub fn template(&self) -> &str {
        self.template.as_deref().unwrap_or(DEFAULT_TEMPLATE)
    }
}

fn parse_matches(value: &Value) -> Result<Option<Vec<MatchRule>>> {
    let mapping: &Mapping = match value {
        Value::Null => return Ok(None),
        Value::Mapping(mapping) => mapping,
        other => {
            return Err(Error::ConfigInvalid(format!(
                "`matches` must be a mapping of patterns to reviewers, found {}",
                kind(other)
            )))
        }
    };

    let mut rules = Vec::with_capacity(mapping.len());
    for (key, reviewers) in mapping {
        let pattern = key.as_str().ok_or_else(|| {
            Error::ConfigInvalid(format!(
                "pattern keys under `matches` must be strings, found {}",
                kind(key)
            ))
        })?;
        rules.push(MatchRule {
            pattern: pattern.to_string(),
            reviewers: parse_reviewers(pattern, reviewers)?,
        });
    }

    Ok(Some(rules))
}

fn parse_reviewers(pattern: &str, value: &Value) -> Result<Vec<String>> {
    let reviewers = match value {
        Value::String(handle) => vec![handle.clone()],
        Value::Sequence(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    Error::ConfigInvalid(format!(
                        "reviewers for `{}` must be strings, found {}",
                        pattern,
                        kind(item)
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?,
        other => {
            return Err(Error::ConfigInvalid(format!(
                "reviewers for `{}` must be a list of handles, found {}",
                pattern,
                kind(other)
            )))
        }
    };

    if reviewers.is_empty() {
        return Err(Error::ConfigInvalid(format!(
            "pattern `{}` has no reviewers",
            pattern
        )));
    }

    Ok(reviewers)
}

/// `addComment` is on for any truthy value; null, `false`, `0` and `""` turn it off
fn parse_add_comment(value: &Value) -> bool {
    let enabled = truthy(value);
    if !matches!(value, Value::Null | Value::Bool(_)) {
        warn!(value = ?value, enabled, "`addComment` is not a boolean");
    }
    enabled
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(_) | Value::Mapping(_) => true,
        Value::Tagged(tagged) => truthy(&tagged.value),
    }
}

fn parse_template(value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(template) => Ok(Some(template.clone())),
        other => Err(Error::ConfigInvalid(format!(
            "`template` must be a string, found {}",
            kind(other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
