//! Reviewer resolution from matched rules

use tracing::{debug, info};

use crate::config::ReviewConfig;
use crate::matcher;

/// Unique reviewer handles, iterated in first-insertion order
///
/// Equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct ReviewerSet {
    handles: Vec<String>,
}

impl ReviewerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handle; returns `false` if it was already present
    pub fn insert(&mut self, handle: impl Into<String>) -> bool {
        let handle = handle.into();
        if self.contains(&handle) {
            return false;
        }
        self.handles.push(handle);
        true
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.handles.iter().any(|h| h == handle)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.handles.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.handles
    }

    pub fn into_vec(self) -> Vec<String> {
        self.handles
    }

    /// Mention list for a comment, e.g. `@alice, @org/platform`
    pub fn mentions(&self) -> String {
        self.handles
            .iter()
            .map(|h| format!("@{}", h.trim_start_matches('@')))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl PartialEq for ReviewerSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.handles.iter().all(|h| other.contains(h))
    }
}

impl Eq for ReviewerSet {}

impl<S: Into<String>> FromIterator<S> for ReviewerSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for handle in iter {
            set.insert(handle);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ReviewerSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.handles.iter()
    }
}

/// Resolve the reviewers for a change set
///
/// Patterns are evaluated in config order. A pattern counts as matched when
/// any one changed file satisfies it; its reviewers, minus every occurrence
/// of `author`, are added to the set. A config without `matches` resolves to
/// the empty set without looking at the files.
pub fn resolve(changed_files: &[String], config: &ReviewConfig, author: &str) -> ReviewerSet {
    let mut reviewers = ReviewerSet::new();

    let Some(rules) = &config.matches else {
        debug!("No match rules provided");
        return reviewers;
    };

    for rule in rules {
        let Some(file) = matcher::first_match(changed_files, &rule.pattern) else {
            continue;
        };
        info!(file, pattern = %rule.pattern, "Changed file matches pattern");

        for reviewer in rule.reviewers.iter().filter(|r| r.as_str() != author) {
            if reviewers.insert(reviewer.as_str()) {
                debug!(reviewer = %reviewer, pattern = %rule.pattern, "Added reviewer");
            }
        }
    }

    reviewers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchRule;

    fn config(rules: Vec<MatchRule>) -> ReviewConfig {
        ReviewConfig {
            matches: Some(rules),
            ..Default::default()
        }
    }

    fn files(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    fn set(handles: &[&str]) -> ReviewerSet {
        handles.iter().copied().collect()
    }

    #[test]
    fn test_author_excluded() {
        let cfg = config(vec![MatchRule::new("*.go", ["alice", "bob"])]);
        let result = resolve(&files(&["main.go"]), &cfg, "bob");
        assert_eq!(result, set(&["alice"]));
    }

    #[test]
    fn test_no_match() {
        let cfg = config(vec![MatchRule::new("docs/**", ["carol"])]);
        let result = resolve(&files(&["src/a.ts"]), &cfg, "dave");
        assert!(result.is_empty());
    }

    #[test]
    fn test_dotfile_match() {
        let cfg = config(vec![MatchRule::new(".github/**", ["ops"])]);
        let result = resolve(&files(&[".github/workflows/ci.yml"]), &cfg, "dave");
        assert_eq!(result, set(&["ops"]));
    }

    #[test]
    fn test_dedup_across_patterns() {
        let cfg = config(vec![
            MatchRule::new("*.go", ["alice", "bob"]),
            MatchRule::new("docs/**", ["bob", "carol"]),
        ]);
        let result = resolve(&files(&["main.go", "docs/readme.md"]), &cfg, "erin");
        assert_eq!(result.len(), 3);
        assert_eq!(result, set(&["alice", "bob", "carol"]));
    }

    #[test]
    fn test_author_excluded_from_every_matched_pattern() {
        let cfg = config(vec![
            MatchRule::new("*.go", ["alice", "bob", "alice"]),
            MatchRule::new("**/*.go", ["alice", "carol"]),
        ]);
        let result = resolve(&files(&["main.go"]), &cfg, "alice");
        assert!(!result.contains("alice"));
        assert_eq!(result, set(&["bob", "carol"]));
    }

    #[test]
    fn test_only_author_listed_contributes_nothing() {
        let cfg = config(vec![MatchRule::new("*", ["alice"])]);
        let result = resolve(&files(&["Makefile"]), &cfg, "alice");
        assert!(result.is_empty());
    }

    #[test]
    fn test_absent_matches_is_empty() {
        let cfg = ReviewConfig::default();
        let result = resolve(&files(&["main.go"]), &cfg, "alice");
        assert!(result.is_empty());
    }

    #[test]
    fn test_no_changed_files() {
        let cfg = config(vec![MatchRule::new("**", ["alice"])]);
        let empty: Vec<String> = Vec::new();
        assert!(resolve(&empty, &cfg, "bob").is_empty());
    }

    #[test]
    fn test_unmatched_rule_ignored() {
        let cfg = config(vec![
            MatchRule::new("*.rs", ["rustacean"]),
            MatchRule::new("*.py", ["pythonista"]),
        ]);
        let result = resolve(&files(&["lib.rs", "other/x.py"]), &cfg, "z");
        assert_eq!(result, set(&["rustacean"]));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let cfg = config(vec![
            MatchRule::new("src/**", ["alice", "org/core"]),
            MatchRule::new("*.toml", ["bob"]),
        ]);
        let changed = files(&["src/lib.rs", "Cargo.toml"]);
        let first = resolve(&changed, &cfg, "carol");
        let second = resolve(&changed, &cfg, "carol");
        assert_eq!(first, second);
    }

    #[test]
    fn test_first_insertion_order() {
        let cfg = config(vec![
            MatchRule::new("*.go", ["bob", "alice"]),
            MatchRule::new("*.md", ["carol", "bob"]),
        ]);
        let result = resolve(&files(&["a.md", "b.go"]), &cfg, "x");
        assert_eq!(result.as_slice(), ["bob", "alice", "carol"]);
    }

    #[test]
    fn test_set_semantics() {
        let mut reviewers = ReviewerSet::new();
        assert!(reviewers.insert("alice"));
        assert!(!reviewers.insert("alice"));
        assert!(reviewers.insert("bob"));
        assert_eq!(reviewers.len(), 2);
        assert_eq!(reviewers, set(&["bob", "alice"]));
        assert_ne!(reviewers, set(&["bob"]));
    }

    #[test]
    fn test_mentions() {
        let reviewers = set(&["alice", "org/platform", "@bob"]);
        assert_eq!(reviewers.mentions(), "@alice, @org/platform, @bob");
        assert_eq!(ReviewerSet::new().mentions(), "");
    }
}
