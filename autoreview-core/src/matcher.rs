//! Glob matching of changed file paths
//!
//! Patterns follow shell glob rules with dotfiles treated like any other
//! file: `*`, `?` and `[...]` stay within one path segment, `**` spans any
//! number of directories, and a leading `.` needs no literal match, so
//! `.github/**` and `**/*.yml` both see `.github/workflows/ci.yml`.
//!
//! On top of the `glob` crate this adds brace alternation (`*.{js,ts}`),
//! `[^...]` negated classes and a leading `!` that inverts the pattern.

use glob::{MatchOptions, Pattern, PatternError};
use tracing::{debug, warn};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled glob pattern
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    negated: bool,
    alternatives: Vec<Pattern>,
}

impl GlobPattern {
    /// Compile a pattern, expanding brace alternatives
    pub fn new(source: &str) -> Result<Self, PatternError> {
        let (negated, body) = match source.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, source),
        };
        let body = body.strip_prefix("./").unwrap_or(body);

        let alternatives = expand_braces(body)
            .iter()
            .map(|alt| Pattern::new(&normalize(alt)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source: source.to_string(),
            negated,
            alternatives,
        })
    }

    /// The pattern as written in the config
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Test one repository-relative path
    pub fn matches(&self, path: &str) -> bool {
        let hit = self
            .alternatives
            .iter()
            .any(|p| p.matches_with(path, MATCH_OPTIONS));
        hit != self.negated
    }

    /// First path in `files` this pattern matches
    ///
    /// Matching is existential: evaluation stops at the first hit.
    pub fn first_match<'a, S: AsRef<str>>(&self, files: &'a [S]) -> Option<&'a str> {
        files
            .iter()
            .map(|file| file.as_ref())
            .find(|file: &&str| self.matches(file))
    }
}

/// Test one path against one pattern
///
/// A pattern that does not compile never matches.
pub fn matches(file_path: &str, pattern: &str) -> bool {
    match GlobPattern::new(pattern) {
        Ok(compiled) => compiled.matches(file_path),
        Err(e) => {
            warn!(pattern, error = %e, "Invalid glob pattern never matches");
            false
        }
    }
}

/// First changed file matching `pattern`, if any
pub fn first_match<'a, S: AsRef<str>>(files: &'a [S], pattern: &str) -> Option<&'a str> {
    let compiled = match GlobPattern::new(pattern) {
        Ok(compiled) => compiled,
        Err(e) => {
            warn!(pattern, error = %e, "Invalid glob pattern never matches");
            return None;
        }
    };

    let found = compiled.first_match(files);
    if found.is_none() {
        debug!(pattern, "No changed file matches pattern");
    }
    found
}

/// Rewrite minimatch-style syntax the `glob` crate spells differently
fn normalize(pattern: &str) -> String {
    let mut out = pattern
        .replace("[^", "[!")
        .split('/')
        .map(collapse_stars)
        .collect::<Vec<_>>()
        .join("/");

    // `dir/**` has to reach files nested at any depth below `dir`
    if out == "**" || out.ends_with("/**") {
        out.push_str("/*");
    }

    out
}

/// Outside a whole `**` segment, runs of `*` mean a single `*`
fn collapse_stars(segment: &str) -> String {
    if segment == "**" || !segment.contains("**") {
        return segment.to_string();
    }

    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Expand `{a,b}` groups into every alternative, left to right
///
/// Groups without a top-level comma are kept literally, as shells do.
fn expand_braces(pattern: &str) -> Vec<String> {
    let Some((open, close, options)) = find_brace_group(pattern) else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];

    options
        .iter()
        .flat_map(|option| expand_braces(&format!("{prefix}{option}{suffix}")))
        .collect()
}

/// Locate the first brace group with at least one top-level comma
fn find_brace_group(pattern: &str) -> Option<(usize, usize, Vec<&str>)> {
    let bytes = pattern.as_bytes();
    let mut search_from = 0;

    while let Some(rel) = pattern[search_from..].find('{') {
        let open = search_from + rel;
        let mut depth = 0usize;
        let mut splits = Vec::new();
        let mut close = None;

        for (i, &b) in bytes.iter().enumerate().skip(open) {
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i);
                        break;
                    }
                }
                b',' if depth == 1 => splits.push(i),
                _ => {}
            }
        }

        let close = close?;
        if !splits.is_empty() {
            let mut options = Vec::with_capacity(splits.len() + 1);
            let mut start = open + 1;
            for split in splits {
                options.push(&pattern[start..split]);
                start = split + 1;
            }
            options.push(&pattern[start..close]);
            return Some((open, close, options));
        }

        search_from = open + 1;
    }

    None
}
