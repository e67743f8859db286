//! Checker issues and the matchers used to include or exclude them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Matches files under a dependency directory, in either slash style.
static NODE_MODULES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\\/]node_modules[\\/]").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

impl IssueSeverity {
    pub fn label(self) -> &'static str {
        match self {
            IssueSeverity::Error => "ERROR",
            IssueSeverity::Warning => "WARNING",
        }
    }
}

/// 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuePosition {
    pub line: u32,
    pub column: u32,
}

/// One diagnostic reported by the checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub severity: IssueSeverity,
    /// Diagnostic code including the `TS` prefix, e.g. `TS2345`.
    pub code: String,
    pub message: String,
    /// Absolute path of the offending file, if the diagnostic has one.
    pub file: Option<String>,
    pub location: Option<IssuePosition>,
}

impl Issue {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            code: code.into(),
            message: message.into(),
            file: None,
            location: None,
        }
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            ..Self::error(code, message)
        }
    }

    pub fn at(mut self, file: impl Into<String>, line: u32, column: u32) -> Self {
        self.file = Some(file.into());
        self.location = Some(IssuePosition { line, column });
        self
    }
}

/// Shared predicate over issues.
#[derive(Clone)]
pub struct IssuePredicate(Arc<dyn Fn(&Issue) -> bool + Send + Sync>);

impl IssuePredicate {
    pub fn new(predicate: impl Fn(&Issue) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    pub fn test(&self, issue: &Issue) -> bool {
        (self.0)(issue)
    }
}

impl fmt::Debug for IssuePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IssuePredicate(..)")
    }
}

/// Selects issues for `issue.include` / `issue.exclude`.
///
/// Deserializes from `{ "file": "<glob>" }` or `{ "code": "TS2345" }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueMatcher {
    File(String),
    Code(String),
    #[serde(skip)]
    Predicate(IssuePredicate),
}

impl IssueMatcher {
    pub fn file(pattern: impl Into<String>) -> Self {
        IssueMatcher::File(pattern.into())
    }

    pub fn code(code: impl Into<String>) -> Self {
        IssueMatcher::Code(code.into())
    }

    pub fn predicate(predicate: impl Fn(&Issue) -> bool + Send + Sync + 'static) -> Self {
        IssueMatcher::Predicate(IssuePredicate::new(predicate))
    }

    /// Matches issues whose file lives under a `node_modules` directory.
    pub fn node_modules() -> Self {
        Self::predicate(|issue| {
            issue
                .file
                .as_deref()
                .is_some_and(|file| NODE_MODULES_RE.is_match(file))
        })
    }

    /// `context` is the directory file globs are relative to.
    pub fn matches(&self, issue: &Issue, context: &Path) -> bool {
        match self {
            IssueMatcher::File(pattern) => match issue.file.as_deref() {
                Some(file) => file_matches_glob(pattern, file, context),
                None => false,
            },
            IssueMatcher::Code(code) => {
                normalize_code(code).eq_ignore_ascii_case(normalize_code(&issue.code))
            }
            IssueMatcher::Predicate(predicate) => predicate.test(issue),
        }
    }
}

/// Include/exclude filter applied before an issue is reported.
#[derive(Debug, Clone, Default)]
pub struct IssueFilter<'a> {
    pub include: &'a [IssueMatcher],
    pub exclude: &'a [IssueMatcher],
}

impl IssueFilter<'_> {
    pub fn accepts(&self, issue: &Issue, context: &Path) -> bool {
        let included = self.include.is_empty()
            || self
                .include
                .iter()
                .any(|matcher| matcher.matches(issue, context));
        included
            && !self
                .exclude
                .iter()
                .any(|matcher| matcher.matches(issue, context))
    }
}

fn normalize_code(code: &str) -> &str {
    let code = code.trim();
    if let Some(prefix) = code.get(..2)
        && prefix.eq_ignore_ascii_case("ts")
        && code.len() > 2
    {
        &code[2..]
    } else {
        code
    }
}

fn file_matches_glob(pattern: &str, file: &str, context: &Path) -> bool {
    let glob = match globset::GlobBuilder::new(&normalize_slashes(pattern))
        .literal_separator(true)
        .build()
    {
        Ok(glob) => glob,
        Err(err) => {
            tracing::debug!(pattern, %err, "ignoring invalid issue file glob");
            return false;
        }
    };
    let matcher = glob.compile_matcher();

    let absolute = normalize_slashes(file);
    if matcher.is_match(&absolute) {
        return true;
    }

    let context = normalize_slashes(&context.to_string_lossy());
    let context = context.trim_end_matches('/');
    match absolute.strip_prefix(context) {
        Some(relative) if relative.starts_with('/') => {
            matcher.is_match(relative.trim_start_matches('/'))
        }
        _ => false,
    }
}

fn normalize_slashes(value: &str) -> String {
    value.replace('\\', "/")
}
