use colored::Colorize;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

use crate::checker_options::IssueFormatter;
use crate::issue::{Issue, IssueSeverity};

/// Renders issues as text for the engine logger.
///
/// Output looks like:
///
/// ```text
/// ERROR in ./src/index.ts:3:7
/// TS2345: Argument of type 'string' is not assignable to parameter of type 'number'.
/// ```
///
/// The codeframe style appends the offending source line with a marker
/// under the reported column.
pub struct IssueReporter {
    kind: IssueFormatter,
    color: bool,
    context: PathBuf,
    sources: FxHashMap<String, Option<String>>,
}

impl IssueReporter {
    pub fn new(kind: IssueFormatter, context: impl Into<PathBuf>, color: bool) -> Self {
        IssueReporter {
            kind,
            color,
            context: context.into(),
            sources: FxHashMap::default(),
        }
    }

    pub fn format(&mut self, issue: &Issue) -> String {
        let mut output = String::new();
        output.push_str(&self.format_severity(issue.severity));

        if let Some(file) = issue.file.as_deref() {
            output.push_str(" in ");
            output.push_str(&self.format_location(file, issue));
        }

        output.push('\n');
        output.push_str(&self.format_code(&issue.code));
        output.push_str(": ");
        output.push_str(&issue.message);

        if self.kind == IssueFormatter::Codeframe
            && let (Some(file), Some(location)) = (issue.file.as_deref(), issue.location)
            && let Some(snippet) = self.format_snippet(file, location.line, location.column)
        {
            output.push_str(&snippet);
        }

        output
    }

    fn format_location(&self, file: &str, issue: &Issue) -> String {
        let display = display_path(file, &self.context);
        let location = match issue.location {
            Some(position) => format!("{}:{}:{}", display, position.line, position.column),
            None => display,
        };
        if self.color {
            location.cyan().to_string()
        } else {
            location
        }
    }

    fn format_severity(&self, severity: IssueSeverity) -> String {
        let label = severity.label();
        if !self.color {
            return label.to_string();
        }
        match severity {
            IssueSeverity::Error => label.red().bold().to_string(),
            IssueSeverity::Warning => label.yellow().bold().to_string(),
        }
    }

    fn format_code(&self, code: &str) -> String {
        if self.color {
            code.bright_blue().to_string()
        } else {
            code.to_string()
        }
    }

    /// Format the reported line with a `~` under the column:
    ///   3   add(1, "2");
    ///              ~
    fn format_snippet(&mut self, file: &str, line: u32, column: u32) -> Option<String> {
        if line == 0 {
            return None;
        }
        let source = self
            .sources
            .entry(file.to_string())
            .or_insert_with(|| std::fs::read_to_string(file).ok())
            .as_deref()?;
        let line_text = source.lines().nth((line - 1) as usize)?;

        let mut underline = String::new();
        for (i, ch) in line_text.chars().enumerate() {
            if i as u32 + 1 >= column {
                break;
            }
            // Tabs expand to 4 spaces
            if ch == '\t' {
                underline.push_str("    ");
            } else {
                underline.push(' ');
            }
        }
        let marker = if self.color {
            "~".red().to_string()
        } else {
            "~".to_string()
        };
        underline.push_str(&marker);

        let line_text = line_text.replace('\t', "    ");
        Some(format!("\n  {line:>3}   {line_text}\n        {underline}"))
    }
}

/// `./`-prefixed path relative to `context` when the file lives under it.
pub fn display_path(file: &str, context: &Path) -> String {
    let normalized = file.replace('\\', "/");
    let context = context.to_string_lossy().replace('\\', "/");
    let context = context.trim_end_matches('/');
    if !context.is_empty()
        && let Some(relative) = normalized.strip_prefix(context)
        && relative.starts_with('/')
    {
        return format!(".{relative}");
    }
    normalized
}
