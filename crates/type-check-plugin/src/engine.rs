//! Background checker engine installed into the bundler chain.
//!
//! The engine runs the project's own `tsc` in a separate Node.js process on
//! a worker thread, so the bundler keeps emitting while types are checked.
//! Results are parsed from `--pretty false` output, filtered through the
//! issue matchers and written to the engine logger.

use anyhow::{Context, Result, anyhow, bail};
use bundler_chain::{BundlerPlugin, Compilation};
use once_cell::sync::Lazy;
use regex::Regex;
use std::any::Any;
use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::checker_options::{CheckMode, EngineOptions, TypeScriptOptions};
use crate::formatter::IssueReporter;
use crate::issue::{Issue, IssuePosition, IssueSeverity};

pub const TS_CHECKER_PLUGIN_NAME: &str = "ts-checker";

static DIAG_WITH_POS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<file>.+?)\((?P<line>\d+),(?P<col>\d+)\):\s+(?P<severity>error|warning)\s+(?P<code>TS\d+):\s*(?P<message>.*)$",
    )
    .expect("valid regex")
});
static DIAG_NO_POS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<severity>error|warning)\s+(?P<code>TS\d+):\s*(?P<message>.*)$")
        .expect("valid regex")
});

/// A fully described checker process launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInvocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct CheckOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Runs a checker invocation to completion.
pub trait CheckRunner: Send + Sync {
    fn run(&self, invocation: &CheckInvocation) -> Result<CheckOutput>;
}

/// Spawns the invocation as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct TscProcessRunner;

impl CheckRunner for TscProcessRunner {
    fn run(&self, invocation: &CheckInvocation) -> Result<CheckOutput> {
        let output = std::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .output()
            .with_context(|| format!("failed to spawn {}", invocation.program.display()))?;
        Ok(CheckOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
        })
    }
}

/// Build the `node ... tsc.js ...` invocation for these options.
pub fn checker_invocation(options: &TypeScriptOptions) -> CheckInvocation {
    let tsc = options
        .typescript_path
        .parent()
        .map(|dir| dir.join("tsc.js"))
        .unwrap_or_else(|| PathBuf::from("tsc.js"));
    let config = options.config_file.as_os_str().to_os_string();

    let mut args: Vec<OsString> = vec![
        format!("--max-old-space-size={}", options.memory_limit).into(),
        tsc.into_os_string(),
        "--pretty".into(),
        "false".into(),
    ];

    let build = options.build || options.mode == CheckMode::WriteReferences;
    args.push(if build { "--build" } else { "--project" }.into());
    args.push(config);

    // Referenced projects must emit so dependents can check against their
    // declarations, so build mode never passes `--noEmit`.
    let mode_args: &[&str] = match (build, options.mode) {
        (true, CheckMode::WriteReferences) => &["--emitDeclarationOnly"],
        (true, _) => &[],
        (false, CheckMode::Readonly) => &["--noEmit"],
        (false, CheckMode::WriteTsbuildinfo) => &["--noEmit", "--incremental"],
        (false, CheckMode::WriteDts | CheckMode::WriteReferences) => {
            &["--declaration", "--emitDeclarationOnly"]
        }
    };
    args.extend(mode_args.iter().map(OsString::from));

    CheckInvocation {
        program: options.node().to_path_buf(),
        args,
        cwd: options.context_dir(),
    }
}

/// Parse `tsc --pretty false` output into issues.
///
/// Indented lines continue the previous message. Relative file names are
/// resolved against `context`.
pub fn parse_tsc_output(text: &str, context: &Path) -> Vec<Issue> {
    let mut issues: Vec<Issue> = Vec::new();
    for raw_line in text.lines() {
        if raw_line.trim().is_empty() {
            continue;
        }

        if raw_line.starts_with(char::is_whitespace) {
            if let Some(last) = issues.last_mut() {
                last.message.push('\n');
                last.message.push_str(raw_line.trim());
            }
            continue;
        }

        let line = raw_line.trim_end();
        if let Some(caps) = DIAG_WITH_POS_RE.captures(line) {
            let file = resolve_file(&caps["file"], context);
            let position = IssuePosition {
                line: caps["line"].parse().unwrap_or(0),
                column: caps["col"].parse().unwrap_or(0),
            };
            issues.push(Issue {
                severity: parse_severity(&caps["severity"]),
                code: caps["code"].to_string(),
                message: caps["message"].to_string(),
                file: Some(file),
                location: Some(position),
            });
            continue;
        }

        if let Some(caps) = DIAG_NO_POS_RE.captures(line) {
            issues.push(Issue {
                severity: parse_severity(&caps["severity"]),
                code: caps["code"].to_string(),
                message: caps["message"].to_string(),
                file: None,
                location: None,
            });
        }
    }
    issues
}

fn parse_severity(value: &str) -> IssueSeverity {
    if value == "warning" {
        IssueSeverity::Warning
    } else {
        IssueSeverity::Error
    }
}

fn resolve_file(file: &str, context: &Path) -> String {
    let path = Path::new(file);
    if path.is_absolute() {
        file.to_string()
    } else {
        context.join(path).to_string_lossy().into_owned()
    }
}

/// Counts of issues that passed the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub config_file: PathBuf,
    pub errors: usize,
    pub warnings: usize,
}

impl CheckSummary {
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

/// Run one check synchronously and report through the engine logger.
pub fn run_check(
    options: &EngineOptions,
    runner: &dyn CheckRunner,
    color: bool,
) -> Result<CheckSummary> {
    let config_file = &options.typescript.config_file;
    let _span = tracing::info_span!("type_check", config = %config_file.display()).entered();

    let invocation = checker_invocation(&options.typescript);
    tracing::debug!(
        program = %invocation.program.display(),
        args = ?invocation.args,
        "spawn checker"
    );
    options.logger.log("Type-checking in progress...");

    let output = runner.run(&invocation)?;
    let context = options.typescript.context_dir();
    let combined = format!("{}\n{}", output.stdout, output.stderr);
    let issues = parse_tsc_output(&combined, &context);

    if !output.success && issues.is_empty() {
        bail!("type checker exited unexpectedly: {}", output.stderr.trim());
    }

    let filter = options.issue.filter();
    let mut reporter = IssueReporter::new(options.formatter, &context, color);
    let mut summary = CheckSummary {
        config_file: config_file.clone(),
        ..CheckSummary::default()
    };
    for issue in issues.iter().filter(|issue| filter.accepts(issue, &context)) {
        match issue.severity {
            IssueSeverity::Error => summary.errors += 1,
            IssueSeverity::Warning => summary.warnings += 1,
        }
        options.logger.error(&reporter.format(issue));
    }
    tracing::debug!(
        total = issues.len(),
        errors = summary.errors,
        warnings = summary.warnings,
        "type check finished"
    );

    if summary.errors == 0 && summary.warnings == 0 {
        options.logger.log("No typescript errors found.");
    } else {
        options.logger.log(&format!(
            "Found {} error(s) and {} warning(s)",
            summary.errors, summary.warnings
        ));
    }

    Ok(summary)
}

struct PendingCheck {
    handle: JoinHandle<Result<CheckSummary>>,
    is_async: bool,
}

/// Bundler plugin wrapping one checker configuration.
pub struct TsCheckerEngine {
    options: Arc<EngineOptions>,
    runner: Arc<dyn CheckRunner>,
    pending: Option<PendingCheck>,
}

impl TsCheckerEngine {
    pub fn new(options: EngineOptions, runner: Arc<dyn CheckRunner>) -> Self {
        Self {
            options: Arc::new(options),
            runner,
            pending: None,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Block until the current check finishes. `None` when nothing is running.
    pub fn wait(&mut self) -> Option<Result<CheckSummary>> {
        let pending = self.pending.take()?;
        Some(join_check(pending.handle))
    }

    fn start(&mut self, is_async: bool) {
        let options = Arc::clone(&self.options);
        let runner = Arc::clone(&self.runner);
        let color = std::io::stderr().is_terminal();
        let handle = std::thread::spawn(move || {
            let result = run_check(&options, runner.as_ref(), color);
            if let Err(err) = &result {
                options.logger.error(&format!("Type checking failed: {err:#}"));
            }
            result
        });
        self.pending = Some(PendingCheck { handle, is_async });
    }
}

fn join_check(handle: JoinHandle<Result<CheckSummary>>) -> Result<CheckSummary> {
    handle
        .join()
        .map_err(|_| anyhow!("type checker thread panicked"))?
}

impl BundlerPlugin for TsCheckerEngine {
    fn name(&self) -> &str {
        TS_CHECKER_PLUGIN_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn before_compile(&mut self, compilation: &mut Compilation) -> Result<()> {
        // A rebuild waits for the previous run instead of overlapping it.
        if let Some(previous) = self.pending.take()
            && let Err(err) = join_check(previous.handle)
        {
            tracing::debug!(error = %format!("{err:#}"), "previous type check failed");
        }
        let is_async = self.options.is_async(compilation.is_prod);
        self.start(is_async);
        Ok(())
    }

    fn after_emit(&mut self, compilation: &mut Compilation) -> Result<()> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };
        if pending.is_async {
            self.pending = Some(pending);
            return Ok(());
        }

        match join_check(pending.handle) {
            Ok(summary) => {
                if summary.has_errors() {
                    compilation.push_error(format!(
                        "Found {} type error(s) in {}",
                        summary.errors,
                        summary.config_file.display()
                    ));
                }
                if summary.warnings > 0 {
                    compilation.push_warning(format!(
                        "Found {} type warning(s) in {}",
                        summary.warnings,
                        summary.config_file.display()
                    ));
                }
            }
            Err(err) => compilation.push_error(format!("{err:#}")),
        }
        Ok(())
    }
}
