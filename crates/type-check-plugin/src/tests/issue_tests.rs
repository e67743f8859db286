use bundler_chain::{LogLevel, MemoryLogger};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use crate::checker_options::IssueFormatter;
use crate::formatter::{IssueReporter, display_path};
use crate::issue::{Issue, IssueFilter, IssueMatcher, IssueSeverity};
use crate::logger::{IssueLogger, RelabelingLogger, relabel_message};

const MESSAGE: &str = "Argument of type 'string' is not assignable to parameter of type 'number'.";

fn issue_in(file: &str) -> Issue {
    Issue::error("TS2345", MESSAGE).at(file, 3, 5)
}

#[test]
fn node_modules_matcher_handles_both_slash_styles() {
    let matcher = IssueMatcher::node_modules();
    let context = Path::new("/app");

    assert!(matcher.matches(&issue_in("/app/node_modules/foo/src/index.ts"), context));
    assert!(matcher.matches(&issue_in(r"C:\app\node_modules\foo\index.ts"), context));
    assert!(!matcher.matches(&issue_in("/app/src/node_modules.ts"), context));
    assert!(!matcher.matches(&Issue::error("TS5083", "no file"), context));
}

#[test]
fn file_glob_matches_relative_to_context() {
    let context = Path::new("/app");
    let matcher = IssueMatcher::file("**/index.ts");

    assert!(matcher.matches(&issue_in("/app/src/index.ts"), context));
    assert!(matcher.matches(&issue_in("/app/index.ts"), context));
    assert!(!matcher.matches(&issue_in("/app/src/main.ts"), context));

    let scoped = IssueMatcher::file("src/*.ts");
    assert!(scoped.matches(&issue_in("/app/src/index.ts"), context));
    assert!(!scoped.matches(&issue_in("/app/src/nested/index.ts"), context));
    assert!(!scoped.matches(&issue_in("/other/src/index.ts"), context));
}

#[test]
fn invalid_glob_matches_nothing() {
    let matcher = IssueMatcher::file("src/[unclosed");
    assert!(!matcher.matches(&issue_in("/app/src/index.ts"), Path::new("/app")));
}

#[test]
fn code_matcher_ignores_prefix_and_case() {
    let context = Path::new("/app");
    let issue = issue_in("/app/src/index.ts");

    assert!(IssueMatcher::code("TS2345").matches(&issue, context));
    assert!(IssueMatcher::code("ts2345").matches(&issue, context));
    assert!(IssueMatcher::code("2345").matches(&issue, context));
    assert!(!IssueMatcher::code("TS2322").matches(&issue, context));
}

#[test]
fn filter_applies_include_then_exclude() {
    let context = Path::new("/app");
    let include = vec![IssueMatcher::file("src/**")];
    let exclude = vec![IssueMatcher::code("TS7006")];
    let filter = IssueFilter {
        include: &include,
        exclude: &exclude,
    };

    assert!(filter.accepts(&issue_in("/app/src/index.ts"), context));
    assert!(!filter.accepts(&issue_in("/app/test/index.ts"), context));
    let excluded = Issue::error("TS7006", "implicit any").at("/app/src/a.ts", 1, 1);
    assert!(!filter.accepts(&excluded, context));

    let open = IssueFilter::default();
    assert!(open.accepts(&issue_in("/anywhere.ts"), context));
}

#[test]
fn matchers_deserialize_from_file_and_code_objects() {
    let matchers: Vec<IssueMatcher> =
        serde_json::from_str(r#"[{"file": "**/index.ts"}, {"code": "TS2345"}]"#).expect("parse");

    assert!(matches!(&matchers[0], IssueMatcher::File(glob) if glob == "**/index.ts"));
    assert!(matches!(&matchers[1], IssueMatcher::Code(code) if code == "TS2345"));
}

#[test]
fn relabel_rewrites_error_and_warning() {
    assert_eq!(
        relabel_message("ERROR in ./a.ts\nWARNING in ./b.ts"),
        "Type Error in ./a.ts\nType Warning in ./b.ts"
    );
    assert_eq!(relabel_message("all good"), "all good");
}

#[test]
fn relabeling_logger_drops_log_and_forwards_error() {
    let host = Arc::new(MemoryLogger::new());
    let logger = RelabelingLogger::new(host.clone());

    logger.log("Type-checking in progress...");
    logger.error("ERROR in ./src/index.ts:3:5");

    let records = host.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, LogLevel::Error);
    assert_eq!(records[0].message, "Type Error in ./src/index.ts:3:5");
}

#[test]
fn basic_formatter_prints_header_and_code() {
    let mut reporter = IssueReporter::new(IssueFormatter::Basic, "/app", false);

    let text = reporter.format(&issue_in("/app/src/index.ts"));

    assert_eq!(text, format!("ERROR in ./src/index.ts:3:5\nTS2345: {MESSAGE}"));
}

#[test]
fn warnings_and_global_issues_format() {
    let mut reporter = IssueReporter::new(IssueFormatter::Basic, "/app", false);

    let warning = Issue::warning("TS6133", "'x' is declared but never used.").at("/lib/x.ts", 1, 7);
    assert_eq!(
        reporter.format(&warning),
        "WARNING in /lib/x.ts:1:7\nTS6133: 'x' is declared but never used."
    );

    let global = Issue::error("TS5083", "Cannot read file 'tsconfig.base.json'.");
    assert_eq!(global.severity, IssueSeverity::Error);
    assert_eq!(
        reporter.format(&global),
        "ERROR\nTS5083: Cannot read file 'tsconfig.base.json'."
    );
}

#[test]
fn codeframe_formatter_shows_source_line() {
    let temp = TempDir::new().expect("temp dir");
    let file = temp.path().join("index.ts");
    std::fs::write(&file, "function add(a: number) {}\n\nadd('1');\n").expect("write");
    let file = file.to_string_lossy().into_owned();

    let mut reporter = IssueReporter::new(IssueFormatter::Codeframe, temp.path(), false);
    let text = reporter.format(&Issue::error("TS2345", MESSAGE).at(file, 3, 5));

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "ERROR in ./index.ts:3:5");
    assert_eq!(lines[2], "    3   add('1');");
    assert_eq!(lines[3], "            ~");
}

#[test]
fn codeframe_without_source_falls_back_to_basic() {
    let mut reporter = IssueReporter::new(IssueFormatter::Codeframe, "/missing", false);

    let text = reporter.format(&issue_in("/missing/src/index.ts"));

    assert_eq!(text.lines().count(), 2);
}

#[test]
fn display_path_only_relativizes_inside_context() {
    assert_eq!(display_path("/app/src/a.ts", Path::new("/app")), "./src/a.ts");
    assert_eq!(display_path("/application/a.ts", Path::new("/app")), "/application/a.ts");
    assert_eq!(display_path(r"C:\app\a.ts", Path::new(r"C:\app")), "./a.ts");
}
