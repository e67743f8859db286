use bundler_chain::{ChainContext, EnvironmentContext};
use std::sync::Arc;
use tempfile::TempDir;

use crate::checker_options::{CheckMode, EngineOptions, TypeScriptOptions};
use crate::issue::IssueMatcher;
use crate::logger::IssueLogger;
use crate::options::{PluginTypeCheckOptions, load_plugin_options, parse_plugin_options};
use crate::reduce::reduce_configs;

struct NullLogger;

impl IssueLogger for NullLogger {
    fn log(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

fn reduce(options: &PluginTypeCheckOptions) -> EngineOptions {
    let defaults = EngineOptions::new(
        TypeScriptOptions::new(
            "/app/tsconfig.json",
            "/app/node_modules/typescript/lib/typescript.js",
        ),
        Arc::new(NullLogger),
    );
    let context = ChainContext::new("/app", EnvironmentContext::new("web"));
    reduce_configs(defaults, options.ts_checker_overrides(), &context, EngineOptions::merge)
        .expect("reduce")
}

#[test]
fn empty_options_enable_checking() {
    let options = parse_plugin_options("{}").expect("parse");

    assert!(options.is_enabled());
    assert!(!options.suppresses_enabled_info());
    assert!(options.ts_checker_overrides().is_none());
}

#[test]
fn parses_json5_with_nested_overrides() {
    let options = parse_plugin_options(
        r#"{
            // user config
            enable: true,
            suppressEnabledInfo: true,
            tsCheckerOptions: {
                typescript: { mode: 'write-tsbuildinfo', memoryLimit: 2048 },
                issue: { exclude: [{ file: '**/index.ts' }, { code: 'TS2345' }] },
            },
        }"#,
    )
    .expect("parse");

    assert!(options.suppresses_enabled_info());
    let reduced = reduce(&options);
    assert_eq!(reduced.typescript.mode, CheckMode::WriteTsbuildinfo);
    assert_eq!(reduced.typescript.memory_limit, 2048);
    assert_eq!(reduced.issue.exclude.len(), 2);
    assert!(matches!(&reduced.issue.exclude[0], IssueMatcher::File(glob) if glob == "**/index.ts"));
}

#[test]
fn deprecated_alias_applies_when_current_field_unset() {
    let options = parse_plugin_options(
        r#"{ forkTsCheckerOptions: { typescript: { memoryLimit: 1024 } } }"#,
    )
    .expect("parse");

    assert_eq!(reduce(&options).typescript.memory_limit, 1024);
}

#[test]
fn deprecated_alias_is_ignored_when_current_field_set() {
    let options = parse_plugin_options(
        r#"{
            tsCheckerOptions: { typescript: { memoryLimit: 4096 } },
            forkTsCheckerOptions: { typescript: { memoryLimit: 1024, build: true } },
        }"#,
    )
    .expect("parse");

    let reduced = reduce(&options);
    assert_eq!(reduced.typescript.memory_limit, 4096);
    assert!(!reduced.typescript.build);
}

#[test]
fn disabled_options() {
    let options = parse_plugin_options("{ enable: false }").expect("parse");
    assert!(!options.is_enabled());
}

#[test]
fn malformed_options_are_rejected() {
    let err = parse_plugin_options("{ enable: ").expect_err("should fail");
    assert!(err.to_string().contains("failed to parse type-check plugin options"));

    let unknown_mode = "{ tsCheckerOptions: { typescript: { mode: 'emit-all' } } }";
    assert!(parse_plugin_options(unknown_mode).is_err());
}

#[test]
fn loads_options_from_file() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("type-check.json5");
    std::fs::write(&path, "{ tsCheckerOptions: [{ async: true }, { formatter: 'basic' }] }")
        .expect("write");

    let options = load_plugin_options(&path).expect("load");

    let reduced = reduce(&options);
    assert_eq!(reduced.async_mode, Some(true));
    assert_eq!(reduced.formatter, crate::checker_options::IssueFormatter::Basic);
}

#[test]
fn missing_options_file_names_the_path() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("absent.json5");

    let err = load_plugin_options(&path).expect_err("missing file");

    assert!(format!("{err:#}").contains("absent.json5"));
}
