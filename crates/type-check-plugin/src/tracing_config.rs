//! Subscriber setup for hosts that want to see what the type checker does.
//!
//! `TYPE_CHECK_LOG` holds filter directives. A bare level such as `debug`
//! applies to this plugin and the host chain only (`type_check_plugin` and
//! `bundler_chain` plus the `bundler` logger target), so a host's own crates
//! stay quiet. Full directives (`type_check_plugin::engine=trace`) are used
//! as given. `RUST_LOG` is the fallback.
//!
//! `TYPE_CHECK_LOG_FORMAT` picks the output:
//!
//! - `text` (default): one line per event, with the `type_check` span of the
//!   running check (its `config` field) as prefix
//! - `tree`: events nested under each `type_check` and `compile` span
//! - `json`: one object per event, including the current span
//!
//! ```bash
//! TYPE_CHECK_LOG=debug TYPE_CHECK_LOG_FORMAT=tree my-bundler build
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_TARGETS: [&str; 3] = ["type_check_plugin", "bundler_chain", "bundler"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// What to install. `directives` of `None` means logging was not requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingSettings {
    pub directives: Option<String>,
    pub format: LogFormat,
}

impl TracingSettings {
    pub fn from_env() -> Self {
        let directives = std::env::var("TYPE_CHECK_LOG")
            .map(|value| scope_directives(&value))
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok();
        let format = LogFormat::parse(&std::env::var("TYPE_CHECK_LOG_FORMAT").unwrap_or_default());
        Self { directives, format }
    }
}

/// Expand a bare level into per-target directives for this plugin.
pub fn scope_directives(value: &str) -> String {
    let value = value.trim();
    let is_bare_level = !value.is_empty()
        && !value.contains(['=', ',', ':'])
        && value.parse::<tracing::level_filters::LevelFilter>().is_ok();
    if !is_bare_level {
        return value.to_string();
    }
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber from the environment. Output goes to stderr.
///
/// Returns `false` when logging was not requested or a subscriber was
/// already installed.
pub fn init_tracing() -> bool {
    init_tracing_with(TracingSettings::from_env())
}

pub fn init_tracing_with(settings: TracingSettings) -> bool {
    let Some(directives) = settings.directives else {
        return false;
    };
    let filter = EnvFilter::builder().parse_lossy(directives);

    match settings.format {
        LogFormat::Tree => Registry::default()
            .with(filter)
            .with(
                tracing_tree::HierarchicalLayer::new(2)
                    .with_writer(std::io::stderr)
                    .with_targets(true)
                    .with_bracketed_fields(true),
            )
            .try_init()
            .is_ok(),
        LogFormat::Json => Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .is_ok(),
        LogFormat::Text => Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_names(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .is_ok(),
    }
}
