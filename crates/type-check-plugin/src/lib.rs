//! Background TypeScript type checking for bundler builds.
//!
//! The plugin hooks each environment's bundler chain and installs a checker
//! engine that runs the project's own `tsc` off the emit path:
//! - `plugin`: the registration entry point (`TypeCheckPlugin`)
//! - `registry`: one checker per tsconfig, first environment wins
//! - `reduce`: folding default engine options with user override layers
//! - `checker_options`: engine options and their partial overrides
//! - `resolver`: finding the project-local `typescript` package
//! - `references`: detecting project-reference tsconfigs
//! - `issue`, `logger`, `formatter`: filtering, labelling and rendering issues
//! - `engine`: the checker process runner and bundler plugin
//! - `options`: user-facing plugin options
//! - `tracing_config`: optional subscriber setup for hosts

pub mod checker_options;
pub mod engine;
pub mod formatter;
pub mod issue;
pub mod logger;
pub mod options;
pub mod plugin;
pub mod reduce;
pub mod references;
pub mod registry;
pub mod resolver;
pub mod tracing_config;

pub use checker_options::{
    CheckMode, DEFAULT_MEMORY_LIMIT, EngineOptions, IssueFormatter, IssueOptions,
    PartialEngineOptions, PartialIssueOptions, PartialTypeScriptOptions, TypeScriptOptions,
};
pub use engine::{
    CheckInvocation, CheckOutput, CheckRunner, CheckSummary, TsCheckerEngine, TscProcessRunner,
};
pub use issue::{Issue, IssueMatcher, IssuePosition, IssuePredicate, IssueSeverity};
pub use logger::{IssueLogger, RelabelingLogger, relabel_message};
pub use options::{PluginTypeCheckOptions, TsCheckerOptions, load_plugin_options};
pub use plugin::{
    ENABLED_NOTICE, PLUGIN_TYPE_CHECK_NAME, TYPESCRIPT_NOT_FOUND_MESSAGE, TypeCheckPlugin,
};
pub use reduce::{ConfigChain, reduce_configs};
pub use registry::{CheckRegistry, Claim};

/// Create the type-check plugin with the given options.
pub fn plugin_type_check(options: PluginTypeCheckOptions) -> TypeCheckPlugin {
    TypeCheckPlugin::new(options)
}

#[cfg(test)]
#[path = "tests/reduce_tests.rs"]
mod reduce_tests;
#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod registry_tests;
#[cfg(test)]
#[path = "tests/references_tests.rs"]
mod references_tests;
#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod resolver_tests;
#[cfg(test)]
#[path = "tests/issue_tests.rs"]
mod issue_tests;
#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod engine_tests;
#[cfg(test)]
#[path = "tests/options_tests.rs"]
mod options_tests;
#[cfg(test)]
#[path = "tests/plugin_tests.rs"]
mod plugin_tests;
#[cfg(test)]
#[path = "tests/tracing_config_tests.rs"]
mod tracing_config_tests;
