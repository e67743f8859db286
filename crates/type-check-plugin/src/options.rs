//! User-facing plugin options.

use anyhow::{Context, Result};
use bundler_chain::ChainContext;
use serde::Deserialize;
use std::path::Path;

use crate::checker_options::{EngineOptions, PartialEngineOptions};
use crate::reduce::ConfigChain;

/// Override chain for the checker engine options. Function layers receive
/// the options accumulated so far and the chain context.
pub type TsCheckerOptions = ConfigChain<EngineOptions, PartialEngineOptions, ChainContext>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginTypeCheckOptions {
    /// Whether to enable TypeScript type checking. Defaults to `true`.
    #[serde(default)]
    pub enable: Option<bool>,
    /// Overrides for the checker engine options.
    #[serde(default)]
    pub ts_checker_options: Option<TsCheckerOptions>,
    /// Deprecated alias of `ts_checker_options`, used only when that is unset.
    #[serde(default)]
    pub fork_ts_checker_options: Option<TsCheckerOptions>,
    /// Hide the "Type checker is enabled" notice in production builds.
    #[serde(default)]
    pub suppress_enabled_info: Option<bool>,
}

impl PluginTypeCheckOptions {
    pub fn is_enabled(&self) -> bool {
        self.enable.unwrap_or(true)
    }

    pub fn suppresses_enabled_info(&self) -> bool {
        self.suppress_enabled_info.unwrap_or(false)
    }

    /// The override chain in effect: the current field, falling back to the
    /// deprecated alias when the current field is unset.
    pub fn ts_checker_overrides(&self) -> Option<&TsCheckerOptions> {
        if let Some(options) = self.ts_checker_options.as_ref() {
            return Some(options);
        }
        if self.fork_ts_checker_options.is_some() {
            tracing::debug!("`forkTsCheckerOptions` is deprecated, use `tsCheckerOptions`");
        }
        self.fork_ts_checker_options.as_ref()
    }
}

/// Parse plugin options from JSON5 text.
pub fn parse_plugin_options(source: &str) -> Result<PluginTypeCheckOptions> {
    json5::from_str(source).context("failed to parse type-check plugin options")
}

pub fn load_plugin_options(path: &Path) -> Result<PluginTypeCheckOptions> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read plugin options: {}", path.display()))?;
    parse_plugin_options(&source)
        .with_context(|| format!("failed to parse plugin options: {}", path.display()))
}
