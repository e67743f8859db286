//! Host side of the bundler plugin interface.
//!
//! This crate provides the pieces a bundler exposes to its plugins:
//! - Chain context (`ChainContext`, `EnvironmentContext`) handed to the
//!   chain-modification hook
//! - The keyed plugin chain (`BundlerChain`, `PluginSlot`) with well-known
//!   slot ids in [`chain_id`]
//! - Bundler plugins (`BundlerPlugin`) and the per-environment `Compilation`
//! - Host logging (`HostLogger`, `TracingLogger`, `MemoryLogger`)
//! - A minimal build driver (`Build`) that runs hooks and compilations

pub mod build;
pub mod chain;
pub mod compilation;
pub mod context;
pub mod logger;

pub use build::{Build, BuildStats, EnvironmentBuild, Plugin};
pub use chain::{BundlerChain, BundlerPlugin, PluginSlot};
pub use compilation::Compilation;
pub use context::{ChainContext, EnvironmentContext};
pub use logger::{HostLogger, LogLevel, LogRecord, MemoryLogger, TracingLogger};

/// Well-known slot ids inside a [`BundlerChain`].
pub mod chain_id {
    /// Slot the background TypeScript checker is installed into.
    pub const PLUGIN_TS_CHECKER: &str = "ts-checker";
}

#[cfg(test)]
#[path = "tests/chain_tests.rs"]
mod chain_tests;
#[cfg(test)]
#[path = "tests/build_tests.rs"]
mod build_tests;
