use anyhow::{Context, Result};
use bundler_chain::{BundlerChain, ChainContext, HostLogger, Plugin, TracingLogger, chain_id};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::checker_options::{EngineOptions, TypeScriptOptions};
use crate::engine::{CheckRunner, TsCheckerEngine, TscProcessRunner};
use crate::issue::IssueMatcher;
use crate::logger::RelabelingLogger;
use crate::options::PluginTypeCheckOptions;
use crate::reduce::reduce_configs;
use crate::references::detects_references;
use crate::registry::{CheckRegistry, Claim};
use crate::resolver::resolve_typescript;

pub const PLUGIN_TYPE_CHECK_NAME: &str = "rsbuild:type-check";

pub const TYPESCRIPT_NOT_FOUND_MESSAGE: &str =
    "\"typescript\" is not found in current project, Type checker will not work.";

pub const ENABLED_NOTICE: &str = "Type checker is enabled. It may take some time.";

/// Installs the background type checker into each environment's chain.
///
/// One instance serves one build: it owns the tsconfig claim table, so
/// environments sharing a tsconfig get a single checker, and it prints the
/// production notice at most once.
pub struct TypeCheckPlugin {
    options: PluginTypeCheckOptions,
    registry: CheckRegistry,
    logger: Arc<dyn HostLogger>,
    runner: Arc<dyn CheckRunner>,
    notice_emitted: AtomicBool,
}

impl TypeCheckPlugin {
    pub fn new(options: PluginTypeCheckOptions) -> Self {
        Self {
            options,
            registry: CheckRegistry::new(),
            logger: Arc::new(TracingLogger),
            runner: Arc::new(TscProcessRunner),
            notice_emitted: AtomicBool::new(false),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn HostLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn CheckRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn options(&self) -> &PluginTypeCheckOptions {
        &self.options
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Register the checker for one environment.
    ///
    /// Does nothing when checking is disabled, the environment has no
    /// tsconfig, another environment already checks the same tsconfig, or
    /// the project has no `typescript` package (the last one logs a warning).
    pub fn register(&self, chain: &mut BundlerChain, context: &ChainContext) -> Result<()> {
        let environment = &context.environment.name;
        let Some(tsconfig_path) = context.tsconfig_path() else {
            tracing::debug!(environment = %environment, "no tsconfig, skipping type check");
            return Ok(());
        };
        if !self.options.is_enabled() {
            tracing::debug!(environment = %environment, "type check disabled");
            return Ok(());
        }

        if let Claim::Skip { claimed_by } = self.registry.claim(tsconfig_path, environment) {
            tracing::debug!(
                environment = %environment,
                claimed_by = %claimed_by,
                tsconfig = %tsconfig_path.display(),
                "tsconfig already checked by another environment"
            );
            return Ok(());
        }

        let Some(typescript_path) = resolve_typescript(&context.root_path) else {
            self.logger.warn(TYPESCRIPT_NOT_FOUND_MESSAGE);
            return Ok(());
        };

        let options = self.engine_options(tsconfig_path, typescript_path, context)?;

        if context.is_prod
            && !self.options.suppresses_enabled_info()
            && !self.notice_emitted.swap(true, Ordering::SeqCst)
        {
            self.logger.info(ENABLED_NOTICE);
        }

        chain
            .plugin(chain_id::PLUGIN_TS_CHECKER)
            .use_plugin(TsCheckerEngine::new(options, Arc::clone(&self.runner)));
        Ok(())
    }

    /// Defaults for `tsconfig_path`, reduced with the user's overrides.
    fn engine_options(
        &self,
        tsconfig_path: &Path,
        typescript_path: PathBuf,
        context: &ChainContext,
    ) -> Result<EngineOptions> {
        let source = std::fs::read_to_string(tsconfig_path)
            .with_context(|| format!("failed to read tsconfig: {}", tsconfig_path.display()))?;
        let use_reference = detects_references(&source)
            .with_context(|| format!("failed to parse tsconfig: {}", tsconfig_path.display()))?;

        let mut typescript = TypeScriptOptions::new(tsconfig_path, typescript_path);
        typescript.build = use_reference;

        let mut defaults = EngineOptions::new(
            typescript,
            Arc::new(RelabelingLogger::new(Arc::clone(&self.logger))),
        );
        defaults.issue.exclude = vec![IssueMatcher::node_modules()];

        reduce_configs(
            defaults,
            self.options.ts_checker_overrides(),
            context,
            EngineOptions::merge,
        )
        .context("failed to apply type checker option overrides")
    }
}

impl Plugin for TypeCheckPlugin {
    fn name(&self) -> &str {
        PLUGIN_TYPE_CHECK_NAME
    }

    fn modify_bundler_chain(&self, chain: &mut BundlerChain, context: &ChainContext) -> Result<()> {
        self.register(chain, context)
    }
}
