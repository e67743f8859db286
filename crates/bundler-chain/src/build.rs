use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::sync::Arc;

use crate::chain::BundlerChain;
use crate::compilation::Compilation;
use crate::context::{ChainContext, EnvironmentContext};

/// A host-level plugin. The host calls `modify_bundler_chain` once per
/// environment per build, in environment declaration order.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn modify_bundler_chain(&self, chain: &mut BundlerChain, context: &ChainContext) -> Result<()>;
}

/// One environment after its chain has been assembled.
#[derive(Debug)]
pub struct EnvironmentBuild {
    pub context: ChainContext,
    pub chain: BundlerChain,
}

impl EnvironmentBuild {
    /// Run the compilation for this environment.
    ///
    /// Every installed plugin sees `before_compile` before the emit step and
    /// `after_emit` after it, in chain order.
    pub fn compile(&mut self) -> Result<Compilation> {
        let _span =
            tracing::info_span!("compile", environment = %self.context.environment.name).entered();
        let mut compilation =
            Compilation::new(self.context.environment.name.clone(), self.context.is_prod);

        for plugin in self.chain.plugins_mut() {
            plugin
                .before_compile(&mut compilation)
                .with_context(|| format!("plugin '{}' failed before compile", plugin.name()))?;
        }

        tracing::debug!(environment = %compilation.environment, "emit");

        for plugin in self.chain.plugins_mut() {
            plugin
                .after_emit(&mut compilation)
                .with_context(|| format!("plugin '{}' failed after emit", plugin.name()))?;
        }

        Ok(compilation)
    }
}

#[derive(Debug)]
pub struct BuildStats {
    pub environments: Vec<EnvironmentBuild>,
    pub compilations: Vec<Compilation>,
}

impl BuildStats {
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.compilations
            .iter()
            .flat_map(|compilation| compilation.warnings.iter().map(String::as_str))
    }
}

/// Minimal build driver: assembles one chain per environment through the
/// registered plugins, then compiles each environment.
pub struct Build {
    root_path: PathBuf,
    is_prod: bool,
    environments: Vec<EnvironmentContext>,
    plugins: Vec<Arc<dyn Plugin>>,
}

impl Build {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            is_prod: true,
            environments: Vec::new(),
            plugins: Vec::new(),
        }
    }

    pub fn production(mut self, is_prod: bool) -> Self {
        self.is_prod = is_prod;
        self
    }

    pub fn environment(mut self, environment: EnvironmentContext) -> Self {
        self.environments.push(environment);
        self
    }

    pub fn plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Run every plugin's chain hook for every environment.
    pub fn modify_chains(&self) -> Result<Vec<EnvironmentBuild>> {
        let mut builds = Vec::with_capacity(self.environments.len());
        for environment in &self.environments {
            let context = ChainContext {
                is_prod: self.is_prod,
                root_path: self.root_path.clone(),
                environment: environment.clone(),
            };
            let mut chain = BundlerChain::new();
            for plugin in &self.plugins {
                plugin
                    .modify_bundler_chain(&mut chain, &context)
                    .with_context(|| {
                        format!(
                            "plugin '{}' failed for environment '{}'",
                            plugin.name(),
                            environment.name
                        )
                    })?;
            }
            builds.push(EnvironmentBuild { context, chain });
        }
        Ok(builds)
    }

    /// Build all environments. Fails with `build failed!` when any
    /// compilation recorded an error.
    pub fn run(&self) -> Result<BuildStats> {
        let mut environments = self.modify_chains()?;
        let mut compilations = Vec::with_capacity(environments.len());
        for environment in &mut environments {
            compilations.push(environment.compile()?);
        }

        let errors: Vec<&str> = compilations
            .iter()
            .flat_map(|compilation| compilation.errors.iter().map(String::as_str))
            .collect();
        if !errors.is_empty() {
            bail!("build failed!\n{}", errors.join("\n"));
        }

        Ok(BuildStats {
            environments,
            compilations,
        })
    }
}
