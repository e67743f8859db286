use std::path::{Path, PathBuf};

/// One build target of the bundler (for example `web` or `node`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentContext {
    pub name: String,
    /// Resolved `tsconfig.json` for this environment, if the host found one.
    pub tsconfig_path: Option<PathBuf>,
}

impl EnvironmentContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tsconfig_path: None,
        }
    }

    pub fn with_tsconfig(mut self, path: impl Into<PathBuf>) -> Self {
        self.tsconfig_path = Some(path.into());
        self
    }
}

/// Context passed to `Plugin::modify_bundler_chain`.
#[derive(Debug, Clone)]
pub struct ChainContext {
    pub is_prod: bool,
    pub root_path: PathBuf,
    pub environment: EnvironmentContext,
}

impl ChainContext {
    pub fn new(root_path: impl Into<PathBuf>, environment: EnvironmentContext) -> Self {
        Self {
            is_prod: false,
            root_path: root_path.into(),
            environment,
        }
    }

    pub fn production(mut self, is_prod: bool) -> Self {
        self.is_prod = is_prod;
        self
    }

    pub fn tsconfig_path(&self) -> Option<&Path> {
        self.environment.tsconfig_path.as_deref()
    }
}
