//! Options consumed by the checker engine, and their partial overrides.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::issue::{IssueFilter, IssueMatcher};
use crate::logger::IssueLogger;

/// Heap ceiling handed to the checker process, in MiB.
pub const DEFAULT_MEMORY_LIMIT: u32 = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckMode {
    /// Check only; never write `.tsbuildinfo` or declaration files.
    #[default]
    Readonly,
    WriteTsbuildinfo,
    WriteDts,
    WriteReferences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueFormatter {
    Basic,
    #[default]
    Codeframe,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeScriptOptions {
    pub mode: CheckMode,
    /// Run in project-reference (`--build`) mode.
    pub build: bool,
    pub memory_limit: u32,
    pub config_file: PathBuf,
    /// Entry of the project's `typescript` package.
    pub typescript_path: PathBuf,
    /// Directory relative paths are reported against. Defaults to the
    /// directory of `config_file`.
    pub context: Option<PathBuf>,
    /// Node.js executable. Defaults to `node` on `PATH`.
    pub node_path: Option<PathBuf>,
}

impl TypeScriptOptions {
    pub fn new(config_file: impl Into<PathBuf>, typescript_path: impl Into<PathBuf>) -> Self {
        Self {
            mode: CheckMode::Readonly,
            build: false,
            memory_limit: DEFAULT_MEMORY_LIMIT,
            config_file: config_file.into(),
            typescript_path: typescript_path.into(),
            context: None,
            node_path: None,
        }
    }

    pub fn context_dir(&self) -> PathBuf {
        if let Some(context) = &self.context {
            return context.clone();
        }
        self.config_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    pub fn node(&self) -> &Path {
        self.node_path.as_deref().unwrap_or(Path::new("node"))
    }

    fn merge(self, partial: PartialTypeScriptOptions) -> Self {
        TypeScriptOptions {
            mode: partial.mode.unwrap_or(self.mode),
            build: partial.build.unwrap_or(self.build),
            memory_limit: partial.memory_limit.unwrap_or(self.memory_limit),
            config_file: partial.config_file.unwrap_or(self.config_file),
            typescript_path: partial.typescript_path.unwrap_or(self.typescript_path),
            context: partial.context.or(self.context),
            node_path: partial.node_path.or(self.node_path),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IssueOptions {
    pub include: Vec<IssueMatcher>,
    pub exclude: Vec<IssueMatcher>,
}

impl IssueOptions {
    pub fn filter(&self) -> IssueFilter<'_> {
        IssueFilter {
            include: &self.include,
            exclude: &self.exclude,
        }
    }

    fn merge(self, partial: PartialIssueOptions) -> Self {
        IssueOptions {
            include: partial.include.unwrap_or(self.include),
            exclude: partial.exclude.unwrap_or(self.exclude),
        }
    }
}

/// Final options handed to `TsCheckerEngine`.
#[derive(Clone)]
pub struct EngineOptions {
    pub typescript: TypeScriptOptions,
    pub issue: IssueOptions,
    pub logger: Arc<dyn IssueLogger>,
    /// `None` means asynchronous in development, synchronous in production.
    pub async_mode: Option<bool>,
    pub formatter: IssueFormatter,
}

impl EngineOptions {
    pub fn new(typescript: TypeScriptOptions, logger: Arc<dyn IssueLogger>) -> Self {
        Self {
            typescript,
            issue: IssueOptions::default(),
            logger,
            async_mode: None,
            formatter: IssueFormatter::default(),
        }
    }

    /// Deep merge: nested option groups merge field by field, lists and
    /// scalars present in `partial` replace the current value.
    pub fn merge(self, partial: PartialEngineOptions) -> Self {
        EngineOptions {
            typescript: match partial.typescript {
                Some(typescript) => self.typescript.merge(typescript),
                None => self.typescript,
            },
            issue: match partial.issue {
                Some(issue) => self.issue.merge(issue),
                None => self.issue,
            },
            logger: partial.logger.unwrap_or(self.logger),
            async_mode: partial.async_mode.or(self.async_mode),
            formatter: partial.formatter.unwrap_or(self.formatter),
        }
    }

    pub fn is_async(&self, is_prod: bool) -> bool {
        self.async_mode.unwrap_or(!is_prod)
    }
}

impl fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineOptions")
            .field("typescript", &self.typescript)
            .field("issue", &self.issue)
            .field("async_mode", &self.async_mode)
            .field("formatter", &self.formatter)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialTypeScriptOptions {
    #[serde(default)]
    pub mode: Option<CheckMode>,
    #[serde(default)]
    pub build: Option<bool>,
    #[serde(default)]
    pub memory_limit: Option<u32>,
    #[serde(default)]
    pub config_file: Option<PathBuf>,
    #[serde(default)]
    pub typescript_path: Option<PathBuf>,
    #[serde(default)]
    pub context: Option<PathBuf>,
    #[serde(default)]
    pub node_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialIssueOptions {
    #[serde(default)]
    pub include: Option<Vec<IssueMatcher>>,
    #[serde(default)]
    pub exclude: Option<Vec<IssueMatcher>>,
}

/// One override layer's worth of engine options. Unset fields leave the
/// current value alone.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialEngineOptions {
    #[serde(default)]
    pub typescript: Option<PartialTypeScriptOptions>,
    #[serde(default)]
    pub issue: Option<PartialIssueOptions>,
    #[serde(skip)]
    pub logger: Option<Arc<dyn IssueLogger>>,
    #[serde(default, rename = "async")]
    pub async_mode: Option<bool>,
    #[serde(default)]
    pub formatter: Option<IssueFormatter>,
}

impl PartialEngineOptions {
    pub fn with_typescript(mut self, typescript: PartialTypeScriptOptions) -> Self {
        self.typescript = Some(typescript);
        self
    }

    pub fn with_include(mut self, include: Vec<IssueMatcher>) -> Self {
        self.issue.get_or_insert_with(Default::default).include = Some(include);
        self
    }

    pub fn with_exclude(mut self, exclude: Vec<IssueMatcher>) -> Self {
        self.issue.get_or_insert_with(Default::default).exclude = Some(exclude);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn IssueLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_async(mut self, async_mode: bool) -> Self {
        self.async_mode = Some(async_mode);
        self
    }

    pub fn with_formatter(mut self, formatter: IssueFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }
}

impl fmt::Debug for PartialEngineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialEngineOptions")
            .field("typescript", &self.typescript)
            .field("issue", &self.issue)
            .field("logger", &self.logger.as_ref().map(|_| ".."))
            .field("async_mode", &self.async_mode)
            .field("formatter", &self.formatter)
            .finish()
    }
}
