//! Locating the project's own `typescript` package.

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const TYPESCRIPT_PACKAGE: &str = "typescript";

#[derive(Debug, Deserialize)]
struct PackageJson {
    #[serde(default)]
    main: Option<String>,
}

/// Resolve `typescript` the way Node resolves a bare specifier, starting
/// from `root_path`. Returns `None` when the project has no compiler.
pub fn resolve_typescript(root_path: &Path) -> Option<PathBuf> {
    resolve_package(TYPESCRIPT_PACKAGE, root_path)
}

pub fn resolve_package(name: &str, root_path: &Path) -> Option<PathBuf> {
    let mut current = Some(root_path);
    while let Some(dir) = current {
        let is_node_modules = dir.file_name().is_some_and(|name| name == "node_modules");
        if !is_node_modules {
            let package_root = dir.join("node_modules").join(name);
            if let Some(entry) = resolve_package_root(&package_root) {
                return Some(entry);
            }
        }
        current = dir.parent();
    }

    for dir in node_path_dirs() {
        if let Some(entry) = resolve_package_root(&dir.join(name)) {
            return Some(entry);
        }
    }

    tracing::debug!(package = name, root = %root_path.display(), "package not found");
    None
}

fn node_path_dirs() -> Vec<PathBuf> {
    std::env::var_os("NODE_PATH")
        .map(|value| std::env::split_paths(&value).collect())
        .unwrap_or_default()
}

fn resolve_package_root(package_root: &Path) -> Option<PathBuf> {
    if !package_root.is_dir() {
        return None;
    }

    let main = read_package_json(&package_root.join("package.json"))
        .and_then(|package_json| package_json.main)
        .map(|main| main.trim().trim_start_matches("./").to_string())
        .filter(|main| !main.is_empty());

    if let Some(main) = main {
        let entry = package_root.join(main);
        for candidate in [entry.clone(), with_js_extension(&entry), entry.join("index.js")] {
            if candidate.is_file() {
                return Some(canonicalize_or_owned(&candidate));
            }
        }
    }

    let index = package_root.join("index.js");
    index.is_file().then(|| canonicalize_or_owned(&index))
}

fn with_js_extension(path: &Path) -> PathBuf {
    let mut file = path.as_os_str().to_os_string();
    file.push(".js");
    PathBuf::from(file)
}

fn read_package_json(path: &Path) -> Option<PackageJson> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

fn canonicalize_or_owned(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
