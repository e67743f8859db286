use anyhow::{Context, Result};

/// Whether a tsconfig needs project-reference (`--build`) mode.
///
/// `source` is the raw config text; comments and trailing commas are
/// accepted. True iff `references` is a non-empty array.
pub fn detects_references(source: &str) -> Result<bool> {
    let config: serde_json::Value =
        json5::from_str(source).context("failed to parse tsconfig JSON")?;
    Ok(config
        .get("references")
        .and_then(serde_json::Value::as_array)
        .is_some_and(|references| !references.is_empty()))
}
