//! Loading of planner inputs and tiling configuration.
//!
//! The tiling configuration is YAML with `${VAR}` substitution; `BROWSE_*`
//! environment variables are applied on top of whatever the file sets.
//! Requests and input metadata are JSON documents.

use anyhow::{anyhow, Context, Result};
use browse_sizing::{InputRasterMetadata, OutputGridRequest, TilingConfig};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Load the tiling configuration from an optional YAML file plus the
/// environment, and validate it.
pub fn load_tiling_config(path: Option<&Path>) -> Result<TilingConfig> {
    let base = match path {
        Some(path) => {
            let contents = read_expanded(path)?;
            parse_tiling_config(&contents)
                .with_context(|| format!("Failed to parse tiling config {}", path.display()))?
        }
        None => TilingConfig::default(),
    };

    let config = base.with_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Parse a YAML tiling configuration; missing fields take their defaults.
pub fn parse_tiling_config(yaml: &str) -> Result<TilingConfig> {
    if yaml.trim().is_empty() {
        return Ok(TilingConfig::default());
    }
    Ok(serde_yaml::from_str(yaml)?)
}

/// Read an output grid request from a JSON file.
///
/// Both a bare request and one wrapped in a `{"format": {...}}` envelope
/// are accepted.
pub fn load_request(path: &Path) -> Result<OutputGridRequest> {
    let value: serde_json::Value = read_json(path)?;
    let request = match value.get("format") {
        Some(format) => format.clone(),
        None => value,
    };
    serde_json::from_value(request)
        .with_context(|| format!("Invalid output grid request in {}", path.display()))
}

/// Read input raster metadata from a JSON file.
pub fn load_input_metadata(path: &Path) -> Result<InputRasterMetadata> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn read_expanded(path: &Path) -> Result<String> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let expanded = shellexpand::env(&contents)
        .map_err(|e| anyhow!("Failed to expand {} in {}: {}", e.var_name, path.display(), e.cause))?;
    Ok(expanded.into_owned())
}
