// Shared helpers for turning command-line input into expansion values

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::path::Path;

use crate::domain::template::Bindings;

/// Split a `NAME=VALUE` argument
pub fn parse_assignment(arg: &str) -> Result<(String, String)> {
    let Some((name, value)) = arg.split_once('=') else {
        bail!("Expected NAME=VALUE but got '{}'", arg);
    };
    if name.is_empty() {
        bail!("Missing name in '{}'", arg);
    }
    Ok((name.to_string(), value.to_string()))
}

/// Load a YAML or JSON mapping of values
pub fn load_values_file(path: &Path) -> Result<Map<String, Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read values file {}", path.display()))?;
    parse_values(&text).with_context(|| format!("Invalid values file {}", path.display()))
}

/// JSON is a subset of YAML, so one parser covers both formats
pub fn parse_values(text: &str) -> Result<Map<String, Value>> {
    if text.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_yaml::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => bail!("Values must be a mapping, found {}", other),
    }
}

/// Layer values: file first, then `--set` scalars, then `--push` list items
pub fn build_bindings<'a>(
    file: Option<Map<String, Value>>,
    sets: impl IntoIterator<Item = &'a str>,
    pushes: impl IntoIterator<Item = &'a str>,
) -> Result<Bindings> {
    let mut bindings = Bindings::new();
    if let Some(values) = file {
        bindings.extend(values);
    }
    for arg in sets {
        let (name, value) = parse_assignment(arg)?;
        bindings.bind(name, value);
    }
    for arg in pushes {
        let (name, value) = parse_assignment(arg)?;
        bindings.push(name, value);
    }
    Ok(bindings)
}
