//! Per-layer maps (weights, budgets) with lenient parsing.
//!
//! A malformed map never aborts config loading: it is logged and replaced
//! by an empty map, and the section accessors fall back to their defaults.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::capsule::MemoryLayer;
use crate::errors::ConfigError;

/// Build a layer map from `(wire_name, value)` pairs.
pub fn from_pairs<V: Copy>(pairs: &[(&str, V)]) -> HashMap<MemoryLayer, V> {
    pairs
        .iter()
        .filter_map(|(name, value)| name.parse::<MemoryLayer>().ok().map(|layer| (layer, *value)))
        .collect()
}

/// Convert a JSON value into a layer map.
pub fn from_value<V: DeserializeOwned>(
    field: &str,
    value: serde_json::Value,
) -> Result<HashMap<MemoryLayer, V>, ConfigError> {
    serde_json::from_value(value).map_err(|e| ConfigError::Malformed {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a JSON object string, e.g. from an environment override.
pub fn parse_json<V: DeserializeOwned>(
    field: &str,
    raw: &str,
) -> Result<HashMap<MemoryLayer, V>, ConfigError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| ConfigError::Malformed {
            field: field.to_string(),
            reason: e.to_string(),
        })?;
    from_value(field, value)
}

/// Serde hook: malformed maps become empty instead of failing the whole config.
pub fn lenient<'de, D, V>(deserializer: D) -> Result<HashMap<MemoryLayer, V>, D::Error>
where
    D: Deserializer<'de>,
    V: DeserializeOwned,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(from_value("layer map", raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring malformed layer map, using defaults");
        HashMap::new()
    }))
}
