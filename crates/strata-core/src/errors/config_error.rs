/// Configuration errors. Layer maps recover from these by falling back to defaults.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed configuration for {field}: {reason}")]
    Malformed { field: String, reason: String },

    #[error("unknown memory layer: {name}")]
    UnknownLayer { name: String },

    #[error("unknown value {value} for {field}")]
    UnknownVariant { field: String, value: String },
}
