use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Selects the per-hour decay base. Short-lived capsules fade fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecayClass {
    Short,
    Medium,
    Long,
}

impl DecayClass {
    pub fn as_str(self) -> &'static str {
        match self {
            DecayClass::Short => "short",
            DecayClass::Medium => "medium",
            DecayClass::Long => "long",
        }
    }
}

impl fmt::Display for DecayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecayClass {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(DecayClass::Short),
            "medium" => Ok(DecayClass::Medium),
            "long" => Ok(DecayClass::Long),
            other => Err(ConfigError::UnknownVariant {
                field: "decay_class".to_string(),
                value: other.to_string(),
            }),
        }
    }
}
