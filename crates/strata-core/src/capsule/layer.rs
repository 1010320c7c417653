use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// The six memory tiers, ordered hottest to coldest.
///
/// The derived `Ord` follows declaration order, so `L0Hot < L5Cold` and
/// sorting ascending yields hot layers first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryLayer {
    #[serde(rename = "L0_HOT")]
    L0Hot,
    #[serde(rename = "L1_SHORT")]
    L1Short,
    #[serde(rename = "L2_SESSION")]
    L2Session,
    #[serde(rename = "L3_DURABLE")]
    L3Durable,
    #[serde(rename = "L4_SPARSE")]
    L4Sparse,
    #[serde(rename = "L5_COLD")]
    L5Cold,
}

impl MemoryLayer {
    /// All layers, hottest first.
    pub const ALL: [MemoryLayer; 6] = [
        MemoryLayer::L0Hot,
        MemoryLayer::L1Short,
        MemoryLayer::L2Session,
        MemoryLayer::L3Durable,
        MemoryLayer::L4Sparse,
        MemoryLayer::L5Cold,
    ];

    /// Position in the adjacency order (0 = hottest).
    pub fn priority(self) -> u8 {
        match self {
            MemoryLayer::L0Hot => 0,
            MemoryLayer::L1Short => 1,
            MemoryLayer::L2Session => 2,
            MemoryLayer::L3Durable => 3,
            MemoryLayer::L4Sparse => 4,
            MemoryLayer::L5Cold => 5,
        }
    }

    /// One tier hotter, or `None` at `L0_HOT`.
    pub fn hotter(self) -> Option<MemoryLayer> {
        match self.priority() {
            0 => None,
            p => Some(Self::ALL[(p - 1) as usize]),
        }
    }

    /// One tier colder, or `None` at `L5_COLD`.
    pub fn colder(self) -> Option<MemoryLayer> {
        Self::ALL.get(self.priority() as usize + 1).copied()
    }

    /// Number of tiers between two layers.
    pub fn distance(self, other: MemoryLayer) -> u8 {
        self.priority().abs_diff(other.priority())
    }

    /// `L0_HOT` and `L1_SHORT`.
    pub fn is_hot(self) -> bool {
        matches!(self, MemoryLayer::L0Hot | MemoryLayer::L1Short)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MemoryLayer::L0Hot => "L0_HOT",
            MemoryLayer::L1Short => "L1_SHORT",
            MemoryLayer::L2Session => "L2_SESSION",
            MemoryLayer::L3Durable => "L3_DURABLE",
            MemoryLayer::L4Sparse => "L4_SPARSE",
            MemoryLayer::L5Cold => "L5_COLD",
        }
    }
}

impl fmt::Display for MemoryLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryLayer {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|layer| layer.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownLayer {
                name: s.to_string(),
            })
    }
}
