//! Texel density tiers.

use serde::{Deserialize, Serialize};

/// Texels per model unit. Serialized as the integer multiplier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum DensityTier {
    /// One texel per unit.
    #[default]
    X1,
    /// Two texels per unit.
    X2,
    /// Four texels per unit.
    X4,
}

impl DensityTier {
    /// All tiers, lowest first.
    pub const ALL: [DensityTier; 3] = [Self::X1, Self::X2, Self::X4];

    /// The pixel-density multiplier.
    pub fn scale(self) -> f32 {
        match self {
            Self::X1 => 1.0,
            Self::X2 => 2.0,
            Self::X4 => 4.0,
        }
    }
}

impl TryFrom<u32> for DensityTier {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::X1),
            2 => Ok(Self::X2),
            4 => Ok(Self::X4),
            other => Err(format!("unsupported density {other} (expected 1, 2 or 4)")),
        }
    }
}

impl From<DensityTier> for u32 {
    fn from(tier: DensityTier) -> Self {
        match tier {
            DensityTier::X1 => 1,
            DensityTier::X2 => 2,
            DensityTier::X4 => 4,
        }
    }
}
