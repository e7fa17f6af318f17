//! Shelf packer: places rectangular footprints row by row inside a square atlas.
//!
//! Items are sorted tallest first (stable), the atlas starts at the smallest
//! power-of-two side whose area covers the total footprint area times a slack
//! factor, and grows by doubling whenever an item does not fit. The result is
//! deterministic for a given input order, not minimal.

use glam::UVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use boxel_model::DensityTier;

/// Smallest atlas side the packer will produce.
pub const MIN_ATLAS_SIZE: u32 = 64;

/// Pixels left between neighbouring footprints to stop filtering bleed.
pub const DEFAULT_PADDING: u32 = 2;

/// Initial atlas area as a multiple of the summed footprint area.
pub const DEFAULT_SLACK: f32 = 1.5;

/// Largest atlas side the packer and guide renderer will produce.
pub const MAX_ATLAS_SIZE: u32 = 16384;

/// Largest accepted padding.
pub const MAX_PADDING: u32 = 64;

// ---------------------------------------------------------------------------
// AtlasError
// ---------------------------------------------------------------------------

/// Errors returned by packing and guide rendering.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// Configuration validation error.
    #[error("invalid packer config: {0}")]
    InvalidConfig(String),

    /// The model failed structural validation.
    #[error("model error: {0}")]
    Model(#[from] boxel_model::ModelError),

    /// The atlas would have to grow past [`MAX_ATLAS_SIZE`].
    #[error("atlas needs {needed} pixels per side, limit is {limit}")]
    AtlasTooLarge {
        /// Side length that would have been required.
        needed: u64,
        /// The enforced limit.
        limit: u32,
    },

    /// Failed to encode the guide image.
    #[error("image encode error: {0}")]
    ImageEncode(#[from] image::ImageError),
}

// ---------------------------------------------------------------------------
// PackerConfig
// ---------------------------------------------------------------------------

/// Packing parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackerConfig {
    /// Starting atlas side. Must be a power of 2, at most [`MAX_ATLAS_SIZE`].
    pub min_size: u32,
    /// Gap between footprints in pixels. Must be in `1..=MAX_PADDING`.
    pub padding: u32,
    /// Initial area slack multiplier. Must be >= 1.0.
    pub slack: f32,
    /// Texel density used to compute cube footprints.
    pub density: DensityTier,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            min_size: MIN_ATLAS_SIZE,
            padding: DEFAULT_PADDING,
            slack: DEFAULT_SLACK,
            density: DensityTier::X1,
        }
    }
}

impl PackerConfig {
    /// Checks the power-of-two, size, padding and slack constraints.
    pub fn validate(&self) -> Result<(), AtlasError> {
        if !self.min_size.is_power_of_two() {
            return Err(AtlasError::InvalidConfig(format!(
                "min_size {} is not a power of 2",
                self.min_size
            )));
        }
        if self.min_size > MAX_ATLAS_SIZE {
            return Err(AtlasError::InvalidConfig(format!(
                "min_size {} exceeds {MAX_ATLAS_SIZE}",
                self.min_size
            )));
        }
        if self.padding == 0 || self.padding > MAX_PADDING {
            return Err(AtlasError::InvalidConfig(format!(
                "padding {} must be between 1 and {MAX_PADDING} pixels",
                self.padding
            )));
        }
        if !(self.slack >= 1.0) {
            return Err(AtlasError::InvalidConfig(format!(
                "slack {} must be >= 1.0",
                self.slack
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Items and results
// ---------------------------------------------------------------------------

/// A footprint to place, tagged with a caller-chosen id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackItem<K> {
    /// Caller's identifier.
    pub id: K,
    /// Footprint width and height in pixels.
    pub footprint: UVec2,
}

/// Where an item landed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement<K> {
    /// Caller's identifier.
    pub id: K,
    /// Top-left corner in atlas pixels.
    pub origin: UVec2,
    /// The item's footprint, repeated for convenience.
    pub footprint: UVec2,
}

/// Output of [`ShelfPacker::pack`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackResult<K> {
    /// One placement per input item, in input order.
    pub placements: Vec<Placement<K>>,
    /// Side of the square atlas.
    pub atlas_size: u32,
}

impl<K: PartialEq> PackResult<K> {
    /// Origin assigned to `id`.
    pub fn origin_of(&self, id: &K) -> Option<UVec2> {
        self.placements
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.origin)
    }
}

// ---------------------------------------------------------------------------
// ShelfPacker
// ---------------------------------------------------------------------------

/// Greedy row-based packer.
#[derive(Clone, Debug, Default)]
pub struct ShelfPacker {
    config: PackerConfig,
}

impl ShelfPacker {
    /// Creates a packer after validating `config`.
    pub fn new(config: PackerConfig) -> Result<Self, AtlasError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Smallest `min_size · 2^k` whose square covers `slack ×` the total item area,
    /// capped at [`MAX_ATLAS_SIZE`].
    pub fn initial_side<K>(&self, items: &[PackItem<K>]) -> u32 {
        let area: u64 = items
            .iter()
            .map(|item| u64::from(item.footprint.x) * u64::from(item.footprint.y))
            .sum();
        let needed = area as f64 * f64::from(self.config.slack);
        let mut side = self.config.min_size;
        while side < MAX_ATLAS_SIZE && (f64::from(side) * f64::from(side)) < needed {
            side *= 2;
        }
        side
    }

    /// Assigns every item a non-overlapping origin and picks the atlas side.
    ///
    /// An empty input yields `min_size` and no placements. Items wider or taller
    /// than the current atlas grow it by doubling.
    ///
    /// # Errors
    ///
    /// [`AtlasError::AtlasTooLarge`] if growth would pass [`MAX_ATLAS_SIZE`].
    pub fn pack<K: Clone>(&self, items: &[PackItem<K>]) -> Result<PackResult<K>, AtlasError> {
        if let Some(item) = items
            .iter()
            .find(|item| item.footprint.max_element() > MAX_ATLAS_SIZE)
        {
            return Err(too_large(item.footprint.max_element()));
        }

        let padding = self.config.padding;
        let side = self.initial_side(items);
        let mut width = side;
        let mut height = side;

        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(items[i].footprint.y));

        let mut origins = vec![UVec2::ZERO; items.len()];
        let (mut x, mut y, mut row_height) = (0u32, 0u32, 0u32);

        for i in order {
            let UVec2 { x: w, y: h } = items[i].footprint;

            while w > width {
                width = double(width, w)?;
                tracing::debug!(width, item_width = w, "atlas widened");
            }
            if x + w > width {
                x = 0;
                y += row_height + padding;
                row_height = 0;
            }
            while y + h > height {
                height = double(height, y + h)?;
                tracing::debug!(height, "atlas grown");
            }

            origins[i] = UVec2::new(x, y);
            x += w + padding;
            row_height = row_height.max(h);
        }

        let atlas_size = width.max(height);
        tracing::debug!(items = items.len(), initial = side, atlas_size, "packed atlas");

        let placements = items
            .iter()
            .zip(origins)
            .map(|(item, origin)| Placement {
                id: item.id.clone(),
                origin,
                footprint: item.footprint,
            })
            .collect();

        Ok(PackResult {
            placements,
            atlas_size,
        })
    }
}

fn too_large(needed: u32) -> AtlasError {
    AtlasError::AtlasTooLarge {
        needed: u64::from(needed),
        limit: MAX_ATLAS_SIZE,
    }
}

/// Doubles `side`, refusing to go past [`MAX_ATLAS_SIZE`].
fn double(side: u32, needed: u32) -> Result<u32, AtlasError> {
    if side >= MAX_ATLAS_SIZE {
        return Err(too_large(needed));
    }
    Ok(side * 2)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
