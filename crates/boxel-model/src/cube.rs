//! Axis-aligned box primitive.

use glam::{UVec2, Vec3};
use serde::{Deserialize, Serialize};

/// Largest size component, in model units, a cube may have and still be packed.
pub const MAX_CUBE_EXTENT: f32 = 4096.0;

/// An axis-aligned box owned by a [`crate::Bone`].
///
/// `origin` is the minimum corner in model units. Rotation, when present, is in
/// Euler degrees about `pivot` (the box centre when no pivot is given).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cube {
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Minimum corner.
    pub origin: Vec3,
    /// Width, height, depth. Every component must be positive.
    pub size: Vec3,
    /// Euler angles in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,
    /// Absolute rotation centre.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot: Option<Vec3>,
    /// Atlas origin of the box-UV footprint, assigned by the packer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv: Option<UVec2>,
    /// Display color, e.g. `"#aa7744"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Cube {
    /// Creates an unrotated, unnamed cube with no UV assignment.
    pub fn new(origin: Vec3, size: Vec3) -> Self {
        Self {
            name: None,
            origin,
            size,
            rotation: None,
            pivot: None,
            uv: None,
            color: None,
        }
    }

    /// Sets the cube's name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the Euler rotation (degrees).
    pub fn with_rotation(mut self, degrees: Vec3) -> Self {
        self.rotation = Some(degrees);
        self
    }

    /// Sets an explicit rotation pivot.
    pub fn with_pivot(mut self, pivot: Vec3) -> Self {
        self.pivot = Some(pivot);
        self
    }

    /// Geometric centre of the box.
    pub fn center(&self) -> Vec3 {
        self.origin + self.size * 0.5
    }

    /// The rotation centre: the explicit pivot, or the box centre.
    pub fn pivot_or_center(&self) -> Vec3 {
        self.pivot.unwrap_or_else(|| self.center())
    }

    /// Rotation in degrees, zero when absent.
    pub fn rotation_or_zero(&self) -> Vec3 {
        self.rotation.unwrap_or(Vec3::ZERO)
    }

    /// Returns `true` if any size component is not strictly positive (NaN included)
    /// or larger than [`MAX_CUBE_EXTENT`].
    pub fn is_degenerate(&self) -> bool {
        let in_range = |v: f32| v > 0.0 && v <= MAX_CUBE_EXTENT;
        !(in_range(self.size.x) && in_range(self.size.y) && in_range(self.size.z))
    }
}
