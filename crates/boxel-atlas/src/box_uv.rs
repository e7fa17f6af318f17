//! Box-UV geometry: the unfolded six-face layout of a cuboid in atlas pixels.
//!
//! ```text
//!        rd    rw    rd    rw
//!     +-----+-----+-----+
//!  rd |     | top | bot |
//!     +-----+-----+-----+-----+
//!  rh |right|front|left |back |
//!     +-----+-----+-----+-----+
//! ```
//!
//! The packer, the guide renderer and any texture-sampling consumer must agree on
//! this layout exactly.

use glam::{UVec2, UVec3, Vec3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Face
// ---------------------------------------------------------------------------

/// Role of a face rectangle inside a box-UV footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    /// Upper cap.
    Top,
    /// Lower cap.
    Bottom,
    /// Left side.
    Left,
    /// Right side.
    Right,
    /// Front.
    Front,
    /// Back.
    Back,
}

impl Face {
    /// Faces in the order [`face_rects`] returns them.
    pub const LAYOUT_ORDER: [Face; 6] = [
        Self::Top,
        Self::Bottom,
        Self::Right,
        Self::Front,
        Self::Left,
        Self::Back,
    ];
}

/// A face's rectangle in atlas pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceRect {
    /// Which face this rectangle textures.
    pub face: Face,
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FaceRect {
    /// Top-left corner.
    pub fn origin(&self) -> UVec2 {
        UVec2::new(self.x, self.y)
    }

    /// Exclusive bottom-right corner.
    pub fn max(&self) -> UVec2 {
        UVec2::new(
            self.x.saturating_add(self.width),
            self.y.saturating_add(self.height),
        )
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Scales a cube size to whole texels: `ceil(size * scale)` per axis.
///
/// Non-positive or non-finite components map to zero; values past `u32::MAX`
/// saturate.
pub fn scaled_dims(size: Vec3, scale: f32) -> UVec3 {
    let texels = |v: f32| -> u32 {
        let scaled = (v * scale).ceil();
        if scaled.is_finite() && scaled > 0.0 {
            scaled as u32
        } else {
            0
        }
    };
    UVec3::new(texels(size.x), texels(size.y), texels(size.z))
}

/// Width and height of the unfolded box: `(2·(rw+rd), rd+rh)`, saturating.
pub fn footprint(size: Vec3, scale: f32) -> UVec2 {
    let d = scaled_dims(size, scale);
    let (rw, rh, rd) = (d.x, d.y, d.z);
    UVec2::new(rw.saturating_add(rd).saturating_mul(2), rd.saturating_add(rh))
}

/// The six face rectangles of a footprint whose top-left corner is `origin`.
///
/// Returned in [`Face::LAYOUT_ORDER`]. Coordinates saturate at `u32::MAX`.
pub fn face_rects(origin: UVec2, size: Vec3, scale: f32) -> [FaceRect; 6] {
    let d = scaled_dims(size, scale);
    let (rw, rh, rd) = (d.x, d.y, d.z);
    let (u, v) = (origin.x, origin.y);
    let at = |du: &[u32]| du.iter().fold(u, |acc, &step| acc.saturating_add(step));
    let row2 = v.saturating_add(rd);

    Face::LAYOUT_ORDER.map(|face| {
        let (x, y, width, height) = match face {
            Face::Top => (at(&[rd]), v, rw, rd),
            Face::Bottom => (at(&[rd, rw]), v, rw, rd),
            Face::Right => (u, row2, rd, rh),
            Face::Front => (at(&[rd]), row2, rw, rh),
            Face::Left => (at(&[rd, rw]), row2, rd, rh),
            Face::Back => (at(&[rd, rw, rd]), row2, rw, rh),
        };
        FaceRect {
            face,
            x,
            y,
            width,
            height,
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
