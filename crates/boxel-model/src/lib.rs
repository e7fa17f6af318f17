//! Bone/cube model geometry: the absolute-pivot hierarchy edited and rendered by the
//! rest of the toolchain, its JSON form, and structural validation.

mod bone;
mod cube;
mod density;
mod error;
mod geometry;

pub use bone::{Attachment, Bone};
pub use cube::{Cube, MAX_CUBE_EXTENT};
pub use density::DensityTier;
pub use error::{DegenerateCube, ModelError};
pub use geometry::{BoneIndex, DEFAULT_TEXTURE_SIZE, ModelGeometry};
