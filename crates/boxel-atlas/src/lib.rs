//! Texture atlas for box models: box-UV footprints, shelf packing, atlas rescaling
//! and the colored face-layout guide image.

mod box_uv;
mod guide;
mod model;
mod packer;
mod rescale;

pub use box_uv::{Face, FaceRect, face_rects, footprint, scaled_dims};
pub use boxel_model::DensityTier;
pub use guide::{encode_png, face_color, render_guide};
pub use model::{CubeRef, PackOutcome, pack_model, rescale_model};
pub use packer::{
    AtlasError, DEFAULT_PADDING, DEFAULT_SLACK, MAX_ATLAS_SIZE, MAX_PADDING, MIN_ATLAS_SIZE,
    PackItem, PackResult, PackerConfig, Placement, ShelfPacker,
};
pub use rescale::rescale_uv;
