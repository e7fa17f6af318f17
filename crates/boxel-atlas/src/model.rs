//! Packing and rescaling applied to a whole [`ModelGeometry`].
//!
//! Both operations return a new model value; the input is never modified.

use boxel_model::{DegenerateCube, ModelGeometry};
use glam::UVec2;

use crate::box_uv::footprint;
use crate::packer::{AtlasError, PackItem, PackerConfig, ShelfPacker};
use crate::rescale::rescale_uv;

/// Identifies a cube by bone index and cube index within that bone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CubeRef {
    /// Index into `ModelGeometry::bones`.
    pub bone: usize,
    /// Index into `Bone::cubes`.
    pub cube: usize,
}

/// Result of [`pack_model`].
#[derive(Clone, Debug)]
pub struct PackOutcome {
    /// The packed model: every packable cube has a `uv`, `texture_size` is square.
    pub model: ModelGeometry,
    /// Cubes left out of the atlas because of non-positive size.
    pub skipped: Vec<DegenerateCube>,
    /// Side of the square atlas.
    pub atlas_size: u32,
}

/// Computes footprints for every cube and packs them into a fresh atlas.
///
/// Cubes are fed to the packer in bone order, then cube order, so an unchanged
/// model always packs to the same layout. Degenerate cubes get `uv = None` and
/// are listed in [`PackOutcome::skipped`].
///
/// # Errors
///
/// [`AtlasError::InvalidConfig`], [`AtlasError::Model`] for structural problems,
/// or [`AtlasError::AtlasTooLarge`].
pub fn pack_model(model: &ModelGeometry, config: &PackerConfig) -> Result<PackOutcome, AtlasError> {
    model.index()?;
    let packer = ShelfPacker::new(config.clone())?;
    let scale = config.density.scale();

    let skipped = model.degenerate_cubes();
    for cube in &skipped {
        tracing::warn!("{cube}; excluded from the atlas");
    }

    let items: Vec<PackItem<CubeRef>> = model
        .bones
        .iter()
        .enumerate()
        .flat_map(|(b, bone)| {
            bone.cubes
                .iter()
                .enumerate()
                .filter(|(_, cube)| !cube.is_degenerate())
                .map(move |(c, cube)| PackItem {
                    id: CubeRef { bone: b, cube: c },
                    footprint: footprint(cube.size, scale),
                })
        })
        .collect();

    let result = packer.pack(&items)?;

    let mut packed = model.clone();
    for bone in &mut packed.bones {
        for cube in &mut bone.cubes {
            cube.uv = None;
        }
    }
    for placement in &result.placements {
        let CubeRef { bone, cube } = placement.id;
        packed.bones[bone].cubes[cube].uv = Some(placement.origin);
    }
    packed.texture_size = UVec2::splat(result.atlas_size);
    packed.pixel_density = config.density;

    tracing::info!(
        cubes = items.len(),
        skipped = skipped.len(),
        atlas_size = result.atlas_size,
        "packed model atlas"
    );

    Ok(PackOutcome {
        model: packed,
        skipped,
        atlas_size: result.atlas_size,
    })
}

/// Rescales every cube UV and the recorded atlas size to `new_size` together.
pub fn rescale_model(model: &ModelGeometry, new_size: UVec2) -> ModelGeometry {
    let old_size = model.texture_size;
    let mut rescaled = model.clone();
    if old_size == new_size {
        return rescaled;
    }
    for bone in &mut rescaled.bones {
        for cube in &mut bone.cubes {
            if let Some(uv) = cube.uv {
                cube.uv = Some(rescale_uv(uv, old_size, new_size));
            }
        }
    }
    rescaled.texture_size = new_size;
    tracing::debug!(%old_size, %new_size, "rescaled model atlas");
    rescaled
}
