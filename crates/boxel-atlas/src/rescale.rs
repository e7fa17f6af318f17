//! UV origin remapping for a resized atlas.

use glam::UVec2;

/// Maps `uv` from an atlas of `old_size` to one of `new_size`:
/// `round(uv · new / old)` independently per axis.
///
/// Identity when the sizes match. An axis whose old size is zero is left as is.
pub fn rescale_uv(uv: UVec2, old_size: UVec2, new_size: UVec2) -> UVec2 {
    if old_size == new_size {
        return uv;
    }
    let axis = |value: u32, old: u32, new: u32| -> u32 {
        if old == 0 {
            return value;
        }
        (f64::from(value) * f64::from(new) / f64::from(old)).round() as u32
    };
    UVec2::new(
        axis(uv.x, old_size.x, new_size.x),
        axis(uv.y, old_size.y, new_size.y),
    )
}
