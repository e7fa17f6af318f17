//! Atlas layout guide: an atlas-sized image with every face rectangle filled in
//! its role color, handed to an external painter as a template.

use std::io::Cursor;

use boxel_model::ModelGeometry;
use image::{ImageFormat, Rgba, RgbaImage};

use crate::box_uv::{Face, FaceRect, face_rects};
use crate::packer::{AtlasError, MAX_ATLAS_SIZE};

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Fill color for a face role.
pub fn face_color(face: Face) -> Rgba<u8> {
    match face {
        Face::Top => Rgba([76, 175, 80, 255]),
        Face::Bottom => Rgba([255, 193, 7, 255]),
        Face::Left => Rgba([33, 150, 243, 255]),
        Face::Right => Rgba([156, 39, 176, 255]),
        Face::Front => Rgba([244, 67, 54, 255]),
        Face::Back => Rgba([0, 188, 212, 255]),
    }
}

fn fill_rect(image: &mut RgbaImage, rect: &FaceRect, color: Rgba<u8>) {
    let max = rect.max();
    let x_end = max.x.min(image.width());
    let y_end = max.y.min(image.height());
    for y in rect.y.min(y_end)..y_end {
        for x in rect.x.min(x_end)..x_end {
            image.put_pixel(x, y, color);
        }
    }
}

/// Renders the guide for `model` at its recorded `texture_size` and
/// `pixel_density`.
///
/// Cubes without a `uv` and degenerate cubes are skipped. Rectangles reaching
/// past the atlas are clipped.
///
/// # Errors
///
/// [`AtlasError::AtlasTooLarge`] if either side of `texture_size` exceeds
/// [`MAX_ATLAS_SIZE`]; nothing is allocated in that case.
pub fn render_guide(model: &ModelGeometry) -> Result<RgbaImage, AtlasError> {
    let size = model.texture_size;
    if size.max_element() > MAX_ATLAS_SIZE {
        return Err(AtlasError::AtlasTooLarge {
            needed: u64::from(size.max_element()),
            limit: MAX_ATLAS_SIZE,
        });
    }
    let mut image = RgbaImage::from_pixel(size.x, size.y, BACKGROUND);
    let scale = model.pixel_density.scale();

    let mut drawn = 0usize;
    for bone in &model.bones {
        for cube in &bone.cubes {
            let Some(uv) = cube.uv else {
                tracing::debug!(bone = %bone.name, "cube has no uv; not drawn");
                continue;
            };
            if cube.is_degenerate() {
                continue;
            }
            for rect in face_rects(uv, cube.size, scale) {
                fill_rect(&mut image, &rect, face_color(rect.face));
            }
            drawn += 1;
        }
    }

    tracing::debug!(cubes = drawn, width = size.x, height = size.y, "rendered atlas guide");
    Ok(image)
}

/// Encodes an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, AtlasError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
