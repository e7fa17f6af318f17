//! Subcommand bodies. Each reads its input file, runs one library operation
//! and writes the result, either to a file or to stdout.

use std::io::Write;
use std::path::Path;

use boxel_atlas::{PackOutcome, encode_png, pack_model, render_guide, rescale_model};
use boxel_config::Config;
use boxel_model::ModelGeometry;
use boxel_rig::{
    ExportOptions, FlatNode, ImportOptions, NodeTree, export_node_tree, import_node_tree,
};
use glam::UVec2;
use tracing::{info, warn};

use crate::error::CliError;

fn read_text(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    std::fs::write(path, bytes).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_output(output: Option<&Path>, text: &str) -> Result<(), CliError> {
    match output {
        Some(path) => write_file(path, text.as_bytes()),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.write_all(b"\n"))
                .map_err(CliError::Stdout)
        }
    }
}

/// Loads and structurally validates a model file.
pub fn read_model(path: &Path) -> Result<ModelGeometry, CliError> {
    Ok(ModelGeometry::from_json(&read_text(path)?)?)
}

/// Packs every cube of the model at `input` into a fresh atlas.
pub fn pack(
    input: &Path,
    output: Option<&Path>,
    guide_path: Option<&Path>,
    config: &Config,
) -> Result<PackOutcome, CliError> {
    let model = read_model(input)?;
    let outcome = pack_model(&model, &config.atlas)?;
    write_output(output, &outcome.model.to_json_pretty()?)?;

    if let Some(guide_path) = guide_path {
        write_guide(&outcome.model, guide_path)?;
    }

    info!(
        input = %input.display(),
        atlas_size = outcome.atlas_size,
        skipped = outcome.skipped.len(),
        "pack finished"
    );
    Ok(outcome)
}

/// Renders the painting guide for an already packed model, at the density it
/// was packed with.
pub fn guide(input: &Path, output: &Path) -> Result<(), CliError> {
    let model = read_model(input)?;
    write_guide(&model, output)
}

fn write_guide(model: &ModelGeometry, output: &Path) -> Result<(), CliError> {
    let image = render_guide(model)?;
    let png = encode_png(&image)?;
    write_file(output, &png)?;
    info!(output = %output.display(), width = image.width(), height = image.height(), "wrote guide");
    Ok(())
}

/// Converts an absolute bone model into the relative node tree.
pub fn export(input: &Path, output: Option<&Path>, config: &Config) -> Result<NodeTree, CliError> {
    let model = read_model(input)?;
    let options = ExportOptions {
        order: config.rig.rotation_order,
    };
    let tree = export_node_tree(&model, &options)?;
    write_output(output, &tree.to_json_pretty()?)?;
    info!(bones = model.bones.len(), nodes = tree.len(), "export finished");
    Ok(tree)
}

/// Converts a relative node tree (nested, or flat records when `flat`) into
/// an absolute bone model. Texture layouts are read at the configured density.
pub fn import(
    input: &Path,
    output: Option<&Path>,
    flat: bool,
    texture_size: UVec2,
    config: &Config,
) -> Result<ModelGeometry, CliError> {
    let text = read_text(input)?;
    let tree = if flat {
        let records: Vec<FlatNode> = serde_json::from_str(&text)?;
        NodeTree::from_flat(records)?
    } else {
        NodeTree::from_json(&text)?
    };
    if tree.is_empty() {
        warn!(input = %input.display(), "node tree has no nodes");
    }

    let options = ImportOptions {
        order: config.rig.rotation_order,
        texture_size,
        density: config.atlas.density,
    };
    let model = import_node_tree(&tree, &options)?;
    write_output(output, &model.to_json_pretty()?)?;
    info!(nodes = tree.len(), bones = model.bones.len(), "import finished");
    Ok(model)
}

/// Rescales every UV origin of the model to `new_size`.
pub fn rescale(input: &Path, output: Option<&Path>, new_size: UVec2) -> Result<ModelGeometry, CliError> {
    let model = read_model(input)?;
    let rescaled = rescale_model(&model, new_size);
    write_output(output, &rescaled.to_json_pretty()?)?;
    info!(old = %model.texture_size, new = %new_size, "rescale finished");
    Ok(rescaled)
}

/// Resolves the rescale target: the dimensions of `image` when given,
/// otherwise `width` by `height` (height defaults to width).
pub fn target_size(
    image: Option<&Path>,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<UVec2, CliError> {
    let size = match (image, width) {
        (Some(path), _) => {
            let (w, h) = image::image_dimensions(path).map_err(|source| CliError::Image {
                path: path.to_path_buf(),
                source,
            })?;
            UVec2::new(w, h)
        }
        (None, Some(w)) => UVec2::new(w, height.unwrap_or(w)),
        (None, None) => {
            return Err(CliError::InvalidSize(
                "pass --image or --width".to_string(),
            ));
        }
    };
    if size.x == 0 || size.y == 0 {
        return Err(CliError::InvalidSize(format!("{}x{}", size.x, size.y)));
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = r#"{
        "bones": [
            { "name": "body", "pivot": [0, 0, 0],
              "cubes": [{ "origin": [-4, 0, -2], "size": [8, 12, 4] }] },
            { "name": "head", "parent": "body", "pivot": [0, 12, 0],
              "cubes": [{ "origin": [-4, 12, -4], "size": [8, 8, 8] },
                        { "origin": [0, 0, 0], "size": [0, 2, 2] }],
              "attachments": [{ "name": "hat", "position": [0, 20, 0] }] }
        ]
    }"#;

    fn model_file(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("model.json");
        std::fs::write(&path, MODEL).unwrap();
        path
    }

    #[test]
    fn test_pack_writes_model_and_guide() {
        let dir = tempfile::tempdir().unwrap();
        let input = model_file(dir.path());
        let output = dir.path().join("packed.json");
        let guide_path = dir.path().join("guide.png");

        let outcome = pack(&input, Some(&output), Some(&guide_path), &Config::default()).unwrap();
        assert_eq!(outcome.atlas_size, 64);
        assert_eq!(outcome.skipped.len(), 1, "zero-width cube is skipped");

        let written = read_model(&output).unwrap();
        assert_eq!(written, outcome.model);
        assert!(written.bones[0].cubes[0].uv.is_some());
        assert!(written.bones[1].cubes[1].uv.is_none());

        let (w, h) = image::image_dimensions(&guide_path).unwrap();
        assert_eq!((w, h), (64, 64));
    }

    #[test]
    fn test_export_after_dense_pack_uses_packed_density() {
        let dir = tempfile::tempdir().unwrap();
        let input = model_file(dir.path());
        let packed = dir.path().join("packed.json");
        let nodes = dir.path().join("nodes.json");
        let guide_path = dir.path().join("guide.png");

        let mut dense = Config::default();
        dense.atlas.density = boxel_atlas::DensityTier::X2;
        let outcome = pack(&input, Some(&packed), None, &dense).unwrap();
        let head_uv = outcome.model.bones[1].cubes[0].uv.unwrap();

        // Export and guide run later with the default 1x config.
        let tree = export(&packed, Some(&nodes), &Config::default()).unwrap();
        let head_cube = &tree.nodes[0].children[1].children[0];
        assert_eq!(head_cube.name, "head_cube0");
        let layout = head_cube.shape.texture_layout.unwrap();
        // 8-cube at 2x: rd = rw = 16.
        assert_eq!(layout.top.offset.x, head_uv.x + 16);
        assert_eq!(layout.left.offset.x, head_uv.x + 32);
        assert_eq!(layout.back.offset.y, head_uv.y + 16);

        guide(&packed, &guide_path).unwrap();
        let image = image::open(&guide_path).unwrap().to_rgba8();
        let back = image.get_pixel(head_uv.x + 48, head_uv.y + 16);
        assert_eq!(*back, boxel_atlas::face_color(boxel_atlas::Face::Back));
    }

    #[test]
    fn test_missing_input_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = read_model(&missing).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_export_then_import_restores_bones() {
        let dir = tempfile::tempdir().unwrap();
        let input = model_file(dir.path());
        let packed = dir.path().join("packed.json");
        let nodes = dir.path().join("nodes.json");
        let restored = dir.path().join("restored.json");
        let config = Config::default();

        let outcome = pack(&input, Some(&packed), None, &config).unwrap();
        export(&packed, Some(&nodes), &config).unwrap();
        let model = import(&nodes, Some(&restored), false, outcome.model.texture_size, &config).unwrap();

        assert_eq!(model.bones.len(), 2);
        let head = model.bone("head").unwrap();
        assert_eq!(head.parent.as_deref(), Some("body"));
        assert_eq!(head.pivot, glam::Vec3::new(0.0, 12.0, 0.0));
        assert_eq!(head.attachments[0].position, glam::Vec3::new(0.0, 20.0, 0.0));
        assert_eq!(head.cubes[0].origin, glam::Vec3::new(-4.0, 12.0, -4.0));
        assert_eq!(head.cubes[0].uv, outcome.model.bones[1].cubes[0].uv);
        assert_eq!(model.texture_size, UVec2::splat(64));
    }

    #[test]
    fn test_import_flat_records() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("flat.json");
        std::fs::write(
            &input,
            r#"[
                { "id": "2", "parent": "1", "name": "arm", "position": { "x": 0, "y": 2, "z": 0 } },
                { "id": "1", "name": "root", "position": { "x": 1, "y": 0, "z": 0 } }
            ]"#,
        )
        .unwrap();

        let model = import(&input, None, true, UVec2::splat(64), &Config::default()).unwrap();
        assert_eq!(model.bone("arm").unwrap().pivot, glam::Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(model.bone("arm").unwrap().parent.as_deref(), Some("root"));
    }

    #[test]
    fn test_rescale_doubles_uvs() {
        let dir = tempfile::tempdir().unwrap();
        let input = model_file(dir.path());
        let packed = dir.path().join("packed.json");
        let config = Config::default();
        let outcome = pack(&input, Some(&packed), None, &config).unwrap();

        let rescaled = rescale(&packed, None, UVec2::splat(128)).unwrap();
        assert_eq!(rescaled.texture_size, UVec2::splat(128));
        let before = outcome.model.bones[1].cubes[0].uv.unwrap();
        assert_eq!(rescaled.bones[1].cubes[0].uv, Some(before * 2));
    }

    #[test]
    fn test_target_size_sources() {
        assert_eq!(target_size(None, Some(128), None).unwrap(), UVec2::splat(128));
        assert_eq!(target_size(None, Some(128), Some(64)).unwrap(), UVec2::new(128, 64));
        assert!(matches!(target_size(None, None, None), Err(CliError::InvalidSize(_))));
        assert!(matches!(target_size(None, Some(0), None), Err(CliError::InvalidSize(_))));

        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("atlas.png");
        image::RgbaImage::new(96, 48).save(&png).unwrap();
        assert_eq!(target_size(Some(&png), Some(1), None).unwrap(), UVec2::new(96, 48));
    }
}
