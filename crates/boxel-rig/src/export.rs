//! Absolute bone tree → relative node tree.

use boxel_atlas::{DensityTier, Face, face_rects};
use boxel_model::{Attachment, Bone, BoneIndex, Cube, ModelGeometry};
use glam::{Quat, UVec2, Vec3};

use crate::error::RigError;
use crate::node::{
    FaceLayout, Node, NodeTree, Offset, Quaternion, Shape, ShapeKind, ShapeSettings,
    TextureLayout,
};
use crate::rotation::{ROTATION_ORDER, RotationOrder, euler_to_quat};

/// Tolerance for treating a cube as centred on its bone pivot.
const CENTER_EPSILON: f32 = 1e-5;

/// Export parameters.
///
/// Box texture layouts use the model's own `pixel_density`, so they always
/// match the density the atlas was packed at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportOptions {
    /// Euler composition order of the source rotations.
    pub order: RotationOrder,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            order: ROTATION_ORDER,
        }
    }
}

/// Converts `model` into the relative node tree.
///
/// Bones are walked parent-first from the roots. A bone node sits at
/// `pivot - parent_pivot`; its children are its cubes (centre relative to the
/// bone pivot), its attachments (positions unchanged) and then its child bones.
/// Node ids are assigned sequentially in that walk.
///
/// # Errors
///
/// [`RigError::Model`] if the model is structurally invalid; nothing is produced.
pub fn export_node_tree(model: &ModelGeometry, options: &ExportOptions) -> Result<NodeTree, RigError> {
    let index = model.index()?;
    let mut exporter = Exporter {
        bones: &model.bones,
        index: &index,
        options,
        density: model.pixel_density,
        next_id: 0,
    };
    let nodes = index
        .roots()
        .iter()
        .map(|&root| exporter.bone_node(root, Vec3::ZERO))
        .collect();
    let tree = NodeTree { nodes };
    tracing::debug!(bones = model.bones.len(), nodes = tree.len(), "exported node tree");
    Ok(tree)
}

struct Exporter<'a> {
    bones: &'a [Bone],
    index: &'a BoneIndex,
    options: &'a ExportOptions,
    density: DensityTier,
    next_id: u32,
}

impl Exporter<'_> {
    fn id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    fn bone_node(&mut self, i: usize, parent_pivot: Vec3) -> Node {
        let bones = self.bones;
        let bone = &bones[i];
        let position = bone.pivot - parent_pivot;

        if let Some(cube) = standalone_cube(bone) {
            // Root primitive: the bone only exists to carry this one box.
            let mut node = self.cube_node(cube, bone.name.clone(), bone.pivot);
            node.position = position.into();
            for attachment in &bone.attachments {
                node.children.push(self.attachment_node(attachment));
            }
            node.children.extend(self.child_bones(i, bone.pivot));
            return node;
        }

        let id = self.id();
        let mut children = Vec::with_capacity(bone.cubes.len() + bone.attachments.len());
        for (ci, cube) in bone.cubes.iter().enumerate() {
            let name = cube
                .name
                .clone()
                .unwrap_or_else(|| format!("{}_cube{ci}", bone.name));
            children.push(self.cube_node(cube, name, bone.pivot));
        }
        for attachment in &bone.attachments {
            children.push(self.attachment_node(attachment));
        }
        children.extend(self.child_bones(i, bone.pivot));

        Node {
            id,
            name: bone.name.clone(),
            position: position.into(),
            orientation: self.orientation(bone.rotation).into(),
            shape: Shape::default(),
            children,
        }
    }

    fn attachment_node(&mut self, attachment: &Attachment) -> Node {
        Node {
            id: self.id(),
            name: attachment.name.clone(),
            position: attachment.position.into(),
            orientation: Quaternion::default(),
            shape: Shape {
                kind: ShapeKind::None,
                settings: ShapeSettings {
                    size: None,
                    is_piece: true,
                },
                texture_layout: None,
            },
            children: Vec::new(),
        }
    }

    fn child_bones(&mut self, i: usize, pivot: Vec3) -> Vec<Node> {
        let index = self.index;
        index
            .children(i)
            .iter()
            .map(|&child| self.bone_node(child, pivot))
            .collect()
    }

    fn cube_node(&mut self, cube: &Cube, name: String, bone_pivot: Vec3) -> Node {
        let center = cube.center();
        if let Some(pivot) = cube.pivot
            && (pivot - center).abs().max_element() > CENTER_EPSILON
        {
            // Nodes rotate about their own position; an off-centre pivot has no slot.
            tracing::debug!(cube = %name, %pivot, "cube pivot not carried by node tree");
        }

        Node {
            id: self.id(),
            name,
            position: (center - bone_pivot).into(),
            orientation: self.orientation(cube.rotation).into(),
            shape: Shape {
                kind: ShapeKind::Box,
                settings: ShapeSettings {
                    size: Some(cube.size.into()),
                    is_piece: false,
                },
                texture_layout: cube
                    .uv
                    .map(|uv| texture_layout(uv, cube.size, self.density)),
            },
            children: Vec::new(),
        }
    }

    fn orientation(&self, rotation: Option<Vec3>) -> Quat {
        rotation.map_or(Quat::IDENTITY, |degrees| {
            euler_to_quat(degrees, self.options.order)
        })
    }
}

/// The single cube of a root bone that is nothing more than a named box
/// (plus attachments), as produced when importing a root-level box node.
fn standalone_cube(bone: &Bone) -> Option<&Cube> {
    let [cube] = bone.cubes.as_slice() else {
        return None;
    };
    let centred = (cube.center() - bone.pivot).abs().max_element() <= CENTER_EPSILON;
    let pivot_ok = cube
        .pivot
        .is_none_or(|p| (p - cube.center()).abs().max_element() <= CENTER_EPSILON);
    let standalone = bone.is_root()
        && bone.rotation_or_zero() == Vec3::ZERO
        && cube.name.as_deref() == Some(bone.name.as_str())
        && centred
        && pivot_ok;
    standalone.then_some(cube)
}

fn texture_layout(uv: UVec2, size: Vec3, density: DensityTier) -> TextureLayout {
    let mut layout = TextureLayout::default();
    for rect in face_rects(uv, size, density.scale()) {
        let origin = rect.origin();
        let face = FaceLayout {
            offset: Offset {
                x: origin.x,
                y: origin.y,
            },
            ..FaceLayout::default()
        };
        match rect.face {
            Face::Top => layout.top = face,
            Face::Bottom => layout.bottom = face,
            Face::Left => layout.left = face,
            Face::Right => layout.right = face,
            Face::Front => layout.front = face,
            Face::Back => layout.back = face,
        }
    }
    layout
}

#[cfg(test)]
mod tests {
    use boxel_model::ModelError;

    use super::*;
    use crate::node::NodeRole;

    fn chain() -> ModelGeometry {
        ModelGeometry::new(vec![
            Bone::new("root", Vec3::ZERO),
            Bone::new("pelvis", Vec3::new(0.0, 12.0, 0.0))
                .with_parent("root")
                .with_rotation(Vec3::new(30.0, 0.0, 0.0)),
            Bone::new("head", Vec3::new(0.0, 24.0, 0.0))
                .with_parent("pelvis")
                .with_cube(Cube::new(Vec3::new(-4.0, 24.0, -4.0), Vec3::splat(8.0)))
                .with_attachment("hat", Vec3::new(0.0, 8.0, 0.0)),
        ])
    }

    #[test]
    fn test_chain_positions_are_parent_relative() {
        let tree = export_node_tree(&chain(), &ExportOptions::default()).unwrap();
        let root = &tree.nodes[0];
        assert_eq!(root.name, "root");
        assert_eq!(Vec3::from(root.position), Vec3::ZERO);

        let pelvis = &root.children[0];
        assert_eq!(pelvis.name, "pelvis");
        assert_eq!(Vec3::from(pelvis.position), Vec3::new(0.0, 12.0, 0.0));
        let q: Quat = pelvis.orientation.into();
        assert!((q.length() - 1.0).abs() < 1e-6);
        assert!(q.dot(Quat::from_rotation_x(30f32.to_radians())).abs() > 1.0 - 1e-6);

        let head = &pelvis.children[0];
        assert_eq!(head.name, "head");
        assert_eq!(Vec3::from(head.position), Vec3::new(0.0, 12.0, 0.0));
    }

    #[test]
    fn test_cube_and_attachment_children() {
        let tree = export_node_tree(&chain(), &ExportOptions::default()).unwrap();
        let head = &tree.nodes[0].children[0].children[0];
        assert_eq!(head.children.len(), 2);

        let cube = &head.children[0];
        assert_eq!(cube.role(), NodeRole::Box);
        assert_eq!(cube.name, "head_cube0");
        // Centre (0, 28, 0) relative to the head pivot.
        assert_eq!(Vec3::from(cube.position), Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(cube.shape.settings.size.map(Vec3::from), Some(Vec3::splat(8.0)));
        assert!(cube.shape.texture_layout.is_none());

        let hat = &head.children[1];
        assert_eq!(hat.role(), NodeRole::Attachment);
        assert_eq!(Vec3::from(hat.position), Vec3::new(0.0, 8.0, 0.0));
    }

    #[test]
    fn test_ids_are_unique() {
        let tree = export_node_tree(&chain(), &ExportOptions::default()).unwrap();
        let mut ids: Vec<String> = tree.flatten().into_iter().map(|n| n.id).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert_eq!(total, 5);
    }

    #[test]
    fn test_texture_layout_matches_face_rects() {
        let mut model = chain();
        model.bones[2].cubes[0].uv = Some(UVec2::new(10, 20));
        let tree = export_node_tree(&model, &ExportOptions::default()).unwrap();
        let cube = &tree.nodes[0].children[0].children[0].children[0];
        let layout = cube.shape.texture_layout.unwrap();
        assert_eq!(layout.top.offset, Offset { x: 18, y: 20 });
        assert_eq!(layout.bottom.offset, Offset { x: 26, y: 20 });
        assert_eq!(layout.right.offset, Offset { x: 10, y: 28 });
        assert_eq!(layout.front.offset, Offset { x: 18, y: 28 });
        assert_eq!(layout.left.offset, Offset { x: 26, y: 28 });
        assert_eq!(layout.back.offset, Offset { x: 34, y: 28 });
        assert_eq!(layout.front.angle, 0);
        assert!(!layout.front.mirror.x && !layout.front.mirror.y);
    }

    #[test]
    fn test_texture_layout_uses_packed_density() {
        let mut model = chain();
        model.bones[2].cubes[0].uv = Some(UVec2::ZERO);
        model.pixel_density = DensityTier::X2;
        let tree = export_node_tree(&model, &ExportOptions::default()).unwrap();
        let cube = &tree.nodes[0].children[0].children[0].children[0];
        let layout = cube.shape.texture_layout.unwrap();
        assert_eq!(layout.top.offset, Offset { x: 16, y: 0 });
        assert_eq!(layout.left.offset, Offset { x: 32, y: 16 });
        assert_eq!(layout.back.offset, Offset { x: 48, y: 16 });
    }

    #[test]
    fn test_pivoted_cube_exports_unrotated_centre() {
        let model = ModelGeometry::new(vec![
            Bone::new("arm", Vec3::ZERO).with_cube(
                Cube::new(Vec3::new(0.0, 0.0, -1.0), Vec3::new(4.0, 2.0, 2.0))
                    .with_pivot(Vec3::ZERO)
                    .with_rotation(Vec3::new(0.0, 0.0, 90.0)),
            ),
        ]);
        let tree = export_node_tree(&model, &ExportOptions::default()).unwrap();
        let cube = &tree.nodes[0].children[0];
        assert_eq!(Vec3::from(cube.position), Vec3::new(2.0, 1.0, 0.0));
        let q: Quat = cube.orientation.into();
        assert!(q.dot(Quat::from_rotation_z(90f32.to_radians())).abs() > 1.0 - 1e-6);
    }

    #[test]
    fn test_standalone_root_cube_becomes_box_node() {
        let model = ModelGeometry::new(vec![
            Bone::new("crate", Vec3::new(5.0, 2.0, 5.0)).with_cube(
                Cube::new(Vec3::new(3.0, 0.0, 3.0), Vec3::splat(4.0)).named("crate"),
            ),
        ]);
        let tree = export_node_tree(&model, &ExportOptions::default()).unwrap();
        assert_eq!(tree.len(), 1);
        let node = &tree.nodes[0];
        assert_eq!(node.role(), NodeRole::Box);
        assert_eq!(Vec3::from(node.position), Vec3::new(5.0, 2.0, 5.0));
    }

    #[test]
    fn test_invalid_model_rejected() {
        let model = ModelGeometry::new(vec![Bone::new("a", Vec3::ZERO).with_parent("b")]);
        assert!(matches!(
            export_node_tree(&model, &ExportOptions::default()),
            Err(RigError::Model(ModelError::MissingParent { .. }))
        ));
    }
}
