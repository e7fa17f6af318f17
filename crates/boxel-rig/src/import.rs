//! Relative node tree → absolute bone tree.

use std::collections::HashSet;

use boxel_model::{Attachment, Bone, Cube, DEFAULT_TEXTURE_SIZE, DensityTier, ModelGeometry};
use glam::{Quat, UVec2, Vec3};

use crate::error::RigError;
use crate::node::{Node, NodeRole, NodeTree, TextureLayout};
use crate::rotation::{ROTATION_ORDER, RotationOrder, quat_to_euler};

/// Euler angles below this magnitude (degrees) import as "no rotation".
const ROTATION_EPSILON: f32 = 1e-4;

/// Import parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImportOptions {
    /// Euler composition order for the produced rotations.
    pub order: RotationOrder,
    /// Atlas size recorded on the produced model.
    pub texture_size: UVec2,
    /// Texel density the tree's texture layouts were written at.
    pub density: DensityTier,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            order: ROTATION_ORDER,
            texture_size: UVec2::splat(DEFAULT_TEXTURE_SIZE),
            density: DensityTier::X1,
        }
    }
}

/// Converts the relative node tree into an absolute bone model.
///
/// Nodes are walked parent-first; each absolute position is the parent's
/// absolute position plus the node's offset. Containers become bones, boxes
/// become cubes of the nearest bone above them, and attachment markers become
/// attachments of that bone with their offset kept as is. A box with no bone
/// above it becomes a bone of its own, named after the node.
///
/// # Errors
///
/// Any [`RigError`] structural variant; no partial model is returned.
pub fn import_node_tree(tree: &NodeTree, options: &ImportOptions) -> Result<ModelGeometry, RigError> {
    let mut importer = Importer {
        options,
        bones: Vec::new(),
        seen_ids: HashSet::new(),
    };
    for node in &tree.nodes {
        importer.visit(node, Vec3::ZERO, None)?;
    }

    let model = ModelGeometry {
        bones: importer.bones,
        texture_size: options.texture_size,
        pixel_density: options.density,
    };
    model.index()?;
    tracing::debug!(
        nodes = tree.len(),
        bones = model.bones.len(),
        cubes = model.cube_count(),
        "imported node tree"
    );
    Ok(model)
}

struct Importer<'a> {
    options: &'a ImportOptions,
    bones: Vec<Bone>,
    seen_ids: HashSet<String>,
}

impl Importer<'_> {
    fn visit(&mut self, node: &Node, parent_abs: Vec3, owner: Option<usize>) -> Result<(), RigError> {
        if !self.seen_ids.insert(node.id.clone()) {
            return Err(RigError::DuplicateNodeId(node.id.clone()));
        }

        let offset = Vec3::from(node.position);
        let absolute = parent_abs + offset;
        let rotation = self.rotation(node)?;

        let owner = match node.role() {
            NodeRole::Bone => {
                let parent = owner.map(|o| self.bones[o].name.clone());
                Some(self.push_bone(Bone {
                    name: node.name.clone(),
                    parent,
                    pivot: absolute,
                    rotation,
                    cubes: Vec::new(),
                    attachments: Vec::new(),
                }))
            }
            NodeRole::Box => {
                let size: Vec3 = node
                    .shape
                    .settings
                    .size
                    .ok_or_else(|| RigError::MissingBoxSize {
                        node: node.id.clone(),
                    })?
                    .into();
                let mut cube = Cube::new(Vec3::ZERO, size).named(node.name.clone());
                cube.rotation = rotation;
                cube.uv = node.shape.texture_layout.as_ref().map(layout_origin);

                match owner {
                    Some(o) => {
                        cube.origin = self.bones[o].pivot + offset - size * 0.5;
                        self.bones[o].cubes.push(cube);
                        Some(o)
                    }
                    None => {
                        // Standalone primitive at the root: synthesize its bone.
                        cube.origin = absolute - size * 0.5;
                        let mut bone = Bone::new(node.name.clone(), absolute);
                        bone.cubes.push(cube);
                        Some(self.push_bone(bone))
                    }
                }
            }
            NodeRole::Attachment => {
                let Some(o) = owner else {
                    return Err(RigError::OrphanAttachment {
                        node: node.id.clone(),
                    });
                };
                self.bones[o].attachments.push(Attachment {
                    name: node.name.clone(),
                    position: offset,
                });
                Some(o)
            }
        };

        for child in &node.children {
            self.visit(child, absolute, owner)?;
        }
        Ok(())
    }

    fn push_bone(&mut self, bone: Bone) -> usize {
        self.bones.push(bone);
        self.bones.len() - 1
    }

    fn rotation(&self, node: &Node) -> Result<Option<Vec3>, RigError> {
        let q = Quat::from(node.orientation);
        let len = q.length();
        if !len.is_finite() || len < 1e-6 {
            return Err(RigError::InvalidOrientation {
                node: node.id.clone(),
            });
        }
        let degrees = quat_to_euler(q / len, self.options.order);
        Ok((degrees.abs().max_element() > ROTATION_EPSILON).then_some(degrees))
    }
}

/// Recovers the footprint origin: `u` from the right face, `v` from the top face.
fn layout_origin(layout: &TextureLayout) -> UVec2 {
    UVec2::new(layout.right.offset.x, layout.top.offset.y)
}
