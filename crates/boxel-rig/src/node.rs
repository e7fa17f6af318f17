//! Engine interchange format: a nested tree of nodes with parent-relative
//! positions and quaternion orientations.
//!
//! Bones, cubes and attachment points are all nodes; the [`Shape`] tells them
//! apart.

use std::collections::HashMap;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::RigError;

// ---------------------------------------------------------------------------
// Wire math types
// ---------------------------------------------------------------------------

/// `{x, y, z}` vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl From<Vec3> for Vector3 {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vector3> for Vec3 {
    fn from(v: Vector3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// `{x, y, z, w}` quaternion. Defaults to identity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
    /// Scalar component.
    pub w: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::from(Quat::IDENTITY)
    }
}

impl From<Quat> for Quaternion {
    fn from(q: Quat) -> Self {
        Self {
            x: q.x,
            y: q.y,
            z: q.z,
            w: q.w,
        }
    }
}

impl From<Quaternion> for Quat {
    fn from(q: Quaternion) -> Self {
        Quat::from_xyzw(q.x, q.y, q.z, q.w)
    }
}

/// Integer `{x, y}` texel offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offset {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

/// Per-axis mirror flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorFlags {
    /// Mirror horizontally.
    pub x: bool,
    /// Mirror vertically.
    pub y: bool,
}

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

/// Atlas placement of one box face.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceLayout {
    /// Top-left texel of the face rectangle.
    pub offset: Offset,
    /// Mirror flags.
    #[serde(default)]
    pub mirror: MirrorFlags,
    /// Rotation of the face texture in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub angle: i32,
}

/// Named per-face layout of a box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureLayout {
    /// Upper cap.
    pub top: FaceLayout,
    /// Lower cap.
    pub bottom: FaceLayout,
    /// Left side.
    pub left: FaceLayout,
    /// Right side.
    pub right: FaceLayout,
    /// Front.
    pub front: FaceLayout,
    /// Back.
    pub back: FaceLayout,
}

/// Geometric kind of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// No geometry: a bone container or an attachment marker.
    #[default]
    None,
    /// Axis-aligned box centred on the node position.
    Box,
}

/// Shape parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeSettings {
    /// Box size. Required for [`ShapeKind::Box`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Vector3>,
    /// Marks a geometry-less node as an attachment point.
    #[serde(default)]
    pub is_piece: bool,
}

/// Shape descriptor of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    /// Geometry kind.
    #[serde(rename = "type", default)]
    pub kind: ShapeKind,
    /// Kind-specific settings.
    #[serde(default)]
    pub settings: ShapeSettings,
    /// Face layout for textured boxes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_layout: Option<TextureLayout>,
}

/// What a node becomes in the bone model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
    /// A bone.
    Bone,
    /// A cube of the nearest bone above it.
    Box,
    /// An attachment point of the nearest bone above it.
    Attachment,
}

// ---------------------------------------------------------------------------
// Node / NodeTree
// ---------------------------------------------------------------------------

/// A node of the nested relative tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique id within the tree.
    pub id: String,
    /// Display name; bone and attachment names come from here.
    pub name: String,
    /// Offset from the parent node's position.
    #[serde(default)]
    pub position: Vector3,
    /// Orientation as a unit quaternion.
    #[serde(default)]
    pub orientation: Quaternion,
    /// Shape descriptor.
    #[serde(default)]
    pub shape: Shape,
    /// Nested children.
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    /// Classifies the node by its shape.
    pub fn role(&self) -> NodeRole {
        match self.shape.kind {
            ShapeKind::Box => NodeRole::Box,
            ShapeKind::None if self.shape.settings.is_piece => NodeRole::Attachment,
            ShapeKind::None => NodeRole::Bone,
        }
    }

    /// Number of nodes in this subtree, including itself.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }
}

/// The relative tree document: a forest of root nodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeTree {
    /// Root nodes.
    pub nodes: Vec<Node>,
}

/// A node record that names its parent by id instead of by nesting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlatNode {
    /// Unique id.
    pub id: String,
    /// Parent id, `None` for roots.
    #[serde(default)]
    pub parent: Option<String>,
    /// Display name.
    pub name: String,
    /// Offset from the parent's position.
    #[serde(default)]
    pub position: Vector3,
    /// Orientation.
    #[serde(default)]
    pub orientation: Quaternion,
    /// Shape descriptor.
    #[serde(default)]
    pub shape: Shape,
}

impl NodeTree {
    /// Parses node-tree JSON.
    pub fn from_json(json: &str) -> Result<Self, RigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, RigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total node count.
    pub fn len(&self) -> usize {
        self.nodes.iter().map(Node::subtree_len).sum()
    }

    /// Returns `true` if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nests parent-id records into a tree, keeping record order among siblings.
    ///
    /// # Errors
    ///
    /// [`RigError::DuplicateNodeId`], [`RigError::DanglingParent`] for a parent id
    /// absent from `records`, or [`RigError::CyclicNode`].
    pub fn from_flat(records: Vec<FlatNode>) -> Result<Self, RigError> {
        let mut by_id = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if by_id.insert(record.id.clone(), i).is_some() {
                return Err(RigError::DuplicateNodeId(record.id.clone()));
            }
        }

        let mut parents = Vec::with_capacity(records.len());
        let mut children = vec![Vec::new(); records.len()];
        let mut roots = Vec::new();
        for (i, record) in records.iter().enumerate() {
            match &record.parent {
                None => {
                    parents.push(None);
                    roots.push(i);
                }
                Some(parent) => {
                    let Some(&p) = by_id.get(parent) else {
                        return Err(RigError::DanglingParent {
                            node: record.id.clone(),
                            parent: parent.clone(),
                        });
                    };
                    parents.push(Some(p));
                    children[p].push(i);
                }
            }
        }

        let mut reached = vec![false; records.len()];
        let mut stack = roots.clone();
        while let Some(i) = stack.pop() {
            reached[i] = true;
            stack.extend_from_slice(&children[i]);
        }
        if let Some(start) = reached.iter().position(|r| !r) {
            let mut seen = vec![false; records.len()];
            let mut cur = start;
            while !seen[cur] {
                seen[cur] = true;
                match parents[cur] {
                    Some(p) => cur = p,
                    None => break,
                }
            }
            return Err(RigError::CyclicNode {
                node: records[cur].id.clone(),
            });
        }

        let mut slots: Vec<Option<FlatNode>> = records.into_iter().map(Some).collect();
        let nodes = roots
            .iter()
            .filter_map(|&i| nest(i, &mut slots, &children))
            .collect();
        Ok(Self { nodes })
    }

    /// Flattens to parent-id records in pre-order.
    pub fn flatten(&self) -> Vec<FlatNode> {
        fn walk(node: &Node, parent: Option<&str>, out: &mut Vec<FlatNode>) {
            out.push(FlatNode {
                id: node.id.clone(),
                parent: parent.map(str::to_string),
                name: node.name.clone(),
                position: node.position,
                orientation: node.orientation,
                shape: node.shape,
            });
            for child in &node.children {
                walk(child, Some(&node.id), out);
            }
        }

        let mut out = Vec::with_capacity(self.len());
        for node in &self.nodes {
            walk(node, None, &mut out);
        }
        out
    }
}

fn nest(i: usize, slots: &mut [Option<FlatNode>], children: &[Vec<usize>]) -> Option<Node> {
    let record = slots[i].take()?;
    let kids = children[i]
        .iter()
        .filter_map(|&c| nest(c, slots, children))
        .collect();
    Some(Node {
        id: record.id,
        name: record.name,
        position: record.position,
        orientation: record.orientation,
        shape: record.shape,
        children: kids,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
