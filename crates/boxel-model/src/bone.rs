//! Named hierarchy node owning cubes and attachment points.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::cube::Cube;

/// A named anchor positioned relative to its owning bone's pivot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment name, e.g. `"hand_right"`.
    pub name: String,
    /// Offset from the owning bone's pivot.
    pub position: Vec3,
}

/// A bone in the absolute-pivot hierarchy.
///
/// `pivot` is absolute; `rotation` is relative to the parent's orientation.
/// The parent is referenced by name and resolved through [`crate::BoneIndex`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bone {
    /// Unique bone name.
    pub name: String,
    /// Parent bone name. Root bones have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Absolute rotation centre.
    pub pivot: Vec3,
    /// Euler angles in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,
    /// Owned boxes, in display order.
    #[serde(default)]
    pub cubes: Vec<Cube>,
    /// Named anchors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Bone {
    /// Creates an empty root bone at `pivot`.
    pub fn new(name: impl Into<String>, pivot: Vec3) -> Self {
        Self {
            name: name.into(),
            parent: None,
            pivot,
            rotation: None,
            cubes: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Sets the parent bone name.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Sets the Euler rotation (degrees).
    pub fn with_rotation(mut self, degrees: Vec3) -> Self {
        self.rotation = Some(degrees);
        self
    }

    /// Appends a cube.
    pub fn with_cube(mut self, cube: Cube) -> Self {
        self.cubes.push(cube);
        self
    }

    /// Appends an attachment point.
    pub fn with_attachment(mut self, name: impl Into<String>, position: Vec3) -> Self {
        self.attachments.push(Attachment {
            name: name.into(),
            position,
        });
        self
    }

    /// Rotation in degrees, zero when absent.
    pub fn rotation_or_zero(&self) -> Vec3 {
        self.rotation.unwrap_or(Vec3::ZERO)
    }

    /// Returns `true` for bones without a parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
