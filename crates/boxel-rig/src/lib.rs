//! Conversion between the absolute-pivot bone tree and the parent-relative node
//! tree used by the engine interchange format.
//!
//! Positions are re-based by tree traversal (parent before child) and rotations
//! move between Euler degrees and unit quaternions through one explicit
//! [`RotationOrder`] that every call site passes along.

mod error;
mod export;
mod import;
mod node;
mod rotation;

pub use error::RigError;
pub use export::{ExportOptions, export_node_tree};
pub use import::{ImportOptions, import_node_tree};
pub use node::{
    FaceLayout, FlatNode, MirrorFlags, Node, NodeRole, NodeTree, Offset, Quaternion, Shape,
    ShapeKind, ShapeSettings, TextureLayout, Vector3,
};
pub use rotation::{ROTATION_ORDER, RotationOrder, euler_to_quat, quat_to_euler};
