//! Model error types.

use glam::Vec3;

/// Structural problems that make a model unusable as a whole.
///
/// Any of these rejects the entire operation; no partial output is produced.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Two bones share the same name.
    #[error("duplicate bone name: {0}")]
    DuplicateBone(String),

    /// A bone names a parent that does not exist in the model.
    #[error("bone '{bone}' references missing parent '{parent}'")]
    MissingParent {
        /// The bone carrying the dangling reference.
        bone: String,
        /// The parent name that could not be resolved.
        parent: String,
    },

    /// Following parent links from this bone never reaches a root.
    #[error("bone '{bone}' is part of a cyclic parent chain")]
    CyclicParent {
        /// A bone on the cycle.
        bone: String,
    },

    /// Malformed JSON or a missing required field (`name`, `pivot`, `origin`, `size`).
    #[error("invalid model json: {0}")]
    Json(#[from] serde_json::Error),
}

/// A cube with a zero, negative, non-finite or oversized size component.
///
/// Reported rather than raised: the cube is left out of atlas packing while the
/// rest of the model proceeds.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("cube {cube} of bone '{bone}' has degenerate size {size}")]
pub struct DegenerateCube {
    /// Owning bone name.
    pub bone: String,
    /// Index of the cube within the bone.
    pub cube: usize,
    /// The offending size.
    pub size: Vec3,
}
