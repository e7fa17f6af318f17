//! Rig conversion errors.

use boxel_model::ModelError;

/// Structural problems in either tree. Conversion is all-or-nothing: any of
/// these rejects the whole operation.
#[derive(Debug, thiserror::Error)]
pub enum RigError {
    /// Two nodes share an id.
    #[error("duplicate node id: {0}")]
    DuplicateNodeId(String),

    /// A flat record names a parent id that is not in the node set.
    #[error("node '{node}' references missing parent id '{parent}'")]
    DanglingParent {
        /// The node carrying the reference.
        node: String,
        /// The unresolved parent id.
        parent: String,
    },

    /// Parent links among flat records form a loop.
    #[error("node '{node}' is part of a cyclic parent chain")]
    CyclicNode {
        /// A node on the cycle.
        node: String,
    },

    /// An attachment marker with no bone above it.
    #[error("attachment node '{node}' has no owning bone")]
    OrphanAttachment {
        /// The attachment node id.
        node: String,
    },

    /// A box shape without `settings.size`.
    #[error("box node '{node}' has no size")]
    MissingBoxSize {
        /// The box node id.
        node: String,
    },

    /// A zero-length or non-finite orientation quaternion.
    #[error("node '{node}' has an invalid orientation quaternion")]
    InvalidOrientation {
        /// The node id.
        node: String,
    },

    /// The bone model is structurally invalid.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Malformed node-tree JSON.
    #[error("invalid node json: {0}")]
    Json(#[from] serde_json::Error),
}
