//! Error type of the `boxel` binary.

use std::path::PathBuf;

use boxel_atlas::AtlasError;
use boxel_model::ModelError;
use boxel_rig::RigError;
use thiserror::Error;

/// Failures surfaced by the `boxel` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading or writing a file failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing to stdout failed.
    #[error("failed to write output: {0}")]
    Stdout(#[source] std::io::Error),

    /// The model file is malformed or structurally invalid.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Packing or guide rendering failed.
    #[error(transparent)]
    Atlas(#[from] AtlasError),

    /// The node tree could not be converted.
    #[error(transparent)]
    Rig(#[from] RigError),

    /// Flat node records are not valid JSON.
    #[error("invalid node records: {0}")]
    Json(#[from] serde_json::Error),

    /// The atlas image could not be inspected.
    #[error("{}: {source}", path.display())]
    Image {
        /// The image file.
        path: PathBuf,
        /// The decoder error.
        #[source]
        source: image::ImageError,
    },

    /// A target atlas size was zero or missing.
    #[error("invalid atlas size: {0}")]
    InvalidSize(String),
}
