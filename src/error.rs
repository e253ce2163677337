//! Error types for the asset-loading boundary.

use std::path::PathBuf;

/// Errors produced while loading textures and models from disk.
///
/// Decode failures are reported distinctly from missing files so callers
/// can decide whether to substitute a placeholder or abort.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to parse OBJ file {path}: {source}")]
    ObjParse {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("{path} has {channels} channels, expected 1, 3 or 4")]
    UnsupportedChannelCount { path: PathBuf, channels: u8 },
}
