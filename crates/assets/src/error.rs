use thiserror::Error;

/// Errors emitted while loading a scene asset.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Wrap IO errors when reading the asset or its buffers.
    #[error("failed to read asset: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap glTF parsing and validation issues.
    #[error("failed to parse glTF: {0}")]
    Gltf(#[from] gltf::Error),
    /// The load was cancelled before it finished.
    #[error("asset load cancelled")]
    Cancelled,
    /// The loader thread went away without reporting a result.
    #[error("asset loader disconnected")]
    Disconnected,
}
