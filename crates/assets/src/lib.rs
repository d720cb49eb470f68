#![warn(missing_docs)]
//! glTF import and background asset loading.

mod error;
mod import;
mod task;

pub use error::AssetError;
pub use import::import_gltf;
pub use task::{
    AssetLoader, LoadEvent, LoadHandle, LoadProgress, LoadedAsset, DEFAULT_CHUNK_SIZE,
};
