//! Model cache and loader.
//!
//! Binary glTF shoe assets are fetched over HTTP, validated, post-processed,
//! and cached by identifier. The cache de-duplicates concurrent loads of the
//! same identifier and substitutes a procedural fallback shoe when a load
//! fails - load failure is never surfaced to the caller.
//!
//! # Architecture
//!
//! ```text
//! ModelCache ──► AssetFetcher (HEAD probe + GET) ──► glb reader ──► post-process
//!      │                                                               │
//!      └── per-id load slots (in-flight de-duplication) ◄── ModelEntry ┘
//! ```

mod cache;
mod entry;
mod fallback;
mod fetch;
pub mod gltf;
mod process;
pub mod scene;

pub use cache::{ModelCache, ModelCacheConfig, DEFAULT_MAX_ASSET_BYTES};
pub use entry::{LoadState, ModelEntry, ModelId, ModelInfo};
pub use fallback::fallback_scene;
pub use fetch::{
    AssetFetcher, AssetProbe, BoxFuture, FetchError, HttpAssetFetcher, DEFAULT_FETCH_TIMEOUT,
};
pub use process::{DEFAULT_POSITION, DEFAULT_SCALE};

use thiserror::Error;

/// Errors internal to a single load attempt.
///
/// These never escape [`ModelCache::load`] - every variant resolves to the
/// fallback entry - but they are logged and visible to code driving the
/// loader directly.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The existence probe said the asset is not there.
    #[error("model asset not found: {0}")]
    NotFound(String),

    /// Transport-level fetch failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The fetched bytes are not a usable binary glTF asset.
    #[error(transparent)]
    Gltf(#[from] gltf::GltfError),
}
