//! Cache entry types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scene::{Aabb, SceneNode};

/// Identifier of a model asset.
///
/// Maps to the asset path `models/<id>.glb` on the asset host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModelId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ModelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Per-identifier load state.
///
/// The cache enforces at most one in-flight load per identifier; this is
/// the observable face of that state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Never requested.
    NotRequested,
    /// A load is in flight; concurrent callers share its result.
    Loading,
    /// Loaded from the real asset.
    Loaded,
    /// The load failed and the fallback geometry was substituted.
    Fallback,
}

/// One loaded asset.
///
/// Owned by the cache (`Arc`-shared); the presentation layer takes a
/// reference while the cache retains the entry for reuse.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEntry {
    pub id: ModelId,
    /// Root of the scene-graph instance handed to the renderer.
    pub scene: SceneNode,
    /// Triangles summed over all sub-meshes.
    pub triangle_count: u64,
    /// Bounding volume of the processed scene.
    pub bounds: Aabb,
    /// When the load resolved.
    pub loaded_at: DateTime<Utc>,
    /// Whether this entry is the synthetic fallback geometry.
    pub is_fallback: bool,
}

impl ModelEntry {
    /// Summary for reporting surfaces.
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            id: self.id.clone(),
            triangle_count: self.triangle_count,
            bounds: self.bounds,
            loaded_at: self.loaded_at,
            is_fallback: self.is_fallback,
        }
    }
}

/// Summary of a loaded entry, detached from the scene graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub id: ModelId,
    pub triangle_count: u64,
    pub bounds: Aabb,
    pub loaded_at: DateTime<Utc>,
    pub is_fallback: bool,
}

impl fmt::Display for ModelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.bounds.size();
        write!(
            f,
            "model {}: {} triangles, {:.2}x{:.2}x{:.2}{}, loaded {}",
            self.id,
            self.triangle_count,
            size[0],
            size[1],
            size[2],
            if self.is_fallback { " (fallback)" } else { "" },
            self.loaded_at.format("%Y-%m-%d %H:%M:%S UTC"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_id_display_and_from() {
        let id = ModelId::from("42");
        assert_eq!(id.to_string(), "42");
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_info_display_marks_fallback() {
        let entry = ModelEntry {
            id: ModelId::new("1"),
            scene: SceneNode::group("root"),
            triangle_count: 12,
            bounds: Aabb::empty(),
            loaded_at: Utc::now(),
            is_fallback: true,
        };
        let text = entry.info().to_string();
        assert!(text.contains("12 triangles"));
        assert!(text.contains("(fallback)"));
    }
}
