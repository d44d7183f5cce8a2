//! Post-processing applied to every loaded scene.

use chrono::Utc;

use super::entry::{ModelEntry, ModelId};
use super::scene::SceneNode;

/// Uniform scale applied to every shoe model.
pub const DEFAULT_SCALE: f32 = 0.3;

/// Default resting position before tracking takes over.
pub const DEFAULT_POSITION: [f32; 3] = [0.0, -0.5, 0.0];

/// Normalize a freshly read scene into a cache entry.
///
/// Applies the default transform, enables shadow casting/receiving on every
/// mesh, simplifies materials for rendering efficiency, and computes the
/// triangle count and bounding volume.
pub fn finish(id: ModelId, mut scene: SceneNode, is_fallback: bool) -> ModelEntry {
    scene.transform.translation = DEFAULT_POSITION;
    scene.transform.scale = [DEFAULT_SCALE; 3];

    scene.for_each_mesh_mut(&mut |mesh| {
        mesh.cast_shadow = true;
        mesh.receive_shadow = true;
        // Cheap shading, no blending: the try-on overlay never needs either.
        mesh.material.lambert = true;
        mesh.material.transparent = false;
    });

    let triangle_count = scene.triangle_count();
    let bounds = scene.aabb();

    ModelEntry {
        id,
        scene,
        triangle_count,
        bounds,
        loaded_at: Utc::now(),
        is_fallback,
    }
}
