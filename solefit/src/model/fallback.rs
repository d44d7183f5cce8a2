//! Procedural fallback shoe.
//!
//! When a real asset cannot be loaded the cache substitutes this simple
//! placeholder: a sole slab, an upper block, and a rounded toe cap in two
//! shades of brown. The shape is deterministic, so two fallback entries are
//! identical.

use super::scene::{Material, Mesh, SceneNode, Transform};

/// Sole color (saddle brown).
const SOLE_COLOR: [f32; 4] = [0.545, 0.271, 0.075, 1.0];
/// Upper color (dark brown).
const UPPER_COLOR: [f32; 4] = [0.396, 0.263, 0.129, 1.0];

/// Toe cap sphere tessellation.
const TOE_SEGMENTS: u32 = 8;
const TOE_RINGS: u32 = 6;

/// Build the fallback shoe scene.
pub fn fallback_scene() -> SceneNode {
    let mut shoe = SceneNode::group("fallback-shoe");

    let mut sole = SceneNode::with_mesh(
        "sole",
        box_mesh(1.2, 0.1, 0.4, Material::lambert(SOLE_COLOR)),
    );
    sole.transform.translation = [0.0, -0.05, 0.0];
    shoe.children.push(sole);

    let mut upper = SceneNode::with_mesh(
        "upper",
        box_mesh(1.0, 0.3, 0.35, Material::lambert(UPPER_COLOR)),
    );
    upper.transform.translation = [0.0, 0.1, -0.05];
    shoe.children.push(upper);

    let mut toe = SceneNode::with_mesh(
        "toe",
        sphere_mesh(0.2, TOE_SEGMENTS, TOE_RINGS, Material::lambert(SOLE_COLOR)),
    );
    toe.transform = Transform {
        translation: [0.5, 0.05, 0.0],
        yaw: 0.0,
        scale: [1.0, 0.8, 0.8],
    };
    shoe.children.push(toe);

    shoe
}

/// Axis-aligned box centered on the origin.
fn box_mesh(width: f32, height: f32, depth: f32, material: Material) -> Mesh {
    let (hw, hh, hd) = (width / 2.0, height / 2.0, depth / 2.0);
    let positions = vec![
        [-hw, -hh, -hd],
        [hw, -hh, -hd],
        [hw, hh, -hd],
        [-hw, hh, -hd],
        [-hw, -hh, hd],
        [hw, -hh, hd],
        [hw, hh, hd],
        [-hw, hh, hd],
    ];
    // Two triangles per face, outward winding.
    let indices = vec![
        0, 2, 1, 0, 3, 2, // back
        4, 5, 6, 4, 6, 7, // front
        0, 4, 7, 0, 7, 3, // left
        1, 6, 5, 1, 2, 6, // right
        3, 7, 6, 3, 6, 2, // top
        0, 1, 5, 0, 5, 4, // bottom
    ];
    let mut mesh = Mesh::new(positions, Some(indices));
    mesh.material = material;
    mesh
}

/// Latitude/longitude sphere centered on the origin.
fn sphere_mesh(radius: f32, segments: u32, rings: u32, material: Material) -> Mesh {
    let mut positions = Vec::new();
    for ring in 0..=rings {
        let phi = std::f32::consts::PI * ring as f32 / rings as f32;
        for segment in 0..=segments {
            let theta = std::f32::consts::TAU * segment as f32 / segments as f32;
            positions.push([
                radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            ]);
        }
    }

    let stride = segments + 1;
    let mut indices = Vec::new();
    for ring in 0..rings {
        for segment in 0..segments {
            let a = ring * stride + segment;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1]);
            indices.extend_from_slice(&[a + 1, b, b + 1]);
        }
    }

    let mut mesh = Mesh::new(positions, Some(indices));
    mesh.material = material;
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_has_three_parts() {
        let shoe = fallback_scene();
        let names: Vec<&str> = shoe.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["sole", "upper", "toe"]);
    }

    #[test]
    fn test_fallback_is_deterministic() {
        assert_eq!(fallback_scene(), fallback_scene());
    }

    #[test]
    fn test_fallback_triangle_count_is_stable() {
        let shoe = fallback_scene();
        // Two boxes at 12 triangles each plus the tessellated toe cap.
        let toe = 2 * TOE_SEGMENTS as u64 * TOE_RINGS as u64;
        assert_eq!(shoe.triangle_count(), 24 + toe);
        assert!(shoe.triangle_count() > 0);
    }

    #[test]
    fn test_fallback_bounds_cover_the_sole() {
        let bounds = fallback_scene().aabb();
        // The sole is 1.2 wide and the toe pushes past its front edge.
        assert!(bounds.max[0] > 0.6);
        assert!(bounds.min[0] <= -0.6);
        assert!(bounds.min[1] < 0.0);
    }
}
