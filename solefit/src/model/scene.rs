//! Scene-graph data handed to the external renderer.
//!
//! The core does not render; it produces a tree of [`SceneNode`]s carrying
//! mesh geometry, materials, and transforms, and the presentation layer
//! feeds that to whatever 3D engine it embeds. Yaw is the only rotation the
//! try-on pipeline ever produces, so transforms carry a single yaw angle
//! rather than a full orientation.

/// Position, yaw rotation, and scale of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: [f32; 3],
    /// Rotation about the vertical axis, radians.
    pub yaw: f32,
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            yaw: 0.0,
            scale: [1.0; 3],
        }
    }
}

/// Surface appearance of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Linear RGBA base color.
    pub base_color: [f32; 4],
    /// Index of the base color texture in the source document, if any.
    pub texture: Option<u32>,
    /// Render with a cheap diffuse-only shading model.
    pub lambert: bool,
    /// Alpha blending requested.
    pub transparent: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            texture: None,
            lambert: false,
            transparent: false,
        }
    }
}

impl Material {
    /// Opaque lambert material with the given color.
    pub fn lambert(base_color: [f32; 4]) -> Self {
        Self {
            base_color,
            lambert: true,
            ..Self::default()
        }
    }
}

/// Triangle geometry plus its material and shadow flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    /// Triangle indices; unindexed meshes list vertices three per triangle.
    pub indices: Option<Vec<u32>>,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    /// Create a mesh with default material and shadows off.
    pub fn new(positions: Vec<[f32; 3]>, indices: Option<Vec<u32>>) -> Self {
        Self {
            positions,
            indices,
            material: Material::default(),
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    /// Triangle count: indexed count / 3 where indices exist, else vertex
    /// count / 3.
    pub fn triangle_count(&self) -> u64 {
        match &self.indices {
            Some(indices) => indices.len() as u64 / 3,
            None => self.positions.len() as u64 / 3,
        }
    }
}

/// One node of the scene tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<Mesh>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Empty group node.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Leaf node carrying a mesh.
    pub fn with_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            mesh: Some(mesh),
            ..Self::default()
        }
    }

    /// Sum of triangle counts over this node and all descendants.
    pub fn triangle_count(&self) -> u64 {
        let own = self.mesh.as_ref().map_or(0, Mesh::triangle_count);
        own + self.children.iter().map(SceneNode::triangle_count).sum::<u64>()
    }

    /// Apply `f` to every mesh in the tree.
    pub fn for_each_mesh_mut(&mut self, f: &mut impl FnMut(&mut Mesh)) {
        if let Some(mesh) = &mut self.mesh {
            f(mesh);
        }
        for child in &mut self.children {
            child.for_each_mesh_mut(f);
        }
    }

    /// Bounding volume of the tree with node translations and scales
    /// applied. Yaw is placement-time state and is not baked into bounds.
    pub fn aabb(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        self.grow_aabb([0.0; 3], [1.0; 3], &mut bounds);
        bounds
    }

    fn grow_aabb(&self, offset: [f32; 3], scale: [f32; 3], bounds: &mut Aabb) {
        // Compose scale-then-translate transforms top-down:
        // world(p) = offset + scale * (t + s * p).
        let offset = [
            offset[0] + scale[0] * self.transform.translation[0],
            offset[1] + scale[1] * self.transform.translation[1],
            offset[2] + scale[2] * self.transform.translation[2],
        ];
        let scale = [
            scale[0] * self.transform.scale[0],
            scale[1] * self.transform.scale[1],
            scale[2] * self.transform.scale[2],
        ];
        if let Some(mesh) = &self.mesh {
            for p in &mesh.positions {
                bounds.grow([
                    offset[0] + p[0] * scale[0],
                    offset[1] + p[1] * scale[1],
                    offset[2] + p[2] * scale[2],
                ]);
            }
        }
        for child in &self.children {
            child.grow_aabb(offset, scale, bounds);
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Aabb {
    /// The inverted box that grows to fit the first point.
    pub fn empty() -> Self {
        Self {
            min: [f32::INFINITY; 3],
            max: [f32::NEG_INFINITY; 3],
        }
    }

    /// Whether no point has been added.
    pub fn is_empty(&self) -> bool {
        self.min[0] > self.max[0]
    }

    /// Expand to include `point`.
    pub fn grow(&mut self, point: [f32; 3]) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(point[axis]);
            self.max[axis] = self.max[axis].max(point[axis]);
        }
    }

    /// Box dimensions, zero when empty.
    pub fn size(&self) -> [f32; 3] {
        if self.is_empty() {
            return [0.0; 3];
        }
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Vec<[f32; 3]> {
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
    }

    #[test]
    fn test_indexed_triangle_count() {
        // 300 indices -> 100 triangles regardless of vertex count.
        let mesh = Mesh::new(unit_triangle(), Some((0..300).map(|i| i % 3).collect()));
        assert_eq!(mesh.triangle_count(), 100);
    }

    #[test]
    fn test_unindexed_triangle_count() {
        // 300 vertices without indices -> 100 triangles.
        let positions = (0..300).map(|_| [0.0, 0.0, 0.0]).collect();
        let mesh = Mesh::new(positions, None);
        assert_eq!(mesh.triangle_count(), 100);
    }

    #[test]
    fn test_tree_triangle_count_sums_children() {
        let mut root = SceneNode::group("root");
        root.children.push(SceneNode::with_mesh("a", Mesh::new(unit_triangle(), None)));
        root.children.push(SceneNode::with_mesh("b", Mesh::new(unit_triangle(), None)));
        assert_eq!(root.triangle_count(), 2);
    }

    #[test]
    fn test_aabb_covers_translated_child() {
        let mut child = SceneNode::with_mesh("c", Mesh::new(unit_triangle(), None));
        child.transform.translation = [2.0, 0.0, 0.0];
        let mut root = SceneNode::group("root");
        root.children.push(child);

        let bounds = root.aabb();
        assert!((bounds.min[0] - 2.0).abs() < 1e-6);
        assert!((bounds.max[0] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_aabb_scales_with_root() {
        let mut root = SceneNode::with_mesh("m", Mesh::new(unit_triangle(), None));
        root.transform.scale = [2.0; 3];
        let bounds = root.aabb();
        assert!((bounds.max[0] - 2.0).abs() < 1e-6);
        assert_eq!(bounds.size()[2], 0.0);
    }

    #[test]
    fn test_empty_aabb() {
        let bounds = SceneNode::group("empty").aabb();
        assert!(bounds.is_empty());
        assert_eq!(bounds.size(), [0.0; 3]);
    }

    #[test]
    fn test_for_each_mesh_mut_visits_all() {
        let mut root = SceneNode::group("root");
        root.children.push(SceneNode::with_mesh("a", Mesh::new(unit_triangle(), None)));
        root.children.push(SceneNode::with_mesh("b", Mesh::new(unit_triangle(), None)));
        let mut seen = 0;
        root.for_each_mesh_mut(&mut |mesh| {
            mesh.cast_shadow = true;
            seen += 1;
        });
        assert_eq!(seen, 2);
        assert!(root.children[0].mesh.as_ref().unwrap().cast_shadow);
    }
}
