//! Minimal binary glTF (GLB v2) reader.
//!
//! Reads exactly what the try-on pipeline needs from a `.glb` container:
//! node hierarchy, triangle meshes (positions and indices), and base-color
//! materials. Everything else in the format - animation, skinning, texture
//! images, extensions - is ignored. Malformed containers produce typed
//! errors which the cache converts into a fallback entry.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use super::scene::{Material, Mesh, SceneNode, Transform};

/// `glTF` in little-endian ASCII.
const GLB_MAGIC: u32 = 0x4654_6C67;
/// The only container version this reader understands.
const GLB_VERSION: u32 = 2;
/// `JSON` chunk tag.
const CHUNK_JSON: u32 = 0x4E4F_534A;
/// `BIN\0` chunk tag.
const CHUNK_BIN: u32 = 0x004E_4942;

/// Node nesting bound; a document deeper than this is treated as malformed.
const MAX_DEPTH: usize = 64;

// glTF accessor component types.
const COMPONENT_U8: u32 = 5121;
const COMPONENT_U16: u32 = 5123;
const COMPONENT_U32: u32 = 5125;
const COMPONENT_F32: u32 = 5126;

/// Errors from GLB container or document reading.
#[derive(Debug, Error)]
pub enum GltfError {
    #[error("asset too short to be a GLB container: {0} bytes")]
    TooShort(usize),

    #[error("bad GLB magic {0:#010x}")]
    BadMagic(u32),

    #[error("unsupported GLB version {0}")]
    UnsupportedVersion(u32),

    #[error("declared container length {declared} exceeds actual {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("truncated chunk at byte {0}")]
    TruncatedChunk(usize),

    #[error("container has no JSON chunk")]
    MissingJson,

    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{kind} index {index} out of range")]
    BadIndex { kind: &'static str, index: usize },

    #[error("accessor {index}: {what} not supported")]
    Unsupported { index: usize, what: String },

    #[error("accessor {0} reads outside the binary chunk")]
    OutOfRange(usize),

    #[error("mesh primitive without POSITION attribute")]
    MissingPositions,

    #[error("node hierarchy deeper than {MAX_DEPTH} levels")]
    TooDeep,
}

/// A GLB container split into its chunks, borrowing the input bytes.
#[derive(Debug)]
pub struct Glb<'a> {
    pub json: &'a [u8],
    pub bin: Option<&'a [u8]>,
}

impl<'a> Glb<'a> {
    /// Validate the header and split the container into chunks.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, GltfError> {
        if bytes.len() < 12 {
            return Err(GltfError::TooShort(bytes.len()));
        }
        let magic = u32_at(bytes, 0);
        if magic != GLB_MAGIC {
            return Err(GltfError::BadMagic(magic));
        }
        let version = u32_at(bytes, 4);
        if version != GLB_VERSION {
            return Err(GltfError::UnsupportedVersion(version));
        }
        let declared = u32_at(bytes, 8) as usize;
        if declared > bytes.len() {
            return Err(GltfError::LengthMismatch {
                declared,
                actual: bytes.len(),
            });
        }

        let mut json = None;
        let mut bin = None;
        let mut offset = 12;
        while offset + 8 <= declared {
            let length = u32_at(bytes, offset) as usize;
            let tag = u32_at(bytes, offset + 4);
            let start = offset + 8;
            let end = start.checked_add(length).ok_or(GltfError::TruncatedChunk(offset))?;
            if end > declared {
                return Err(GltfError::TruncatedChunk(offset));
            }
            match tag {
                CHUNK_JSON if json.is_none() => json = Some(&bytes[start..end]),
                CHUNK_BIN if bin.is_none() => bin = Some(&bytes[start..end]),
                // Unknown chunk types are skipped, as the GLB format allows.
                _ => {}
            }
            offset = end;
        }

        let json = json.ok_or(GltfError::MissingJson)?;
        Ok(Self { json, bin })
    }
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

// Document structures, limited to the fields the reader consumes.

#[derive(Debug, Default, Deserialize)]
struct Document {
    scene: Option<usize>,
    #[serde(default)]
    scenes: Vec<DocScene>,
    #[serde(default)]
    nodes: Vec<DocNode>,
    #[serde(default)]
    meshes: Vec<DocMesh>,
    #[serde(default)]
    accessors: Vec<DocAccessor>,
    #[serde(default, rename = "bufferViews")]
    buffer_views: Vec<DocBufferView>,
    #[serde(default)]
    materials: Vec<DocMaterial>,
}

#[derive(Debug, Default, Deserialize)]
struct DocScene {
    #[serde(default)]
    nodes: Vec<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct DocNode {
    name: Option<String>,
    mesh: Option<usize>,
    #[serde(default)]
    children: Vec<usize>,
    translation: Option<[f32; 3]>,
    scale: Option<[f32; 3]>,
}

#[derive(Debug, Default, Deserialize)]
struct DocMesh {
    name: Option<String>,
    #[serde(default)]
    primitives: Vec<DocPrimitive>,
}

#[derive(Debug, Default, Deserialize)]
struct DocPrimitive {
    #[serde(default)]
    attributes: HashMap<String, usize>,
    indices: Option<usize>,
    material: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct DocAccessor {
    #[serde(rename = "bufferView")]
    buffer_view: Option<usize>,
    #[serde(default, rename = "byteOffset")]
    byte_offset: usize,
    #[serde(rename = "componentType")]
    component_type: u32,
    count: usize,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Default, Deserialize)]
struct DocBufferView {
    #[serde(default, rename = "byteOffset")]
    byte_offset: usize,
    #[serde(rename = "byteLength")]
    byte_length: usize,
    #[serde(rename = "byteStride")]
    byte_stride: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct DocMaterial {
    #[serde(rename = "pbrMetallicRoughness")]
    pbr: Option<DocPbr>,
    #[serde(rename = "alphaMode")]
    alpha_mode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DocPbr {
    #[serde(rename = "baseColorFactor")]
    base_color_factor: Option<[f32; 4]>,
    #[serde(rename = "baseColorTexture")]
    base_color_texture: Option<DocTextureRef>,
}

#[derive(Debug, Default, Deserialize)]
struct DocTextureRef {
    index: u32,
}

/// Read a GLB container into a scene tree.
///
/// The returned root is a group node holding the document's default scene
/// roots as children.
pub fn read_scene(bytes: &[u8]) -> Result<SceneNode, GltfError> {
    let glb = Glb::parse(bytes)?;
    let doc: Document = serde_json::from_slice(glb.json)?;
    let bin = glb.bin.unwrap_or(&[]);

    let scene_index = doc.scene.unwrap_or(0);
    let roots: &[usize] = match doc.scenes.get(scene_index) {
        Some(scene) => &scene.nodes,
        // A document without scenes renders nothing; only an explicit
        // reference to a missing scene is malformed.
        None if doc.scenes.is_empty() => &[],
        None => {
            return Err(GltfError::BadIndex {
                kind: "scene",
                index: scene_index,
            })
        }
    };

    let mut root = SceneNode::group("scene");
    for &index in roots {
        root.children.push(build_node(&doc, bin, index, 0)?);
    }
    Ok(root)
}

fn build_node(
    doc: &Document,
    bin: &[u8],
    index: usize,
    depth: usize,
) -> Result<SceneNode, GltfError> {
    if depth >= MAX_DEPTH {
        return Err(GltfError::TooDeep);
    }
    let node = doc.nodes.get(index).ok_or(GltfError::BadIndex {
        kind: "node",
        index,
    })?;

    let mut out = SceneNode::group(
        node.name
            .clone()
            .unwrap_or_else(|| format!("node{index}")),
    );
    out.transform = Transform {
        translation: node.translation.unwrap_or([0.0; 3]),
        yaw: 0.0,
        scale: node.scale.unwrap_or([1.0; 3]),
    };

    if let Some(mesh_index) = node.mesh {
        let mesh = doc.meshes.get(mesh_index).ok_or(GltfError::BadIndex {
            kind: "mesh",
            index: mesh_index,
        })?;
        let mut meshes = Vec::with_capacity(mesh.primitives.len());
        for primitive in &mesh.primitives {
            meshes.push(build_primitive(doc, bin, primitive)?);
        }
        if meshes.len() == 1 {
            out.mesh = meshes.pop();
        } else {
            let base = mesh.name.clone().unwrap_or_else(|| format!("mesh{mesh_index}"));
            for (i, m) in meshes.into_iter().enumerate() {
                out.children.push(SceneNode::with_mesh(format!("{base}.{i}"), m));
            }
        }
    }

    for &child in &node.children {
        out.children.push(build_node(doc, bin, child, depth + 1)?);
    }
    Ok(out)
}

fn build_primitive(
    doc: &Document,
    bin: &[u8],
    primitive: &DocPrimitive,
) -> Result<Mesh, GltfError> {
    let position_accessor = *primitive
        .attributes
        .get("POSITION")
        .ok_or(GltfError::MissingPositions)?;
    let positions = read_positions(doc, bin, position_accessor)?;

    let indices = match primitive.indices {
        Some(accessor) => Some(read_indices(doc, bin, accessor)?),
        None => None,
    };

    let mut mesh = Mesh::new(positions, indices);
    if let Some(material_index) = primitive.material {
        let material = doc.materials.get(material_index).ok_or(GltfError::BadIndex {
            kind: "material",
            index: material_index,
        })?;
        mesh.material = Material {
            base_color: material
                .pbr
                .as_ref()
                .and_then(|pbr| pbr.base_color_factor)
                .unwrap_or([1.0, 1.0, 1.0, 1.0]),
            texture: material
                .pbr
                .as_ref()
                .and_then(|pbr| pbr.base_color_texture.as_ref())
                .map(|t| t.index),
            lambert: false,
            transparent: material.alpha_mode.as_deref() == Some("BLEND"),
        };
    }
    Ok(mesh)
}

fn accessor_view<'a>(
    doc: &'a Document,
    bin: &'a [u8],
    index: usize,
) -> Result<(&'a [u8], &'a DocAccessor, Option<usize>), GltfError> {
    let accessor = doc.accessors.get(index).ok_or(GltfError::BadIndex {
        kind: "accessor",
        index,
    })?;
    let view_index = accessor.buffer_view.ok_or_else(|| GltfError::Unsupported {
        index,
        what: "sparse accessor".to_string(),
    })?;
    let view = doc.buffer_views.get(view_index).ok_or(GltfError::BadIndex {
        kind: "bufferView",
        index: view_index,
    })?;
    let end = view
        .byte_offset
        .checked_add(view.byte_length)
        .ok_or(GltfError::OutOfRange(index))?;
    let data = bin.get(view.byte_offset..end).ok_or(GltfError::OutOfRange(index))?;
    Ok((data, accessor, view.byte_stride))
}

fn read_positions(doc: &Document, bin: &[u8], index: usize) -> Result<Vec<[f32; 3]>, GltfError> {
    let (data, accessor, stride) = accessor_view(doc, bin, index)?;
    if accessor.kind != "VEC3" || accessor.component_type != COMPONENT_F32 {
        return Err(GltfError::Unsupported {
            index,
            what: format!("{} of component {}", accessor.kind, accessor.component_type),
        });
    }
    let stride = stride.unwrap_or(12);
    let mut positions = Vec::with_capacity(accessor.count);
    for i in 0usize..accessor.count {
        let at = accessor
            .byte_offset
            .checked_add(i.checked_mul(stride).ok_or(GltfError::OutOfRange(index))?)
            .ok_or(GltfError::OutOfRange(index))?;
        let slice = data.get(at..at + 12).ok_or(GltfError::OutOfRange(index))?;
        positions.push([
            f32_le(&slice[0..4]),
            f32_le(&slice[4..8]),
            f32_le(&slice[8..12]),
        ]);
    }
    Ok(positions)
}

fn read_indices(doc: &Document, bin: &[u8], index: usize) -> Result<Vec<u32>, GltfError> {
    let (data, accessor, stride) = accessor_view(doc, bin, index)?;
    if accessor.kind != "SCALAR" {
        return Err(GltfError::Unsupported {
            index,
            what: format!("index type {}", accessor.kind),
        });
    }
    let width = match accessor.component_type {
        COMPONENT_U8 => 1,
        COMPONENT_U16 => 2,
        COMPONENT_U32 => 4,
        other => {
            return Err(GltfError::Unsupported {
                index,
                what: format!("index component {other}"),
            })
        }
    };
    let stride = stride.unwrap_or(width);
    let mut indices = Vec::with_capacity(accessor.count);
    for i in 0usize..accessor.count {
        let at = accessor
            .byte_offset
            .checked_add(i.checked_mul(stride).ok_or(GltfError::OutOfRange(index))?)
            .ok_or(GltfError::OutOfRange(index))?;
        let slice = data.get(at..at + width).ok_or(GltfError::OutOfRange(index))?;
        let value = match width {
            1 => u32::from(slice[0]),
            2 => u32::from(u16::from_le_bytes([slice[0], slice[1]])),
            _ => u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]),
        };
        indices.push(value);
    }
    Ok(indices)
}

fn f32_le(bytes: &[u8]) -> f32 {
    f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assemble a GLB container from a JSON document and a binary chunk.
    fn glb(json: &serde_json::Value, bin: &[u8]) -> Vec<u8> {
        let mut json_bytes = serde_json::to_vec(json).unwrap();
        while json_bytes.len() % 4 != 0 {
            json_bytes.push(b' ');
        }
        let mut bin_bytes = bin.to_vec();
        while bin_bytes.len() % 4 != 0 {
            bin_bytes.push(0);
        }

        let total = 12 + 8 + json_bytes.len() + if bin.is_empty() { 0 } else { 8 + bin_bytes.len() };
        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
        out.extend_from_slice(&GLB_VERSION.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        out.extend_from_slice(&json_bytes);
        if !bin.is_empty() {
            out.extend_from_slice(&(bin_bytes.len() as u32).to_le_bytes());
            out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
            out.extend_from_slice(&bin_bytes);
        }
        out
    }

    /// One indexed triangle: 3 positions, 3 u16 indices.
    fn triangle_glb() -> Vec<u8> {
        let mut bin = Vec::new();
        for p in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
            for c in p {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        let index_offset = bin.len();
        for i in [0u16, 1, 2] {
            bin.extend_from_slice(&i.to_le_bytes());
        }

        let json = serde_json::json!({
            "asset": {"version": "2.0"},
            "scene": 0,
            "scenes": [{"nodes": [0]}],
            "nodes": [{"name": "shoe", "mesh": 0, "translation": [0.0, 1.0, 0.0]}],
            "meshes": [{"primitives": [{
                "attributes": {"POSITION": 0},
                "indices": 1,
                "material": 0
            }]}],
            "materials": [{"pbrMetallicRoughness": {"baseColorFactor": [0.8, 0.2, 0.1, 1.0]}}],
            "accessors": [
                {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"},
                {"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}
            ],
            "bufferViews": [
                {"buffer": 0, "byteOffset": 0, "byteLength": 36},
                {"buffer": 0, "byteOffset": index_offset, "byteLength": 6}
            ],
            "buffers": [{"byteLength": 42}]
        });
        glb(&json, &bin)
    }

    #[test]
    fn test_reads_indexed_triangle() {
        let scene = read_scene(&triangle_glb()).unwrap();
        assert_eq!(scene.children.len(), 1);
        let node = &scene.children[0];
        assert_eq!(node.name, "shoe");
        assert_eq!(node.transform.translation, [0.0, 1.0, 0.0]);
        let mesh = node.mesh.as_ref().unwrap();
        assert_eq!(mesh.positions.len(), 3);
        assert_eq!(mesh.indices.as_deref(), Some(&[0u32, 1, 2][..]));
        assert_eq!(mesh.material.base_color, [0.8, 0.2, 0.1, 1.0]);
        assert_eq!(scene.triangle_count(), 1);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = triangle_glb();
        bytes[0] = b'X';
        assert!(matches!(read_scene(&bytes), Err(GltfError::BadMagic(_))));
    }

    #[test]
    fn test_rejects_wrong_version() {
        let mut bytes = triangle_glb();
        bytes[4] = 1;
        assert!(matches!(
            read_scene(&bytes),
            Err(GltfError::UnsupportedVersion(1))
        ));
    }

    #[test]
    fn test_rejects_truncated_container() {
        let bytes = triangle_glb();
        assert!(read_scene(&bytes[..bytes.len() - 10]).is_err());
        assert!(matches!(read_scene(&bytes[..8]), Err(GltfError::TooShort(8))));
    }

    #[test]
    fn test_rejects_missing_json_chunk() {
        let mut out = Vec::new();
        out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
        out.extend_from_slice(&GLB_VERSION.to_le_bytes());
        out.extend_from_slice(&12u32.to_le_bytes());
        assert!(matches!(read_scene(&out), Err(GltfError::MissingJson)));
    }

    #[test]
    fn test_rejects_accessor_past_bin_end() {
        let json = serde_json::json!({
            "scenes": [{"nodes": [0]}],
            "nodes": [{"mesh": 0}],
            "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
            "accessors": [{"bufferView": 0, "componentType": 5126, "count": 100, "type": "VEC3"}],
            "bufferViews": [{"buffer": 0, "byteOffset": 0, "byteLength": 1200}]
        });
        let bytes = glb(&json, &[0u8; 16]);
        assert!(matches!(read_scene(&bytes), Err(GltfError::OutOfRange(0))));
    }

    #[test]
    fn test_rejects_primitive_without_positions() {
        let json = serde_json::json!({
            "scenes": [{"nodes": [0]}],
            "nodes": [{"mesh": 0}],
            "meshes": [{"primitives": [{"attributes": {}}]}],
        });
        let bytes = glb(&json, &[]);
        assert!(matches!(read_scene(&bytes), Err(GltfError::MissingPositions)));
    }

    #[test]
    fn test_empty_document_yields_empty_scene() {
        let bytes = glb(&serde_json::json!({"asset": {"version": "2.0"}}), &[]);
        let scene = read_scene(&bytes).unwrap();
        assert!(scene.children.is_empty());
        assert_eq!(scene.triangle_count(), 0);
    }
}
