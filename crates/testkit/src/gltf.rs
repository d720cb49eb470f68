//! Minimal glTF 2.0 writer for import tests.
//!
//! Geometry goes into a single binary buffer; the JSON document is built with
//! `serde_json` and written either as `.gltf` + `.bin` or as one `.glb`.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// glTF primitive mode for line lists.
pub const MODE_LINES: u32 = 1;
/// glTF primitive mode for triangle lists.
pub const MODE_TRIANGLES: u32 = 4;

const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;

/// One mesh primitive to encode.
#[derive(Debug, Clone)]
pub struct PrimitiveSpec {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Optional vertex normals.
    pub normals: Option<Vec<[f32; 3]>>,
    /// Optional index list.
    pub indices: Option<Vec<u32>>,
    /// Material index.
    pub material: Option<usize>,
    /// glTF primitive mode.
    pub mode: u32,
}

impl PrimitiveSpec {
    /// Indexed triangle list without normals.
    pub fn triangles(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            normals: None,
            indices: Some(indices),
            material: None,
            mode: MODE_TRIANGLES,
        }
    }

    /// Unit quad in the XY plane facing +Z.
    pub fn quad() -> Self {
        Self::triangles(
            vec![
                [-0.5, -0.5, 0.0],
                [0.5, -0.5, 0.0],
                [0.5, 0.5, 0.0],
                [-0.5, 0.5, 0.0],
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    /// Set the material (builder style).
    pub fn with_material(mut self, material: usize) -> Self {
        self.material = Some(material);
        self
    }

    /// Set the normals (builder style).
    pub fn with_normals(mut self, normals: Vec<[f32; 3]>) -> Self {
        self.normals = Some(normals);
        self
    }
}

/// Accumulates buffers and JSON for a small glTF document.
#[derive(Debug, Default)]
pub struct GltfFixture {
    bin: Vec<u8>,
    buffer_views: Vec<Value>,
    accessors: Vec<Value>,
    materials: Vec<Value>,
    meshes: Vec<Value>,
    nodes: Vec<Value>,
}

impl GltfFixture {
    /// Empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a PBR material with the given linear base color.
    pub fn add_material(&mut self, base_color: [f32; 4], double_sided: bool) -> usize {
        self.materials.push(json!({
            "pbrMetallicRoughness": { "baseColorFactor": base_color },
            "doubleSided": double_sided,
        }));
        self.materials.len() - 1
    }

    /// Add a mesh made of `primitives`; returns the mesh index.
    pub fn add_mesh(&mut self, primitives: &[PrimitiveSpec]) -> usize {
        let encoded: Vec<Value> = primitives.iter().map(|p| self.encode_primitive(p)).collect();
        self.meshes.push(json!({ "primitives": encoded }));
        self.meshes.len() - 1
    }

    /// Add a node; returns the node index.
    pub fn add_node(
        &mut self,
        name: &str,
        mesh: Option<usize>,
        translation: [f32; 3],
        children: &[usize],
    ) -> usize {
        let mut node = json!({ "name": name, "translation": translation });
        if let Some(mesh) = mesh {
            node["mesh"] = json!(mesh);
        }
        if !children.is_empty() {
            node["children"] = json!(children);
        }
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// The JSON document with scene 0 listing `roots`. `uri` names the
    /// external buffer, or `None` for a GLB-embedded buffer.
    pub fn document(&self, roots: &[usize], uri: Option<&str>) -> Value {
        let mut buffer = json!({ "byteLength": self.bin.len() });
        if let Some(uri) = uri {
            buffer["uri"] = json!(uri);
        }
        let mut doc = json!({
            "asset": { "version": "2.0", "generator": "sceneview-testkit" },
            "scene": 0,
            "scenes": [{ "nodes": roots }],
            "nodes": self.nodes,
            "meshes": self.meshes,
            "accessors": self.accessors,
            "bufferViews": self.buffer_views,
            "buffers": [buffer],
        });
        if !self.materials.is_empty() {
            doc["materials"] = json!(self.materials);
        }
        doc
    }

    /// Write `<stem>.gltf` and `<stem>.bin` into `dir`; returns the `.gltf`
    /// path.
    pub fn write_gltf(&self, dir: &Path, stem: &str, roots: &[usize]) -> Result<PathBuf> {
        let bin_name = format!("{stem}.bin");
        let gltf_path = dir.join(format!("{stem}.gltf"));
        fs::write(dir.join(&bin_name), &self.bin)
            .with_context(|| format!("Failed to write {bin_name}"))?;
        let json = serde_json::to_vec_pretty(&self.document(roots, Some(&bin_name)))?;
        fs::write(&gltf_path, json)
            .with_context(|| format!("Failed to write {}", gltf_path.display()))?;
        debug!(path = %gltf_path.display(), bytes = self.bin.len(), "Wrote glTF fixture");
        Ok(gltf_path)
    }

    /// Encode the document as a binary GLB.
    pub fn to_glb(&self, roots: &[usize]) -> Result<Vec<u8>> {
        let mut json = serde_json::to_vec(&self.document(roots, None))?;
        while json.len() % 4 != 0 {
            json.push(b' ');
        }
        let mut bin = self.bin.clone();
        while bin.len() % 4 != 0 {
            bin.push(0);
        }

        let total = 12 + 8 + json.len() + 8 + bin.len();
        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json.len() as u32).to_le_bytes());
        out.extend_from_slice(b"JSON");
        out.extend_from_slice(&json);
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(b"BIN\0");
        out.extend_from_slice(&bin);
        Ok(out)
    }

    fn encode_primitive(&mut self, primitive: &PrimitiveSpec) -> Value {
        let (min, max) = bounds(&primitive.positions);
        let position = self.push_vec3(&primitive.positions, Some((min, max)));

        let mut attributes = json!({ "POSITION": position });
        if let Some(normals) = &primitive.normals {
            attributes["NORMAL"] = json!(self.push_vec3(normals, None));
        }

        let mut encoded = json!({ "attributes": attributes, "mode": primitive.mode });
        if let Some(indices) = &primitive.indices {
            encoded["indices"] = json!(self.push_indices(indices));
        }
        if let Some(material) = primitive.material {
            encoded["material"] = json!(material);
        }
        encoded
    }

    fn push_view(&mut self, bytes: &[u8]) -> usize {
        let offset = self.bin.len();
        self.bin.extend_from_slice(bytes);
        self.buffer_views.push(json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": bytes.len(),
        }));
        self.buffer_views.len() - 1
    }

    fn push_vec3(&mut self, values: &[[f32; 3]], bounds: Option<([f32; 3], [f32; 3])>) -> usize {
        let bytes: Vec<u8> = values
            .iter()
            .flatten()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let view = self.push_view(&bytes);
        let mut accessor = json!({
            "bufferView": view,
            "componentType": FLOAT,
            "count": values.len(),
            "type": "VEC3",
        });
        if let Some((min, max)) = bounds {
            accessor["min"] = json!(min);
            accessor["max"] = json!(max);
        }
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    fn push_indices(&mut self, indices: &[u32]) -> usize {
        let bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        let view = self.push_view(&bytes);
        self.accessors.push(json!({
            "bufferView": view,
            "componentType": UNSIGNED_INT,
            "count": indices.len(),
            "type": "SCALAR",
        }));
        self.accessors.len() - 1
    }
}

fn bounds(points: &[[f32; 3]]) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for p in points {
        for axis in 0..3 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }
    (min, max)
}
