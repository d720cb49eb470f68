//! glTF document to scene fragment conversion.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use glam::{Quat, Vec3};
use gltf::mesh::Mode;
use sceneview_core::{Color, Geometry, Material, Node, NodeId, Scene, Surface, Transform};
use tracing::{debug, warn};

use crate::AssetError;

/// Parse `.gltf` or `.glb` bytes into a scene fragment.
///
/// The fragment's root is an empty node named `"model"` holding the
/// document's default scene (or its first scene). External buffers are
/// resolved against `base_dir`.
pub fn import_gltf(bytes: &[u8], base_dir: Option<&Path>) -> Result<Scene, AssetError> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)?;
    let buffers = gltf::import_buffers(&document, base_dir, blob)?;

    let mut scene = Scene::with_root(Node::new("model"));
    let Some(source) = document.default_scene().or_else(|| document.scenes().next()) else {
        warn!("glTF document has no scenes");
        return Ok(scene);
    };

    let mut importer = Importer {
        buffers: &buffers,
        geometry: HashMap::new(),
    };
    let mut stack: Vec<(gltf::Node<'_>, NodeId)> =
        source.nodes().map(|node| (node, scene.root())).collect();
    stack.reverse();

    while let Some((node, parent)) = stack.pop() {
        let Some(id) = importer.add_node(&mut scene, parent, &node) else {
            continue;
        };
        let children: Vec<_> = node.children().collect();
        stack.extend(children.into_iter().rev().map(|child| (child, id)));
    }

    debug!(
        nodes = scene.node_count(),
        surfaces = scene.surface_count(),
        "Imported glTF scene"
    );
    Ok(scene)
}

struct Importer<'a> {
    buffers: &'a [gltf::buffer::Data],
    geometry: HashMap<(usize, usize), Arc<Geometry>>,
}

impl Importer<'_> {
    fn add_node(&mut self, scene: &mut Scene, parent: NodeId, node: &gltf::Node<'_>) -> Option<NodeId> {
        let (t, r, s) = node.transform().decomposed();
        let transform = Transform::from_trs(Vec3::from(t), Quat::from_array(r), Vec3::from(s));
        let name = node
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("node{}", node.index()));

        let mut surfaces = Vec::new();
        if let Some(mesh) = node.mesh() {
            for primitive in mesh.primitives() {
                if let Some(surface) = self.surface(mesh.index(), &primitive) {
                    surfaces.push(surface);
                }
            }
        }

        let mut base = Node::new(name.clone()).with_transform(transform);
        if surfaces.len() == 1 {
            base = base.with_surface(surfaces.remove(0));
        }
        let id = scene.add_child(parent, base)?;

        for (i, surface) in surfaces.into_iter().enumerate() {
            scene.add_child(id, Node::new(format!("{name}.{i}")).with_surface(surface))?;
        }
        Some(id)
    }

    fn surface(&mut self, mesh: usize, primitive: &gltf::Primitive<'_>) -> Option<Surface> {
        if primitive.mode() != Mode::Triangles {
            warn!(mesh, primitive = primitive.index(), mode = ?primitive.mode(), "Skipping non-triangle primitive");
            return None;
        }

        let key = (mesh, primitive.index());
        let geometry = match self.geometry.get(&key) {
            Some(geometry) => geometry.clone(),
            None => {
                let geometry = Arc::new(self.read_geometry(primitive)?);
                self.geometry.insert(key, geometry.clone());
                geometry
            }
        };

        let material = primitive.material();
        let [r, g, b, _] = material.pbr_metallic_roughness().base_color_factor();
        Some(Surface::new(
            geometry,
            Material {
                color: Color::from_linear(r, g, b),
                wireframe: false,
                double_sided: material.double_sided(),
            },
        ))
    }

    fn read_geometry(&self, primitive: &gltf::Primitive<'_>) -> Option<Geometry> {
        let reader = primitive.reader(|buffer| self.buffers.get(buffer.index()).map(|d| d.0.as_slice()));

        let positions: Vec<Vec3> = reader
            .read_positions()
            .map(|iter| iter.map(Vec3::from).collect())
            .unwrap_or_default();
        if positions.is_empty() {
            warn!(primitive = primitive.index(), "Skipping primitive without positions");
            return None;
        }
        let normals = reader
            .read_normals()
            .map(|iter| iter.map(Vec3::from).collect());
        let indices = reader
            .read_indices()
            .map(|iter| iter.into_u32().collect())
            .unwrap_or_default();

        Some(Geometry::new(positions, normals, indices))
    }
}
