//! Scene graph: an arena of nodes with local transforms and optional
//! renderable surfaces.

use std::sync::Arc;

use glam::Mat4;

use crate::color::Color;
use crate::geometry::Geometry;
use crate::lights::Lights;
use crate::transform::Transform;

/// Index of a node inside a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Per-surface material state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Display color.
    pub color: Color,
    /// Draw triangle edges instead of filled faces.
    pub wireframe: bool,
    /// Render and pick both faces.
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            wireframe: false,
            double_sided: false,
        }
    }
}

/// Renderable geometry plus its own material.
#[derive(Debug, Clone)]
pub struct Surface {
    /// Shared triangle data.
    pub geometry: Arc<Geometry>,
    /// Material owned by this surface.
    pub material: Material,
}

impl Surface {
    /// Create a surface with the given geometry and material.
    pub fn new(geometry: Arc<Geometry>, material: Material) -> Self {
        Self { geometry, material }
    }
}

/// A scene graph node.
#[derive(Debug, Clone, Default)]
pub struct Node {
    /// Human-readable name (may be empty).
    pub name: String,
    /// Transform relative to the parent.
    pub transform: Transform,
    /// Renderable surface, if any.
    pub surface: Option<Surface>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// A named empty node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Attach a surface (builder style).
    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Set the local transform (builder style).
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Parent node, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Node arena rooted at [`Scene::root`], plus the scene's lights.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<Node>,
    /// Light rig shared by every surface.
    pub lights: Lights,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene with a single empty root node.
    pub fn new() -> Self {
        Self::with_root(Node::new("root"))
    }

    /// Create a scene using `root` as its root node.
    pub fn with_root(mut root: Node) -> Self {
        root.parent = None;
        root.children.clear();
        Self {
            nodes: vec![root],
            lights: Lights::default(),
        }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Look up a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Append `node` as the last child of `parent`.
    ///
    /// Returns `None` if `parent` does not exist.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> Option<NodeId> {
        if parent.0 >= self.nodes.len() {
            return None;
        }
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Some(id)
    }

    /// Graft every node of `other` under `parent`, keeping its hierarchy.
    /// `other`'s lights are discarded.
    ///
    /// Returns the id that `other`'s root received.
    pub fn attach(&mut self, parent: NodeId, other: Scene) -> Option<NodeId> {
        if parent.0 >= self.nodes.len() {
            return None;
        }
        let offset = self.nodes.len();
        let remap = |id: NodeId| NodeId(id.0 + offset);

        for mut node in other.nodes {
            node.parent = Some(node.parent.map_or(parent, remap));
            node.children = node.children.into_iter().map(remap).collect();
            self.nodes.push(node);
        }

        let grafted = NodeId(offset);
        self.nodes[parent.0].children.push(grafted);
        Some(grafted)
    }

    /// Depth-first pre-order traversal starting at `start` (inclusive).
    pub fn descendants(&self, start: NodeId) -> Descendants<'_> {
        let stack = if start.0 < self.nodes.len() {
            vec![start]
        } else {
            Vec::new()
        };
        Descendants { scene: self, stack }
    }

    /// Node ids carrying a surface, in traversal order from the root.
    pub fn surface_ids(&self) -> Vec<NodeId> {
        self.surface_ids_under(self.root())
    }

    /// Node ids carrying a surface within the subtree at `start`.
    pub fn surface_ids_under(&self, start: NodeId) -> Vec<NodeId> {
        self.descendants(start)
            .filter(|id| self.nodes[id.0].surface.is_some())
            .collect()
    }

    /// Number of surfaces in the whole scene.
    pub fn surface_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.surface.is_some()).count()
    }

    /// Surface attached to `id`, if any.
    pub fn surface(&self, id: NodeId) -> Option<&Surface> {
        self.node(id)?.surface.as_ref()
    }

    /// Mutable surface attached to `id`, if any.
    pub fn surface_mut(&mut self, id: NodeId) -> Option<&mut Surface> {
        self.node_mut(id)?.surface.as_mut()
    }

    /// Overwrite a surface's color. Returns false if `id` has no surface.
    pub fn set_surface_color(&mut self, id: NodeId, color: Color) -> bool {
        match self.surface_mut(id) {
            Some(surface) => {
                surface.material.color = color;
                true
            }
            None => false,
        }
    }

    /// Local-to-world matrix of `id`, composed through all ancestors.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut cursor = self.node(id);
        while let Some(node) = cursor {
            matrix = node.transform.matrix() * matrix;
            cursor = node.parent.and_then(|parent| self.node(parent));
        }
        matrix
    }
}

/// Iterator returned by [`Scene::descendants`].
pub struct Descendants<'a> {
    scene: &'a Scene,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        // Push children reversed so the first child is visited first.
        self.stack
            .extend(self.scene.nodes[id.0].children.iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn triangle() -> Arc<Geometry> {
        Arc::new(Geometry::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            None,
            vec![0, 1, 2],
        ))
    }

    fn surface_node(name: &str) -> Node {
        Node::new(name).with_surface(Surface::new(triangle(), Material::default()))
    }

    #[test]
    fn traversal_is_preorder() {
        let mut scene = Scene::new();
        let a = scene.add_child(scene.root(), Node::new("a")).unwrap();
        let a1 = scene.add_child(a, Node::new("a1")).unwrap();
        let b = scene.add_child(scene.root(), Node::new("b")).unwrap();
        let a2 = scene.add_child(a, Node::new("a2")).unwrap();

        let order: Vec<_> = scene.descendants(scene.root()).collect();
        assert_eq!(order, vec![scene.root(), a, a1, a2, b]);
    }

    #[test]
    fn add_child_rejects_unknown_parent() {
        let mut scene = Scene::new();
        assert!(scene.add_child(NodeId(42), Node::new("orphan")).is_none());
    }

    #[test]
    fn world_matrix_composes_ancestors() {
        let mut scene = Scene::new();
        let parent = scene
            .add_child(
                scene.root(),
                Node::new("parent").with_transform(Transform::from_translation(Vec3::X)),
            )
            .unwrap();
        let child = scene
            .add_child(
                parent,
                Node::new("child").with_transform(Transform::from_translation(Vec3::Y)),
            )
            .unwrap();

        let origin = scene.world_matrix(child).transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn attach_grafts_subtree_and_keeps_hierarchy() {
        let mut fragment = Scene::with_root(Node::new("model"));
        let part = fragment
            .add_child(fragment.root(), surface_node("part"))
            .unwrap();
        fragment.add_child(part, surface_node("bolt")).unwrap();

        let mut scene = Scene::new();
        scene.add_child(scene.root(), Node::new("light rig")).unwrap();
        let model = scene.attach(scene.root(), fragment).unwrap();

        assert_eq!(scene.node(model).unwrap().name, "model");
        assert_eq!(scene.node(model).unwrap().parent(), Some(scene.root()));
        let under_model = scene.surface_ids_under(model);
        assert_eq!(under_model.len(), 2);
        let bolt = under_model[1];
        assert_eq!(scene.node(bolt).unwrap().name, "bolt");
        assert_eq!(
            scene.node(scene.node(bolt).unwrap().parent().unwrap()).unwrap().name,
            "part"
        );
        assert_eq!(scene.surface_count(), 2);
    }

    #[test]
    fn set_surface_color_only_touches_surfaces() {
        let mut scene = Scene::new();
        let empty = scene.add_child(scene.root(), Node::new("empty")).unwrap();
        let mesh = scene.add_child(scene.root(), surface_node("mesh")).unwrap();

        assert!(!scene.set_surface_color(empty, Color::GREEN));
        assert!(scene.set_surface_color(mesh, Color::GREEN));
        assert_eq!(scene.surface(mesh).unwrap().material.color, Color::GREEN);
    }
}
