use cottage_common::Transform;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::geometry::Geometry;
use crate::node::{
    GeometryId, Light, MaterialId, Node, NodeId, NodeKind, StandardMaterial, geometry_label,
};

/// Errors from scene operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("node {0:?} not found")]
    NodeNotFound(NodeId),
    #[error("geometry {0:?} not found")]
    GeometryNotFound(GeometryId),
    #[error("material {0:?} not found")]
    MaterialNotFound(MaterialId),
    #[error("node {0:?} is not a group")]
    NotAGroup(NodeId),
    #[error("node {0:?} is not a light")]
    NotALight(NodeId),
    #[error("node {0:?} cannot be its own ancestor")]
    SelfParent(NodeId),
}

/// A mesh resolved for drawing: world matrix plus its shared resources.
#[derive(Debug, Clone, Copy)]
pub struct MeshInstance {
    pub node: NodeId,
    pub world: Mat4,
    pub geometry: GeometryId,
    pub material: MaterialId,
}

/// A light resolved for drawing.
#[derive(Debug, Clone, Copy)]
pub struct LightInstance {
    pub node: NodeId,
    pub light: Light,
    pub world_position: Vec3,
}

/// The scene container.
///
/// Nodes, geometries and materials are stored in BTreeMaps; draw order comes
/// from the root list and each group's child list, not from map order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    nodes: BTreeMap<NodeId, Node>,
    roots: Vec<NodeId>,
    geometries: BTreeMap<GeometryId, Geometry>,
    materials: BTreeMap<MaterialId, StandardMaterial>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    /// Root nodes in insertion order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        if !geometry.is_valid() {
            tracing::warn!(?geometry, "geometry has non-positive dimensions");
        }
        let id = GeometryId::new();
        self.geometries.insert(id, geometry);
        id
    }

    pub fn add_material(&mut self, material: StandardMaterial) -> MaterialId {
        let id = MaterialId::new();
        self.materials.insert(id, material);
        id
    }

    /// Add an empty group as a new root.
    pub fn add_group(&mut self, name: impl Into<String>, transform: Transform) -> NodeId {
        self.insert_root(Node::new(name, NodeKind::Group, transform))
    }

    /// Add a mesh as a new root. Geometry and material must already exist.
    pub fn add_mesh(
        &mut self,
        name: impl Into<String>,
        geometry: GeometryId,
        material: MaterialId,
        transform: Transform,
    ) -> Result<NodeId, SceneError> {
        if !self.geometries.contains_key(&geometry) {
            return Err(SceneError::GeometryNotFound(geometry));
        }
        if !self.materials.contains_key(&material) {
            return Err(SceneError::MaterialNotFound(material));
        }
        Ok(self.insert_root(Node::new(
            name,
            NodeKind::Mesh { geometry, material },
            transform,
        )))
    }

    /// Add a light as a new root.
    pub fn add_light(&mut self, name: impl Into<String>, light: Light, transform: Transform) -> NodeId {
        self.insert_root(Node::new(name, NodeKind::Light(light), transform))
    }

    fn insert_root(&mut self, node: Node) -> NodeId {
        let id = NodeId::new();
        tracing::debug!(name = %node.name, "node added");
        self.nodes.insert(id, node);
        self.roots.push(id);
        id
    }

    /// Move `child` under the group `parent`, detaching it from wherever it was.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) -> Result<(), SceneError> {
        if !self.nodes.contains_key(&child) {
            return Err(SceneError::NodeNotFound(child));
        }
        let parent_node = self
            .nodes
            .get(&parent)
            .ok_or(SceneError::NodeNotFound(parent))?;
        if !parent_node.is_group() {
            return Err(SceneError::NotAGroup(parent));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::SelfParent(child));
        }

        self.detach(child);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        let old_parent = self.nodes.get(&child).and_then(|n| n.parent);
        match old_parent {
            Some(p) => {
                if let Some(node) = self.nodes.get_mut(&p) {
                    node.children.retain(|c| *c != child);
                }
            }
            None => self.roots.retain(|r| *r != child),
        }
    }

    /// True if `ancestor` is `node` or lies on its parent chain.
    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes.get(&node).and_then(|n| n.parent) {
                Some(p) => node = p,
                None => return false,
            }
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(&id)
    }

    pub fn geometries(&self) -> &BTreeMap<GeometryId, Geometry> {
        &self.geometries
    }

    pub fn material(&self, id: MaterialId) -> Option<&StandardMaterial> {
        self.materials.get(&id)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut StandardMaterial> {
        self.materials.get_mut(&id)
    }

    pub fn materials(&self) -> &BTreeMap<MaterialId, StandardMaterial> {
        &self.materials
    }

    /// Mutable access to a light node's light parameters.
    pub fn light_mut(&mut self, id: NodeId) -> Result<&mut Light, SceneError> {
        match self.nodes.get_mut(&id) {
            Some(Node {
                kind: NodeKind::Light(light),
                ..
            }) => Ok(light),
            Some(_) => Err(SceneError::NotALight(id)),
            None => Err(SceneError::NodeNotFound(id)),
        }
    }

    /// World matrix of a node: its local matrix premultiplied by every ancestor.
    pub fn world_matrix(&self, id: NodeId) -> Result<Mat4, SceneError> {
        let mut node = self.nodes.get(&id).ok_or(SceneError::NodeNotFound(id))?;
        let mut world = node.transform.matrix();
        while let Some(parent) = node.parent {
            node = self
                .nodes
                .get(&parent)
                .ok_or(SceneError::NodeNotFound(parent))?;
            world = node.transform.matrix() * world;
        }
        Ok(world)
    }

    /// Walk the tree depth-first in root order, calling `f` with each node and
    /// its world matrix.
    pub fn visit(&self, mut f: impl FnMut(NodeId, &Node, Mat4)) {
        let mut stack: Vec<(NodeId, Mat4)> =
            self.roots.iter().rev().map(|r| (*r, Mat4::IDENTITY)).collect();
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let world = parent_world * node.transform.matrix();
            f(id, node, world);
            stack.extend(node.children.iter().rev().map(|c| (*c, world)));
        }
    }

    /// Call `f` for every mesh with its world matrix, in draw order.
    pub fn visit_meshes(&self, mut f: impl FnMut(MeshInstance)) {
        self.visit(|id, node, world| {
            if let NodeKind::Mesh { geometry, material } = node.kind {
                f(MeshInstance {
                    node: id,
                    world,
                    geometry,
                    material,
                });
            }
        });
    }

    /// Every mesh with its world matrix, in draw order.
    pub fn meshes(&self) -> Vec<MeshInstance> {
        let mut out = Vec::new();
        self.visit_meshes(|mesh| out.push(mesh));
        out
    }

    /// Every light with its world position.
    pub fn lights(&self) -> Vec<LightInstance> {
        let mut out = Vec::new();
        self.visit(|id, node, world| {
            if let NodeKind::Light(light) = node.kind {
                out.push(LightInstance {
                    node: id,
                    light,
                    world_position: world.transform_point3(Vec3::ZERO),
                });
            }
        });
        out
    }

    /// Human-readable outline of the tree, one node per line.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.visit(|id, node, world| {
            let depth = self.depth(id);
            let p = world.transform_point3(Vec3::ZERO);
            let what = match &node.kind {
                NodeKind::Group => "group".to_string(),
                NodeKind::Mesh { geometry, material } => {
                    let geo = self
                        .geometries
                        .get(geometry)
                        .map(geometry_label)
                        .unwrap_or_else(|| "missing geometry".into());
                    let mat = self
                        .materials
                        .get(material)
                        .map(|m| {
                            format!("{}{}", m.color, if m.wireframe { " wireframe" } else { "" })
                        })
                        .unwrap_or_else(|| "missing material".into());
                    format!("mesh {geo} {mat}")
                }
                NodeKind::Light(Light::Ambient { color, intensity }) => {
                    format!("ambient {color} @ {intensity}")
                }
                NodeKind::Light(Light::Directional { color, intensity }) => {
                    format!("directional {color} @ {intensity}")
                }
            };
            out.push_str(&format!(
                "{}{} [{}] pos=({:.2}, {:.2}, {:.2})\n",
                "  ".repeat(depth),
                node.name,
                what,
                p.x,
                p.y,
                p.z
            ));
        });
        out
    }

    fn depth(&self, mut id: NodeId) -> usize {
        let mut depth = 0;
        while let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent) {
            depth += 1;
            id = parent;
        }
        depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cottage_common::Color;

    fn unit_box(scene: &mut Scene) -> (GeometryId, MaterialId) {
        let geo = scene.add_geometry(Geometry::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        });
        let mat = scene.add_material(StandardMaterial::default());
        (geo, mat)
    }

    #[test]
    fn scene_starts_empty() {
        let scene = Scene::new();
        assert_eq!(scene.node_count(), 0);
        assert!(scene.meshes().is_empty());
        assert!(scene.lights().is_empty());
    }

    #[test]
    fn add_mesh_requires_resources() {
        let mut scene = Scene::new();
        let (geo, mat) = unit_box(&mut scene);
        let missing = MaterialId::new();
        assert_eq!(
            scene.add_mesh("m", geo, missing, Transform::default()),
            Err(SceneError::MaterialNotFound(missing))
        );
        assert!(scene.add_mesh("m", geo, mat, Transform::default()).is_ok());
    }

    #[test]
    fn attach_moves_root_under_group() {
        let mut scene = Scene::new();
        let (geo, mat) = unit_box(&mut scene);
        let group = scene.add_group("house", Transform::default());
        let mesh = scene.add_mesh("walls", geo, mat, Transform::default()).unwrap();
        assert_eq!(scene.roots().len(), 2);

        scene.attach(mesh, group).unwrap();
        assert_eq!(scene.roots(), &[group]);
        assert_eq!(scene.node(group).unwrap().children(), &[mesh]);
        assert_eq!(scene.node(mesh).unwrap().parent(), Some(group));
    }

    #[test]
    fn attach_rejects_non_groups_and_cycles() {
        let mut scene = Scene::new();
        let (geo, mat) = unit_box(&mut scene);
        let mesh = scene.add_mesh("a", geo, mat, Transform::default()).unwrap();
        let other = scene.add_mesh("b", geo, mat, Transform::default()).unwrap();
        assert_eq!(scene.attach(other, mesh), Err(SceneError::NotAGroup(mesh)));

        let outer = scene.add_group("outer", Transform::default());
        let inner = scene.add_group("inner", Transform::default());
        scene.attach(inner, outer).unwrap();
        assert_eq!(scene.attach(outer, inner), Err(SceneError::SelfParent(outer)));
        assert_eq!(scene.attach(outer, outer), Err(SceneError::SelfParent(outer)));
    }

    #[test]
    fn world_matrix_composes_parents() {
        let mut scene = Scene::new();
        let (geo, mat) = unit_box(&mut scene);
        let group = scene.add_group("g", Transform::from_position(Vec3::new(10.0, 0.0, 0.0)));
        let mesh = scene
            .add_mesh("m", geo, mat, Transform::from_position(Vec3::new(0.0, 1.0, 0.0)))
            .unwrap();
        scene.attach(mesh, group).unwrap();

        let p = scene.world_matrix(mesh).unwrap().transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(10.0, 1.0, 0.0));
        assert_eq!(scene.meshes()[0].world, scene.world_matrix(mesh).unwrap());
    }

    #[test]
    fn meshes_follow_insertion_order() {
        let mut scene = Scene::new();
        let (geo, mat) = unit_box(&mut scene);
        let group = scene.add_group("g", Transform::default());
        let mut ids = Vec::new();
        for i in 0..5 {
            let id = scene
                .add_mesh(format!("m{i}"), geo, mat, Transform::default())
                .unwrap();
            scene.attach(id, group).unwrap();
            ids.push(id);
        }
        let floor = scene.add_mesh("floor", geo, mat, Transform::default()).unwrap();
        ids.push(floor);

        let order: Vec<NodeId> = scene.meshes().iter().map(|m| m.node).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn lights_report_world_position() {
        let mut scene = Scene::new();
        let id = scene.add_light(
            "moon",
            Light::Directional {
                color: Color::WHITE,
                intensity: 0.5,
            },
            Transform::from_position(Vec3::new(4.0, 5.0, -2.0)),
        );
        let lights = scene.lights();
        assert_eq!(lights.len(), 1);
        assert_eq!(lights[0].node, id);
        assert_eq!(lights[0].world_position, Vec3::new(4.0, 5.0, -2.0));
    }

    #[test]
    fn light_mut_checks_kind() {
        let mut scene = Scene::new();
        let group = scene.add_group("g", Transform::default());
        assert_eq!(scene.light_mut(group).err(), Some(SceneError::NotALight(group)));
        let light = scene.add_light(
            "ambient",
            Light::Ambient {
                color: Color::WHITE,
                intensity: 0.5,
            },
            Transform::default(),
        );
        scene.light_mut(light).unwrap().set_intensity(1.0);
        assert_eq!(scene.lights()[0].light.intensity(), 1.0);
    }

    #[test]
    fn describe_indents_children() {
        let mut scene = Scene::new();
        let (geo, mat) = unit_box(&mut scene);
        let group = scene.add_group("house", Transform::default());
        let mesh = scene.add_mesh("walls", geo, mat, Transform::default()).unwrap();
        scene.attach(mesh, group).unwrap();

        let text = scene.describe();
        assert!(text.contains("house [group]"));
        assert!(text.contains("  walls [mesh box 1x1x1 #ffffff]"));
    }
}
