//! Scene graph and hierarchical scene organization.
//!
//! The graph is an arena: nodes and materials are stored in vectors and
//! referenced through [`NodeId`] / [`MaterialId`] handles. Anything outside the
//! graph (the vehicle's actuators in particular) only keeps handles, never the
//! nodes themselves, so the graph stays the single owner.

use log::warn;

use crate::data_structures::{instance::Instance, material::Material};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub usize);

#[derive(Clone, Debug, Default)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub local: Instance,
    pub world: Instance,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub material: Option<MaterialId>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_transform(mut self, local: Instance) -> Self {
        self.local = local;
        self
    }
}

/// Owner of every node and material of a scene.
///
/// A fresh graph contains a single unnamed root node at [`SceneGraph::ROOT`].
#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    materials: Vec<Material>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::new("")],
            materials: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Append `node` as the last child of `parent` and return its handle.
    pub fn add_node(&mut self, parent: NodeId, mut node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        match self.nodes.get_mut(parent.0) {
            Some(p) => p.children.push(id),
            None => {
                warn!(
                    "Parent {:?} does not exist, attaching {:?} to the root instead.",
                    parent, id
                );
                self.nodes[id.0].parent = Some(Self::ROOT);
                self.nodes[Self::ROOT.0].children.push(id);
            }
        }
        id
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0)
    }

    /// The material carried by node `id`, if both exist.
    pub fn node_material_mut(&mut self, id: NodeId) -> Option<&mut Material> {
        let material = self.nodes.get(id.0)?.material?;
        self.materials.get_mut(material.0)
    }

    pub fn materials(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(idx, m)| (MaterialId(idx), m))
    }

    /// Depth-first, pre-order handles of `root` and all its descendants.
    pub fn traverse(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if self.nodes.get(root.0).is_none() {
            return order;
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            // reversed so the first child is visited first
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        order
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.traverse(Self::ROOT)
            .into_iter()
            .find(|id| self.nodes[id.0].name == name)
    }

    /// Move every node and material of `other` into `self`.
    ///
    /// `other`'s root is not copied; its children become children of `parent`.
    /// Returns the mapping from `other`'s node handles to the new ones, indexed
    /// by the old handle.
    pub fn graft(&mut self, other: SceneGraph, parent: NodeId) -> Vec<Option<NodeId>> {
        let order = other.traverse(Self::ROOT);
        let material_offset = self.materials.len();
        self.materials.extend(other.materials);

        let mut mapping = vec![None; other.nodes.len()];
        mapping[Self::ROOT.0] = Some(parent);
        let mut nodes: Vec<Option<SceneNode>> = other.nodes.into_iter().map(Some).collect();
        for old in order.into_iter().skip(1) {
            let Some(mut node) = nodes[old.0].take() else {
                continue;
            };
            let new_parent = node
                .parent
                .and_then(|p| mapping[p.0])
                .unwrap_or(parent);
            node.material = node.material.map(|m| MaterialId(m.0 + material_offset));
            mapping[old.0] = Some(self.add_node(new_parent, node));
        }
        mapping
    }

    /// Recompute `world = parent.world * local` for every node, root first.
    pub fn update_world_transforms(&mut self) {
        for id in self.traverse(Self::ROOT) {
            let world = match self.nodes[id.0].parent {
                Some(parent) => &self.nodes[parent.0].world * &self.nodes[id.0].local,
                None => self.nodes[id.0].local.clone(),
            };
            self.nodes[id.0].world = world;
        }
    }
}
