use crate::objects::{DirectionalLight, Mesh};
use cubeview_common::{Color, NodeId};

/// A renderable node held by the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Light(DirectionalLight),
    Mesh(Mesh),
}

impl Node {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Light(_) => "light",
            Node::Mesh(_) => "mesh",
        }
    }
}

impl From<DirectionalLight> for Node {
    fn from(light: DirectionalLight) -> Self {
        Node::Light(light)
    }
}

impl From<Mesh> for Node {
    fn from(mesh: Mesh) -> Self {
        Node::Mesh(mesh)
    }
}

/// Append-only collection of lights and meshes.
///
/// Nodes keep their insertion order so renderers and debug output are stable.
/// The scene also carries a clock, in seconds, written by the application's
/// update phase and read by renderers.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<(NodeId, Node)>,
    background: Color,
    time: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            background: Color::BLACK,
            time: 0.0,
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. Returns its id.
    pub fn add(&mut self, node: impl Into<Node>) -> NodeId {
        let id = NodeId::new();
        let node = node.into();
        tracing::debug!(id = %id.short(), kind = node.kind(), "scene node added");
        self.nodes.push((id, node));
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|(node_id, _)| *node_id == id)
            .map(|(_, node)| node)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn lights(&self) -> impl Iterator<Item = &DirectionalLight> {
        self.nodes.iter().filter_map(|(_, node)| match node {
            Node::Light(light) => Some(light),
            Node::Mesh(_) => None,
        })
    }

    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.nodes.iter().filter_map(|(_, node)| match node {
            Node::Mesh(mesh) => Some(mesh),
            Node::Light(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Scene clock in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.time = seconds;
    }
}
