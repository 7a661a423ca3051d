//! Game tree access.
//!
//! The planner only needs a handful of queries from a game tree, captured by
//! the [`GameTree`] trait. [`MemoryTree`] is a small in-memory implementation
//! that computes positions by replaying from the root.

use crate::board::Board;
use crate::sgf;
use gtpsync_types::{Coord, Sign};
use std::collections::BTreeMap;
use std::fmt;

/// Queries the sync planner makes against a game tree.
pub trait GameTree {
    /// Node handle.
    type NodeId: Copy + Eq + fmt::Debug;

    /// The position at `id`, or `None` if the node doesn't exist.
    fn board_at(&self, id: Self::NodeId) -> Option<Board>;

    /// First value of a root property.
    fn root_property(&self, key: &str) -> Option<&str>;

    /// Nodes from the root down to and including `id`.
    fn path_to(&self, id: Self::NodeId) -> Vec<Self::NodeId>;

    /// Raw values of a node property, e.g. compressed point lists for `AB`.
    fn property(&self, id: Self::NodeId, key: &str) -> Option<&[String]>;

    /// Komi from the root `KM` property; `0` when absent or unparseable.
    fn komi(&self) -> f64 {
        self.root_property("KM")
            .and_then(|km| km.trim().parse().ok())
            .unwrap_or(0.0)
    }
}

/// Handle to a node of a [`MemoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct Node {
    parent: Option<NodeId>,
    properties: BTreeMap<String, Vec<String>>,
}

/// In-memory game tree.
///
/// Board dimensions come from the root `SZ` property (`"19"` or `"13:9"`,
/// default 19).
#[derive(Debug, Clone)]
pub struct MemoryTree {
    nodes: Vec<Node>,
}

impl MemoryTree {
    /// Create a tree holding only a root node for a square board.
    pub fn new(size: usize) -> Self {
        let mut tree = Self {
            nodes: vec![Node::default()],
        };
        let root = tree.root();
        tree.set_property(root, "SZ", &[size.to_string()]);
        tree
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Parent of `id`, `None` for the root or unknown nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    /// Replace a property on an existing node.
    pub fn set_property<S: AsRef<str>>(&mut self, id: NodeId, key: &str, values: &[S]) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.properties.insert(
                key.to_string(),
                values.iter().map(|v| v.as_ref().to_string()).collect(),
            );
        }
    }

    /// Add a child node under `parent` with the given properties.
    pub fn append(&mut self, parent: NodeId, properties: &[(&str, &[&str])]) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            properties: properties
                .iter()
                .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
                .collect(),
        });
        id
    }

    /// Board dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        let Some(sz) = self.root_property("SZ") else {
            return (19, 19);
        };
        let mut parts = sz.split(':').map(|p| p.trim().parse::<usize>().ok());
        match (parts.next().flatten(), parts.next().flatten()) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w),
            _ => (19, 19),
        }
    }
}

impl GameTree for MemoryTree {
    type NodeId = NodeId;

    fn board_at(&self, id: NodeId) -> Option<Board> {
        if id.0 >= self.nodes.len() {
            return None;
        }

        let (width, height) = self.dimensions();
        let mut board = Board::new(width, height);

        for node_id in self.path_to(id) {
            for (key, sign) in [("B", Sign::Black), ("W", Sign::White)] {
                let Some(values) = self.property(node_id, key) else {
                    continue;
                };
                for coord in sgf::expand_all(values) {
                    board = board.make_move(sign, coord);
                }
            }

            for (key, value) in [("AB", 1), ("AW", -1), ("AE", 0)] {
                let Some(values) = self.property(node_id, key) else {
                    continue;
                };
                for coord in sgf::expand_all(values) {
                    if let Coord::Point(v) = coord {
                        board.set(v, value);
                    }
                }
            }
        }

        Some(board)
    }

    fn root_property(&self, key: &str) -> Option<&str> {
        self.property(self.root(), key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        if id.0 >= self.nodes.len() {
            return Vec::new();
        }

        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    fn property(&self, id: NodeId, key: &str) -> Option<&[String]> {
        self.nodes
            .get(id.0)
            .and_then(|n| n.properties.get(key))
            .map(Vec::as_slice)
    }
}
