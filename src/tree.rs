use indextree::{Arena, NodeId};
use std::collections::HashMap;

use crate::wire::FileNode;

/// A node in the weighted hierarchy.
///
/// `weight` is bytes for authoritative trees and a monotonically growing
/// proxy value during live aggregation; consumers must not assume a parent
/// equals the sum of its children while a scan is in flight.
#[derive(Debug, Clone)]
pub struct WeightNode {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub weight: f64,
}

/// Weighted hierarchy backed by an arena, with an O(1) path index.
///
/// Children keep insertion order (discovery order), which the layout relies
/// on for deterministic tie-breaking. Nodes are never removed; a new scan
/// session replaces the whole tree.
pub struct WeightTree {
    arena: Arena<WeightNode>,
    root: NodeId,
    index: HashMap<String, NodeId>,
}

impl WeightTree {
    pub fn new(name: &str, path: &str, is_dir: bool, weight: f64) -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(WeightNode {
            name: name.to_string(),
            path: path.to_string(),
            is_dir,
            weight,
        });

        let mut index = HashMap::new();
        index.insert(path.to_string(), root);

        Self { arena, root, index }
    }

    /// Build an authoritative tree from a wire node. Weights are the
    /// declared sizes; children are kept in wire order.
    pub fn from_wire(wire: &FileNode) -> Self {
        let mut tree = Self::new(&wire.name, &wire.path, wire.is_dir, wire.size as f64);
        let root = tree.root;
        if let Some(children) = &wire.children {
            for child in children {
                Self::graft_wire(&mut tree, root, child);
            }
        }
        tree
    }

    fn graft_wire(tree: &mut WeightTree, parent: NodeId, wire: &FileNode) {
        let id = tree.append_child(parent, &wire.name, &wire.path, wire.is_dir, wire.size as f64);
        if let Some(children) = &wire.children {
            for child in children {
                Self::graft_wire(tree, id, child);
            }
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_path(&self) -> &str {
        &self.arena[self.root].get().path
    }

    pub fn lookup(&self, path: &str) -> Option<NodeId> {
        self.index.get(path).copied()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    pub fn node(&self, id: NodeId) -> &WeightNode {
        self.arena[id].get()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.len() <= 1
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        id.children(&self.arena).count()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent()
    }

    /// Append a child under `parent`, registering it in the path index.
    /// Appending promotes the parent to a directory.
    pub fn append_child(
        &mut self,
        parent: NodeId,
        name: &str,
        path: &str,
        is_dir: bool,
        weight: f64,
    ) -> NodeId {
        let id = self.arena.new_node(WeightNode {
            name: name.to_string(),
            path: path.to_string(),
            is_dir,
            weight,
        });
        parent.append(id, &mut self.arena);
        self.arena[parent].get_mut().is_dir = true;
        self.index.insert(path.to_string(), id);
        id
    }

    pub fn add_weight(&mut self, id: NodeId, delta: f64) {
        let node = self.arena[id].get_mut();
        node.weight += delta;
    }

    pub fn set_weight(&mut self, id: NodeId, weight: f64) {
        self.arena[id].get_mut().weight = weight;
    }

    /// Shallow re-aggregation: root weight becomes the sum of its direct
    /// children's weights. Not a subtree resum; ingestion stays O(1)
    /// amortized per event.
    pub fn resum_root(&mut self) {
        let total: f64 = self
            .root
            .children(&self.arena)
            .map(|id| self.arena[id].get().weight)
            .sum();
        if total > 0.0 {
            self.arena[self.root].get_mut().weight = total;
        }
    }

    /// All indexed paths, for tests and diagnostics.
    pub fn paths(&self) -> Vec<String> {
        self.index.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_lookup() {
        let mut tree = WeightTree::new("/", "/", true, 1.0);
        let a = tree.append_child(tree.root(), "a", "/a", true, 2.0);
        tree.append_child(a, "b", "/a/b", false, 3.0);

        assert_eq!(tree.lookup("/a"), Some(a));
        assert!(tree.contains("/a/b"));
        assert!(!tree.contains("/a/c"));
        assert_eq!(tree.node(a).weight, 2.0);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let mut tree = WeightTree::new("/", "/", true, 1.0);
        tree.append_child(tree.root(), "z", "/z", false, 1.0);
        tree.append_child(tree.root(), "a", "/a", false, 1.0);
        tree.append_child(tree.root(), "m", "/m", false, 1.0);

        let names: Vec<String> = tree
            .children(tree.root())
            .map(|id| tree.node(id).name.clone())
            .collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_append_promotes_parent_to_dir() {
        let mut tree = WeightTree::new("/", "/", true, 1.0);
        let f = tree.append_child(tree.root(), "pkg", "/pkg", false, 1.0);
        assert!(!tree.node(f).is_dir);

        tree.append_child(f, "lib.rs", "/pkg/lib.rs", false, 1.0);
        assert!(tree.node(f).is_dir);
    }

    #[test]
    fn test_resum_root_is_shallow() {
        let mut tree = WeightTree::new("/", "/", true, 1.0);
        let a = tree.append_child(tree.root(), "a", "/a", true, 4.0);
        tree.append_child(a, "b", "/a/b", false, 100.0);
        tree.append_child(tree.root(), "c", "/c", false, 6.0);

        tree.resum_root();
        // Direct children only: 4 + 6, the grandchild is not consulted.
        assert_eq!(tree.node(tree.root()).weight, 10.0);
    }

    #[test]
    fn test_from_wire() {
        let wire = FileNode {
            name: "root".to_string(),
            path: "/data".to_string(),
            size: 300,
            is_dir: true,
            children: Some(vec![
                FileNode::leaf("big.bin".to_string(), "/data/big.bin".to_string(), 200),
                FileNode {
                    name: "sub".to_string(),
                    path: "/data/sub".to_string(),
                    size: 100,
                    is_dir: true,
                    children: Some(vec![FileNode::leaf(
                        "x".to_string(),
                        "/data/sub/x".to_string(),
                        100,
                    )]),
                },
            ]),
        };

        let tree = WeightTree::from_wire(&wire);
        assert_eq!(tree.root_path(), "/data");
        assert_eq!(tree.node(tree.root()).weight, 300.0);
        assert_eq!(tree.child_count(tree.root()), 2);

        let sub = tree.lookup("/data/sub").unwrap();
        assert!(tree.node(sub).is_dir);
        assert_eq!(tree.node(sub).weight, 100.0);
        assert!(tree.contains("/data/sub/x"));
    }
}
