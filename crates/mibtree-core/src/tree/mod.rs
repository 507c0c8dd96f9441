//! Global OID tree.
//!
//! One tree holds the resolved nodes of every loaded module. Storage is a
//! flat arena indexed by [`NodeId`]; tree links are ids, not references, so
//! nodes stay addressable while the tree grows.
//!
//! The tree is seeded with the `iso` root at `.1`, the fixed point every
//! module eventually hangs off.

mod node;
mod oid;

pub use node::{NodeId, OidNode};
pub use oid::Oid;

use alloc::vec;
use alloc::vec::Vec;
use core::mem;

use crate::module::Declaration;

/// Module credited with the seeded root node.
const ROOT_MODULE: &str = "SNMPv2-SMI";

const ROOT_ID: NodeId = match NodeId::from_raw(1) {
    Some(id) => id,
    None => panic!("root id is nonzero"),
};

/// Error from a tree mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// Node storage reached `u32::MAX - 1` entries.
    Capacity,
    /// The parent id does not belong to this tree.
    UnknownParent,
}

impl core::fmt::Display for TreeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TreeError::Capacity => {
                write!(f, "tree capacity exceeded (limit: {})", u32::MAX - 1)
            }
            TreeError::UnknownParent => write!(f, "parent node not found in tree"),
        }
    }
}

/// The global OID tree.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OidTree {
    nodes: Vec<OidNode>,
    root: NodeId,
}

impl Default for OidTree {
    fn default() -> Self {
        Self::new()
    }
}

impl OidTree {
    /// Creates a tree holding only the `iso` root at `.1`.
    #[must_use]
    pub fn new() -> Self {
        let root = OidNode::new(
            ROOT_MODULE,
            Oid::new(vec![1]),
            None,
            Declaration::new("iso", "", 1),
        );
        OidTree {
            nodes: vec![root],
            root: ROOT_ID,
        }
    }

    /// Id of the `iso` root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&OidNode> {
        self.nodes.get(id.to_index())
    }

    /// Number of nodes, including the seeded root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Finds the first node named `symbol`, in any module.
    #[must_use]
    pub fn find(&self, symbol: &str) -> Option<&OidNode> {
        self.find_id(symbol).and_then(|id| self.node(id))
    }

    /// Finds the first node named `symbol` owned by `module`.
    #[must_use]
    pub fn find_in(&self, module: &str, symbol: &str) -> Option<&OidNode> {
        self.find_id_in(module, symbol).and_then(|id| self.node(id))
    }

    /// Id form of [`OidTree::find`].
    #[must_use]
    pub fn find_id(&self, symbol: &str) -> Option<NodeId> {
        self.find_by(|node| node.symbol() == symbol)
    }

    /// Id form of [`OidTree::find_in`].
    #[must_use]
    pub fn find_id_in(&self, module: &str, symbol: &str) -> Option<NodeId> {
        self.find_by(|node| node.module == module && node.symbol() == symbol)
    }

    /// Depth-first search in child order, so the first match is
    /// deterministic for a given tree.
    fn find_by<F>(&self, pred: F) -> Option<NodeId>
    where
        F: Fn(&OidNode) -> bool,
    {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id)?;
            if pred(node) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Attaches a declaration under `parent` and returns the new node's id.
    ///
    /// The child OID is the parent OID extended by the declaration's arc,
    /// and the parent's child list is kept sorted ascending by arc. When a
    /// child with the same module and symbol already exists the call is a
    /// no-op returning the existing id, so re-loading a module never
    /// duplicates nodes.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownParent`] when `parent` is not a node of this
    /// tree, [`TreeError::Capacity`] when storage is full.
    pub fn attach_child(
        &mut self,
        parent: NodeId,
        module: &str,
        declaration: &Declaration,
    ) -> Result<NodeId, TreeError> {
        let Some(parent_node) = self.node(parent) else {
            return Err(TreeError::UnknownParent);
        };
        let existing = parent_node.children.iter().copied().find(|&child_id| {
            self.node(child_id).is_some_and(|child| {
                child.module == module && child.symbol() == declaration.symbol
            })
        });
        if let Some(child_id) = existing {
            return Ok(child_id);
        }

        let oid = parent_node.oid.child(declaration.index);
        let id = NodeId::from_index(self.nodes.len()).ok_or(TreeError::Capacity)?;
        self.nodes
            .push(OidNode::new(module, oid, Some(parent), declaration.clone()));

        let mut children = mem::take(&mut self.nodes[parent.to_index()].children);
        children.push(id);
        children.sort_by_key(|&child_id| {
            self.node(child_id).map_or(u32::MAX, OidNode::index)
        });
        self.nodes[parent.to_index()].children = children;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(symbol: &str, parent: &str, index: u32) -> Declaration {
        Declaration::new(symbol, parent, index)
    }

    #[test]
    fn test_seeded_root() {
        let tree = OidTree::new();
        let root = tree.find("iso").unwrap();
        assert_eq!(root.oid.to_dotted(), ".1");
        assert_eq!(root.module, "SNMPv2-SMI");
        assert_eq!(root.index(), 1);
        assert!(root.parent.is_none());
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_attach_builds_paths() {
        let mut tree = OidTree::new();
        let iso = tree.root();
        let org = tree
            .attach_child(iso, "SNMPv2-SMI", &decl("org", "iso", 3))
            .unwrap();
        let dod = tree
            .attach_child(org, "SNMPv2-SMI", &decl("dod", "org", 6))
            .unwrap();
        tree.attach_child(dod, "SNMPv2-SMI", &decl("internet", "dod", 1))
            .unwrap();

        assert_eq!(tree.find("internet").unwrap().oid.to_dotted(), ".1.3.6.1");
        assert_eq!(tree.find("org").unwrap().oid.to_dotted(), ".1.3");
    }

    #[test]
    fn test_children_sorted_by_arc() {
        let mut tree = OidTree::new();
        let iso = tree.root();
        tree.attach_child(iso, "M", &decl("five", "iso", 5)).unwrap();
        tree.attach_child(iso, "M", &decl("two", "iso", 2)).unwrap();
        tree.attach_child(iso, "M", &decl("ten", "iso", 10)).unwrap();

        let root = tree.node(iso).unwrap();
        let arcs: Vec<u32> = root
            .children
            .iter()
            .map(|&id| tree.node(id).unwrap().index())
            .collect();
        assert_eq!(arcs, vec![2, 5, 10]);
    }

    #[test]
    fn test_attach_idempotent() {
        let mut tree = OidTree::new();
        let iso = tree.root();
        let first = tree
            .attach_child(iso, "RACOM-MIB", &decl("racom", "iso", 7))
            .unwrap();
        let second = tree
            .attach_child(iso, "RACOM-MIB", &decl("racom", "iso", 7))
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(tree.node(iso).unwrap().children.len(), 1);
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn test_same_symbol_different_module() {
        let mut tree = OidTree::new();
        let iso = tree.root();
        tree.attach_child(iso, "A-MIB", &decl("shared", "iso", 4)).unwrap();
        tree.attach_child(iso, "B-MIB", &decl("shared", "iso", 4)).unwrap();
        assert_eq!(tree.node(iso).unwrap().children.len(), 2);
    }

    #[test]
    fn test_scoped_find() {
        let tree = OidTree::new();
        assert!(tree.find_in("SNMPv2-SMI", "iso").is_some());
        assert!(tree.find_in("OTHER-MIB", "iso").is_none());
        assert!(tree.find("missing").is_none());
    }

    #[test]
    fn test_find_first_in_child_order() {
        let mut tree = OidTree::new();
        let iso = tree.root();
        let a = tree.attach_child(iso, "A-MIB", &decl("a", "iso", 1)).unwrap();
        let b = tree.attach_child(iso, "B-MIB", &decl("b", "iso", 2)).unwrap();
        tree.attach_child(a, "A-MIB", &decl("leaf", "a", 1)).unwrap();
        tree.attach_child(b, "B-MIB", &decl("leaf", "b", 1)).unwrap();

        // Both branches hold a "leaf"; the branch under the lower arc wins.
        let found = tree.find("leaf").unwrap();
        assert_eq!(found.module, "A-MIB");
        assert_eq!(found.oid.to_dotted(), ".1.1.1");
    }

    #[test]
    fn test_unknown_parent() {
        let mut tree = OidTree::new();
        let stale = NodeId::from_raw(999).unwrap();
        assert_eq!(
            tree.attach_child(stale, "M", &decl("x", "y", 1)),
            Err(TreeError::UnknownParent)
        );
    }
}
