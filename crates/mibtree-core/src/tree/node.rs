//! Tree node storage types.

use alloc::string::String;
use alloc::vec::Vec;
use core::num::NonZeroU32;

use super::Oid;
use crate::module::Declaration;

/// Index of a node in tree storage.
///
/// Backed by `NonZeroU32` so `Option<NodeId>` takes no extra space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Creates from a raw 1-based value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(n) => Some(NodeId(n)),
            None => None,
        }
    }

    /// Creates from a 0-based storage index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::from_raw((index + 1) as u32)
    }

    /// The raw 1-based value.
    #[must_use]
    pub const fn to_raw(self) -> u32 {
        self.0.get()
    }

    /// The 0-based storage index.
    #[must_use]
    pub const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// A resolved node in the global OID tree.
///
/// Wraps the declaration it was built from and adds the resolved context:
/// owning module, absolute OID, and tree links. The `children` list stays
/// sorted ascending by arc.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OidNode {
    /// Name of the module that declared this node.
    pub module: String,
    /// Absolute OID.
    pub oid: Oid,
    /// Parent node; `None` only for the tree root.
    pub parent: Option<NodeId>,
    /// Children sorted ascending by arc.
    pub children: Vec<NodeId>,
    /// The declaration this node was resolved from.
    pub declaration: Declaration,
}

impl OidNode {
    /// Creates a node with no children.
    #[must_use]
    pub fn new(
        module: &str,
        oid: Oid,
        parent: Option<NodeId>,
        declaration: Declaration,
    ) -> Self {
        OidNode {
            module: String::from(module),
            oid,
            parent,
            children: Vec::new(),
            declaration,
        }
    }

    /// Symbol this node is named by.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.declaration.symbol
    }

    /// Arc under the parent.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.declaration.index
    }
}
