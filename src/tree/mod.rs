//! Arena storage for syntax trees
//!
//! A [`Tree`] is a single growable vector of [`TreeNode`] records addressed by
//! [`NodeId`]. It knows nothing about the language: the payload type `T` is
//! opaque and all structure lives in the links of each record.
//!
//! # Links
//!
//! Every record carries two families of links:
//! - **Operand links** `left` / `right`, filled by [`Tree::insert_on_left`] and
//!   [`Tree::insert_on_right`]. Inserting into an occupied slot pushes the old
//!   occupant down into the same slot of the new child.
//! - **Statement links** `first_child` / `last_child` / `next_sibling`, filled
//!   by [`Tree::append_child`]. They keep ordered statement lists apart from the
//!   operand slots, so appending a statement never rewrites its operands.
//!
//! # Growth
//!
//! Capacity starts at [`START_CAPACITY`] and is multiplied by
//! [`SCALE_FACTOR`] when full. [`Tree::capacity`] reports this logical
//! capacity; the allocator may reserve more underneath. Records are never
//! removed or reordered, so a [`NodeId`] stays valid for the lifetime of the
//! tree.

use log::debug;
use thiserror::Error;

/// Index of a node inside its [`Tree`]
pub type NodeId = usize;

/// Capacity of a freshly created tree
pub const START_CAPACITY: usize = 8;

/// Growth multiplier applied when the arena is full
pub const SCALE_FACTOR: usize = 2;

/// Errors raised by tree construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The arena could not grow to hold another node
    #[error("could not grow syntax tree to {requested} nodes")]
    AllocationFailed { requested: usize },
}

/// One record of the arena
#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    pub data: T,
    pub index: NodeId,
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

impl<T> TreeNode<T> {
    fn new(data: T, index: NodeId) -> Self {
        TreeNode {
            data,
            index,
            parent: None,
            left: None,
            right: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
        }
    }
}

/// Index-addressed tree arena
#[derive(Debug, Clone)]
pub struct Tree<T> {
    nodes: Vec<TreeNode<T>>,
    capacity: usize,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    /// Create an empty tree with [`START_CAPACITY`] slots reserved.
    pub fn new() -> Self {
        Tree {
            nodes: Vec::with_capacity(START_CAPACITY),
            capacity: START_CAPACITY,
        }
    }

    /// Append a new unlinked node and return its index.
    pub fn create_node(&mut self, data: T) -> Result<NodeId, TreeError> {
        if self.nodes.len() == self.capacity {
            self.grow()?;
        }

        let index = self.nodes.len();
        self.nodes.push(TreeNode::new(data, index));
        Ok(index)
    }

    fn grow(&mut self) -> Result<(), TreeError> {
        let target = self
            .capacity
            .checked_mul(SCALE_FACTOR)
            .ok_or(TreeError::AllocationFailed {
                requested: usize::MAX,
            })?;
        self.nodes
            .try_reserve_exact(target - self.nodes.len())
            .map_err(|_| TreeError::AllocationFailed { requested: target })?;
        self.capacity = target;
        debug!("tree arena grew to {} slots", target);
        Ok(())
    }

    /// Hang `child` on the left link of `parent`.
    ///
    /// A left child already present under `parent` is re-parented to `child`
    /// and overwrites `child`'s own left link. Passing `None` is a no-op.
    pub fn insert_on_left(&mut self, parent: NodeId, child: Option<NodeId>) -> Option<NodeId> {
        let child = child?;

        self.nodes[child].parent = Some(parent);
        if let Some(previous) = self.nodes[parent].left {
            self.nodes[child].left = Some(previous);
            self.nodes[previous].parent = Some(child);
        }
        self.nodes[parent].left = Some(child);

        Some(child)
    }

    /// Mirror of [`Tree::insert_on_left`] for the right link.
    pub fn insert_on_right(&mut self, parent: NodeId, child: Option<NodeId>) -> Option<NodeId> {
        let child = child?;

        self.nodes[child].parent = Some(parent);
        if let Some(previous) = self.nodes[parent].right {
            self.nodes[child].right = Some(previous);
            self.nodes[previous].parent = Some(child);
        }
        self.nodes[parent].right = Some(child);

        Some(child)
    }

    /// Add `child` at the end of `parent`'s ordered child list.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child].parent = Some(parent);
        self.nodes[child].next_sibling = None;

        match self.nodes[parent].last_child {
            Some(last) => self.nodes[last].next_sibling = Some(child),
            None => self.nodes[parent].first_child = Some(child),
        }
        self.nodes[parent].last_child = Some(child);
    }

    pub fn data(&self, id: NodeId) -> &T {
        &self.nodes[id].data
    }

    pub fn node(&self, id: NodeId) -> &TreeNode<T> {
        &self.nodes[id]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].left
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].right
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].first_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].next_sibling
    }

    /// Iterate the ordered child list of `id`.
    pub fn children(&self, id: NodeId) -> Children<'_, T> {
        Children {
            tree: self,
            next: self.nodes[id].first_child,
        }
    }

    /// True when the node has no operand links and no children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        node.left.is_none() && node.right.is_none() && node.first_child.is_none()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Slots available before the next growth step
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The first node created, if any.
    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    /// All records in index order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode<T>> {
        self.nodes.iter()
    }
}

/// Iterator over a node's ordered child list
pub struct Children<'a, T> {
    tree: &'a Tree<T>,
    next: Option<NodeId>,
}

impl<T> Iterator for Children<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}
