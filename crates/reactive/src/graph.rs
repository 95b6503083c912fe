//! The observable graph.
//!
//! `ObservableGraph` owns every node of one view-model, keyed by ID (the id
//! table), together with the root node and the computed nodes hanging off it.
//! Parent/child links mirror the nesting of the data tree.

use crate::node::{NodeId, NodeSource, ObservableNode, Observer};
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;
use weft_core::{Error, Path, Result, Value};

/// Key of the root node.
pub const ROOT_KEY: &str = "$root";

/// Arena of observable nodes for one context type `C`.
pub struct ObservableGraph<C> {
    nodes: HashMap<NodeId, ObservableNode<C>>,
    root: NodeId,
    computed: Vec<NodeId>,
}

impl<C> Default for ObservableGraph<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ObservableGraph<C> {
    /// Creates a graph holding only its root node.
    pub fn new() -> Self {
        let root = ObservableNode::new(ROOT_KEY, NodeSource::Root);
        let root_id = root.id();
        let mut nodes = HashMap::new();
        nodes.insert(root_id, root);
        Self {
            nodes,
            root: root_id,
            computed: Vec::new(),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the number of nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root node exists for the life of the graph.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&ObservableNode<C>> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut ObservableNode<C>> {
        self.nodes.get_mut(&id)
    }

    fn node(&self, id: NodeId) -> Result<&ObservableNode<C>> {
        self.nodes.get(&id).ok_or_else(|| Error::node_not_found(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut ObservableNode<C>> {
        self.nodes.get_mut(&id).ok_or_else(|| Error::node_not_found(id))
    }

    /// Returns every node ID in creation order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Returns the computed nodes in registration order.
    #[inline]
    pub fn computed(&self) -> &[NodeId] {
        &self.computed
    }

    /// Creates a node and, if `parent` is given, links it as the parent's last child.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        source: NodeSource,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        if let Some(parent) = parent {
            self.node(parent)?;
        }
        let node = ObservableNode::new(key, source);
        let id = node.id();
        self.nodes.insert(id, node);
        if let Some(parent) = parent {
            self.link(parent, id)?;
        }
        Ok(id)
    }

    /// Creates a computed node. It is reachable from the root by name but has
    /// no parent, so root notifications do not reach it.
    pub fn insert_computed(&mut self, name: impl Into<String>) -> NodeId {
        let name = name.into();
        let node = ObservableNode::new(name.clone(), NodeSource::Computed(name));
        let id = node.id();
        self.nodes.insert(id, node);
        self.computed.push(id);
        id
    }

    /// Makes `child` the last child of `parent`, detaching it from any
    /// previous parent.
    ///
    /// Fails with `Error::CyclicLink` if `parent` is `child` or one of its
    /// descendants.
    pub fn link(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(child)?;
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(Error::cyclic_link(parent, child));
            }
            cursor = self.node(id)?.parent();
        }

        if let Some(old) = self.node(child)?.parent() {
            self.node_mut(old)?.remove_child(child);
        }
        self.node_mut(parent)?.push_child(child);
        self.node_mut(child)?.set_parent(Some(parent));
        Ok(())
    }

    /// Finds the child of `parent` owning `key`.
    pub fn child_by_key(&self, parent: NodeId, key: &str) -> Option<NodeId> {
        self.nodes
            .get(&parent)?
            .children()
            .iter()
            .copied()
            .find(|id| self.nodes.get(id).is_some_and(|node| node.key() == key))
    }

    /// Locates the node at `path` from the root.
    ///
    /// The empty path is the root. A first segment naming a computed
    /// property resolves to its node; index segments match decimal keys.
    pub fn resolve(&self, path: &Path) -> Option<NodeId> {
        let mut segments = path.segments().iter();
        let Some(first) = segments.next() else {
            return Some(self.root);
        };

        let first = first.key();
        let mut current = self.child_by_key(self.root, &first).or_else(|| {
            self.computed
                .iter()
                .copied()
                .find(|id| self.nodes.get(id).is_some_and(|node| node.key() == first))
        })?;

        for segment in segments {
            current = self.child_by_key(current, &segment.key())?;
        }
        Some(current)
    }

    /// Appends an observer to a node.
    pub fn observe(&mut self, id: NodeId, observer: Observer<C>) -> Result<()> {
        self.node_mut(id)?.observe(observer);
        Ok(())
    }

    /// Records the value replaced by a write to a node.
    pub fn set_previous(&mut self, id: NodeId, value: Value) -> Result<()> {
        self.node_mut(id)?.set_previous(value);
        Ok(())
    }

    /// Returns the parent of a node.
    pub fn parent_of(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent())
    }

    /// Returns a copy of a node's children.
    pub fn children_of(&self, id: NodeId) -> Result<Vec<NodeId>> {
        Ok(self.node(id)?.children().to_vec())
    }

    /// Returns every descendant of `id` in pre-order, `id` itself excluded.
    pub fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id)?.children().iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.node(next)?.children().iter().rev().copied());
        }
        Ok(out)
    }

    /// Returns the ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut cursor = self.node(id)?.parent();
        while let Some(next) = cursor {
            out.push(next);
            cursor = self.node(next)?.parent();
        }
        Ok(out)
    }
}
