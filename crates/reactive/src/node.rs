//! Observable nodes.
//!
//! An `ObservableNode` stands for one property of the data tree (or one
//! computed property). It carries the node's place in the graph, the value
//! captured at its last write, and the observers to call when it is notified.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use weft_core::{Path, Result, Value};

/// Unique identifier for an observable node.
pub type NodeId = u64;

/// Global node ID counter. IDs are never reused, across graphs included.
static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(0);

/// Gets the next unique node ID.
pub fn next_node_id() -> NodeId {
    NEXT_NODE_ID.fetch_add(1, Ordering::SeqCst)
}

/// Callback invoked with `(context, current, previous)` when a node is notified.
///
/// An `Err` stops the cascade that invoked it.
pub type Observer<C> = Rc<dyn Fn(&C, &Value, &Value) -> Result<()>>;

/// Where the current value of a node is read from.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeSource {
    /// The whole data tree.
    Root,
    /// The data value at a path from the data root.
    Data(Path),
    /// A computed property, by name.
    Computed(String),
}

/// One reactive property.
pub struct ObservableNode<C> {
    id: NodeId,
    key: String,
    source: NodeSource,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    observers: Vec<Observer<C>>,
    previous: Option<Value>,
}

impl<C> ObservableNode<C> {
    /// Creates a detached node with a fresh ID.
    pub fn new(key: impl Into<String>, source: NodeSource) -> Self {
        Self {
            id: next_node_id(),
            key: key.into(),
            source,
            parent: None,
            children: Vec::new(),
            observers: Vec::new(),
            previous: None,
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the key this node owns in its parent.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn source(&self) -> &NodeSource {
        &self.source
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the children in registration order.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns the observers in registration order.
    #[inline]
    pub fn observers(&self) -> &[Observer<C>] {
        &self.observers
    }

    /// Returns the value captured at the last write, if the node was written.
    #[inline]
    pub fn previous(&self) -> Option<&Value> {
        self.previous.as_ref()
    }

    /// Records the value replaced by a write.
    pub fn set_previous(&mut self, value: Value) {
        self.previous = Some(value);
    }

    /// Appends an observer. Registering the same callback twice makes it fire twice.
    pub fn observe(&mut self, observer: Observer<C>) {
        self.observers.push(observer);
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: NodeId) {
        self.children.retain(|&id| id != child);
    }
}

impl<C> fmt::Debug for ObservableNode<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableNode")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("source", &self.source)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("observers", &self.observers.len())
            .field("previous", &self.previous)
            .finish()
    }
}
