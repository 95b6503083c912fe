//! The rendering surface contract.
//!
//! A `Surface` is the tree of nodes a view-model renders into. Handles are
//! plain `NodeRef` values; all methods take `&self` so one surface can be
//! shared behind an `Rc` by the view-model and every listener it installs.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use weft_core::Result;

/// Handle to a node of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(usize);

impl NodeRef {
    /// Creates a handle from a surface-specific index.
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Node type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element,
    Text,
    Comment,
}

/// An event delivered to listeners.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Event name, e.g. `input`.
    pub name: String,
    /// The node the event was dispatched on.
    pub target: NodeRef,
}

/// Event listener. An `Err` is returned to whoever dispatched the event.
pub type Listener = Rc<dyn Fn(&Event) -> Result<()>>;

/// A tree of addressable nodes.
pub trait Surface {
    /// Returns the document node, the root of every selector lookup.
    fn document(&self) -> NodeRef;

    fn kind(&self, node: NodeRef) -> Result<NodeKind>;

    /// Returns the lowercased tag name of an element.
    fn tag_name(&self, node: NodeRef) -> Result<Option<String>>;

    fn attribute(&self, node: NodeRef, name: &str) -> Result<Option<String>>;

    /// Returns attribute names in document order.
    fn attribute_names(&self, node: NodeRef) -> Result<Vec<String>>;

    fn set_attribute(&self, node: NodeRef, name: &str, value: &str) -> Result<()>;

    fn remove_attribute(&self, node: NodeRef, name: &str) -> Result<()>;

    /// Returns the markup of a node's children.
    fn inner_markup(&self, node: NodeRef) -> Result<String>;

    /// Returns the markup of a node and its descendants.
    fn outer_markup(&self, node: NodeRef) -> Result<String>;

    /// Replaces a node's children with a single text node holding `text`.
    fn set_text(&self, node: NodeRef, text: &str) -> Result<()>;

    /// Returns the concatenated text of a node's descendants.
    fn text_content(&self, node: NodeRef) -> Result<String>;

    fn children(&self, node: NodeRef) -> Result<Vec<NodeRef>>;

    fn parent(&self, node: NodeRef) -> Result<Option<NodeRef>>;

    /// Moves `child` to the end of `parent`'s children.
    fn append_child(&self, parent: NodeRef, child: NodeRef) -> Result<()>;

    /// Detaches every child of `node`.
    fn clear_children(&self, node: NodeRef) -> Result<()>;

    fn add_event_listener(&self, node: NodeRef, event: &str, listener: Listener) -> Result<()>;

    /// Finds the first element in document order matching `selector`.
    fn query_selector(&self, selector: &str) -> Result<Option<NodeRef>>;

    /// Parses markup into detached nodes.
    fn parse_fragment(&self, markup: &str) -> Result<Vec<NodeRef>>;
}
