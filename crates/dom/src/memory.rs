//! In-memory surface.
//!
//! `MemorySurface` keeps its nodes in an arena indexed by `NodeRef`. Nodes
//! are never freed: detached nodes stay in the arena and keep their handles
//! valid, which keeps stale handles held by bindings harmless. Content
//! writes reuse a lone text child, so re-rendering a binding does not grow
//! the arena.

use crate::markup::{
    self, escape_text, is_void, write_close_tag, write_comment, write_open_tag, Fragment,
};
use crate::selector::Selector;
use crate::surface::{Event, Listener, NodeKind, NodeRef, Surface};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;
use tracing::trace;
use weft_core::{Error, Result};

enum Data {
    Document,
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
}

struct Node {
    data: Data,
    parent: Option<usize>,
    children: Vec<usize>,
    listeners: Vec<(String, Listener)>,
}

impl Node {
    fn new(data: Data) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
            listeners: Vec::new(),
        }
    }
}

/// A surface backed by an in-memory node arena.
pub struct MemorySurface {
    nodes: RefCell<Vec<Node>>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// Creates a surface holding an empty document.
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(alloc::vec![Node::new(Data::Document)]),
        }
    }

    /// Creates a surface whose document holds the parsed `markup`.
    pub fn from_markup(markup: &str) -> Result<Self> {
        let surface = Self::new();
        surface.load(markup)?;
        Ok(surface)
    }

    /// Parses `markup` and appends it to the document.
    pub fn load(&self, markup: &str) -> Result<()> {
        let document = self.document();
        for node in self.parse_fragment(markup)? {
            self.append_child(document, node)?;
        }
        Ok(())
    }

    /// Returns the number of nodes in the arena, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Always false: the document node is never removed.
    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// Returns every element in document order matching `selector`.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeRef>> {
        let selector = Selector::parse(selector)?;
        let nodes = self.nodes.borrow();
        let mut found = Vec::new();
        let mut stack = alloc::vec![0usize];
        while let Some(idx) = stack.pop() {
            let node = &nodes[idx];
            if let Data::Element { tag, attributes } = &node.data {
                let attribute = |name: &str| {
                    attributes
                        .iter()
                        .find(|(n, _)| n == name)
                        .map(|(_, v)| v.as_str())
                };
                if selector.matches(tag, attribute) {
                    found.push(NodeRef::new(idx));
                }
            }
            stack.extend(node.children.iter().rev());
        }
        Ok(found)
    }

    /// Dispatches `event` on `node`.
    ///
    /// For input-style events `value` is stored in the node's `value`
    /// attribute first, as a user edit would. Listeners run in registration
    /// order; the first error stops dispatch and is returned.
    pub fn dispatch(&self, node: NodeRef, event: &str, value: Option<&str>) -> Result<()> {
        if let Some(value) = value {
            self.set_attribute(node, "value", value)?;
        }

        let listeners: Vec<Listener> = {
            let nodes = self.nodes.borrow();
            let data = nodes
                .get(node.index())
                .ok_or_else(|| Error::surface_node_not_found(node.index() as u64))?;
            data.listeners
                .iter()
                .filter(|(name, _)| name == event)
                .map(|(_, listener)| listener.clone())
                .collect()
        };

        trace!(node = node.index(), event, listeners = listeners.len(), "dispatch");
        let event = Event {
            name: event.to_string(),
            target: node,
        };
        for listener in listeners {
            listener(&event)?;
        }
        Ok(())
    }

    fn check(&self, node: NodeRef) -> Result<usize> {
        if node.index() < self.nodes.borrow().len() {
            Ok(node.index())
        } else {
            Err(Error::surface_node_not_found(node.index() as u64))
        }
    }

    fn with_element<T>(
        &self,
        node: NodeRef,
        f: impl FnOnce(&mut Vec<(String, String)>) -> T,
    ) -> Result<Option<T>> {
        let idx = self.check(node)?;
        let mut nodes = self.nodes.borrow_mut();
        match &mut nodes[idx].data {
            Data::Element { attributes, .. } => Ok(Some(f(attributes))),
            _ => Ok(None),
        }
    }

    fn detach(nodes: &mut [Node], child: usize) {
        if let Some(parent) = nodes[child].parent.take() {
            nodes[parent].children.retain(|&c| c != child);
        }
    }

    fn insert(&self, fragment: Fragment) -> usize {
        let (data, children) = match fragment {
            Fragment::Element {
                tag,
                attributes,
                children,
            } => (Data::Element { tag, attributes }, children),
            Fragment::Text(text) => (Data::Text(text), Vec::new()),
            Fragment::Comment(text) => (Data::Comment(text), Vec::new()),
        };

        let idx = {
            let mut nodes = self.nodes.borrow_mut();
            nodes.push(Node::new(data));
            nodes.len() - 1
        };
        for child in children {
            let child_idx = self.insert(child);
            let mut nodes = self.nodes.borrow_mut();
            nodes[child_idx].parent = Some(idx);
            nodes[idx].children.push(child_idx);
        }
        idx
    }

    fn serialize(nodes: &[Node], idx: usize, out: &mut String) {
        let node = &nodes[idx];
        match &node.data {
            Data::Document => Self::serialize_children(nodes, idx, out),
            Data::Text(text) => out.push_str(&escape_text(text)),
            Data::Comment(text) => write_comment(text, out),
            Data::Element { tag, attributes } => {
                write_open_tag(tag, attributes, out);
                if !is_void(tag) {
                    Self::serialize_children(nodes, idx, out);
                    write_close_tag(tag, out);
                }
            }
        }
    }

    fn serialize_children(nodes: &[Node], idx: usize, out: &mut String) {
        for &child in &nodes[idx].children {
            Self::serialize(nodes, child, out);
        }
    }

    fn collect_text(nodes: &[Node], idx: usize, out: &mut String) {
        match &nodes[idx].data {
            Data::Text(text) => out.push_str(text),
            Data::Comment(_) => {}
            _ => {
                for &child in &nodes[idx].children {
                    Self::collect_text(nodes, child, out);
                }
            }
        }
    }
}

impl Surface for MemorySurface {
    fn document(&self) -> NodeRef {
        NodeRef::new(0)
    }

    fn kind(&self, node: NodeRef) -> Result<NodeKind> {
        let idx = self.check(node)?;
        Ok(match self.nodes.borrow()[idx].data {
            Data::Document => NodeKind::Document,
            Data::Element { .. } => NodeKind::Element,
            Data::Text(_) => NodeKind::Text,
            Data::Comment(_) => NodeKind::Comment,
        })
    }

    fn tag_name(&self, node: NodeRef) -> Result<Option<String>> {
        let idx = self.check(node)?;
        Ok(match &self.nodes.borrow()[idx].data {
            Data::Element { tag, .. } => Some(tag.clone()),
            _ => None,
        })
    }

    fn attribute(&self, node: NodeRef, name: &str) -> Result<Option<String>> {
        Ok(self
            .with_element(node, |attributes| {
                attributes
                    .iter()
                    .find(|(n, _)| n == name)
                    .map(|(_, v)| v.clone())
            })?
            .flatten())
    }

    fn attribute_names(&self, node: NodeRef) -> Result<Vec<String>> {
        Ok(self
            .with_element(node, |attributes| {
                attributes.iter().map(|(n, _)| n.clone()).collect()
            })?
            .unwrap_or_default())
    }

    fn set_attribute(&self, node: NodeRef, name: &str, value: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let updated = self.with_element(node, |attributes| {
            match attributes.iter_mut().find(|(n, _)| *n == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => attributes.push((name.clone(), value.to_string())),
            }
        })?;
        match updated {
            Some(()) => Ok(()),
            None => Err(Error::markup(
                format!("Cannot set attribute '{}' on a non-element node", name),
                0,
            )),
        }
    }

    fn remove_attribute(&self, node: NodeRef, name: &str) -> Result<()> {
        self.with_element(node, |attributes| attributes.retain(|(n, _)| n != name))?;
        Ok(())
    }

    fn inner_markup(&self, node: NodeRef) -> Result<String> {
        let idx = self.check(node)?;
        let mut out = String::new();
        Self::serialize_children(&self.nodes.borrow(), idx, &mut out);
        Ok(out)
    }

    fn outer_markup(&self, node: NodeRef) -> Result<String> {
        let idx = self.check(node)?;
        let mut out = String::new();
        Self::serialize(&self.nodes.borrow(), idx, &mut out);
        Ok(out)
    }

    fn set_text(&self, node: NodeRef, text: &str) -> Result<()> {
        let idx = self.check(node)?;
        {
            let mut nodes = self.nodes.borrow_mut();
            if let [only] = nodes[idx].children.as_slice() {
                let only = *only;
                if let Data::Text(existing) = &mut nodes[only].data {
                    existing.clear();
                    existing.push_str(text);
                    return Ok(());
                }
            }
        }
        let text_node = self.insert(Fragment::Text(text.to_string()));
        self.clear_children(node)?;
        self.append_child(node, NodeRef::new(text_node))
    }

    fn text_content(&self, node: NodeRef) -> Result<String> {
        let idx = self.check(node)?;
        let mut out = String::new();
        Self::collect_text(&self.nodes.borrow(), idx, &mut out);
        Ok(out)
    }

    fn children(&self, node: NodeRef) -> Result<Vec<NodeRef>> {
        let idx = self.check(node)?;
        Ok(self.nodes.borrow()[idx]
            .children
            .iter()
            .map(|&c| NodeRef::new(c))
            .collect())
    }

    fn parent(&self, node: NodeRef) -> Result<Option<NodeRef>> {
        let idx = self.check(node)?;
        Ok(self.nodes.borrow()[idx].parent.map(NodeRef::new))
    }

    fn append_child(&self, parent: NodeRef, child: NodeRef) -> Result<()> {
        let parent = self.check(parent)?;
        let child = self.check(child)?;
        let mut nodes = self.nodes.borrow_mut();

        if matches!(nodes[parent].data, Data::Text(_) | Data::Comment(_)) {
            return Err(Error::markup("Cannot append to a text or comment node", 0));
        }
        let mut cursor = Some(parent);
        while let Some(idx) = cursor {
            if idx == child {
                return Err(Error::markup("Cannot append a node to its own subtree", 0));
            }
            cursor = nodes[idx].parent;
        }

        Self::detach(&mut nodes, child);
        nodes[child].parent = Some(parent);
        nodes[parent].children.push(child);
        Ok(())
    }

    fn clear_children(&self, node: NodeRef) -> Result<()> {
        let idx = self.check(node)?;
        let mut nodes = self.nodes.borrow_mut();
        let children = core::mem::take(&mut nodes[idx].children);
        for child in children {
            nodes[child].parent = None;
        }
        Ok(())
    }

    fn add_event_listener(&self, node: NodeRef, event: &str, listener: Listener) -> Result<()> {
        let idx = self.check(node)?;
        self.nodes.borrow_mut()[idx]
            .listeners
            .push((event.to_string(), listener));
        Ok(())
    }

    fn query_selector(&self, selector: &str) -> Result<Option<NodeRef>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    fn parse_fragment(&self, markup: &str) -> Result<Vec<NodeRef>> {
        Ok(markup::parse(markup)?
            .into_iter()
            .map(|fragment| NodeRef::new(self.insert(fragment)))
            .collect())
    }
}
