//! Notification cascade.
//!
//! `ReactiveContext` is implemented by whatever owns an `ObservableGraph` and
//! can read node values, usually the view-model. The graph is only borrowed
//! long enough to copy out the data a step needs, so observers are free to
//! register observers, write data or trigger further notifications.

use crate::graph::ObservableGraph;
use crate::node::{NodeId, NodeSource};
use core::cell::RefCell;
use tracing::trace;
use weft_core::{Error, Result, Value};

/// Owner of an observable graph.
pub trait ReactiveContext: Sized {
    /// Returns the graph whose nodes this context notifies.
    fn graph(&self) -> &RefCell<ObservableGraph<Self>>;

    /// Reads the current value of a node.
    fn node_value(&self, source: &NodeSource) -> Result<Value>;

    /// Invokes every observer of `id` in registration order with the node's
    /// current value and the value captured at its last write. A node that was
    /// never written passes its current value as both.
    fn notify(&self, id: NodeId) -> Result<()> {
        let (source, previous, observers) = {
            let graph = self.graph().borrow();
            let node = graph.get(id).ok_or_else(|| Error::node_not_found(id))?;
            (
                node.source().clone(),
                node.previous().cloned(),
                node.observers().to_vec(),
            )
        };
        if observers.is_empty() {
            return Ok(());
        }

        let current = self.node_value(&source)?;
        let previous = previous.unwrap_or_else(|| current.clone());
        trace!(node = id, observers = observers.len(), "notify");
        for observer in observers {
            observer(self, &current, &previous)?;
        }
        Ok(())
    }

    /// Notifies every descendant of `id` in pre-order: each child before its
    /// own children, siblings in registration order.
    fn notify_children(&self, id: NodeId) -> Result<()> {
        let children = self.graph().borrow().children_of(id)?;
        for child in children {
            self.notify(child)?;
            self.notify_children(child)?;
        }
        Ok(())
    }

    /// Notifies the ancestors of `id`, nearest first, ending at the root.
    fn notify_parent(&self, id: NodeId) -> Result<()> {
        let mut cursor = self.graph().borrow().parent_of(id)?;
        while let Some(parent) = cursor {
            self.notify(parent)?;
            cursor = self.graph().borrow().parent_of(parent)?;
        }
        Ok(())
    }

    /// The write cascade: descendants, then `id`, then ancestors.
    fn notify_all(&self, id: NodeId) -> Result<()> {
        self.notify_children(id)?;
        self.notify(id)?;
        self.notify_parent(id)
    }

    /// Notifies every node of the graph once, in creation order, without
    /// cascading.
    fn notify_every(&self) -> Result<()> {
        let ids = self.graph().borrow().node_ids();
        for id in ids {
            self.notify(id)?;
        }
        Ok(())
    }
}
