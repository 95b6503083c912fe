//! Weft Reactive - Observable property graph for Weft view-models.
//!
//! This crate turns a data tree into a graph of observable nodes, one per
//! property, and propagates notifications through it when data changes.
//!
//! # Core Concepts
//!
//! - `ObservableNode`: One property with its observers and graph position
//! - `ObservableGraph`: The id table plus parent/child links mirroring the data
//! - `GraphBuilder`: Walks data into the graph, one node per member
//! - `ReactiveContext`: The owner of a graph; provides the notification cascade
//!
//! # Cascade
//!
//! A write to a property runs `notify_all`: every descendant in pre-order,
//! then the node itself, then its ancestors up to the root. Everything runs
//! synchronously and an observer error aborts the rest of the cascade.
//!
//! # Example
//!
//! ```rust
//! use core::cell::RefCell;
//! use std::rc::Rc;
//! use weft_core::{Object, Result, Value};
//! use weft_reactive::{GraphBuilder, NodeSource, ObservableGraph, ReactiveContext};
//!
//! struct Model {
//!     graph: RefCell<ObservableGraph<Model>>,
//!     data: Value,
//! }
//!
//! impl ReactiveContext for Model {
//!     fn graph(&self) -> &RefCell<ObservableGraph<Self>> {
//!         &self.graph
//!     }
//!
//!     fn node_value(&self, source: &NodeSource) -> Result<Value> {
//!         Ok(match source {
//!             NodeSource::Data(path) => self.data.get_path(path).cloned().unwrap_or_default(),
//!             _ => self.data.clone(),
//!         })
//!     }
//! }
//!
//! let mut data = Object::new();
//! data.insert("count", Value::from(1));
//! let data = Value::Object(data);
//!
//! let mut graph = ObservableGraph::new();
//! GraphBuilder::new(&mut graph).observe_root(&data).unwrap();
//! let model = Model { graph: RefCell::new(graph), data };
//!
//! let root = model.graph.borrow().root();
//! model.graph.borrow_mut().observe(root, Rc::new(|_: &Model, current: &Value, _: &Value| {
//!     assert!(current.get("count").is_some());
//!     Ok(())
//! })).unwrap();
//! model.notify_all(root).unwrap();
//! ```

#![no_std]

extern crate alloc;

pub mod builder;
pub mod graph;
pub mod node;
pub mod notify;

pub use builder::GraphBuilder;
pub use graph::{ObservableGraph, ROOT_KEY};
pub use node::{next_node_id, NodeId, NodeSource, ObservableNode, Observer};
pub use notify::ReactiveContext;
