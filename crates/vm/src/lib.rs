//! Weft VM - Reactive view-models for markup surfaces.
//!
//! A `ViewModel` observes a data tree, compiles a surface subtree and keeps
//! the rendered output in step with the data. Bindings come from directive
//! attributes (`vm-repeat`, `vm-model`, or custom ones) and from elements
//! whose whole content is one `{{ expression }}`.
//!
//! # Core Concepts
//!
//! - `Options`: Data, methods, computed properties and watches
//! - `DirectiveRegistry`: Ordered attribute handlers, shared by view-models
//! - `ViewModel`: The façade: `notify`, `compile`, `bind_dom`, `exp`
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use weft_core::{Object, Value};
//! use weft_dom::{MemorySurface, Surface};
//! use weft_vm::{DirectiveRegistry, Options, ViewModel};
//!
//! let surface = Rc::new(
//!     MemorySurface::from_markup(r#"<div id="app"><input vm-model="name"><p>{{ name }}</p></div>"#)
//!         .unwrap(),
//! );
//!
//! let mut data = Object::new();
//! data.insert("name", Value::from("Username"));
//! let vm = ViewModel::new(
//!     surface.clone(),
//!     "#app",
//!     Options::new().data(data),
//!     DirectiveRegistry::builtin(),
//! )
//! .unwrap();
//!
//! let input = surface.query_selector("input").unwrap().unwrap();
//! surface.dispatch(input, "input", Some("Alice")).unwrap();
//!
//! let p = surface.query_selector("p").unwrap().unwrap();
//! assert_eq!(surface.text_content(p).unwrap(), "Alice");
//! assert_eq!(vm.get("name").unwrap(), Value::from("Alice"));
//! ```

#![no_std]

extern crate alloc;

mod compile;
pub mod directive;
mod options;
mod view_model;

pub use compile::{interpolation, substitute_expression, Traversal};
pub use directive::{Directive, DirectiveRegistry, DirectiveRegistryBuilder, Handler, MODEL, REPEAT};
pub use options::{Method, Mount, Options, Watcher};
pub use view_model::{BindingProps, BindingTarget, ViewModel};

// Re-export commonly used types from dependencies
pub use weft_core::{Error, Object, Result, Value};
pub use weft_dom::{NodeRef, Surface};
pub use weft_expr::Scope;
pub use weft_reactive::ReactiveContext;
