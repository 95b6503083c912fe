//! Weft DOM - Rendering surfaces for Weft view-models.
//!
//! The view-model never touches a concrete document. It renders through the
//! `Surface` trait, which covers what bindings need: attributes, text
//! content, child lists, events, selector lookup and markup round-trips.
//!
//! `MemorySurface` is an arena-backed implementation with its own markup
//! parser, used by tests, benchmarks and the demo application.
//!
//! # Example
//!
//! ```rust
//! use weft_dom::{MemorySurface, Surface};
//!
//! let surface = MemorySurface::from_markup(r#"<div id="app"><p>hi</p></div>"#).unwrap();
//! let app = surface.query_selector("#app").unwrap().unwrap();
//! assert_eq!(surface.inner_markup(app).unwrap(), "<p>hi</p>");
//! ```

#![no_std]

extern crate alloc;

pub mod markup;
mod memory;
mod selector;
mod surface;

pub use memory::MemorySurface;
pub use selector::Selector;
pub use surface::{Event, Listener, NodeKind, NodeRef, Surface};
