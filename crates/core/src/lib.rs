//! Weft Core - Data model and error types for Weft view-models.
//!
//! This crate provides the foundational types shared by every Weft crate:
//!
//! - `Value`: Plain data (null, booleans, numbers, strings, arrays, objects)
//! - `Object`: An object whose keys keep insertion order
//! - `Path`: A parsed data path such as `user.tags[0]`
//! - `Error`: Error types for expression, graph and surface operations
//!
//! # Example
//!
//! ```rust
//! use weft_core::{Object, Path, Segment, Value};
//!
//! let mut user = Object::new();
//! user.insert("username", Value::from("Username"));
//!
//! let mut root = Object::new();
//! root.insert("user", Value::Object(user));
//! let mut data = Value::Object(root);
//!
//! let path = Path::from(vec![
//!     Segment::Field("user".into()),
//!     Segment::Field("username".into()),
//! ]);
//! let old = data.set_path(&path, Value::from("Alice")).unwrap();
//!
//! assert_eq!(old, Value::from("Username"));
//! assert_eq!(data.get_path(&path).map(Value::render), Some("Alice".into()));
//! ```

#![no_std]

extern crate alloc;

mod error;
mod path;
#[cfg(feature = "serde")]
mod serde_impl;
mod value;

pub use error::{Error, Result};
pub use path::{Path, Segment};
pub use value::{Object, Value};
