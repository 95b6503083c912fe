//! Weft Expr - Binding expressions for Weft templates.
//!
//! This crate implements the small expression language used by directives
//! and interpolations. Expressions are parsed into a typed path and evaluated
//! by walking an abstract `Scope`; no code is generated or executed.
//!
//! - `Expression`: A parsed path with an optional call suffix
//! - `Getter`: Reads an expression from a scope, absent paths read as null
//! - `Setter`: Assigns a value at an expression's path on a scope
//! - `Scope`: The object expressions are evaluated against
//!
//! # Example
//!
//! ```rust
//! use core::cell::RefCell;
//! use weft_core::{Object, Value};
//! use weft_expr::{Getter, Setter};
//!
//! let mut user = Object::new();
//! user.insert("username", Value::from("Username"));
//! let mut root = Object::new();
//! root.insert("user", Value::Object(user));
//! let scope = RefCell::new(Value::Object(root));
//!
//! Setter::compile("user.username").unwrap().set(&scope, "Alice".into()).unwrap();
//! let value = Getter::compile("user.username").unwrap().get(&scope).unwrap();
//! assert_eq!(value, Value::from("Alice"));
//! ```

#![no_std]

extern crate alloc;

mod eval;
mod parser;
mod scope;

pub use eval::{Getter, Setter};
pub use parser::{Expression, ParseError, ROOT_NAME};
pub use scope::Scope;
