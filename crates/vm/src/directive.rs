//! Directive registry and the built-in directives.
//!
//! A directive maps an attribute name to a handler. The registry is built
//! once, frozen, and shared by every view-model compiled against it.

use crate::compile::{self, Traversal};
use crate::view_model::{BindingProps, ViewModel};
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use tracing::{debug, warn};
use weft_core::{Error, Result, Value};
use weft_dom::{NodeKind, NodeRef};
use weft_expr::Expression;

/// Attribute of the list-repeat directive.
pub const REPEAT: &str = "vm-repeat";

/// Attribute of the two-way model directive.
pub const MODEL: &str = "vm-model";

/// Directive handler, called with the node and the attribute's value.
pub type Handler = Rc<dyn Fn(&ViewModel, NodeRef, &str) -> Result<Traversal>>;

/// A registered directive.
#[derive(Clone)]
pub struct Directive {
    name: String,
    handler: Handler,
}

impl Directive {
    /// Returns the attribute name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the handler.
    pub fn handle(&self, vm: &ViewModel, node: NodeRef, expression: &str) -> Result<Traversal> {
        (self.handler)(vm, node, expression)
    }
}

impl core::fmt::Debug for Directive {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Directive").field("name", &self.name).finish()
    }
}

/// Ordered, immutable set of directives.
#[derive(Debug, Default)]
pub struct DirectiveRegistry {
    directives: Vec<Directive>,
}

impl DirectiveRegistry {
    /// Starts an empty registry.
    pub fn builder() -> DirectiveRegistryBuilder {
        DirectiveRegistryBuilder::default()
    }

    /// Returns a registry holding only the built-in directives.
    pub fn builtin() -> Rc<Self> {
        Self::builder().with_builtins().build()
    }

    /// Returns the directives in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.directives.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

/// Builder for `DirectiveRegistry`.
#[derive(Default)]
pub struct DirectiveRegistryBuilder {
    directives: Vec<Directive>,
}

impl DirectiveRegistryBuilder {
    /// Adds `vm-repeat` and `vm-model`, in that order.
    pub fn with_builtins(self) -> Self {
        self.register(REPEAT, repeat).register(MODEL, model)
    }

    /// Adds a directive. Registering a name again replaces the earlier
    /// handler and keeps its position.
    pub fn register<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&ViewModel, NodeRef, &str) -> Result<Traversal> + 'static,
    {
        let name = name.into().to_ascii_lowercase();
        let handler: Handler = Rc::new(handler);
        match self.directives.iter_mut().find(|d| d.name == name) {
            Some(existing) => {
                warn!(directive = %name, "directive registered twice, replacing handler");
                existing.handler = handler;
            }
            None => self.directives.push(Directive { name, handler }),
        }
        self
    }

    /// Freezes the registry.
    pub fn build(self) -> Rc<DirectiveRegistry> {
        Rc::new(DirectiveRegistry {
            directives: self.directives,
        })
    }
}

/// Splits `item in collection`.
///
/// The item must be a bare identifier and the collection a path expression,
/// which may itself contain quoted keys with spaces.
pub fn parse_repeat(expression: &str) -> Result<(&str, &str)> {
    let malformed = || Error::malformed_repeat(expression);
    let (item, rest) = expression
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(malformed)?;
    let collection = rest
        .trim_start()
        .strip_prefix("in")
        .filter(|tail| tail.starts_with(char::is_whitespace))
        .map(str::trim)
        .ok_or_else(malformed)?;

    let valid_item = Expression::parse(item)
        .map(|e| !e.is_call() && e.path().len() == 1)
        .unwrap_or(false);
    let valid_collection = Expression::parse(collection)
        .map(|e| !e.is_call())
        .unwrap_or(false);
    if valid_item && valid_collection {
        Ok((item, collection))
    } else {
        Err(malformed())
    }
}

/// Quotes an object key for use inside `['...']`.
fn quote_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 2);
    out.push('\'');
    for c in key.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// `vm-repeat="item in collection"`: replaces the contents of the node's
/// parent with one copy of the node per element of the collection, each
/// with `item` rewritten to an indexed access, then compiles the parent.
///
/// The expansion happens once; it does not follow later changes to the
/// collection's length.
fn repeat(vm: &ViewModel, node: NodeRef, expression: &str) -> Result<Traversal> {
    let (item, collection) = parse_repeat(expression)?;
    let surface = vm.surface();
    let parent = surface
        .parent(node)?
        .ok_or_else(|| Error::handler(REPEAT, "repeated element has no parent"))?;
    let markup = surface.outer_markup(node)?;
    surface.clear_children(parent)?;

    let accessors: Vec<String> = match vm.exp(collection, None)? {
        Value::Array(items) => (0..items.len())
            .map(|idx| format!("{}[{}]", collection, idx))
            .collect(),
        Value::Object(obj) => obj
            .keys()
            .map(|key| format!("{}[{}]", collection, quote_key(key)))
            .collect(),
        _ => Vec::new(),
    };
    debug!(collection, items = accessors.len(), "expanding repeat");

    let template = weft_dom::markup::parse(&markup)?;
    let mut expanded = Vec::new();
    for accessor in &accessors {
        let copy = compile::substitute_fragments(&template, item, accessor, vm.registry());
        for child in surface.parse_fragment(&weft_dom::markup::serialize(&copy))? {
            surface.append_child(parent, child)?;
            expanded.push(child);
        }
    }

    // A document parent is not compiled itself, so compile the copies.
    if surface.kind(parent)? == NodeKind::Element {
        vm.compile(parent)?;
    } else {
        for child in expanded {
            vm.compile(child)?;
        }
    }
    Ok(Traversal::Stop)
}

/// `vm-model="path"`: two-way binds the node's `value` attribute, writing
/// back on `input` events.
fn model(vm: &ViewModel, node: NodeRef, expression: &str) -> Result<Traversal> {
    let props = BindingProps::attribute("value").with_event("input");
    vm.bind_dom(node, expression, &props, true, None)?;
    Ok(Traversal::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let registry = DirectiveRegistry::builtin();
        let names: Vec<&str> = registry.iter().map(|d| d.name()).collect();
        assert_eq!(names, [REPEAT, MODEL]);
    }

    #[test]
    fn test_register_replaces_in_place() {
        let registry = DirectiveRegistry::builder()
            .with_builtins()
            .register("VM-Text", |_, _, _| Ok(Traversal::Continue))
            .register(REPEAT, |_, _, _| Ok(Traversal::Stop))
            .build();
        let names: Vec<&str> = registry.iter().map(|d| d.name()).collect();
        assert_eq!(names, [REPEAT, MODEL, "vm-text"]);
        assert!(registry.contains("vm-text"));
    }

    #[test]
    fn test_parse_repeat() {
        assert_eq!(parse_repeat("fruit in fruits").unwrap(), ("fruit", "fruits"));
        assert_eq!(
            parse_repeat("  tag in user.tags ").unwrap(),
            ("tag", "user.tags")
        );
        assert_eq!(
            parse_repeat("item in groups['a b'].items").unwrap(),
            ("item", "groups['a b'].items")
        );
        for bad in [
            "fruit of fruits",
            "fruits",
            "a in b c",
            "in fruits",
            "a.b in c",
            "f() in c",
            "a in f()",
            "a inside",
            "",
        ] {
            assert!(
                matches!(parse_repeat(bad), Err(Error::MalformedRepeat { .. })),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_quote_key() {
        assert_eq!(quote_key("red"), "'red'");
        assert_eq!(quote_key("it's"), r"'it\'s'");
        assert_eq!(quote_key(r"a\b"), r"'a\\b'");

        let accessor = format!("groups[{}]", quote_key("it's"));
        let parsed = Expression::parse(&accessor).unwrap();
        assert_eq!(
            parsed.path().segments().last(),
            Some(&weft_core::Segment::Field("it's".into()))
        );
    }
}
