//! View-model configuration.

use crate::view_model::ViewModel;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use weft_core::{Object, Result, Value};
use weft_dom::NodeRef;
use weft_reactive::Observer;

/// A method or computed property body. It runs with the view-model as scope.
pub type Method = Rc<dyn Fn(&ViewModel) -> Result<Value>>;

/// A watch callback, invoked with `(view_model, current, previous)`.
pub type Watcher = Observer<ViewModel>;

/// Construction-time configuration of a view-model.
///
/// # Example
///
/// ```rust
/// use weft_core::{Object, Value};
/// use weft_vm::Options;
///
/// let mut data = Object::new();
/// data.insert("count", Value::from(1));
///
/// let options = Options::new()
///     .data(data)
///     .method("hello", |_vm| Ok(Value::from("Hello, world!")))
///     .computed("double", |vm| {
///         let count = vm.get("count")?.as_f64().unwrap_or(0.0);
///         Ok(Value::from(count * 2.0))
///     });
/// assert_eq!(options.methods().len(), 1);
/// ```
#[derive(Clone)]
pub struct Options {
    data: Value,
    methods: Vec<(String, Method)>,
    computed: Vec<(String, Method)>,
    watch: Vec<(String, Watcher)>,
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl Options {
    /// Creates options with empty data and no methods, computed properties or watches.
    pub fn new() -> Self {
        Self {
            data: Value::Object(Object::new()),
            methods: Vec::new(),
            computed: Vec::new(),
            watch: Vec::new(),
        }
    }

    /// Sets the data tree observed by the view-model.
    pub fn data(mut self, data: impl Into<Value>) -> Self {
        self.data = data.into();
        self
    }

    /// Adds a method callable from expressions as `name()`.
    pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&ViewModel) -> Result<Value> + 'static,
    {
        self.methods.push((name.into(), Rc::new(method)));
        self
    }

    /// Adds a computed property readable from expressions as `name`.
    pub fn computed<F>(mut self, name: impl Into<String>, computed: F) -> Self
    where
        F: Fn(&ViewModel) -> Result<Value> + 'static,
    {
        self.computed.push((name.into(), Rc::new(computed)));
        self
    }

    /// Watches the node at `expression` (or `$root`).
    pub fn watch<F>(mut self, expression: impl Into<String>, watcher: F) -> Self
    where
        F: Fn(&ViewModel, &Value, &Value) -> Result<()> + 'static,
    {
        self.watch.push((expression.into(), Rc::new(watcher)));
        self
    }

    #[inline]
    pub fn data_value(&self) -> &Value {
        &self.data
    }

    #[inline]
    pub fn methods(&self) -> &[(String, Method)] {
        &self.methods
    }

    #[inline]
    pub fn computed_properties(&self) -> &[(String, Method)] {
        &self.computed
    }

    #[inline]
    pub fn watches(&self) -> &[(String, Watcher)] {
        &self.watch
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Value,
        Vec<(String, Method)>,
        Vec<(String, Method)>,
        Vec<(String, Watcher)>,
    ) {
        (self.data, self.methods, self.computed, self.watch)
    }
}

/// Where a view-model is mounted.
#[derive(Clone, Debug, PartialEq)]
pub enum Mount {
    /// A selector resolved against the surface's document.
    Selector(String),
    /// A node of the surface.
    Node(NodeRef),
}

impl From<&str> for Mount {
    fn from(selector: &str) -> Self {
        Mount::Selector(selector.into())
    }
}

impl From<String> for Mount {
    fn from(selector: String) -> Self {
        Mount::Selector(selector)
    }
}

impl From<NodeRef> for Mount {
    fn from(node: NodeRef) -> Self {
        Mount::Node(node)
    }
}
