//! The view-model.
//!
//! `ViewModel` owns the data tree, its observable graph and the bindings
//! between graph nodes and surface nodes. It is a cheap handle: clones share
//! the same state.

use crate::compile;
use crate::directive::DirectiveRegistry;
use crate::options::{Method, Mount, Options};
use alloc::format;
use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;
use tracing::{debug, warn};
use weft_core::{Error, Path, Result, Segment, Value};
use weft_dom::{Event, NodeRef, Surface};
use weft_expr::{Expression, Getter, Scope, Setter, ROOT_NAME};
use weft_reactive::{GraphBuilder, NodeId, NodeSource, ObservableGraph, Observer, ReactiveContext};

/// The part of a surface node a binding writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingTarget {
    /// The node's children, replaced by one text node.
    Content,
    /// A named attribute.
    Attribute(String),
}

/// Where a binding renders and, for two-way bindings, which event writes back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingProps {
    pub target: BindingTarget,
    pub event: Option<String>,
}

impl BindingProps {
    /// Event used by two-way bindings that do not name one.
    pub const DEFAULT_EVENT: &'static str = "input";

    /// Binds the node's content.
    pub fn content() -> Self {
        Self {
            target: BindingTarget::Content,
            event: None,
        }
    }

    /// Binds an attribute.
    pub fn attribute(name: impl Into<String>) -> Self {
        Self {
            target: BindingTarget::Attribute(name.into()),
            event: None,
        }
    }

    /// Sets the write-back event.
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    fn write(&self, surface: &dyn Surface, node: NodeRef, value: &Value) -> Result<()> {
        let text = value.render();
        match &self.target {
            BindingTarget::Content => surface.set_text(node, &text),
            BindingTarget::Attribute(name) => surface.set_attribute(node, name, &text),
        }
    }

    fn read(&self, surface: &dyn Surface, node: NodeRef) -> Result<String> {
        match &self.target {
            BindingTarget::Content => surface.text_content(node),
            BindingTarget::Attribute(name) => Ok(surface.attribute(node, name)?.unwrap_or_default()),
        }
    }
}

struct Inner {
    surface: Rc<dyn Surface>,
    registry: Rc<DirectiveRegistry>,
    data: RefCell<Value>,
    methods: Vec<(String, Method)>,
    computed: Vec<(String, Method)>,
    graph: RefCell<ObservableGraph<ViewModel>>,
}

/// A reactive view-model bound to a surface.
#[derive(Clone)]
pub struct ViewModel {
    inner: Rc<Inner>,
}

impl ViewModel {
    /// Builds a view-model and compiles its mount point.
    ///
    /// The data tree is observed first, then methods and computed properties
    /// are installed, then watches are attached. A watch whose expression does
    /// not resolve to a node is skipped with a warning. Compilation errors are
    /// returned.
    pub fn new(
        surface: Rc<dyn Surface>,
        mount: impl Into<Mount>,
        options: Options,
        registry: Rc<DirectiveRegistry>,
    ) -> Result<Self> {
        let (data, methods, computed, watch) = options.into_parts();

        let mut graph = ObservableGraph::new();
        {
            let mut builder = GraphBuilder::new(&mut graph);
            builder.observe_root(&data)?;
            for (name, _) in &computed {
                builder.computed(name.clone());
            }
        }
        debug!(nodes = graph.len(), "observed data");

        let vm = ViewModel {
            inner: Rc::new(Inner {
                surface,
                registry,
                data: RefCell::new(data),
                methods,
                computed,
                graph: RefCell::new(graph),
            }),
        };

        for (expression, watcher) in watch {
            if let Some(id) = vm.resolve_node(&expression) {
                vm.inner.graph.borrow_mut().observe(id, watcher)?;
            }
        }

        vm.compile(mount)?;
        Ok(vm)
    }

    fn from_weak(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| ViewModel { inner })
    }

    /// Returns the surface this view-model renders into.
    #[inline]
    pub fn surface(&self) -> &dyn Surface {
        self.inner.surface.as_ref()
    }

    /// Returns the directive registry used by `compile`.
    #[inline]
    pub fn registry(&self) -> &DirectiveRegistry {
        &self.inner.registry
    }

    /// Returns a copy of the data tree.
    pub fn data(&self) -> Value {
        self.inner.data.borrow().clone()
    }

    /// Compiles the subtree at `mount`.
    pub fn compile(&self, mount: impl Into<Mount>) -> Result<()> {
        let node = match mount.into() {
            Mount::Node(node) => node,
            Mount::Selector(selector) => self
                .surface()
                .query_selector(&selector)?
                .ok_or_else(|| Error::selector_not_found(selector))?,
        };
        compile::compile_node(self, node)
    }

    /// Forces notifications.
    ///
    /// Without an expression every node notifies its own observers once.
    /// With one, the node it names runs the full write cascade. An
    /// expression that names no node does nothing.
    pub fn notify(&self, expression: Option<&str>) -> Result<()> {
        match expression {
            None => self.notify_every(),
            Some(expression) => match self.resolve_node(expression) {
                Some(id) => self.notify_all(id),
                None => Ok(()),
            },
        }
    }

    /// Evaluates `expression` against `scope`, the view-model by default.
    pub fn exp(&self, expression: &str, scope: Option<&dyn Scope>) -> Result<Value> {
        let getter = Getter::compile(expression)?;
        match scope {
            Some(scope) => getter.get(scope),
            None => getter.get(self),
        }
    }

    /// Reads `expression` from the view-model.
    pub fn get(&self, expression: &str) -> Result<Value> {
        self.exp(expression, None)
    }

    /// Writes `value` at `expression`, running the write cascade of the
    /// node it names.
    pub fn set(&self, expression: &str, value: impl Into<Value>) -> Result<()> {
        Setter::compile(expression)?.set(self, value.into())
    }

    /// Calls a method.
    pub fn call(&self, name: &str) -> Result<Value> {
        self.invoke(name)
    }

    /// Passes the current value at `expression` through the graph builder
    /// again, adding nodes for members that have none yet. Returns the
    /// number of nodes added.
    pub fn observe(&self, expression: &str) -> Result<usize> {
        let id = self
            .resolve_node(expression)
            .ok_or_else(|| Error::path_not_found(expression))?;
        let data = self.inner.data.borrow();
        let mut graph = self.inner.graph.borrow_mut();
        let before = graph.len();

        let source = graph
            .get(id)
            .map(|node| node.source().clone())
            .ok_or_else(|| Error::node_not_found(id))?;
        let mut builder = GraphBuilder::new(&mut *graph);
        match source {
            NodeSource::Root => {
                builder.observe_root(&data)?;
            }
            NodeSource::Data(path) => {
                if let Some(value) = data.get_path(&path) {
                    builder.observe(value, id, &path)?;
                }
            }
            NodeSource::Computed(_) => {}
        }
        Ok(graph.len() - before)
    }

    /// Locates the observable node named by `expression`.
    ///
    /// Failures are logged and reported as `None`: the caller binds without
    /// a reactive source.
    pub fn resolve_node(&self, expression: &str) -> Option<NodeId> {
        let expression = expression.trim();
        if expression == ROOT_NAME {
            return Some(self.inner.graph.borrow().root());
        }
        let parsed = match Expression::parse(expression) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(expression, error = %err.message, "cannot parse expression for observable");
                return None;
            }
        };
        if parsed.is_call() {
            warn!(expression, "call expressions have no observable");
            return None;
        }
        let found = self.inner.graph.borrow().resolve(parsed.path());
        if found.is_none() {
            warn!(expression, "no observable for expression");
        }
        found
    }

    /// Adds an observer to the node named by `expression`. Returns false if
    /// no node was found.
    pub fn watch<F>(&self, expression: &str, watcher: F) -> Result<bool>
    where
        F: Fn(&ViewModel, &Value, &Value) -> Result<()> + 'static,
    {
        match self.resolve_node(expression) {
            Some(id) => {
                self.inner.graph.borrow_mut().observe(id, Rc::new(watcher))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Binds `expression` to `node`.
    ///
    /// The target is written once from the current value. Unless the
    /// expression is a call, the node it names is resolved and every
    /// notification of that node writes the target again. For two-way
    /// bindings with a resolved node, the write-back event assigns the
    /// target's current text to the expression.
    pub fn bind_dom(
        &self,
        node: NodeRef,
        expression: &str,
        props: &BindingProps,
        two_way: bool,
        scope: Option<Rc<dyn Scope>>,
    ) -> Result<()> {
        let expression = expression.trim();
        let getter = Getter::compile(expression)?;
        let value = match &scope {
            Some(scope) => getter.get(scope.as_ref())?,
            None => getter.get(self)?,
        };
        props.write(self.surface(), node, &value)?;

        if getter.expression().is_call() {
            return Ok(());
        }
        let Some(id) = self.resolve_node(expression) else {
            return Ok(());
        };

        let observer: Observer<ViewModel> = {
            let props = props.clone();
            let scope = scope.clone();
            Rc::new(move |vm: &ViewModel, _: &Value, _: &Value| {
                let value = match &scope {
                    Some(scope) => getter.get(scope.as_ref())?,
                    None => getter.get(vm)?,
                };
                props.write(vm.surface(), node, &value)
            })
        };
        self.inner.graph.borrow_mut().observe(id, observer)?;

        if two_way {
            let setter = Setter::compile(expression)?;
            let event = props
                .event
                .clone()
                .unwrap_or_else(|| BindingProps::DEFAULT_EVENT.to_string());
            let props = props.clone();
            let weak = Rc::downgrade(&self.inner);
            self.surface().add_event_listener(
                node,
                &event,
                Rc::new(move |event: &Event| {
                    let Some(vm) = ViewModel::from_weak(&weak) else {
                        return Ok(());
                    };
                    let text = props.read(vm.surface(), event.target)?;
                    match &scope {
                        Some(scope) => setter.set(scope.as_ref(), Value::from(text)),
                        None => setter.set(&vm, Value::from(text)),
                    }
                }),
            )?;
        }
        Ok(())
    }

    fn method(&self, name: &str) -> Option<Method> {
        self.inner
            .methods
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| m.clone())
    }

    fn computed(&self, name: &str) -> Option<Method> {
        self.inner
            .computed
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| m.clone())
    }
}

impl core::fmt::Debug for ViewModel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ViewModel")
            .field("data", &self.inner.data.borrow())
            .field("nodes", &self.inner.graph.borrow().len())
            .field("directives", &self.inner.registry.len())
            .finish()
    }
}

impl ReactiveContext for ViewModel {
    fn graph(&self) -> &RefCell<ObservableGraph<Self>> {
        &self.inner.graph
    }

    fn node_value(&self, source: &NodeSource) -> Result<Value> {
        match source {
            NodeSource::Root => Ok(self.data()),
            NodeSource::Data(path) => Ok(self
                .inner
                .data
                .borrow()
                .get_path(path)
                .cloned()
                .unwrap_or_default()),
            NodeSource::Computed(name) => match self.computed(name) {
                Some(computed) => computed(self),
                None => Ok(Value::Null),
            },
        }
    }
}

/// Top-level names resolve to data properties first, then computed
/// properties; methods are only reachable through calls.
impl Scope for ViewModel {
    fn lookup(&self, name: &str) -> Result<Option<Value>> {
        if let Some(value) = self.inner.data.borrow().get(name) {
            return Ok(Some(value.clone()));
        }
        match self.computed(name) {
            Some(computed) => computed(self).map(Some),
            None => Ok(None),
        }
    }

    fn invoke(&self, name: &str) -> Result<Value> {
        match self.method(name) {
            Some(method) => method(self),
            None => Err(Error::not_callable(format!("{}()", name))),
        }
    }

    fn assign(&self, path: &Path, value: Value) -> Result<()> {
        if let Some(Segment::Field(name)) = path.head() {
            let owned_by_data = self.inner.data.borrow().get(name).is_some();
            if !owned_by_data && (self.computed(name).is_some() || self.method(name).is_some()) {
                return Err(Error::not_assignable(
                    path.to_string(),
                    "computed properties and methods are read-only",
                ));
            }
        }

        let previous = self.inner.data.borrow_mut().set_path(path, value)?;
        let node = self.inner.graph.borrow().resolve(path);
        match node {
            Some(id) => {
                self.inner.graph.borrow_mut().set_previous(id, previous)?;
                self.notify_all(id)
            }
            None => {
                debug!(path = %path, "write to unobserved path");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use weft_core::Object;
    use weft_dom::MemorySurface;

    fn view_model(markup: &str) -> (Rc<MemorySurface>, ViewModel) {
        let surface = Rc::new(MemorySurface::from_markup(markup).unwrap());
        let mut user = Object::new();
        user.insert("username", Value::from("Username"));
        let mut data = Object::new();
        data.insert("user", Value::from(user));
        data.insert(
            "fruits",
            Value::from(vec![Value::from("Apple"), Value::from("Orange")]),
        );
        let options = Options::new()
            .data(data)
            .computed("count", |vm| {
                Ok(Value::from(vm.get("fruits")?.members().len() as i64))
            })
            .method("hello", |_| Ok(Value::from("Hello")));
        let vm = ViewModel::new(surface.clone(), "#app", options, DirectiveRegistry::builtin()).unwrap();
        (surface, vm)
    }

    #[test]
    fn test_binding_props() {
        let props = BindingProps::attribute("value").with_event("change");
        assert_eq!(props.target, BindingTarget::Attribute("value".into()));
        assert_eq!(props.event.as_deref(), Some("change"));
        assert_eq!(BindingProps::content().event, None);
    }

    #[test]
    fn test_resolve_node() {
        let (_, vm) = view_model(r#"<div id="app"></div>"#);
        let root = vm.graph().borrow().root();
        assert_eq!(vm.resolve_node(" $root "), Some(root));
        assert!(vm.resolve_node("user.username").is_some());
        assert!(vm.resolve_node("fruits[1]").is_some());
        assert!(vm.resolve_node("count").is_some());
        assert_eq!(vm.resolve_node("hello()"), None);
        assert_eq!(vm.resolve_node("user.email"), None);
        assert_eq!(vm.resolve_node("user..name"), None);
    }

    #[test]
    fn test_node_values() {
        let (_, vm) = view_model(r#"<div id="app"></div>"#);
        let path = Path::root().child(Segment::Field("user".into()));
        assert_eq!(
            vm.node_value(&NodeSource::Data(path.child(Segment::Field("username".into()))))
                .unwrap(),
            Value::from("Username")
        );
        assert_eq!(
            vm.node_value(&NodeSource::Data(path.child(Segment::Field("email".into()))))
                .unwrap(),
            Value::Null
        );
        assert_eq!(
            vm.node_value(&NodeSource::Computed("count".into())).unwrap(),
            Value::from(2)
        );
        assert_eq!(vm.node_value(&NodeSource::Root).unwrap(), vm.data());
    }

    #[test]
    fn test_scope_lookup_order() {
        let (_, vm) = view_model(r#"<div id="app"></div>"#);
        assert_eq!(vm.lookup("count").unwrap(), Some(Value::from(2)));
        assert_eq!(vm.lookup("hello").unwrap(), None);
        assert_eq!(vm.invoke("hello").unwrap(), Value::from("Hello"));
        assert!(matches!(vm.invoke("count"), Err(Error::NotCallable { .. })));
    }

    #[test]
    fn test_unobserved_write_is_silent() {
        let (_, vm) = view_model(r#"<div id="app"></div>"#);
        vm.set("user.email", "a@b.c").unwrap();
        assert_eq!(vm.get("user.email").unwrap(), Value::from("a@b.c"));
        assert!(matches!(
            vm.set("missing.deep", 1),
            Err(Error::PathNotFound { .. })
        ));
    }

    #[test]
    fn test_listener_outlives_view_model() {
        let (surface, vm) = view_model(r#"<div id="app"><input vm-model="user.username"></div>"#);
        let input = surface.query_selector("input").unwrap().unwrap();
        drop(vm);
        surface.dispatch(input, "input", Some("Alice")).unwrap();
    }

    #[test]
    fn test_debug() {
        let (_, vm) = view_model(r#"<div id="app"></div>"#);
        let debug = format!("{:?}", vm);
        assert!(debug.starts_with("ViewModel"));
        assert!(debug.contains("directives: 2"));
    }
}
