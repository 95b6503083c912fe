//! Custom directives and direct `bind_dom` use.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use weft_core::Value;
use weft_dom::{MemorySurface, NodeRef, Surface};
use weft_vm::{BindingProps, DirectiveRegistry, Options, Scope, Traversal, ViewModel, MODEL, REPEAT};

fn options() -> Options {
    Options::new().data(json!({ "name": "Ada", "title": "Engineer" }))
}

fn select(surface: &MemorySurface, selector: &str) -> NodeRef {
    surface.query_selector(selector).unwrap().unwrap()
}

#[test]
fn custom_directive_binds_content() {
    let registry = DirectiveRegistry::builder()
        .with_builtins()
        .register("vm-text", |vm, node, expression| {
            vm.bind_dom(node, expression, &BindingProps::content(), false, None)?;
            Ok(Traversal::Stop)
        })
        .build();
    let surface = Rc::new(
        MemorySurface::from_markup(r#"<div id="app"><h1 vm-text="name">placeholder</h1></div>"#).unwrap(),
    );
    let vm = ViewModel::new(surface.clone(), "#app", options(), registry).unwrap();

    let h1 = select(&surface, "h1");
    assert_eq!(surface.outer_markup(h1).unwrap(), "<h1>Ada</h1>");
    vm.set("name", "Grace").unwrap();
    assert_eq!(surface.text_content(h1).unwrap(), "Grace");
}

#[test]
fn stop_skips_descendants() {
    let registry = DirectiveRegistry::builder()
        .register("vm-skip", |_, _, _| Ok(Traversal::Stop))
        .build();
    let surface = Rc::new(
        MemorySurface::from_markup(
            r#"<div id="app"><section vm-skip="yes"><p>{{ name }}</p></section><p class="live">{{ name }}</p></div>"#,
        )
        .unwrap(),
    );
    ViewModel::new(surface.clone(), "#app", options(), registry).unwrap();

    let section = select(&surface, "section");
    assert_eq!(surface.inner_markup(section).unwrap(), "<p>{{ name }}</p>");
    assert_eq!(surface.text_content(select(&surface, "p.live")).unwrap(), "Ada");
}

#[test]
fn only_first_present_directive_applies() {
    let calls: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let (first, second) = (calls.clone(), calls.clone());
    let registry = DirectiveRegistry::builder()
        .register("vm-a", move |_, _, expression| {
            first.borrow_mut().push(format!("a:{}", expression));
            Ok(Traversal::Continue)
        })
        .register("vm-b", move |_, _, expression| {
            second.borrow_mut().push(format!("b:{}", expression));
            Ok(Traversal::Continue)
        })
        .build();
    let surface = Rc::new(
        MemorySurface::from_markup(r#"<div id="app"><span vm-b="two" vm-a="one"></span></div>"#).unwrap(),
    );
    ViewModel::new(surface.clone(), "#app", options(), registry).unwrap();

    assert_eq!(*calls.borrow(), ["a:one"]);
    let span = select(&surface, "span");
    assert_eq!(surface.attribute(span, "vm-a").unwrap(), None);
    assert_eq!(surface.attribute(span, "vm-b").unwrap().as_deref(), Some("two"));
}

#[test]
fn empty_directive_value_is_ignored() {
    let surface = Rc::new(
        MemorySurface::from_markup(r#"<div id="app"><input vm-model=""><p vm-repeat=" ">{{ name }}</p></div>"#)
            .unwrap(),
    );
    ViewModel::new(surface.clone(), "#app", options(), DirectiveRegistry::builtin()).unwrap();

    let input = select(&surface, "input");
    assert_eq!(surface.attribute(input, MODEL).unwrap().as_deref(), Some(""));
    assert_eq!(surface.attribute(input, "value").unwrap(), None);
    let p = select(&surface, "p");
    assert_eq!(surface.attribute(p, REPEAT).unwrap().as_deref(), Some(" "));
    assert_eq!(surface.text_content(p).unwrap(), "Ada");
}

#[test]
fn attribute_binding_follows_writes() {
    let surface = Rc::new(MemorySurface::from_markup(r#"<div id="app"><abbr></abbr></div>"#).unwrap());
    let vm = ViewModel::new(surface.clone(), "#app", options(), DirectiveRegistry::builtin()).unwrap();

    let abbr = select(&surface, "abbr");
    vm.bind_dom(abbr, "title", &BindingProps::attribute("title"), false, None)
        .unwrap();
    assert_eq!(surface.attribute(abbr, "title").unwrap().as_deref(), Some("Engineer"));

    vm.set("title", "Mathematician").unwrap();
    assert_eq!(
        surface.attribute(abbr, "title").unwrap().as_deref(),
        Some("Mathematician")
    );
}

#[test]
fn content_binding_writes_back_on_named_event() {
    let surface = Rc::new(MemorySurface::from_markup(r#"<div id="app"><p></p></div>"#).unwrap());
    let vm = ViewModel::new(surface.clone(), "#app", options(), DirectiveRegistry::builtin()).unwrap();

    let p = select(&surface, "p");
    let props = BindingProps::content().with_event("change");
    vm.bind_dom(p, "name", &props, true, None).unwrap();

    surface.set_text(p, "Edited").unwrap();
    surface.dispatch(p, "input", None).unwrap();
    assert_eq!(vm.get("name").unwrap(), Value::from("Ada"));

    surface.dispatch(p, "change", None).unwrap();
    assert_eq!(vm.get("name").unwrap(), Value::from("Edited"));
}

#[test]
fn binding_against_custom_scope() {
    let surface = Rc::new(MemorySurface::from_markup(r#"<div id="app"><p></p></div>"#).unwrap());
    let vm = ViewModel::new(surface.clone(), "#app", options(), DirectiveRegistry::builtin()).unwrap();

    let local = Rc::new(RefCell::new(Value::from(json!({ "draft": "Unsaved" }))));
    let scope: Rc<dyn Scope> = local.clone();
    let p = select(&surface, "p");
    vm.bind_dom(p, "draft", &BindingProps::content(), false, Some(scope))
        .unwrap();
    assert_eq!(surface.text_content(p).unwrap(), "Unsaved");
}

#[test]
fn compile_subtree_added_later() {
    let surface = Rc::new(MemorySurface::from_markup(r#"<div id="app"></div><aside></aside>"#).unwrap());
    let vm = ViewModel::new(surface.clone(), "#app", options(), DirectiveRegistry::builtin()).unwrap();

    let aside = select(&surface, "aside");
    for child in surface.parse_fragment("<em>{{ name }}</em>").unwrap() {
        surface.append_child(aside, child).unwrap();
    }
    vm.compile(aside).unwrap();
    assert_eq!(surface.inner_markup(aside).unwrap(), "<em>Ada</em>");

    vm.set("name", "Lin").unwrap();
    assert_eq!(surface.inner_markup(aside).unwrap(), "<em>Lin</em>");
}
