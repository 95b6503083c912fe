//! Renders the sample profile page, types a new username into its input and
//! prints the markup before and after.
//!
//! Set `RUST_LOG=weft_vm=debug` to watch directives being applied.

use std::rc::Rc;

use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weft_core::{Error, Value};
use weft_dom::{MemorySurface, Surface};
use weft_vm::{DirectiveRegistry, Options, ViewModel};

const PAGE: &str = r#"<div id="app">
  <input vm-model="user.username">
  <p>{{user.username}}</p>
  <ul>
    <li vm-repeat="fruit in fruits">{{ fruit }}</li>
  </ul>
  <h2>{{ hello() }}</h2>
  <pre>{{ json }}</pre>
</div>"#;

fn options() -> Options {
    Options::new()
        .data(json!({
            "user": { "username": "Username" },
            "fruits": ["Apple", "Orange", "Pineapple"]
        }))
        .method("hello", |_| Ok(Value::from("Hello, world!")))
        .computed("json", |vm| {
            serde_json::to_string_pretty(&vm.data())
                .map(Value::from)
                .map_err(|err| Error::callback(err.to_string()))
        })
        .watch("$root", |vm, _, _| vm.notify(Some("json")))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weft_demo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let surface = Rc::new(MemorySurface::from_markup(PAGE)?);
    let _vm = ViewModel::new(surface.clone(), "#app", options(), DirectiveRegistry::builtin())?;

    let app = surface
        .query_selector("#app")?
        .ok_or_else(|| Error::selector_not_found("#app"))?;
    tracing::info!("compiled #app");
    println!("{}\n", surface.outer_markup(app)?);

    let input = surface
        .query_selector("input")?
        .ok_or_else(|| Error::selector_not_found("input"))?;
    surface.dispatch(input, "input", Some("Alice"))?;
    tracing::info!(username = "Alice", "dispatched input");
    println!("{}", surface.outer_markup(app)?);

    Ok(())
}
