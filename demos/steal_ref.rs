use anyhow::{Context, Result};
use facsimile::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let diagnostics = Diagnostics::new();
    let cx = ElementFactory::new(diagnostics.clone());
    let mut root = Root::new(diagnostics.clone());

    let wrapper = ElementType::function("Wrapper", |props, cx| {
        let Some(child) = props["children"].as_element() else {
            return PropValue::Null;
        };
        let mut config = Config::new();
        if props.get("steal").and_then(PropValue::as_bool) == Some(true) {
            config.insert("ref", "inner");
        }
        cx.clone_element(child, Some(config), ()).into()
    });

    let app = ElementType::function("App", move |props, cx| {
        let steal = props.get("steal").cloned().unwrap_or(PropValue::Bool(false));
        cx.create(
            &wrapper,
            Some(Config::new().set("ref", "wrapper").set("steal", steal)),
            [cx.create("input", Some(Config::new().set("ref", "field")), ())],
        )
        .into()
    });

    for steal in [false, true, false] {
        root.render(&cx.create(&app, Some(Config::new().set("steal", steal)), ()));
        let app_instance = root.root_instance().cloned().context("nothing rendered")?;
        let app_refs = root.refs(app_instance.id()).context("app has no refs")?;
        let wrapper_refs = app_refs
            .get("wrapper")
            .and_then(|wrapper| root.refs(wrapper.id()));

        println!("steal = {steal}");
        println!("  App refs:     {:?}", app_refs.keys().collect::<Vec<_>>());
        println!(
            "  Wrapper refs: {:?}",
            wrapper_refs.map(|refs| refs.keys().collect::<Vec<_>>()).unwrap_or_default()
        );
    }

    root.unmount();

    for diagnostic in diagnostics.take() {
        println!("{}", serde_json::to_string(&diagnostic)?);
    }

    Ok(())
}
