use anyhow::Result;
use facsimile::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let diagnostics = Diagnostics::new();
    let cx = ElementFactory::new(diagnostics.clone());

    let button = ElementType::component(
        FnComponent::new("Button", |props, cx| {
            cx.create("button", None, [props["label"].clone()]).into()
        })
        .with_default_props([("color", "blue")].into_iter().collect())
        .with_prop_types(PropTypes::new().with("label", PropType::STRING.required())),
    );

    let config = Config::from_json(serde_json::json!({"key": "ok", "label": "OK"}))?;
    let ok = cx.create(&button, Some(config), ());
    println!("original:  {:?}", ok);

    let red = cx.clone_element(&ok, Some(Config::new().set("color", "red")), ());
    println!("red:       {:?}", red);

    let reverted = cx.clone_element(
        &red,
        Some(Config::new().set("color", PropValue::Undefined)),
        (),
    );
    println!("reverted:  {:?}", reverted);

    let rekeyed = cx.clone_element(&ok, Some(Config::new().set("key", PropValue::Null)), ());
    println!("rekeyed:   {:?}", rekeyed.key());

    // The child list has no keys, so a warning is reported.
    let items = vec![cx.create("li", None, ()), cx.create("li", None, ())];
    let list = cx.create("ul", None, [PropValue::from(items)]);
    println!("list:      {:?}", list);

    let mut root = Root::new(diagnostics.clone());
    root.render(&cx.clone_element(&ok, Some(Config::new().set("label", 42)), ()));

    for diagnostic in diagnostics.take() {
        println!("{}", serde_json::to_string(&diagnostic)?);
    }

    Ok(())
}
