//! # facsimile
//!
//! `facsimile` is an immutable, declarative element model: elements describe what to render, and
//! new elements are derived from existing ones with selective overrides.
//!
//! ```
//! use facsimile::prelude::*;
//!
//! let cx = ElementFactory::default();
//! let button = ElementType::component(
//!     FnComponent::new("Button", |props, cx| cx.create("button", None, [props["label"].clone()]).into())
//!         .with_default_props([("color", "blue")].into_iter().collect()),
//! );
//!
//! let ok = cx.create(&button, Some(Config::new().set("key", "ok").set("label", "OK")), ());
//! let red = cx.clone_element(&ok, Some(Config::new().set("color", "red")), ());
//! assert_eq!(red.key(), Some("ok"));
//! assert_eq!(red.props()["color"], PropValue::from("red"));
//!
//! let reverted = cx.clone_element(&red, Some(Config::new().set("color", PropValue::Undefined)), ());
//! assert_eq!(reverted.props()["color"], PropValue::from("blue"));
//! ```

#![warn(missing_docs)]

// # Organization
//
// Code is organized into modules primarily for the benefit of the maintainers. Types are
// re-exported in the root so that users of the library have a flat namespace to work with.

mod component;
mod diagnostics;
mod element;
mod factory;
mod handler;
mod prop_types;
mod props;
mod refs;
mod render;
mod validate;
mod value;

mod flattened_exports {
    pub use crate::component::*;
    pub use crate::diagnostics::*;
    pub use crate::element::*;
    pub use crate::factory::*;
    pub use crate::handler::*;
    pub use crate::prop_types::*;
    pub use crate::props::*;
    pub use crate::refs::*;
    pub use crate::render::*;
    pub use crate::validate::*;
    pub use crate::value::*;
}

pub use flattened_exports::*;

/// By importing this module, you'll bring all of the crate's commonly used types into scope.
pub mod prelude {
    pub use crate::flattened_exports::*;
}
