use crate::{
    element::ElementParts,
    props::{CHILDREN, KEY, REF},
    ChildKeyValidator, Config, Diagnostics, Element, ElementType, Owner, PropValue, Props, Ref,
};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::trace;

/// Converts the trailing child arguments of [`ElementFactory::create`] and
/// [`ElementFactory::clone_element`] into a list of values.
///
/// Each item is one child argument. Pass `()` for none. A list passed as one argument stays a
/// single child:
///
/// ```
/// # use facsimile::{ElementFactory, PropValue};
/// let cx = ElementFactory::default();
/// let two_args = cx.create("div", None, ["a", "b"]);
/// let one_list = cx.create("div", None, [vec!["a", "b"]]);
/// assert_eq!(two_args.props().children(), one_list.props().children());
/// assert_eq!(cx.create("div", None, ["a"]).props()["children"], PropValue::from("a"));
/// ```
pub trait IntoChildren {
    /// Returns the child arguments in order.
    fn into_children(self) -> Vec<PropValue>;
}

impl IntoChildren for () {
    fn into_children(self) -> Vec<PropValue> {
        Vec::new()
    }
}

impl<T: Into<PropValue>, const N: usize> IntoChildren for [T; N] {
    fn into_children(self) -> Vec<PropValue> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<PropValue>> IntoChildren for Vec<T> {
    fn into_children(self) -> Vec<PropValue> {
        self.into_iter().map(Into::into).collect()
    }
}

/// The key and ref found in a configuration. `None` means the configuration did not provide one.
#[derive(Default)]
struct Reserved {
    key: Option<Arc<str>>,
    element_ref: Option<Option<Ref>>,
}

/// Moves the own entries of `config` into `props`, except for `key` and `ref` which are returned.
/// An entry whose value is `Undefined` does not count as providing a key or ref.
fn extract_reserved(config: Config, props: &mut IndexMap<String, PropValue>) -> Reserved {
    let mut reserved = Reserved::default();
    for (name, value) in config.into_entries() {
        match name.as_str() {
            KEY => {
                if !value.is_undefined() {
                    reserved.key = Some(value.to_key_string().into());
                }
            }
            REF => {
                if !value.is_undefined() {
                    reserved.element_ref = Some(Ref::from_value(&value));
                }
            }
            _ => {
                props.insert(name, value);
            }
        }
    }
    reserved
}

/// Sets `children` from the child arguments: one argument is stored as is, several are stored as
/// a list. Without arguments the existing entry, if any, is kept.
fn resolve_children(props: &mut IndexMap<String, PropValue>, mut children: Vec<PropValue>) {
    match children.len() {
        0 => {}
        1 => {
            props.insert(CHILDREN.to_owned(), children.remove(0));
        }
        _ => {
            props.insert(CHILDREN.to_owned(), PropValue::List(children.into()));
        }
    }
}

/// Fills props which are missing or `Undefined` from the type's default props. `Null` is an
/// explicit value and is kept.
fn apply_default_props(element_type: &ElementType, props: &mut IndexMap<String, PropValue>) {
    let Some(defaults) = element_type.default_props() else {
        return;
    };
    for (name, value) in defaults.iter() {
        if props.get(name).map_or(true, PropValue::is_undefined) {
            props.insert(name.to_owned(), value.clone());
        }
    }
}

/// Creates and clones elements.
///
/// A factory carries the [`Diagnostics`] store that receives advisory diagnostics and, during a
/// render, the [`Owner`] to which created elements are attributed.
#[derive(Clone, Default)]
pub struct ElementFactory {
    diagnostics: Diagnostics,
    owner: Option<Owner>,
}

impl ElementFactory {
    /// Creates a factory reporting to the given store, outside of any render.
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self {
            diagnostics,
            owner: None,
        }
    }

    /// Returns a factory which attributes the elements it creates to `owner`.
    pub fn with_owner(&self, owner: Owner) -> Self {
        Self {
            diagnostics: self.diagnostics.clone(),
            owner: Some(owner),
        }
    }

    /// The owner new elements are attributed to.
    pub fn owner(&self) -> Option<&Owner> {
        self.owner.as_ref()
    }

    /// The store receiving diagnostics.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Creates an element.
    ///
    /// The own entries of `config` become props, except `key` and `ref`. The child arguments
    /// replace any `children` entry from `config`. Props which end up missing or `Undefined` are
    /// filled from the type's default props.
    ///
    /// ```
    /// # use facsimile::{Config, ElementFactory, PropValue};
    /// let cx = ElementFactory::default();
    /// let e = cx.create("li", Some(Config::new().set("key", 3).set("class", "item")), ["text"]);
    /// assert_eq!(e.key(), Some("3"));
    /// assert_eq!(e.props()["class"], PropValue::from("item"));
    /// assert_eq!(e.props()["children"], PropValue::from("text"));
    /// ```
    pub fn create<T, C>(&self, element_type: T, config: Option<Config>, children: C) -> Element
    where
        T: Into<ElementType>,
        C: IntoChildren,
    {
        let element_type = element_type.into();
        let children = children.into_children();
        self.validate_child_lists(&children, &element_type);

        let mut props = IndexMap::new();
        let reserved = config
            .map(|config| extract_reserved(config, &mut props))
            .unwrap_or_default();
        resolve_children(&mut props, children);
        apply_default_props(&element_type, &mut props);

        let element = Element::from_parts(ElementParts {
            element_type,
            key: reserved.key,
            element_ref: reserved.element_ref.flatten(),
            props: Props::from_map(props),
            owner: self.owner.clone(),
        });
        trace!(
            id = %element.id(),
            element_type = ?element.element_type(),
            key = ?element.key(),
            "created element"
        );
        element
    }

    /// Derives a new element from `original`.
    ///
    /// The new element starts with the original's props, key, ref and owner. With a `config`:
    ///
    /// - an own `key` entry replaces the key, even `Null`, which becomes the string `"null"`.
    /// - an own `ref` entry replaces the ref, and this factory's owner becomes the owner.
    /// - every other own entry replaces the prop of the same name.
    ///
    /// `Undefined` key and ref entries are ignored. Child arguments, if any, replace `children`.
    /// Finally default props are applied again, so a prop set to `Undefined` reverts to its
    /// default. The original is left untouched.
    ///
    /// ```
    /// # use facsimile::{Config, ElementFactory, PropValue};
    /// let cx = ElementFactory::default();
    /// let original = cx.create("a", Some(Config::new().set("key", "k").set("href", "/")), ());
    /// let clone = cx.clone_element(&original, Some(Config::new().set("href", "/home")), ());
    /// assert_eq!(clone.key(), Some("k"));
    /// assert_eq!(clone.props()["href"], PropValue::from("/home"));
    /// assert_eq!(original.props()["href"], PropValue::from("/"));
    /// ```
    pub fn clone_element<C>(
        &self,
        original: &Element,
        config: Option<Config>,
        children: C,
    ) -> Element
    where
        C: IntoChildren,
    {
        let element_type = original.element_type().clone();
        let children = children.into_children();
        self.validate_child_lists(&children, &element_type);

        let mut props = original.props().to_map();
        let mut key = original.key_arc();
        let mut element_ref = original.element_ref().cloned();
        let mut owner = original.owner().cloned();
        if let Some(config) = config {
            let reserved = extract_reserved(config, &mut props);
            if let Some(new_key) = reserved.key {
                key = Some(new_key);
            }
            if let Some(new_ref) = reserved.element_ref {
                element_ref = new_ref;
                owner = self.owner.clone();
            }
        }
        resolve_children(&mut props, children);
        apply_default_props(&element_type, &mut props);

        let element = Element::from_parts(ElementParts {
            element_type,
            key,
            element_ref,
            props: Props::from_map(props),
            owner,
        });
        trace!(
            id = %element.id(),
            original = %original.id(),
            key = ?element.key(),
            "cloned element"
        );
        element
    }

    fn validate_child_lists(&self, children: &[PropValue], parent: &ElementType) {
        let validator = ChildKeyValidator::new(&self.diagnostics);
        for list in children.iter().filter_map(PropValue::as_list) {
            validator.validate(list, parent, self.owner.as_ref());
        }
    }
}
