use crate::{ElementFactory, PropTypes, PropValue, Props};
use std::{fmt, sync::Arc};

/// `Component` is implemented by types which can be used as the type of an element and rendered
/// into more elements.
///
/// Most components are plain render functions created with [`ElementType::function`]. Implement
/// this trait directly when the component declares default props or prop types.
pub trait Component: Send + Sync + 'static {
    /// The name used in diagnostics.
    fn name(&self) -> &str;

    /// Values used for props which are missing or `Undefined` when an element of this type is
    /// created or cloned.
    fn default_props(&self) -> Option<&Props> {
        None
    }

    /// Declared prop types, checked each time an element of this type is realized.
    fn prop_types(&self) -> Option<&PropTypes> {
        None
    }

    /// Renders the component's output. The factory attributes the elements it creates to this
    /// component.
    fn render(&self, props: &Props, cx: &ElementFactory) -> PropValue;
}

/// A component backed by a render function.
pub struct FnComponent<F> {
    name: Arc<str>,
    render: F,
    default_props: Option<Props>,
    prop_types: Option<PropTypes>,
}

impl<F> FnComponent<F>
where
    F: Fn(&Props, &ElementFactory) -> PropValue + Send + Sync + 'static,
{
    /// Creates a component with the given name and render function.
    pub fn new(name: impl Into<Arc<str>>, render: F) -> Self {
        Self {
            name: name.into(),
            render,
            default_props: None,
            prop_types: None,
        }
    }

    /// Declares default props.
    pub fn with_default_props(mut self, default_props: Props) -> Self {
        self.default_props = Some(default_props);
        self
    }

    /// Declares prop types.
    pub fn with_prop_types(mut self, prop_types: PropTypes) -> Self {
        self.prop_types = Some(prop_types);
        self
    }
}

impl<F> Component for FnComponent<F>
where
    F: Fn(&Props, &ElementFactory) -> PropValue + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn default_props(&self) -> Option<&Props> {
        self.default_props.as_ref()
    }

    fn prop_types(&self) -> Option<&PropTypes> {
        self.prop_types.as_ref()
    }

    fn render(&self, props: &Props, cx: &ElementFactory) -> PropValue {
        (self.render)(props, cx)
    }
}

/// The type of an element: either a host tag or a component.
#[derive(Clone)]
pub enum ElementType {
    /// A host element identified by its tag name, such as `"div"`.
    Tag(Arc<str>),
    /// A component.
    Component(Arc<dyn Component>),
}

impl ElementType {
    /// Creates a host tag type.
    pub fn tag(name: impl Into<Arc<str>>) -> Self {
        Self::Tag(name.into())
    }

    /// Creates a component type.
    pub fn component<C: Component>(component: C) -> Self {
        Self::Component(Arc::new(component))
    }

    /// Creates a component type from a render function.
    pub fn function<F>(name: impl Into<Arc<str>>, render: F) -> Self
    where
        F: Fn(&Props, &ElementFactory) -> PropValue + Send + Sync + 'static,
    {
        Self::component(FnComponent::new(name, render))
    }

    /// The tag name or component name.
    pub fn name(&self) -> &str {
        match self {
            Self::Tag(name) => name,
            Self::Component(c) => c.name(),
        }
    }

    /// The component's default props. Tags have none.
    pub fn default_props(&self) -> Option<&Props> {
        match self {
            Self::Tag(_) => None,
            Self::Component(c) => c.default_props(),
        }
    }

    /// The component's prop types. Tags have none.
    pub fn prop_types(&self) -> Option<&PropTypes> {
        match self {
            Self::Tag(_) => None,
            Self::Component(c) => c.prop_types(),
        }
    }

    /// Returns the component, if this is a component type.
    pub fn as_component(&self) -> Option<&dyn Component> {
        match self {
            Self::Tag(_) => None,
            Self::Component(c) => Some(c.as_ref()),
        }
    }

    /// A value identifying this type, stable for as long as the type exists.
    pub(crate) fn identity(&self) -> TypeIdentity {
        match self {
            Self::Tag(name) => TypeIdentity::Tag(name.clone()),
            Self::Component(c) => TypeIdentity::Component(Arc::as_ptr(c) as *const () as usize),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum TypeIdentity {
    Tag(Arc<str>),
    Component(usize),
}

impl PartialEq for ElementType {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl fmt::Debug for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(name) => write!(f, "<{}>", name),
            Self::Component(c) => write!(f, "{}", c.name()),
        }
    }
}

impl From<&str> for ElementType {
    fn from(name: &str) -> Self {
        Self::tag(name)
    }
}

impl From<&ElementType> for ElementType {
    fn from(t: &ElementType) -> Self {
        t.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeting {
        defaults: Props,
    }

    impl Component for Greeting {
        fn name(&self) -> &str {
            "Greeting"
        }

        fn default_props(&self) -> Option<&Props> {
            Some(&self.defaults)
        }

        fn render(&self, props: &Props, _cx: &ElementFactory) -> PropValue {
            props.get("text").cloned().unwrap_or_default()
        }
    }

    #[test]
    fn test_struct_component() {
        let t = ElementType::component(Greeting {
            defaults: [("text", "hello")].into_iter().collect(),
        });
        assert_eq!(t.name(), "Greeting");
        assert_eq!(t.default_props().unwrap()["text"], PropValue::from("hello"));
        assert!(t.prop_types().is_none());

        let out = t
            .as_component()
            .unwrap()
            .render(&[("text", "hi")].into_iter().collect(), &ElementFactory::default());
        assert_eq!(out, PropValue::from("hi"));
    }

    #[test]
    fn test_type_identity() {
        let a = ElementType::function("A", |_, _| PropValue::Null);
        let also_a = ElementType::function("A", |_, _| PropValue::Null);
        assert_eq!(a, a.clone());
        assert_ne!(a, also_a);
        assert_eq!(ElementType::from("div"), ElementType::tag("div"));
        assert_ne!(ElementType::from("div"), ElementType::tag("span"));
        assert_eq!(format!("{:?}", ElementType::from("div")), "<div>");
    }
}
