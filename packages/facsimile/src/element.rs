use crate::{ElementType, InstanceId, Props, Ref};
use std::{fmt, sync::Arc};
use uuid::Uuid;

/// Uniquely identifies a constructed element.
///
/// Every call to [`ElementFactory::create`](crate::ElementFactory::create) or
/// [`ElementFactory::clone_element`](crate::ElementFactory::clone_element) produces a new id.
/// Cloning the Rust [`Element`] handle does not: the handle still refers to the same element.
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub struct ElementId(Uuid);

impl ElementId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The component instance whose render produced an element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Owner {
    instance: InstanceId,
    name: Arc<str>,
}

impl Owner {
    pub(crate) fn new(instance: InstanceId, name: Arc<str>) -> Self {
        Self { instance, name }
    }

    /// The owning instance.
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// The owning component's name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

struct ElementInner {
    id: ElementId,
    element_type: ElementType,
    key: Option<Arc<str>>,
    element_ref: Option<Ref>,
    props: Props,
    owner: Option<Owner>,
}

/// An immutable description of what to render.
///
/// Elements are created by an [`ElementFactory`](crate::ElementFactory) and never change
/// afterwards. There is no way to write to an element or its props; derive a new element instead:
///
/// ```compile_fail
/// # use facsimile::{ElementFactory, Config};
/// let cx = ElementFactory::default();
/// let e = cx.create("div", Some(Config::new().set("key", "a")), ());
/// e.key = None;
/// ```
///
/// Equality is structural: two elements are equal when they have the same type, key, ref and
/// props, even if they are distinct instances. Use [`Element::is_same_instance`] to compare
/// identity.
#[derive(Clone)]
pub struct Element(Arc<ElementInner>);

pub(crate) struct ElementParts {
    pub element_type: ElementType,
    pub key: Option<Arc<str>>,
    pub element_ref: Option<Ref>,
    pub props: Props,
    pub owner: Option<Owner>,
}

impl Element {
    pub(crate) fn from_parts(parts: ElementParts) -> Self {
        Self(Arc::new(ElementInner {
            id: ElementId::new(),
            element_type: parts.element_type,
            key: parts.key,
            element_ref: parts.element_ref,
            props: parts.props,
            owner: parts.owner,
        }))
    }

    /// The id of this element.
    pub fn id(&self) -> ElementId {
        self.0.id
    }

    /// The element's type.
    pub fn element_type(&self) -> &ElementType {
        &self.0.element_type
    }

    /// The element's key, if it has an explicit one.
    pub fn key(&self) -> Option<&str> {
        self.0.key.as_deref()
    }

    pub(crate) fn key_arc(&self) -> Option<Arc<str>> {
        self.0.key.clone()
    }

    /// The element's ref, if it has one.
    pub fn element_ref(&self) -> Option<&Ref> {
        self.0.element_ref.as_ref()
    }

    /// The element's props.
    pub fn props(&self) -> &Props {
        &self.0.props
    }

    /// The component instance that created this element, if it was created during a render.
    pub fn owner(&self) -> Option<&Owner> {
        self.0.owner.as_ref()
    }

    /// Returns `true` if both handles refer to the same constructed element.
    pub fn is_same_instance(&self, other: &Element) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_instance(other)
            || (self.0.element_type == other.0.element_type
                && self.0.key == other.0.key
                && self.0.element_ref == other.0.element_ref
                && self.0.props == other.0.props)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("type", &self.0.element_type)
            .field("key", &self.0.key)
            .field("ref", &self.0.element_ref)
            .field("props", &self.0.props)
            .finish()
    }
}
