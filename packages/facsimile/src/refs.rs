use crate::{PropValue, RefCallback};
use generational_box::{GenerationalBox, Owner, SyncStorage};
use std::{fmt, sync::Arc};

/// Identifies a realized instance within a [`Root`](crate::Root).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub(crate) u64);

/// A handle to a realized instance, delivered to refs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceHandle {
    id: InstanceId,
    name: Arc<str>,
}

impl InstanceHandle {
    pub(crate) fn new(id: InstanceId, name: Arc<str>) -> Self {
        Self { id, name }
    }

    /// The id of the instance.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// The tag name or component name of the instance.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A reference binding token. When the element carrying it is realized, the ref receives a handle
/// to the realized instance.
#[derive(Clone)]
pub enum Ref {
    /// A ref stored under a name in the owning component's ref table.
    Named(Arc<str>),
    /// A function invoked with the handle on attach and with `None` on detach.
    Callback(RefCallback),
    /// A slot which holds the current handle.
    Object(RefObject),
}

impl Ref {
    /// Creates a named ref.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::Named(name.into())
    }

    /// Creates a callback ref.
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(Option<InstanceHandle>) + Send + Sync + 'static,
    {
        Self::Callback(RefCallback::from(f))
    }

    /// Interprets a configuration value as a ref. `Null` and `Undefined` produce no ref. Values which
    /// are not refs are coerced to a string and used as a named ref.
    pub(crate) fn from_value(value: &PropValue) -> Option<Self> {
        match value {
            PropValue::Null | PropValue::Undefined => None,
            PropValue::Ref(r) => Some(r.clone()),
            PropValue::String(name) => Some(Self::Named(name.clone())),
            other => Some(Self::Named(other.to_key_string().into())),
        }
    }

    pub(crate) fn attach(&self, handle: &InstanceHandle) {
        match self {
            Self::Named(_) => {}
            Self::Callback(f) => f(Some(handle.clone())),
            Self::Object(slot) => slot.set(Some(handle.clone())),
        }
    }

    pub(crate) fn detach(&self) {
        match self {
            Self::Named(_) => {}
            Self::Callback(f) => f(None),
            Self::Object(slot) => slot.set(None),
        }
    }
}

impl PartialEq for Ref {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Named(a), Self::Named(b)) => a == b,
            (Self::Callback(a), Self::Callback(b)) => a.ptr_eq(b),
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Callback(_) => f.write_str("Callback"),
            Self::Object(slot) => f.debug_tuple("Object").field(&slot.current()).finish(),
        }
    }
}

impl From<&str> for Ref {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<RefObject> for Ref {
    fn from(slot: RefObject) -> Self {
        Self::Object(slot)
    }
}

impl From<RefCallback> for Ref {
    fn from(f: RefCallback) -> Self {
        Self::Callback(f)
    }
}

/// `RefObject` is a shareable slot which receives the handle of the instance it is attached to.
///
/// Clones refer to the same slot.
#[derive(Clone)]
pub struct RefObject {
    inner: GenerationalBox<Option<InstanceHandle>, SyncStorage>,
    storage: Arc<Owner<SyncStorage>>,
}

impl RefObject {
    /// Creates an empty slot.
    pub fn new() -> Self {
        let storage = Owner::default();
        Self {
            inner: storage.insert(None),
            storage: Arc::new(storage),
        }
    }

    /// Returns the handle currently held by the slot.
    pub fn current(&self) -> Option<InstanceHandle> {
        self.inner.try_read().ok().and_then(|v| (*v).clone())
    }

    /// Returns `true` if both objects refer to the same slot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }

    fn set(&self, value: Option<InstanceHandle>) {
        if let Ok(mut v) = self.inner.try_write() {
            *v = value;
        }
    }
}

impl Default for RefObject {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn handle(id: u64, name: &str) -> InstanceHandle {
        InstanceHandle::new(InstanceId(id), name.into())
    }

    #[test]
    fn test_ref_object() {
        let slot = RefObject::new();
        let copy = slot.clone();
        assert!(slot.current().is_none());

        let r = Ref::from(slot.clone());
        r.attach(&handle(1, "span"));
        assert_eq!(copy.current().unwrap().name(), "span");

        r.detach();
        assert!(copy.current().is_none());
        assert!(slot.ptr_eq(&copy));
        assert!(!slot.ptr_eq(&RefObject::new()));
    }

    #[test]
    fn test_callback_ref() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let r = Ref::callback({
            let seen = seen.clone();
            move |h: Option<InstanceHandle>| seen.lock().unwrap().push(h.map(|h| h.id()))
        });
        r.attach(&handle(7, "div"));
        r.detach();
        assert_eq!(*seen.lock().unwrap(), vec![Some(InstanceId(7)), None]);
    }

    #[test]
    fn test_from_value() {
        assert!(Ref::from_value(&PropValue::Null).is_none());
        assert!(Ref::from_value(&PropValue::Undefined).is_none());
        assert_eq!(Ref::from_value(&"xyz".into()), Some(Ref::named("xyz")));
        assert_eq!(Ref::from_value(&3.into()), Some(Ref::named("3")));

        let slot = RefObject::new();
        assert_eq!(
            Ref::from_value(&Ref::from(slot.clone()).into()),
            Some(Ref::Object(slot))
        );
    }
}
