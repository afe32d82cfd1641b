use crate::{InstanceHandle, PropValue};
use core::ops::Deref;
use std::{fmt, sync::Arc};

/// `Callback` is a function stored as a prop value, such as an event handler.
///
/// Any `Fn(&[PropValue]) -> PropValue` can be converted into a `Callback`, and it can be invoked
/// using function call syntax. Clones share the same function, and two callbacks compare equal only
/// if they share it.
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn(&[PropValue]) -> PropValue + Send + Sync + 'static>);

impl Callback {
    /// Returns `true` if both callbacks share the same function.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for Callback {
    type Target = dyn Fn(&[PropValue]) -> PropValue + Send + Sync + 'static;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl<F> From<F> for Callback
where
    F: Fn(&[PropValue]) -> PropValue + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

/// `RefCallback` is a callback ref: it is invoked with the instance handle when the element it is
/// attached to is realized, and with `None` when the binding no longer applies.
#[derive(Clone)]
pub struct RefCallback(Arc<dyn Fn(Option<InstanceHandle>) + Send + Sync + 'static>);

impl RefCallback {
    /// Returns `true` if both callbacks share the same function.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for RefCallback {
    type Target = dyn Fn(Option<InstanceHandle>) + Send + Sync + 'static;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl<F> From<F> for RefCallback
where
    F: Fn(Option<InstanceHandle>) + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for RefCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RefCallback")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_callback() {
        let add = Callback::from(|args: &[PropValue]| {
            PropValue::from(args.iter().filter_map(PropValue::as_f64).sum::<f64>())
        });
        assert_eq!(add(&[PropValue::from(1), PropValue::from(2)]), PropValue::from(3));

        let copy = add.clone();
        assert!(copy.ptr_eq(&add));
        assert!(!add.ptr_eq(&Callback::from(|_: &[PropValue]| PropValue::Null)));
    }

    #[test]
    fn test_ref_callback() {
        let calls = Arc::new(Mutex::new(0));
        let callback = RefCallback::from({
            let calls = calls.clone();
            move |handle: Option<InstanceHandle>| {
                assert!(handle.is_none());
                *calls.lock().unwrap() += 1;
            }
        });
        callback(None);
        callback.clone()(None);
        assert_eq!(*calls.lock().unwrap(), 2);
    }
}
