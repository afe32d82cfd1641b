use crate::{Callback, Element, Ref};
use indexmap::IndexMap;
use std::{fmt, sync::Arc};

/// A dynamically typed value which can be stored in [`Props`](crate::Props) or passed through a
/// [`Config`](crate::Config).
///
/// Lists and maps are reference counted, so copying a prop from one element to another shares the
/// underlying storage instead of duplicating it.
#[derive(Clone, Default)]
pub enum PropValue {
    /// The value was deferred to the caller. Props holding this value are replaced by the type's
    /// default props, if it declares one.
    #[default]
    Undefined,
    /// An explicit absence of value. Never replaced by default props.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    String(Arc<str>),
    /// An ordered sequence of values.
    List(Arc<[PropValue]>),
    /// A nested mapping of values.
    Map(Arc<IndexMap<String, PropValue>>),
    /// An element.
    Element(Element),
    /// A function.
    Func(Callback),
    /// A ref binding token.
    Ref(Ref),
}

impl PropValue {
    /// Creates a list value.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PropValue>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if the value is [`PropValue::Undefined`].
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` if the value is [`PropValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is `Null` or `Undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }

    /// Returns the string, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number, if this is a number value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the element, if this is an element value.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the items, if this is a list value.
    pub fn as_list(&self) -> Option<&[PropValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries, if this is a map value.
    pub fn as_map(&self) -> Option<&IndexMap<String, PropValue>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the function, if this is a function value.
    pub fn as_func(&self) -> Option<&Callback> {
        match self {
            Self::Func(f) => Some(f),
            _ => None,
        }
    }

    /// Returns `true` if both values share the same storage. Scalars are never shared.
    ///
    /// This is how a shallow copy can be told apart from a deep one.
    pub fn shares_storage_with(&self, other: &PropValue) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Arc::ptr_eq(a, b),
            (Self::List(a), Self::List(b)) => Arc::ptr_eq(a, b),
            (Self::Map(a), Self::Map(b)) => Arc::ptr_eq(a, b),
            (Self::Element(a), Self::Element(b)) => a.is_same_instance(b),
            (Self::Func(a), Self::Func(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// The name of the value's runtime type, as used in prop type diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "array",
            Self::Func(_) => "function",
            Self::Map(_) | Self::Element(_) | Self::Ref(_) => "object",
        }
    }

    /// Coerces the value to a string, the way element keys are stringified.
    ///
    /// ```
    /// # use facsimile::PropValue;
    /// assert_eq!(PropValue::Null.to_key_string(), "null");
    /// assert_eq!(PropValue::from(12).to_key_string(), "12");
    /// assert_eq!(PropValue::from(1.5).to_key_string(), "1.5");
    /// ```
    pub fn to_key_string(&self) -> String {
        match self {
            Self::Undefined => "undefined".to_owned(),
            Self::Null => "null".to_owned(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::String(s) => s.to_string(),
            Self::List(items) => items
                .iter()
                .map(|item| match item {
                    Self::Undefined | Self::Null => String::new(),
                    _ => item.to_key_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Self::Func(_) => "function".to_owned(),
            Self::Ref(Ref::Named(name)) => name.to_string(),
            Self::Map(_) | Self::Element(_) | Self::Ref(_) => "[object Object]".to_owned(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned()
    } else if n == 0.0 {
        "0".to_owned()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Element(a), Self::Element(b)) => a == b,
            (Self::Func(a), Self::Func(b)) => a.ptr_eq(b),
            (Self::Ref(a), Self::Ref(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => b.fmt(f),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::String(s) => s.fmt(f),
            Self::List(items) => f.debug_list().entries(items.iter()).finish(),
            Self::Map(entries) => f.debug_map().entries(entries.iter()).finish(),
            Self::Element(e) => e.fmt(f),
            Self::Func(_) => f.write_str("[function]"),
            Self::Ref(r) => r.fmt(f),
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<Arc<str>> for PropValue {
    fn from(s: Arc<str>) -> Self {
        Self::String(s)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for PropValue {
                fn from(n: $t) -> Self {
                    Self::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(i32, i64, u32, u64, usize, f32, f64);

impl From<Element> for PropValue {
    fn from(e: Element) -> Self {
        Self::Element(e)
    }
}

impl From<&Element> for PropValue {
    fn from(e: &Element) -> Self {
        Self::Element(e.clone())
    }
}

impl From<Callback> for PropValue {
    fn from(f: Callback) -> Self {
        Self::Func(f)
    }
}

impl From<Ref> for PropValue {
    fn from(r: Ref) -> Self {
        Self::Ref(r)
    }
}

impl<T: Into<PropValue>> From<Vec<T>> for PropValue {
    fn from(items: Vec<T>) -> Self {
        Self::list(items)
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

impl From<IndexMap<String, PropValue>> for PropValue {
    fn from(entries: IndexMap<String, PropValue>) -> Self {
        Self::Map(Arc::new(entries))
    }
}

impl From<serde_json::Value> for PropValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Self::String(s.into()),
            Value::Array(items) => Self::list(items),
            Value::Object(entries) => Self::Map(Arc::new(
                entries.into_iter().map(|(k, v)| (k, v.into())).collect(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_string() {
        assert_eq!(PropValue::Undefined.to_key_string(), "undefined");
        assert_eq!(PropValue::Null.to_key_string(), "null");
        assert_eq!(PropValue::from(true).to_key_string(), "true");
        assert_eq!(PropValue::from(-3).to_key_string(), "-3");
        assert_eq!(PropValue::from(0.25).to_key_string(), "0.25");
        assert_eq!(PropValue::from(f64::NAN).to_key_string(), "NaN");
        assert_eq!(PropValue::from(1e20).to_key_string(), "100000000000000000000");
        assert_eq!(PropValue::from(-0.0).to_key_string(), "0");
        assert_eq!(PropValue::from("abc").to_key_string(), "abc");
        assert_eq!(
            PropValue::list([PropValue::from(1), PropValue::Null, PropValue::from("x")])
                .to_key_string(),
            "1,,x"
        );
    }

    #[test]
    fn test_type_name() {
        assert_eq!(PropValue::from(123).type_name(), "number");
        assert_eq!(PropValue::from("red").type_name(), "string");
        assert_eq!(PropValue::list(Vec::<PropValue>::new()).type_name(), "array");
        assert_eq!(PropValue::from(json!({"a": 1})).type_name(), "object");
        let func = Callback::from(|_: &[PropValue]| PropValue::Null);
        assert_eq!(PropValue::from(func).type_name(), "function");
    }

    #[test]
    fn test_from_json() {
        let value = PropValue::from(json!({"name": "x", "sizes": [1, 2], "on": null}));
        let map = value.as_map().unwrap();
        assert_eq!(map["name"], PropValue::from("x"));
        assert_eq!(map["sizes"], PropValue::list([1, 2]));
        assert!(map["on"].is_null());
    }

    #[test]
    fn test_shared_storage() {
        let list = PropValue::list(["a", "b"]);
        let copy = list.clone();
        assert!(list.shares_storage_with(&copy));
        assert!(!list.shares_storage_with(&PropValue::list(["a", "b"])));
        assert_eq!(list, PropValue::list(["a", "b"]));
        assert!(!PropValue::from(1).shares_storage_with(&PropValue::from(1)));
    }

    #[test]
    fn test_option_conversion() {
        assert!(PropValue::from(None::<&str>).is_null());
        assert_eq!(PropValue::from(Some("x")), PropValue::from("x"));
    }
}
