use crate::{PropValue, Props};
use indexmap::IndexMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PropKind {
    Any,
    String,
    Number,
    Bool,
    Func,
    Element,
    List,
    Map,
}

/// The declared type of a single prop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropType {
    kind: PropKind,
    required: bool,
}

impl PropType {
    /// Accepts any value.
    pub const ANY: Self = Self::new(PropKind::Any);
    /// Accepts strings.
    pub const STRING: Self = Self::new(PropKind::String);
    /// Accepts numbers.
    pub const NUMBER: Self = Self::new(PropKind::Number);
    /// Accepts booleans.
    pub const BOOL: Self = Self::new(PropKind::Bool);
    /// Accepts functions.
    pub const FUNC: Self = Self::new(PropKind::Func);
    /// Accepts a single element.
    pub const ELEMENT: Self = Self::new(PropKind::Element);
    /// Accepts lists.
    pub const LIST: Self = Self::new(PropKind::List);
    /// Accepts maps.
    pub const MAP: Self = Self::new(PropKind::Map);

    const fn new(kind: PropKind) -> Self {
        Self {
            kind,
            required: false,
        }
    }

    /// Makes the prop required: `Null` and `Undefined` are rejected.
    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    fn accepts(&self, value: &PropValue) -> bool {
        match self.kind {
            PropKind::Any => true,
            PropKind::String => matches!(value, PropValue::String(_)),
            PropKind::Number => matches!(value, PropValue::Number(_)),
            PropKind::Bool => matches!(value, PropValue::Bool(_)),
            PropKind::Func => matches!(value, PropValue::Func(_)),
            PropKind::Element => matches!(value, PropValue::Element(_)),
            PropKind::List => matches!(value, PropValue::List(_)),
            PropKind::Map => matches!(value, PropValue::Map(_)),
        }
    }

    fn expected(&self) -> &'static str {
        match self.kind {
            PropKind::Any => "any",
            PropKind::String => "`string`",
            PropKind::Number => "`number`",
            PropKind::Bool => "`boolean`",
            PropKind::Func => "`function`",
            PropKind::Element => "a single element",
            PropKind::List => "`array`",
            PropKind::Map => "`object`",
        }
    }

    fn check(&self, name: &str, value: Option<&PropValue>, component: &str) -> Option<String> {
        let value = match value {
            None | Some(PropValue::Undefined) => {
                return self.required.then(|| {
                    format!(
                        "The prop `{}` is marked as required in `{}`, but its value is `undefined`.",
                        name, component
                    )
                })
            }
            Some(PropValue::Null) => {
                return self.required.then(|| {
                    format!(
                        "The prop `{}` is marked as required in `{}`, but its value is `null`.",
                        name, component
                    )
                })
            }
            Some(value) => value,
        };
        (!self.accepts(value)).then(|| {
            format!(
                "Invalid prop `{}` of type `{}` supplied to `{}`, expected {}.",
                name,
                value.type_name(),
                component,
                self.expected()
            )
        })
    }
}

/// A component's declared prop types.
#[derive(Clone, Debug, Default)]
pub struct PropTypes {
    entries: IndexMap<String, PropType>,
}

impl PropTypes {
    /// Creates an empty declaration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the type of a prop, returning the declaration.
    pub fn with(mut self, name: impl Into<String>, prop_type: PropType) -> Self {
        self.entries.insert(name.into(), prop_type);
        self
    }
}

impl<K: Into<String>> FromIterator<(K, PropType)> for PropTypes {
    fn from_iter<I: IntoIterator<Item = (K, PropType)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// A prop type failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropTypeFailure {
    /// The failure without the ancestry trail. Stable across renders.
    pub reason: String,
    /// The full message, ancestry trail included.
    pub message: String,
}

/// Checks `props` against `prop_types`, in declaration order.
///
/// `trail` is appended to each message as is. It is normally a sequence of
/// `"\n    in Name (created by Owner)"` lines, innermost first.
///
/// ```
/// # use facsimile::{check_prop_types, PropType, PropTypes, Props};
/// let prop_types = PropTypes::new().with("color", PropType::STRING);
/// let props: Props = [("color", 123)].into_iter().collect();
/// let failures = check_prop_types(&prop_types, &props, "Swatch", "\n    in Swatch");
/// assert_eq!(
///     failures[0].message,
///     "Failed prop type: Invalid prop `color` of type `number` supplied to `Swatch`, \
///      expected `string`.\n    in Swatch"
/// );
/// ```
pub fn check_prop_types(
    prop_types: &PropTypes,
    props: &Props,
    component: &str,
    trail: &str,
) -> Vec<PropTypeFailure> {
    prop_types
        .entries
        .iter()
        .filter_map(|(name, prop_type)| prop_type.check(name, props.get(name), component))
        .map(|reason| PropTypeFailure {
            message: format!("Failed prop type: {}{}", reason, trail),
            reason,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Callback, ElementFactory};

    fn messages(prop_types: &PropTypes, props: &Props) -> Vec<String> {
        check_prop_types(prop_types, props, "Thing", "")
            .into_iter()
            .map(|f| f.message)
            .collect()
    }

    #[test]
    fn test_valid_props() {
        let prop_types: PropTypes = [
            ("label", PropType::STRING.required()),
            ("count", PropType::NUMBER),
            ("on_click", PropType::FUNC),
            ("icon", PropType::ELEMENT),
            ("extra", PropType::ANY),
        ]
        .into_iter()
        .collect();
        let props: Props = [
            ("label", PropValue::from("ok")),
            ("on_click", Callback::from(|_: &[PropValue]| PropValue::Null).into()),
            ("icon", ElementFactory::default().create("svg", None, ()).into()),
            ("extra", PropValue::list([1, 2])),
        ]
        .into_iter()
        .collect();
        assert!(messages(&prop_types, &props).is_empty());
    }

    #[test]
    fn test_invalid_type() {
        let prop_types = PropTypes::new()
            .with("flag", PropType::BOOL)
            .with("icon", PropType::ELEMENT);
        let props: Props = [("flag", "yes"), ("icon", "star")].into_iter().collect();
        assert_eq!(
            messages(&prop_types, &props),
            vec![
                "Failed prop type: Invalid prop `flag` of type `string` supplied to `Thing`, expected `boolean`.",
                "Failed prop type: Invalid prop `icon` of type `string` supplied to `Thing`, expected a single element.",
            ]
        );
    }

    #[test]
    fn test_required() {
        let prop_types = PropTypes::new()
            .with("a", PropType::STRING.required())
            .with("b", PropType::MAP.required())
            .with("c", PropType::LIST);
        let props: Props = [("b", PropValue::Null), ("c", PropValue::Null)]
            .into_iter()
            .collect();
        assert_eq!(
            messages(&prop_types, &props),
            vec![
                "Failed prop type: The prop `a` is marked as required in `Thing`, but its value is `undefined`.",
                "Failed prop type: The prop `b` is marked as required in `Thing`, but its value is `null`.",
            ]
        );
    }

    #[test]
    fn test_reason_excludes_trail() {
        let prop_types = PropTypes::new().with("n", PropType::NUMBER);
        let props: Props = [("n", "x")].into_iter().collect();
        let failures = check_prop_types(&prop_types, &props, "Thing", "\n    in Thing");
        assert!(!failures[0].reason.contains("in Thing"));
        assert!(failures[0].message.ends_with("\n    in Thing"));
    }
}
