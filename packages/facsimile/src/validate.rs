use crate::{DiagnosticKind, Diagnostics, ElementType, Owner, PropValue};

/// Checks that every element in a list of children carries an explicit key.
///
/// The check is advisory: it never fails and never changes the children. At most one diagnostic
/// is emitted per call, and at most one per call site for the lifetime of the
/// [`Diagnostics`] store. The call site is the owner that rendered the list, or the parent type if
/// the list was built outside of any render.
pub struct ChildKeyValidator<'a> {
    diagnostics: &'a Diagnostics,
}

impl<'a> ChildKeyValidator<'a> {
    /// Creates a validator reporting to the given store.
    pub fn new(diagnostics: &'a Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Validates one list passed as a single child argument of an element of type `parent`.
    /// Returns `true` if a diagnostic was emitted.
    pub fn validate(
        &self,
        children: &[PropValue],
        parent: &ElementType,
        owner: Option<&Owner>,
    ) -> bool {
        let missing = children
            .iter()
            .filter_map(PropValue::as_element)
            .filter(|e| e.key().is_none())
            .count();
        if missing == 0 {
            return false;
        }

        let call_site = match owner {
            Some(owner) => format!("Check the render method of `{}`.", owner.name()),
            None => format!("Check the top-level render call using <{}>.", parent.name()),
        };
        self.diagnostics.emit(
            DiagnosticKind::MissingKey,
            call_site.clone(),
            format!(
                "Each child in a list should have a unique \"key\" prop. {}",
                call_site
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, ElementFactory, InstanceId};

    fn keyed(cx: &ElementFactory, key: &str) -> PropValue {
        cx.create("li", Some(Config::new().set("key", key)), ()).into()
    }

    #[test]
    fn test_keyed_children() {
        let diagnostics = Diagnostics::new();
        let cx = ElementFactory::new(diagnostics.clone());
        let children = [keyed(&cx, "1"), keyed(&cx, "2")];
        assert!(!ChildKeyValidator::new(&diagnostics).validate(&children, &"ul".into(), None));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_non_elements_ignored() {
        let diagnostics = Diagnostics::new();
        let children = [
            PropValue::from("text"),
            PropValue::from(3),
            PropValue::from(serde_json::json!({"key": null})),
        ];
        assert!(!ChildKeyValidator::new(&diagnostics).validate(&children, &"ul".into(), None));
    }

    #[test]
    fn test_one_diagnostic_per_call() {
        let diagnostics = Diagnostics::new();
        let cx = ElementFactory::new(diagnostics.clone());
        let children = [
            cx.create("li", None, ()).into(),
            cx.create("li", None, ()).into(),
            keyed(&cx, "3"),
        ];
        let validator = ChildKeyValidator::new(&diagnostics);
        assert!(validator.validate(&children, &"ul".into(), None));
        assert_eq!(
            diagnostics.recorded()[0].message,
            "Each child in a list should have a unique \"key\" prop. \
             Check the top-level render call using <ul>."
        );

        // same call site
        assert!(!validator.validate(&children, &"ul".into(), None));
        assert!(validator.validate(&children, &"ol".into(), None));
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_owner_call_site() {
        let diagnostics = Diagnostics::new();
        let cx = ElementFactory::new(diagnostics.clone());
        let owner = Owner::new(InstanceId(1), "List".into());
        let children: [PropValue; 1] = [cx.create("li", None, ()).into()];
        let validator = ChildKeyValidator::new(&diagnostics);
        assert!(validator.validate(&children, &"ul".into(), Some(&owner)));
        assert!(!validator.validate(&children, &"ol".into(), Some(&owner)));
        assert_eq!(
            diagnostics.recorded()[0].message,
            "Each child in a list should have a unique \"key\" prop. Check the render method of `List`."
        );
    }
}
