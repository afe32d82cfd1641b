use crate::{
    check_prop_types, component::TypeIdentity, DiagnosticKind, Diagnostics, Element,
    ElementFactory, ElementType, InstanceHandle, InstanceId, Owner, PropValue, Ref,
};
use indexmap::IndexMap;
use std::{
    collections::{HashMap, HashSet},
    mem,
    sync::Arc,
};
use tracing::debug;

/// The named refs of a component instance.
pub type RefTable = IndexMap<String, InstanceHandle>;

/// A realized node.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// A realized tag element and its realized children.
    Host {
        /// The instance.
        handle: InstanceHandle,
        /// The realized children.
        children: Vec<Node>,
    },
    /// A realized component and the nodes its render produced.
    Composite {
        /// The instance.
        handle: InstanceHandle,
        /// The realized output.
        children: Vec<Node>,
    },
    /// Text from a string or number child.
    Text(String),
}

impl Node {
    /// The instance handle, unless this is a text node.
    pub fn handle(&self) -> Option<&InstanceHandle> {
        match self {
            Self::Host { handle, .. } | Self::Composite { handle, .. } => Some(handle),
            Self::Text(_) => None,
        }
    }

    /// The realized children.
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Host { children, .. } | Self::Composite { children, .. } => children,
            Self::Text(_) => &[],
        }
    }

    /// The concatenated text of this node and its descendants.
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            _ => self.children().iter().map(Node::text).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Slot {
    Key(Arc<str>),
    Index(Vec<usize>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Segment {
    identity: TypeIdentity,
    slot: Slot,
}

#[derive(Clone, Debug, PartialEq)]
struct Binding {
    owner: Option<Owner>,
    element_ref: Ref,
    target: InstanceHandle,
}

struct Frame {
    name: Arc<str>,
    owner: Option<Arc<str>>,
}

fn format_trail(frames: &[Frame]) -> String {
    frames
        .iter()
        .rev()
        .map(|frame| match &frame.owner {
            Some(owner) => format!("\n    in {} (created by {})", frame.name, owner),
            None => format!("\n    in {}", frame.name),
        })
        .collect()
}

/// State for a single render pass.
struct RenderPass<'a> {
    diagnostics: &'a Diagnostics,
    previous: &'a HashMap<Vec<Segment>, InstanceId>,
    next_instance: &'a mut u64,
    instances: HashMap<Vec<Segment>, InstanceId>,
    bindings: Vec<Binding>,
    path: Vec<Segment>,
    frames: Vec<Frame>,
}

impl RenderPass<'_> {
    fn instance_for_path(&mut self) -> InstanceId {
        let id = match self.previous.get(&self.path) {
            Some(id) if !self.instances.contains_key(&self.path) => *id,
            _ => {
                *self.next_instance += 1;
                InstanceId(*self.next_instance)
            }
        };
        self.instances.insert(self.path.clone(), id);
        id
    }

    /// The path segment for a child. A key already taken by an earlier sibling is reported, and
    /// the child falls back to its position so that its subtree stays apart from the sibling's.
    fn segment_for(&mut self, e: &Element, position: &[usize]) -> Segment {
        let identity = e.element_type().identity();
        let Some(key) = e.key() else {
            return Segment {
                identity,
                slot: Slot::Index(position.to_vec()),
            };
        };
        let mut segment = Segment {
            identity,
            slot: Slot::Key(key.into()),
        };
        let mut candidate = self.path.clone();
        candidate.push(segment.clone());
        if self.instances.contains_key(&candidate) {
            self.diagnostics.emit(
                DiagnosticKind::DuplicateKey,
                key,
                format!(
                    "Encountered two children with the same key, `{}`. Keys should be unique.",
                    key
                ),
            );
            segment.slot = Slot::Index(position.to_vec());
        }
        segment
    }

    /// Realizes a child value. `position` is the index path of the value within nested lists.
    fn realize_value(&mut self, value: &PropValue, position: &mut Vec<usize>, out: &mut Vec<Node>) {
        match value {
            PropValue::Undefined | PropValue::Null | PropValue::Bool(_) => {}
            PropValue::String(s) => out.push(Node::Text(s.to_string())),
            PropValue::Number(_) => out.push(Node::Text(value.to_key_string())),
            PropValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    position.push(i);
                    self.realize_value(item, position, out);
                    position.pop();
                }
            }
            PropValue::Element(e) => {
                let node = self.realize_element(e, position);
                out.push(node);
            }
            other => debug!(value = ?other, "skipping value which cannot be rendered"),
        }
    }

    fn realize_element(&mut self, e: &Element, position: &[usize]) -> Node {
        let element_type = e.element_type();
        let name: Arc<str> = element_type.name().into();
        let segment = self.segment_for(e, position);
        self.path.push(segment);
        self.frames.push(Frame {
            name: name.clone(),
            owner: e.owner().map(|owner| owner.name().into()),
        });

        let id = self.instance_for_path();
        let handle = InstanceHandle::new(id, name.clone());
        if let Some(element_ref) = e.element_ref() {
            self.bindings.push(Binding {
                owner: e.owner().cloned(),
                element_ref: element_ref.clone(),
                target: handle.clone(),
            });
        }

        let mut children = Vec::new();
        let node = match element_type {
            ElementType::Tag(_) => {
                if let Some(value) = e.props().children() {
                    self.realize_value(value, &mut Vec::new(), &mut children);
                }
                Node::Host { handle, children }
            }
            ElementType::Component(component) => {
                if let Some(prop_types) = component.prop_types() {
                    let trail = format_trail(&self.frames);
                    for failure in check_prop_types(prop_types, e.props(), &name, &trail) {
                        self.diagnostics
                            .emit(DiagnosticKind::PropTypes, failure.reason, failure.message);
                    }
                }
                let cx =
                    ElementFactory::new(self.diagnostics.clone()).with_owner(Owner::new(id, name));
                let output = component.render(e.props(), &cx);
                self.realize_value(&output, &mut Vec::new(), &mut children);
                Node::Composite { handle, children }
            }
        };

        self.frames.pop();
        self.path.pop();
        node
    }
}

/// `Root` realizes elements into a tree of instances and maintains their ref bindings.
///
/// This is the minimal amount of rendering needed to observe element semantics: components are
/// rendered, tags are expanded into their children, refs are attached to their owners, and
/// declared prop types are checked. An instance keeps its id across renders as long as its position,
/// type and key stay the same.
pub struct Root {
    diagnostics: Diagnostics,
    next_instance: u64,
    instances: HashMap<Vec<Segment>, InstanceId>,
    bindings: Vec<Binding>,
    ref_tables: HashMap<InstanceId, RefTable>,
    tree: Option<Node>,
}

impl Root {
    /// Creates an empty root reporting to the given store.
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self {
            diagnostics,
            next_instance: 0,
            instances: HashMap::new(),
            bindings: Vec::new(),
            ref_tables: HashMap::new(),
            tree: None,
        }
    }

    /// Renders `element`, replacing the previous render. Refs which no longer apply are detached
    /// before new ones are attached.
    pub fn render(&mut self, element: &Element) -> &Node {
        let mut pass = RenderPass {
            diagnostics: &self.diagnostics,
            previous: &self.instances,
            next_instance: &mut self.next_instance,
            instances: HashMap::new(),
            bindings: Vec::new(),
            path: Vec::new(),
            frames: Vec::new(),
        };
        let node = pass.realize_element(element, &[]);
        let instances = pass.instances;
        let bindings = pass.bindings;
        debug!(instances = instances.len(), bindings = bindings.len(), "rendered");

        let live: HashSet<InstanceId> = instances.values().copied().collect();
        self.instances = instances;
        self.ref_tables.retain(|id, _| live.contains(id));
        self.commit_bindings(bindings);
        self.tree.insert(node)
    }

    /// Detaches every ref and forgets every instance.
    pub fn unmount(&mut self) {
        self.commit_bindings(Vec::new());
        self.instances.clear();
        self.ref_tables.clear();
        self.tree = None;
    }

    /// The most recently rendered tree.
    pub fn tree(&self) -> Option<&Node> {
        self.tree.as_ref()
    }

    /// The handle of the top-level instance.
    pub fn root_instance(&self) -> Option<&InstanceHandle> {
        self.tree.as_ref().and_then(Node::handle)
    }

    /// The named refs owned by an instance.
    pub fn refs(&self, instance: InstanceId) -> Option<&RefTable> {
        self.ref_tables.get(&instance)
    }

    fn commit_bindings(&mut self, bindings: Vec<Binding>) {
        let previous = mem::take(&mut self.bindings);
        for binding in previous.iter().filter(|b| !bindings.contains(b)) {
            self.detach(binding);
        }
        for binding in bindings.iter().filter(|b| !previous.contains(b)) {
            self.attach(binding);
        }
        self.bindings = bindings;
    }

    fn detach(&mut self, binding: &Binding) {
        debug!(element_ref = ?binding.element_ref, target = ?binding.target, "detaching ref");
        match (&binding.element_ref, &binding.owner) {
            (Ref::Named(name), Some(owner)) => {
                if let Some(table) = self.ref_tables.get_mut(&owner.instance()) {
                    if table.get(name.as_ref()) == Some(&binding.target) {
                        table.shift_remove(name.as_ref());
                    }
                }
            }
            (Ref::Named(_), None) => {}
            (element_ref, _) => element_ref.detach(),
        }
    }

    fn attach(&mut self, binding: &Binding) {
        debug!(element_ref = ?binding.element_ref, target = ?binding.target, "attaching ref");
        match (&binding.element_ref, &binding.owner) {
            (Ref::Named(name), Some(owner)) => {
                self.ref_tables
                    .entry(owner.instance())
                    .or_default()
                    .insert(name.to_string(), binding.target.clone());
            }
            (Ref::Named(name), None) => {
                self.diagnostics.emit(
                    DiagnosticKind::Refs,
                    name.to_string(),
                    format!(
                        "Element ref was specified as a string ({}) but no owner was set. \
                         String refs can only be attached to elements created during a render.",
                        name
                    ),
                );
            }
            (element_ref, _) => element_ref.attach(&binding.target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, RefObject};

    fn root() -> (Root, ElementFactory) {
        let diagnostics = Diagnostics::new();
        (
            Root::new(diagnostics.clone()),
            ElementFactory::new(diagnostics),
        )
    }

    #[test]
    fn test_render_text() {
        let (mut root, cx) = root();
        let greeting = ElementType::function("Greeting", |props, cx| {
            cx.create("p", None, ["Hello, ", props["name"].as_str().unwrap_or("?")])
                .into()
        });
        let node = root.render(&cx.create(
            "div",
            None,
            [
                cx.create(&greeting, Some(Config::new().set("name", "world")), ()).into(),
                PropValue::from(42),
                PropValue::Null,
                PropValue::Bool(true),
            ],
        ));
        assert_eq!(node.text(), "Hello, world42");
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.children()[0].handle().unwrap().name(), "Greeting");
    }

    #[test]
    fn test_instances_are_stable() {
        let (mut root, cx) = root();
        let first = root.render(&cx.create("div", None, ["a"])).clone();
        let second = root.render(&cx.create("div", None, ["b"])).clone();
        assert_eq!(first.handle(), second.handle());

        let third = root.render(&cx.create("span", None, ())).clone();
        assert_ne!(first.handle().unwrap().id(), third.handle().unwrap().id());
    }

    #[test]
    fn test_object_ref_follows_key() {
        let (mut root, cx) = root();
        let slot = RefObject::new();
        let item = |key: &str| {
            cx.create(
                "li",
                Some(Config::new().set("key", key).set("ref", Ref::from(slot.clone()))),
                (),
            )
        };

        root.render(&cx.create("ul", None, [item("a")]));
        let a = slot.current().unwrap();
        root.render(&cx.create("ul", None, [item("a")]));
        assert_eq!(slot.current(), Some(a.clone()));

        root.render(&cx.create("ul", None, [item("b")]));
        assert_ne!(slot.current().unwrap().id(), a.id());

        root.unmount();
        assert!(slot.current().is_none());
        assert!(root.tree().is_none());
    }

    #[test]
    fn test_named_ref_without_owner() {
        let (mut root, cx) = root();
        root.render(&cx.create("div", Some(Config::new().set("ref", "top")), ()));
        let recorded = root.diagnostics.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].kind, DiagnosticKind::Refs);
        assert!(recorded[0].message.starts_with("Element ref was specified as a string (top)"));
    }

    fn instance_ids(node: &Node, out: &mut Vec<InstanceId>) {
        out.extend(node.handle().map(InstanceHandle::id));
        for child in node.children() {
            instance_ids(child, out);
        }
    }

    #[test]
    fn test_duplicate_key_keeps_subtrees_apart() {
        let (mut root, cx) = root();
        let list = || {
            let item = || {
                cx.create(
                    "li",
                    Some(Config::new().set("key", "same")),
                    [cx.create("span", Some(Config::new().set("key", "x")), ())],
                )
            };
            cx.create("ul", None, [vec![item(), item()]])
        };

        let mut first = Vec::new();
        instance_ids(root.render(&list()), &mut first);
        assert_eq!(first.len(), 5);
        assert_eq!(first.iter().collect::<HashSet<_>>().len(), 5);

        let mut second = Vec::new();
        instance_ids(root.render(&list()), &mut second);
        assert_eq!(second, first);

        let recorded = root.diagnostics.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].kind, DiagnosticKind::DuplicateKey);
        assert!(recorded[0].message.contains("`same`"));
    }

    #[test]
    fn test_trail() {
        let frames = [
            Frame {
                name: "Outer".into(),
                owner: None,
            },
            Frame {
                name: "Inner".into(),
                owner: Some("Outer".into()),
            },
        ];
        assert_eq!(
            format_trail(&frames),
            "\n    in Inner (created by Outer)\n    in Outer"
        );
    }
}
