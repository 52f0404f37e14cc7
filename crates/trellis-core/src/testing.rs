use crate::error::ActivationError;
use crate::focus::{FocusHost, ListenerId, ListenerKind};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// An in-memory element tree implementing [`FocusHost`], for exercising
/// focus scopes without a real UI.
///
/// Elements are named by `&'static str`. Children keep insertion order, and
/// traversal order is a depth-first walk from the roots, so an element added
/// late to an early container still sorts inside that container.
///
/// # Example
///
/// ```
/// use trellis_core::testing::FakeDom;
///
/// let dom = FakeDom::new();
/// dom.add("form", None, false);
/// dom.add("name", Some("form"), true);
/// dom.focus_element("name");
/// assert_eq!(dom.focused(), Some("name"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FakeDom {
    inner: Rc<RefCell<DomState>>,
}

#[derive(Debug, Default)]
struct DomState {
    nodes: Vec<Node>,
    focused: Option<&'static str>,
    listeners: BTreeMap<ListenerId, ListenerKind>,
    next_listener: u64,
    fail_listeners: bool,
    scroll_locked: bool,
}

#[derive(Debug)]
struct Node {
    name: &'static str,
    parent: Option<&'static str>,
    focusable: bool,
    attached: bool,
}

impl DomState {
    fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    fn is_attached(&self, name: &str) -> bool {
        let mut current = Some(name);
        while let Some(name) = current {
            match self.node(name) {
                Some(node) if node.attached => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    fn contains(&self, container: &str, element: &str) -> bool {
        let mut current = Some(element);
        while let Some(name) = current {
            if name == container {
                return true;
            }
            current = self.node(name).and_then(|n| n.parent);
        }
        false
    }

    fn walk(&self, parent: &str, out: &mut Vec<&'static str>) {
        for child in self.nodes.iter().filter(|n| n.parent == Some(parent)) {
            if !child.attached {
                continue;
            }
            if child.focusable {
                out.push(child.name);
            }
            self.walk(child.name, out);
        }
    }
}

impl FakeDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attached element under `parent` (or as a root).
    pub fn add(&self, name: &'static str, parent: Option<&'static str>, focusable: bool) {
        self.inner.borrow_mut().nodes.push(Node {
            name,
            parent,
            focusable,
            attached: true,
        });
    }

    /// Detach an element (and with it, its subtree) from the tree.
    pub fn detach(&self, name: &str) {
        let mut state = self.inner.borrow_mut();
        if let Some(node) = state.nodes.iter_mut().find(|n| n.name == name) {
            node.attached = false;
        }
    }

    /// Move focus directly, bypassing any scope.
    pub fn focus_element(&self, name: &'static str) {
        self.inner.borrow_mut().focused = Some(name);
    }

    pub fn focused(&self) -> Option<&'static str> {
        self.inner.borrow().focused
    }

    /// Number of listeners currently registered.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Number of listeners of one kind currently registered.
    pub fn listeners_of(&self, kind: ListenerKind) -> usize {
        self.inner
            .borrow()
            .listeners
            .values()
            .filter(|k| **k == kind)
            .count()
    }

    /// Make every subsequent [`FocusHost::listen`] call fail.
    pub fn fail_listeners(&self, fail: bool) {
        self.inner.borrow_mut().fail_listeners = fail;
    }

    pub fn scroll_locked(&self) -> bool {
        self.inner.borrow().scroll_locked
    }
}

impl FocusHost for FakeDom {
    type Element = &'static str;

    fn focusable_descendants(&self, container: &&'static str) -> Vec<&'static str> {
        let mut out = Vec::new();
        self.inner.borrow().walk(container, &mut out);
        out
    }

    fn active_element(&self) -> Option<&'static str> {
        self.focused()
    }

    fn focus(&self, element: &&'static str) {
        let mut state = self.inner.borrow_mut();
        if state.is_attached(element) {
            state.focused = Some(*element);
        }
    }

    fn contains(&self, container: &&'static str, element: &&'static str) -> bool {
        self.inner.borrow().contains(container, element)
    }

    fn is_attached(&self, element: &&'static str) -> bool {
        self.inner.borrow().is_attached(element)
    }

    fn listen(
        &self,
        _container: &&'static str,
        kind: ListenerKind,
    ) -> Result<ListenerId, ActivationError> {
        let mut state = self.inner.borrow_mut();
        if state.fail_listeners {
            return Err(ActivationError::ListenerRegistration(format!(
                "{kind:?} listeners disabled"
            )));
        }
        let id = ListenerId(state.next_listener);
        state.next_listener += 1;
        state.listeners.insert(id, kind);
        Ok(id)
    }

    fn unlisten(&self, listener: ListenerId) {
        self.inner.borrow_mut().listeners.remove(&listener);
    }

    fn set_scroll_locked(&self, locked: bool) {
        self.inner.borrow_mut().scroll_locked = locked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_is_depth_first() {
        let dom = FakeDom::new();
        dom.add("root", None, false);
        dom.add("a", Some("root"), true);
        dom.add("group", Some("root"), false);
        dom.add("b", Some("root"), true);
        dom.add("a2", Some("group"), true);
        assert_eq!(dom.focusable_descendants(&"root"), vec!["a", "a2", "b"]);
    }

    #[test]
    fn detached_subtrees_disappear() {
        let dom = FakeDom::new();
        dom.add("root", None, false);
        dom.add("group", Some("root"), false);
        dom.add("x", Some("group"), true);
        dom.detach("group");
        assert!(!dom.is_attached(&"x"));
        assert!(dom.focusable_descendants(&"root").is_empty());
        dom.focus(&"x");
        assert_eq!(dom.focused(), None);
    }

    #[test]
    fn containment_includes_self() {
        let dom = FakeDom::new();
        dom.add("root", None, false);
        dom.add("x", Some("root"), true);
        assert!(dom.contains(&"root", &"root"));
        assert!(dom.contains(&"root", &"x"));
        assert!(!dom.contains(&"x", &"root"));
    }
}
