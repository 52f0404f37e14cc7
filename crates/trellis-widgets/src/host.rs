//! Terminal-side [`FocusHost`]: element tree, cell geometry and focus.
//!
//! A terminal has no document, so widgets describe theirs to a shared
//! [`FocusTree`]. Structure (which element belongs to which container, and
//! which ones take focus) is registered when a widget opens or is built;
//! geometry is refreshed on every render with [`FocusTree::place`]. Mouse
//! hit testing and outside-pointer detection both read those rectangles.
//!
//! The tree also numbers input events. The application calls
//! [`FocusTree::next_event`] once per terminal event before dispatching it,
//! and widgets read [`FocusTree::current_event`] to tell the event that
//! opened a surface apart from later ones.

use ratatui::layout::{Position, Rect};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use trellis_core::{ActivationError, EventId, FocusHost, ListenerId, ListenerKind};

/// Name of an element in a [`FocusTree`].
///
/// Widgets derive child ids from their own with [`ElementId::child`], which
/// gives path-like names such as `settings/action/1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The implicit root that every top-level element hangs off.
    pub fn root() -> Self {
        Self(String::from("root"))
    }

    /// `self/part`.
    pub fn child(&self, part: impl fmt::Display) -> Self {
        Self(format!("{}/{}", self.0, part))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug)]
struct TreeNode {
    id: ElementId,
    parent: Option<ElementId>,
    focusable: bool,
    rect: Rect,
}

#[derive(Debug)]
struct TreeState {
    nodes: Vec<TreeNode>,
    focused: Option<ElementId>,
    listeners: BTreeMap<ListenerId, (ElementId, ListenerKind)>,
    next_listener: u64,
    event: u64,
    scroll_locked: bool,
}

impl TreeState {
    fn node(&self, id: &ElementId) -> Option<&TreeNode> {
        self.nodes.iter().find(|n| n.id == *id)
    }

    fn contains(&self, container: &ElementId, element: &ElementId) -> bool {
        let mut current = Some(element);
        while let Some(id) = current {
            if id == container {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent.as_ref());
        }
        false
    }

    fn depth(&self, id: &ElementId) -> usize {
        let mut depth = 0;
        let mut current = self.node(id).and_then(|n| n.parent.as_ref());
        while let Some(parent) = current {
            depth += 1;
            current = self.node(parent).and_then(|n| n.parent.as_ref());
        }
        depth
    }

    fn walk(&self, parent: &ElementId, out: &mut Vec<ElementId>) {
        for child in self.nodes.iter().filter(|n| n.parent.as_ref() == Some(parent)) {
            if child.focusable {
                out.push(child.id.clone());
            }
            self.walk(&child.id, out);
        }
    }
}

/// Shared element tree for one terminal UI. Cloning yields another handle
/// to the same tree.
#[derive(Debug, Clone)]
pub struct FocusTree {
    inner: Rc<RefCell<TreeState>>,
}

impl Default for FocusTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusTree {
    /// Create a tree holding only the root element.
    pub fn new() -> Self {
        let root = TreeNode {
            id: ElementId::root(),
            parent: None,
            focusable: false,
            rect: Rect::default(),
        };
        Self {
            inner: Rc::new(RefCell::new(TreeState {
                nodes: vec![root],
                focused: None,
                listeners: BTreeMap::new(),
                next_listener: 0,
                event: 0,
                scroll_locked: false,
            })),
        }
    }

    /// Register `id` under `parent` (the root when `None`), or update its
    /// parent and focusability if it already exists. Order of first
    /// registration is traversal order among siblings.
    pub fn insert(&self, id: ElementId, parent: Option<&ElementId>, focusable: bool) {
        let parent = Some(parent.cloned().unwrap_or_else(ElementId::root));
        let mut state = self.inner.borrow_mut();
        if let Some(node) = state.nodes.iter_mut().find(|n| n.id == id) {
            node.parent = parent;
            node.focusable = focusable;
            return;
        }
        state.nodes.push(TreeNode {
            id,
            parent,
            focusable,
            rect: Rect::default(),
        });
    }

    /// Remove `id` and everything below it.
    pub fn remove(&self, id: &ElementId) {
        let mut state = self.inner.borrow_mut();
        let doomed: Vec<ElementId> = state
            .nodes
            .iter()
            .filter(|n| state.contains(id, &n.id))
            .map(|n| n.id.clone())
            .collect();
        state.nodes.retain(|n| !doomed.contains(&n.id));
        if state.focused.as_ref().is_some_and(|f| doomed.contains(f)) {
            state.focused = None;
        }
    }

    /// Record where `id` was drawn. Unknown ids are ignored.
    pub fn place(&self, id: &ElementId, rect: Rect) {
        let mut state = self.inner.borrow_mut();
        if let Some(node) = state.nodes.iter_mut().find(|n| n.id == *id) {
            node.rect = rect;
        }
    }

    pub fn rect(&self, id: &ElementId) -> Option<Rect> {
        self.inner.borrow().node(id).map(|n| n.rect)
    }

    /// Whether `id` is registered.
    pub fn exists(&self, id: &ElementId) -> bool {
        self.inner.borrow().node(id).is_some()
    }

    /// The deepest element drawn at `(column, row)`, or the root if none.
    /// Among equally deep elements the one registered last wins.
    pub fn hit_test(&self, column: u16, row: u16) -> ElementId {
        let state = self.inner.borrow();
        let point = Position::new(column, row);
        state
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.rect.contains(point))
            .max_by_key(|(i, n)| (state.depth(&n.id), *i))
            .map(|(_, n)| n.id.clone())
            .unwrap_or_else(ElementId::root)
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.inner.borrow().focused.clone()
    }

    pub fn is_focused(&self, id: &ElementId) -> bool {
        self.inner.borrow().focused.as_ref() == Some(id)
    }

    /// Move focus to `id` if it is registered.
    pub fn focus_element(&self, id: &ElementId) {
        let mut state = self.inner.borrow_mut();
        if state.node(id).is_some() {
            state.focused = Some(id.clone());
        }
    }

    /// Start a new input event and return its id.
    pub fn next_event(&self) -> EventId {
        let mut state = self.inner.borrow_mut();
        state.event += 1;
        EventId(state.event)
    }

    /// The id of the event being dispatched.
    pub fn current_event(&self) -> EventId {
        EventId(self.inner.borrow().event)
    }

    /// Whether background scrolling is suspended by an open overlay.
    pub fn scroll_locked(&self) -> bool {
        self.inner.borrow().scroll_locked
    }

    /// Whether some scope listens for `kind` events on `container`.
    pub fn has_listener(&self, container: &ElementId, kind: ListenerKind) -> bool {
        self.inner
            .borrow()
            .listeners
            .values()
            .any(|(id, k)| id == container && *k == kind)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl FocusHost for FocusTree {
    type Element = ElementId;

    fn focusable_descendants(&self, container: &ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.inner.borrow().walk(container, &mut out);
        out
    }

    fn active_element(&self) -> Option<ElementId> {
        self.focused()
    }

    fn focus(&self, element: &ElementId) {
        self.focus_element(element);
    }

    fn contains(&self, container: &ElementId, element: &ElementId) -> bool {
        self.inner.borrow().contains(container, element)
    }

    fn is_attached(&self, element: &ElementId) -> bool {
        self.exists(element)
    }

    fn listen(
        &self,
        container: &ElementId,
        kind: ListenerKind,
    ) -> Result<ListenerId, ActivationError> {
        let mut state = self.inner.borrow_mut();
        if state.node(container).is_none() {
            return Err(ActivationError::ListenerRegistration(format!(
                "no element {container}"
            )));
        }
        let id = ListenerId(state.next_listener);
        state.next_listener += 1;
        state.listeners.insert(id, (container.clone(), kind));
        Ok(id)
    }

    fn unlisten(&self, listener: ListenerId) {
        self.inner.borrow_mut().listeners.remove(&listener);
    }

    fn set_scroll_locked(&self, locked: bool) {
        self.inner.borrow_mut().scroll_locked = locked;
    }
}
