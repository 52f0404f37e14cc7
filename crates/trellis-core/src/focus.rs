//! Focus containment and dismissal for transient surfaces.
//!
//! A [`FocusScope`] turns a container into a surface that keeps keyboard
//! focus inside itself while active, gives focus back to whatever had it
//! before, and reports dismissal triggers (Escape, pointer activity outside
//! the container). Modals, drawers, dropdown menus and popovers all share
//! it.
//!
//! The scope never inspects a document tree or measures anything itself.
//! Everything it needs comes from a [`FocusHost`] supplied by the rendering
//! layer.
//!
//! # Outside pointer and the opening event
//!
//! The click that opens a surface is usually still being dispatched when the
//! surface activates. If the outside-pointer listener were live at that
//! point, the same click would immediately dismiss the surface again. The
//! pointer listener is therefore registered one event-queue turn later:
//! either when the host calls [`FocusScope::advance_turn`], or when an
//! outside pointer event with a different [`EventId`] than the triggering
//! one arrives.

use crate::error::ActivationError;
use crate::layers::{LayerId, LayerStack, LockTransition};
use std::fmt;

/// Identifies one dispatched input event, so the event that activated a
/// scope can be told apart from later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(pub u64);

/// Handle returned by [`FocusHost::listen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Input a scope asks its host to route to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Tab and Escape key presses.
    Keyboard,
    /// Pointer-down anywhere, for outside detection.
    Pointer,
}

/// The rendering layer's side of a [`FocusScope`]: element enumeration,
/// focus, containment and listener plumbing.
///
/// Methods take `&self`; hosts are typically cheap handles onto shared UI
/// state.
pub trait FocusHost {
    /// Whatever the host uses to name an element.
    type Element: Clone + PartialEq + fmt::Debug;

    /// Focusable descendants of `container` in traversal order.
    fn focusable_descendants(&self, container: &Self::Element) -> Vec<Self::Element>;

    /// The element that currently has focus, if any.
    fn active_element(&self) -> Option<Self::Element>;

    /// Move focus to `element`.
    fn focus(&self, element: &Self::Element);

    /// Whether `element` is `container` or one of its descendants.
    fn contains(&self, container: &Self::Element, element: &Self::Element) -> bool;

    /// Whether `element` is still part of the live tree.
    fn is_attached(&self, element: &Self::Element) -> bool;

    /// Start routing `kind` events for `container` to the scope.
    fn listen(
        &self,
        container: &Self::Element,
        kind: ListenerKind,
    ) -> Result<ListenerId, ActivationError>;

    /// Stop routing events for a listener returned by [`listen`](Self::listen).
    fn unlisten(&self, listener: ListenerId);

    /// Suspend or resume background scrolling.
    fn set_scroll_locked(&self, locked: bool);
}

/// Result of [`FocusScope::activate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Focus is trapped inside the container.
    Trapped,
    /// Focus could not be trapped. The scope is active and still dismissible,
    /// but Tab handling is a no-op and no scroll lock was taken.
    Degraded(ActivationError),
}

/// Why the dismissal callback fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Escape,
    OutsidePointer,
}

/// Where [`FocusScope::handle_tab_key`] moved focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabMove<E> {
    /// Focus wrapped from one end of the list to the other. Hosts with a
    /// native Tab traversal must suppress it.
    Wrapped(E),
    /// Focus moved to the neighbouring element, as native traversal would.
    Advanced(E),
    /// Nothing focusable inside; focus stays on the container.
    Pinned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointerListener {
    /// Waiting for the next turn; `trigger` is the event that activated us.
    Deferred { trigger: Option<EventId> },
    Armed(ListenerId),
    /// Registration failed; outside detection still works through direct
    /// calls from the rendering layer.
    Unavailable,
}

/// Everything a scope remembers between `activate` and `deactivate`.
#[derive(Debug)]
struct ActivationRecord<E> {
    container: E,
    dismissable: bool,
    previously_focused: Option<E>,
    focusable: Vec<E>,
    keyboard: Option<ListenerId>,
    pointer: PointerListener,
    /// Degraded activations hold an unlocked layer.
    layer: LayerId,
    trapped: bool,
}

impl<E> ActivationRecord<E> {
    fn is_trapped(&self) -> bool {
        self.trapped
    }
}

/// Contains keyboard focus inside an active surface and reports dismissal.
///
/// # Example
///
/// ```
/// use trellis_core::focus::{FocusScope, Activation};
/// use trellis_core::layers::LayerStack;
/// use trellis_core::testing::FakeDom;
///
/// let dom = FakeDom::new();
/// dom.add("open", None, true);
/// dom.add("dialog", None, false);
/// dom.add("ok", Some("dialog"), true);
/// dom.add("cancel", Some("dialog"), true);
/// dom.focus_element("open");
///
/// let mut scope = FocusScope::new(dom.clone(), LayerStack::new());
/// assert_eq!(scope.activate("dialog", true, None), Activation::Trapped);
/// assert_eq!(dom.focused(), Some("ok"));
///
/// scope.deactivate();
/// assert_eq!(dom.focused(), Some("open"));
/// ```
pub struct FocusScope<H: FocusHost> {
    host: H,
    layers: LayerStack,
    record: Option<ActivationRecord<H::Element>>,
    on_dismiss: Option<Box<dyn FnMut(DismissReason)>>,
}

impl<H: FocusHost> FocusScope<H> {
    /// Create an inactive scope bound to `host` and `layers`.
    pub fn new(host: H, layers: LayerStack) -> Self {
        Self {
            host,
            layers,
            record: None,
            on_dismiss: None,
        }
    }

    /// Set the callback invoked when the surface should be dismissed.
    pub fn on_dismiss(mut self, f: impl FnMut(DismissReason) + 'static) -> Self {
        self.on_dismiss = Some(Box::new(f));
        self
    }

    /// Replace the dismissal callback.
    pub fn set_on_dismiss(&mut self, f: impl FnMut(DismissReason) + 'static) {
        self.on_dismiss = Some(Box::new(f));
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    /// Whether the scope has an activation record.
    pub fn is_active(&self) -> bool {
        self.record.is_some()
    }

    /// Whether the scope is active and actually trapping focus.
    pub fn is_trapped(&self) -> bool {
        self.record.as_ref().is_some_and(ActivationRecord::is_trapped)
    }

    /// The container of the current activation.
    pub fn container(&self) -> Option<&H::Element> {
        self.record.as_ref().map(|r| &r.container)
    }

    /// The focusable elements captured at activation time.
    pub fn focusable(&self) -> &[H::Element] {
        self.record.as_ref().map_or(&[], |r| r.focusable.as_slice())
    }

    /// Position of the focused element inside the captured list.
    pub fn focused_index(&self) -> Option<usize> {
        let record = self.record.as_ref()?;
        let active = self.host.active_element()?;
        record.focusable.iter().position(|el| *el == active)
    }

    /// Whether this scope is the innermost active surface.
    pub fn is_topmost(&self) -> bool {
        self.record.as_ref().is_some_and(|r| self.record_is_topmost(r))
    }

    /// Activate the scope on `container`.
    ///
    /// `trigger` is the event that caused the activation, if any; it will
    /// never count as an outside pointer. Calling `activate` on an active
    /// scope re-snapshots and re-activates without nesting, keeping the
    /// originally focused element as the restore target.
    pub fn activate(
        &mut self,
        container: H::Element,
        dismissable: bool,
        trigger: Option<EventId>,
    ) -> Activation {
        let (previously_focused, layer) = match self.record.take() {
            Some(old) => {
                self.release_listeners(&old);
                (old.previously_focused, Some(old.layer))
            }
            None => (self.host.active_element(), None),
        };

        match self.install(&container) {
            Ok((focusable, keyboard)) => {
                let layer = self.claim_layer(layer, true);
                match focusable.first() {
                    Some(first) => self.host.focus(first),
                    None => self.host.focus(&container),
                }
                log::debug!(
                    "focus scope activated on {container:?} with {} focusable element(s)",
                    focusable.len()
                );
                self.record = Some(ActivationRecord {
                    container,
                    dismissable,
                    previously_focused,
                    focusable,
                    keyboard: Some(keyboard),
                    pointer: PointerListener::Deferred { trigger },
                    layer,
                    trapped: true,
                });
                Activation::Trapped
            }
            Err(err) => {
                log::warn!("focus scope on {container:?} degraded: {err}");
                let layer = self.claim_layer(layer, false);
                self.record = Some(ActivationRecord {
                    container,
                    dismissable,
                    previously_focused,
                    focusable: Vec::new(),
                    keyboard: None,
                    pointer: PointerListener::Deferred { trigger },
                    layer,
                    trapped: false,
                });
                Activation::Degraded(err)
            }
        }
    }

    /// Tear the activation down: remove listeners, release the scroll lock,
    /// and restore focus to the previously focused element if it is still
    /// attached. No-op when inactive.
    pub fn deactivate(&mut self) {
        let Some(record) = self.record.take() else {
            return;
        };
        self.release_listeners(&record);
        self.remove_layer(record.layer);
        if let Some(previous) = record.previously_focused {
            if self.host.is_attached(&previous) {
                self.host.focus(&previous);
            } else {
                log::debug!("not restoring focus to detached {previous:?}");
            }
        }
        log::debug!("focus scope on {:?} deactivated", record.container);
    }

    /// Mark the start of a new event-queue turn: a deferred outside-pointer
    /// listener is registered now.
    pub fn advance_turn(&mut self) {
        self.arm_pointer();
    }

    /// Handle Tab / Shift+Tab.
    ///
    /// Focus cycles over the captured list: Shift+Tab on the first element
    /// goes to the last, Tab on the last goes to the first, and anything in
    /// between moves to the neighbour. Focus that has strayed outside the
    /// list re-enters at the first (Tab) or last (Shift+Tab) element. With
    /// nothing focusable, focus is pinned to the container.
    ///
    /// Returns `None` when the scope is inactive or degraded.
    pub fn handle_tab_key(&mut self, shift_held: bool) -> Option<TabMove<H::Element>> {
        let record = self.record.as_ref().filter(|r| r.is_trapped())?;
        if record.focusable.is_empty() {
            self.host.focus(&record.container);
            return Some(TabMove::Pinned);
        }

        let last = record.focusable.len() - 1;
        let current = self
            .host
            .active_element()
            .and_then(|active| record.focusable.iter().position(|el| *el == active));
        let (index, wrapped) = match (current, shift_held) {
            (Some(0), true) | (None, true) => (last, true),
            (Some(i), false) if i == last => (0, true),
            (None, false) => (0, true),
            (Some(i), true) => (i - 1, false),
            (Some(i), false) => (i + 1, false),
        };

        let target = record.focusable[index].clone();
        self.host.focus(&target);
        Some(if wrapped {
            TabMove::Wrapped(target)
        } else {
            TabMove::Advanced(target)
        })
    }

    /// Focus the first captured element (or the container if there is none).
    pub fn focus_first(&mut self) {
        if let Some(record) = self.record.as_ref().filter(|r| r.is_trapped()) {
            self.host
                .focus(record.focusable.first().unwrap_or(&record.container));
        }
    }

    /// Focus the last captured element (or the container if there is none).
    pub fn focus_last(&mut self) {
        if let Some(record) = self.record.as_ref().filter(|r| r.is_trapped()) {
            self.host
                .focus(record.focusable.last().unwrap_or(&record.container));
        }
    }

    /// Pull focus back inside when it lands on `target` outside the
    /// container. Returns `true` if focus was reclaimed.
    pub fn handle_focus_in(&mut self, target: &H::Element) -> bool {
        let Some(record) = self.record.as_ref().filter(|r| r.is_trapped()) else {
            return false;
        };
        if !self.record_is_topmost(record) || self.host.contains(&record.container, target) {
            return false;
        }
        let home = record.focusable.first().unwrap_or(&record.container);
        self.host.focus(home);
        true
    }

    /// Escape pressed. Fires the dismissal callback iff the scope is
    /// dismissable and innermost. Returns whether it fired.
    pub fn handle_escape(&mut self) -> bool {
        let Some(record) = self.record.as_ref() else {
            return false;
        };
        if !record.dismissable || !self.record_is_topmost(record) {
            return false;
        }
        self.dismiss(DismissReason::Escape);
        true
    }

    /// Pointer-down on `target` during event `event`.
    ///
    /// Fires the dismissal callback iff the scope is dismissable, innermost,
    /// `target` lies outside the container, and `event` is not the event
    /// that activated the scope. Returns whether it fired.
    pub fn handle_outside_pointer(&mut self, event: EventId, target: &H::Element) -> bool {
        let Some(record) = self.record.as_ref() else {
            return false;
        };
        if let PointerListener::Deferred { trigger } = record.pointer {
            if trigger == Some(event) {
                log::trace!("ignoring activating event {event:?}");
                return false;
            }
            // A different event means the activating turn is over.
            self.arm_pointer();
        }

        let Some(record) = self.record.as_ref() else {
            return false;
        };
        if !record.dismissable
            || !self.record_is_topmost(record)
            || self.host.contains(&record.container, target)
        {
            return false;
        }
        self.dismiss(DismissReason::OutsidePointer);
        true
    }

    fn dismiss(&mut self, reason: DismissReason) {
        log::debug!("focus scope dismissed by {reason:?}");
        if let Some(on_dismiss) = self.on_dismiss.as_mut() {
            on_dismiss(reason);
        }
    }

    fn record_is_topmost(&self, record: &ActivationRecord<H::Element>) -> bool {
        self.layers.is_topmost(record.layer)
    }

    fn install(
        &self,
        container: &H::Element,
    ) -> Result<(Vec<H::Element>, ListenerId), ActivationError> {
        if !self.host.is_attached(container) {
            return Err(ActivationError::MissingContainer);
        }
        let keyboard = self.host.listen(container, ListenerKind::Keyboard)?;
        Ok((self.host.focusable_descendants(container), keyboard))
    }

    fn arm_pointer(&mut self) {
        let Some(record) = self.record.as_mut() else {
            return;
        };
        if !matches!(record.pointer, PointerListener::Deferred { .. }) {
            return;
        }
        record.pointer = match self.host.listen(&record.container, ListenerKind::Pointer) {
            Ok(id) => PointerListener::Armed(id),
            Err(err) => {
                log::warn!("outside pointer listener unavailable: {err}");
                PointerListener::Unavailable
            }
        };
    }

    fn release_listeners(&self, record: &ActivationRecord<H::Element>) {
        if let Some(keyboard) = record.keyboard {
            self.host.unlisten(keyboard);
        }
        if let PointerListener::Armed(pointer) = record.pointer {
            self.host.unlisten(pointer);
        }
    }

    /// Reuse `existing` with the requested lock, or push a fresh layer.
    fn claim_layer(&self, existing: Option<LayerId>, locked: bool) -> LayerId {
        let reused = existing
            .and_then(|layer| Some((layer, self.layers.set_locked(layer, locked)?)));
        let (layer, transition) = match reused {
            Some((layer, transition)) => (layer, Some(transition)),
            None if locked => {
                let (layer, transition) = self.layers.push();
                (layer, Some(transition))
            }
            None => (self.layers.push_unlocked(), None),
        };
        self.apply_lock(transition);
        layer
    }

    fn remove_layer(&self, layer: LayerId) {
        self.apply_lock(self.layers.remove(layer));
    }

    fn apply_lock(&self, transition: Option<LockTransition>) {
        match transition {
            Some(LockTransition::Engaged) => {
                log::debug!("background scroll locked");
                self.host.set_scroll_locked(true);
            }
            Some(LockTransition::Released) => {
                log::debug!("background scroll released");
                self.host.set_scroll_locked(false);
            }
            _ => {}
        }
    }
}

impl<H: FocusHost> Drop for FocusScope<H> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDom;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn dialog_dom() -> FakeDom {
        let dom = FakeDom::new();
        dom.add("page", None, false);
        dom.add("opener", Some("page"), true);
        dom.add("dialog", None, false);
        dom.add("first", Some("dialog"), true);
        dom.add("label", Some("dialog"), false);
        dom.add("middle", Some("dialog"), true);
        dom.add("last", Some("dialog"), true);
        dom.focus_element("opener");
        dom
    }

    type DismissLog = Rc<RefCell<Vec<DismissReason>>>;

    fn recording_scope(dom: &FakeDom, layers: &LayerStack) -> (FocusScope<FakeDom>, DismissLog) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let scope = FocusScope::new(dom.clone(), layers.clone())
            .on_dismiss(move |reason| sink.borrow_mut().push(reason));
        (scope, log)
    }

    #[test]
    fn activate_focuses_first_and_snapshots() {
        let dom = dialog_dom();
        let mut scope = FocusScope::new(dom.clone(), LayerStack::new());
        assert_eq!(scope.activate("dialog", true, None), Activation::Trapped);
        assert_eq!(scope.focusable(), &["first", "middle", "last"]);
        assert_eq!(dom.focused(), Some("first"));
        assert_eq!(scope.focused_index(), Some(0));
        assert!(dom.scroll_locked());
        assert_eq!(dom.listener_count(), 1);
    }

    #[test]
    fn activate_without_focusables_focuses_container() {
        let dom = FakeDom::new();
        dom.add("empty", None, false);
        let mut scope = FocusScope::new(dom.clone(), LayerStack::new());
        scope.activate("empty", false, None);
        assert_eq!(dom.focused(), Some("empty"));
        assert_eq!(scope.handle_tab_key(false), Some(TabMove::Pinned));
        assert_eq!(scope.handle_tab_key(true), Some(TabMove::Pinned));
        assert_eq!(dom.focused(), Some("empty"));
    }

    #[test]
    fn tab_cycles_through_all_elements() {
        let dom = dialog_dom();
        let mut scope = FocusScope::new(dom.clone(), LayerStack::new());
        scope.activate("dialog", true, None);

        assert_eq!(scope.handle_tab_key(false), Some(TabMove::Advanced("middle")));
        assert_eq!(scope.handle_tab_key(false), Some(TabMove::Advanced("last")));
        assert_eq!(scope.handle_tab_key(false), Some(TabMove::Wrapped("first")));
        assert_eq!(dom.focused(), Some("first"));
    }

    #[test]
    fn shift_tab_wraps_backwards() {
        let dom = dialog_dom();
        let mut scope = FocusScope::new(dom.clone(), LayerStack::new());
        scope.activate("dialog", true, None);

        assert_eq!(scope.handle_tab_key(true), Some(TabMove::Wrapped("last")));
        assert_eq!(scope.handle_tab_key(true), Some(TabMove::Advanced("middle")));
        assert_eq!(dom.focused(), Some("middle"));
    }

    #[test]
    fn strayed_focus_reenters() {
        let dom = dialog_dom();
        let mut scope = FocusScope::new(dom.clone(), LayerStack::new());
        scope.activate("dialog", true, None);
        dom.focus_element("opener");
        assert_eq!(scope.handle_tab_key(false), Some(TabMove::Wrapped("first")));
        dom.focus_element("opener");
        assert_eq!(scope.handle_tab_key(true), Some(TabMove::Wrapped("last")));
    }

    #[test]
    fn focus_in_outside_is_reclaimed() {
        let dom = dialog_dom();
        let mut scope = FocusScope::new(dom.clone(), LayerStack::new());
        scope.activate("dialog", true, None);
        dom.focus_element("opener");
        assert!(scope.handle_focus_in(&"opener"));
        assert_eq!(dom.focused(), Some("first"));
        assert!(!scope.handle_focus_in(&"middle"));
    }

    #[test]
    fn deactivate_restores_focus_and_releases() {
        let dom = dialog_dom();
        let mut scope = FocusScope::new(dom.clone(), LayerStack::new());
        scope.activate("dialog", true, None);
        scope.advance_turn();
        assert_eq!(dom.listener_count(), 2);

        scope.deactivate();
        assert!(!scope.is_active());
        assert_eq!(dom.focused(), Some("opener"));
        assert_eq!(dom.listener_count(), 0);
        assert!(!dom.scroll_locked());
    }

    #[test]
    fn deactivate_skips_detached_restore_target() {
        let dom = dialog_dom();
        let mut scope = FocusScope::new(dom.clone(), LayerStack::new());
        scope.activate("dialog", true, None);
        dom.focus_element("middle");
        dom.detach("opener");
        scope.deactivate();
        assert_eq!(dom.focused(), Some("middle"));
    }

    #[test]
    fn deactivate_when_inactive_is_noop() {
        let dom = dialog_dom();
        let mut scope = FocusScope::new(dom.clone(), LayerStack::new());
        scope.deactivate();
        assert_eq!(dom.focused(), Some("opener"));
        assert_eq!(scope.handle_tab_key(false), None);
        assert!(!scope.handle_escape());
    }

    #[test]
    fn escape_respects_dismissable() {
        let dom = dialog_dom();
        let layers = LayerStack::new();
        let (mut scope, log) = recording_scope(&dom, &layers);

        scope.activate("dialog", false, None);
        assert!(!scope.handle_escape());
        assert!(log.borrow().is_empty());

        scope.activate("dialog", true, None);
        assert!(scope.handle_escape());
        assert_eq!(*log.borrow(), vec![DismissReason::Escape]);
    }

    #[test]
    fn activating_event_does_not_dismiss() {
        let dom = dialog_dom();
        let layers = LayerStack::new();
        let (mut scope, log) = recording_scope(&dom, &layers);

        scope.activate("dialog", true, Some(EventId(7)));
        assert!(!scope.handle_outside_pointer(EventId(7), &"opener"));
        assert!(log.borrow().is_empty());

        assert!(scope.handle_outside_pointer(EventId(8), &"opener"));
        assert_eq!(*log.borrow(), vec![DismissReason::OutsidePointer]);
    }

    #[test]
    fn pointer_listener_registers_on_next_turn() {
        let dom = dialog_dom();
        let mut scope = FocusScope::new(dom.clone(), LayerStack::new());
        scope.activate("dialog", true, Some(EventId(1)));
        assert_eq!(dom.listeners_of(ListenerKind::Pointer), 0);
        scope.advance_turn();
        assert_eq!(dom.listeners_of(ListenerKind::Pointer), 1);
        scope.advance_turn();
        assert_eq!(dom.listeners_of(ListenerKind::Pointer), 1);
    }

    #[test]
    fn inside_pointer_does_not_dismiss() {
        let dom = dialog_dom();
        let layers = LayerStack::new();
        let (mut scope, log) = recording_scope(&dom, &layers);
        scope.activate("dialog", true, None);
        assert!(!scope.handle_outside_pointer(EventId(2), &"label"));
        assert!(!scope.handle_outside_pointer(EventId(3), &"dialog"));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn non_dismissable_ignores_outside_pointer() {
        let dom = dialog_dom();
        let layers = LayerStack::new();
        let (mut scope, log) = recording_scope(&dom, &layers);
        scope.activate("dialog", false, None);
        assert!(!scope.handle_outside_pointer(EventId(2), &"opener"));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn reactivation_does_not_nest() {
        let dom = dialog_dom();
        let layers = LayerStack::new();
        let mut scope = FocusScope::new(dom.clone(), layers.clone());
        scope.activate("dialog", true, None);
        scope.advance_turn();
        dom.add("late", Some("dialog"), true);
        scope.activate("dialog", true, None);

        assert_eq!(layers.depth(), 1);
        assert_eq!(layers.scroll_locks(), 1);
        assert_eq!(dom.listener_count(), 1);
        assert_eq!(scope.focusable().len(), 4);

        scope.deactivate();
        assert_eq!(dom.focused(), Some("opener"));
        assert_eq!(layers.scroll_locks(), 0);
    }

    #[test]
    fn nested_scopes_stack() {
        let dom = dialog_dom();
        dom.add("menu", Some("dialog"), false);
        dom.add("item-a", Some("menu"), true);
        dom.add("item-b", Some("menu"), true);

        let layers = LayerStack::new();
        let (mut outer, outer_log) = recording_scope(&dom, &layers);
        let (mut inner, inner_log) = recording_scope(&dom, &layers);

        outer.activate("dialog", true, None);
        dom.focus_element("middle");
        inner.activate("menu", true, None);
        assert_eq!(dom.focused(), Some("item-a"));

        // Only the innermost scope reacts.
        assert!(!outer.handle_escape());
        assert!(inner.handle_escape());
        assert!(outer_log.borrow().is_empty());
        assert_eq!(inner_log.borrow().len(), 1);

        inner.deactivate();
        assert_eq!(dom.focused(), Some("middle"));
        assert!(dom.scroll_locked());
        assert!(outer.is_topmost());

        outer.deactivate();
        assert!(!dom.scroll_locked());
        assert_eq!(dom.focused(), Some("opener"));
    }

    #[test]
    fn missing_container_degrades() {
        let dom = dialog_dom();
        let layers = LayerStack::new();
        let (mut scope, log) = recording_scope(&dom, &layers);

        let outcome = scope.activate("ghost", true, None);
        assert_eq!(outcome, Activation::Degraded(ActivationError::MissingContainer));
        assert!(scope.is_active());
        assert!(!scope.is_trapped());
        assert_eq!(dom.focused(), Some("opener"));
        assert!(!dom.scroll_locked());
        assert_eq!(scope.handle_tab_key(false), None);

        // Still dismissible.
        assert!(scope.handle_escape());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn degraded_inner_scope_shadows_outer() {
        let dom = dialog_dom();
        let layers = LayerStack::new();
        let (mut outer, outer_log) = recording_scope(&dom, &layers);
        let (mut inner, inner_log) = recording_scope(&dom, &layers);

        outer.activate("dialog", true, None);
        let outcome = inner.activate("ghost-popover", true, None);
        assert_eq!(outcome, Activation::Degraded(ActivationError::MissingContainer));
        assert!(inner.is_topmost());
        assert!(!outer.is_topmost());
        assert_eq!(layers.depth(), 2);
        assert_eq!(layers.scroll_locks(), 1);

        assert!(!outer.handle_escape());
        assert!(inner.handle_escape());
        assert!(outer_log.borrow().is_empty());
        assert_eq!(inner_log.borrow().len(), 1);

        inner.advance_turn();
        assert!(!outer.handle_outside_pointer(EventId(9), &"opener"));
        inner.deactivate();
        assert!(outer.is_topmost());
        assert!(dom.scroll_locked());
        assert!(outer.handle_escape());
    }

    #[test]
    fn reactivation_switches_lock_in_place() {
        let dom = dialog_dom();
        let layers = LayerStack::new();
        let mut scope = FocusScope::new(dom.clone(), layers.clone());

        scope.activate("ghost", true, None);
        assert!(!dom.scroll_locked());
        dom.add("ghost", None, false);
        assert_eq!(scope.activate("ghost", true, None), Activation::Trapped);
        assert_eq!(layers.depth(), 1);
        assert!(dom.scroll_locked());

        dom.detach("ghost");
        scope.activate("ghost", true, None);
        assert_eq!(layers.depth(), 1);
        assert_eq!(layers.scroll_locks(), 0);
        assert!(!dom.scroll_locked());
    }

    #[test]
    fn listener_failure_degrades() {
        let dom = dialog_dom();
        dom.fail_listeners(true);
        let mut scope = FocusScope::new(dom.clone(), LayerStack::new());
        let outcome = scope.activate("dialog", true, None);
        assert!(matches!(
            outcome,
            Activation::Degraded(ActivationError::ListenerRegistration(_))
        ));
        assert_eq!(dom.listener_count(), 0);
        scope.deactivate();
        assert_eq!(dom.focused(), Some("opener"));
    }

    #[test]
    fn drop_releases_active_scope() {
        let dom = dialog_dom();
        let layers = LayerStack::new();
        {
            let mut scope = FocusScope::new(dom.clone(), layers.clone());
            scope.activate("dialog", true, None);
            scope.advance_turn();
            assert!(dom.scroll_locked());
        }
        assert_eq!(layers.depth(), 0);
        assert!(!dom.scroll_locked());
        assert_eq!(dom.listener_count(), 0);
        assert_eq!(dom.focused(), Some("opener"));
    }
}
