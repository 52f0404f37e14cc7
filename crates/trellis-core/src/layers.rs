//! Stack of active overlay layers and the shared background scroll lock.
//!
//! Every active [`FocusScope`](crate::focus::FocusScope) pushes a layer when
//! it activates and removes it when it deactivates. Trapped scopes hold a
//! scroll lock on their layer; degraded ones only take part in the ordering.
//! The stack answers two questions for nested overlays:
//!
//! - which scope is topmost (only it reacts to Escape and outside pointers),
//! - whether background scrolling is still locked (the lock is a counter,
//!   so closing an inner overlay leaves an outer one's lock in place).

use std::cell::RefCell;
use std::rc::Rc;

/// Handle to one entry of a [`LayerStack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(u64);

#[derive(Debug, Clone, Copy)]
struct Layer {
    id: LayerId,
    locked: bool,
}

#[derive(Debug, Default)]
struct Layers {
    stack: Vec<Layer>,
    next_id: u64,
    scroll_locks: usize,
}

/// What changed in the scroll lock as a result of a push or removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockTransition {
    /// The counter went from zero to one: scrolling must be suspended.
    Engaged,
    /// The counter reached zero: scrolling may resume.
    Released,
    /// The counter moved but stayed above zero.
    Unchanged,
}

/// Shared stack of active overlay layers.
///
/// Cloning is cheap and yields a handle to the same stack. Use
/// [`LayerStack::shared`] for the per-thread stack that a whole UI shares,
/// or [`LayerStack::new`] for an isolated one (tests, embedded surfaces).
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    inner: Rc<RefCell<Layers>>,
}

impl Layers {
    fn allocate(&mut self, locked: bool) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.stack.push(Layer { id, locked });
        id
    }

    fn lock(&mut self) -> LockTransition {
        self.scroll_locks += 1;
        if self.scroll_locks == 1 {
            LockTransition::Engaged
        } else {
            LockTransition::Unchanged
        }
    }

    fn unlock(&mut self, id: LayerId) -> LockTransition {
        if self.scroll_locks == 0 {
            log::warn!("scroll lock released for {id:?} while the counter was already zero");
            return LockTransition::Unchanged;
        }
        self.scroll_locks -= 1;
        log::trace!("scroll lock of {id:?} released, {} left", self.scroll_locks);
        if self.scroll_locks == 0 {
            LockTransition::Released
        } else {
            LockTransition::Unchanged
        }
    }
}

thread_local! {
    static SHARED: LayerStack = LayerStack::new();
}

impl LayerStack {
    /// Create an empty, unshared stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stack shared by every scope on the current thread.
    pub fn shared() -> Self {
        SHARED.with(Clone::clone)
    }

    /// Push a new topmost layer and take a scroll lock.
    pub fn push(&self) -> (LayerId, LockTransition) {
        let mut layers = self.inner.borrow_mut();
        let id = layers.allocate(true);
        let transition = layers.lock();
        log::trace!("layer {id:?} pushed, {} scroll lock(s)", layers.scroll_locks);
        (id, transition)
    }

    /// Push a new topmost layer without touching the scroll lock.
    pub fn push_unlocked(&self) -> LayerId {
        let mut layers = self.inner.borrow_mut();
        let id = layers.allocate(false);
        log::trace!("layer {id:?} pushed without a scroll lock");
        id
    }

    /// Take or give back the scroll lock of `id` without moving it in the
    /// stack. Returns `None` if `id` is not on the stack.
    pub fn set_locked(&self, id: LayerId, locked: bool) -> Option<LockTransition> {
        let mut layers = self.inner.borrow_mut();
        let layer = layers.stack.iter_mut().find(|l| l.id == id)?;
        if layer.locked == locked {
            return Some(LockTransition::Unchanged);
        }
        layer.locked = locked;
        Some(if locked {
            layers.lock()
        } else {
            layers.unlock(id)
        })
    }

    /// Remove `id` wherever it sits in the stack and release its scroll lock
    /// if it holds one.
    ///
    /// Returns `None` if `id` was not on the stack. The counter never goes
    /// below zero.
    pub fn remove(&self, id: LayerId) -> Option<LockTransition> {
        let mut layers = self.inner.borrow_mut();
        let pos = layers.stack.iter().position(|l| l.id == id)?;
        let layer = layers.stack.remove(pos);
        if !layer.locked {
            log::trace!("unlocked layer {id:?} removed");
            return Some(LockTransition::Unchanged);
        }
        Some(layers.unlock(id))
    }

    /// Whether `id` is the most recently pushed layer still on the stack.
    pub fn is_topmost(&self, id: LayerId) -> bool {
        self.inner.borrow().stack.last().is_some_and(|l| l.id == id)
    }

    /// Number of active layers.
    pub fn depth(&self) -> usize {
        self.inner.borrow().stack.len()
    }

    /// Current scroll-lock count.
    pub fn scroll_locks(&self) -> usize {
        self.inner.borrow().scroll_locks
    }

    /// Whether background scrolling is currently suspended.
    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locks() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_engages_lock_once() {
        let stack = LayerStack::new();
        let (a, t1) = stack.push();
        let (b, t2) = stack.push();
        assert_eq!(t1, LockTransition::Engaged);
        assert_eq!(t2, LockTransition::Unchanged);
        assert_eq!(stack.scroll_locks(), 2);
        assert!(stack.is_topmost(b));
        assert!(!stack.is_topmost(a));
    }

    #[test]
    fn inner_removal_keeps_outer_lock() {
        let stack = LayerStack::new();
        let (outer, _) = stack.push();
        let (inner, _) = stack.push();
        assert_eq!(stack.remove(inner), Some(LockTransition::Unchanged));
        assert!(stack.is_scroll_locked());
        assert!(stack.is_topmost(outer));
        assert_eq!(stack.remove(outer), Some(LockTransition::Released));
        assert!(!stack.is_scroll_locked());
    }

    #[test]
    fn out_of_order_removal() {
        let stack = LayerStack::new();
        let (outer, _) = stack.push();
        let (inner, _) = stack.push();
        stack.remove(outer);
        assert!(stack.is_topmost(inner));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn unknown_removal_is_ignored() {
        let stack = LayerStack::new();
        let (id, _) = stack.push();
        stack.remove(id);
        assert_eq!(stack.remove(id), None);
        assert_eq!(stack.scroll_locks(), 0);
    }

    #[test]
    fn unlocked_layers_order_without_locking() {
        let stack = LayerStack::new();
        let (outer, _) = stack.push();
        let inner = stack.push_unlocked();
        assert!(stack.is_topmost(inner));
        assert!(!stack.is_topmost(outer));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.scroll_locks(), 1);

        assert_eq!(stack.remove(inner), Some(LockTransition::Unchanged));
        assert_eq!(stack.scroll_locks(), 1);
        assert!(stack.is_topmost(outer));
    }

    #[test]
    fn set_locked_keeps_position() {
        let stack = LayerStack::new();
        let lower = stack.push_unlocked();
        let upper = stack.push_unlocked();
        assert_eq!(stack.set_locked(lower, true), Some(LockTransition::Engaged));
        assert_eq!(stack.set_locked(lower, true), Some(LockTransition::Unchanged));
        assert!(stack.is_topmost(upper));
        assert_eq!(stack.set_locked(lower, false), Some(LockTransition::Released));
        assert_eq!(stack.scroll_locks(), 0);
        stack.remove(upper);
        assert_eq!(stack.set_locked(upper, true), None);
    }

    #[test]
    fn clones_share_state() {
        let stack = LayerStack::new();
        let other = stack.clone();
        stack.push();
        assert_eq!(other.depth(), 1);
        let shared = LayerStack::shared();
        assert_eq!(shared.depth(), LayerStack::shared().depth());
    }
}
