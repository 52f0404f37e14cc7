//! Caller-driven vs interaction-driven state for two-valued controls.

/// Reconciles an externally supplied value with the value a user
/// interaction produced, for checkboxes, switches and radio groups.
///
/// `committed` is the last confirmed value, `pending` the value shown while
/// an interaction is in flight. Confirmation is synchronous, so once
/// [`on_interaction`](Self::on_interaction) returns the two agree again. A
/// caller that wants to veto a change calls
/// [`on_external_value`](Self::on_external_value) before the next render;
/// the external value always wins.
///
/// # Example
///
/// ```
/// use trellis_core::toggle::ToggleSync;
///
/// let mut sync = ToggleSync::new(true);
/// sync.on_interaction(false);
/// sync.on_external_value(true);
/// assert!(*sync.committed());
/// ```
pub struct ToggleSync<T> {
    committed: T,
    pending: T,
    read_only: bool,
    disabled: bool,
    on_change: Option<Box<dyn FnMut(&T)>>,
}

impl<T: Clone + PartialEq> ToggleSync<T> {
    pub fn new(value: T) -> Self {
        Self {
            committed: value.clone(),
            pending: value,
            read_only: false,
            disabled: false,
            on_change: None,
        }
    }

    /// Ignore interactions while still displaying the value.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Ignore interactions.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Callback run when an interaction changes the value.
    pub fn on_change(mut self, f: impl FnMut(&T) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether interactions are currently accepted.
    pub fn is_interactive(&self) -> bool {
        !(self.read_only || self.disabled)
    }

    pub fn committed(&self) -> &T {
        &self.committed
    }

    pub fn pending(&self) -> &T {
        &self.pending
    }

    /// Whether no interaction is in flight (`pending == committed`).
    pub fn is_settled(&self) -> bool {
        self.pending == self.committed
    }

    /// The caller's value. Overrides everything.
    pub fn on_external_value(&mut self, value: T) {
        self.pending = value.clone();
        self.committed = value;
    }

    /// A user interaction requesting `next`.
    ///
    /// Ignored when read-only or disabled. Otherwise `next` becomes pending,
    /// the change callback runs if the value differs, and the value is
    /// committed. Returns whether the interaction was accepted.
    pub fn on_interaction(&mut self, next: T) -> bool {
        if !self.is_interactive() {
            log::trace!("interaction ignored: control is read-only or disabled");
            return false;
        }
        let changed = next != self.committed;
        self.pending = next;
        if changed {
            if let Some(on_change) = self.on_change.as_mut() {
                on_change(&self.pending);
            }
        }
        self.committed = self.pending.clone();
        true
    }
}

impl ToggleSync<bool> {
    /// Interaction flipping the committed value.
    pub fn toggle(&mut self) -> bool {
        let next = !self.committed;
        self.on_interaction(next)
    }
}

impl<T: Default + Clone + PartialEq> Default for ToggleSync<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ToggleSync<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToggleSync")
            .field("committed", &self.committed)
            .field("pending", &self.pending)
            .field("read_only", &self.read_only)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn external_value_wins() {
        let mut sync = ToggleSync::new(false);
        sync.on_external_value(true);
        sync.on_interaction(false);
        sync.on_external_value(true);
        assert!(*sync.committed());
        assert!(*sync.pending());
    }

    #[test]
    fn last_accepted_interaction_is_committed() {
        let mut sync = ToggleSync::new(0u8);
        for v in [3, 1, 4, 1, 5] {
            assert!(sync.on_interaction(v));
            assert!(sync.is_settled());
        }
        assert_eq!(*sync.committed(), 5);
    }

    #[test]
    fn disabled_and_read_only_ignore_interaction() {
        let mut sync = ToggleSync::new(false).disabled(true);
        assert!(!sync.toggle());
        assert!(!*sync.committed());

        let mut sync = ToggleSync::new(false).read_only(true);
        assert!(!sync.on_interaction(true));
        assert!(!*sync.committed());

        sync.set_read_only(false);
        assert!(sync.toggle());
        assert!(*sync.committed());
    }

    #[test]
    fn external_value_applies_even_when_disabled() {
        let mut sync = ToggleSync::new(false).disabled(true);
        sync.on_external_value(true);
        assert!(*sync.committed());
    }

    #[test]
    fn change_callback_fires_only_on_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut sync = ToggleSync::new("a").on_change(move |v| sink.borrow_mut().push(*v));
        sync.on_interaction("b");
        sync.on_interaction("b");
        sync.on_interaction("c");
        assert_eq!(*seen.borrow(), vec!["b", "c"]);
    }

    #[test]
    fn toggle_flips() {
        let mut sync = ToggleSync::<bool>::default();
        sync.toggle();
        assert!(*sync.committed());
        sync.toggle();
        assert!(!*sync.committed());
    }
}
