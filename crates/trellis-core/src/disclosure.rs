//! Open/selected membership over a fixed index domain.
//!
//! [`DisclosureSet`] answers "which items are open" for accordions, tabs,
//! dropdown menus and breadcrumb-style selection. It also computes roving
//! focus moves, but never ties navigation to selection: tabs select on
//! arrow keys, accordion headers do not, and that choice belongs to the
//! widget.

use crate::error::IndexError;
use crate::Direction;
use std::collections::BTreeSet;

/// How many items may be open at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// At most one item open.
    #[default]
    Exclusive,
    /// Any subset open.
    Multiple,
}

/// Set-membership controller over the indices `0..len`.
///
/// # Example
///
/// ```
/// use trellis_core::disclosure::{DisclosureSet, Mode};
///
/// let mut set = DisclosureSet::new(6, Mode::Exclusive);
/// set.toggle(2).unwrap();
/// set.toggle(5).unwrap();
/// assert_eq!(set.open_indices().collect::<Vec<_>>(), vec![5]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisclosureSet {
    len: usize,
    mode: Mode,
    collapsible: bool,
    open: BTreeSet<usize>,
}

impl DisclosureSet {
    /// Create a set with nothing open.
    pub fn new(len: usize, mode: Mode) -> Self {
        Self {
            len,
            mode,
            collapsible: true,
            open: BTreeSet::new(),
        }
    }

    /// Whether toggling the sole open item in exclusive mode closes it.
    ///
    /// Defaults to `true`. Tabs turn it off so one tab always stays
    /// selected. Has no effect in [`Mode::Multiple`].
    pub fn collapsible(mut self, collapsible: bool) -> Self {
        self.collapsible = collapsible;
        self
    }

    /// Start with `indices` open. In exclusive mode only the last one stays.
    pub fn with_open(
        mut self,
        indices: impl IntoIterator<Item = usize>,
    ) -> Result<Self, IndexError> {
        for index in indices {
            self.select(index)?;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Flip `index`.
    ///
    /// In multiple mode membership is flipped. In exclusive mode the set
    /// becomes `{index}`, or empty if `index` was already the sole open
    /// member (unless the set is not collapsible).
    pub fn toggle(&mut self, index: usize) -> Result<(), IndexError> {
        self.check(index)?;
        match self.mode {
            Mode::Multiple => {
                if !self.open.remove(&index) {
                    self.open.insert(index);
                }
            }
            Mode::Exclusive => {
                let sole_open = self.open.len() == 1 && self.open.contains(&index);
                if sole_open {
                    if self.collapsible {
                        self.open.clear();
                    }
                } else {
                    self.open.clear();
                    self.open.insert(index);
                }
            }
        }
        Ok(())
    }

    /// Open `index` without toggling. Exclusive mode replaces the open item.
    pub fn select(&mut self, index: usize) -> Result<(), IndexError> {
        self.check(index)?;
        if self.mode == Mode::Exclusive {
            self.open.clear();
        }
        self.open.insert(index);
        Ok(())
    }

    /// Close `index` if it is open.
    pub fn close(&mut self, index: usize) -> Result<(), IndexError> {
        self.check(index)?;
        self.open.remove(&index);
        Ok(())
    }

    /// Close everything.
    pub fn close_all(&mut self) {
        self.open.clear();
    }

    /// Whether `index` is open. Out-of-domain indices are never open.
    pub fn is_open(&self, index: usize) -> bool {
        self.open.contains(&index)
    }

    /// The open set.
    pub fn open_set(&self) -> &BTreeSet<usize> {
        &self.open
    }

    /// Open indices in ascending order.
    pub fn open_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.open.iter().copied()
    }

    /// The lowest open index; the selected item in exclusive mode.
    pub fn selected(&self) -> Option<usize> {
        self.open.first().copied()
    }

    /// Cyclic roving move: `(current + direction + len) % len`.
    ///
    /// Does not touch the open set. An empty domain returns `current`
    /// unchanged.
    pub fn move_focus(&self, current: usize, direction: Direction) -> Result<usize, IndexError> {
        if self.len == 0 {
            return Ok(current);
        }
        self.check(current)?;
        let next = match direction {
            Direction::Forward => (current + 1) % self.len,
            Direction::Backward => (current + self.len - 1) % self.len,
        };
        Ok(next)
    }

    /// First index of the domain (Home).
    pub fn first(&self) -> Option<usize> {
        (self.len > 0).then_some(0)
    }

    /// Last index of the domain (End).
    pub fn last(&self) -> Option<usize> {
        self.len.checked_sub(1)
    }

    /// Re-initialize over a new domain with nothing open.
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.open.clear();
    }

    fn check(&self, index: usize) -> Result<(), IndexError> {
        if index < self.len {
            Ok(())
        } else {
            Err(IndexError::OutOfDomain {
                index,
                len: self.len,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(set: &DisclosureSet) -> Vec<usize> {
        set.open_indices().collect()
    }

    #[test]
    fn exclusive_toggle_twice_closes() {
        let mut set = DisclosureSet::new(6, Mode::Exclusive);
        set.toggle(2).unwrap();
        assert_eq!(open(&set), vec![2]);
        set.toggle(2).unwrap();
        assert!(open(&set).is_empty());
    }

    #[test]
    fn exclusive_toggle_replaces() {
        let mut set = DisclosureSet::new(6, Mode::Exclusive);
        set.toggle(2).unwrap();
        set.toggle(5).unwrap();
        assert_eq!(open(&set), vec![5]);
        assert_eq!(set.selected(), Some(5));
    }

    #[test]
    fn multiple_toggle_flips() {
        let mut set = DisclosureSet::new(4, Mode::Multiple);
        set.toggle(1).unwrap();
        set.toggle(3).unwrap();
        assert_eq!(open(&set), vec![1, 3]);
        set.toggle(1).unwrap();
        assert_eq!(open(&set), vec![3]);
        assert!(set.is_open(3));
        assert!(!set.is_open(1));
    }

    #[test]
    fn non_collapsible_keeps_selection() {
        let mut set = DisclosureSet::new(3, Mode::Exclusive).collapsible(false);
        set.toggle(1).unwrap();
        set.toggle(1).unwrap();
        assert_eq!(open(&set), vec![1]);
    }

    #[test]
    fn out_of_domain_is_rejected() {
        let mut set = DisclosureSet::new(3, Mode::Multiple);
        assert_eq!(
            set.toggle(3),
            Err(IndexError::OutOfDomain { index: 3, len: 3 })
        );
        assert!(set.select(9).is_err());
        assert!(set.close(3).is_err());
        assert!(open(&set).is_empty());
        assert!(!set.is_open(42));
    }

    #[test]
    fn with_open_in_exclusive_keeps_last() {
        let set = DisclosureSet::new(5, Mode::Exclusive)
            .with_open([0, 3])
            .unwrap();
        assert_eq!(open(&set), vec![3]);
        assert!(DisclosureSet::new(2, Mode::Multiple).with_open([2]).is_err());
    }

    #[test]
    fn select_and_close() {
        let mut set = DisclosureSet::new(4, Mode::Multiple);
        set.select(0).unwrap();
        set.select(0).unwrap();
        set.select(2).unwrap();
        assert_eq!(open(&set), vec![0, 2]);
        set.close(0).unwrap();
        assert_eq!(open(&set), vec![2]);
        set.close_all();
        assert!(open(&set).is_empty());
    }

    #[test]
    fn move_focus_wraps() {
        let set = DisclosureSet::new(3, Mode::Exclusive);
        assert_eq!(set.move_focus(2, Direction::Forward), Ok(0));
        assert_eq!(set.move_focus(0, Direction::Backward), Ok(2));
        assert_eq!(set.move_focus(1, Direction::Forward), Ok(2));
        assert!(open(&set).is_empty());
    }

    #[test]
    fn move_focus_on_empty_domain_is_identity() {
        let set = DisclosureSet::new(0, Mode::Multiple);
        assert_eq!(set.move_focus(4, Direction::Forward), Ok(4));
        assert_eq!(set.first(), None);
        assert_eq!(set.last(), None);
    }

    #[test]
    fn move_focus_rejects_out_of_domain_current() {
        let set = DisclosureSet::new(3, Mode::Exclusive);
        assert!(set.move_focus(3, Direction::Backward).is_err());
    }

    #[test]
    fn reset_changes_domain() {
        let mut set = DisclosureSet::new(3, Mode::Multiple);
        set.toggle(2).unwrap();
        set.reset(10);
        assert_eq!(set.len(), 10);
        assert!(open(&set).is_empty());
        set.toggle(9).unwrap();
        assert_eq!(set.last(), Some(9));
    }
}
