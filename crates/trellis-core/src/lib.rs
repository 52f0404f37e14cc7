//! Interaction kernel for the **trellis** widget set.
//!
//! `trellis-core` holds the behaviour that interactive widgets share no
//! matter how they are painted. Each piece is a plain state holder: the
//! rendering layer feeds it input events and reads its state back.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`ValueMapper`] | Pointer position and arrow keys to a quantized value in a [`Range`] (sliders) |
//! | [`FocusScope`] | Focus trap, focus restore and dismissal for transient surfaces (modal, drawer, menu, popover) |
//! | [`DisclosureSet`] | Exclusive or multiple open set with roving focus (accordion, tabs, menus) |
//! | [`ToggleSync`] | External value vs interaction state for binary controls (checkbox, switch, radio) |
//! | [`LayerStack`] | Nesting order of active scopes and the shared scroll-lock counter |
//! | [`FakeDom`](testing::FakeDom) | In-memory [`FocusHost`] for tests |
//!
//! # Collaborators
//!
//! The kernel never walks a document tree or measures anything. Track
//! geometry is passed in as numbers, and everything a focus scope needs
//! (focusable descendants, containment, focus, listener registration) comes
//! from a [`FocusHost`] implemented by the rendering layer.
//!
//! # Threading
//!
//! Everything here is single-threaded and synchronous. Scopes share their
//! [`LayerStack`] through an `Rc`, so they are neither `Send` nor `Sync`.

pub mod disclosure;
pub mod error;
pub mod focus;
pub mod layers;
pub mod testing;
pub mod toggle;
pub mod value;

pub use disclosure::{DisclosureSet, Mode};
pub use error::{ActivationError, ConfigurationError, IndexError};
pub use focus::{
    Activation, DismissReason, EventId, FocusHost, FocusScope, ListenerId, ListenerKind, TabMove,
};
pub use layers::{LayerId, LayerStack, LockTransition};
pub use toggle::ToggleSync;
pub use value::{Edge, Orientation, PointerId, Range, TrackGeometry, ValueMapper};

/// One step along an ordered axis: arrow keys, roving focus, stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Right / Up / Tab: towards higher values and later items.
    Forward,
    /// Left / Down / Shift+Tab: towards lower values and earlier items.
    Backward,
}

impl Direction {
    /// `+1` or `-1`.
    pub fn sign(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}
