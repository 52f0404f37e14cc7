//! Terminal widgets for **trellis**, built on [`ratatui`] and the
//! [`trellis_core`] interaction kernel.
//!
//! Every widget implements [`Component`]: the parent forwards `crossterm`
//! key and mouse events as messages and renders the widget into a
//! [`Rect`](ratatui::layout::Rect) of its choosing.
//!
//! # Widgets
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`accordion`] | Collapsible sections, one or many open |
//! | [`checkbox`] | Checkbox and switch |
//! | [`menu`] | Dropdown menu with plain or checkable items |
//! | [`overlay`] | Modal dialog and edge drawers with a focus trap |
//! | [`radio`] | Radio group |
//! | [`slider`] | Horizontal or vertical value slider |
//! | [`tabs`] | Horizontal tab bar |
//!
//! # Utilities
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`host`] | [`FocusTree`](host::FocusTree), the terminal-side focus host |
//! | [`testing`] | Render-to-string and event builders for tests |
//!
//! Overlays and menus share one [`FocusTree`](host::FocusTree) per
//! application. Call [`FocusTree::next_event`](host::FocusTree::next_event)
//! once for every terminal event before dispatching it.

pub mod accordion;
pub mod checkbox;
pub mod component;
pub mod host;
pub mod menu;
pub mod overlay;
pub mod radio;
pub mod slider;
pub mod tabs;
pub mod testing;

pub use component::Component;
pub use host::{ElementId, FocusTree};
