//! **trellis** -- interactive widget behaviour for terminal UIs.
//!
//! This is the umbrella crate. It re-exports the interaction kernel at the
//! root and the ratatui widget set under [`widgets`], plus the terminal
//! plumbing an application needs around them.
//!
//! ```toml
//! [dependencies]
//! trellis = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * Everything public in [`trellis_core`] ([`ValueMapper`], [`FocusScope`],
//!   [`DisclosureSet`], [`ToggleSync`], ...) is available at the crate root.
//! * [`widgets`] re-exports [`trellis_widgets`].
//! * [`ratatui`] and [`crossterm`] are re-exported so applications do not
//!   need to depend on them directly.
//!
//! # Running
//!
//! ```ignore
//! use trellis::terminal::{TerminalGuard, TerminalOptions};
//!
//! let (guard, mut terminal) = TerminalGuard::enter(TerminalOptions::default())?;
//! // draw, read events, dispatch them to widgets...
//! guard.restore()?;
//! ```
//!
//! Set `TRELLIS_LOG=/path/to/file` and call [`logging::init_from_env`] to
//! capture the kernel's `log` output while the terminal is in raw mode.

pub mod logging;
pub mod terminal;

pub use trellis_core::*;

pub mod widgets {
    //! The ratatui widget set. See [`trellis_widgets`].
    pub use trellis_widgets::*;
}

pub use crossterm;
pub use ratatui;
