//! Raw-mode terminal setup and teardown.
//!
//! [`TerminalGuard::enter`] switches the terminal into raw mode (plus the
//! alternate screen and mouse capture when asked) and returns a ratatui
//! [`Terminal`]. The terminal is restored when the guard is dropped, when
//! [`TerminalGuard::restore`] is called, and when the program panics.

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout, Stdout};

/// Errors raised while taking over or handing back the terminal.
#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// What to switch on besides raw mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalOptions {
    pub alt_screen: bool,
    pub mouse_capture: bool,
    /// Restore the terminal before the default panic message is printed.
    pub catch_panics: bool,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            alt_screen: true,
            mouse_capture: true,
            catch_panics: true,
        }
    }
}

/// Restores the terminal when dropped.
#[derive(Debug)]
pub struct TerminalGuard {
    options: TerminalOptions,
    restored: bool,
}

impl TerminalGuard {
    /// Take over the terminal.
    pub fn enter(
        options: TerminalOptions,
    ) -> Result<(Self, Terminal<CrosstermBackend<Stdout>>), TerminalError> {
        if options.catch_panics {
            install_panic_hook(options);
        }
        enable_raw_mode()?;
        let guard = Self {
            options,
            restored: false,
        };
        let mut out = stdout();
        if options.alt_screen {
            execute!(out, EnterAlternateScreen)?;
        }
        if options.mouse_capture {
            execute!(out, EnableMouseCapture)?;
        }
        execute!(out, cursor::Hide)?;
        let terminal = Terminal::new(CrosstermBackend::new(out))?;
        log::debug!("terminal entered with {options:?}");
        Ok((guard, terminal))
    }

    /// Hand the terminal back and report the first failure.
    pub fn restore(mut self) -> Result<(), TerminalError> {
        self.restored = true;
        restore(self.options)?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if !self.restored {
            let _ = restore(self.options);
        }
    }
}

fn install_panic_hook(options: TerminalOptions) {
    use std::sync::Once;
    static HOOK_INSTALLED: Once = Once::new();
    HOOK_INSTALLED.call_once(|| {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore(options);
            original_hook(info);
        }));
    });
}

// Best effort: keep going after a failed step and report raw mode only.
fn restore(options: TerminalOptions) -> io::Result<()> {
    let raw = disable_raw_mode();
    let mut out = stdout();
    if options.mouse_capture {
        execute!(out, DisableMouseCapture).ok();
    }
    execute!(out, cursor::Show).ok();
    if options.alt_screen {
        execute!(out, LeaveAlternateScreen).ok();
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_take_over_everything() {
        let options = TerminalOptions::default();
        assert!(options.alt_screen);
        assert!(options.mouse_capture);
        assert!(options.catch_panics);
    }

    #[test]
    fn io_errors_convert() {
        let err: TerminalError = io::Error::other("no tty").into();
        assert_eq!(err.to_string(), "IO error: no tty");
    }
}
