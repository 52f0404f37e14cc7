//! Helpers for widget tests: rendering to a string and building input
//! events.

use crate::component::Component;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;

/// Render `component` into a `width` x `height` buffer.
pub fn render<C: Component>(component: &C, width: u16, height: u16) -> Buffer {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            component.view(frame, area);
        })
        .unwrap();
    terminal.backend().buffer().clone()
}

/// Render `component` and return the visible content, one line per row.
pub fn render_string<C: Component>(component: &C, width: u16, height: u16) -> String {
    let buf = render(component, width, height);
    let area = Rect::new(0, 0, width, height);
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            output.push_str(buf[(x, y)].symbol());
        }
        if y < area.bottom() - 1 {
            output.push('\n');
        }
    }
    output
}

/// A key press with no modifiers.
pub fn key(code: KeyCode) -> KeyEvent {
    key_with(code, KeyModifiers::NONE)
}

/// A key press with modifiers.
pub fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

/// A mouse event at `(column, row)`.
pub fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

/// Left-button press at `(column, row)`.
pub fn click(column: u16, row: u16) -> MouseEvent {
    mouse(MouseEventKind::Down(MouseButton::Left), column, row)
}
