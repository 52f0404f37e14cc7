//! Checkbox and switch controls.

use crate::component::Component;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use std::cell::Cell;
use trellis_core::ToggleSync;

/// How the control is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kind {
    /// `[x] label`
    #[default]
    Checkbox,
    /// `(on ) label` / `( off) label`
    Switch,
}

/// Messages for the checkbox component.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A key press forwarded to the control.
    KeyPress(KeyEvent),
    /// A mouse event; a left click inside the control toggles it.
    Mouse(MouseEvent),
    /// The owner's value. Always wins over interaction state.
    SetValue(bool),
    /// An interaction changed the value.
    Changed(bool),
}

/// Visual style configuration for the [`Checkbox`] component.
#[derive(Debug, Clone)]
pub struct CheckboxStyle {
    /// Style applied to the check mark or switch knob.
    pub mark: Style,
    /// Style applied to the label text.
    pub label: Style,
    /// Style applied to the whole row while focused.
    pub focused: Style,
    /// Style applied while the control is disabled.
    pub disabled: Style,
}

impl Default for CheckboxStyle {
    fn default() -> Self {
        Self {
            mark: Style::default().fg(Color::Green),
            label: Style::default(),
            focused: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            disabled: Style::default().fg(Color::DarkGray),
        }
    }
}

/// A two-state control.
pub struct Checkbox {
    label: String,
    kind: Kind,
    state: ToggleSync<bool>,
    focus: bool,
    style: CheckboxStyle,
    area: Cell<Rect>,
}

impl Checkbox {
    /// Create an unchecked checkbox with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: Kind::Checkbox,
            state: ToggleSync::new(false),
            focus: false,
            style: CheckboxStyle::default(),
            area: Cell::new(Rect::default()),
        }
    }

    /// A checkbox drawn as an on/off switch.
    pub fn switch(label: impl Into<String>) -> Self {
        Self {
            kind: Kind::Switch,
            ..Self::new(label)
        }
    }

    /// Set the initial checked state.
    pub fn checked(mut self, checked: bool) -> Self {
        self.state.on_external_value(checked);
        self
    }

    /// Show the value but ignore interactions.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.state.set_read_only(read_only);
        self
    }

    /// Ignore all interaction and render dimmed.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.state.set_disabled(disabled);
        self
    }

    /// Set the visual style for this control.
    pub fn with_style(mut self, style: CheckboxStyle) -> Self {
        self.style = style;
        self
    }

    /// Whether this renders as a checkbox or a switch.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The committed checked state.
    pub fn is_checked(&self) -> bool {
        *self.state.committed()
    }

    /// Give this control keyboard focus.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Remove keyboard focus from this control.
    pub fn blur(&mut self) {
        self.focus = false;
    }

    fn toggle(&mut self) -> Option<Message> {
        let before = self.is_checked();
        if !self.state.toggle() {
            return None;
        }
        let after = self.is_checked();
        (after != before).then_some(Message::Changed(after))
    }

    fn mark(&self) -> &'static str {
        match (self.kind, self.is_checked()) {
            (Kind::Checkbox, true) => "[x]",
            (Kind::Checkbox, false) => "[ ]",
            (Kind::Switch, true) => "(on )",
            (Kind::Switch, false) => "( off)",
        }
    }
}

impl Component for Checkbox {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Option<Message> {
        match msg {
            Message::KeyPress(key) if self.focus => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter => self.toggle(),
                _ => None,
            },
            Message::Mouse(ev) if ev.kind == MouseEventKind::Down(MouseButton::Left) => {
                if !self.area.get().contains(Position::new(ev.column, ev.row)) {
                    return None;
                }
                self.focus = true;
                self.toggle()
            }
            Message::SetValue(value) => {
                self.state.on_external_value(value);
                None
            }
            _ => None,
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let row = Rect { height: area.height.min(1), ..area };
        self.area.set(row);
        let (mark, label) = if !self.state.is_interactive() {
            (self.style.disabled, self.style.disabled)
        } else if self.focus {
            (self.style.focused, self.style.focused)
        } else {
            (self.style.mark, self.style.label)
        };
        let line = Line::from(vec![
            Span::styled(self.mark(), mark),
            Span::raw(" "),
            Span::styled(self.label.as_str(), label),
        ]);
        frame.render_widget(Paragraph::new(line), row);
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
