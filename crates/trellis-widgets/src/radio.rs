//! A group of mutually exclusive options.

use crate::component::Component;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use std::cell::RefCell;
use trellis_core::{Direction, DisclosureSet, Mode, ToggleSync};

/// Messages for the radio group component.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A key press forwarded to the group.
    KeyPress(KeyEvent),
    /// A mouse event; a left click on a row selects it.
    Mouse(MouseEvent),
    /// The owner's selection. Always wins over interaction state.
    SetValue(usize),
    /// An interaction selected a different option.
    Changed(usize),
}

/// Visual style configuration for the [`RadioGroup`] component.
#[derive(Debug, Clone)]
pub struct RadioStyle {
    /// Style applied to unselected options.
    pub option: Style,
    /// Style applied to the selected option.
    pub selected: Style,
    /// Style applied to the selected option while the group is focused.
    pub focused: Style,
    /// Style applied to every option while the group is disabled.
    pub disabled: Style,
}

impl Default for RadioStyle {
    fn default() -> Self {
        Self {
            option: Style::default(),
            selected: Style::default().fg(Color::Green),
            focused: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            disabled: Style::default().fg(Color::DarkGray),
        }
    }
}

/// Vertical list of options with exactly one selected.
///
/// Arrow keys move and select together, wrapping at both ends.
pub struct RadioGroup {
    options: Vec<String>,
    /// Roving domain over the options.
    domain: DisclosureSet,
    state: ToggleSync<usize>,
    focus: bool,
    style: RadioStyle,
    rows: RefCell<Vec<Rect>>,
}

impl RadioGroup {
    /// Create a group with the first option selected.
    pub fn new(options: Vec<String>) -> Self {
        Self {
            domain: DisclosureSet::new(options.len(), Mode::Exclusive),
            options,
            state: ToggleSync::new(0),
            focus: false,
            style: RadioStyle::default(),
            rows: RefCell::new(Vec::new()),
        }
    }

    /// Initial selection. Out-of-range indices are ignored.
    pub fn with_selected(mut self, index: usize) -> Self {
        if index < self.options.len() {
            self.state.on_external_value(index);
        }
        self
    }

    /// Ignore all interaction and render dimmed.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.state.set_disabled(disabled);
        self
    }

    /// Ignore interaction but render normally.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.state.set_read_only(read_only);
        self
    }

    /// Set the visual style for this group.
    pub fn with_style(mut self, style: RadioStyle) -> Self {
        self.style = style;
        self
    }

    /// Index of the committed selection.
    pub fn selected(&self) -> usize {
        *self.state.committed()
    }

    /// Give this group keyboard focus.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Remove keyboard focus from this group.
    pub fn blur(&mut self) {
        self.focus = false;
    }

    fn choose(&mut self, index: usize) -> Option<Message> {
        let before = self.selected();
        if index >= self.options.len() || !self.state.on_interaction(index) {
            return None;
        }
        (index != before).then_some(Message::Changed(index))
    }

    fn step(&mut self, direction: Direction) -> Option<Message> {
        if self.domain.is_empty() {
            return None;
        }
        let next = self.domain.move_focus(self.selected(), direction).ok()?;
        self.choose(next)
    }
}

impl Component for RadioGroup {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Option<Message> {
        match msg {
            Message::KeyPress(key) if self.focus => match key.code {
                KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => {
                    self.step(Direction::Forward)
                }
                KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => {
                    self.step(Direction::Backward)
                }
                KeyCode::Home => self.choose(self.domain.first()?),
                KeyCode::End => self.choose(self.domain.last()?),
                _ => None,
            },
            Message::Mouse(ev) if ev.kind == MouseEventKind::Down(MouseButton::Left) => {
                let point = Position::new(ev.column, ev.row);
                let index = self.rows.borrow().iter().position(|r| r.contains(point))?;
                self.focus = true;
                self.choose(index)
            }
            Message::SetValue(index) => {
                self.state.on_external_value(index);
                None
            }
            _ => None,
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let mut rows = self.rows.borrow_mut();
        rows.clear();
        let selected = self.selected();
        for (i, option) in self.options.iter().enumerate().take(area.height as usize) {
            let row = Rect::new(area.x, area.y + i as u16, area.width, 1);
            rows.push(row);
            let is_selected = i == selected;
            let style = if !self.state.is_interactive() {
                self.style.disabled
            } else if is_selected && self.focus {
                self.style.focused
            } else if is_selected {
                self.style.selected
            } else {
                self.style.option
            };
            let mark = if is_selected { "(•) " } else { "( ) " };
            let line = Line::from(vec![Span::raw(mark), Span::raw(option.as_str())]);
            frame.render_widget(Paragraph::new(line).style(style), row);
        }
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{click, key, render_string};

    fn sizes() -> RadioGroup {
        let mut group = RadioGroup::new(vec!["Small".into(), "Medium".into(), "Large".into()]);
        group.focus();
        group
    }

    #[test]
    fn arrows_move_and_select() {
        let mut group = sizes();
        assert_eq!(
            group.update(Message::KeyPress(key(KeyCode::Down))),
            Some(Message::Changed(1))
        );
        assert_eq!(
            group.update(Message::KeyPress(key(KeyCode::Up))),
            Some(Message::Changed(0))
        );
        assert_eq!(
            group.update(Message::KeyPress(key(KeyCode::Up))),
            Some(Message::Changed(2))
        );
        assert_eq!(group.update(Message::KeyPress(key(KeyCode::End))), None);
    }

    #[test]
    fn external_value_wins() {
        let mut group = sizes();
        group.update(Message::KeyPress(key(KeyCode::Down)));
        group.update(Message::SetValue(0));
        assert_eq!(group.selected(), 0);
    }

    #[test]
    fn disabled_ignores_interaction() {
        let mut group = sizes().with_selected(2).disabled(true);
        assert_eq!(group.update(Message::KeyPress(key(KeyCode::Down))), None);
        assert_eq!(group.selected(), 2);
    }

    #[test]
    fn click_selects_row() {
        let mut group = sizes();
        let out = render_string(&group, 16, 3);
        assert!(out.lines().next().unwrap_or("").starts_with("(•) Small"));
        assert_eq!(
            group.update(Message::Mouse(click(2, 2))),
            Some(Message::Changed(2))
        );
        assert_eq!(group.update(Message::Mouse(click(2, 2))), None);
    }

    #[test]
    fn out_of_range_external_value_does_not_rove() {
        let mut group = sizes();
        group.update(Message::SetValue(7));
        assert_eq!(group.update(Message::KeyPress(key(KeyCode::Down))), None);
        assert_eq!(
            group.update(Message::KeyPress(key(KeyCode::Home))),
            Some(Message::Changed(0))
        );
    }

    #[test]
    fn empty_group_is_inert() {
        let mut group = RadioGroup::new(Vec::new());
        group.focus();
        assert_eq!(group.update(Message::KeyPress(key(KeyCode::Down))), None);
        assert_eq!(group.update(Message::KeyPress(key(KeyCode::End))), None);
    }
}
