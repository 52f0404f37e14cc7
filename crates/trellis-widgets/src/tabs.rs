//! Tab bar for switching between views.

use crate::component::Component;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Tabs as RatatuiTabs};
use ratatui::Frame;
use std::cell::RefCell;
use trellis_core::{Direction, DisclosureSet, Mode};
use unicode_width::UnicodeWidthStr;

/// Messages for the tabs component.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A key press forwarded to the tab bar.
    KeyPress(KeyEvent),
    /// A mouse event; a left click on a label selects it.
    Mouse(MouseEvent),
    /// Emitted when a tab is selected, carrying the tab index.
    Selected(usize),
}

/// Visual style configuration for the [`Tabs`] component.
#[derive(Debug, Clone)]
pub struct TabsStyle {
    /// Style applied to unselected tab labels.
    pub normal: Style,
    /// Style applied to the selected tab label.
    pub selected: Style,
    /// Style applied to the tab bar border.
    pub border: Style,
    /// String drawn between tab labels.
    pub divider: String,
}

impl Default for TabsStyle {
    fn default() -> Self {
        Self {
            normal: Style::default().fg(Color::DarkGray),
            selected: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::DarkGray),
            divider: " | ".to_string(),
        }
    }
}

/// A horizontal row of tabs with exactly one selected.
///
/// Arrow keys move the selection (activation follows focus), digits jump
/// to a tab, and clicking a label selects it.
pub struct Tabs {
    titles: Vec<String>,
    selection: DisclosureSet,
    focus: bool,
    style: TabsStyle,
    labels: RefCell<Vec<Rect>>,
}

impl Tabs {
    /// Create a tab bar with the first tab selected.
    pub fn new(titles: Vec<String>) -> Self {
        let mut selection = DisclosureSet::new(titles.len(), Mode::Exclusive).collapsible(false);
        if selection.select(0).is_err() {
            log::debug!("tab bar created without tabs");
        }
        Self {
            titles,
            selection,
            focus: false,
            style: TabsStyle::default(),
            labels: RefCell::new(Vec::new()),
        }
    }

    /// Set the visual style for this tab bar.
    pub fn with_style(mut self, style: TabsStyle) -> Self {
        self.style = style;
        self
    }

    /// Give this tab bar keyboard focus.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Remove keyboard focus from this tab bar.
    pub fn blur(&mut self) {
        self.focus = false;
    }

    /// Index of the selected tab. `0` for an empty bar.
    pub fn selected(&self) -> usize {
        self.selection.selected().unwrap_or(0)
    }

    /// Select the tab at `index`. No-op if out of bounds.
    pub fn select(&mut self, index: usize) {
        if let Err(err) = self.selection.select(index) {
            log::debug!("tabs: {err}");
        }
    }

    fn step(&mut self, direction: Direction) -> Option<Message> {
        let next = self.selection.move_focus(self.selected(), direction).ok()?;
        self.jump(next)
    }

    fn jump(&mut self, index: usize) -> Option<Message> {
        self.selection.select(index).ok()?;
        Some(Message::Selected(index))
    }
}

impl Component for Tabs {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Option<Message> {
        match msg {
            Message::KeyPress(key) if self.focus => match key.code {
                KeyCode::Left | KeyCode::Char('h') => self.step(Direction::Backward),
                KeyCode::Right | KeyCode::Char('l') => self.step(Direction::Forward),
                KeyCode::Home => self.jump(self.selection.first()?),
                KeyCode::End => self.jump(self.selection.last()?),
                KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                    let index = c.to_digit(10)? as usize - 1;
                    self.jump(index)
                }
                _ => None,
            },
            Message::Mouse(ev) if ev.kind == MouseEventKind::Down(MouseButton::Left) => {
                let point = Position::new(ev.column, ev.row);
                let index = self.labels.borrow().iter().position(|r| r.contains(point))?;
                self.jump(index)
            }
            Message::Selected(i) => {
                self.select(i);
                None
            }
            _ => None,
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        // ratatui's Tabs pads each title with one space on both sides.
        let divider = self.style.divider.width() as u16;
        let mut labels = self.labels.borrow_mut();
        labels.clear();
        let mut x = area.x;
        for title in &self.titles {
            let width = title.width() as u16 + 2;
            labels.push(Rect::new(x, area.y, width, 1));
            x = x.saturating_add(width + divider);
        }

        let titles: Vec<Line> = self.titles.iter().map(|t| Line::raw(t.as_str())).collect();
        let tabs = RatatuiTabs::new(titles)
            .block(Block::default().borders(Borders::BOTTOM).border_style(self.style.border))
            .select(self.selected())
            .style(self.style.normal)
            .highlight_style(self.style.selected)
            .divider(self.style.divider.as_str());
        frame.render_widget(tabs, area);
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{click, key, render_string};

    fn tabs() -> Tabs {
        let mut tabs = Tabs::new(vec!["One".into(), "Two".into(), "Three".into()]);
        tabs.focus();
        tabs
    }

    #[test]
    fn arrows_select_and_wrap() {
        let mut tabs = tabs();
        assert_eq!(
            tabs.update(Message::KeyPress(key(KeyCode::Left))),
            Some(Message::Selected(2))
        );
        assert_eq!(
            tabs.update(Message::KeyPress(key(KeyCode::Right))),
            Some(Message::Selected(0))
        );
        tabs.update(Message::KeyPress(key(KeyCode::End)));
        assert_eq!(tabs.selected(), 2);
    }

    #[test]
    fn digits_jump() {
        let mut tabs = tabs();
        assert_eq!(
            tabs.update(Message::KeyPress(key(KeyCode::Char('2')))),
            Some(Message::Selected(1))
        );
        assert_eq!(tabs.update(Message::KeyPress(key(KeyCode::Char('9')))), None);
        assert_eq!(tabs.update(Message::KeyPress(key(KeyCode::Char('0')))), None);
        assert_eq!(tabs.selected(), 1);
    }

    #[test]
    fn reselecting_keeps_selection() {
        let mut tabs = tabs();
        tabs.update(Message::KeyPress(key(KeyCode::Char('1'))));
        assert_eq!(tabs.selected(), 0);
    }

    #[test]
    fn unfocused_ignores_keys() {
        let mut tabs = tabs();
        tabs.blur();
        assert_eq!(tabs.update(Message::KeyPress(key(KeyCode::Right))), None);
    }

    #[test]
    fn external_select_ignores_out_of_range() {
        let mut tabs = tabs();
        tabs.update(Message::Selected(1));
        tabs.update(Message::Selected(7));
        assert_eq!(tabs.selected(), 1);
    }

    #[test]
    fn renders_and_clicks_labels() {
        let mut tabs = tabs();
        let out = render_string(&tabs, 30, 2);
        assert!(out.starts_with(" One  |  Two  |  Three"));
        assert_eq!(tabs.update(Message::Mouse(click(6, 0))), None);
        assert_eq!(
            tabs.update(Message::Mouse(click(9, 0))),
            Some(Message::Selected(1))
        );
        assert_eq!(tabs.update(Message::Mouse(click(29, 0))), None);
    }

    #[test]
    fn empty_bar_is_inert() {
        let mut tabs = Tabs::new(Vec::new());
        tabs.focus();
        assert_eq!(tabs.update(Message::KeyPress(key(KeyCode::Right))), None);
        assert_eq!(tabs.update(Message::KeyPress(key(KeyCode::Home))), None);
        assert_eq!(tabs.selected(), 0);
    }
}
