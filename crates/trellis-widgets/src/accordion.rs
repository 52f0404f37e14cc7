//! Stacked sections whose bodies expand and collapse.

use crate::component::Component;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use std::cell::RefCell;
use trellis_core::{Direction, DisclosureSet, Mode};

/// One collapsible section.
#[derive(Debug, Clone)]
pub struct Section {
    /// Header text.
    pub title: String,
    /// Body lines shown while the section is open.
    pub body: Vec<String>,
}

impl Section {
    /// Create a section. `body` is split into lines.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        let body: String = body.into();
        Self {
            title: title.into(),
            body: body.lines().map(str::to_string).collect(),
        }
    }
}

/// Messages for the accordion component.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A key press forwarded to the accordion.
    KeyPress(KeyEvent),
    /// A mouse event; a left click on a header toggles it.
    Mouse(MouseEvent),
    /// A section header was activated. `open` is its state afterwards.
    Toggled { index: usize, open: bool },
}

/// Visual style configuration for the [`Accordion`] component.
#[derive(Debug, Clone)]
pub struct AccordionStyle {
    /// Style applied to section headers.
    pub header: Style,
    /// Style applied to the header under the cursor while focused.
    pub cursor_header: Style,
    /// Style applied to body lines.
    pub body: Style,
}

impl Default for AccordionStyle {
    fn default() -> Self {
        Self {
            header: Style::default().add_modifier(Modifier::BOLD),
            cursor_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            body: Style::default().fg(Color::Gray),
        }
    }
}

/// A list of collapsible sections.
///
/// Up/Down move a cursor over the headers without opening anything;
/// Enter or Space toggles the header under the cursor. By default one
/// section is open at a time; see [`Accordion::multiple`].
pub struct Accordion {
    sections: Vec<Section>,
    open: DisclosureSet,
    cursor: usize,
    focus: bool,
    style: AccordionStyle,
    headers: RefCell<Vec<Rect>>,
}

impl Accordion {
    /// Create an accordion with every section closed and one open at a time.
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            open: DisclosureSet::new(sections.len(), Mode::Exclusive),
            sections,
            cursor: 0,
            focus: false,
            style: AccordionStyle::default(),
            headers: RefCell::new(Vec::new()),
        }
    }

    /// Allow any number of sections to be open.
    pub fn multiple(mut self) -> Self {
        self.open = DisclosureSet::new(self.sections.len(), Mode::Multiple);
        self
    }

    /// Whether the last open section of an exclusive accordion can be
    /// closed. Defaults to `true`.
    pub fn collapsible(mut self, collapsible: bool) -> Self {
        self.open = self.open.collapsible(collapsible);
        self
    }

    /// Start with `index` open. Out-of-range indices are ignored.
    pub fn with_open(mut self, index: usize) -> Self {
        if let Err(err) = self.open.select(index) {
            log::warn!("accordion: {err}");
        }
        self
    }

    /// Set the visual style for this accordion.
    pub fn with_style(mut self, style: AccordionStyle) -> Self {
        self.style = style;
        self
    }

    /// Give this accordion keyboard focus.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Remove keyboard focus from this accordion.
    pub fn blur(&mut self) {
        self.focus = false;
    }

    /// Index of the header under the cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the section at `index` is open.
    pub fn is_open(&self, index: usize) -> bool {
        self.open.is_open(index)
    }

    /// Indices of the open sections, ascending.
    pub fn open_indices(&self) -> Vec<usize> {
        self.open.open_indices().collect()
    }

    fn toggle(&mut self, index: usize) -> Option<Message> {
        self.open.toggle(index).ok()?;
        Some(Message::Toggled {
            index,
            open: self.open.is_open(index),
        })
    }

    fn roam(&mut self, direction: Direction) {
        if let Ok(next) = self.open.move_focus(self.cursor, direction) {
            self.cursor = next;
        }
    }
}

impl Component for Accordion {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Option<Message> {
        match msg {
            Message::KeyPress(key) if self.focus => match key.code {
                KeyCode::Down | KeyCode::Char('j') => {
                    self.roam(Direction::Forward);
                    None
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.roam(Direction::Backward);
                    None
                }
                KeyCode::Home => {
                    self.cursor = self.open.first().unwrap_or(0);
                    None
                }
                KeyCode::End => {
                    self.cursor = self.open.last().unwrap_or(0);
                    None
                }
                KeyCode::Enter | KeyCode::Char(' ') => self.toggle(self.cursor),
                _ => None,
            },
            Message::Mouse(ev) if ev.kind == MouseEventKind::Down(MouseButton::Left) => {
                let point = Position::new(ev.column, ev.row);
                let index = self.headers.borrow().iter().position(|r| r.contains(point))?;
                self.cursor = index;
                self.focus = true;
                self.toggle(index)
            }
            _ => None,
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let mut headers = self.headers.borrow_mut();
        headers.clear();
        let mut y = area.y;
        for (i, section) in self.sections.iter().enumerate() {
            if y >= area.bottom() {
                break;
            }
            let open = self.open.is_open(i);
            let row = Rect::new(area.x, y, area.width, 1);
            headers.push(row);
            let style = if self.focus && i == self.cursor {
                self.style.cursor_header
            } else {
                self.style.header
            };
            let arrow = if open { "▾ " } else { "▸ " };
            let header = Line::from(vec![Span::raw(arrow), Span::raw(section.title.as_str())]);
            frame.render_widget(Paragraph::new(header).style(style), row);
            y += 1;

            if !open {
                continue;
            }
            for line in &section.body {
                if y >= area.bottom() {
                    break;
                }
                let row = Rect::new(area.x + 2, y, area.width.saturating_sub(2), 1);
                frame.render_widget(
                    Paragraph::new(line.as_str()).style(self.style.body),
                    row,
                );
                y += 1;
            }
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

    fn faq() -> Accordion {
        let mut accordion = Accordion::new(vec![
            Section::new("What", "A widget kit."),
            Section::new("Why", "Terminals."),
            Section::new("How", "Carefully.\nWith tests."),
        ]);
        accordion.focus();
        accordion
    }

    fn press(accordion: &mut Accordion, code: KeyCode) -> Option<Message> {
        accordion.update(Message::KeyPress(key(code)))
    }

    #[test]
    fn roving_does_not_open() {
        let mut accordion = faq();
        press(&mut accordion, KeyCode::Down);
        press(&mut accordion, KeyCode::Down);
        assert_eq!(accordion.cursor(), 2);
        assert!(accordion.open_indices().is_empty());
        press(&mut accordion, KeyCode::Down);
        assert_eq!(accordion.cursor(), 0);
        press(&mut accordion, KeyCode::End);
        assert_eq!(accordion.cursor(), 2);
    }

    #[test]
    fn exclusive_keeps_one_open() {
        let mut accordion = faq();
        assert_eq!(
            press(&mut accordion, KeyCode::Enter),
            Some(Message::Toggled { index: 0, open: true })
        );
        press(&mut accordion, KeyCode::Down);
        press(&mut accordion, KeyCode::Char(' '));
        assert_eq!(accordion.open_indices(), vec![1]);
        assert_eq!(
            press(&mut accordion, KeyCode::Enter),
            Some(Message::Toggled { index: 1, open: false })
        );
        assert!(accordion.open_indices().is_empty());
    }

    #[test]
    fn non_collapsible_keeps_last_open() {
        let mut accordion = faq().collapsible(false).with_open(0);
        press(&mut accordion, KeyCode::Enter);
        assert_eq!(accordion.open_indices(), vec![0]);
    }

    #[test]
    fn multiple_mode_opens_several() {
        let mut accordion = faq().multiple();
        press(&mut accordion, KeyCode::Enter);
        press(&mut accordion, KeyCode::Up);
        press(&mut accordion, KeyCode::Enter);
        assert_eq!(accordion.open_indices(), vec![0, 2]);
    }

    #[test]
    fn unfocused_ignores_keys() {
        let mut accordion = faq();
        accordion.blur();
        assert_eq!(press(&mut accordion, KeyCode::Enter), None);
    }

    #[test]
    fn renders_open_body_and_clicks_headers() {
        let mut accordion = faq().with_open(2);
        let out = render_string(&accordion, 20, 6);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("▸ What"));
        assert!(lines[2].starts_with("▾ How"));
        assert!(lines[3].starts_with("  Carefully."));
        assert!(lines[4].starts_with("  With tests."));

        assert_eq!(
            accordion.update(Message::Mouse(click(3, 1))),
            Some(Message::Toggled { index: 1, open: true })
        );
        assert_eq!(accordion.cursor(), 1);
        assert_eq!(accordion.open_indices(), vec![1]);
        assert_eq!(accordion.update(Message::Mouse(click(3, 5))), None);
    }
}
