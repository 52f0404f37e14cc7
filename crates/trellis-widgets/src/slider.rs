//! Slider for picking a number from a range with the arrow keys or the
//! mouse.
//!
//! The value logic lives in [`ValueMapper`]; this widget translates
//! terminal cells into track geometry and draws the result.

use crate::component::Component;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use std::cell::Cell;
use trellis_core::{Direction, Edge, Orientation, PointerId, Range, TrackGeometry, ValueMapper};

/// Terminals report a single mouse pointer.
const MOUSE: PointerId = PointerId(0);

/// Messages for the slider component.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A key press forwarded to the slider.
    KeyPress(KeyEvent),
    /// A mouse event forwarded to the slider.
    Mouse(MouseEvent),
    /// Pointer capture was lost (terminal focus lost, widget hidden).
    Cancel,
    /// Overwrite the value from outside. Clamped and quantized.
    SetValue(f64),
    /// Emitted when user input changed the value.
    Changed(f64),
}

/// Visual style configuration for the [`Slider`] component.
#[derive(Debug, Clone)]
pub struct SliderStyle {
    /// Label text.
    pub label: Style,
    /// Numeric value readout.
    pub value: Style,
    /// Unfilled part of the track.
    pub track: Style,
    /// Filled part of the track.
    pub filled: Style,
    /// Thumb when the slider is not focused.
    pub thumb: Style,
    /// Thumb when the slider is focused or being dragged.
    pub active_thumb: Style,
}

impl Default for SliderStyle {
    fn default() -> Self {
        Self {
            label: Style::default(),
            value: Style::default().fg(Color::DarkGray),
            track: Style::default().fg(Color::DarkGray),
            filled: Style::default().fg(Color::Cyan),
            thumb: Style::default().fg(Color::White),
            active_thumb: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        }
    }
}

/// A horizontal or vertical slider.
///
/// # Example
///
/// ```ignore
/// use trellis_core::Range;
/// use trellis_widgets::slider::Slider;
///
/// let volume = Slider::new("Volume", Range::new(0.0, 100.0, 5.0)?).with_value(40.0);
/// ```
pub struct Slider {
    label: String,
    mapper: ValueMapper,
    focus: bool,
    disabled: bool,
    precision: usize,
    style: SliderStyle,
    /// Track cells from the last render, for mouse mapping.
    track: Cell<Rect>,
}

impl Slider {
    /// Create a horizontal slider starting at the range minimum.
    pub fn new(label: impl Into<String>, range: Range) -> Self {
        Self {
            label: label.into(),
            mapper: ValueMapper::new(range, Orientation::Horizontal),
            focus: false,
            disabled: false,
            precision: 0,
            style: SliderStyle::default(),
            track: Cell::new(Rect::default()),
        }
    }

    /// Lay the track out vertically, with the maximum at the top.
    pub fn vertical(mut self) -> Self {
        self.mapper = self.mapper.with_orientation(Orientation::Vertical);
        self
    }

    /// Set the initial value. Clamped and quantized.
    pub fn with_value(mut self, value: f64) -> Self {
        self.mapper.set_value(value);
        self
    }

    /// Number of steps PageUp / PageDown move.
    pub fn with_page_steps(mut self, steps: u32) -> Self {
        self.mapper = self.mapper.with_page_steps(steps);
        self
    }

    /// Decimal places shown in the value readout.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Set the visual style.
    pub fn with_style(mut self, style: SliderStyle) -> Self {
        self.style = style;
        self
    }

    /// Disable all input.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// The current quantized value.
    pub fn value(&self) -> f64 {
        self.mapper.value()
    }

    /// Whether a pointer drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.mapper.is_dragging()
    }

    /// Give this slider keyboard focus.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Remove keyboard focus. Ends any drag in progress.
    pub fn blur(&mut self) {
        self.focus = false;
        self.mapper.cancel_drag(MOUSE);
    }

    fn geometry(&self) -> TrackGeometry {
        let track = self.track.get();
        match self.mapper.orientation() {
            Orientation::Horizontal => TrackGeometry::new(
                f64::from(track.x),
                f64::from(track.width.saturating_sub(1).max(1)),
            ),
            Orientation::Vertical => TrackGeometry::new(
                f64::from(track.y),
                f64::from(track.height.saturating_sub(1).max(1)),
            ),
        }
    }

    fn coordinate(&self, ev: &MouseEvent) -> f64 {
        match self.mapper.orientation() {
            Orientation::Horizontal => f64::from(ev.column),
            Orientation::Vertical => f64::from(ev.row),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<f64> {
        match key.code {
            KeyCode::Right | KeyCode::Up | KeyCode::Char('l') | KeyCode::Char('k') => {
                self.mapper.step(Direction::Forward)
            }
            KeyCode::Left | KeyCode::Down | KeyCode::Char('h') | KeyCode::Char('j') => {
                self.mapper.step(Direction::Backward)
            }
            KeyCode::PageUp => self.mapper.page(Direction::Forward),
            KeyCode::PageDown => self.mapper.page(Direction::Backward),
            KeyCode::Home => self.mapper.jump(Edge::Start),
            KeyCode::End => self.mapper.jump(Edge::End),
            _ => None,
        }
    }

    fn handle_mouse(&mut self, ev: MouseEvent) -> Option<f64> {
        let coordinate = self.coordinate(&ev);
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if !self.track.get().contains(Position::new(ev.column, ev.row)) {
                    return None;
                }
                self.focus = true;
                self.mapper.begin_drag(MOUSE, self.geometry());
                self.mapper.update_drag(MOUSE, coordinate)
            }
            MouseEventKind::Drag(MouseButton::Left) => self.mapper.update_drag(MOUSE, coordinate),
            MouseEventKind::Up(MouseButton::Left) => {
                self.mapper.end_drag(MOUSE);
                None
            }
            _ => None,
        }
    }

    fn readout(&self) -> String {
        format!("{:.*}", self.precision, self.mapper.value())
    }

    fn thumb_style(&self) -> Style {
        if self.focus || self.mapper.is_dragging() {
            self.style.active_thumb
        } else {
            self.style.thumb
        }
    }

    fn view_horizontal(&self, frame: &mut Frame, area: Rect) {
        let track = if area.height >= 2 {
            let header = Line::from(vec![
                Span::styled(self.label.as_str(), self.style.label),
                Span::raw(" "),
                Span::styled(self.readout(), self.style.value),
            ]);
            frame.render_widget(Paragraph::new(header), Rect { height: 1, ..area });
            Rect {
                y: area.y + 1,
                height: 1,
                ..area
            }
        } else {
            Rect { height: 1, ..area }
        };
        self.track.set(track);
        if track.width == 0 {
            return;
        }

        let thumb = (self.mapper.percent() * f64::from(track.width - 1)).round() as usize;
        let rest = usize::from(track.width) - thumb - 1;
        let line = Line::from(vec![
            Span::styled("━".repeat(thumb), self.style.filled),
            Span::styled("●", self.thumb_style()),
            Span::styled("─".repeat(rest), self.style.track),
        ]);
        frame.render_widget(Paragraph::new(line), track);
    }

    fn view_vertical(&self, frame: &mut Frame, area: Rect) {
        let track = if area.height >= 2 {
            frame.render_widget(
                Paragraph::new(Span::styled(self.readout(), self.style.value)),
                Rect { height: 1, ..area },
            );
            Rect {
                y: area.y + 1,
                height: area.height - 1,
                width: area.width.min(1),
                ..area
            }
        } else {
            Rect {
                width: area.width.min(1),
                ..area
            }
        };
        self.track.set(track);
        if track.height == 0 || track.width == 0 {
            return;
        }

        let thumb_from_top =
            ((1.0 - self.mapper.percent()) * f64::from(track.height - 1)).round() as u16;
        let lines: Vec<Line> = (0..track.height)
            .map(|row| match row.cmp(&thumb_from_top) {
                std::cmp::Ordering::Less => Line::styled("│", self.style.track),
                std::cmp::Ordering::Equal => Line::styled("●", self.thumb_style()),
                std::cmp::Ordering::Greater => Line::styled("┃", self.style.filled),
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), track);
    }
}

impl Component for Slider {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Option<Message> {
        let changed = match msg {
            Message::KeyPress(key) if self.focus && !self.disabled => self.handle_key(key),
            Message::Mouse(ev) if !self.disabled => self.handle_mouse(ev),
            Message::Cancel => {
                self.mapper.cancel_drag(MOUSE);
                None
            }
            Message::SetValue(value) => {
                self.mapper.set_value(value);
                None
            }
            _ => None,
        };
        changed.map(Message::Changed)
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        match self.mapper.orientation() {
            Orientation::Horizontal => self.view_horizontal(frame, area),
            Orientation::Vertical => self.view_vertical(frame, area),
        }
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
