//! Modal dialogs and drawers: a titled surface with action buttons that
//! traps focus while open.
//!
//! The surface registers itself and one focusable element per action in
//! the shared [`FocusTree`] when it opens, and hands the container to a
//! [`FocusScope`]. Tab and arrow keys cycle through the actions, Escape and
//! clicks outside dismiss it when it is dismissable, and closing it returns
//! focus to whatever held focus before.

use crate::component::Component;
use crate::host::{ElementId, FocusTree};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use trellis_core::{DismissReason, EventId, FocusScope, LayerStack};
use unicode_width::UnicodeWidthStr;

/// Where the surface is drawn relative to the area it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// A dialog in the middle of the area.
    #[default]
    Center,
    /// A full-height drawer along the left edge.
    Left,
    /// A full-height drawer along the right edge.
    Right,
    /// A full-width sheet along the bottom edge.
    Bottom,
}

/// A button in the overlay.
#[derive(Debug, Clone)]
pub struct Action {
    /// Text shown on the button.
    pub label: String,
    /// Key that triggers the action directly. Shown before the label.
    pub shortcut: Option<char>,
}

impl Action {
    /// Create an action with no shortcut.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            shortcut: None,
        }
    }

    /// Bind a single-key shortcut. Matching is case-insensitive.
    pub fn with_shortcut(mut self, key: char) -> Self {
        self.shortcut = Some(key.to_ascii_lowercase());
        self
    }

    fn text(&self, focused: bool) -> String {
        let marker = if focused { "▸ " } else { "  " };
        match self.shortcut {
            Some(key) => format!("{marker}[{key}] {}", self.label),
            None => format!("{marker}{}", self.label),
        }
    }
}

/// Messages for the overlay component.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A key press forwarded to the overlay.
    KeyPress(KeyEvent),
    /// A mouse event; clicks on actions choose them, clicks outside dismiss.
    Mouse(MouseEvent),
    /// Show the overlay and trap focus inside it.
    Open,
    /// Hide the overlay and restore focus.
    Close,
    /// An action was chosen. The overlay stays open; send [`Message::Close`]
    /// to hide it.
    Action(usize),
    /// The overlay was dismissed and has closed itself.
    Dismissed(DismissReason),
}

/// Style configuration for the overlay.
#[derive(Debug, Clone)]
pub struct OverlayStyle {
    /// Style applied to the surface border.
    pub border: Style,
    /// Style applied to the title in the top border.
    pub title: Style,
    /// Style applied to the body text.
    pub body: Style,
    /// Style applied to unfocused action buttons.
    pub action: Style,
    /// Style applied to the focused action button.
    pub focused_action: Style,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            border: Style::default().fg(Color::Cyan),
            title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            body: Style::default(),
            action: Style::default().fg(Color::DarkGray),
            focused_action: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        }
    }
}

/// A modal dialog or drawer.
///
/// # Example
///
/// ```ignore
/// use trellis_widgets::host::FocusTree;
/// use trellis_widgets::overlay::{Action, Overlay, Placement};
///
/// let tree = FocusTree::new();
/// let dialog = Overlay::new(&tree, "quit", "Quit?")
///     .body("Unsaved changes will be lost.")
///     .action(Action::new("Quit").with_shortcut('q'))
///     .action(Action::new("Cancel").with_shortcut('c'));
/// let drawer = Overlay::new(&tree, "nav", "Navigation").placement(Placement::Left);
/// ```
pub struct Overlay {
    id: ElementId,
    parent: Option<ElementId>,
    title: String,
    body: Vec<Line<'static>>,
    actions: Vec<Action>,
    placement: Placement,
    dismissable: bool,
    width_percent: u16,
    height_percent: u16,
    fixed_size: Option<(u16, u16)>,
    style: OverlayStyle,
    tree: FocusTree,
    scope: FocusScope<FocusTree>,
    opened_on: Option<EventId>,
}

impl Overlay {
    /// Create a closed overlay identified by `id` in `tree`.
    pub fn new(tree: &FocusTree, id: impl Into<ElementId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            title: title.into(),
            body: Vec::new(),
            actions: Vec::new(),
            placement: Placement::default(),
            dismissable: true,
            width_percent: 50,
            height_percent: 40,
            fixed_size: None,
            style: OverlayStyle::default(),
            tree: tree.clone(),
            scope: FocusScope::new(tree.clone(), LayerStack::shared()),
            opened_on: None,
        }
    }

    /// Use a specific layer stack instead of the thread's shared one.
    pub fn with_layers(mut self, layers: LayerStack) -> Self {
        self.scope = FocusScope::new(self.tree.clone(), layers);
        self
    }

    /// Register the overlay under `parent` instead of the tree root.
    pub fn within(mut self, parent: &ElementId) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Set the body text, split into lines.
    pub fn body(mut self, text: impl Into<String>) -> Self {
        let text: String = text.into();
        self.body = text.lines().map(|l| Line::raw(l.to_string())).collect();
        self
    }

    /// Append an action button.
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Where the surface sits in the area it is drawn into.
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Whether Escape and outside clicks close the overlay. Defaults to
    /// `true`.
    pub fn dismissable(mut self, dismissable: bool) -> Self {
        self.dismissable = dismissable;
        self
    }

    /// Size as a percentage of the area. Drawers only use the dimension
    /// across their edge.
    pub fn with_size(mut self, width_percent: u16, height_percent: u16) -> Self {
        self.width_percent = width_percent.min(100);
        self.height_percent = height_percent.min(100);
        self
    }

    /// Fixed size in columns and rows, overriding the percentages.
    pub fn with_fixed_size(mut self, width: u16, height: u16) -> Self {
        self.fixed_size = Some((width, height));
        self
    }

    /// Set the visual style for this overlay.
    pub fn with_style(mut self, style: OverlayStyle) -> Self {
        self.style = style;
        self
    }

    /// The element id of the surface container.
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// Whether the overlay is open.
    pub fn is_open(&self) -> bool {
        self.scope.is_active()
    }

    /// Whether this overlay is the innermost open surface.
    pub fn is_topmost(&self) -> bool {
        self.scope.is_topmost()
    }

    /// The action buttons, in display order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Element id of the action button at `index`.
    pub fn action_id(&self, index: usize) -> ElementId {
        self.id.child(format!("action-{index}"))
    }

    /// Index of the action button holding focus.
    pub fn focused_action(&self) -> Option<usize> {
        (0..self.actions.len()).find(|&i| self.tree.is_focused(&self.action_id(i)))
    }

    fn open(&mut self) {
        self.tree.insert(self.id.clone(), self.parent.as_ref(), false);
        for i in 0..self.actions.len() {
            self.tree.insert(self.action_id(i), Some(&self.id), true);
        }
        let event = self.tree.current_event();
        self.opened_on = Some(event);
        let activation = self.scope.activate(self.id.clone(), self.dismissable, Some(event));
        log::debug!("overlay {} opened: {activation:?}", self.id);
    }

    fn close(&mut self) {
        if !self.scope.is_active() {
            return;
        }
        self.scope.deactivate();
        self.tree.remove(&self.id);
        self.opened_on = None;
        log::debug!("overlay {} closed", self.id);
    }

    /// Arm outside-click detection once the opening event is over.
    fn sync_turn(&mut self) {
        if self.opened_on != Some(self.tree.current_event()) {
            self.scope.advance_turn();
        }
    }

    fn dismissed(&mut self, reason: DismissReason) -> Option<Message> {
        self.close();
        Some(Message::Dismissed(reason))
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => {
                if self.scope.handle_escape() {
                    return self.dismissed(DismissReason::Escape);
                }
                None
            }
            (KeyCode::BackTab, _) | (KeyCode::Left, _) => {
                self.scope.handle_tab_key(true);
                None
            }
            (KeyCode::Tab, m) => {
                self.scope.handle_tab_key(m.contains(KeyModifiers::SHIFT));
                None
            }
            (KeyCode::Right, _) => {
                self.scope.handle_tab_key(false);
                None
            }
            (KeyCode::Enter, _) | (KeyCode::Char(' '), _) => {
                self.focused_action().map(Message::Action)
            }
            (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
                let c = c.to_ascii_lowercase();
                let index = self.actions.iter().position(|a| a.shortcut == Some(c))?;
                self.tree.focus_element(&self.action_id(index));
                Some(Message::Action(index))
            }
            _ => None,
        }
    }

    fn handle_mouse(&mut self, ev: MouseEvent) -> Option<Message> {
        if ev.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let target = self.tree.hit_test(ev.column, ev.row);
        if self
            .scope
            .handle_outside_pointer(self.tree.current_event(), &target)
        {
            return self.dismissed(DismissReason::OutsidePointer);
        }
        let index = (0..self.actions.len()).find(|&i| self.action_id(i) == target)?;
        self.tree.focus_element(&target);
        Some(Message::Action(index))
    }

    /// The rectangle the surface occupies inside `area`.
    pub fn surface_rect(&self, area: Rect) -> Rect {
        let (width, height) = match self.fixed_size {
            Some((w, h)) => (w.min(area.width), h.min(area.height)),
            None => (
                (u32::from(area.width) * u32::from(self.width_percent) / 100) as u16,
                (u32::from(area.height) * u32::from(self.height_percent) / 100) as u16,
            ),
        };
        match self.placement {
            Placement::Center => Rect::new(
                area.x + (area.width - width) / 2,
                area.y + (area.height - height) / 2,
                width,
                height,
            ),
            Placement::Left => Rect::new(area.x, area.y, width, area.height),
            Placement::Right => Rect::new(area.right() - width, area.y, width, area.height),
            Placement::Bottom => Rect::new(area.x, area.bottom() - height, area.width, height),
        }
    }
}

impl Component for Overlay {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Option<Message> {
        match msg {
            Message::Open => {
                self.open();
                None
            }
            Message::Close => {
                self.close();
                None
            }
            Message::KeyPress(key) if self.is_open() => {
                self.sync_turn();
                if !self.scope.is_topmost() {
                    return None;
                }
                self.handle_key(key)
            }
            Message::Mouse(ev) if self.is_open() => {
                self.sync_turn();
                self.handle_mouse(ev)
            }
            _ => None,
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if !self.is_open() {
            return;
        }
        let surface = self.surface_rect(area);
        self.tree.place(&self.id, surface);
        frame.render_widget(Clear, surface);

        let block = Block::default()
            .title(self.title.as_str())
            .title_style(self.style.title)
            .borders(Borders::ALL)
            .border_style(self.style.border);
        let inner = block.inner(surface);
        frame.render_widget(block, surface);

        let action_rows = if self.actions.is_empty() { 0 } else { 2 };
        let [body_area, action_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(action_rows)]).areas(inner);

        if !self.body.is_empty() {
            let body = Paragraph::new(self.body.clone())
                .style(self.style.body)
                .wrap(Wrap { trim: false });
            frame.render_widget(body, body_area);
        }

        if self.actions.is_empty() || action_area.height == 0 {
            return;
        }
        let row = action_area.bottom() - 1;
        let focused = self.focused_action();
        let mut x = action_area.x;
        let mut spans = Vec::new();
        for (i, action) in self.actions.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
                x = x.saturating_add(2);
            }
            let is_focused = focused == Some(i);
            let text = action.text(is_focused);
            let width = (text.width() as u16).min(action_area.right().saturating_sub(x));
            self.tree
                .place(&self.action_id(i), Rect::new(x, row, width, 1));
            x = x.saturating_add(width);
            let style = if is_focused {
                self.style.focused_action
            } else {
                self.style.action
            };
            spans.push(Span::styled(text, style));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect::new(action_area.x, row, action_area.width, 1),
        );
    }

    fn focused(&self) -> bool {
        self.is_open()
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        self.close();
    }
}
