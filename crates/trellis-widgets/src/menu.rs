//! Dropdown menu: a trigger row that opens a popup list of items.
//!
//! The popup is a transient surface driven by a [`FocusScope`], so Escape
//! and clicks outside close it and focus returns to the trigger. Which
//! items are chosen is tracked by a [`DisclosureSet`]: a plain menu keeps
//! one selected item and closes on choice, a checkable menu
//! ([`Menu::checkable`]) toggles items and stays open.

use crate::component::Component;
use crate::host::{ElementId, FocusTree};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use trellis_core::{Direction, DisclosureSet, DismissReason, EventId, FocusScope, LayerStack, Mode};
use unicode_width::UnicodeWidthStr;

/// Messages for the menu component.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A key press forwarded to the menu.
    KeyPress(KeyEvent),
    /// A mouse event for the trigger or the popup.
    Mouse(MouseEvent),
    Open,
    Close,
    /// An item was chosen. In a checkable menu this toggled its check.
    Selected(usize),
    /// The popup was dismissed and has closed.
    Dismissed(DismissReason),
}

/// Style configuration for the menu.
#[derive(Debug, Clone)]
pub struct MenuStyle {
    /// Style applied to the trigger row.
    pub trigger: Style,
    /// Style applied to the trigger row while focused or open.
    pub focused_trigger: Style,
    /// Style applied to the popup border.
    pub border: Style,
    /// Style applied to popup items.
    pub item: Style,
    /// Style applied to the item under the cursor.
    pub cursor_item: Style,
}

impl Default for MenuStyle {
    fn default() -> Self {
        Self {
            trigger: Style::default(),
            focused_trigger: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::DarkGray),
            item: Style::default(),
            cursor_item: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        }
    }
}

/// A dropdown menu.
pub struct Menu {
    id: ElementId,
    parent: Option<ElementId>,
    label: String,
    items: Vec<String>,
    chosen: DisclosureSet,
    cursor: usize,
    style: MenuStyle,
    tree: FocusTree,
    scope: FocusScope<FocusTree>,
    opened_on: Option<EventId>,
}

impl Menu {
    /// Create a closed menu and register its trigger in `tree`.
    pub fn new(
        tree: &FocusTree,
        id: impl Into<ElementId>,
        label: impl Into<String>,
        items: Vec<String>,
    ) -> Self {
        let menu = Self {
            chosen: DisclosureSet::new(items.len(), Mode::Exclusive).collapsible(false),
            id: id.into(),
            parent: None,
            label: label.into(),
            items,
            cursor: 0,
            style: MenuStyle::default(),
            tree: tree.clone(),
            scope: FocusScope::new(tree.clone(), LayerStack::shared()),
            opened_on: None,
        };
        menu.attach();
        menu
    }

    /// Use a specific layer stack instead of the thread's shared one.
    pub fn with_layers(mut self, layers: LayerStack) -> Self {
        self.scope = FocusScope::new(self.tree.clone(), layers);
        self
    }

    /// Register the menu under `parent` instead of the tree root.
    pub fn within(mut self, parent: &ElementId) -> Self {
        self.parent = Some(parent.clone());
        self.attach();
        self
    }

    /// Let items be checked independently. Choosing an item toggles it and
    /// leaves the popup open.
    pub fn checkable(mut self) -> Self {
        self.chosen = DisclosureSet::new(self.items.len(), Mode::Multiple);
        self
    }

    /// Set the visual style for this menu.
    pub fn with_style(mut self, style: MenuStyle) -> Self {
        self.style = style;
        self
    }

    /// The element id the trigger and popup hang under.
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// Element id of the trigger row.
    pub fn trigger_id(&self) -> ElementId {
        self.id.child("trigger")
    }

    /// Element id of the popup container.
    pub fn popup_id(&self) -> ElementId {
        self.id.child("popup")
    }

    /// Element id of the item at `index`.
    pub fn item_id(&self, index: usize) -> ElementId {
        self.popup_id().child(format!("item-{index}"))
    }

    /// Put keyboard focus on the trigger.
    pub fn focus(&self) {
        self.tree.focus_element(&self.trigger_id());
    }

    /// Whether the popup is open.
    pub fn is_open(&self) -> bool {
        self.scope.is_active()
    }

    /// Whether the popup is open and no other surface is stacked above it.
    pub fn is_topmost(&self) -> bool {
        self.scope.is_topmost()
    }

    /// Index of the item under the cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The selected item of a plain menu.
    pub fn selected(&self) -> Option<usize> {
        self.chosen.selected()
    }

    /// Whether the item at `index` is checked in a checkable menu.
    pub fn is_checked(&self, index: usize) -> bool {
        self.chosen.is_open(index)
    }

    /// Make sure the menu and its trigger are in the tree. A parent surface
    /// that closed takes them with it; call this before reopening the parent
    /// so its focus trap sees the trigger.
    pub fn attach(&self) {
        self.tree.insert(self.id.clone(), self.parent.as_ref(), false);
        self.tree.insert(self.trigger_id(), Some(&self.id), true);
    }

    fn open(&mut self) {
        self.attach();
        let popup = self.popup_id();
        self.tree.insert(popup.clone(), Some(&self.id), false);
        for i in 0..self.items.len() {
            self.tree.insert(self.item_id(i), Some(&popup), true);
        }
        let event = self.tree.current_event();
        self.opened_on = Some(event);
        self.scope.activate(popup, true, Some(event));
        self.cursor = self.chosen.selected().unwrap_or(0);
        if !self.items.is_empty() {
            self.tree.focus_element(&self.item_id(self.cursor));
        }
    }

    fn close(&mut self) {
        if !self.scope.is_active() {
            return;
        }
        self.scope.deactivate();
        self.tree.remove(&self.popup_id());
        self.opened_on = None;
    }

    fn sync_turn(&mut self) {
        if self.opened_on != Some(self.tree.current_event()) {
            self.scope.advance_turn();
        }
    }

    fn move_cursor(&mut self, to: Option<usize>) {
        if let Some(index) = to {
            self.cursor = index;
            self.tree.focus_element(&self.item_id(index));
        }
    }

    fn roam(&mut self, direction: Direction) {
        let next = self.chosen.move_focus(self.cursor, direction).ok();
        self.move_cursor(next);
    }

    fn choose(&mut self, index: usize) -> Option<Message> {
        match self.chosen.mode() {
            Mode::Exclusive => {
                self.chosen.select(index).ok()?;
                self.close();
            }
            Mode::Multiple => self.chosen.toggle(index).ok()?,
        }
        log::debug!("menu {} chose item {index}", self.id);
        Some(Message::Selected(index))
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        if !self.is_open() {
            return match key.code {
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down => {
                    self.open();
                    None
                }
                _ => None,
            };
        }
        self.sync_turn();
        if !self.scope.is_topmost() {
            return None;
        }
        match key.code {
            KeyCode::Esc => {
                if self.scope.handle_escape() {
                    self.close();
                    return Some(Message::Dismissed(DismissReason::Escape));
                }
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.roam(Direction::Forward);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.roam(Direction::Backward);
                None
            }
            KeyCode::Home => {
                self.move_cursor(self.chosen.first());
                None
            }
            KeyCode::End => {
                self.move_cursor(self.chosen.last());
                None
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.scope.handle_tab_key(key.code == KeyCode::BackTab);
                if let Some(index) = self.scope.focused_index() {
                    self.cursor = index;
                }
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') if !self.items.is_empty() => {
                self.choose(self.cursor)
            }
            _ => None,
        }
    }

    fn handle_mouse(&mut self, ev: MouseEvent) -> Option<Message> {
        if ev.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let target = self.tree.hit_test(ev.column, ev.row);
        if !self.is_open() {
            if target == self.trigger_id() {
                self.focus();
                self.open();
            }
            return None;
        }
        self.sync_turn();
        if self
            .scope
            .handle_outside_pointer(self.tree.current_event(), &target)
        {
            self.close();
            return Some(Message::Dismissed(DismissReason::OutsidePointer));
        }
        let index = (0..self.items.len()).find(|&i| self.item_id(i) == target)?;
        self.move_cursor(Some(index));
        self.choose(index)
    }

    fn trigger_text(&self) -> String {
        match (self.chosen.mode(), self.chosen.selected()) {
            (Mode::Exclusive, Some(i)) => format!("{}: {} ▾", self.label, self.items[i]),
            _ => format!("{} ▾", self.label),
        }
    }

    /// The bordered popup just below the trigger row of `area`, clipped to
    /// `bounds`.
    fn popup_rect(&self, area: Rect, bounds: Rect) -> Rect {
        let widest = (0..self.items.len())
            .map(|i| self.item_text(i).width())
            .max()
            .unwrap_or(0);
        let width = u16::try_from(widest).unwrap_or(u16::MAX).saturating_add(2);
        let height = u16::try_from(self.items.len())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        Rect::new(area.x, area.y.saturating_add(1), width, height).intersection(bounds)
    }

    fn item_text(&self, index: usize) -> String {
        let marker = if index == self.cursor { "▸ " } else { "  " };
        match self.chosen.mode() {
            Mode::Multiple => {
                let check = if self.chosen.is_open(index) { "[x]" } else { "[ ]" };
                format!("{marker}{check} {}", self.items[index])
            }
            Mode::Exclusive => format!("{marker}{}", self.items[index]),
        }
    }
}

impl Component for Menu {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Option<Message> {
        match msg {
            Message::KeyPress(key) => self.handle_key(key),
            Message::Mouse(ev) => self.handle_mouse(ev),
            Message::Open => {
                if !self.is_open() {
                    self.open();
                }
                None
            }
            Message::Close => {
                self.close();
                None
            }
            Message::Selected(_) | Message::Dismissed(_) => None,
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        let trigger_style = if self.focused() {
            self.style.focused_trigger
        } else {
            self.style.trigger
        };
        let trigger_area = Rect { height: 1, ..area };
        self.attach();
        self.tree.place(&self.id, trigger_area);
        self.tree.place(&self.trigger_id(), trigger_area);
        frame.render_widget(
            Paragraph::new(Span::styled(self.trigger_text(), trigger_style)),
            trigger_area,
        );

        if !self.is_open() {
            return;
        }
        let texts: Vec<String> = (0..self.items.len()).map(|i| self.item_text(i)).collect();
        let popup = self.popup_rect(area, frame.area());
        self.tree.place(&self.popup_id(), popup);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.style.border);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        for (i, text) in texts.into_iter().enumerate().take(inner.height as usize) {
            let row = Rect {
                y: inner.y + i as u16,
                height: 1,
                ..inner
            };
            self.tree.place(&self.item_id(i), row);
            let style = if i == self.cursor {
                self.style.cursor_item
            } else {
                self.style.item
            };
            frame.render_widget(Paragraph::new(Span::styled(text, style)), row);
        }
    }

    fn focused(&self) -> bool {
        self.is_open() || self.tree.is_focused(&self.trigger_id())
    }
}

impl Drop for Menu {
    fn drop(&mut self) {
        self.close();
        self.tree.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{click, key, render_string};

    fn edit_menu(tree: &FocusTree) -> Menu {
        let items = vec!["Cut".to_string(), "Copy".to_string(), "Paste".to_string()];
        Menu::new(tree, "edit", "Edit", items).with_layers(LayerStack::new())
    }

    fn open_with_enter(tree: &FocusTree, menu: &mut Menu) {
        menu.focus();
        tree.next_event();
        menu.update(Message::KeyPress(key(KeyCode::Enter)));
    }

    #[test]
    fn enter_opens_on_first_item() {
        let tree = FocusTree::new();
        let mut menu = edit_menu(&tree);
        open_with_enter(&tree, &mut menu);
        assert!(menu.is_open());
        assert!(tree.is_focused(&menu.item_id(0)));
    }

    #[test]
    fn arrows_rove_and_wrap() {
        let tree = FocusTree::new();
        let mut menu = edit_menu(&tree);
        open_with_enter(&tree, &mut menu);
        menu.update(Message::KeyPress(key(KeyCode::Up)));
        assert_eq!(menu.cursor(), 2);
        assert!(tree.is_focused(&menu.item_id(2)));
        menu.update(Message::KeyPress(key(KeyCode::Down)));
        assert_eq!(menu.cursor(), 0);
        menu.update(Message::KeyPress(key(KeyCode::End)));
        assert_eq!(menu.cursor(), 2);
        menu.update(Message::KeyPress(key(KeyCode::Home)));
        assert_eq!(menu.cursor(), 0);
    }

    #[test]
    fn choosing_closes_and_returns_focus_to_trigger() {
        let tree = FocusTree::new();
        let mut menu = edit_menu(&tree);
        open_with_enter(&tree, &mut menu);
        tree.next_event();
        menu.update(Message::KeyPress(key(KeyCode::Down)));
        assert_eq!(
            menu.update(Message::KeyPress(key(KeyCode::Enter))),
            Some(Message::Selected(1))
        );
        assert!(!menu.is_open());
        assert_eq!(menu.selected(), Some(1));
        assert!(tree.is_focused(&menu.trigger_id()));
        assert!(!tree.exists(&menu.popup_id()));
    }

    #[test]
    fn reopening_starts_at_selection() {
        let tree = FocusTree::new();
        let mut menu = edit_menu(&tree);
        open_with_enter(&tree, &mut menu);
        menu.update(Message::KeyPress(key(KeyCode::End)));
        menu.update(Message::KeyPress(key(KeyCode::Enter)));
        open_with_enter(&tree, &mut menu);
        assert_eq!(menu.cursor(), 2);
        assert!(render_string(&menu, 30, 6).starts_with("Edit: Paste ▾"));
    }

    #[test]
    fn escape_dismisses() {
        let tree = FocusTree::new();
        let mut menu = edit_menu(&tree);
        open_with_enter(&tree, &mut menu);
        assert_eq!(
            menu.update(Message::KeyPress(key(KeyCode::Esc))),
            Some(Message::Dismissed(DismissReason::Escape))
        );
        assert!(tree.is_focused(&menu.trigger_id()));
        assert_eq!(menu.selected(), None);
    }

    #[test]
    fn checkable_items_toggle_and_stay_open() {
        let tree = FocusTree::new();
        let mut menu = edit_menu(&tree).checkable();
        open_with_enter(&tree, &mut menu);
        menu.update(Message::KeyPress(key(KeyCode::Char(' '))));
        menu.update(Message::KeyPress(key(KeyCode::Down)));
        menu.update(Message::KeyPress(key(KeyCode::Char(' '))));
        assert!(menu.is_open());
        assert!(menu.is_checked(0));
        assert!(menu.is_checked(1));
        menu.update(Message::KeyPress(key(KeyCode::Enter)));
        assert!(!menu.is_checked(1));
    }

    #[test]
    fn renders_popup_below_trigger() {
        let tree = FocusTree::new();
        let mut menu = edit_menu(&tree);
        open_with_enter(&tree, &mut menu);
        let out = render_string(&menu, 20, 6);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("Edit ▾"));
        assert!(lines[2].contains("▸ Cut"));
        assert!(lines[4].contains("  Paste"));
        assert_eq!(tree.rect(&menu.item_id(1)).map(|r| r.y), Some(3));
    }

    #[test]
    fn popup_height_saturates_for_huge_menus() {
        let tree = FocusTree::new();
        let items = vec!["x".to_string(); 70_000];
        let menu = Menu::new(&tree, "huge", "Huge", items).with_layers(LayerStack::new());
        let popup = menu.popup_rect(Rect::new(0, 0, 20, 1), Rect::new(0, 0, 20, 10));
        assert_eq!(popup, Rect::new(0, 1, 5, 9));
    }

    #[test]
    fn topmost_only_while_open() {
        let tree = FocusTree::new();
        let mut menu = edit_menu(&tree);
        assert!(!menu.is_topmost());
        open_with_enter(&tree, &mut menu);
        assert!(menu.is_topmost());
        menu.update(Message::Close);
        assert!(!menu.is_topmost());
    }

    #[test]
    fn mouse_opens_chooses_and_dismisses() {
        let tree = FocusTree::new();
        let mut menu = edit_menu(&tree);
        render_string(&menu, 20, 6);

        tree.next_event();
        menu.update(Message::Mouse(click(1, 0)));
        assert!(menu.is_open());
        render_string(&menu, 20, 6);

        tree.next_event();
        assert_eq!(
            menu.update(Message::Mouse(click(3, 4))),
            Some(Message::Selected(2))
        );
        assert!(!menu.is_open());

        tree.next_event();
        menu.update(Message::Mouse(click(1, 0)));
        render_string(&menu, 20, 6);
        tree.next_event();
        assert_eq!(
            menu.update(Message::Mouse(click(19, 5))),
            Some(Message::Dismissed(DismissReason::OutsidePointer))
        );
    }

    #[test]
    fn click_on_trigger_while_open_dismisses() {
        let tree = FocusTree::new();
        let mut menu = edit_menu(&tree);
        render_string(&menu, 20, 6);
        tree.next_event();
        menu.update(Message::Mouse(click(1, 0)));
        // The opening click does not count as an outside click.
        assert!(menu.is_open());
        render_string(&menu, 20, 6);
        tree.next_event();
        assert_eq!(
            menu.update(Message::Mouse(click(1, 0))),
            Some(Message::Dismissed(DismissReason::OutsidePointer))
        );
    }
}
