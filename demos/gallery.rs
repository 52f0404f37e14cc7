//! Widget gallery.
//!
//! Tab / Shift+Tab move between widgets, `o` opens the settings dialog
//! (which holds a nested dropdown), `q` quits. The mouse works everywhere.
//! Set `TRELLIS_LOG=/tmp/trellis.log` to capture log output.

use futures::StreamExt;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use trellis::crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, MouseEvent};
use trellis::terminal::{TerminalGuard, TerminalOptions};
use trellis::widgets::accordion::{self, Accordion, Section};
use trellis::widgets::checkbox::{self, Checkbox};
use trellis::widgets::menu::{self, Menu};
use trellis::widgets::overlay::{self, Action, Overlay};
use trellis::widgets::radio::{self, RadioGroup};
use trellis::widgets::slider::{self, Slider};
use trellis::widgets::tabs::{self, Tabs};
use trellis::widgets::{Component, FocusTree};
use trellis::Range;

const FIELDS: usize = 7;

struct Gallery {
    tree: FocusTree,
    tabs: Tabs,
    volume: Slider,
    balance: Slider,
    wrap: Checkbox,
    sound: Checkbox,
    size: RadioGroup,
    faq: Accordion,
    settings: Overlay,
    theme: Menu,
    focus: usize,
    status: String,
    quit: bool,
}

impl Gallery {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let tree = FocusTree::new();
        let settings = Overlay::new(&tree, "settings", "Settings")
            .body("Pick a theme, then save.\nEsc or a click outside cancels.")
            .with_fixed_size(44, 10)
            .action(Action::new("Save").with_shortcut('s'))
            .action(Action::new("Cancel").with_shortcut('c'));
        let theme = Menu::new(
            &tree,
            "theme",
            "Theme",
            vec!["Light".into(), "Dark".into(), "Solarized".into()],
        )
        .within(settings.id());
        let mut gallery = Self {
            tabs: Tabs::new(vec!["Controls".into(), "Sections".into()]),
            volume: Slider::new("Volume", Range::new(0.0, 100.0, 5.0)?).with_value(40.0),
            balance: Slider::new("Balance", Range::new(-1.0, 1.0, 0.1)?)
                .with_precision(1)
                .vertical(),
            wrap: Checkbox::new("Word wrap").checked(true),
            sound: Checkbox::switch("Sound"),
            size: RadioGroup::new(vec!["Small".into(), "Medium".into(), "Large".into()])
                .with_selected(1),
            faq: Accordion::new(vec![
                Section::new("What is this?", "A gallery of trellis widgets."),
                Section::new("Keyboard", "Arrows move, Enter/Space act,\nTab changes widget."),
                Section::new("Mouse", "Click headers, drag sliders."),
            ]),
            tree,
            settings,
            theme,
            focus: 0,
            status: String::from("o: settings  q: quit"),
            quit: false,
        };
        gallery.apply_focus();
        Ok(gallery)
    }

    fn apply_focus(&mut self) {
        self.tabs.blur();
        self.volume.blur();
        self.balance.blur();
        self.wrap.blur();
        self.sound.blur();
        self.size.blur();
        self.faq.blur();
        match self.focus {
            0 => self.tabs.focus(),
            1 => self.volume.focus(),
            2 => self.balance.focus(),
            3 => self.wrap.focus(),
            4 => self.sound.focus(),
            5 => self.size.focus(),
            _ => self.faq.focus(),
        }
    }

    fn on_event(&mut self, event: Event) {
        self.tree.next_event();
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key(key),
            Event::Mouse(ev) => self.on_mouse(ev),
            _ => {}
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.theme.is_open() {
            let out = self.theme.update(menu::Message::KeyPress(key));
            self.on_theme(out);
            return;
        }
        if self.settings.is_open() {
            if self.theme.focused() && matches!(key.code, KeyCode::Enter | KeyCode::Down) {
                self.theme.update(menu::Message::KeyPress(key));
                return;
            }
            let out = self.settings.update(overlay::Message::KeyPress(key));
            self.on_settings(out);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('o') => {
                self.theme.attach();
                self.settings.update(overlay::Message::Open);
                self.status = String::from("settings open");
            }
            KeyCode::Tab => {
                self.focus = (self.focus + 1) % FIELDS;
                self.apply_focus();
            }
            KeyCode::BackTab => {
                self.focus = (self.focus + FIELDS - 1) % FIELDS;
                self.apply_focus();
            }
            _ => self.dispatch_key(key),
        }
    }

    fn dispatch_key(&mut self, key: KeyEvent) {
        let status = match self.focus {
            0 => tab_status(self.tabs.update(tabs::Message::KeyPress(key))),
            1 => slider_status("volume", self.volume.update(slider::Message::KeyPress(key))),
            2 => slider_status("balance", self.balance.update(slider::Message::KeyPress(key))),
            3 => toggle_status("word wrap", self.wrap.update(checkbox::Message::KeyPress(key))),
            4 => toggle_status("sound", self.sound.update(checkbox::Message::KeyPress(key))),
            5 => radio_status(self.size.update(radio::Message::KeyPress(key))),
            _ => section_status(self.faq.update(accordion::Message::KeyPress(key))),
        };
        if let Some(status) = status {
            self.status = status;
        }
    }

    // Outer surfaces see clicks first so a click outside a nested menu
    // only closes the menu.
    fn on_mouse(&mut self, ev: MouseEvent) {
        if self.settings.is_open() {
            let out = self.settings.update(overlay::Message::Mouse(ev));
            self.on_settings(out);
            let out = self.theme.update(menu::Message::Mouse(ev));
            self.on_theme(out);
            return;
        }
        let mut updates = vec![tab_status(self.tabs.update(tabs::Message::Mouse(ev)))];
        if self.tabs.selected() == 0 {
            updates.extend([
                slider_status("volume", self.volume.update(slider::Message::Mouse(ev))),
                slider_status("balance", self.balance.update(slider::Message::Mouse(ev))),
                toggle_status("word wrap", self.wrap.update(checkbox::Message::Mouse(ev))),
                toggle_status("sound", self.sound.update(checkbox::Message::Mouse(ev))),
                radio_status(self.size.update(radio::Message::Mouse(ev))),
            ]);
        } else {
            updates.push(section_status(self.faq.update(accordion::Message::Mouse(ev))));
        }
        if let Some(status) = updates.into_iter().flatten().last() {
            self.status = status;
        }
    }

    fn on_settings(&mut self, msg: Option<overlay::Message>) {
        match msg {
            Some(overlay::Message::Action(0)) => {
                self.settings.update(overlay::Message::Close);
                self.status = String::from("settings saved");
            }
            Some(overlay::Message::Action(_)) => {
                self.settings.update(overlay::Message::Close);
                self.status = String::from("settings cancelled");
            }
            Some(overlay::Message::Dismissed(reason)) => {
                self.status = format!("settings dismissed ({reason:?})");
            }
            _ => {}
        }
    }

    fn on_theme(&mut self, msg: Option<menu::Message>) {
        match msg {
            Some(menu::Message::Selected(i)) => self.status = format!("theme {i}"),
            Some(menu::Message::Dismissed(reason)) => {
                self.status = format!("theme menu dismissed ({reason:?})");
            }
            _ => {}
        }
    }

    fn view(&self, frame: &mut Frame) {
        let [tabs_area, body, status] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        self.tabs.view(frame, tabs_area);

        if self.tabs.selected() == 0 {
            let [left, right] =
                Layout::horizontal([Constraint::Min(0), Constraint::Length(12)]).areas(body);
            let rows = Layout::vertical([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(left);
            self.volume.view(frame, rows[0]);
            self.wrap.view(frame, rows[2]);
            self.sound.view(frame, rows[3]);
            self.size.view(frame, rows[4]);
            self.balance.view(frame, right);
        } else {
            self.faq.view(frame, body);
        }

        frame.render_widget(
            Paragraph::new(self.status.as_str()).style(Style::default().fg(Color::DarkGray)),
            status,
        );

        self.settings.view(frame, frame.area());
        if self.settings.is_open() {
            let dialog = self.settings.surface_rect(frame.area());
            let anchor = Rect::new(dialog.x + 2, dialog.y + 4, 24, 5).intersection(dialog);
            self.theme.view(frame, anchor);
        }
    }
}

fn tab_status(msg: Option<tabs::Message>) -> Option<String> {
    match msg? {
        tabs::Message::Selected(i) => Some(format!("tab {i}")),
        _ => None,
    }
}

fn slider_status(name: &str, msg: Option<slider::Message>) -> Option<String> {
    match msg? {
        slider::Message::Changed(v) => Some(format!("{name} {v:.1}")),
        _ => None,
    }
}

fn toggle_status(name: &str, msg: Option<checkbox::Message>) -> Option<String> {
    match msg? {
        checkbox::Message::Changed(on) => Some(format!("{name} {on}")),
        _ => None,
    }
}

fn radio_status(msg: Option<radio::Message>) -> Option<String> {
    match msg? {
        radio::Message::Changed(i) => Some(format!("size {i}")),
        _ => None,
    }
}

fn section_status(msg: Option<accordion::Message>) -> Option<String> {
    match msg? {
        accordion::Message::Toggled { index, open } => {
            Some(format!("section {index} open: {open}"))
        }
        _ => None,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    trellis::logging::init_from_env()?;
    let mut gallery = Gallery::new()?;
    let (guard, mut terminal) = TerminalGuard::enter(TerminalOptions::default())?;
    let mut events = EventStream::new();

    let result = async {
        terminal.draw(|frame| gallery.view(frame))?;
        while let Some(event) = events.next().await {
            gallery.on_event(event?);
            if gallery.quit {
                break;
            }
            terminal.draw(|frame| gallery.view(frame))?;
        }
        Ok::<(), std::io::Error>(())
    }
    .await;

    guard.restore()?;
    result?;
    Ok(())
}
