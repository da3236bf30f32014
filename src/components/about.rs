use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::{Component, ComponentContext, clamp_scroll};
use crate::keybindings::KeyBindings;
use crate::ui::UiFrame;

static ABOUT_TEXT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/about.txt"));

/// Welcome text, the desktop key map and a "show at startup" toggle.
#[derive(Debug)]
pub struct AboutComponent {
    lines: Vec<String>,
    skip_welcome: bool,
    offset: usize,
    view: usize,
    toggle_row: Option<u16>,
}

impl AboutComponent {
    pub fn new(bindings: &KeyBindings, skip_welcome: bool) -> Self {
        let text = ABOUT_TEXT
            .replace("%PACKAGE%", env!("CARGO_PKG_NAME"))
            .replace("%VERSION%", env!("CARGO_PKG_VERSION"))
            .replace("%REPOSITORY%", env!("CARGO_PKG_REPOSITORY"));
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        lines.push(String::new());
        lines.push("Keys".to_string());
        let entries = bindings.help_entries();
        let key_width = entries
            .iter()
            .map(|(_, keys)| keys.chars().count())
            .max()
            .unwrap_or(0);
        lines.extend(
            entries
                .into_iter()
                .map(|(action, keys)| format!("  {keys:<key_width$}  {action}")),
        );
        Self {
            lines,
            skip_welcome,
            offset: 0,
            view: 0,
            toggle_row: None,
        }
    }

    pub fn skip_welcome(&self) -> bool {
        self.skip_welcome
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn toggle_label(&self) -> String {
        let mark = if self.skip_welcome { ' ' } else { 'x' };
        format!("[{mark}] Show this window at startup (space)")
    }

    fn toggle(&mut self) {
        self.skip_welcome = !self.skip_welcome;
    }
}

impl Component for AboutComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.toggle_row = None;
        if area.width == 0 || area.height == 0 {
            return;
        }
        let theme = ctx.theme();
        let body = theme.body();
        // last row is reserved for the startup toggle
        self.view = area.height.saturating_sub(1) as usize;
        self.offset = self.offset.min(self.lines.len().saturating_sub(self.view));

        for (row, line) in self.lines.iter().skip(self.offset).take(self.view).enumerate() {
            let style = if line == "Keys" {
                body.add_modifier(Modifier::BOLD)
            } else {
                body
            };
            frame.set_string(area, area.x, area.y + row as u16, line, style);
        }

        let y = area.y + area.height - 1;
        let style = Style::default().fg(theme.accent).bg(theme.window_bg);
        frame.set_string(area, area.x, y, &self.toggle_label(), style);
        self.toggle_row = Some(y);
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                KeyCode::Char(' ') => {
                    self.toggle();
                    true
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.offset = clamp_scroll(self.offset, -1, self.lines.len(), self.view);
                    true
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.offset = clamp_scroll(self.offset, 1, self.lines.len(), self.view);
                    true
                }
                _ => false,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => {
                    self.offset = clamp_scroll(self.offset, -1, self.lines.len(), self.view);
                    true
                }
                MouseEventKind::ScrollDown => {
                    self.offset = clamp_scroll(self.offset, 1, self.lines.len(), self.view);
                    true
                }
                MouseEventKind::Down(MouseButton::Left) if Some(mouse.row) == self.toggle_row => {
                    self.toggle();
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }
}
