use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use linkify::{LinkFinder, LinkKind};
use ratatui::layout::Rect;
use ratatui::style::Style;

use super::{Component, ComponentContext, clamp_scroll};
use crate::terminal::{Effect, LineKind, TerminalSession};
use crate::theme::Theme;
use crate::ui::UiFrame;

const GREETING: &str = "Type 'help' to list commands.";
const CURSOR: &str = "█";
const WHEEL_STEP: isize = 3;

type Cell = (char, Style);

/// A URL laid out on screen during the last render.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LinkRegion {
    row: u16,
    start: u16,
    end: u16,
    target: String,
}

/// Hosts a [`TerminalSession`] inside a window: draws its line buffer with
/// highlighted links and forwards keystrokes to the live input.
#[derive(Debug)]
pub struct TerminalComponent {
    session: TerminalSession,
    /// Rows scrolled back from the bottom.
    scroll_back: usize,
    total_rows: usize,
    view_rows: usize,
    links: Vec<LinkRegion>,
    effects: Vec<Effect>,
}

impl TerminalComponent {
    pub fn new(mut session: TerminalSession) -> Self {
        if session.lines().is_empty() {
            session.output(GREETING);
        }
        Self {
            session,
            scroll_back: 0,
            total_rows: 0,
            view_rows: 0,
            links: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn session(&self) -> &TerminalSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut TerminalSession {
        &mut self.session
    }

    pub fn scroll_back(&self) -> usize {
        self.scroll_back
    }

    /// Effects requested by the session or by clicking a link.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        let mut effects = std::mem::take(&mut self.effects);
        effects.extend(self.session.take_effects());
        effects
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.session.tick(now)
    }

    fn scroll(&mut self, delta: isize) {
        self.scroll_back = clamp_scroll(self.scroll_back, delta, self.total_rows, self.view_rows);
    }

    fn page(&self) -> isize {
        self.view_rows.saturating_sub(1).max(1) as isize
    }

    /// Wrap one styled line into rows of `width` cells, recording which
    /// cells belong to a link.
    fn layout_line(
        finder: &LinkFinder,
        text: &str,
        base: Style,
        link: Style,
        width: usize,
    ) -> Vec<(Vec<Cell>, Vec<(usize, usize, String)>)> {
        let mut cells: Vec<Cell> = Vec::with_capacity(text.len());
        let mut spans = Vec::new();
        let mut cursor = 0;
        for found in finder.links(text) {
            cells.extend(text[cursor..found.start()].chars().map(|c| (c, base)));
            let start = cells.len();
            cells.extend(found.as_str().chars().map(|c| (c, link)));
            let target = match found.kind() {
                LinkKind::Email => format!("mailto:{}", found.as_str()),
                _ => found.as_str().to_string(),
            };
            spans.push((start, cells.len(), target));
            cursor = found.end();
        }
        cells.extend(text[cursor..].chars().map(|c| (c, base)));

        if cells.is_empty() {
            return vec![(Vec::new(), Vec::new())];
        }
        let width = width.max(1);
        cells
            .chunks(width)
            .enumerate()
            .map(|(i, chunk)| {
                let row_start = i * width;
                let row_end = row_start + chunk.len();
                let row_links = spans
                    .iter()
                    .filter(|(s, e, _)| *s < row_end && *e > row_start)
                    .map(|(s, e, t)| {
                        ((*s).max(row_start) - row_start, (*e).min(row_end) - row_start, t.clone())
                    })
                    .collect();
                (chunk.to_vec(), row_links)
            })
            .collect()
    }

    fn input_row(&self, theme: &Theme, focused: bool, width: usize) -> Vec<Vec<Cell>> {
        let prompt = Style::default().fg(theme.prompt).bg(theme.window_bg);
        let text = theme.body();
        let mut cells: Vec<Cell> = self.session.prompt().chars().map(|c| (c, prompt)).collect();
        cells.push((' ', text));
        cells.extend(self.session.input().chars().map(|c| (c, text)));
        if focused {
            cells.extend(CURSOR.chars().map(|c| (c, text)));
        }
        cells.chunks(width.max(1)).map(<[Cell]>::to_vec).collect()
    }

    fn link_at(&self, column: u16, row: u16) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.row == row && column >= l.start && column < l.end)
            .map(|l| l.target.as_str())
    }
}

impl Component for TerminalComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.links.clear();
        if area.width == 0 || area.height == 0 {
            return;
        }
        let theme = *ctx.theme();
        let width = area.width as usize;

        let finder = LinkFinder::new();
        let mut rows: Vec<(Vec<Cell>, Vec<(usize, usize, String)>)> = Vec::new();
        for line in self.session.lines() {
            let base = theme.line(line.kind);
            let link = if line.kind == LineKind::Input {
                base
            } else {
                theme.link()
            };
            rows.extend(Self::layout_line(&finder, &line.text, base, link, width));
        }
        rows.extend(
            self.input_row(&theme, ctx.focused(), width)
                .into_iter()
                .map(|cells| (cells, Vec::new())),
        );

        self.total_rows = rows.len();
        self.view_rows = area.height as usize;
        self.scroll_back = self
            .scroll_back
            .min(self.total_rows.saturating_sub(self.view_rows));
        let end = self.total_rows - self.scroll_back;
        let start = end.saturating_sub(self.view_rows);

        for (offset, (cells, links)) in rows[start..end].iter().enumerate() {
            let y = area.y + offset as u16;
            for (i, (ch, style)) in cells.iter().enumerate() {
                let mut buf = [0u8; 4];
                frame.set_string(area, area.x + i as u16, y, ch.encode_utf8(&mut buf), *style);
            }
            self.links
                .extend(links.iter().map(|(s, e, target)| LinkRegion {
                    row: y,
                    start: area.x + *s as u16,
                    end: area.x + *e as u16,
                    target: target.clone(),
                }));
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    return false;
                }
                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                match key.code {
                    KeyCode::PageUp => {
                        self.scroll(self.page());
                        return true;
                    }
                    KeyCode::PageDown => {
                        self.scroll(-self.page());
                        return true;
                    }
                    KeyCode::Char('l') if ctrl => self.session.clear_lines(),
                    KeyCode::Char('c') if ctrl => {
                        let line = format!("{} {}^C", self.session.prompt(), self.session.input());
                        self.session.output(line);
                        self.session.set_input("");
                    }
                    KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => {
                        return false;
                    }
                    KeyCode::Char(c) => self.session.insert_char(c),
                    KeyCode::Backspace => self.session.backspace(),
                    KeyCode::Enter => self.session.submit_input(),
                    KeyCode::Up => self.session.history_up(),
                    KeyCode::Down => self.session.history_down(),
                    KeyCode::Tab => {
                        self.session.complete_input();
                    }
                    _ => return false,
                }
                self.scroll_back = 0;
                true
            }
            Event::Paste(text) => {
                for c in text.chars().filter(|c| !c.is_control()) {
                    self.session.insert_char(c);
                }
                self.scroll_back = 0;
                true
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => {
                    self.scroll(WHEEL_STEP);
                    true
                }
                MouseEventKind::ScrollDown => {
                    self.scroll(-WHEEL_STEP);
                    true
                }
                MouseEventKind::Down(MouseButton::Left) => {
                    let Some(target) = self.link_at(mouse.column, mouse.row) else {
                        return false;
                    };
                    let effect = Effect::OpenUrl(target.to_string());
                    tracing::debug!(?effect, "link clicked");
                    self.effects.push(effect);
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::StaticProjects;
    use crate::terminal::SessionProfile;
    use crossterm::event::{KeyEvent, MouseEvent};
    use ratatui::buffer::Buffer;
    use std::sync::Arc;

    fn component() -> TerminalComponent {
        let session = TerminalSession::new(
            SessionProfile::default(),
            Arc::new(StaticProjects::builtin()),
        );
        TerminalComponent::new(session)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_line(term: &mut TerminalComponent, line: &str) {
        let ctx = ComponentContext::default();
        for c in line.chars() {
            term.handle_event(&key(KeyCode::Char(c)), &ctx);
        }
        term.handle_event(&key(KeyCode::Enter), &ctx);
    }

    fn render(term: &mut TerminalComponent, area: Rect) -> Buffer {
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        term.render(&mut frame, area, &ComponentContext::default().with_focus(true));
        buf
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn greets_on_a_fresh_session() {
        let term = component();
        assert_eq!(term.session().lines()[0].text, GREETING);
    }

    #[test]
    fn typing_and_enter_submit_the_input() {
        let mut term = component();
        type_line(&mut term, "whoami");
        let lines = term.session().lines();
        assert_eq!(lines.last().unwrap().text, "guest");
        assert_eq!(term.session().history(), ["whoami".to_string()]);
        assert_eq!(term.session().input(), "");
    }

    #[test]
    fn arrows_walk_history_and_tab_completes() {
        let mut term = component();
        let ctx = ComponentContext::default();
        type_line(&mut term, "pwd");
        term.handle_event(&key(KeyCode::Up), &ctx);
        assert_eq!(term.session().input(), "pwd");
        term.handle_event(&key(KeyCode::Down), &ctx);
        assert_eq!(term.session().input(), "");

        for c in "whoa".chars() {
            term.handle_event(&key(KeyCode::Char(c)), &ctx);
        }
        term.handle_event(&key(KeyCode::Tab), &ctx);
        assert_eq!(term.session().input(), "whoami ");
    }

    #[test]
    fn control_chords_are_not_typed() {
        let mut term = component();
        let ctx = ComponentContext::default();
        let chord = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(!term.handle_event(&chord, &ctx));
        assert_eq!(term.session().input(), "");
    }

    #[test]
    fn ctrl_l_clears_without_touching_history() {
        let mut term = component();
        let ctx = ComponentContext::default();
        type_line(&mut term, "pwd");
        let chord = Event::Key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
        assert!(term.handle_event(&chord, &ctx));
        assert!(term.session().lines().is_empty());
        assert_eq!(term.session().history(), ["pwd"]);
    }

    #[test]
    fn renders_prompt_below_output() {
        let mut term = component();
        type_line(&mut term, "echo hi");
        let buf = render(&mut term, Rect::new(0, 0, 40, 6));
        assert_eq!(row(&buf, 0), GREETING);
        assert_eq!(row(&buf, 1), "guest@folio:~$ echo hi");
        assert_eq!(row(&buf, 2), "hi");
        assert_eq!(row(&buf, 3), "guest@folio:~$ █");
    }

    #[test]
    fn long_lines_wrap_and_view_follows_the_bottom() {
        let mut term = component();
        type_line(&mut term, "echo abcdefghijklmnopqrstuvwxyz");
        let buf = render(&mut term, Rect::new(0, 0, 10, 3));
        assert_eq!(row(&buf, 0), "uvwxyz");
        assert_eq!(row(&buf, 1), "guest@foli");
        assert_eq!(row(&buf, 2), "o:~$ █");
    }

    #[test]
    fn page_up_scrolls_back_and_typing_returns_to_bottom() {
        let mut term = component();
        let ctx = ComponentContext::default();
        for _ in 0..5 {
            type_line(&mut term, "pwd");
        }
        render(&mut term, Rect::new(0, 0, 30, 4));
        term.handle_event(&key(KeyCode::PageUp), &ctx);
        assert_eq!(term.scroll_back(), 3);
        term.handle_event(&key(KeyCode::Char('x')), &ctx);
        assert_eq!(term.scroll_back(), 0);
    }

    #[test]
    fn clicking_a_highlighted_url_requests_it() {
        let mut term = component();
        type_line(&mut term, "echo see https://example.com now");
        let area = Rect::new(2, 1, 50, 6);
        let buf = render(&mut term, area);
        // output row is the third row of the window
        let y = 1 + 2;
        assert_eq!(buf.cell((2 + 4, y)).unwrap().symbol(), "h");
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 2 + 8,
            row: y,
            modifiers: KeyModifiers::NONE,
        });
        assert!(term.handle_event(&click, &ComponentContext::default()));
        assert_eq!(
            term.take_effects(),
            vec![Effect::OpenUrl("https://example.com".to_string())]
        );
    }

    #[test]
    fn exit_effect_is_forwarded() {
        let mut term = component();
        type_line(&mut term, "exit");
        assert!(term.take_effects().contains(&Effect::Logout));
    }
}
