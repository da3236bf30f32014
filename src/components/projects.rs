use std::sync::Arc;

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::{Component, ComponentContext};
use crate::projects::{Project, ProjectSource};
use crate::terminal::Effect;
use crate::ui::UiFrame;

const MARKER: &str = "▸ ";

/// Project browser: a selectable list on top, details of the selection
/// below. Enter opens the repository, `l` the live demo.
#[derive(Debug)]
pub struct ProjectsComponent {
    source: Arc<dyn ProjectSource>,
    selected: usize,
    offset: usize,
    list_area: Rect,
    effects: Vec<Effect>,
}

impl ProjectsComponent {
    pub fn new(source: Arc<dyn ProjectSource>) -> Self {
        Self {
            source,
            selected: 0,
            offset: 0,
            list_area: Rect::default(),
            effects: Vec::new(),
        }
    }

    pub fn selected(&self) -> Option<&Project> {
        self.source.projects().get(self.selected)
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.source.projects().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = if delta.is_negative() {
            self.selected.saturating_sub(delta.unsigned_abs())
        } else {
            (self.selected + delta as usize).min(len - 1)
        };
    }

    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    fn open_selected(&mut self, live: bool) -> bool {
        let Some(project) = self.selected() else {
            return false;
        };
        let url = if live {
            project.live_url.clone()
        } else {
            Some(project.github_url.clone())
        };
        match url {
            Some(url) => {
                self.effects.push(Effect::OpenUrl(url));
                true
            }
            None => false,
        }
    }

    fn keep_selected_in_view(&mut self, view: usize) {
        if view == 0 {
            self.offset = 0;
        } else if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + view {
            self.offset = self.selected + 1 - view;
        }
    }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

impl Component for ProjectsComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            self.list_area = Rect::default();
            return;
        }
        let theme = ctx.theme();
        let body = theme.body();
        let source = Arc::clone(&self.source);
        let projects = source.projects();

        // list takes up to half the height, details get the rest
        let list_height = (projects.len() as u16).min(area.height.div_ceil(2)).max(1);
        self.list_area = Rect::new(area.x, area.y, area.width, list_height);
        self.keep_selected_in_view(list_height as usize);

        let selected_style = if ctx.focused() {
            theme.header(true)
        } else {
            body.add_modifier(Modifier::REVERSED)
        };
        for (row, (index, project)) in projects
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(list_height as usize)
            .enumerate()
        {
            let y = area.y + row as u16;
            let (prefix, style) = if index == self.selected {
                (MARKER, selected_style)
            } else {
                ("  ", body)
            };
            if index == self.selected {
                frame.fill(Rect::new(area.x, y, area.width, 1), style);
            }
            frame.set_string(area, area.x, y, &format!("{prefix}{}", project.name), style);
        }

        let Some(project) = projects.get(self.selected) else {
            frame.set_string(area, area.x, area.y, "No projects.", body);
            return;
        };
        let muted = Style::default().fg(theme.muted).bg(theme.window_bg);
        let width = area.width as usize;
        let mut details: Vec<(String, Style)> = vec![
            ("─".repeat(width), muted),
            (project.name.clone(), body.add_modifier(Modifier::BOLD)),
        ];
        details.extend(wrap(&project.description, width).into_iter().map(|l| (l, body)));
        if !project.tech_stack.is_empty() {
            details.push((format!("Stack: {}", project.stack_label()), muted));
        }
        details.push((format!("GitHub: {}", project.github_url), theme.link()));
        if let Some(live) = &project.live_url {
            details.push((format!("Live: {live}"), theme.link()));
        }
        details.push(("Enter: open repo  l: open live demo".to_string(), muted));

        let top = area.y + list_height;
        let bottom = area.y + area.height;
        for (i, (text, style)) in details.iter().enumerate() {
            let y = top + i as u16;
            if y >= bottom {
                break;
            }
            frame.set_string(area, area.x, y, text, *style);
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_selection(-1);
                    true
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_selection(1);
                    true
                }
                KeyCode::Home => {
                    self.selected = 0;
                    true
                }
                KeyCode::End => {
                    self.selected = self.source.projects().len().saturating_sub(1);
                    true
                }
                KeyCode::Enter => self.open_selected(false),
                KeyCode::Char('l') => self.open_selected(true),
                _ => false,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => {
                    self.move_selection(-1);
                    true
                }
                MouseEventKind::ScrollDown => {
                    self.move_selection(1);
                    true
                }
                MouseEventKind::Down(MouseButton::Left) => {
                    let area = self.list_area;
                    let inside = mouse.column >= area.x
                        && mouse.column < area.x + area.width
                        && mouse.row >= area.y
                        && mouse.row < area.y + area.height;
                    if !inside {
                        return false;
                    }
                    let index = self.offset + (mouse.row - area.y) as usize;
                    if index < self.source.projects().len() {
                        self.selected = index;
                    }
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }
}
