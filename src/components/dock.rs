use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

use super::{Component, ComponentContext};
use crate::constants::{APP_ABOUT, APP_PROJECTS, APP_TERMINAL};
use crate::ui::UiFrame;
use crate::window::WindowId;

const SEPARATOR: &str = "│";

/// What a click on a dock entry asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockTarget {
    Launch(&'static str),
    Window(WindowId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockEntry {
    pub label: String,
    pub target: DockTarget,
    pub active: bool,
    pub minimized: bool,
}

impl DockEntry {
    pub fn window(id: WindowId, title: &str, active: bool, minimized: bool) -> Self {
        Self {
            label: title.to_string(),
            target: DockTarget::Window(id),
            active,
            minimized,
        }
    }
}

/// Bottom bar: app launchers, one button per open window and the status
/// indicator of the focused terminal.
#[derive(Debug)]
pub struct Dock {
    launchers: Vec<DockEntry>,
    windows: Vec<DockEntry>,
    status: Option<(String, Color)>,
    regions: Vec<(Rect, DockTarget)>,
}

impl Default for Dock {
    fn default() -> Self {
        let launcher = |label: &str, app: &'static str| DockEntry {
            label: label.to_string(),
            target: DockTarget::Launch(app),
            active: false,
            minimized: false,
        };
        Self {
            launchers: vec![
                launcher("+ Terminal", APP_TERMINAL),
                launcher("Projects", APP_PROJECTS),
                launcher("About", APP_ABOUT),
            ],
            windows: Vec::new(),
            status: None,
            regions: Vec::new(),
        }
    }
}

impl Dock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_windows(&mut self, windows: Vec<DockEntry>) {
        self.windows = windows;
    }

    pub fn set_status(&mut self, status: Option<(String, Color)>) {
        self.status = status;
    }

    /// Entry under the pointer, as of the last render.
    pub fn target_at(&self, column: u16, row: u16) -> Option<DockTarget> {
        self.regions
            .iter()
            .find(|(r, _)| {
                row >= r.y && row < r.y + r.height && column >= r.x && column < r.x + r.width
            })
            .map(|(_, target)| *target)
    }
}

impl Component for Dock {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.regions.clear();
        if area.width == 0 || area.height == 0 {
            return;
        }
        let theme = ctx.theme();
        let base = Style::default().fg(theme.dock_fg).bg(theme.dock_bg);
        let active = Style::default()
            .fg(theme.dock_active_fg)
            .bg(theme.dock_active_bg)
            .add_modifier(Modifier::BOLD);
        let row = Rect::new(area.x, area.y, area.width, 1);
        frame.fill(row, base);

        let right_edge = area.x + area.width;
        let status_width = self
            .status
            .as_ref()
            .map_or(0, |(text, _)| text.chars().count() as u16 + 3);
        let limit = right_edge.saturating_sub(status_width);

        let mut x = area.x;
        let groups = [&self.launchers, &self.windows];
        for (group_index, group) in groups.into_iter().enumerate() {
            if group_index > 0 && !group.is_empty() && x < limit {
                frame.set_string(row, x, area.y, SEPARATOR, base);
                x += 1;
            }
            for entry in group {
                let label = if entry.minimized {
                    format!(" ({}) ", entry.label)
                } else {
                    format!(" {} ", entry.label)
                };
                let width = label.chars().count() as u16;
                if x + width > limit {
                    break;
                }
                let style = if entry.active { active } else { base };
                frame.set_string(row, x, area.y, &label, style);
                self.regions
                    .push((Rect::new(x, area.y, width, 1), entry.target));
                x += width;
            }
        }

        if let Some((text, color)) = &self.status {
            let start = right_edge.saturating_sub(status_width);
            let style = base.fg(*color);
            frame.set_string(row, start, area.y, &format!("● {text}"), style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    fn render(dock: &mut Dock, width: u16) -> String {
        let area = Rect::new(0, 5, width, 1);
        let mut buf = Buffer::empty(Rect::new(0, 0, width, 6));
        let mut frame = UiFrame::from_parts(buf.area, &mut buf);
        dock.render(&mut frame, area, &ComponentContext::default());
        (0..width)
            .map(|x| buf.cell((x, 5)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn launchers_and_windows_are_clickable() {
        let mut dock = Dock::new();
        dock.set_windows(vec![
            DockEntry::window(WindowId(1), "Terminal", true, false),
            DockEntry::window(WindowId(2), "Projects", false, true),
        ]);
        let text = render(&mut dock, 80);
        assert!(text.starts_with(" + Terminal  Projects  About │ Terminal  (Projects) "));
        assert_eq!(dock.target_at(1, 5), Some(DockTarget::Launch(APP_TERMINAL)));
        assert_eq!(dock.target_at(13, 5), Some(DockTarget::Launch(APP_PROJECTS)));
        assert_eq!(dock.target_at(31, 5), Some(DockTarget::Window(WindowId(1))));
        assert_eq!(dock.target_at(40, 5), Some(DockTarget::Window(WindowId(2))));
        assert_eq!(dock.target_at(1, 4), None);
    }

    #[test]
    fn status_is_right_aligned_and_entries_yield_to_it() {
        let mut dock = Dock::new();
        dock.set_status(Some(("idle".to_string(), Color::Gray)));
        let text = render(&mut dock, 30);
        assert!(text.ends_with("● idle "));
        // "About" no longer fits before the status
        assert_eq!(dock.target_at(24, 5), None);
    }
}
