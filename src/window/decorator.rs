use ratatui::prelude::Rect;

use super::{DesktopMetrics, Geometry};
use crate::theme::Theme;
use crate::ui::UiFrame;

const MINIMIZE_LABEL: &str = "[_]";
const MAXIMIZE_LABEL: &str = "[□]";
const RESTORE_LABEL: &str = "[▫]";
const CLOSE_LABEL: &str = "[x]";

/// Per-draw window state the decorator needs.
#[derive(Debug, Clone, Copy)]
pub struct WindowChrome<'a> {
    pub geometry: Geometry,
    pub title: &'a str,
    pub focused: bool,
    pub maximized: bool,
}

pub trait WindowDecorator: std::fmt::Debug {
    /// Draw borders, title bar and buttons, and clear the body. Returns the
    /// visible part of the content area.
    fn render_window(
        &self,
        frame: &mut UiFrame<'_>,
        chrome: WindowChrome<'_>,
        metrics: &DesktopMetrics,
        theme: &Theme,
    ) -> Rect;
}

/// Area inside the title bar and the left, right and bottom borders.
pub fn content_geometry(geometry: Geometry, metrics: &DesktopMetrics) -> Geometry {
    let top = metrics.title_bar_height.min(geometry.height);
    Geometry {
        x: geometry.x + 1,
        y: geometry.y + top as i32,
        width: geometry.width.saturating_sub(2),
        height: geometry.height.saturating_sub(top + 1),
    }
}

#[derive(Debug, Default)]
pub struct OpenStepDecorator;

impl WindowDecorator for OpenStepDecorator {
    fn render_window(
        &self,
        frame: &mut UiFrame<'_>,
        chrome: WindowChrome<'_>,
        metrics: &DesktopMetrics,
        theme: &Theme,
    ) -> Rect {
        let bounds = frame.area();
        let g = chrome.geometry;
        let outer = g.visible_in(bounds);
        if outer.width == 0 || outer.height == 0 {
            return Rect::default();
        }
        let border_style = theme.border_style();
        let header_style = theme.header(chrome.focused);

        frame.fill(outer, theme.body());

        let left = g.x;
        let right = g.x + g.width as i32 - 1;
        let top = g.y;
        let bottom = g.y + g.height as i32 - 1;

        let title_bar = Geometry::new(g.x, g.y, g.width, metrics.title_bar_height.min(g.height));
        frame.fill(title_bar.visible_in(bounds), header_style);

        let mut put = |x: i32, y: i32, symbol: &str, style| {
            if x >= 0 && y >= 0 {
                frame.set_string(outer, x as u16, y as u16, symbol, style);
            }
        };

        for y in (top + metrics.title_bar_height as i32)..bottom {
            put(left, y, "│", border_style);
            put(right, y, "│", border_style);
        }
        if bottom > top {
            put(left, bottom, "└", border_style);
            for x in (left + 1)..right {
                put(x, bottom, "─", border_style);
            }
            put(right, bottom, "◢", border_style);
        }

        let bw = metrics.button_width as i32;
        let end = right;
        let buttons = [
            (end - bw, CLOSE_LABEL),
            (
                end - 2 * bw,
                if chrome.maximized {
                    RESTORE_LABEL
                } else {
                    MAXIMIZE_LABEL
                },
            ),
            (end - 3 * bw, MINIMIZE_LABEL),
        ];
        let buttons_start = end - 3 * bw;
        if buttons_start > left {
            for (x, label) in buttons {
                put(x, top, label, header_style);
            }
        }

        let title_room = (buttons_start - left - 2).max(0) as usize;
        let title: String = chrome.title.chars().take(title_room).collect();
        put(left + 1, top, &title, header_style);

        content_geometry(g, metrics).visible_in(bounds)
    }
}
