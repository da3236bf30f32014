use ratatui::layout::Rect;
use ratatui::style::Style;

use super::{Component, ComponentContext};
use crate::ui::{UiFrame, truncate_to_width};

/// Single-row bar with left- and right-aligned text. Used for the menu bar
/// along the top edge of the desktop.
#[derive(Debug, Default)]
pub struct StatusBar {
    left: String,
    right: String,
    style: Style,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_left<T: Into<String>>(&mut self, value: T) {
        self.left = value.into();
    }

    pub fn set_right<T: Into<String>>(&mut self, value: T) {
        self.right = value.into();
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn right(&self) -> &str {
        &self.right
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }
}

impl Component for StatusBar {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let row = Rect::new(area.x, area.y, area.width, 1);
        frame.fill(row, self.style);
        let width = area.width as usize;

        frame.set_string(row, area.x, area.y, &self.left, self.style);

        // the right side wins only when it fits next to the left text
        let right = truncate_to_width(&self.right, width);
        let right_width = right.chars().count();
        if !right.is_empty() && right_width + self.left.chars().count() < width {
            let start_x = area.x.saturating_add((width - right_width) as u16);
            frame.set_string(row, start_x, area.y, &right, self.style);
        }
    }
}
