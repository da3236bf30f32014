//! Shared component rendering context.
//!
//! `ComponentContext` carries the per-frame UI state components need while
//! rendering and handling events, so the trait signatures stay stable.

use crate::theme::Theme;

#[derive(Debug, Clone, Copy)]
pub struct ComponentContext {
    focused: bool,
    theme: Theme,
}

impl ComponentContext {
    pub const fn new(focused: bool, theme: Theme) -> Self {
        Self { focused, theme }
    }

    /// Whether the hosting window is the active one.
    pub const fn focused(&self) -> bool {
        self.focused
    }

    pub const fn theme(&self) -> &Theme {
        &self.theme
    }

    pub const fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Default for ComponentContext {
    fn default() -> Self {
        Self::new(false, Theme::dark())
    }
}
