use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod about;
pub mod dock;
pub mod projects;
pub mod status_bar;
pub mod terminal;

pub use about::AboutComponent;
pub use dock::{Dock, DockEntry, DockTarget};
pub use projects::ProjectsComponent;
pub use status_bar::StatusBar;
pub use terminal::TerminalComponent;

pub use crate::component_context::ComponentContext;

pub trait Component {
    fn resize(&mut self, _area: Rect, _ctx: &ComponentContext) {}

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    /// Returns `true` when the event was consumed.
    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext) -> bool {
        false
    }
}

/// Map a scroll delta over `total` rows into a clamped offset from the top.
pub(crate) fn clamp_scroll(offset: usize, delta: isize, total: usize, view: usize) -> usize {
    let max = total.saturating_sub(view);
    let next = if delta.is_negative() {
        offset.saturating_sub(delta.unsigned_abs())
    } else {
        offset.saturating_add(delta as usize)
    };
    next.min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    struct DummyComp;
    impl Component for DummyComp {
        fn render(&mut self, _frame: &mut UiFrame<'_>, _area: Rect, _ctx: &ComponentContext) {}
    }

    #[test]
    fn default_handle_event_returns_false() {
        let mut d = DummyComp;
        assert!(!d.handle_event(
            &Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
            &ComponentContext::default()
        ));
    }

    #[test]
    fn clamp_scroll_stays_in_range() {
        assert_eq!(clamp_scroll(0, -3, 10, 4), 0);
        assert_eq!(clamp_scroll(2, 3, 10, 4), 5);
        assert_eq!(clamp_scroll(5, 10, 10, 4), 6);
        assert_eq!(clamp_scroll(0, 1, 3, 4), 0);
    }
}
