use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

/// Smooths over platform differences in crossterm key reporting so the
/// desktop sees one press per keystroke.
#[derive(Debug, Default)]
pub struct KeyboardNormalizer {
    esc_down: bool,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        let Event::Key(mut key) = evt else {
            return Some(evt);
        };
        if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
            key.code = KeyCode::BackTab;
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
        match key.kind {
            KeyEventKind::Release => {
                if key.code == KeyCode::Esc {
                    self.esc_down = false;
                }
                return None;
            }
            // Windows reports auto-repeat for held Esc; other platforms
            // never send Repeat without the enhancement flags.
            KeyEventKind::Repeat if cfg!(windows) => return None,
            _ => {}
        }
        if cfg!(windows) && key.code == KeyCode::Esc {
            if self.esc_down {
                return None;
            }
            self.esc_down = true;
        } else {
            self.esc_down = false;
        }
        Some(Event::Key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    #[test]
    fn tab_with_shift_becomes_backtab() {
        let mut norm = KeyboardNormalizer::new();
        let key = KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT);
        match norm.normalize(Event::Key(key)) {
            Some(Event::Key(k)) => {
                assert_eq!(k.code, KeyCode::BackTab);
                assert!(!k.modifiers.contains(KeyModifiers::SHIFT));
            }
            other => panic!("expected key event, got {other:?}"),
        }
    }

    #[test]
    fn release_is_dropped() {
        let mut norm = KeyboardNormalizer::new();
        let mut key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert!(norm.normalize(Event::Key(key)).is_none());
    }

    #[test]
    fn non_key_events_pass_through() {
        let mut norm = KeyboardNormalizer::new();
        assert_eq!(
            norm.normalize(Event::Resize(10, 20)),
            Some(Event::Resize(10, 20))
        );
    }
}
