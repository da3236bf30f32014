use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Desktop-level commands. Keys that match none of these go to the focused
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NewTerminal,
    OpenProjects,
    OpenAbout,
    CloseWindow,
    CycleNextWindow,
    CyclePrevWindow,
    MinimizeWindow,
    MaximizeWindow,
    RestoreWindows,
    ToggleTheme,
    CopyTranscript,
}

impl Action {
    /// Display order for the about window.
    pub const ALL: [Action; 12] = [
        Action::NewTerminal,
        Action::OpenProjects,
        Action::OpenAbout,
        Action::CloseWindow,
        Action::CycleNextWindow,
        Action::CyclePrevWindow,
        Action::MinimizeWindow,
        Action::MaximizeWindow,
        Action::RestoreWindows,
        Action::ToggleTheme,
        Action::CopyTranscript,
        Action::Quit,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::NewTerminal => "New terminal",
            Action::OpenProjects => "Open projects",
            Action::OpenAbout => "Open about",
            Action::CloseWindow => "Close window",
            Action::CycleNextWindow => "Cycle next window",
            Action::CyclePrevWindow => "Cycle previous window",
            Action::MinimizeWindow => "Minimize window",
            Action::MaximizeWindow => "Maximize / restore window",
            Action::RestoreWindows => "Restore minimized windows",
            Action::ToggleTheme => "Toggle theme",
            Action::CopyTranscript => "Copy terminal transcript",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "BackTab".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let ctrl = |c| KeyCombo::new(KeyCode::Char(c), KeyModifiers::CONTROL);
        let f = |n| KeyCombo::new(KeyCode::F(n), KeyModifiers::NONE);
        let mut kb = Self::new();
        kb.add(Quit, ctrl('q'));
        kb.add(NewTerminal, ctrl('n'));
        kb.add(OpenProjects, ctrl('p'));
        kb.add(OpenAbout, f(1));
        kb.add(CloseWindow, ctrl('w'));
        kb.add(CycleNextWindow, f(2));
        kb.add(
            CyclePrevWindow,
            KeyCombo::new(KeyCode::F(2), KeyModifiers::SHIFT),
        );
        kb.add(MinimizeWindow, f(3));
        kb.add(MaximizeWindow, f(4));
        kb.add(RestoreWindows, f(5));
        kb.add(ToggleTheme, f(6));
        kb.add(CopyTranscript, ctrl('y'));
        kb
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.map
            .get(&action)
            .is_some_and(|list| list.iter().any(|c| c.matches(key)))
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        Action::ALL
            .into_iter()
            .find(|action| self.matches(*action, key))
    }

    /// Return the display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }

    /// `(action, keys)` pairs in display order.
    pub fn help_entries(&self) -> Vec<(Action, String)> {
        Action::ALL
            .into_iter()
            .filter_map(|action| {
                let combos = self.combos_for(action);
                (!combos.is_empty()).then(|| (action, combos.join(", ")))
            })
            .collect()
    }
}
