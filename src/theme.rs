use std::fmt;
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};

use crate::terminal::{LineKind, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    pub fn toggled(self) -> Self {
        match self {
            ThemeKind::Dark => ThemeKind::Light,
            ThemeKind::Light => ThemeKind::Dark,
        }
    }

    pub fn palette(self) -> Theme {
        match self {
            ThemeKind::Dark => Theme::dark(),
            ThemeKind::Light => Theme::light(),
        }
    }
}

impl fmt::Display for ThemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ThemeKind::Dark => "dark",
            ThemeKind::Light => "light",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTheme(pub String);

impl fmt::Display for UnknownTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme '{}'", self.0)
    }
}

impl FromStr for ThemeKind {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ThemeKind::Dark),
            "light" => Ok(ThemeKind::Light),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}

/// Colors for every piece of desktop chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub desktop_bg: Color,
    pub menu_bg: Color,
    pub menu_fg: Color,
    pub dock_bg: Color,
    pub dock_fg: Color,
    pub dock_active_bg: Color,
    pub dock_active_fg: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub header_inactive_bg: Color,
    pub border: Color,
    pub window_bg: Color,
    pub text: Color,
    pub muted: Color,
    pub error: Color,
    pub success: Color,
    pub prompt: Color,
    pub accent: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            desktop_bg: Color::Rgb(24, 26, 33),
            menu_bg: Color::DarkGray,
            menu_fg: Color::White,
            dock_bg: Color::DarkGray,
            dock_fg: Color::White,
            dock_active_bg: Color::Gray,
            dock_active_fg: Color::Black,
            header_bg: Color::Blue,
            header_fg: Color::White,
            header_inactive_bg: Color::DarkGray,
            border: Color::DarkGray,
            window_bg: Color::Black,
            text: Color::White,
            muted: Color::Gray,
            error: Color::LightRed,
            success: Color::LightGreen,
            prompt: Color::LightCyan,
            accent: Color::Rgb(255, 165, 0),
        }
    }

    pub fn light() -> Self {
        Self {
            desktop_bg: Color::Rgb(222, 226, 232),
            menu_bg: Color::Gray,
            menu_fg: Color::Black,
            dock_bg: Color::Gray,
            dock_fg: Color::Black,
            dock_active_bg: Color::DarkGray,
            dock_active_fg: Color::White,
            header_bg: Color::Rgb(200, 100, 0),
            header_fg: Color::White,
            header_inactive_bg: Color::Gray,
            border: Color::Gray,
            window_bg: Color::White,
            text: Color::Black,
            muted: Color::DarkGray,
            error: Color::Red,
            success: Color::Green,
            prompt: Color::Blue,
            accent: Color::Rgb(200, 100, 0),
        }
    }

    pub fn header(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .bg(self.header_bg)
                .fg(self.header_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .bg(self.header_inactive_bg)
                .fg(self.header_fg)
        }
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border).bg(self.window_bg)
    }

    pub fn body(&self) -> Style {
        Style::default().fg(self.text).bg(self.window_bg)
    }

    pub fn line(&self, kind: LineKind) -> Style {
        let fg = match kind {
            LineKind::Input => self.prompt,
            LineKind::Output => self.text,
            LineKind::Error => self.error,
            LineKind::Success => self.success,
        };
        Style::default().fg(fg).bg(self.window_bg)
    }

    pub fn link(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.window_bg)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn status(&self, status: Status) -> Color {
        match status {
            Status::Idle => self.muted,
            Status::Processing => self.accent,
            Status::Error => self.error,
            Status::Success => self.success,
            Status::Panic => Color::Magenta,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
