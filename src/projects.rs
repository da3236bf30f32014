//! Read-only project catalogue consumed by the `projects`, `ls` and `cat`
//! shell commands and by the projects viewer window.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    pub github_url: String,
    #[serde(default)]
    pub live_url: Option<String>,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        tech_stack: &[&str],
        github_url: impl Into<String>,
        live_url: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tech_stack: tech_stack.iter().map(|s| s.to_string()).collect(),
            github_url: github_url.into(),
            live_url: live_url.map(str::to_string),
        }
    }

    /// Tech stack rendered as a comma separated list.
    pub fn stack_label(&self) -> String {
        self.tech_stack.join(", ")
    }
}

/// Supplies the ordered project list.
pub trait ProjectSource: std::fmt::Debug {
    fn projects(&self) -> &[Project];

    /// First project whose name contains `query`, ignoring case.
    fn find(&self, query: &str) -> Option<&Project> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.projects()
            .iter()
            .find(|p| p.name.to_lowercase().contains(&needle))
    }
}

/// A fixed in-memory list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticProjects {
    projects: Vec<Project>,
}

impl StaticProjects {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// Sample catalogue used when no config file provides one.
    pub fn builtin() -> Self {
        Self::new(vec![
            Project::new(
                "Weather Dashboard",
                "Forecasts and radar maps pulled from public weather APIs.",
                &["TypeScript", "React", "Chart.js"],
                "https://github.com/jzombie/weather-dashboard",
                Some("https://weather.example.com"),
            ),
            Project::new(
                "term-wm",
                "A window manager for terminal shells with floating and tiled layouts.",
                &["Rust", "ratatui", "crossterm"],
                "https://github.com/jzombie/term-wm",
                None,
            ),
            Project::new(
                "Markdown Notes",
                "Offline-first note taking with full text search.",
                &["Rust", "SQLite", "Tauri"],
                "https://github.com/jzombie/markdown-notes",
                None,
            ),
        ])
    }
}

impl ProjectSource for StaticProjects {
    fn projects(&self) -> &[Project] {
        &self.projects
    }
}
