//! Simulated shell session: line buffer, history, virtual cwd and a cosmetic
//! status signal.
//!
//! The session never performs side effects itself. Commands that want the
//! host to act (open a URL, open a window, log out) queue an [`Effect`] which
//! the front end drains with [`TerminalSession::take_effects`].

pub mod commands;
pub mod completion;
pub mod path;

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Local};
use serde::Deserialize;

pub use commands::{Invocation, Outcome};
pub use completion::{complete, suggest};

use crate::constants::{ELEVATION_PREFIX, HOME, IDLE_DELAY, OUTCOME_DELAY, PANIC_RESET_DELAY};
use crate::projects::ProjectSource;

/// Literal inputs refused before dispatch. Input is compared lowercased,
/// with whitespace runs collapsed.
const DANGEROUS: &[&str] = &[
    "rm -rf /",
    "rm -rf /*",
    "sudo rm -rf /",
    "sudo rm -rf /*",
    ":(){ :|:& };:",
    ":(){ :|: & };:",
    ":(){:|:&};:",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Input,
    Output,
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermLine {
    pub kind: LineKind,
    pub text: String,
    pub created_at: DateTime<Local>,
}

/// Mood shown by the status indicator. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Processing,
    Error,
    Success,
    Panic,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Idle => "idle",
            Status::Processing => "processing",
            Status::Error => "error",
            Status::Success => "success",
            Status::Panic => "panic",
        };
        f.write_str(s)
    }
}

impl From<Outcome> for Status {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => Status::Success,
            Outcome::Error => Status::Error,
        }
    }
}

/// Host-side action requested by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenUrl(String),
    OpenWindow(String),
    Logout,
}

/// Personal links used by `open`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Links {
    pub resume: String,
    pub email: String,
    pub github: String,
}

impl Default for Links {
    fn default() -> Self {
        Self {
            resume: "https://jzombie.github.io/resume.pdf".to_string(),
            email: "hello@zenosmosis.com".to_string(),
            github: "https://github.com/jzombie".to_string(),
        }
    }
}

/// Identity shown in the prompt and by `whoami` / `hostname`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProfile {
    pub username: String,
    pub hostname: String,
    pub links: Links,
}

impl Default for SessionProfile {
    fn default() -> Self {
        Self {
            username: "guest".to_string(),
            hostname: "folio".to_string(),
            links: Links::default(),
        }
    }
}

#[derive(Debug)]
pub struct TerminalSession {
    profile: SessionProfile,
    projects: Arc<dyn ProjectSource>,
    lines: Vec<TermLine>,
    history: Vec<String>,
    history_cursor: Option<usize>,
    input: String,
    cwd: String,
    status: Status,
    pending: VecDeque<(Instant, Status)>,
    effects: Vec<Effect>,
}

impl TerminalSession {
    pub fn new(profile: SessionProfile, projects: Arc<dyn ProjectSource>) -> Self {
        Self {
            profile,
            projects,
            lines: Vec::new(),
            history: Vec::new(),
            history_cursor: None,
            input: String::new(),
            cwd: HOME.to_string(),
            status: Status::Idle,
            pending: VecDeque::new(),
            effects: Vec::new(),
        }
    }

    pub fn profile(&self) -> &SessionProfile {
        &self.profile
    }

    pub fn project_source(&self) -> Arc<dyn ProjectSource> {
        Arc::clone(&self.projects)
    }

    pub fn lines(&self) -> &[TermLine] {
        &self.lines
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// `None` while editing live input, otherwise the distance from the
    /// newest history entry.
    pub fn history_cursor(&self) -> Option<usize> {
        self.history_cursor
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub(crate) fn set_cwd(&mut self, cwd: String) {
        tracing::trace!(cwd = %cwd, "cwd changed");
        self.cwd = cwd;
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    pub fn insert_char(&mut self, ch: char) {
        self.input.push(ch);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// `user@host:cwd$`
    pub fn prompt(&self) -> String {
        format!(
            "{}@{}:{}$",
            self.profile.username, self.profile.hostname, self.cwd
        )
    }

    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Plain-text transcript of the line buffer.
    pub fn transcript(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn push(&mut self, kind: LineKind, text: impl Into<String>) {
        self.lines.push(TermLine {
            kind,
            text: text.into(),
            created_at: Local::now(),
        });
    }

    pub(crate) fn output(&mut self, text: impl Into<String>) {
        self.push(LineKind::Output, text);
    }

    pub(crate) fn error(&mut self, text: impl Into<String>) {
        self.push(LineKind::Error, text);
    }

    pub(crate) fn success(&mut self, text: impl Into<String>) {
        self.push(LineKind::Success, text);
    }

    pub(crate) fn emit(&mut self, effect: Effect) {
        tracing::debug!(?effect, "effect requested");
        self.effects.push(effect);
    }

    pub(crate) fn clear_lines(&mut self) {
        self.lines.clear();
    }

    /// Submit the live input buffer.
    pub fn submit_input(&mut self) {
        let line = std::mem::take(&mut self.input);
        self.submit(&line);
    }

    pub fn submit(&mut self, raw: &str) {
        self.submit_at(raw, Instant::now());
    }

    /// Run one line through the dispatcher, scheduling status transitions
    /// relative to `now`. Pending transitions from an earlier submit are
    /// replaced.
    pub fn submit_at(&mut self, raw: &str, now: Instant) {
        let input = raw.trim();
        let echo = if input.is_empty() {
            self.prompt()
        } else {
            format!("{} {}", self.prompt(), input)
        };
        self.push(LineKind::Input, echo);
        self.pending.clear();

        if input.is_empty() {
            self.status = Status::Idle;
            return;
        }

        if self.history.last().map(String::as_str) != Some(input) {
            self.history.push(input.to_string());
        }
        self.history_cursor = None;
        self.status = Status::Processing;

        if is_dangerous(input) {
            tracing::warn!(command = %input, "refused destructive command");
            self.error("Permission denied: this system refuses to destroy itself.");
            self.output("Nice try. Everything is still here.");
            self.status = Status::Panic;
            self.pending.push_back((now + PANIC_RESET_DELAY, Status::Idle));
            return;
        }

        let tokens: Vec<&str> = input.split_whitespace().collect();
        let (elevated, tokens) = match tokens.split_first() {
            Some((first, rest)) if first.eq_ignore_ascii_case(ELEVATION_PREFIX) => {
                if rest.is_empty() {
                    self.error(format!("usage: {ELEVATION_PREFIX} <command>"));
                    self.schedule(Outcome::Error, now);
                    return;
                }
                (true, rest)
            }
            _ => (false, tokens.as_slice()),
        };
        let Some((name, args)) = tokens.split_first() else {
            return;
        };

        let outcome = match commands::lookup(name) {
            Some(spec) => {
                tracing::debug!(command = spec.name, elevated, "dispatching command");
                let invocation = Invocation {
                    name: spec.name,
                    args,
                    elevated,
                };
                (spec.handler)(self, &invocation)
            }
            None => self.command_not_found(name),
        };
        self.schedule(outcome, now);
    }

    fn command_not_found(&mut self, name: &str) -> Outcome {
        tracing::debug!(command = %name, "command not found");
        self.error(format!("{name}: command not found"));
        if let Some(hint) = suggest(name) {
            self.output(format!("Did you mean '{hint}'?"));
        }
        self.output("Type 'help' to see available commands.");
        Outcome::Error
    }

    fn schedule(&mut self, outcome: Outcome, now: Instant) {
        let shown = now + OUTCOME_DELAY;
        self.pending.push_back((shown, outcome.into()));
        self.pending.push_back((shown + IDLE_DELAY, Status::Idle));
    }

    /// Apply every status transition due at `now`. Returns whether the
    /// status changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let before = self.status;
        while let Some(&(at, status)) = self.pending.front() {
            if at > now {
                break;
            }
            self.status = status;
            self.pending.pop_front();
        }
        before != self.status
    }

    /// Next time [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.front().map(|(at, _)| *at)
    }

    /// Step back through history, oldest last.
    pub fn history_up(&mut self) {
        let Some(last) = self.history.len().checked_sub(1) else {
            return;
        };
        let cursor = match self.history_cursor {
            None => 0,
            Some(c) => (c + 1).min(last),
        };
        self.history_cursor = Some(cursor);
        self.input = self.history[last - cursor].clone();
    }

    /// Step forward through history, ending at an empty live input.
    pub fn history_down(&mut self) {
        match self.history_cursor {
            None => {}
            Some(0) => {
                self.history_cursor = None;
                self.input.clear();
            }
            Some(c) => {
                let cursor = c - 1;
                self.history_cursor = Some(cursor);
                let last = self.history.len().saturating_sub(1);
                self.input = self.history[last - cursor].clone();
            }
        }
    }

    /// Tab completion over the live input's command token. A unique match
    /// replaces the input; several matches are listed as an output line.
    pub fn complete_input(&mut self) -> bool {
        if self.input.trim_start().contains(char::is_whitespace) {
            return false;
        }
        let matches = complete(&self.input);
        match matches.as_slice() {
            [] => false,
            [only] => {
                self.input = format!("{only} ");
                true
            }
            many => {
                self.output(many.join("  "));
                true
            }
        }
    }
}

fn is_dangerous(input: &str) -> bool {
    let collapsed = input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase();
    DANGEROUS.contains(&collapsed.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::{Project, StaticProjects};
    use std::time::Duration;

    fn session() -> TerminalSession {
        let projects = StaticProjects::new(vec![
            Project::new(
                "Weather Dashboard",
                "Live forecasts on a map.",
                &["TypeScript", "React"],
                "https://github.com/example/weather",
                Some("https://weather.example.com"),
            ),
            Project::new(
                "Chess Engine",
                "Bitboard move generation.",
                &["Rust"],
                "https://github.com/example/chess",
                None,
            ),
        ]);
        TerminalSession::new(SessionProfile::default(), Arc::new(projects))
    }

    fn texts(s: &TerminalSession, kind: LineKind) -> Vec<String> {
        s.lines()
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.text.clone())
            .collect()
    }

    #[test]
    fn empty_submit_echoes_prompt_only() {
        let mut s = session();
        s.submit("   ");
        assert_eq!(s.lines().len(), 1);
        assert_eq!(s.lines()[0].kind, LineKind::Input);
        assert_eq!(s.lines()[0].text, "guest@folio:~$");
        assert!(s.history().is_empty());
        assert_eq!(s.status(), Status::Idle);
    }

    #[test]
    fn duplicate_of_last_is_not_recorded() {
        let mut s = session();
        s.submit("whoami");
        s.submit("whoami");
        s.submit("pwd");
        s.submit("whoami");
        assert_eq!(s.history(), ["whoami", "pwd", "whoami"]);
    }

    #[test]
    fn unknown_command_reports_and_hints() {
        let mut s = session();
        s.submit("foobarbaz");
        let errors = texts(&s, LineKind::Error);
        assert_eq!(errors, ["foobarbaz: command not found"]);
        let out = texts(&s, LineKind::Output);
        assert!(out.iter().any(|l| l.contains("help")));
        assert_eq!(s.status(), Status::Processing);
    }

    #[test]
    fn unknown_command_suggests_close_match() {
        let mut s = session();
        s.submit("proj");
        let out = texts(&s, LineKind::Output);
        assert!(out.contains(&"Did you mean 'projects'?".to_string()));
    }

    #[test]
    fn command_lookup_is_case_insensitive() {
        let mut s = session();
        s.submit("WHOAMI");
        assert_eq!(texts(&s, LineKind::Output), ["guest"]);
    }

    #[test]
    fn cd_round_trip_and_pwd() {
        let mut s = session();
        s.submit("cd Projects");
        assert_eq!(s.cwd(), "~/Projects");
        s.submit("pwd");
        assert_eq!(texts(&s, LineKind::Output), ["/home/guest/Projects"]);
        s.submit("cd ..");
        assert_eq!(s.cwd(), "~");
    }

    #[test]
    fn projects_lists_every_entry_in_order() {
        let mut s = session();
        s.submit("projects");
        let out = texts(&s, LineKind::Output);
        let names: Vec<&String> = out
            .iter()
            .filter(|l| *l == "Weather Dashboard" || *l == "Chess Engine")
            .collect();
        assert_eq!(names, ["Weather Dashboard", "Chess Engine"]);
        assert!(out.iter().any(|l| l.contains("Live: https://weather.example.com")));
    }

    #[test]
    fn cat_readme_matches_substring() {
        let mut s = session();
        s.submit("cat readme weather");
        let out = texts(&s, LineKind::Output).join("\n");
        assert!(out.contains("Live forecasts on a map."));
        assert!(out.contains("https://github.com/example/weather"));

        s.submit("cat project-readme CHESS engine");
        let out = texts(&s, LineKind::Output).join("\n");
        assert!(out.contains("Bitboard move generation."));
    }

    #[test]
    fn cat_readme_miss_names_query() {
        let mut s = session();
        s.submit("cat readme nonexistent");
        let errors = texts(&s, LineKind::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("nonexistent"));
        let out = texts(&s, LineKind::Output);
        assert!(out.iter().any(|l| l.contains("projects")));
    }

    #[test]
    fn trash_iso_only_in_trash() {
        let mut s = session();
        s.submit("cat Windows11.iso");
        assert_eq!(texts(&s, LineKind::Error).len(), 1);
        s.submit("cd Trash");
        s.submit("ls");
        assert!(texts(&s, LineKind::Output).contains(&"Windows11.iso".to_string()));
        s.submit("cat windows11.iso");
        assert_eq!(texts(&s, LineKind::Error).len(), 1);
        assert!(texts(&s, LineKind::Output).iter().any(|l| l.starts_with("Size:")));
    }

    #[test]
    fn ls_projects_dir_and_placeholder() {
        let mut s = session();
        s.submit("ls ~/projects");
        let out = texts(&s, LineKind::Output);
        assert_eq!(out, ["Weather Dashboard/", "Chess Engine/"]);
        s.submit("cd /etc");
        s.submit("ls");
        let out = texts(&s, LineKind::Output);
        assert_eq!(&out[2..], [".", ".."]);
    }

    #[test]
    fn history_navigation_walks_and_clamps() {
        let mut s = session();
        for cmd in ["a", "b", "c"] {
            s.submit(cmd);
        }
        s.history_up();
        assert_eq!(s.input(), "c");
        s.history_up();
        assert_eq!(s.input(), "b");
        s.history_up();
        assert_eq!(s.input(), "a");
        s.history_up();
        assert_eq!(s.input(), "a");
        assert_eq!(s.history_cursor(), Some(2));
        s.history_down();
        s.history_down();
        s.history_down();
        assert_eq!(s.input(), "");
        assert_eq!(s.history_cursor(), None);
    }

    #[test]
    fn submit_resets_history_cursor() {
        let mut s = session();
        s.submit("echo one");
        s.history_up();
        assert_eq!(s.history_cursor(), Some(0));
        s.submit_input();
        assert_eq!(s.history_cursor(), None);
        assert_eq!(s.history(), ["echo one"]);
        assert_eq!(s.input(), "");
    }

    #[test]
    fn history_up_on_empty_history_is_noop() {
        let mut s = session();
        s.history_up();
        s.history_down();
        assert_eq!(s.history_cursor(), None);
        assert_eq!(s.input(), "");
    }

    #[test]
    fn dangerous_literal_panics_then_settles() {
        let mut s = session();
        let t0 = Instant::now();
        s.submit_at("rm   -rf   /", t0);
        assert_eq!(s.status(), Status::Panic);
        assert_eq!(texts(&s, LineKind::Error).len(), 1);
        assert!(!s.tick(t0 + Duration::from_millis(10)));
        assert!(s.tick(t0 + PANIC_RESET_DELAY));
        assert_eq!(s.status(), Status::Idle);
    }

    #[test]
    fn dangerous_literal_ignores_case() {
        let mut s = session();
        s.submit("SUDO rm -rf /");
        assert_eq!(s.status(), Status::Panic);
        assert_eq!(texts(&s, LineKind::Error).len(), 1);
    }

    #[test]
    fn uptime_reports_days_and_load() {
        let mut s = session();
        s.submit("uptime");
        let out = texts(&s, LineKind::Output);
        assert_eq!(out.len(), 1);
        let line = &out[0];
        let days: u32 = line
            .split(" up ")
            .nth(1)
            .and_then(|rest| rest.split(" days,").next())
            .and_then(|n| n.parse().ok())
            .expect("day count");
        assert!(days < 90);
        let loads: Vec<f64> = line
            .split("load average: ")
            .nth(1)
            .expect("load average")
            .split(", ")
            .map(|v| v.parse().expect("load value"))
            .collect();
        assert_eq!(loads.len(), 3);
        assert!(loads.iter().all(|l| (0.0..=2.0).contains(l)));
    }

    #[test]
    fn fork_bomb_is_refused() {
        let mut s = session();
        s.submit(":(){ :|:& };:");
        assert_eq!(s.status(), Status::Panic);
    }

    #[test]
    fn status_eventually_settles_to_idle() {
        let mut s = session();
        let t0 = Instant::now();
        s.submit_at("whoami", t0);
        assert_eq!(s.status(), Status::Processing);
        s.tick(t0 + OUTCOME_DELAY);
        assert_eq!(s.status(), Status::Success);
        s.tick(t0 + OUTCOME_DELAY + IDLE_DELAY);
        assert_eq!(s.status(), Status::Idle);
        assert!(s.next_deadline().is_none());
    }

    #[test]
    fn newer_submit_replaces_pending_timers() {
        let mut s = session();
        let t0 = Instant::now();
        s.submit_at("foobarbaz", t0);
        let t1 = t0 + Duration::from_millis(100);
        s.submit_at("whoami", t1);
        s.tick(t0 + OUTCOME_DELAY);
        assert_eq!(s.status(), Status::Processing);
        s.tick(t1 + OUTCOME_DELAY + IDLE_DELAY);
        assert_eq!(s.status(), Status::Idle);
    }

    #[test]
    fn sudo_gates_privileged_commands() {
        let mut s = session();
        s.submit("reboot");
        assert!(texts(&s, LineKind::Error)[0].contains("Permission denied"));
        s.submit("sudo reboot");
        assert_eq!(texts(&s, LineKind::Success).len(), 1);
        s.submit("dnf install htop");
        assert_eq!(texts(&s, LineKind::Error).len(), 2);
        s.submit("sudo dnf install htop");
        assert_eq!(texts(&s, LineKind::Success).len(), 2);
    }

    #[test]
    fn bare_sudo_is_a_usage_error() {
        let mut s = session();
        let t0 = Instant::now();
        s.submit_at("sudo", t0);
        assert_eq!(texts(&s, LineKind::Error), ["usage: sudo <command>"]);
        s.tick(t0 + OUTCOME_DELAY);
        assert_eq!(s.status(), Status::Error);
    }

    #[test]
    fn clear_empties_lines_but_keeps_history() {
        let mut s = session();
        s.submit("echo hi");
        s.submit("clear");
        assert!(s.lines().is_empty());
        assert_eq!(s.history(), ["echo hi", "clear"]);
    }

    #[test]
    fn echo_joins_args() {
        let mut s = session();
        s.submit("echo   hello    there");
        assert_eq!(texts(&s, LineKind::Output), ["hello there"]);
    }

    #[test]
    fn open_emits_effects() {
        let mut s = session();
        s.submit("open github");
        s.submit("open email");
        s.submit("open projects");
        s.submit("exit");
        let links = Links::default();
        assert_eq!(
            s.take_effects(),
            vec![
                Effect::OpenUrl(links.github),
                Effect::OpenUrl(format!("mailto:{}", links.email)),
                Effect::OpenWindow("projects".to_string()),
                Effect::Logout,
            ]
        );
        assert!(s.take_effects().is_empty());
        s.submit("open nowhere");
        assert!(s.take_effects().is_empty());
        assert!(texts(&s, LineKind::Error)[0].contains("nowhere"));
    }

    #[test]
    fn uname_flags() {
        let mut s = session();
        s.submit("uname");
        s.submit("uname -r");
        s.submit("uname -a");
        let out = texts(&s, LineKind::Output);
        assert_eq!(out[0], "Linux");
        assert!(out[1].contains("fc40"));
        assert!(out[2].contains("folio"));
        s.submit("uname -z");
        assert_eq!(texts(&s, LineKind::Error).len(), 1);
    }

    #[test]
    fn man_requires_topic() {
        let mut s = session();
        s.submit("man");
        assert_eq!(texts(&s, LineKind::Error).len(), 1);
        s.submit("man ls");
        let out = texts(&s, LineKind::Output).join("\n");
        assert!(out.contains("LS(1)"));
        assert!(out.contains("ls - List directory contents"));
    }

    #[test]
    fn history_command_numbers_entries() {
        let mut s = session();
        s.submit("whoami");
        s.submit("history");
        let out = texts(&s, LineKind::Output);
        assert_eq!(out[1], "    1  whoami");
        assert_eq!(out[2], "    2  history");
    }

    #[test]
    fn tab_completion_fills_or_lists() {
        let mut s = session();
        s.set_input("proj");
        assert!(s.complete_input());
        assert_eq!(s.input(), "projects ");

        s.set_input("h");
        assert!(s.complete_input());
        assert_eq!(s.input(), "h");
        assert_eq!(texts(&s, LineKind::Output), ["help  history  hostname"]);

        s.set_input("");
        assert!(!s.complete_input());
    }

    #[test]
    fn dnf_search_filters_packages() {
        let mut s = session();
        s.submit("dnf search rust");
        let out = texts(&s, LineKind::Output);
        assert!(out.iter().any(|l| l.starts_with("rust.x86_64")));
        s.submit("dnf frobnicate");
        assert!(texts(&s, LineKind::Error)[0].starts_with("usage: dnf"));
    }
}
