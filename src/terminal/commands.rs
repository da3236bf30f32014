//! Fixed command table for the simulated shell.
//!
//! Every handler shares one signature: it reads the invocation, appends lines
//! to the session and reports whether the command succeeded.

use chrono::Local;
use indoc::formatdoc;
use rand::Rng;

use super::{Effect, TerminalSession, path};
use crate::constants::{APP_PROJECTS, PROJECTS_DIR, TRASH_DIR, TRASH_FILE};
use crate::projects::Project;

/// What a handler reports back to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Error,
}

/// Arguments for a single dispatch.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub name: &'a str,
    pub args: &'a [&'a str],
    /// Set when the line carried the elevation prefix.
    pub elevated: bool,
}

impl Invocation<'_> {
    fn arg(&self, idx: usize) -> Option<&str> {
        self.args.get(idx).copied()
    }

    fn rest(&self, from: usize) -> String {
        self.args.get(from..).unwrap_or_default().join(" ")
    }
}

pub type Handler = fn(&mut TerminalSession, &Invocation<'_>) -> Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Navigation,
    Information,
    Portfolio,
    Packages,
    Session,
}

impl Category {
    const ALL: [Category; 5] = [
        Category::Navigation,
        Category::Information,
        Category::Portfolio,
        Category::Packages,
        Category::Session,
    ];

    fn label(self) -> &'static str {
        match self {
            Category::Navigation => "Navigation",
            Category::Information => "Information",
            Category::Portfolio => "Portfolio",
            Category::Packages => "Packages",
            Category::Session => "Session",
        }
    }
}

pub struct CommandSpec {
    pub name: &'static str,
    pub category: Category,
    pub summary: &'static str,
    pub handler: Handler,
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish()
    }
}

macro_rules! command {
    ($name:literal, $cat:ident, $summary:literal, $handler:path) => {
        CommandSpec {
            name: $name,
            category: Category::$cat,
            summary: $summary,
            handler: $handler,
        }
    };
}

/// Every command, in alphabetical order.
pub static COMMANDS: &[CommandSpec] = &[
    command!("cat", Portfolio, "Show a project readme or a file", cat),
    command!("cd", Navigation, "Change the current directory", cd),
    command!("clear", Session, "Clear the terminal screen", clear),
    command!("date", Information, "Show the current date and time", date),
    command!("dnf", Packages, "Search and install packages", dnf),
    command!("echo", Information, "Print text to the terminal", echo),
    command!("exit", Session, "Log out of this shell", exit),
    command!("help", Information, "List available commands", help),
    command!("history", Information, "Show previously entered commands", history),
    command!("hostname", Information, "Show the system hostname", hostname),
    command!("ls", Navigation, "List directory contents", ls),
    command!("man", Information, "Show the manual page for a command", man),
    command!("open", Portfolio, "Open resume, projects, contact or github", open),
    command!("projects", Portfolio, "List portfolio projects", projects),
    command!("pwd", Navigation, "Print the working directory", pwd),
    command!("reboot", Session, "Restart the system (requires sudo)", reboot),
    command!("shutdown", Session, "Power off the system (requires sudo)", shutdown),
    command!("uname", Information, "Show system information", uname),
    command!("uptime", Information, "Show how long the system has been up", uptime),
    command!("whoami", Information, "Show the current user", whoami),
];

/// Case-insensitive table lookup.
pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

pub fn names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|c| c.name)
}

fn help(session: &mut TerminalSession, _inv: &Invocation<'_>) -> Outcome {
    session.output("Available commands:");
    for category in Category::ALL {
        session.output("");
        session.output(format!("{}:", category.label()));
        for cmd in COMMANDS.iter().filter(|c| c.category == category) {
            session.output(format!("  {:<10}{}", cmd.name, cmd.summary));
        }
    }
    session.output("");
    session.output("Prefix a command with 'sudo' to run it with elevated privileges.");
    Outcome::Success
}

fn clear(session: &mut TerminalSession, _inv: &Invocation<'_>) -> Outcome {
    session.clear_lines();
    Outcome::Success
}

fn echo(session: &mut TerminalSession, inv: &Invocation<'_>) -> Outcome {
    session.output(inv.rest(0));
    Outcome::Success
}

fn whoami(session: &mut TerminalSession, _inv: &Invocation<'_>) -> Outcome {
    let user = session.profile().username.clone();
    session.output(user);
    Outcome::Success
}

fn hostname(session: &mut TerminalSession, _inv: &Invocation<'_>) -> Outcome {
    let host = session.profile().hostname.clone();
    session.output(host);
    Outcome::Success
}

fn pwd(session: &mut TerminalSession, _inv: &Invocation<'_>) -> Outcome {
    let expanded = path::expand(session.cwd(), &session.profile().username);
    session.output(expanded);
    Outcome::Success
}

fn cd(session: &mut TerminalSession, inv: &Invocation<'_>) -> Outcome {
    let next = path::resolve(session.cwd(), inv.arg(0));
    session.set_cwd(next);
    Outcome::Success
}

fn ls(session: &mut TerminalSession, inv: &Invocation<'_>) -> Outcome {
    let dir = match inv.arg(0) {
        Some(target) => path::resolve(session.cwd(), Some(target)),
        None => session.cwd().to_string(),
    };
    if path::same_dir(&dir, "~") {
        session.output("Desktop/  Documents/  Projects/  Trash/  resume.pdf");
    } else if path::same_dir(&dir, TRASH_DIR) {
        session.output(TRASH_FILE);
    } else if path::same_dir(&dir, PROJECTS_DIR) {
        let source = session.project_source();
        for project in source.projects() {
            session.output(format!("{}/", project.name));
        }
    } else {
        session.output(".");
        session.output("..");
    }
    Outcome::Success
}

fn date(session: &mut TerminalSession, _inv: &Invocation<'_>) -> Outcome {
    session.output(Local::now().format("%a %b %e %H:%M:%S %Z %Y").to_string());
    Outcome::Success
}

fn uptime(session: &mut TerminalSession, _inv: &Invocation<'_>) -> Outcome {
    let mut rng = rand::rng();
    let days = rng.random_range(0..90u32);
    let hours = rng.random_range(0..24u32);
    let minutes = rng.random_range(0..60u32);
    let loads: [f64; 3] = std::array::from_fn(|_| rng.random_range(0.0..2.0));
    session.output(format!(
        " {} up {} days, {:>2}:{:02},  1 user,  load average: {:.2}, {:.2}, {:.2}",
        Local::now().format("%H:%M:%S"),
        days,
        hours,
        minutes,
        loads[0],
        loads[1],
        loads[2],
    ));
    Outcome::Success
}

const KERNEL_RELEASE: &str = "6.8.9-300.fc40.x86_64";

fn uname(session: &mut TerminalSession, inv: &Invocation<'_>) -> Outcome {
    match inv.arg(0) {
        None | Some("-s") => session.output("Linux"),
        Some("-r") => session.output(KERNEL_RELEASE),
        Some("-a") => {
            let host = session.profile().hostname.clone();
            session.output(format!(
                "Linux {host} {KERNEL_RELEASE} #1 SMP PREEMPT_DYNAMIC x86_64 GNU/Linux"
            ));
        }
        Some(flag) => {
            session.error(format!("uname: invalid option '{flag}'"));
            session.output("usage: uname [-a|-r|-s]");
            return Outcome::Error;
        }
    }
    Outcome::Success
}

fn history(session: &mut TerminalSession, _inv: &Invocation<'_>) -> Outcome {
    let entries: Vec<String> = session
        .history()
        .iter()
        .enumerate()
        .map(|(idx, cmd)| format!("{:>5}  {}", idx + 1, cmd))
        .collect();
    if entries.is_empty() {
        session.output("No commands in history.");
    }
    for line in entries {
        session.output(line);
    }
    Outcome::Success
}

fn man(session: &mut TerminalSession, inv: &Invocation<'_>) -> Outcome {
    let Some(topic) = inv.arg(0) else {
        session.error("What manual page do you want?");
        session.output("usage: man <command>");
        return Outcome::Error;
    };
    let summary = lookup(topic)
        .map(|c| c.summary)
        .unwrap_or("no summary available");
    let header = format!("{}(1)", topic.to_uppercase());
    let page = formatdoc! {"
        {header:<24}User Commands{header:>24}

        NAME
            {topic} - {summary}

        SYNOPSIS
            {topic} [OPTION]... [ARGUMENT]...

        DESCRIPTION
            This manual page documents the portfolio shell version of {topic}.
            Behaviour is simulated and has no effect outside this window.

        SEE ALSO
            help(1)
    ",
        header = header,
        topic = topic,
        summary = summary,
    };
    for line in page.lines() {
        session.output(line);
    }
    Outcome::Success
}

const PACKAGES: &[(&str, &str)] = &[
    ("neovim.x86_64", "Vim-fork focused on extensibility and agility"),
    ("htop.x86_64", "Interactive process viewer"),
    ("ripgrep.x86_64", "Line oriented search tool"),
    ("rust.x86_64", "The Rust Programming Language"),
    ("cargo.x86_64", "Rust's package manager and build tool"),
    ("nodejs.x86_64", "JavaScript runtime"),
    ("python3.x86_64", "Python 3 interpreter"),
    ("tmux.x86_64", "A terminal multiplexer"),
];

const SUPERUSER_ERROR: &str =
    "Error: This command has to be run with superuser privileges (under the root user on most systems).";

fn dnf(session: &mut TerminalSession, inv: &Invocation<'_>) -> Outcome {
    let sub = inv.arg(0).map(str::to_lowercase);
    match sub.as_deref() {
        Some("search") => {
            let term = inv.rest(1).to_lowercase();
            if term.is_empty() {
                session.error("Error: Need to pass a search term");
                return Outcome::Error;
            }
            session.output("Last metadata expiration check: 0:42:17 ago.");
            session.output(format!("===== Name Matched: {term} ====="));
            let hits: Vec<String> = PACKAGES
                .iter()
                .filter(|(name, desc)| {
                    name.contains(&term) || desc.to_lowercase().contains(&term)
                })
                .map(|(name, desc)| format!("{name} : {desc}"))
                .collect();
            if hits.is_empty() {
                session.output(format!("No matches found for '{term}'."));
            }
            for hit in hits {
                session.output(hit);
            }
            Outcome::Success
        }
        Some("install") => {
            if !inv.elevated {
                session.error(SUPERUSER_ERROR);
                return Outcome::Error;
            }
            let pkgs = inv.rest(1);
            if pkgs.is_empty() {
                session.error("Error: Need to pass a list of pkgs to install");
                return Outcome::Error;
            }
            session.output("Dependencies resolved.");
            session.output(format!("Installing: {pkgs}"));
            session.success("Complete!");
            Outcome::Success
        }
        Some("update") | Some("upgrade") => {
            if !inv.elevated {
                session.error(SUPERUSER_ERROR);
                return Outcome::Error;
            }
            session.output("Dependencies resolved.");
            session.output("Nothing to do.");
            session.success("Complete!");
            Outcome::Success
        }
        _ => {
            session.error("usage: dnf <search|install|update|upgrade> [args...]");
            Outcome::Error
        }
    }
}

fn push_project_block(session: &mut TerminalSession, project: &Project) {
    session.output(project.name.clone());
    session.output(format!("  {}", project.description));
    if !project.tech_stack.is_empty() {
        session.output(format!("  Tech: {}", project.stack_label()));
    }
    session.output(format!("  GitHub: {}", project.github_url));
    if let Some(live) = &project.live_url {
        session.output(format!("  Live: {live}"));
    }
}

fn projects(session: &mut TerminalSession, _inv: &Invocation<'_>) -> Outcome {
    let source = session.project_source();
    let list = source.projects();
    if list.is_empty() {
        session.output("No projects found.");
        return Outcome::Success;
    }
    for (idx, project) in list.iter().enumerate() {
        if idx > 0 {
            session.output("");
        }
        push_project_block(session, project);
    }
    Outcome::Success
}

fn cat(session: &mut TerminalSession, inv: &Invocation<'_>) -> Outcome {
    let Some(target) = inv.arg(0) else {
        session.error("cat: missing file operand");
        return Outcome::Error;
    };
    if target.eq_ignore_ascii_case("readme") || target.eq_ignore_ascii_case("project-readme") {
        let query = inv.rest(1);
        if query.is_empty() {
            session.error(format!("usage: cat {} <project-name>", target.to_lowercase()));
            return Outcome::Error;
        }
        let source = session.project_source();
        let Some(project) = source.find(&query) else {
            session.error(format!("cat: {query}: no such project"));
            session.output("Run 'projects' to see the available projects.");
            return Outcome::Error;
        };
        let links = match &project.live_url {
            Some(live) => format!("GitHub: {}\nLive:   {live}", project.github_url),
            None => format!("GitHub: {}", project.github_url),
        };
        let block = formatdoc! {"
            # {name}

            {description}

            ## Tech Stack
            {stack}

            ## Links
            {links}
        ",
            name = project.name,
            description = project.description,
            stack = project.stack_label(),
            links = links,
        };
        for line in block.lines() {
            session.output(line);
        }
        return Outcome::Success;
    }
    if target.eq_ignore_ascii_case(TRASH_FILE) && path::same_dir(session.cwd(), TRASH_DIR) {
        let info = formatdoc! {"
            File: {file}
            Size: 5.4G
            Type: ISO 9660 CD-ROM filesystem data 'CCCOMA_X64FRE_EN-US_DV9'
            Note: Moved to trash. It can stay there.
        ",
            file = TRASH_FILE,
        };
        for line in info.lines() {
            session.output(line);
        }
        return Outcome::Success;
    }
    session.error(format!("cat: {target}: No such file or directory"));
    Outcome::Error
}

fn open(session: &mut TerminalSession, inv: &Invocation<'_>) -> Outcome {
    let Some(item) = inv.arg(0) else {
        session.error("usage: open <resume|projects|contact|email|github>");
        return Outcome::Error;
    };
    let links = session.profile().links.clone();
    match item.to_lowercase().as_str() {
        "resume" => {
            session.success("Opening resume...");
            session.emit(Effect::OpenUrl(links.resume));
        }
        "projects" => {
            session.success("Opening projects...");
            session.emit(Effect::OpenWindow(APP_PROJECTS.to_string()));
        }
        "contact" | "email" => {
            session.success(format!("Opening mail client for {}...", links.email));
            session.emit(Effect::OpenUrl(format!("mailto:{}", links.email)));
        }
        "github" => {
            session.success("Opening GitHub profile...");
            session.emit(Effect::OpenUrl(links.github));
        }
        other => {
            session.error(format!("open: unknown item '{other}'"));
            session.output("Available items: resume, projects, contact, email, github");
            return Outcome::Error;
        }
    }
    Outcome::Success
}

fn power(session: &mut TerminalSession, inv: &Invocation<'_>, action: &str) -> Outcome {
    if !inv.elevated {
        session.error(format!(
            "{}: Permission denied (try 'sudo {}')",
            inv.name, inv.name
        ));
        return Outcome::Error;
    }
    session.success(format!("System {action} initiated..."));
    session.output("Just kidding. Nothing actually happens here.");
    Outcome::Success
}

fn reboot(session: &mut TerminalSession, inv: &Invocation<'_>) -> Outcome {
    power(session, inv, "reboot")
}

fn shutdown(session: &mut TerminalSession, inv: &Invocation<'_>) -> Outcome {
    power(session, inv, "shutdown")
}

fn exit(session: &mut TerminalSession, _inv: &Invocation<'_>) -> Outcome {
    session.output("logout");
    session.output("Thanks for stopping by!");
    session.emit(Effect::Logout);
    Outcome::Success
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_unique() {
        let names: Vec<&str> = names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(lookup("HeLp").map(|c| c.name), Some("help"));
        assert!(lookup("foobarbaz").is_none());
    }

    #[test]
    fn every_category_has_commands() {
        for category in Category::ALL {
            assert!(COMMANDS.iter().any(|c| c.category == category));
        }
    }
}
