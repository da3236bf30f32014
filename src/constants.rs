//! Shared crate-wide constants.

use std::time::Duration;

/// Number of cascade steps before new windows wrap back to the first slot.
pub const CASCADE_WRAP: u32 = 10;

/// Delay between dispatching a command and showing its outcome mood.
///
/// The status signal is cosmetic; only "eventually idle" is guaranteed.
pub const OUTCOME_DELAY: Duration = Duration::from_millis(500);

/// Delay between showing the outcome mood and settling back to idle.
pub const IDLE_DELAY: Duration = Duration::from_millis(1500);

/// How long the panic mood is held after a dangerous command is refused.
pub const PANIC_RESET_DELAY: Duration = Duration::from_millis(3000);

/// Token that marks a command as elevated.
pub const ELEVATION_PREFIX: &str = "sudo";

/// Virtual home directory shorthand used by the simulated shell.
pub const HOME: &str = "~";

/// Trash-like directory recognized by `ls` and `cat`.
pub const TRASH_DIR: &str = "~/Trash";

/// Projects-like directory recognized by `ls`.
pub const PROJECTS_DIR: &str = "~/Projects";

/// File that only exists inside the trash directory.
pub const TRASH_FILE: &str = "Windows11.iso";

/// Window type tag for simulated shell windows.
pub const APP_TERMINAL: &str = "terminal";

/// Window type tag for the projects viewer.
pub const APP_PROJECTS: &str = "projects";

/// Window type tag for the about/readme viewer.
pub const APP_ABOUT: &str = "about";

/// How long a desktop notice stays in the menu bar.
pub const NOTICE_DURATION: Duration = Duration::from_millis(3000);

/// Input poll timeout; also the idle tick period.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);
