//! Virtual path rules for the simulated shell. Nothing here touches a real
//! filesystem.

use crate::constants::HOME;

/// Resolve a `cd` target against `cwd`.
///
/// No target or `~` goes home, `..` pops one segment (no-op at home or
/// root), an absolute target replaces `cwd`, anything else is appended.
pub fn resolve(cwd: &str, target: Option<&str>) -> String {
    let Some(raw) = target else {
        return HOME.to_string();
    };
    let target = trim_trailing_slash(raw);
    match target {
        "" | HOME => HOME.to_string(),
        ".." => parent(cwd),
        "/" => "/".to_string(),
        t if t.starts_with('/') || t.starts_with("~/") => t.to_string(),
        t if cwd == "/" => format!("/{t}"),
        t => format!("{cwd}/{t}"),
    }
}

fn trim_trailing_slash(value: &str) -> &str {
    let trimmed = value.trim_end_matches('/');
    if trimmed.is_empty() && value.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}

fn parent(cwd: &str) -> String {
    if cwd == HOME || cwd == "/" {
        return cwd.to_string();
    }
    match cwd.rsplit_once('/') {
        Some(("", _)) => "/".to_string(),
        Some((head, _)) => head.to_string(),
        None => cwd.to_string(),
    }
}

/// Absolute form of `cwd` with the home tilde expanded.
pub fn expand(cwd: &str, username: &str) -> String {
    let home = format!("/home/{username}");
    if cwd == HOME {
        home
    } else if let Some(rest) = cwd.strip_prefix("~/") {
        format!("{home}/{rest}")
    } else {
        cwd.to_string()
    }
}

/// Case-insensitive comparison of two virtual paths.
pub fn same_dir(a: &str, b: &str) -> bool {
    trim_trailing_slash(a).eq_ignore_ascii_case(trim_trailing_slash(b))
}
