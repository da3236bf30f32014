use super::commands;

/// Every command name starting with `partial`, ignoring case. An empty
/// partial completes to nothing.
pub fn complete(partial: &str) -> Vec<&'static str> {
    let needle = partial.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    commands::names()
        .filter(|name| name.starts_with(&needle))
        .collect()
}

/// Closest known command for a mistyped one: prefix match first, then
/// substring match in either direction.
pub fn suggest(command: &str) -> Option<&'static str> {
    let needle = command.to_lowercase();
    if needle.is_empty() {
        return None;
    }
    if let Some(hit) = commands::names().find(|name| name.starts_with(&needle)) {
        return Some(hit);
    }
    if needle.len() >= 2
        && let Some(hit) = commands::names().find(|name| name.contains(&needle))
    {
        return Some(hit);
    }
    commands::names().find(|name| name.len() >= 3 && needle.contains(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_matches_prefix_case_insensitively() {
        assert_eq!(complete("h"), vec!["help", "history", "hostname"]);
        assert_eq!(complete("HIS"), vec!["history"]);
        assert!(complete("zzz").is_empty());
    }

    #[test]
    fn empty_partial_yields_nothing() {
        assert!(complete("").is_empty());
        assert!(complete("   ").is_empty());
    }

    #[test]
    fn suggestions() {
        assert_eq!(suggest("proj"), Some("projects"));
        assert_eq!(suggest("istor"), Some("history"));
        assert_eq!(suggest("helpme"), Some("help"));
        assert_eq!(suggest("foobarbaz"), None);
    }
}
