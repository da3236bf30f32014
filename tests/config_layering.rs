use std::fs;

use clap::Parser;
use folio_wm::config::{Cli, ConfigError, ShellConfig};
use folio_wm::projects::ProjectSource;

const FILE: &str = r#"
[shell]
username = "ada"
hostname = "engine"

[links]
github = "https://github.com/ada"

[[projects]]
name = "Analytical Engine"
description = "Mechanical general-purpose computer."
tech_stack = ["Brass", "Steam"]
github_url = "https://github.com/ada/engine"
"#;

#[test]
fn flags_override_file_which_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("folio.toml");
    fs::write(&path, FILE).unwrap();

    let cli = Cli::parse_from([
        "folio-wm",
        "--config",
        path.to_str().unwrap(),
        "--host",
        "babbage",
        "--no-browser",
    ]);
    let config = ShellConfig::from_cli(&cli).unwrap();
    assert_eq!(config.profile.username, "ada");
    assert_eq!(config.profile.hostname, "babbage");
    assert_eq!(config.profile.links.github, "https://github.com/ada");
    assert!(!config.open_browser);
    let projects = config.projects.projects();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].tech_stack, ["Brass", "Steam"]);
    assert_eq!(projects[0].live_url, None);
}

#[test]
fn no_config_flag_uses_builtin_defaults() {
    let cli = Cli::parse_from(["folio-wm", "-v"]);
    let config = ShellConfig::from_cli(&cli).unwrap();
    assert_eq!(config.profile.username, "guest");
    assert!(config.verbose);
    assert!(config.open_browser);
    assert!(!config.projects.projects().is_empty());
}

#[test]
fn missing_and_malformed_files_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = Cli::parse_from([
        "folio-wm",
        "--config",
        dir.path().join("absent.toml").to_str().unwrap(),
    ]);
    assert!(matches!(
        ShellConfig::from_cli(&missing),
        Err(ConfigError::NotFound(_))
    ));

    let bad = dir.path().join("bad.toml");
    fs::write(&bad, "[shell\nusername = 3").unwrap();
    let cli = Cli::parse_from(["folio-wm", "--config", bad.to_str().unwrap()]);
    assert!(matches!(
        ShellConfig::from_cli(&cli),
        Err(ConfigError::Parse { .. })
    ));
}
