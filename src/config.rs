//! Command line and config file handling.
//!
//! Later sources override earlier ones:
//! 1. built-in defaults
//! 2. the TOML file passed with `--config`
//! 3. command line flags

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

use crate::projects::{Project, StaticProjects};
use crate::terminal::{Links, SessionProfile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "folio-wm",
    version,
    about = "A portfolio desktop with floating windows and a simulated shell"
)]
pub struct Cli {
    /// TOML file with shell identity, links and projects.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Username shown in the prompt.
    #[arg(long, value_name = "NAME")]
    pub user: Option<String>,
    /// Hostname shown in the prompt.
    #[arg(long, value_name = "NAME")]
    pub host: Option<String>,
    /// Where theme and welcome preferences are persisted.
    #[arg(long, value_name = "FILE")]
    pub prefs: Option<PathBuf>,
    /// Write tracing output to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
    /// Never launch a browser for links.
    #[arg(long)]
    pub no_browser: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShellSection {
    pub username: Option<String>,
    pub hostname: Option<String>,
}

/// On-disk shape of the config file. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub shell: ShellSection,
    pub links: Option<Links>,
    pub projects: Option<Vec<Project>>,
}

impl FileConfig {
    pub fn parse(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::parse(&raw, path)
    }
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub profile: SessionProfile,
    pub projects: StaticProjects,
    pub prefs_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
    pub open_browser: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            profile: SessionProfile::default(),
            projects: StaticProjects::builtin(),
            prefs_path: None,
            log_file: None,
            verbose: false,
            open_browser: true,
        }
    }
}

impl ShellConfig {
    /// Load the file named by `--config` (if any) and layer the flags on top.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let file = cli.config.as_deref().map(FileConfig::load).transpose()?;
        Ok(Self::layered(file, cli))
    }

    pub fn layered(file: Option<FileConfig>, cli: &Cli) -> Self {
        let mut config = Self::default();
        if let Some(file) = file {
            config.merge_file(file);
        }
        config.merge_cli(cli);
        config
    }

    fn merge_file(&mut self, file: FileConfig) {
        if let Some(username) = file.shell.username {
            self.profile.username = username;
        }
        if let Some(hostname) = file.shell.hostname {
            self.profile.hostname = hostname;
        }
        if let Some(links) = file.links {
            self.profile.links = links;
        }
        if let Some(projects) = file.projects {
            self.projects = StaticProjects::new(projects);
        }
    }

    fn merge_cli(&mut self, cli: &Cli) {
        if let Some(user) = &cli.user {
            self.profile.username = user.clone();
        }
        if let Some(host) = &cli.host {
            self.profile.hostname = host.clone();
        }
        if cli.prefs.is_some() {
            self.prefs_path = cli.prefs.clone();
        }
        if cli.log_file.is_some() {
            self.log_file = cli.log_file.clone();
        }
        self.verbose |= cli.verbose;
        if cli.no_browser {
            self.open_browser = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::ProjectSource;

    const SAMPLE: &str = r#"
        [shell]
        username = "ada"
        hostname = "engine"

        [links]
        github = "https://github.com/ada"

        [[projects]]
        name = "Difference Engine"
        description = "Polynomial tables"
        tech_stack = ["brass"]
        github_url = "https://github.com/ada/engine"
    "#;

    #[test]
    fn defaults_without_file_or_flags() {
        let config = ShellConfig::layered(None, &Cli::default());
        assert_eq!(config.profile, SessionProfile::default());
        assert!(config.open_browser);
        assert!(!config.projects.projects().is_empty());
    }

    #[test]
    fn file_overrides_defaults_and_flags_override_file() {
        let file = FileConfig::parse(SAMPLE, Path::new("sample.toml")).unwrap();
        let cli = Cli {
            host: Some("cli-host".into()),
            no_browser: true,
            ..Cli::default()
        };
        let config = ShellConfig::layered(Some(file), &cli);
        assert_eq!(config.profile.username, "ada");
        assert_eq!(config.profile.hostname, "cli-host");
        assert_eq!(config.profile.links.github, "https://github.com/ada");
        // unspecified link keys keep their defaults
        assert_eq!(config.profile.links.email, Links::default().email);
        assert_eq!(config.projects.projects().len(), 1);
        assert!(!config.open_browser);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = FileConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn parse_errors_name_the_file() {
        let err = FileConfig::parse("shell = 3", Path::new("bad.toml")).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "folio-wm",
            "--user",
            "sam",
            "--verbose",
            "--log-file",
            "/tmp/folio.log",
        ])
        .unwrap();
        assert_eq!(cli.user.as_deref(), Some("sam"));
        assert!(cli.verbose);
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/folio.log")));
    }
}
