use thiserror::Error;

use crate::config::ConfigError;
use crate::prefs::PrefsError;

/// Errors that can end the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Prefs(#[from] PrefsError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
