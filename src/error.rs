use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Fatal-to-start conditions. The simulation itself never fails.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("stdout is not a terminal; nothing to draw on")]
    NotATerminal,
    #[error("terminal is too small ({cols}x{rows}) to hold the playfield")]
    SurfaceTooSmall { cols: u16, rows: u16 },
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to install log subscriber: {0}")]
    Logging(String),
}
