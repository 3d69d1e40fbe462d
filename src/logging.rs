use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

use crate::error::AppError;

/// File to write log events to. The terminal is the game display, so without it nothing is logged.
pub const LOG_ENV: &str = "FLAPPY_LOG";
/// `trace`, `debug`, `info`, `warn` or `error`. Defaults to `info`.
pub const LOG_LEVEL_ENV: &str = "FLAPPY_LOG_LEVEL";

fn env_level(name: &str) -> Option<Level> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

pub fn init() -> Result<(), AppError> {
    let Some(path) = std::env::var_os(LOG_ENV) else {
        return Ok(());
    };
    let level = env_level(LOG_LEVEL_ENV).unwrap_or(Level::INFO);
    init_file(Path::new(&path), level)
}

pub fn init_file(path: &Path, level: Level) -> Result<(), AppError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| AppError::Logging(format!("{}: {err}", path.display())))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}
