use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable naming an optional TOML file with overrides.
pub const CONFIG_ENV: &str = "FLAPPY_CONFIG";

const DEFAULT_SCREEN_WIDTH: f64 = 400.0;
const DEFAULT_SCREEN_HEIGHT: f64 = 600.0;
const DEFAULT_GROUND_HEIGHT: f64 = 50.0;

const DEFAULT_BIRD_X: f64 = 50.0;
const DEFAULT_BIRD_START_Y: f64 = 300.0;
const DEFAULT_BIRD_RADIUS: f64 = 15.0;
const DEFAULT_GRAVITY: f64 = 0.5; // px/tick^2
const DEFAULT_JUMP: f64 = -9.0; // px/tick, overrides velocity

const DEFAULT_PIPE_WIDTH: f64 = 60.0;
const DEFAULT_PIPE_GAP: f64 = 180.0;
const DEFAULT_PIPE_SPEED: f64 = 3.0; // px/tick
const DEFAULT_PIPE_SPACING: f64 = 250.0;
const DEFAULT_PIPE_MARGIN: f64 = 50.0;
const DEFAULT_INITIAL_PIPES: usize = 3;

const DEFAULT_FRAME_MS: u64 = 16;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f64,
    pub height: f64,
    // Drawn only; the collision floor is the bottom of the screen.
    pub ground_height: f64,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
            ground_height: DEFAULT_GROUND_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BirdConfig {
    pub x: f64,
    pub start_y: f64,
    pub radius: f64,
    pub gravity: f64,
    pub jump: f64,
}

impl Default for BirdConfig {
    fn default() -> Self {
        Self {
            x: DEFAULT_BIRD_X,
            start_y: DEFAULT_BIRD_START_Y,
            radius: DEFAULT_BIRD_RADIUS,
            gravity: DEFAULT_GRAVITY,
            jump: DEFAULT_JUMP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipeConfig {
    pub width: f64,
    pub gap: f64,
    pub speed: f64,
    /// Distance from the right edge the last pipe must travel before the next spawns.
    pub spacing: f64,
    /// Minimum distance between a gap and the top or bottom of the screen.
    pub margin: f64,
    pub initial_count: usize,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_PIPE_WIDTH,
            gap: DEFAULT_PIPE_GAP,
            speed: DEFAULT_PIPE_SPEED,
            spacing: DEFAULT_PIPE_SPACING,
            margin: DEFAULT_PIPE_MARGIN,
            initial_count: DEFAULT_INITIAL_PIPES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub frame_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_ms: DEFAULT_FRAME_MS,
        }
    }
}

/// Every tunable constant of the game. Missing TOML keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen: ScreenConfig,
    pub bird: BirdConfig,
    pub pipes: PipeConfig,
    pub timing: TimingConfig,
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads the file named by `FLAPPY_CONFIG`, or the defaults when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        let floats = [
            ("screen.width", self.screen.width),
            ("screen.height", self.screen.height),
            ("screen.ground_height", self.screen.ground_height),
            ("bird.x", self.bird.x),
            ("bird.start_y", self.bird.start_y),
            ("bird.radius", self.bird.radius),
            ("bird.gravity", self.bird.gravity),
            ("bird.jump", self.bird.jump),
            ("pipes.width", self.pipes.width),
            ("pipes.gap", self.pipes.gap),
            ("pipes.speed", self.pipes.speed),
            ("pipes.spacing", self.pipes.spacing),
            ("pipes.margin", self.pipes.margin),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return invalid(format!("{name} must be finite, got {value}"));
        }

        if self.screen.width <= 0.0 || self.screen.height <= 0.0 {
            return invalid(format!(
                "screen must be non-empty, got {}x{}",
                self.screen.width, self.screen.height
            ));
        }
        if self.bird.radius <= 0.0 {
            return invalid(format!("bird.radius must be positive, got {}", self.bird.radius));
        }
        if self.pipes.width <= 0.0 || self.pipes.speed <= 0.0 || self.pipes.spacing <= 0.0 {
            return invalid("pipes.width, pipes.speed and pipes.spacing must be positive".into());
        }
        if self.pipes.gap <= 0.0 || self.pipes.margin < 0.0 {
            return invalid(format!(
                "pipes.gap must be positive and pipes.margin non-negative, got {} and {}",
                self.pipes.gap, self.pipes.margin
            ));
        }
        if self.pipes.initial_count == 0 {
            return invalid("pipes.initial_count must be at least 1".into());
        }
        if self.pipes.gap + 2.0 * self.pipes.margin >= self.screen.height {
            return invalid(format!(
                "pipes.gap + 2 * pipes.margin ({}) must be less than screen.height ({})",
                self.pipes.gap + 2.0 * self.pipes.margin,
                self.screen.height
            ));
        }
        Ok(())
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(self.timing.frame_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.screen.width, 400.0);
        assert_eq!(config.screen.height, 600.0);
        assert_eq!(config.bird.gravity, 0.5);
        assert_eq!(config.bird.jump, -9.0);
        assert_eq!(config.pipes.initial_count, 3);
    }

    #[test]
    fn test_partial_toml_overrides_only_named_keys() {
        let config = GameConfig::from_toml_str(
            r#"
            [bird]
            gravity = 0.4

            [timing]
            frame_ms = 33
            "#,
        )
        .expect("parse partial config");

        assert_eq!(config.bird.gravity, 0.4);
        assert_eq!(config.bird.jump, -9.0);
        assert_eq!(config.pipes, PipeConfig::default());
        assert_eq!(config.frame_duration(), Duration::from_millis(33));
    }

    #[test]
    fn test_gap_too_large_is_rejected() {
        let err = GameConfig::from_toml_str(
            r#"
            [pipes]
            gap = 500.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_non_finite_gap_is_rejected() {
        let err = GameConfig::from_toml_str(
            r#"
            [pipes]
            gap = nan
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("pipes.gap")));

        let mut config = GameConfig::default();
        config.bird.gravity = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_margin_is_rejected() {
        let err = GameConfig::from_toml_str(
            r#"
            [pipes]
            margin = -300.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let err = GameConfig::from_toml_str("[bird\ngravity = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = GameConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
