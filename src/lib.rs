//! A Flappy Bird clone: a bird falls under gravity, flaps on demand and has to thread the gaps
//! of an endless stream of pipes.
//!
//! The simulation (`game`, `pipes`, `physics`, `collision`) is deterministic given a `rand::Rng`
//! and knows nothing about terminals. `render` draws a `SessionState` onto any `Surface`;
//! `driver::run` ties them into a frame loop around a `Host`, and `term` is the crossterm host.

pub mod collision;
pub mod config;
pub mod driver;
pub mod entity;
pub mod error;
pub mod game;
pub mod logging;
pub mod physics;
pub mod pipes;
pub mod render;
pub mod session;
pub mod surface;
pub mod term;

pub use config::GameConfig;
pub use driver::{CancelToken, Host, run};
pub use error::{AppError, ConfigError};
pub use game::{Command, CommandQueue, Game, TickOutcome};
pub use session::{Mode, SessionState};
