use crate::config::GameConfig;
use crate::entity::Bird;
use crate::pipes::PipeField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Playing,
    Over,
}

/// Everything that changes while the game runs. Owned by whoever drives the loop and
/// passed by reference into `Game`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub mode: Mode,
    pub bird: Bird,
    pub pipes: PipeField,
    pub score: u32,
    /// Best score seen by this process. Never decreases.
    pub high_score: u32,
}

impl SessionState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            mode: Mode::Idle,
            bird: Bird::at_rest(config),
            pipes: PipeField::new(),
            score: 0,
            high_score: 0,
        }
    }
}
