use std::collections::VecDeque;

use rand::Rng;
use tracing::{info, warn};

use crate::collision::collides;
use crate::config::GameConfig;
use crate::session::{Mode, SessionState};

pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// Input actions and the frame clock, in the order they reach the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Click or Space: flap while playing, otherwise start / dismiss.
    Activate,
    /// Advance the simulation by one frame.
    Tick,
}

/// Bounded FIFO of commands, drained once per frame.
///
/// Inputs can fill all but the last slot, which stays free for the frame's `Tick`.
#[derive(Debug, Clone)]
pub struct CommandQueue {
    commands: VecDeque<Command>,
    capacity: usize,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }
}

impl CommandQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            commands: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns false if the command was dropped because the queue is full.
    pub fn push(&mut self, command: Command) -> bool {
        let limit = match command {
            Command::Tick => self.capacity,
            Command::Activate => self.capacity - 1,
        };
        if self.commands.len() >= limit {
            warn!(?command, len = self.commands.len(), "command queue full, dropping");
            return false;
        }
        self.commands.push_back(command);
        true
    }

    pub fn pop(&mut self) -> Option<Command> {
        self.commands.pop_front()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing was simulated.
    Idle,
    Advanced,
    /// A pipe was recycled and the score went up by this many points.
    Scored(u32),
    /// The bird hit something; the session is now `Over`.
    Crashed,
}

/// The state machine: Idle -> Playing -> Over -> Idle.
pub struct Game<R> {
    config: GameConfig,
    rng: R,
}

impl<R: Rng> Game<R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn new_session(&self) -> SessionState {
        SessionState::new(&self.config)
    }

    /// Applies one command. Only a `Tick` has an outcome.
    pub fn apply(&mut self, session: &mut SessionState, command: Command) -> Option<TickOutcome> {
        match command {
            Command::Activate => {
                self.activate(session);
                None
            }
            Command::Tick => Some(self.tick(session)),
        }
    }

    /// Applies every queued command in order. Returns the outcome of the last tick, if any.
    pub fn drain(
        &mut self,
        session: &mut SessionState,
        queue: &mut CommandQueue,
    ) -> Option<TickOutcome> {
        let mut last_tick = None;
        while let Some(command) = queue.pop() {
            if let Some(outcome) = self.apply(session, command) {
                last_tick = Some(outcome);
            }
        }
        last_tick
    }

    pub fn activate(&mut self, session: &mut SessionState) {
        match session.mode {
            Mode::Idle => self.start(session),
            Mode::Playing => session.bird.flap(self.config.bird.jump),
            // Back to the start screen; another activate is needed to play again.
            Mode::Over => {
                session.mode = Mode::Idle;
                session.bird.reset(&self.config);
                session.pipes.clear();
                info!(high_score = session.high_score, "back to start screen");
            }
        }
    }

    fn start(&mut self, session: &mut SessionState) {
        let config = &self.config;
        session.mode = Mode::Playing;
        session.bird.reset(config);
        session.pipes.reset(
            &config.pipes,
            config.screen.width,
            config.screen.height,
            &mut self.rng,
        );
        session.score = 0;
        info!(pipes = session.pipes.len(), "game started");
    }

    /// One simulation step. Does nothing unless playing; an `Over` session stays frozen.
    pub fn tick(&mut self, session: &mut SessionState) -> TickOutcome {
        if session.mode != Mode::Playing {
            return TickOutcome::Idle;
        }

        let config = &self.config;
        session.bird.fall(config.bird.gravity);
        let scored = session.pipes.update(
            &config.pipes,
            config.screen.width,
            config.screen.height,
            &mut self.rng,
        );
        session.score += scored;

        if collides(&session.bird, &session.pipes, config) {
            session.mode = Mode::Over;
            session.high_score = session.high_score.max(session.score);
            info!(
                score = session.score,
                high_score = session.high_score,
                "game over"
            );
            return TickOutcome::Crashed;
        }

        if scored > 0 {
            TickOutcome::Scored(scored)
        } else {
            TickOutcome::Advanced
        }
    }
}
