use std::collections::VecDeque;

use rand::Rng;
use tracing::debug;

use crate::config::PipeConfig;
use crate::entity::Pipe;

/// The scrolling pipes, ordered left to right.
///
/// New pipes are only ever pushed at the back and recycled pipes only ever come off the
/// front, so insertion order, spawn order and horizontal order always agree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipeField {
    pipes: VecDeque<Pipe>,
}

impl PipeField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pipe> {
        self.pipes.iter()
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    pub fn last(&self) -> Option<&Pipe> {
        self.pipes.back()
    }

    pub fn clear(&mut self) {
        self.pipes.clear();
    }

    /// Appends a pipe. Callers must keep it to the right of the current last pipe.
    pub fn push(&mut self, pipe: Pipe) {
        debug_assert!(self.last().is_none_or(|last| last.x < pipe.x));
        self.pipes.push_back(pipe);
    }

    /// Replaces the field with `initial_count` evenly spaced pipes starting at the right edge.
    pub fn reset<R: Rng>(
        &mut self,
        config: &PipeConfig,
        screen_width: f64,
        screen_height: f64,
        rng: &mut R,
    ) {
        self.pipes.clear();
        for i in 0..config.initial_count {
            let x = screen_width + i as f64 * config.spacing;
            let top_height = sample_top_height(config, screen_height, rng);
            self.pipes.push_back(Pipe { x, top_height });
        }
    }

    pub fn scroll(&mut self, speed: f64) {
        for pipe in &mut self.pipes {
            pipe.x -= speed;
        }
    }

    /// Spawns a pipe at the right edge once the last one has moved `spacing` into the screen.
    pub fn maybe_spawn<R: Rng>(
        &mut self,
        config: &PipeConfig,
        screen_width: f64,
        screen_height: f64,
        rng: &mut R,
    ) -> bool {
        let should_spawn = self
            .last()
            .is_none_or(|last| last.x < screen_width - config.spacing);
        if !should_spawn {
            return false;
        }

        let top_height = sample_top_height(config, screen_height, rng);
        debug!(x = screen_width, top_height, "spawned pipe");
        self.pipes.push_back(Pipe {
            x: screen_width,
            top_height,
        });
        true
    }

    /// Removes the front pipe once it is fully past the left edge. At most one per call.
    pub fn recycle(&mut self, width: f64) -> bool {
        match self.pipes.front() {
            Some(first) if first.right(width) < 0.0 => {
                self.pipes.pop_front();
                debug!(remaining = self.pipes.len(), "recycled pipe");
                true
            }
            _ => false,
        }
    }

    /// Scroll, spawn, recycle. Returns the number of pipes recycled (0 or 1).
    pub fn update<R: Rng>(
        &mut self,
        config: &PipeConfig,
        screen_width: f64,
        screen_height: f64,
        rng: &mut R,
    ) -> u32 {
        self.scroll(config.speed);
        self.maybe_spawn(config, screen_width, screen_height, rng);
        u32::from(self.recycle(config.width))
    }
}

/// Uniform in `[margin, height - gap - margin)`, so the gap never reaches the ground.
fn sample_top_height<R: Rng>(config: &PipeConfig, screen_height: f64, rng: &mut R) -> f64 {
    let low = config.margin;
    let high = screen_height - config.gap - config.margin;
    if high <= low {
        return low;
    }
    rng.gen_range(low..high)
}
