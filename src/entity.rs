use crate::config::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
    pub radius: f64,
}

impl Bird {
    /// A bird at its rest position with no vertical velocity.
    pub fn at_rest(config: &GameConfig) -> Self {
        Self {
            x: config.bird.x,
            y: config.bird.start_y,
            velocity: 0.0,
            radius: config.bird.radius,
        }
    }

    pub fn reset(&mut self, config: &GameConfig) {
        self.y = config.bird.start_y;
        self.velocity = 0.0;
    }

    pub fn top(&self) -> f64 {
        self.y - self.radius
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.radius
    }

    pub fn left(&self) -> f64 {
        self.x - self.radius
    }

    pub fn right(&self) -> f64 {
        self.x + self.radius
    }
}

/// A pipe pair. Width and gap size are shared by every pipe and live in the config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    pub x: f64,
    /// Height of the top pipe, i.e. where the gap begins.
    pub top_height: f64,
}

impl Pipe {
    pub fn gap_bottom(&self, gap: f64) -> f64 {
        self.top_height + gap
    }

    pub fn right(&self, width: f64) -> f64 {
        self.x + width
    }
}
