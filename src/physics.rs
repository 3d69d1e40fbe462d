use crate::entity::Bird;

impl Bird {
    /// One gravity-integrated tick. Position is not clamped; leaving the screen is a collision.
    pub fn fall(&mut self, gravity: f64) {
        self.velocity += gravity;
        self.y += self.velocity;
    }

    /// Replaces the velocity with the jump impulse. Position is untouched until the next tick.
    pub fn flap(&mut self, jump: f64) {
        self.velocity = jump;
    }
}
