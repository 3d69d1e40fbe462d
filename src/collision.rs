use crate::config::GameConfig;
use crate::entity::Bird;
use crate::pipes::PipeField;

/// Whether the bird has hit the ground, the ceiling or a pipe.
///
/// The bird is treated as its bounding box, not a circle. While it overlaps a pipe
/// horizontally its whole vertical extent must sit inside the gap.
pub fn collides(bird: &Bird, pipes: &PipeField, config: &GameConfig) -> bool {
    if out_of_bounds(bird, config.screen.height) {
        return true;
    }

    pipes.iter().any(|pipe| {
        let overlaps = bird.right() > pipe.x && bird.left() < pipe.right(config.pipes.width);
        overlaps
            && (bird.top() < pipe.top_height || bird.bottom() > pipe.gap_bottom(config.pipes.gap))
    })
}

fn out_of_bounds(bird: &Bird, screen_height: f64) -> bool {
    bird.bottom() > screen_height || bird.top() < 0.0
}
