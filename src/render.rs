use crate::config::GameConfig;
use crate::entity::{Bird, Pipe};
use crate::session::{Mode, SessionState};
use crate::surface::{Align, Font, Rgb, Rgba, Surface};

const SKY: Rgb = Rgb(135, 206, 235);
const GROUND: Rgb = Rgb(222, 184, 135);
const PIPE: Rgb = Rgb(34, 139, 34);
const PIPE_CAP: Rgb = Rgb(50, 205, 50);
const BIRD: Rgb = Rgb(255, 215, 0);
const BIRD_EYE: Rgb = Rgb(0, 0, 0);
const BIRD_BEAK: Rgb = Rgb(255, 99, 71);
const OVERLAY: Rgba = Rgb(0, 0, 0).with_alpha(179); // 70%
const PROMPT: Rgb = Rgb(0, 0, 0);
const WHITE: Rgb = Rgb(255, 255, 255);

const CAP_HEIGHT: f64 = 20.0;
const CAP_OVERHANG: f64 = 5.0;
const EYE_OFFSET: f64 = 5.0;
const EYE_RADIUS: f64 = 3.0;
const BEAK_LENGTH: f64 = 8.0;
const BEAK_HALF_HEIGHT: f64 = 3.0;

pub const START_PROMPT: &str = "Click or Press Space to Start";
pub const RESTART_PROMPT: &str = "Click or Press Space to Restart";
pub const GAME_OVER: &str = "Game Over!";

/// Draws one full frame for the current session. Reads nothing else and writes only to `surface`.
pub fn draw<S: Surface>(surface: &mut S, session: &SessionState, config: &GameConfig) {
    surface.clear();
    draw_background(surface, config);

    match session.mode {
        Mode::Idle => {
            draw_bird(surface, &session.bird);
            draw_start_prompt(surface, config);
        }
        Mode::Playing => {
            draw_pipes(surface, session.pipes.iter(), config);
            draw_bird(surface, &session.bird);
        }
        Mode::Over => {
            draw_pipes(surface, session.pipes.iter(), config);
            draw_bird(surface, &session.bird);
            draw_game_over(surface, session, config);
        }
    }
}

fn draw_background<S: Surface>(surface: &mut S, config: &GameConfig) {
    let (w, h) = extent(surface);
    surface.fill_rect(0.0, 0.0, w, h, SKY.opaque());
    let ground = config.screen.ground_height;
    surface.fill_rect(0.0, h - ground, w, ground, GROUND.opaque());
}

fn extent<S: Surface>(surface: &S) -> (f64, f64) {
    let (w, h) = surface.size();
    (f64::from(w), f64::from(h))
}

/// Headline text, centred on its anchor.
fn title(size: u16) -> Font {
    Font::new(size).bold().align(Align::Center)
}

fn draw_pipes<'a, S: Surface>(
    surface: &mut S,
    pipes: impl Iterator<Item = &'a Pipe>,
    config: &GameConfig,
) {
    let h = config.screen.height;
    let width = config.pipes.width;
    let gap = config.pipes.gap;

    for pipe in pipes {
        let gap_bottom = pipe.gap_bottom(gap);

        // Bodies
        surface.fill_rect(pipe.x, 0.0, width, pipe.top_height, PIPE.opaque());
        surface.fill_rect(pipe.x, gap_bottom, width, h - gap_bottom, PIPE.opaque());

        // Caps sit just outside the gap.
        let cap_x = pipe.x - CAP_OVERHANG;
        let cap_w = width + CAP_OVERHANG * 2.0;
        surface.fill_rect(
            cap_x,
            pipe.top_height - CAP_HEIGHT,
            cap_w,
            CAP_HEIGHT,
            PIPE_CAP.opaque(),
        );
        surface.fill_rect(cap_x, gap_bottom, cap_w, CAP_HEIGHT, PIPE_CAP.opaque());
    }
}

fn draw_bird<S: Surface>(surface: &mut S, bird: &Bird) {
    surface.fill_circle(bird.x, bird.y, bird.radius, BIRD.opaque());

    surface.fill_circle(
        bird.x + EYE_OFFSET,
        bird.y - EYE_OFFSET,
        EYE_RADIUS,
        BIRD_EYE.opaque(),
    );

    let beak_base = bird.right();
    let beak_tip = beak_base + BEAK_LENGTH;
    surface.fill_triangle(
        (beak_base, bird.y),
        (beak_tip, bird.y - BEAK_HALF_HEIGHT),
        (beak_tip, bird.y + BEAK_HALF_HEIGHT),
        BIRD_BEAK.opaque(),
    );
}

fn draw_start_prompt<S: Surface>(surface: &mut S, config: &GameConfig) {
    let cx = config.screen.width / 2.0;
    let cy = config.screen.height / 2.0;
    surface.fill_text(START_PROMPT, cx, cy - 50.0, title(24), PROMPT.opaque());
}

fn draw_game_over<S: Surface>(surface: &mut S, session: &SessionState, config: &GameConfig) {
    let (w, h) = extent(surface);
    surface.fill_rect(0.0, 0.0, w, h, OVERLAY);

    let cx = config.screen.width / 2.0;
    let cy = config.screen.height / 2.0;
    let white = WHITE.opaque();
    surface.fill_text(GAME_OVER, cx, cy - 50.0, title(36), white);
    surface.fill_text(
        &format!("Score: {}", session.score),
        cx,
        cy,
        title(24),
        white,
    );
    surface.fill_text(
        &format!("High Score: {}", session.high_score),
        cx,
        cy + 40.0,
        title(24),
        white,
    );
    let hint = Font::new(18).align(Align::Center);
    surface.fill_text(RESTART_PROMPT, cx, cy + 100.0, hint, white);
}
