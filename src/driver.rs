use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};

use crate::game::{Command, CommandQueue, Game, TickOutcome};
use crate::render;
use crate::session::SessionState;
use crate::surface::PixelBuf;

/// Shared stop flag for the frame loop. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Whatever hosts the game: feeds it input and shows its frames.
pub trait Host {
    type Error;

    /// Queues the input that arrived since the last frame. May cancel `cancel` on teardown.
    fn poll_input(
        &mut self,
        queue: &mut CommandQueue,
        cancel: &CancelToken,
    ) -> Result<(), Self::Error>;

    fn present(&mut self, frame: &PixelBuf, session: &SessionState) -> Result<(), Self::Error>;
}

/// Runs one frame per iteration until `cancel` is set: input, tick, draw, present, pace.
///
/// Frames that run long are not caught up; the simulation just advances one step per frame.
pub fn run<R, H>(
    game: &mut Game<R>,
    session: &mut SessionState,
    host: &mut H,
    cancel: &CancelToken,
) -> Result<u64, H::Error>
where
    R: Rng,
    H: Host,
{
    let config = game.config();
    let frame_dur = config.frame_duration();
    let mut buf = PixelBuf::new(
        config.screen.width.ceil() as usize,
        config.screen.height.ceil() as usize,
    );
    let mut queue = CommandQueue::default();
    let mut frames = 0u64;

    info!(frame_ms = frame_dur.as_millis() as u64, "frame loop started");
    while !cancel.is_cancelled() {
        let frame_start = Instant::now();

        host.poll_input(&mut queue, cancel)?;
        if cancel.is_cancelled() {
            break;
        }
        queue.push(Command::Tick);

        if let Some(outcome @ TickOutcome::Scored(_)) = game.drain(session, &mut queue) {
            debug!(?outcome, score = session.score, "scored");
        }

        render::draw(&mut buf, session, game.config());
        host.present(&buf, session)?;
        frames += 1;

        pace(frame_start, frame_dur);
    }
    info!(frames, "frame loop stopped");

    Ok(frames)
}

fn pace(frame_start: Instant, frame_dur: Duration) {
    let elapsed = frame_start.elapsed();
    if elapsed < frame_dur {
        std::thread::sleep(frame_dur - elapsed);
    }
}
