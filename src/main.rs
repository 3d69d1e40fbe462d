use flappy::term::TerminalHost;
use flappy::{AppError, CancelToken, GameConfig, Game, logging, run};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

/// Seed for reproducible pipe layouts.
const SEED_ENV: &str = "FLAPPY_SEED";

fn main() -> Result<(), AppError> {
    logging::init()?;
    let config = GameConfig::from_env()?;

    let rng = match std::env::var(SEED_ENV).ok().and_then(|v| v.parse().ok()) {
        Some(seed) => {
            info!(seed, "seeded pipe layout");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let (width, height) = (config.screen.width, config.screen.height);
    let mut game = Game::new(config, rng);
    let mut session = game.new_session();

    let mut host = TerminalHost::new(width, height)?;
    let cancel = CancelToken::new();
    run(&mut game, &mut session, &mut host, &cancel)?;
    drop(host);

    info!(high_score = session.high_score, "session ended");
    Ok(())
}
