//! Lane Runner entry point
//!
//! The browser build starts from `platform::web`. Natively this runs a
//! headless autopilot demo:
//!
//! ```text
//! lane-runner [SEED] [CONFIG.json]
//! ```

/// Stop the demo even if the autopilot never dies
#[cfg(not(target_arch = "wasm32"))]
const MAX_DEMO_TICKS: u64 = 100_000;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use lane_runner::audio::CueLog;
    use lane_runner::consts::NOMINAL_FRAME_MS;
    use lane_runner::{Cue, FrameOutcome, Game, GameConfig, LocalScores};

    env_logger::init();
    log::info!("Lane Runner (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse::<u64>()?,
        None => rand::random(),
    };
    let config = match args.next() {
        Some(path) => GameConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => GameConfig::default(),
    };

    let mut game = Game::new(config, seed, CueLog::new(), LocalScores::default())?;
    game.set_autopilot(true);
    game.start();

    let mut now = 0.0;
    let mut final_score = None;
    for _ in 0..MAX_DEMO_TICKS {
        match game.frame(now) {
            FrameOutcome::Continue(_) => now += NOMINAL_FRAME_MS,
            FrameOutcome::GameOver { final_score: score, .. } => {
                final_score = Some(score);
                break;
            }
            FrameOutcome::Idle => break,
        }
    }

    let audio = game.audio();
    match final_score {
        Some(score) => println!("seed {seed}: game over, score {score}"),
        None => println!("seed {seed}: still running after {MAX_DEMO_TICKS} ticks, score {}", game.state().score),
    }
    println!(
        "jumps {}, lane changes {}, power-ups {}",
        audio.count(Cue::Jump),
        audio.count(Cue::Score),
        audio.count(Cue::PowerUp)
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}
