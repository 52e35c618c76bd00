//! Lane Runner - a three-lane endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, physics, collisions, power-ups)
//! - `game`: Run controller that schedules ticks and talks to collaborators
//! - `input`: Key/swipe translation into simulation commands
//! - `config`: Data-driven game balance
//! - `audio`, `leaderboard`, `settings`: Collaborators injected into the run controller
//! - `platform`: Browser glue (wasm32 only)

pub mod audio;
pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod leaderboard;
pub mod platform;
pub mod settings;
pub mod sim;

pub use audio::{AudioSink, Cue};
pub use config::GameConfig;
pub use error::{ConfigError, ScoreError, SimError};
pub use game::{FrameOutcome, Game};
pub use input::Command;
pub use leaderboard::{Leaderboard, LeaderboardEntry, LocalScores, ScoreService};
pub use settings::Settings;

/// Timing constants shared by the run controller and the platform loop
pub mod consts {
    /// Frame delta assumed for the first frame after start/resume (60 Hz)
    pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest frame delta fed to the simulation clock (a backgrounded tab can stall for seconds)
    pub const MAX_FRAME_MS: f64 = 100.0;
    /// Maximum commands buffered between two frames
    pub const MAX_PENDING_COMMANDS: usize = 8;
}
