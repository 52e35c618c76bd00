//! Error types
//!
//! The simulation has no I/O of its own, so errors are limited to bad
//! configuration, internal faults inside a tick, and collaborator failures.

use thiserror::Error;

/// Rejected game configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one lane is required")]
    NoLanes,

    #[error("obstacle gap range is inverted ({min} > {max})")]
    InvertedGap { min: u32, max: u32 },

    #[error("power-up chance {0} is outside [0, 1]")]
    ChanceOutOfRange(f64),

    #[error("power-up catalog is empty")]
    EmptyCatalog,

    /// Zero, negative or NaN
    #[error("{kind} duration {duration_ms}ms must be positive")]
    BadDuration { kind: &'static str, duration_ms: f64 },

    /// `initial_speed` above `max_speed`, or either not positive
    #[error("speed range {initial}..={max} is invalid")]
    BadSpeedRange { initial: f32, max: f32 },

    #[error("score_per_speed_step must be at least 1")]
    ZeroSpeedStep,

    /// Negative, infinite or NaN
    #[error("speed_increment {0} must be finite and not negative")]
    BadSpeedIncrement(f32),

    /// A length (lane width, player size, canvas...) is not strictly positive
    #[error("{0} must be positive")]
    NonPositive(&'static str),

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Internal fault detected while computing a tick
///
/// The half-built next state is discarded and the run ends.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("{what} became non-finite ({value})")]
    NonFinite { what: &'static str, value: f32 },
}

/// Score collaborator failure (never fatal to a run)
#[derive(Debug, Error)]
pub enum ScoreError {
    /// Browser storage unavailable or rejected the write
    #[error("score storage failed: {0}")]
    Storage(String),

    #[error("could not encode leaderboard: {0}")]
    Encode(#[from] serde_json::Error),
}
