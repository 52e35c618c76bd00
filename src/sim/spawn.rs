//! Spawn policy
//!
//! Stateless decisions about when and where new entities appear. All
//! randomness comes from the caller's RNG so a seeded run replays exactly.

use rand::Rng;

use super::state::{Obstacle, PowerUp};
use crate::config::{GameConfig, OBSTACLE_SPAWN_JITTER, POWER_UP_SPAWN_OFFSET};

/// Whether the newest obstacle has receded far enough for another one.
///
/// The gap threshold is sampled on every call, so the effective spacing is
/// the first sample the receding obstacle beats, not a gap fixed at spawn.
/// With no obstacle in play a new one spawns straight away.
pub fn should_spawn_obstacle<R: Rng + ?Sized>(
    rng: &mut R,
    last_obstacle_x: Option<f32>,
    screen_width: f32,
    min_gap: u32,
    max_gap: u32,
) -> bool {
    let Some(last_x) = last_obstacle_x else {
        return true;
    };
    let gap = rng.random_range(min_gap..=max_gap) as f32;
    last_x < screen_width - gap
}

/// A new obstacle just past the right edge in a random lane
pub fn spawn_obstacle<R: Rng + ?Sized>(rng: &mut R, config: &GameConfig, speed: f32) -> Obstacle {
    let jitter = rng.random_range(0..=OBSTACLE_SPAWN_JITTER) as f32;
    Obstacle {
        x: config.canvas_width + jitter,
        y: config.obstacle_y(),
        lane: rng.random_range(0..config.lanes),
        width: config.obstacle_width(),
        height: config.obstacle_height,
        speed,
    }
}

/// Per-tick Bernoulli trial, gated by the live power-up cap.
///
/// The trial is always drawn so the RNG stream does not depend on how many
/// power-ups happen to be alive.
pub fn should_spawn_power_up<R: Rng + ?Sized>(
    rng: &mut R,
    live: usize,
    chance: f64,
    cap: usize,
) -> bool {
    let roll = rng.random_bool(chance);
    roll && live < cap
}

/// A new power-up with its kind drawn uniformly from the catalog
pub fn spawn_power_up<R: Rng + ?Sized>(rng: &mut R, config: &GameConfig) -> Option<PowerUp> {
    if config.power_ups.is_empty() {
        return None;
    }
    let spec = config.power_ups[rng.random_range(0..config.power_ups.len())];
    let (lo, hi) = POWER_UP_SPAWN_OFFSET;
    let offset = rng.random_range(lo..=hi) as f32;

    Some(PowerUp {
        x: config.canvas_width + offset,
        y: config.power_up_y(),
        lane: rng.random_range(0..config.lanes),
        width: config.power_up_size,
        height: config.power_up_size,
        kind: spec.kind,
        collected: false,
    })
}
