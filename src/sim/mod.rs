//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, time only through the clamped frame delta
//! - Seeded RNG only, passed in by the caller
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod effects;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, overlaps, player_bounds};
pub use effects::{ActiveEffect, EffectSlot};
pub use physics::{LaneShift, integrate_jump, shift_lane, try_jump};
pub use spawn::{should_spawn_obstacle, should_spawn_power_up, spawn_obstacle, spawn_power_up};
pub use state::{GamePhase, GameState, Obstacle, Player, PowerUp, PowerUpKind, Snapshot};
pub use tick::{GameEvent, TickInput, TickOutput, tick};
