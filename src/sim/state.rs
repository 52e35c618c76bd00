//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]. The state is a
//! plain value: a tick clones it, builds the next one, and the run controller
//! commits the result whole.

use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::effects::{ActiveEffect, EffectSlot};
use crate::config::GameConfig;
use crate::error::SimError;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Nothing started yet
    #[default]
    Ready,
    /// Ticks advance the state
    Running,
    /// State kept, ticks are no-ops until resumed
    Paused,
    /// Run ended; the state is frozen until restart
    GameOver,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    Magnet,
    Shield,
}

impl PowerUpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Magnet => "magnet",
            PowerUpKind::Shield => "shield",
        }
    }
}

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Lane index, the only horizontal coordinate
    pub lane: usize,
    /// Top edge in screen space (grows downward)
    pub y: f32,
    /// Vertical velocity (negative = rising)
    pub vy: f32,
    pub is_jumping: bool,
    pub has_shield: bool,
    pub has_magnet: bool,
}

impl Player {
    /// Standing on the ground in the starting lane
    pub fn new(config: &GameConfig) -> Self {
        Self {
            lane: config.start_lane(),
            y: config.ground_y(),
            vy: 0.0,
            is_jumping: false,
            has_shield: false,
            has_magnet: false,
        }
    }

    /// Set or clear the ability flag belonging to a power-up kind
    pub fn set_ability(&mut self, kind: PowerUpKind, on: bool) {
        match kind {
            PowerUpKind::Magnet => self.has_magnet = on,
            PowerUpKind::Shield => self.has_shield = on,
        }
    }

    pub fn has_ability(&self, kind: PowerUpKind) -> bool {
        match kind {
            PowerUpKind::Magnet => self.has_magnet,
            PowerUpKind::Shield => self.has_shield,
        }
    }
}

/// An obstacle scrolling toward the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Lane the obstacle was spawned for (fixed for its lifetime)
    pub lane: usize,
    pub width: f32,
    pub height: f32,
    /// Game speed at spawn time
    pub speed: f32,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    /// Fully past the left edge of the screen
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.x + self.width <= 0.0
    }
}

/// A collectible power-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub x: f32,
    pub y: f32,
    pub lane: usize,
    pub width: f32,
    pub height: f32,
    pub kind: PowerUpKind,
    /// Set on pickup; the entry is dropped on the following tick
    pub collected: bool,
}

impl PowerUp {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.x + self.width <= 0.0
    }
}

/// Complete run state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub player: Player,
    /// Ordered by spawn time (newest last)
    pub obstacles: Vec<Obstacle>,
    /// Ordered by spawn time (newest last)
    pub power_ups: Vec<PowerUp>,
    pub score: u64,
    pub game_speed: f32,
    /// Timed power-up slot
    pub effect: EffectSlot,
    /// Simulation clock in milliseconds (advances only on running ticks)
    pub clock_ms: f64,
}

impl GameState {
    /// Fresh state for a new run (not yet running)
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: GamePhase::Ready,
            player: Player::new(config),
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            score: 0,
            game_speed: config.initial_speed,
            effect: EffectSlot::default(),
            clock_ms: 0.0,
        }
    }

    /// Fresh state already in the running phase
    pub fn running(config: &GameConfig) -> Self {
        Self {
            phase: GamePhase::Running,
            ..Self::new(config)
        }
    }

    /// Left edge of the newest obstacle still in play
    pub fn last_obstacle_x(&self) -> Option<f32> {
        self.obstacles.last().map(|o| o.x)
    }

    /// Power-ups still collectible
    pub fn live_power_ups(&self) -> usize {
        self.power_ups.iter().filter(|p| !p.collected).count()
    }

    /// Read-only copy for rendering
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            player: self.player.clone(),
            obstacles: self.obstacles.clone(),
            power_ups: self.power_ups.clone(),
            score: self.score,
            game_speed: self.game_speed,
            active_effect: self.effect.active().cloned(),
        }
    }

    /// Reject states carrying NaN/inf so they are never committed
    pub fn check_finite(&self) -> Result<(), SimError> {
        let values = [
            ("player.y", self.player.y),
            ("player.vy", self.player.vy),
            ("game_speed", self.game_speed),
        ];
        let obstacles = self.obstacles.iter().map(|o| ("obstacle.x", o.x));
        let power_ups = self.power_ups.iter().map(|p| ("power_up.x", p.x));

        for (what, value) in values.into_iter().chain(obstacles).chain(power_ups) {
            if !value.is_finite() {
                return Err(SimError::NonFinite { what, value });
            }
        }
        Ok(())
    }
}

/// What the render adapter gets once per committed tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    pub score: u64,
    pub game_speed: f32,
    pub active_effect: Option<ActiveEffect>,
}
