//! Data-driven game balance
//!
//! Everything the simulation reads is here and stays immutable for a run.
//! Defaults give a 360x500 portrait board with three lanes.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::PowerUpKind;

/// Horizontal inset between an obstacle and its lane width
pub const OBSTACLE_INSET: f32 = 14.0;
/// Power-ups hover this far above the ground line
pub const POWER_UP_HOVER: f32 = 4.0;
/// Obstacles spawn this far (at most) past the right edge
pub const OBSTACLE_SPAWN_JITTER: u32 = 15;
/// Power-ups spawn within this range past the right edge
pub const POWER_UP_SPAWN_OFFSET: (u32, u32) = (10, 30);

/// One entry of the power-up catalog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpSpec {
    pub kind: PowerUpKind,
    /// How long the effect lasts once collected (simulation milliseconds)
    pub duration_ms: f64,
}

/// Game configuration consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Layout ===
    pub lanes: usize,
    pub lane_width: f32,
    pub player_size: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub ground_height: f32,

    // === Jump ===
    /// Added to vertical velocity every tick while airborne
    pub gravity: f32,
    /// Vertical velocity on takeoff (negative = up)
    pub jump_velocity: f32,

    // === Obstacles ===
    /// Game speed at the start of a run
    pub initial_speed: f32,
    pub obstacle_min_gap: u32,
    pub obstacle_max_gap: u32,
    pub obstacle_height: f32,

    // === Power-ups ===
    pub power_up_size: f32,
    /// Per-tick spawn probability
    pub power_up_chance: f64,
    /// Maximum power-ups alive at once
    pub max_live_power_ups: usize,
    pub power_ups: Vec<PowerUpSpec>,

    // === Difficulty ramp ===
    /// Speed increases every this many points
    pub score_per_speed_step: u64,
    pub speed_increment: f32,
    pub max_speed: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lanes: 3,
            lane_width: 70.0,
            player_size: 40.0,
            canvas_width: 360.0,
            canvas_height: 500.0,
            ground_height: 60.0,

            gravity: 0.7,
            jump_velocity: -12.0,

            initial_speed: 5.0,
            obstacle_min_gap: 160,
            obstacle_max_gap: 350,
            obstacle_height: 40.0,

            power_up_size: 30.0,
            power_up_chance: 0.2,
            max_live_power_ups: 2,
            power_ups: vec![
                PowerUpSpec {
                    kind: PowerUpKind::Magnet,
                    duration_ms: 4000.0,
                },
                PowerUpSpec {
                    kind: PowerUpKind::Shield,
                    duration_ms: 3500.0,
                },
            ],

            score_per_speed_step: 400,
            speed_increment: 0.05,
            max_speed: 14.0,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lanes == 0 {
            return Err(ConfigError::NoLanes);
        }
        for (name, value) in [
            ("lane_width", self.lane_width),
            ("player_size", self.player_size),
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("obstacle_height", self.obstacle_height),
            ("power_up_size", self.power_up_size),
            ("gravity", self.gravity),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive(name));
            }
        }
        if self.lane_width <= OBSTACLE_INSET {
            return Err(ConfigError::NonPositive("lane_width - obstacle inset"));
        }
        if !(self.jump_velocity < 0.0) {
            return Err(ConfigError::NonPositive("-jump_velocity"));
        }
        if self.obstacle_min_gap > self.obstacle_max_gap {
            return Err(ConfigError::InvertedGap {
                min: self.obstacle_min_gap,
                max: self.obstacle_max_gap,
            });
        }
        if !(0.0..=1.0).contains(&self.power_up_chance) {
            return Err(ConfigError::ChanceOutOfRange(self.power_up_chance));
        }
        if self.power_ups.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        if let Some(bad) = self.power_ups.iter().find(|spec| !(spec.duration_ms > 0.0)) {
            return Err(ConfigError::BadDuration {
                kind: bad.kind.as_str(),
                duration_ms: bad.duration_ms,
            });
        }
        if !(self.initial_speed > 0.0) || !(self.initial_speed <= self.max_speed) {
            return Err(ConfigError::BadSpeedRange {
                initial: self.initial_speed,
                max: self.max_speed,
            });
        }
        if self.score_per_speed_step == 0 {
            return Err(ConfigError::ZeroSpeedStep);
        }
        if !(self.speed_increment >= 0.0) || !self.speed_increment.is_finite() {
            return Err(ConfigError::BadSpeedIncrement(self.speed_increment));
        }
        Ok(())
    }

    /// Player's top edge when standing on the ground
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.canvas_height - self.ground_height - self.player_size
    }

    /// Obstacle's top edge (obstacles sit on the ground)
    #[inline]
    pub fn obstacle_y(&self) -> f32 {
        self.canvas_height - self.ground_height - self.obstacle_height
    }

    #[inline]
    pub fn obstacle_width(&self) -> f32 {
        self.lane_width - OBSTACLE_INSET
    }

    /// Power-up's top edge
    #[inline]
    pub fn power_up_y(&self) -> f32 {
        self.canvas_height - self.ground_height - self.power_up_size - POWER_UP_HOVER
    }

    /// Left edge of a lane
    #[inline]
    pub fn lane_x(&self, lane: usize) -> f32 {
        lane as f32 * self.lane_width
    }

    /// Lane a new run starts in (the middle one)
    pub fn start_lane(&self) -> usize {
        self.lanes / 2
    }

    /// Effect duration for a kind, if the catalog lists it
    pub fn duration_ms(&self, kind: PowerUpKind) -> Option<f64> {
        self.power_ups
            .iter()
            .find(|spec| spec.kind == kind)
            .map(|spec| spec.duration_ms)
    }
}
