//! Per-frame simulation step
//!
//! `tick` reads the committed state and returns the complete next state plus
//! the events that happened on the way. Nothing is mutated in place, so a
//! fault halfway through leaves the committed state untouched.

use rand::Rng;

use super::collision::{overlaps, player_bounds};
use super::physics::{LaneShift, integrate_jump, shift_lane, try_jump};
use super::spawn::{should_spawn_obstacle, should_spawn_power_up, spawn_obstacle, spawn_power_up};
use super::state::{GamePhase, GameState, PowerUpKind};
use crate::config::GameConfig;
use crate::consts::MAX_FRAME_MS;
use crate::error::SimError;
use crate::input::Command;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Commands queued since the previous tick, oldest first
    pub commands: Vec<Command>,
    /// Wall time since the previous tick (ms); clamped before use
    pub dt_ms: f64,
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A lane change command was accepted
    LaneChanged { lane: usize },
    /// A jump command was accepted
    Jumped,
    /// Power-up picked up (and `replaced` was cancelled)
    PowerUpCollected {
        kind: PowerUpKind,
        replaced: Option<PowerUpKind>,
    },
    /// Timed effect ran out
    EffectExpired(PowerUpKind),
    /// Shield neutralised an obstacle
    ObstacleAbsorbed,
    /// Difficulty step
    SpeedUp { speed: f32 },
    /// Collision without shield; the run is over
    Died { score: u64 },
}

/// Result of a tick
#[derive(Debug, Clone)]
pub struct TickOutput {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

/// Advance the game state by one frame
pub fn tick<R: Rng + ?Sized>(
    state: &GameState,
    input: &TickInput,
    config: &GameConfig,
    rng: &mut R,
) -> Result<TickOutput, SimError> {
    // Don't tick if not running
    if state.phase != GamePhase::Running {
        return Ok(TickOutput {
            state: state.clone(),
            events: Vec::new(),
        });
    }

    let mut next = state.clone();
    let mut events = Vec::new();

    // Clock first so expiry and pickups in this tick share the same "now"
    let dt = if input.dt_ms.is_finite() {
        input.dt_ms.clamp(0.0, MAX_FRAME_MS)
    } else {
        0.0
    };
    next.clock_ms += dt;
    let now = next.clock_ms;

    if let Some(kind) = next.effect.expire(now, &mut next.player) {
        events.push(GameEvent::EffectExpired(kind));
    }

    for &command in &input.commands {
        apply_command(&mut next, command, config, &mut events);
    }

    // 1. Scroll and cull
    let speed = next.game_speed;
    for obstacle in &mut next.obstacles {
        obstacle.x -= speed;
    }
    next.obstacles.retain(|o| !o.is_offscreen());

    for power_up in &mut next.power_ups {
        power_up.x -= speed;
    }
    next.power_ups.retain(|p| !p.collected && !p.is_offscreen());

    // 2. Spawn
    if should_spawn_obstacle(
        rng,
        next.last_obstacle_x(),
        config.canvas_width,
        config.obstacle_min_gap,
        config.obstacle_max_gap,
    ) {
        next.obstacles.push(spawn_obstacle(rng, config, speed));
    }

    if should_spawn_power_up(
        rng,
        next.live_power_ups(),
        config.power_up_chance,
        config.max_live_power_ups,
    ) {
        if let Some(power_up) = spawn_power_up(rng, config) {
            next.power_ups.push(power_up);
        }
    }

    // 3. Jump physics
    next.player = integrate_jump(&next.player, config.gravity, config.ground_y());

    // 4. Obstacles
    let player_box = player_bounds(&next.player, config);
    let shielded = next.player.has_shield;
    let mut died = false;
    next.obstacles.retain(|obstacle| {
        if !overlaps(&player_box, &obstacle.bounds()) {
            return true;
        }
        if shielded {
            events.push(GameEvent::ObstacleAbsorbed);
            false
        } else {
            died = true;
            true
        }
    });

    // 5. Power-ups
    let mut collected = Vec::new();
    for power_up in next.power_ups.iter_mut().filter(|p| !p.collected) {
        if overlaps(&player_box, &power_up.bounds()) {
            power_up.collected = true;
            collected.push(power_up.kind);
        }
    }
    for kind in collected {
        // Kinds outside the catalog are picked up but grant nothing
        let Some(duration_ms) = config.duration_ms(kind) else {
            continue;
        };
        let replaced = next
            .effect
            .activate(kind, now, duration_ms, &mut next.player);
        events.push(GameEvent::PowerUpCollected { kind, replaced });
    }

    // 6. Score and difficulty
    next.score += 1;
    if next.score % config.score_per_speed_step == 0 && next.game_speed < config.max_speed {
        next.game_speed = (next.game_speed + config.speed_increment).min(config.max_speed);
        events.push(GameEvent::SpeedUp {
            speed: next.game_speed,
        });
    }

    // 7. Terminal
    if died {
        next.phase = GamePhase::GameOver;
        events.push(GameEvent::Died { score: next.score });
    }

    next.check_finite()?;

    Ok(TickOutput {
        state: next,
        events,
    })
}

/// Apply one command against the latest state, silently ignoring it if a guard fails
fn apply_command(
    state: &mut GameState,
    command: Command,
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
) {
    let player = &mut state.player;
    match command {
        Command::MoveLeft | Command::MoveRight => {
            let shift = if command == Command::MoveLeft {
                LaneShift::Left
            } else {
                LaneShift::Right
            };
            if shift_lane(player, shift, config.lanes) {
                events.push(GameEvent::LaneChanged { lane: player.lane });
            }
        }
        Command::Jump => {
            if try_jump(player, config.jump_velocity) {
                events.push(GameEvent::Jumped);
            }
        }
    }
}
