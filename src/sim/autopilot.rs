//! Idle/demo mode - the game plays itself
//!
//! Obstacles sweep across every lane, so the only way past one is over it.
//! The autopilot jumps when the nearest obstacle ahead is about to reach the
//! player, early enough to be airborne before contact.

use super::state::GameState;
use crate::config::GameConfig;
use crate::input::Command;

/// Jump once an obstacle is this many ticks (at current speed) from the player
const JUMP_LEAD_TICKS: f32 = 8.0;
/// Too close to clear: jumping now would still clip the obstacle
const TOO_LATE_TICKS: f32 = 3.0;

/// Command the autopilot would issue this frame, if any
pub fn suggest(state: &GameState, config: &GameConfig) -> Option<Command> {
    if state.player.is_jumping {
        return None;
    }

    let player_right = config.lane_x(state.player.lane) + config.player_size;
    let speed = state.game_speed.max(f32::EPSILON);

    let nearest_ahead = state
        .obstacles
        .iter()
        .map(|o| o.x - player_right)
        .filter(|gap| *gap > 0.0)
        .fold(f32::INFINITY, f32::min);

    let ticks_away = nearest_ahead / speed;
    (ticks_away > TOO_LATE_TICKS && ticks_away <= JUMP_LEAD_TICKS).then_some(Command::Jump)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;

    fn state_with_obstacle_at(config: &GameConfig, x: f32) -> GameState {
        let mut state = GameState::running(config);
        state.obstacles.push(Obstacle {
            x,
            y: config.obstacle_y(),
            lane: 0,
            width: config.obstacle_width(),
            height: config.obstacle_height,
            speed: config.initial_speed,
        });
        state
    }

    #[test]
    fn test_jumps_inside_lead_window() {
        let config = GameConfig::default();
        // Player right edge is at 110; 35px away at speed 5 = 7 ticks
        let state = state_with_obstacle_at(&config, 145.0);
        assert_eq!(suggest(&state, &config), Some(Command::Jump));
    }

    #[test]
    fn test_waits_when_obstacle_far() {
        let config = GameConfig::default();
        let state = state_with_obstacle_at(&config, 300.0);
        assert_eq!(suggest(&state, &config), None);
    }

    #[test]
    fn test_no_jump_while_airborne() {
        let config = GameConfig::default();
        let mut state = state_with_obstacle_at(&config, 145.0);
        state.player.is_jumping = true;
        assert_eq!(suggest(&state, &config), None);
    }

    #[test]
    fn test_ignores_obstacles_behind() {
        let config = GameConfig::default();
        let state = state_with_obstacle_at(&config, 20.0);
        assert_eq!(suggest(&state, &config), None);
    }
}
