//! Collision detection
//!
//! Everything in the runner is an axis-aligned box in screen space, so a
//! single overlap test covers obstacles and power-ups alike.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Player;
use crate::config::GameConfig;

/// Axis-aligned bounding box (screen space, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }
}

/// Open-interval overlap test: boxes that only share an edge do not collide
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    let (a_max, b_max) = (a.max(), b.max());
    a_max.x > b.min.x && a.min.x < b_max.x && a_max.y > b.min.y && a.min.y < b_max.y
}

/// The player's box, derived from lane and current height
pub fn player_bounds(player: &Player, config: &GameConfig) -> Aabb {
    Aabb::new(
        config.lane_x(player.lane),
        player.y,
        config.player_size,
        config.player_size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_boxes_collide() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(5.0, 5.0, 10.0, 10.0);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn test_edge_contact_is_not_collision() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        // Touching on the right edge
        let right = Aabb::new(10.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &right));
        // Touching on the bottom edge
        let below = Aabb::new(0.0, 10.0, 10.0, 10.0);
        assert!(!overlaps(&a, &below));
    }

    #[test]
    fn test_separated_on_one_axis_misses() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(5.0, 20.0, 10.0, 10.0);
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn test_player_bounds_follow_lane() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);
        player.lane = 2;
        let bounds = player_bounds(&player, &config);
        assert_eq!(bounds.min, Vec2::new(140.0, 400.0));
        assert_eq!(bounds.max(), Vec2::new(180.0, 440.0));
    }

    #[test]
    fn test_airborne_player_clears_obstacle_top() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);
        let obstacle = Aabb::new(60.0, config.obstacle_y(), 56.0, 40.0);

        assert!(overlaps(&player_bounds(&player, &config), &obstacle));

        // Bottom edge exactly on the obstacle top: edge contact only
        player.y = config.obstacle_y() - config.player_size;
        assert!(!overlaps(&player_bounds(&player, &config), &obstacle));
    }
}
