//! Player movement: lane shifts and jump integration

use super::state::Player;

/// Lane shift direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneShift {
    Left,
    Right,
}

/// Move one lane if the boundary allows it; returns whether the player moved
pub fn shift_lane(player: &mut Player, shift: LaneShift, lanes: usize) -> bool {
    match shift {
        LaneShift::Left if player.lane > 0 => {
            player.lane -= 1;
            true
        }
        LaneShift::Right if player.lane + 1 < lanes => {
            player.lane += 1;
            true
        }
        _ => false,
    }
}

/// Start a jump from rest; a jump already in progress is left alone
pub fn try_jump(player: &mut Player, jump_velocity: f32) -> bool {
    if player.is_jumping {
        return false;
    }
    player.vy = jump_velocity;
    player.is_jumping = true;
    true
}

/// Advance one tick of vertical motion, landing exactly on the ground line
pub fn integrate_jump(player: &Player, gravity: f32, ground_y: f32) -> Player {
    let mut next = player.clone();
    if !next.is_jumping {
        return next;
    }

    next.vy += gravity;
    next.y += next.vy;
    if next.y >= ground_y {
        next.y = ground_y;
        next.vy = 0.0;
        next.is_jumping = false;
    }
    next
}
