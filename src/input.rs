//! Input adapter
//!
//! Translates raw key and touch data into the three simulation commands and
//! buffers them until the next tick drains the queue.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_PENDING_COMMANDS;

/// Minimum horizontal swipe distance (px) for a lane change
pub const SWIPE_MIN_X: f32 = 24.0;
/// Minimum upward swipe distance (px) for a jump
pub const SWIPE_MIN_Y: f32 = 22.0;

/// Player intent consumed by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Jump,
}

/// Map a `KeyboardEvent.key` value to a command. Auto-repeat is ignored.
pub fn command_for_key(key: &str, repeat: bool) -> Option<Command> {
    if repeat {
        return None;
    }
    match key {
        "ArrowLeft" | "a" | "A" => Some(Command::MoveLeft),
        "ArrowRight" | "d" | "D" => Some(Command::MoveRight),
        "ArrowUp" | "w" | "W" | " " => Some(Command::Jump),
        _ => None,
    }
}

/// Turns a touch start/end pair into a swipe command
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    start: Option<Vec2>,
}

impl SwipeTracker {
    /// Record where a single-finger touch began; multi-touch is ignored
    pub fn begin(&mut self, touches: u32, x: f32, y: f32) {
        if touches == 1 {
            self.start = Some(Vec2::new(x, y));
        }
    }

    /// Finish the gesture. The dominant axis decides between lane change and jump.
    pub fn end(&mut self, x: f32, y: f32) -> Option<Command> {
        let start = self.start.take()?;
        let delta = Vec2::new(x, y) - start;

        if delta.x.abs() > delta.y.abs() {
            if delta.x > SWIPE_MIN_X {
                Some(Command::MoveRight)
            } else if delta.x < -SWIPE_MIN_X {
                Some(Command::MoveLeft)
            } else {
                None
            }
        } else if delta.y < -SWIPE_MIN_Y {
            Some(Command::Jump)
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}

/// Commands waiting for the next tick
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer a command; returns false if the queue is full and it was dropped
    pub fn push(&mut self, command: Command) -> bool {
        if self.pending.len() >= MAX_PENDING_COMMANDS {
            log::debug!("Command queue full, dropping {:?}", command);
            return false;
        }
        self.pending.push_back(command);
        true
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&mut self) -> Vec<Command> {
        self.pending.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
