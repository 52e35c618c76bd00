//! Platform layer
//!
//! Browser glue for the wasm32 build:
//! - requestAnimationFrame loop driving [`crate::Game::frame`]
//! - Keyboard and swipe input
//! - Visibility/focus auto-pause
//! - Snapshot and game-over callbacks into the page's JS
//! - LocalStorage for settings and the leaderboard
//!
//! The native build has no platform layer; `main.rs` drives the game headless.

#[cfg(target_arch = "wasm32")]
pub mod storage;
#[cfg(target_arch = "wasm32")]
pub mod web;
