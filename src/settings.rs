//! Player preferences
//!
//! Persisted separately from scores in LocalStorage.

use serde::{Deserialize, Serialize};

/// Preferences that outlive a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub muted: bool,
    /// Overall gain, 0..=1
    pub master_volume: f32,
    /// Cue gain on top of `master_volume`, 0..=1
    pub sfx_volume: f32,
    /// Pause the run when the tab is hidden or the window loses focus
    pub pause_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pause_on_blur: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Cue gain ignoring mute
    pub fn mix_volume(&self) -> f32 {
        self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
    }

    /// Volume actually applied to cues
    pub fn effective_volume(&self) -> f32 {
        match self.muted {
            true => 0.0,
            false => self.mix_volume(),
        }
    }

    /// Flip mute and return the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Stored under this key in the browser
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "lane_runner_settings";

    /// Saved preferences, or defaults when nothing usable is stored
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        crate::platform::storage::read(Self::STORAGE_KEY).unwrap_or_else(|| {
            log::info!("No saved settings, using defaults");
            Self::default()
        })
    }

    /// Persist preferences; failures only cost the user their preferences
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        if let Err(e) = crate::platform::storage::write(Self::STORAGE_KEY, self) {
            log::warn!("Settings not saved: {}", e);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}
