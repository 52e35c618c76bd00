//! Sound cues
//!
//! The simulation only names cues; an [`AudioSink`] decides what they sound
//! like. The browser build plays them through `WebAudio`, which synthesises
//! every cue from oscillators.

use std::cell::RefCell;

/// Named sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Jump accepted
    Jump,
    /// Run ended
    Die,
    /// Power-up collected, or shield absorbed a hit
    PowerUp,
    /// Lane change accepted
    Score,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Jump => "jump",
            Cue::Die => "die",
            Cue::PowerUp => "powerup",
            Cue::Score => "score",
        }
    }
}

/// Fire-and-forget audio collaborator
pub trait AudioSink {
    /// Play a cue; never blocks, never fails
    fn play(&self, cue: Cue);
    /// Mute/unmute all cues
    fn set_muted(&mut self, muted: bool);
}

/// Silent sink for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&self, _cue: Cue) {}
    fn set_muted(&mut self, _muted: bool) {}
}

/// Remembers every cue that would have been audible
#[derive(Debug, Default)]
pub struct CueLog {
    played: RefCell<Vec<Cue>>,
    muted: bool,
}

impl CueLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues played so far, oldest first
    pub fn played(&self) -> Vec<Cue> {
        self.played.borrow().clone()
    }

    pub fn count(&self, cue: Cue) -> usize {
        self.played.borrow().iter().filter(|&&c| c == cue).count()
    }
}

impl AudioSink for CueLog {
    fn play(&self, cue: Cue) {
        if !self.muted {
            self.played.borrow_mut().push(cue);
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsValue;
    use web_sys::{AudioContext, AudioContextState, OscillatorType};

    use super::{AudioSink, Cue};
    use crate::settings::Settings;

    /// One oscillator note inside a cue
    struct Tone {
        wave: OscillatorType,
        freq: f32,
        /// Pitch glide target, reached 60% of the way through the note
        slide_to: Option<f32>,
        /// Offset from the cue start (s)
        delay: f64,
        /// Note length (s)
        length: f64,
        /// Peak gain before volume scaling
        level: f32,
    }

    impl Tone {
        const fn note(wave: OscillatorType, freq: f32, delay: f64, length: f64, level: f32) -> Self {
            Self {
                wave,
                freq,
                slide_to: None,
                delay,
                length,
                level,
            }
        }
    }

    fn tones(cue: Cue) -> Vec<Tone> {
        use OscillatorType::{Sine, Square, Triangle};
        match cue {
            // Upward sweep
            Cue::Jump => vec![Tone {
                slide_to: Some(660.0),
                ..Tone::note(Triangle, 220.0, 0.0, 0.18, 0.3)
            }],
            // Falling four-note phrase
            Cue::Die => [400.0, 350.0, 300.0, 200.0]
                .iter()
                .enumerate()
                .map(|(i, &f)| Tone::note(Sine, f, i as f64 * 0.15, 0.25, 0.3))
                .collect(),
            // Rising arpeggio
            Cue::PowerUp => [600.0, 800.0, 1000.0]
                .iter()
                .enumerate()
                .map(|(i, &f)| Tone::note(Sine, f, i as f64 * 0.08, 0.15, 0.25))
                .collect(),
            // Short blip
            Cue::Score => vec![Tone::note(Square, 520.0, 0.0, 0.06, 0.12)],
        }
    }

    /// Cue synthesiser on top of the Web Audio API
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // Fails outside a secure context
            let ctx = match AudioContext::new() {
                Ok(ctx) => Some(ctx),
                Err(e) => {
                    log::warn!("No AudioContext ({:?}), cues are silent", e);
                    None
                }
            };
            let defaults = Settings::default();
            Self {
                ctx,
                volume: defaults.mix_volume(),
                muted: defaults.muted,
            }
        }

        /// Take volume and mute state from user settings
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.muted = settings.muted;
            self.volume = settings.mix_volume();
        }

        fn schedule(ctx: &AudioContext, tone: &Tone, volume: f32) -> Result<(), JsValue> {
            let osc = ctx.create_oscillator()?;
            let gain = ctx.create_gain()?;
            osc.set_type(tone.wave);
            osc.connect_with_audio_node(&gain)?;
            gain.connect_with_audio_node(&ctx.destination())?;

            let start = ctx.current_time() + tone.delay;
            let end = start + tone.length;
            osc.frequency().set_value_at_time(tone.freq, start)?;
            if let Some(target) = tone.slide_to {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(target, start + tone.length * 0.6)?;
            }
            gain.gain().set_value_at_time(volume * tone.level, start)?;
            gain.gain().exponential_ramp_to_value_at_time(0.01, end)?;

            osc.start_with_when(start)?;
            osc.stop_with_when(end + 0.02)?;
            Ok(())
        }
    }

    impl AudioSink for WebAudio {
        fn play(&self, cue: Cue) {
            if self.muted || self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Autoplay policy keeps the context suspended until a user gesture
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in tones(cue) {
                if let Err(e) = Self::schedule(ctx, &tone, self.volume) {
                    log::debug!("Dropped {} tone: {:?}", cue.as_str(), e);
                    break;
                }
            }
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }
    }
}
