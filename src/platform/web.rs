//! Browser runner
//!
//! The page constructs one [`WebRunner`], registers its render and game-over
//! callbacks, and calls `start()`. Listeners are installed once, in the
//! constructor. No `RefCell` borrow is held while calling into JS, so
//! callbacks are free to call back into the runner (e.g. restart from the
//! game-over handler).

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{KeyboardEvent, TouchEvent};

use crate::audio::WebAudio;
use crate::config::GameConfig;
use crate::game::{FrameOutcome, Game};
use crate::input::{Command, SwipeTracker, command_for_key};
use crate::leaderboard::LocalScores;
use crate::settings::Settings;
use crate::sim::Snapshot;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Lane Runner loaded");
}

struct Inner {
    game: Game<WebAudio, LocalScores>,
    settings: Settings,
    swipe: SwipeTracker,
    /// Pending requestAnimationFrame handle
    raf_handle: Option<i32>,
    on_frame: Option<js_sys::Function>,
    on_game_over: Option<js_sys::Function>,
}

type Shared = Rc<RefCell<Inner>>;

/// JS-facing handle to a game session
#[wasm_bindgen]
pub struct WebRunner {
    inner: Shared,
}

#[wasm_bindgen]
impl WebRunner {
    /// Create a runner; `config_json` overrides individual balance values
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebRunner, JsValue> {
        let config = match config_json {
            Some(json) => GameConfig::from_json(&json),
            None => Ok(GameConfig::default()),
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let settings = Settings::load();
        let mut audio = WebAudio::new();
        audio.apply_settings(&settings);

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(config, seed, audio, LocalScores::load())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let inner = Rc::new(RefCell::new(Inner {
            game,
            settings,
            swipe: SwipeTracker::default(),
            raf_handle: None,
            on_frame: None,
            on_game_over: None,
        }));

        install_listeners(&inner);
        log::info!("Runner ready");
        Ok(WebRunner { inner })
    }

    /// `callback(snapshotJson)` once per committed tick
    pub fn on_frame(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().on_frame = Some(callback);
    }

    /// `callback(finalScore)` once per run
    pub fn on_game_over(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().on_game_over = Some(callback);
    }

    /// Start a fresh run (also used to restart)
    pub fn start(&self) {
        let seed = js_sys::Date::now() as u64;
        self.inner.borrow_mut().game.restart(seed);
        schedule_frame(&self.inner);
    }

    pub fn pause(&self) -> bool {
        pause(&self.inner)
    }

    pub fn resume(&self) {
        resume(&self.inner);
    }

    pub fn move_left(&self) {
        self.inner.borrow_mut().game.submit(Command::MoveLeft);
    }

    pub fn move_right(&self) {
        self.inner.borrow_mut().game.submit(Command::MoveRight);
    }

    pub fn jump(&self) {
        self.inner.borrow_mut().game.submit(Command::Jump);
    }

    pub fn set_muted(&self, muted: bool) {
        let mut g = self.inner.borrow_mut();
        g.game.set_muted(muted);
        g.settings.muted = muted;
        g.settings.save();
    }

    /// Name recorded with this device's leaderboard entries; blank means the default
    pub fn set_player_name(&self, name: &str) {
        self.inner.borrow_mut().game.scores_mut().set_player_name(name);
    }

    pub fn set_autopilot(&self, on: bool) {
        self.inner.borrow_mut().game.set_autopilot(on);
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().game.is_running()
    }

    /// Current snapshot as JSON
    pub fn snapshot(&self) -> String {
        let snapshot = self.inner.borrow().game.snapshot();
        serde_json::to_string(&snapshot).unwrap_or_default()
    }

    /// Leaderboard as a JSON array of `{ name, score }`
    pub fn leaderboard(&self) -> String {
        let entries = self.inner.borrow().game.leaderboard();
        serde_json::to_string(&entries).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Pause and cancel the pending frame; returns false if the run wasn't live
fn pause(inner: &Shared) -> bool {
    let handle = {
        let mut g = inner.borrow_mut();
        if !g.game.pause() {
            return false;
        }
        g.raf_handle.take()
    };
    if let (Some(handle), Some(window)) = (handle, web_sys::window()) {
        let _ = window.cancel_animation_frame(handle);
    }
    true
}

fn resume(inner: &Shared) {
    if inner.borrow_mut().game.resume() {
        schedule_frame(inner);
    }
}

/// Request the next animation frame unless one is pending or the run is not live
fn schedule_frame(inner: &Shared) {
    {
        let g = inner.borrow();
        if g.raf_handle.is_some() || !g.game.is_running() {
            return;
        }
    }
    let Some(window) = web_sys::window() else {
        return;
    };

    let shared = inner.clone();
    let callback = Closure::once_into_js(move |time: f64| game_loop(shared, time));
    match window.request_animation_frame(callback.unchecked_ref()) {
        Ok(handle) => inner.borrow_mut().raf_handle = Some(handle),
        Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
    }
}

fn game_loop(inner: Shared, time: f64) {
    let (outcome, on_frame, on_game_over) = {
        let mut g = inner.borrow_mut();
        g.raf_handle = None;
        let outcome = g.game.frame(time);
        (outcome, g.on_frame.clone(), g.on_game_over.clone())
    };

    match outcome {
        FrameOutcome::Idle => {}
        FrameOutcome::Continue(snapshot) => {
            emit_snapshot(on_frame.as_ref(), &snapshot);
            schedule_frame(&inner);
        }
        FrameOutcome::GameOver {
            final_score,
            snapshot,
        } => {
            emit_snapshot(on_frame.as_ref(), &snapshot);
            if let Some(cb) = on_game_over {
                if let Err(e) = cb.call1(&JsValue::NULL, &JsValue::from_f64(final_score as f64)) {
                    log::warn!("Game-over callback threw: {:?}", e);
                }
            }
        }
    }
}

fn emit_snapshot(callback: Option<&js_sys::Function>, snapshot: &Snapshot) {
    let Some(cb) = callback else { return };
    match serde_json::to_string(snapshot) {
        Ok(json) => {
            if let Err(e) = cb.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                log::warn!("Frame callback threw: {:?}", e);
            }
        }
        Err(e) => log::warn!("Failed to encode snapshot: {}", e),
    }
}

fn install_listeners(inner: &Shared) {
    let Some(window) = web_sys::window() else {
        log::warn!("No window - input disabled");
        return;
    };
    let Some(document) = window.document() else {
        log::warn!("No document - input disabled");
        return;
    };

    // Keyboard
    {
        let inner = inner.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = event.key();
            match key.as_str() {
                "Escape" | "p" | "P" if !event.repeat() => {
                    if !pause(&inner) {
                        resume(&inner);
                    }
                }
                "i" | "I" if !event.repeat() => {
                    let mut g = inner.borrow_mut();
                    let on = !g.game.autopilot();
                    g.game.set_autopilot(on);
                }
                _ => {
                    if let Some(command) = command_for_key(&key, event.repeat()) {
                        event.prevent_default();
                        inner.borrow_mut().game.submit(command);
                    }
                }
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Touch start
    {
        let inner = inner.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            let touches = event.touches();
            if let Some(touch) = touches.get(0) {
                inner.borrow_mut().swipe.begin(
                    touches.length(),
                    touch.client_x() as f32,
                    touch.client_y() as f32,
                );
            }
        });
        let _ = document
            .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Touch end - swipe resolves here
    {
        let inner = inner.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            let Some(touch) = event.changed_touches().get(0) else {
                return;
            };
            let mut g = inner.borrow_mut();
            if let Some(command) = g.swipe.end(touch.client_x() as f32, touch.client_y() as f32) {
                event.prevent_default();
                g.game.submit(command);
            }
        });
        let _ = document
            .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Touch cancel
    {
        let inner = inner.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
            inner.borrow_mut().swipe.cancel();
        });
        let _ = document
            .add_event_listener_with_callback("touchcancel", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Visibility change (tab switch, minimize)
    {
        let inner = inner.clone();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden
                && inner.borrow().settings.pause_on_blur
                && pause(&inner)
            {
                log::info!("Auto-paused (tab hidden)");
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Window blur (click outside)
    {
        let inner = inner.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let pause_on_blur = inner.borrow().settings.pause_on_blur;
            if pause_on_blur && pause(&inner) {
                log::info!("Auto-paused (window blur)");
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
