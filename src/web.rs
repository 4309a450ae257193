//! WASM bindings
//!
//! The three.js page owns rendering, input listeners and audio. It creates one
//! `BoatGame`, forwards keys and menu clicks, calls `frame` from its
//! requestAnimationFrame loop, and draws from `snapshot`. Times passed in are
//! wall-clock ms on the `Date.now()` clock.

use std::str::FromStr;

use wasm_bindgen::prelude::*;

use crate::HighScores;
use crate::sim::{Control, GameEvent, GameMode, Phase, World};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("MRR Boat module loaded");
}

/// Game handle exported to JS
#[wasm_bindgen]
pub struct BoatGame {
    world: World,
    high_scores: HighScores,
    /// Wall time of the previous frame (ms), 0 before the first one
    last_ms: f64,
}

#[wasm_bindgen]
impl BoatGame {
    /// Create a game. `tuning_json` may override any balance value.
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: Option<String>) -> Result<BoatGame, JsError> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json)?,
            None => Tuning::default(),
        };
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);
        Ok(BoatGame {
            world: World::new(tuning, seed),
            high_scores: HighScores::load(),
            last_ms: 0.0,
        })
    }

    /// Start a run: "free-roam" or "collect-mrr". Returns events JSON.
    pub fn start_game(&mut self, mode: &str) -> Result<String, JsError> {
        let mode = GameMode::from_str(mode)?;
        let events = self.world.start_game(mode, js_sys::Date::now() as u64);
        self.last_ms = 0.0;
        Ok(self.publish(&events))
    }

    pub fn end_game(&mut self) -> String {
        let events = self.world.end_game();
        self.publish(&events)
    }

    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsError> {
        self.world.set_mode(GameMode::from_str(mode)?);
        Ok(())
    }

    pub fn key_down(&mut self, key: &str) {
        if let Some(control) = Control::from_key(key) {
            self.world.boat.set_control(control, true);
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(control) = Control::from_key(key) {
            self.world.boat.set_control(control, false);
        }
    }

    /// Release every control (window blur, joystick end)
    pub fn release_controls(&mut self) {
        self.world.boat.controls = Default::default();
    }

    /// Advance one animation frame at wall time `now_ms`. Returns the frame's
    /// events as a JSON array.
    pub fn frame(&mut self, now_ms: f64) -> String {
        let dt = if self.last_ms > 0.0 {
            ((now_ms - self.last_ms) / 1000.0) as f32
        } else {
            1.0 / 60.0
        };
        self.last_ms = now_ms;

        let events = self.world.frame(now_ms as u64, dt);
        self.publish(&events)
    }

    /// State at `now_ms` as JSON (HUD values, boat pose, visible coins)
    pub fn snapshot(&self, now_ms: f64) -> String {
        let snapshot = self.world.snapshot(now_ms as u64);
        serde_json::to_string(&snapshot).unwrap_or_else(|e| {
            log::error!("Snapshot serialization failed: {}", e);
            "null".to_string()
        })
    }

    /// Leaderboard JSON, best run first
    pub fn best_scores(&self) -> String {
        serde_json::to_string(&self.high_scores).unwrap_or_else(|_| "{\"entries\":[]}".into())
    }
}

impl BoatGame {
    /// Record finished challenges, then serialize events for JS
    fn publish(&mut self, events: &[GameEvent]) -> String {
        let ended = events
            .iter()
            .any(|e| matches!(e, GameEvent::PhaseChanged(change) if change.to == Phase::Ended));
        if ended
            && self
                .high_scores
                .record_run(&self.world, js_sys::Date::now())
                .is_some()
        {
            self.high_scores.save();
        }

        serde_json::to_string(events).unwrap_or_else(|e| {
            log::error!("Event serialization failed: {}", e);
            "[]".to_string()
        })
    }
}
