//! Top-level game world
//!
//! Owns the session, coin field and boat. The presentation layer talks only to
//! this type: it issues commands, calls [`World::frame`] once per animation
//! frame, reads [`World::snapshot`] for drawing and reacts to the returned
//! [`GameEvent`]s (banners, sounds, sparkles).

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::boat::BoatState;
use super::coins::{CoinField, CoinView, CollectedCoin};
use super::session::{GameMode, GameSession, Phase, PhaseChange};
use crate::Tuning;
use crate::consts::SECOND_MS;

/// Discrete things that happened during a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    PhaseChanged(PhaseChange),
    /// Countdown value after a one-second step
    CountdownTick { remaining: u32 },
    CoinCollected(CollectedCoin),
    CoinRespawned { id: u32 },
    SpecialSpawned { id: u32 },
    /// A special coin timed out uncollected
    SpecialExpired { id: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoatView {
    pub position: Vec3,
    pub heading: f32,
}

/// Everything the HUD and renderer need for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: GameMode,
    pub phase: Phase,
    pub countdown: u32,
    pub time_remaining: u32,
    pub score: u64,
    pub collected_count: u32,
    pub boat: BoatView,
    pub coins: Vec<CoinView>,
}

/// Session + coins + boat, driven by wall-clock milliseconds
#[derive(Debug, Clone)]
pub struct World {
    pub(super) tuning: Tuning,
    pub session: GameSession,
    pub coins: CoinField,
    pub boat: BoatState,
    /// Due time of the next one-second step
    pub(super) next_second_ms: u64,
    /// Earliest time the coin pass may run again
    pub(super) next_logic_ms: u64,
    /// Whole seconds of active challenge play, for special spawns
    pub(super) active_secs: u32,
}

impl World {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let tuning = tuning.sanitized();
        Self {
            session: GameSession::new(&tuning),
            coins: CoinField::new(&tuning, seed),
            boat: BoatState::new(&tuning),
            tuning,
            next_second_ms: 0,
            next_logic_ms: 0,
            active_secs: 0,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Start (or restart) a run at time `now`
    pub fn start_game(&mut self, mode: GameMode, now: u64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if let Some(change) = self.session.start_game(mode) {
            events.push(GameEvent::PhaseChanged(change));
        }

        self.boat.reset();
        match mode {
            GameMode::CollectChallenge => self.coins.initialize(
                self.tuning.regular_coin_count,
                self.tuning.special_coin_count,
                now,
            ),
            GameMode::FreeRoam => self.coins.clear(),
        }

        self.next_second_ms = now.saturating_add(SECOND_MS);
        self.next_logic_ms = now;
        self.active_secs = 0;
        events
    }

    /// Quit the current run
    pub fn end_game(&mut self) -> Vec<GameEvent> {
        self.session
            .end_game()
            .map(GameEvent::PhaseChanged)
            .into_iter()
            .collect()
    }

    /// Pick the mode shown on the menu (ignored mid-run)
    pub fn set_mode(&mut self, mode: GameMode) {
        self.session.set_mode(mode);
    }

    pub fn snapshot(&self, now: u64) -> Snapshot {
        Snapshot {
            mode: self.session.mode(),
            phase: self.session.phase(),
            countdown: self.session.countdown(),
            time_remaining: self.session.time_remaining(),
            score: self.session.score(),
            collected_count: self.coins.collected_count(),
            boat: BoatView {
                position: self.boat.position,
                heading: self.boat.heading,
            },
            coins: self.coins.views(now),
        }
    }
}
