//! Game session lifecycle
//!
//! Idle -> Countdown -> Active -> Ended, with Countdown only in the collect
//! challenge. Every operation is total: calls that do not apply to the current
//! phase are logged no-ops, and counters clamp at zero.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Tuning;

/// Selected game mode, fixed for the length of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Untimed sailing, no coins
    #[default]
    #[serde(rename = "free-roam")]
    FreeRoam,
    /// Timed coin collection with scoring
    #[serde(rename = "collect-mrr")]
    CollectChallenge,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::FreeRoam => "free-roam",
            GameMode::CollectChallenge => "collect-mrr",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized mode name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown game mode '{}'", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for GameMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free-roam" | "freeroam" => Ok(GameMode::FreeRoam),
            "collect-mrr" | "collect" | "challenge" => Ok(GameMode::CollectChallenge),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Mode-select menu, nothing running
    #[default]
    Idle,
    /// Pre-challenge countdown
    Countdown,
    /// Playing
    Active,
    /// Run finished (timer ran out or player quit)
    Ended,
}

/// A phase transition caused by a session operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub from: Phase,
    pub to: Phase,
}

/// Mode, phase, timers and score for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    mode: GameMode,
    phase: Phase,
    countdown: u32,
    time_remaining: u32,
    score: u64,
    countdown_start: u32,
    challenge_secs: u32,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(&Tuning::default())
    }
}

impl GameSession {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            mode: GameMode::default(),
            phase: Phase::Idle,
            countdown: tuning.countdown_secs,
            time_remaining: tuning.challenge_secs,
            score: 0,
            countdown_start: tuning.countdown_secs,
            challenge_secs: tuning.challenge_secs,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_counting_down(&self) -> bool {
        self.phase == Phase::Countdown
    }

    /// Countdown or Active: the session's cadences should be running
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Countdown | Phase::Active)
    }

    /// Coin collection, respawn and expiry only happen here
    pub fn coins_live(&self) -> bool {
        self.phase == Phase::Active && self.mode == GameMode::CollectChallenge
    }

    fn transition(&mut self, to: Phase) -> Option<PhaseChange> {
        let from = self.phase;
        if from == to {
            return None;
        }
        self.phase = to;
        log::debug!("Phase {:?} -> {:?}", from, to);
        Some(PhaseChange { from, to })
    }

    /// Begin a new run in `mode`, resetting timers and score
    pub fn start_game(&mut self, mode: GameMode) -> Option<PhaseChange> {
        if self.is_running() {
            log::info!("Restarting session mid-run ({:?})", self.phase);
        }
        self.mode = mode;
        self.score = 0;
        self.countdown = self.countdown_start;
        self.time_remaining = self.challenge_secs;

        let to = match mode {
            GameMode::CollectChallenge if self.countdown > 0 => Phase::Countdown,
            _ => Phase::Active,
        };
        log::info!("Starting {} session", mode);

        // A restart is reported even when the phase itself does not change
        let from = self.phase;
        self.phase = to;
        Some(PhaseChange { from, to })
    }

    /// Stop the run regardless of phase
    pub fn end_game(&mut self) -> Option<PhaseChange> {
        self.time_remaining = 0;
        self.transition(Phase::Ended)
    }

    /// Change mode between runs. Ignored while a run is in progress.
    pub fn set_mode(&mut self, mode: GameMode) {
        if self.is_running() {
            log::warn!("set_mode({}) ignored during {:?}", mode, self.phase);
            return;
        }
        self.mode = mode;
    }

    /// One countdown second. The call that reaches zero starts play.
    pub fn decrement_countdown(&mut self) -> Option<PhaseChange> {
        if self.phase != Phase::Countdown {
            log::debug!("decrement_countdown ignored during {:?}", self.phase);
            return None;
        }
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            return self.transition(Phase::Active);
        }
        None
    }

    /// One challenge second. The call that reaches zero ends the run.
    pub fn decrement_timer(&mut self) -> Option<PhaseChange> {
        if !self.coins_live() {
            log::warn!(
                "decrement_timer ignored ({} / {:?})",
                self.mode,
                self.phase
            );
            return None;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            log::info!("Time up! Final score: {}", self.score);
            return self.transition(Phase::Ended);
        }
        None
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }
}
