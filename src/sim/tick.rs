//! Frame and cadence scheduling
//!
//! The single owner of session time. Each frame advances the boat, replays any
//! due one-second steps (countdown, challenge timer, special spawns) and runs
//! the throttled coin pass. Nothing here holds timer handles: once the session
//! leaves Countdown/Active every cadence simply stops firing.

use super::coins::PruneReason;
use super::session::{GameMode, Phase};
use super::world::{GameEvent, World};
use crate::consts::{MAX_SECOND_CATCHUP, SECOND_MS};

/// Longest frame the boat integrates in one step (s)
pub const MAX_FRAME_DT: f32 = 0.1;

impl World {
    /// Advance one animation frame. `now` is wall-clock ms, `dt` the frame time
    /// in seconds.
    pub fn frame(&mut self, now: u64, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();

        self.boat.step(dt.clamp(0.0, MAX_FRAME_DT));
        self.run_seconds(now, &mut events);
        self.run_coin_pass(now, &mut events);

        events
    }

    fn run_seconds(&mut self, now: u64, events: &mut Vec<GameEvent>) {
        let mut steps = 0;
        while self.session.is_running() && now >= self.next_second_ms {
            if steps == MAX_SECOND_CATCHUP {
                // Tab was hidden or the frame stalled; don't burn the clock
                log::warn!(
                    "Skipping {}ms of session time",
                    now - self.next_second_ms
                );
                self.next_second_ms = now.saturating_add(SECOND_MS);
                break;
            }
            let at = self.next_second_ms;
            self.next_second_ms = at.saturating_add(SECOND_MS);
            steps += 1;
            self.second_step(at, events);
        }
    }

    /// One tick of the one-second cadence
    fn second_step(&mut self, at: u64, events: &mut Vec<GameEvent>) {
        match self.session.phase() {
            Phase::Countdown => {
                let change = self.session.decrement_countdown();
                events.push(GameEvent::CountdownTick {
                    remaining: self.session.countdown(),
                });
                if let Some(change) = change {
                    log::info!("Go!");
                    self.active_secs = 0;
                    events.push(GameEvent::PhaseChanged(change));
                }
            }
            Phase::Active if self.session.mode() == GameMode::CollectChallenge => {
                if let Some(change) = self.session.decrement_timer() {
                    events.push(GameEvent::PhaseChanged(change));
                    return;
                }
                self.active_secs += 1;
                if self.active_secs % self.tuning.special_spawn_interval_secs == 0 {
                    let id = self.coins.spawn_special(at);
                    events.push(GameEvent::SpecialSpawned { id });
                }
            }
            _ => {}
        }
    }

    /// Respawn, prune, then collide - at most once per logic interval
    fn run_coin_pass(&mut self, now: u64, events: &mut Vec<GameEvent>) {
        if now < self.next_logic_ms {
            return;
        }
        self.next_logic_ms = now.saturating_add(self.tuning.logic_interval_ms);
        if !self.session.coins_live() {
            return;
        }

        for id in self.coins.respawn_due(now) {
            events.push(GameEvent::CoinRespawned { id });
        }

        for pruned in self.coins.prune_expired(now) {
            if pruned.reason == PruneReason::Expired {
                log::debug!("Special coin {} expired", pruned.id);
                events.push(GameEvent::SpecialExpired { id: pruned.id });
            }
        }

        let radius = self.tuning.collision_radius;
        for hit in self.coins.check_collisions(self.boat.position, radius, now) {
            self.session.add_score(u64::from(hit.value));
            log::debug!("Collected coin {} (+{})", hit.id, hit.value);
            events.push(GameEvent::CoinCollected(hit));
        }
    }
}
