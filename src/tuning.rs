//! Data-driven game balance
//!
//! Every policy constant the simulation uses lives here so tests (and the web
//! page) can shorten timers or move bounds without touching gameplay code.

use serde::{Deserialize, Serialize};

use crate::Bounds;
use crate::consts::*;

/// Gameplay tuning, loadable from JSON. Missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Session ===
    /// Countdown length before a challenge starts (seconds)
    pub countdown_secs: u32,
    /// Challenge duration (seconds)
    pub challenge_secs: u32,

    // === Coins ===
    /// Regular coins placed at challenge start
    pub regular_coin_count: u32,
    /// Special coins placed at challenge start
    pub special_coin_count: u32,
    pub regular_value: u32,
    pub special_value: u32,
    /// Delay before a collected regular coin reappears (ms)
    pub respawn_delay_ms: u64,
    /// Lifetime of an uncollected special coin (ms)
    pub special_ttl_ms: u64,
    /// Active seconds between special coin spawns
    pub special_spawn_interval_secs: u32,
    /// Pickup distance between boat and coin
    pub collision_radius: f32,
    /// Coin height above the water plane
    pub coin_height: f32,
    /// Guaranteed first coin, (x, z)
    pub start_coin_xz: (f32, f32),
    /// Random placement region
    pub bounds: Bounds,

    // === Scheduling ===
    /// Minimum spacing of coin logic passes (ms)
    pub logic_interval_ms: u64,

    // === Boat ===
    /// Forward/backward speed (units/s)
    pub boat_speed: f32,
    /// Turn rate (radians/s)
    pub turn_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            countdown_secs: COUNTDOWN_SECS,
            challenge_secs: CHALLENGE_SECS,

            regular_coin_count: REGULAR_COIN_COUNT,
            special_coin_count: 0,
            regular_value: REGULAR_COIN_VALUE,
            special_value: SPECIAL_COIN_VALUE,
            respawn_delay_ms: RESPAWN_DELAY_MS,
            special_ttl_ms: SPECIAL_TTL_MS,
            special_spawn_interval_secs: SPECIAL_SPAWN_INTERVAL_SECS,
            collision_radius: COLLISION_RADIUS,
            coin_height: COIN_HEIGHT,
            start_coin_xz: START_COIN_XZ,
            bounds: Bounds::default(),

            logic_interval_ms: LOGIC_INTERVAL_MS,

            boat_speed: BOAT_SPEED,
            turn_speed: BOAT_TURN_SPEED,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON and sanitize the result
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Repair values that would break the simulation, warning about each one
    pub fn sanitized(mut self) -> Self {
        if !self.bounds.is_finite() {
            log::warn!("Non-finite coin bounds {:?}, using default", self.bounds);
            self.bounds = Bounds::default();
        }
        if !self.coin_height.is_finite() {
            log::warn!("Invalid coin height {}, using default", self.coin_height);
            self.coin_height = COIN_HEIGHT;
        }
        if !(self.start_coin_xz.0.is_finite() && self.start_coin_xz.1.is_finite()) {
            log::warn!("Invalid start coin position {:?}, using default", self.start_coin_xz);
            self.start_coin_xz = START_COIN_XZ;
        }
        for (name, ms) in [
            ("respawn_delay_ms", &mut self.respawn_delay_ms),
            ("special_ttl_ms", &mut self.special_ttl_ms),
            ("logic_interval_ms", &mut self.logic_interval_ms),
        ] {
            if *ms > MAX_DURATION_MS {
                log::warn!("{} = {} too large, clamping to {}", name, ms, MAX_DURATION_MS);
                *ms = MAX_DURATION_MS;
            }
        }
        if self.bounds.min_x > self.bounds.max_x || self.bounds.min_z > self.bounds.max_z {
            log::warn!("Inverted coin bounds {:?}, swapping", self.bounds);
            self.bounds = Bounds::new(
                self.bounds.min_x,
                self.bounds.max_x,
                self.bounds.min_z,
                self.bounds.max_z,
            );
        }
        if !self.collision_radius.is_finite() || self.collision_radius < 0.0 {
            log::warn!("Invalid collision radius {}, using default", self.collision_radius);
            self.collision_radius = COLLISION_RADIUS;
        }
        if self.logic_interval_ms == 0 {
            log::warn!("logic_interval_ms must be positive, using 1");
            self.logic_interval_ms = 1;
        }
        if self.special_spawn_interval_secs == 0 {
            log::warn!("special_spawn_interval_secs must be positive, using default");
            self.special_spawn_interval_secs = SPECIAL_SPAWN_INTERVAL_SECS;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "challenge_secs": 5, "respawn_delay_ms": 100 }"#)
            .expect("valid json");
        assert_eq!(tuning.challenge_secs, 5);
        assert_eq!(tuning.respawn_delay_ms, 100);
        assert_eq!(tuning.countdown_secs, 3);
        assert_eq!(tuning.regular_value, 10);
        assert_eq!(tuning.special_value, 50);
        assert_eq!(tuning.collision_radius, 6.0);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
        assert!(Tuning::from_json(r#"{ "challenge_secs": -1 }"#).is_err());
    }

    #[test]
    fn test_sanitize_repairs_values() {
        let tuning = Tuning::from_json(
            r#"{
                "bounds": { "min_x": 50, "max_x": -50, "min_z": -10, "max_z": 10 },
                "logic_interval_ms": 0,
                "special_spawn_interval_secs": 0,
                "collision_radius": -3
            }"#,
        )
        .expect("valid json");
        assert_eq!(tuning.bounds.min_x, -50.0);
        assert_eq!(tuning.bounds.max_x, 50.0);
        assert_eq!(tuning.logic_interval_ms, 1);
        assert_eq!(tuning.special_spawn_interval_secs, SPECIAL_SPAWN_INTERVAL_SECS);
        assert_eq!(tuning.collision_radius, COLLISION_RADIUS);
    }

    #[test]
    fn test_huge_durations_are_clamped() {
        let tuning = Tuning::from_json(
            r#"{
                "respawn_delay_ms": 18446744073709551615,
                "special_ttl_ms": 18446744073709551615,
                "logic_interval_ms": 18446744073709551615
            }"#,
        )
        .expect("valid json");
        assert_eq!(tuning.respawn_delay_ms, MAX_DURATION_MS);
        assert_eq!(tuning.special_ttl_ms, MAX_DURATION_MS);
        assert_eq!(tuning.logic_interval_ms, MAX_DURATION_MS);

        // The limit itself is accepted as is
        let tuning = Tuning::from_json(r#"{ "respawn_delay_ms": 86400000 }"#).expect("valid json");
        assert_eq!(tuning.respawn_delay_ms, MAX_DURATION_MS);
        assert_eq!(tuning.special_ttl_ms, SPECIAL_TTL_MS);
    }

    #[test]
    fn test_non_finite_geometry_uses_defaults() {
        let tuning = Tuning {
            bounds: Bounds {
                min_x: f32::NAN,
                max_x: 10.0,
                min_z: f32::NEG_INFINITY,
                max_z: f32::INFINITY,
            },
            coin_height: f32::NAN,
            start_coin_xz: (f32::INFINITY, 0.0),
            collision_radius: f32::NAN,
            ..Tuning::default()
        }
        .sanitized();
        assert_eq!(tuning.bounds, Bounds::default());
        assert_eq!(tuning.coin_height, COIN_HEIGHT);
        assert_eq!(tuning.start_coin_xz, START_COIN_XZ);
        assert_eq!(tuning.collision_radius, COLLISION_RADIUS);
    }
}
