//! MRR Boat - steer a boat across the ocean and collect coins
//!
//! Core modules:
//! - `sim`: Session state machine, coin economy, boat kinematics and scheduler
//! - `tuning`: Data-driven game balance
//! - `highscores`: Challenge leaderboard
//! - `web`: WASM bindings for the JS presentation layer

pub mod highscores;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::HighScores;
pub use tuning::Tuning;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Countdown before a challenge (seconds)
    pub const COUNTDOWN_SECS: u32 = 3;
    /// Challenge duration (seconds)
    pub const CHALLENGE_SECS: u32 = 60;

    /// Regular coins seeded at challenge start
    pub const REGULAR_COIN_COUNT: u32 = 10;
    pub const REGULAR_COIN_VALUE: u32 = 10;
    pub const SPECIAL_COIN_VALUE: u32 = 50;
    /// Regular coin respawn delay (ms)
    pub const RESPAWN_DELAY_MS: u64 = 3_000;
    /// Special coin lifetime (ms)
    pub const SPECIAL_TTL_MS: u64 = 15_000;
    /// Seconds of active play between special spawns
    pub const SPECIAL_SPAWN_INTERVAL_SECS: u32 = 8;
    pub const COLLISION_RADIUS: f32 = 6.0;

    /// Height above water
    pub const COIN_HEIGHT: f32 = 1.5;
    /// First coin sits just ahead of the boat's spawn point
    pub const START_COIN_XZ: (f32, f32) = (0.0, 20.0);
    pub const BOUNDS_HALF_EXTENT: f32 = 100.0;

    /// Coin logic cadence (10 Hz, independent of frame rate)
    pub const LOGIC_INTERVAL_MS: u64 = 100;
    /// One-second cadence for countdown/timer
    pub const SECOND_MS: u64 = 1_000;
    /// Longest configurable delay or lifetime (one day, ms)
    pub const MAX_DURATION_MS: u64 = 24 * 60 * 60 * 1_000;
    /// Maximum one-second ticks replayed in a single frame
    pub const MAX_SECOND_CATCHUP: u32 = 5;

    /// Boat speed (0.5 units per 60 Hz frame)
    pub const BOAT_SPEED: f32 = 30.0;
    /// Boat turn rate (0.02 rad per 60 Hz frame)
    pub const BOAT_TURN_SPEED: f32 = 1.2;
}

/// Rectangular placement region on the water plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        use consts::BOUNDS_HALF_EXTENT;
        Self {
            min_x: -BOUNDS_HALF_EXTENT,
            max_x: BOUNDS_HALF_EXTENT,
            min_z: -BOUNDS_HALF_EXTENT,
            max_z: BOUNDS_HALF_EXTENT,
        }
    }
}

impl Bounds {
    /// Build bounds from two x and two z extents in any order
    pub fn new(x0: f32, x1: f32, z0: f32, z1: f32) -> Self {
        Self {
            min_x: x0.min(x1),
            max_x: x0.max(x1),
            min_z: z0.min(z1),
            max_z: z0.max(z1),
        }
    }

    /// All extents are finite numbers
    pub fn is_finite(&self) -> bool {
        [self.min_x, self.max_x, self.min_z, self.max_z]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Whether a point's x/z lies inside the region (y ignored)
    pub fn contains(&self, p: Vec3) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_z..=self.max_z).contains(&p.z)
    }

    /// Uniform random point at height `y`
    pub fn random_point<R: Rng>(&self, rng: &mut R, y: f32) -> Vec3 {
        Vec3::new(
            lerp(self.min_x, self.max_x, rng.random::<f32>()),
            y,
            lerp(self.min_z, self.max_z, rng.random::<f32>()),
        )
    }
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Distance on the water plane, ignoring height
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}
