//! Deterministic game simulation
//!
//! All gameplay logic lives here:
//! - Time comes in as wall-clock milliseconds, never read from the platform
//! - Seeded RNG only
//! - Stable iteration order (by coin id)
//! - No rendering or platform dependencies

pub mod boat;
pub mod coins;
pub mod session;
pub mod tick;
pub mod world;

pub use boat::{BoatState, Control, Controls};
pub use coins::{
    Coin, CoinField, CoinKind, CoinStyle, CoinView, CollectedCoin, PruneReason, PrunedCoin,
};
pub use session::{GameMode, GameSession, Phase, PhaseChange, UnknownMode};
pub use tick::MAX_FRAME_DT;
pub use world::{BoatView, GameEvent, Snapshot, World};
