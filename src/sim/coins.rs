//! Coin field: spawning, collection, respawn and expiry
//!
//! Regular coins cycle forever (collect -> wait -> reappear elsewhere).
//! Special coins are one-shot: collected or expired, they are removed and their
//! id is never handed out again. Iteration is always in id order.

use std::collections::BTreeMap;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{Bounds, Tuning, horizontal_distance};

/// Coin types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinKind {
    Regular,
    Special,
}

/// Render-only animation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinStyle {
    /// Spin rate
    pub rotation_speed: f32,
    /// Bob frequency (per ms)
    pub bob_frequency: f32,
    pub bob_phase: f32,
}

impl CoinStyle {
    fn random<R: Rng>(rng: &mut R, kind: CoinKind) -> Self {
        // Special coins spin and bob a little faster
        let (spin, bob) = match kind {
            CoinKind::Regular => (0.02, 0.002),
            CoinKind::Special => (0.03, 0.003),
        };
        Self {
            rotation_speed: spin + rng.random::<f32>() * 0.02,
            bob_frequency: bob + rng.random::<f32>() * 0.001,
            bob_phase: rng.random::<f32>() * std::f32::consts::TAU,
        }
    }
}

/// A collectible coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub position: Vec3,
    pub kind: CoinKind,
    pub value: u32,
    pub collected: bool,
    /// When a collected regular coin comes back (ms)
    pub respawn_at: Option<u64>,
    /// When an uncollected special coin disappears (ms)
    pub expires_at: Option<u64>,
    pub style: CoinStyle,
}

/// A coin picked up by a collision check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectedCoin {
    pub id: u32,
    pub value: u32,
    pub kind: CoinKind,
    pub position: Vec3,
}

/// Why a special coin left the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PruneReason {
    Collected,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrunedCoin {
    pub id: u32,
    pub reason: PruneReason,
}

/// What the renderer needs to draw one coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinView {
    pub id: u32,
    pub position: Vec3,
    pub kind: CoinKind,
    pub value: u32,
    /// Milliseconds until a special coin expires
    pub remaining_ms: Option<u64>,
    pub style: CoinStyle,
}

/// All coins in play plus placement policy
#[derive(Debug, Clone)]
pub struct CoinField {
    coins: BTreeMap<u32, Coin>,
    bounds: Bounds,
    collected_count: u32,
    /// Lowest id that has never been used
    next_id: u32,
    rng: Pcg32,
    height: f32,
    start_xz: (f32, f32),
    regular_value: u32,
    special_value: u32,
    respawn_delay_ms: u64,
    special_ttl_ms: u64,
}

impl CoinField {
    pub fn new(tuning: &Tuning, seed: u64) -> Self {
        Self {
            coins: BTreeMap::new(),
            bounds: tuning.bounds,
            collected_count: 0,
            next_id: 0,
            rng: Pcg32::seed_from_u64(seed),
            height: tuning.coin_height,
            start_xz: tuning.start_coin_xz,
            regular_value: tuning.regular_value,
            special_value: tuning.special_value,
            respawn_delay_ms: tuning.respawn_delay_ms,
            special_ttl_ms: tuning.special_ttl_ms,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Total collection events (not value)
    pub fn collected_count(&self) -> u32 {
        self.collected_count
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Coin> {
        self.coins.get(&id)
    }

    /// Coins in id order
    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.coins.values()
    }

    /// Remove every coin and reset the collection counter
    pub fn clear(&mut self) {
        self.coins.clear();
        self.collected_count = 0;
    }

    fn make_coin(&mut self, id: u32, kind: CoinKind, position: Vec3, now: u64) -> Coin {
        let (value, expires_at) = match kind {
            CoinKind::Regular => (self.regular_value, None),
            CoinKind::Special => (self.special_value, Some(now.saturating_add(self.special_ttl_ms))),
        };
        Coin {
            id,
            position,
            kind,
            value,
            collected: false,
            respawn_at: None,
            expires_at,
            style: CoinStyle::random(&mut self.rng, kind),
        }
    }

    fn insert(&mut self, coin: Coin) {
        self.next_id = self.next_id.max(coin.id + 1);
        self.coins.insert(coin.id, coin);
    }

    fn random_position(&mut self) -> Vec3 {
        self.bounds.random_point(&mut self.rng, self.height)
    }

    /// Replace the field with `regular` regular coins (the first at the start
    /// position) followed by `special` special coins
    pub fn initialize(&mut self, regular: u32, special: u32, now: u64) {
        self.clear();

        for id in 0..regular {
            let position = if id == 0 {
                Vec3::new(self.start_xz.0, self.height, self.start_xz.1)
            } else {
                self.random_position()
            };
            let coin = self.make_coin(id, CoinKind::Regular, position, now);
            self.insert(coin);
        }
        for i in 0..special {
            let position = self.random_position();
            let coin = self.make_coin(regular + i, CoinKind::Special, position, now);
            self.insert(coin);
        }

        log::info!("Coin field initialized: {} regular, {} special", regular, special);
    }

    /// Add one special coin at a random position. Returns its id.
    pub fn spawn_special(&mut self, now: u64) -> u32 {
        let after_max = self.coins.keys().next_back().map_or(0, |max| max + 1);
        let id = after_max.max(self.next_id);
        let position = self.random_position();
        let coin = self.make_coin(id, CoinKind::Special, position, now);
        self.insert(coin);
        log::debug!("Special coin {} spawned at {:?}", id, position);
        id
    }

    /// Mark a coin collected. Returns its value, or `None` if the coin is
    /// missing or already collected.
    pub fn collect(&mut self, id: u32, now: u64) -> Option<u32> {
        let respawn_delay = self.respawn_delay_ms;
        let coin = self.coins.get_mut(&id).filter(|c| !c.collected)?;
        coin.collected = true;
        if coin.kind == CoinKind::Regular {
            coin.respawn_at = Some(now.saturating_add(respawn_delay));
        }
        self.collected_count += 1;
        Some(coin.value)
    }

    /// Bring back every collected regular coin whose delay has elapsed
    pub fn respawn_due(&mut self, now: u64) -> Vec<u32> {
        let due: Vec<u32> = self
            .coins
            .values()
            .filter(|c| c.kind == CoinKind::Regular && c.collected)
            .filter(|c| c.respawn_at.is_some_and(|t| t <= now))
            .map(|c| c.id)
            .collect();

        for &id in &due {
            let position = self.random_position();
            if let Some(coin) = self.coins.get_mut(&id) {
                coin.position = position;
                coin.collected = false;
                coin.respawn_at = None;
            }
        }
        due
    }

    /// Drop special coins that were collected or have outlived their TTL
    pub fn prune_expired(&mut self, now: u64) -> Vec<PrunedCoin> {
        let mut pruned = Vec::new();
        self.coins.retain(|&id, coin| {
            if coin.kind != CoinKind::Special {
                return true;
            }
            let reason = if coin.collected {
                PruneReason::Collected
            } else if coin.expires_at.is_some_and(|t| t <= now) {
                PruneReason::Expired
            } else {
                return true;
            };
            pruned.push(PrunedCoin { id, reason });
            false
        });
        pruned
    }

    /// Collect every uncollected coin within `radius` of the boat (on the
    /// water plane). Each coin is reported once.
    pub fn check_collisions(&mut self, boat: Vec3, radius: f32, now: u64) -> Vec<CollectedCoin> {
        let hits: Vec<u32> = self
            .coins
            .values()
            .filter(|c| !c.collected && horizontal_distance(c.position, boat) < radius)
            .map(|c| c.id)
            .collect();

        let mut collected = Vec::with_capacity(hits.len());
        for id in hits {
            let Some(value) = self.collect(id, now) else {
                continue;
            };
            if let Some(coin) = self.coins.get(&id) {
                collected.push(CollectedCoin {
                    id,
                    value,
                    kind: coin.kind,
                    position: coin.position,
                });
            }
        }
        collected
    }

    /// Visible coins for rendering
    pub fn views(&self, now: u64) -> Vec<CoinView> {
        self.coins
            .values()
            .filter(|c| !c.collected)
            .map(|c| CoinView {
                id: c.id,
                position: c.position,
                kind: c.kind,
                value: c.value,
                remaining_ms: c.expires_at.map(|t| t.saturating_sub(now)),
                style: c.style,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const T0: u64 = 1_000_000;

    fn field() -> CoinField {
        CoinField::new(&Tuning::default(), 42)
    }

    #[test]
    fn test_initialize_layout() {
        let mut field = field();
        field.initialize(10, 0, T0);

        assert_eq!(field.len(), 10);
        let ids: Vec<u32> = field.iter().map(|c| c.id).collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());

        let first = field.get(0).unwrap();
        assert_eq!(first.position, Vec3::new(0.0, 1.5, 20.0));

        for coin in field.iter() {
            assert_eq!(coin.kind, CoinKind::Regular);
            assert_eq!(coin.value, 10);
            assert!(!coin.collected);
            assert!(coin.expires_at.is_none());
            assert!(field.bounds().contains(coin.position));
            assert_eq!(coin.position.y, 1.5);
        }
    }

    #[test]
    fn test_initialize_with_specials() {
        let mut field = field();
        field.initialize(4, 2, T0);
        let specials: Vec<&Coin> = field.iter().filter(|c| c.kind == CoinKind::Special).collect();
        assert_eq!(specials.len(), 2);
        assert_eq!(specials[0].id, 4);
        assert_eq!(specials[1].id, 5);
        assert_eq!(specials[0].value, 50);
        assert_eq!(specials[0].expires_at, Some(T0 + 15_000));
    }

    #[test]
    fn test_initialize_replaces_previous_field() {
        let mut field = field();
        field.initialize(10, 0, T0);
        field.collect(3, T0);
        field.initialize(2, 0, T0);
        assert_eq!(field.len(), 2);
        assert_eq!(field.collected_count(), 0);
    }

    #[test]
    fn test_spawn_special_next_id() {
        let mut field = field();
        field.initialize(3, 0, T0);
        let id = field.spawn_special(T0);
        assert_eq!(id, 3);
        let coin = field.get(3).unwrap();
        assert_eq!(coin.kind, CoinKind::Special);
        assert_eq!(coin.expires_at, Some(T0 + 15_000));
        assert!(coin.respawn_at.is_none());
    }

    #[test]
    fn test_spawn_special_on_empty_field() {
        let mut field = field();
        assert_eq!(field.spawn_special(T0), 0);
    }

    #[test]
    fn test_removed_ids_are_not_reused() {
        let mut field = field();
        field.initialize(3, 0, T0);
        let id = field.spawn_special(T0);
        field.collect(id, T0);
        field.prune_expired(T0);
        assert!(field.get(id).is_none());

        let next = field.spawn_special(T0);
        assert_eq!(next, id + 1);
    }

    #[test]
    fn test_collect_is_idempotent() {
        let mut field = field();
        field.initialize(10, 0, T0);

        assert_eq!(field.collect(5, T0), Some(10));
        assert_eq!(field.collected_count(), 1);
        assert_eq!(field.get(5).unwrap().respawn_at, Some(T0 + 3_000));

        assert_eq!(field.collect(5, T0 + 10), None);
        assert_eq!(field.collected_count(), 1);
        assert_eq!(field.get(5).unwrap().respawn_at, Some(T0 + 3_000));

        assert_eq!(field.collect(99, T0), None);
        assert_eq!(field.collected_count(), 1);
    }

    #[test]
    fn test_regular_respawn() {
        let mut field = field();
        field.initialize(10, 0, T0);
        field.collect(0, T0);

        assert!(field.respawn_due(T0 + 2_999).is_empty());
        assert!(field.get(0).unwrap().collected);

        assert_eq!(field.respawn_due(T0 + 3_000), vec![0]);
        let coin = field.get(0).unwrap();
        assert!(!coin.collected);
        assert!(coin.respawn_at.is_none());
        assert!(field.bounds().contains(coin.position));
        assert_eq!(coin.position.y, 1.5);
    }

    #[test]
    fn test_collected_special_never_respawns() {
        let mut field = field();
        field.initialize(1, 0, T0);
        let id = field.spawn_special(T0);
        assert_eq!(field.collect(id, T0), Some(50));
        assert!(field.get(id).unwrap().respawn_at.is_none());

        assert!(field.respawn_due(T0 + 60_000).is_empty());
        assert!(field.get(id).unwrap().collected);

        let pruned = field.prune_expired(T0 + 1);
        assert_eq!(
            pruned,
            vec![PrunedCoin {
                id,
                reason: PruneReason::Collected
            }]
        );
    }

    #[test]
    fn test_special_expiry_boundary() {
        let mut field = field();
        field.initialize(2, 0, T0);
        let id = field.spawn_special(T0);

        assert!(field.prune_expired(T0 + 14_999).is_empty());
        assert!(field.get(id).is_some());

        let pruned = field.prune_expired(T0 + 15_000);
        assert_eq!(pruned[0].reason, PruneReason::Expired);
        assert!(field.get(id).is_none());
        // Regular coins untouched
        assert_eq!(field.len(), 2);
    }

    #[test]
    fn test_collision_at_coin_position() {
        let mut field = field();
        field.initialize(10, 0, T0);
        let target = field.get(0).unwrap().position;

        let hits = field.check_collisions(target, 6.0, T0);
        assert!(hits.iter().any(|h| h.id == 0 && h.value == 10));
        let coin = field.get(0).unwrap();
        assert!(coin.collected);
        assert_eq!(coin.respawn_at, Some(T0 + 3_000));
    }

    #[test]
    fn test_collision_ignores_height() {
        let mut field = field();
        field.initialize(1, 0, T0);
        // Boat on the water, 5 units short of the first coin
        let hits = field.check_collisions(Vec3::new(0.0, 0.0, 15.0), 6.0, T0);
        assert_eq!(hits.len(), 1);
        // Outside the radius
        field.respawn_due(T0 + 3_000);
        let coin = field.get(0).unwrap().position;
        let far = coin + Vec3::new(6.5, 0.0, 0.0);
        assert!(field.check_collisions(far, 6.0, T0 + 3_000).is_empty());
    }

    #[test]
    fn test_multiple_coins_one_check() {
        let tuning = Tuning {
            bounds: Bounds::new(-1.0, 1.0, -1.0, 1.0),
            start_coin_xz: (0.0, 0.0),
            ..Tuning::default()
        };
        let mut field = CoinField::new(&tuning, 3);
        field.initialize(5, 0, T0);
        let id = field.spawn_special(T0);

        let hits = field.check_collisions(Vec3::ZERO, 6.0, T0);
        assert_eq!(hits.len(), 6);
        assert_eq!(field.collected_count(), 6);
        assert_eq!(hits.iter().map(|h| h.value).sum::<u32>(), 5 * 10 + 50);
        assert!(hits.iter().any(|h| h.id == id && h.kind == CoinKind::Special));

        // Nothing left to collect
        assert!(field.check_collisions(Vec3::ZERO, 6.0, T0).is_empty());
    }

    #[test]
    fn test_views_hide_collected() {
        let mut field = field();
        field.initialize(3, 0, T0);
        let id = field.spawn_special(T0);
        field.collect(1, T0);

        let views = field.views(T0 + 5_000);
        assert_eq!(views.len(), 3);
        assert!(views.iter().all(|v| v.id != 1));
        let special = views.iter().find(|v| v.id == id).unwrap();
        assert_eq!(special.remaining_ms, Some(10_000));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut a = field();
        let mut b = field();
        a.initialize(10, 2, T0);
        b.initialize(10, 2, T0);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.position, y.position);
            assert_eq!(x.style, y.style);
        }
    }

    #[test]
    fn test_extreme_durations_saturate() {
        let tuning = Tuning {
            respawn_delay_ms: u64::MAX,
            special_ttl_ms: u64::MAX,
            ..Tuning::default()
        };
        let mut field = CoinField::new(&tuning, 9);
        let now = u64::MAX - 10;
        field.initialize(2, 0, now);
        let id = field.spawn_special(now);
        assert_eq!(field.get(id).unwrap().expires_at, Some(u64::MAX));

        assert_eq!(field.collect(0, now), Some(10));
        assert_eq!(field.get(0).unwrap().respawn_at, Some(u64::MAX));

        // Still pending a moment later
        assert!(field.respawn_due(now + 5).is_empty());
        assert!(field.prune_expired(now + 5).is_empty());
        let special = field.views(now + 5).into_iter().find(|v| v.id == id).unwrap();
        assert_eq!(special.remaining_ms, Some(5));
    }

    proptest! {
        #[test]
        fn prop_collect_counts_once(ids in proptest::collection::vec(0u32..15, 0..40)) {
            let mut field = field();
            field.initialize(10, 0, T0);
            let mut seen = std::collections::BTreeSet::new();
            for id in ids {
                let first = id < 10 && seen.insert(id);
                let result = field.collect(id, T0);
                prop_assert_eq!(result.is_some(), first);
                prop_assert_eq!(field.collected_count() as usize, seen.len());
            }
        }

        #[test]
        fn prop_respawn_stays_in_bounds(seed in any::<u64>(), delay in 0u64..10_000) {
            let mut field = CoinField::new(&Tuning::default(), seed);
            field.initialize(10, 0, T0);
            for id in 0..10 {
                field.collect(id, T0);
            }
            let respawned = field.respawn_due(T0 + 3_000 + delay);
            prop_assert_eq!(respawned.len(), 10);
            for coin in field.iter() {
                prop_assert!(!coin.collected);
                prop_assert!(field.bounds().contains(coin.position));
            }
        }
    }
}
