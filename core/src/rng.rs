//! Deterministic random number generation.
//!
//! RULE: Nothing in the career may call any platform RNG.
//! All randomness flows through SimRng instances derived
//! from the single master seed stored on the Career record.
//!
//! Each slot gets its own stream, seeded deterministically
//! from (master_seed XOR slot_index XOR tick). This means:
//!   - Adding a new slot never changes existing slots' streams.
//!   - Each slot's stream is fully reproducible in isolation.
//!   - A stream can be rebuilt for any tick without replaying earlier ones.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};

use crate::types::Tick;

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// A deterministic RNG stream. Serialisable so a live match can be
/// saved mid-game and resumed on exactly the same draw sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimRng {
    inner: Pcg64Mcg,
}

impl SimRng {
    pub fn from_seed(seed: u64) -> Self {
        Self { inner: Pcg64Mcg::seed_from_u64(seed) }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll an index into a slice of length `len`.
    pub fn pick_index(&mut self, len: usize) -> usize {
        self.next_u64_below(len as u64) as usize
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform float in [lo, hi).
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Approximate normal draw (Irwin–Hall, 6 uniforms).
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let sum: f64 = (0..6).map(|_| self.next_f64()).sum();
        mean + (sum - 3.0) * std_dev * std::f64::consts::SQRT_2
    }

    /// Pick an index with probability proportional to `weights`.
    /// Returns None when every weight is zero.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let mut roll = self.next_f64() * total;
        for (i, w) in weights.iter().enumerate() {
            if *w <= 0.0 {
                continue;
            }
            if roll < *w {
                return Some(i);
            }
            roll -= w;
        }
        weights.iter().rposition(|w| *w > 0.0)
    }

    /// Fisher–Yates shuffle driven by this stream.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.pick_index(i + 1);
            items.swap(i, j);
        }
    }
}

/// All RNG streams for a single career, indexed by stable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// The stream for `slot` at `tick`.
    pub fn for_slot_at_tick(&self, slot: RngSlot, tick: Tick) -> SimRng {
        SimRng::from_seed(self.derive(slot as u64, tick))
    }

    /// Default seed for a fixture when the caller supplies none.
    pub fn match_seed(&self, fixture_id: u32, season: u16) -> u64 {
        self.derive(RngSlot::Match as u64, ((season as u64) << 32) | fixture_id as u64)
    }

    fn derive(&self, slot_index: u64, salt: u64) -> u64 {
        let mut x = self.master_seed ^ slot_index.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA);
        x ^= salt.wrapping_mul(0xbf58_476d_1ce4_e5b9);
        // splitmix64 finaliser
        x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        x ^ (x >> 31)
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries. Only append.
/// Reordering changes every stream's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum RngSlot {
    World = 0,
    Match = 1,
    Transfer = 2,
    Scouting = 3,
    Season = 4,
    // Add new slots here, append only.
}

impl RngSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::World => "world",
            Self::Match => "match",
            Self::Transfer => "transfer",
            Self::Scouting => "scouting",
            Self::Season => "season",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_slot_and_tick_give_same_stream() {
        let bank = RngBank::new(42);
        let mut a = bank.for_slot_at_tick(RngSlot::Transfer, 7);
        let mut b = bank.for_slot_at_tick(RngSlot::Transfer, 7);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn slots_and_ticks_are_independent() {
        let bank = RngBank::new(42);
        let a = bank.for_slot_at_tick(RngSlot::Transfer, 7).next_u64();
        let b = bank.for_slot_at_tick(RngSlot::Scouting, 7).next_u64();
        let c = bank.for_slot_at_tick(RngSlot::Transfer, 8).next_u64();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn weighted_index_skips_zero_weights() {
        let mut rng = SimRng::from_seed(1);
        for _ in 0..200 {
            let idx = rng.weighted_index(&[0.0, 2.0, 0.0, 1.0]).unwrap();
            assert!(idx == 1 || idx == 3, "picked zero-weight index {idx}");
        }
        assert_eq!(rng.weighted_index(&[0.0, 0.0]), None);
    }

    #[test]
    fn rng_state_survives_serialization() {
        let mut rng = SimRng::from_seed(99);
        rng.next_u64();
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: SimRng = serde_json::from_str(&json).unwrap();
        assert_eq!(rng.next_u64(), restored.next_u64());
    }
}
