//! Mercy module - daily-seeded FLOAT piece decisions
//!
//! The mercy system grants an easier FLOAT piece with a probability that rises with the stack
//! height: 2% on an empty board, +1.1% per row, capped at 24%. The draw is a pure function of
//! `(seed, piece index, stack height)` so every player on the same daily seed sees the same
//! curve, and a server can replay the decisions.
//!
//! All mixing is done in wrapping `i32` arithmetic; the right shift is arithmetic. Changing
//! either changes every decision.

use serde::{Deserialize, Serialize};

/// Mercy probability floor (percent) at stack height 0
pub const MERCY_BASE_RATE: f64 = 2.0;

/// Added probability (percent) per row of stack height
pub const MERCY_RATE_PER_ROW: f64 = 1.1;

/// Mercy probability ceiling (percent)
pub const MERCY_MAX_RATE: f64 = 24.0;

/// Mercy probability in percent for a stack height
///
/// ```
/// use neon_drop_core::mercy::mercy_rate;
///
/// assert_eq!(mercy_rate(0), 2.0);
/// assert_eq!(mercy_rate(100), 24.0);
/// ```
pub fn mercy_rate(stack_height: u32) -> f64 {
    (MERCY_BASE_RATE + stack_height as f64 * MERCY_RATE_PER_ROW).min(MERCY_MAX_RATE)
}

/// Xorshift-style mix of a 32-bit value into [0, 1]
pub fn mix(value: i32) -> f64 {
    let mut x = value;
    x ^= x.wrapping_shl(13);
    x ^= x >> 17;
    x ^= x.wrapping_shl(5);
    f64::from(x & 0x7fff_ffff) / f64::from(0x7fff_ffff_i32)
}

/// Roll (0-100) for the `index`-th piece request at `stack_height`
pub fn mercy_roll(seed: i32, index: u32, stack_height: u32) -> f64 {
    let combined = seed
        .wrapping_add(index as i32)
        .wrapping_add(stack_height as i32);
    mix(combined) * 100.0
}

/// Running mercy statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MercyStats {
    pub total_pieces: u32,
    pub float_pieces: u32,
    /// Share of FLOAT pieces in percent; 0 before the first request
    pub float_percentage: f64,
}

/// Deterministic FLOAT piece oracle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MercySystem {
    seed: i32,
    piece_index: u32,
    float_count: u32,
}

impl MercySystem {
    /// Create a mercy system for a daily seed
    pub fn new(daily_seed: i32) -> Self {
        Self {
            seed: daily_seed,
            piece_index: 0,
            float_count: 0,
        }
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Decide whether the next piece is a FLOAT
    ///
    /// Every call consumes one piece index, whatever the outcome.
    pub fn should_spawn_float(&mut self, stack_height: u32) -> bool {
        let index = self.piece_index;
        self.piece_index = self.piece_index.wrapping_add(1);

        let rate = mercy_rate(stack_height);
        let roll = mercy_roll(self.seed, index, stack_height);
        let spawn = roll < rate;
        if spawn {
            self.float_count += 1;
        }

        tracing::trace!(index, stack_height, rate, roll, spawn, "mercy roll");
        spawn
    }

    /// Zero the counters; the seed is kept so restarts replay the same day
    pub fn reset(&mut self) {
        self.piece_index = 0;
        self.float_count = 0;
    }

    pub fn stats(&self) -> MercyStats {
        let float_percentage = if self.piece_index == 0 {
            0.0
        } else {
            f64::from(self.float_count) / f64::from(self.piece_index) * 100.0
        };

        MercyStats {
            total_pieces: self.piece_index,
            float_pieces: self.float_count,
            float_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rate_floor_ramp_and_cap() {
        assert_eq!(mercy_rate(0), 2.0);
        assert!((mercy_rate(10) - 13.0).abs() < 1e-9);
        assert_eq!(mercy_rate(20), 24.0);
        assert_eq!(mercy_rate(100), 24.0);
        assert!(mercy_rate(19) < 24.0);
    }

    #[test]
    fn test_golden_roll_seed_12345() {
        let roll = mercy_roll(12345, 0, 0);
        assert!((roll - 55.38774107368092).abs() < 1e-9, "roll = {roll}");

        let mut mercy = MercySystem::new(12345);
        assert!(!mercy.should_spawn_float(0));
        assert_eq!(
            mercy.stats(),
            MercyStats {
                total_pieces: 1,
                float_pieces: 0,
                float_percentage: 0.0,
            }
        );
    }

    #[test]
    fn test_golden_rolls() {
        assert!((mercy_roll(12345, 1, 0) - 55.3987991788419).abs() < 1e-9);
        assert!((mercy_roll(12345, 2, 5) - 55.5125685667212).abs() < 1e-9);
        assert!((mercy_roll(20261019, 0, 0) - 25.716537621671588).abs() < 1e-9);
        assert_eq!(mercy_roll(0, 0, 0), 0.0);
    }

    #[test]
    fn test_wraparound_matches_32_bit() {
        // i32::MAX + 1 wraps to i32::MIN before mixing.
        let wrapped = mercy_roll(i32::MAX, 1, 0);
        assert!((wrapped - 0.023651123057888412).abs() < 1e-9);
        assert!((mercy_roll(-5, 0, 0) - 0.05913502539467766).abs() < 1e-9);
    }

    #[test]
    fn test_low_seed_grants_float() {
        let mut mercy = MercySystem::new(0);
        assert!(mercy.should_spawn_float(0));
        let stats = mercy.stats();
        assert_eq!(stats.float_pieces, 1);
        assert_eq!(stats.float_percentage, 100.0);
    }

    #[test]
    fn test_index_advances_on_every_call() {
        let mut mercy = MercySystem::new(12345);
        for _ in 0..5 {
            mercy.should_spawn_float(3);
        }
        assert_eq!(mercy.stats().total_pieces, 5);
    }

    #[test]
    fn test_reset_keeps_seed() {
        let mut mercy = MercySystem::new(1);
        let first: Vec<bool> = (0..20).map(|h| mercy.should_spawn_float(h)).collect();
        assert!(mercy.stats().float_pieces > 0);

        mercy.reset();
        assert_eq!(mercy.seed(), 1);
        assert_eq!(mercy.stats().total_pieces, 0);
        assert_eq!(mercy.stats().float_percentage, 0.0);

        let second: Vec<bool> = (0..20).map(|h| mercy.should_spawn_float(h)).collect();
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_decisions_are_deterministic(
            seed in any::<i32>(),
            heights in proptest::collection::vec(0u32..=20, 1..64),
        ) {
            let mut a = MercySystem::new(seed);
            let mut b = MercySystem::new(seed);
            let run_a: Vec<bool> = heights.iter().map(|&h| a.should_spawn_float(h)).collect();
            let run_b: Vec<bool> = heights.iter().map(|&h| b.should_spawn_float(h)).collect();
            prop_assert_eq!(run_a, run_b);
            prop_assert_eq!(a.stats(), b.stats());
        }

        #[test]
        fn prop_rate_is_monotonic(h in 0u32..1000) {
            prop_assert!(mercy_rate(h) <= mercy_rate(h + 1));
            prop_assert!(mercy_rate(h) >= MERCY_BASE_RATE);
            prop_assert!(mercy_rate(h) <= MERCY_MAX_RATE);
        }

        #[test]
        fn prop_roll_in_range(seed in any::<i32>(), index in any::<u32>(), h in 0u32..=20) {
            let roll = mercy_roll(seed, index, h);
            prop_assert!((0.0..=100.0).contains(&roll));
        }
    }
}
