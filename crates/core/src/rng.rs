//! RNG module - 7-bag random piece generation
//!
//! Each bag contains one of each standard piece (I, J, L, O, S, T, Z), shuffled.
//! Draws from the bag until empty, then shuffles a fresh full set. No piece can be withheld
//! for more than 12 draws.
//!
//! The shuffle uses a small seeded LCG so a session is reproducible from its bag seed.

use crate::types::PieceKind;

/// Seeded LCG driving the bag shuffle (Numerical Recipes multiplier and increment)
///
/// Its state doubles as the seed of the next session, so a restart continues the sequence
/// instead of replaying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BagRng {
    state: u32,
}

impl BagRng {
    const MULTIPLIER: u32 = 1_664_525;
    const INCREMENT: u32 = 1_013_904_223;

    /// A zero seed is bumped to 1
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.state
    }

    /// Fisher-Yates, walking from the back
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for last in (1..items.len()).rev() {
            let pick = (self.next_u32() % (last as u32 + 1)) as usize;
            items.swap(last, pick);
        }
    }
}

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct PieceQueue {
    bag: [PieceKind; 7],
    /// Index into current bag; 7 means empty
    bag_index: usize,
    rng: BagRng,
}

impl PieceQueue {
    /// Create a new piece queue with the given seed
    pub fn new(seed: u32) -> Self {
        let mut queue = Self {
            bag: PieceKind::STANDARD,
            bag_index: 0,
            rng: BagRng::new(seed),
        };
        queue.refill_bag();
        queue
    }

    fn refill_bag(&mut self) {
        self.bag = PieceKind::STANDARD;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Draw the next piece, refilling the bag when it runs out
    pub fn draw(&mut self) -> PieceKind {
        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }

        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }

    /// Pieces left in the current bag
    pub fn remaining(&self) -> &[PieceKind] {
        &self.bag[self.bag_index..]
    }

    /// Seed for a follow-up session continuing this shuffle sequence
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_sequence() {
        let mut rng = BagRng::new(1);
        assert_eq!(rng.next_u32(), 1_015_568_748);
        assert_eq!(rng.state(), 1_015_568_748);
    }

    #[test]
    fn test_rng_zero_seed_is_not_degenerate() {
        let mut rng = BagRng::new(0);
        assert_ne!(rng.next_u32(), rng.next_u32());
    }

    #[test]
    fn test_piece_queue_initial_bag_is_full() {
        let queue = PieceQueue::new(1);
        assert_eq!(queue.remaining().len(), 7);
    }

    #[test]
    fn test_every_bag_is_a_permutation() {
        let mut queue = PieceQueue::new(99);

        for _ in 0..10 {
            let mut drawn: Vec<PieceKind> = (0..7).map(|_| queue.draw()).collect();
            drawn.sort();
            assert_eq!(drawn, PieceKind::STANDARD.to_vec());
        }
    }

    #[test]
    fn test_never_deals_float() {
        let mut queue = PieceQueue::new(7);
        assert!((0..700).all(|_| queue.draw().is_standard()));
    }

    #[test]
    fn test_max_gap_between_same_piece() {
        let mut queue = PieceQueue::new(2024);
        let draws: Vec<PieceKind> = (0..700).map(|_| queue.draw()).collect();

        for kind in PieceKind::STANDARD {
            let positions: Vec<usize> = draws
                .iter()
                .enumerate()
                .filter(|(_, k)| **k == kind)
                .map(|(i, _)| i)
                .collect();
            for pair in positions.windows(2) {
                assert!(pair[1] - pair[0] <= 13, "{:?} gap {}", kind, pair[1] - pair[0]);
            }
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PieceQueue::new(31337);
        let mut b = PieceQueue::new(31337);
        for _ in 0..50 {
            assert_eq!(a.draw(), b.draw());
        }
    }
}
