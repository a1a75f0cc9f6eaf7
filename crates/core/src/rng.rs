//! RNG module - 7-bag random piece generation
//!
//! Each bag holds one of every piece kind, shuffled. The queue is topped up
//! with a fresh bag whenever 7 or fewer pieces remain, so a preview of up to
//! 7 pieces is always available and every aligned window of 7 draws contains
//! each kind exactly once.

use std::collections::VecDeque;

use rand::{seq::SliceRandom, SeedableRng};
use rand_pcg::Pcg32;

use crate::types::PieceKind;

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct Randomizer {
    rng: Pcg32,
    queue: VecDeque<PieceKind>,
    seed: u64,
}

impl Randomizer {
    /// Create a new randomizer with the given seed
    pub fn new(seed: u64) -> Self {
        let mut randomizer = Self {
            rng: Pcg32::seed_from_u64(seed),
            queue: VecDeque::with_capacity(PieceKind::LEN * 2),
            seed,
        };
        randomizer.fill_bag();
        randomizer
    }

    /// Append shuffled bags until more than 7 pieces are queued.
    fn fill_bag(&mut self) {
        while self.queue.len() <= PieceKind::LEN {
            let mut bag = PieceKind::ALL;
            bag.shuffle(&mut self.rng);
            self.queue.extend(bag);
        }
    }

    /// Draw the next piece.
    pub fn next(&mut self) -> PieceKind {
        self.fill_bag();
        // `fill_bag` guarantees at least 8 queued pieces.
        let kind = self.queue.pop_front().unwrap_or(PieceKind::I);
        self.fill_bag();
        kind
    }

    /// Upcoming pieces without drawing them. Always at least 8 long.
    pub fn peek(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.iter().copied()
    }

    /// Seed this randomizer was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for Randomizer {
    fn default() -> Self {
        Self::new(1)
    }
}
