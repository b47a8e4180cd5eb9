//! RNG module - piece generation
//!
//! Two supply strategies, picked explicitly through [`GeneratorKind`]:
//!
//! - **Bag** (default): one of each piece (I, O, T, S, Z, J, L), shuffled with
//!   Fisher-Yates, consumed front to back, refilled when empty. Every run of 7
//!   spawns starting at a bag boundary holds each kind exactly once.
//! - **Uniform**: an independent draw per spawn with no fairness guarantee.
//!
//! Also provides a simple LCG so games are reproducible from a seed.

use crate::pieces::Piece;
use crate::types::{GeneratorKind, PieceKind, BOARD_WIDTH};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max) without modulo bias
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max <= 1 {
            return 0;
        }
        // The high bits of an LCG are the strongest; reject the partial top bucket.
        let span = 1u64 << 32;
        let zone = span - span % max as u64;
        loop {
            let v = self.next_u32().rotate_right(16);
            if (v as u64) < zone {
                return v % max;
            }
        }
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current internal state, usable as a seed to continue the sequence
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Tetromino supply
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    kind: GeneratorKind,
    /// Current bag of pieces
    bag: [PieceKind; 7],
    /// Index of the next pending piece; 7 means the bag is exhausted
    bag_index: usize,
    rng: SimpleRng,
    board_width: u8,
}

impl PieceGenerator {
    /// Create a generator for the canonical board width
    pub fn new(kind: GeneratorKind, seed: u32) -> Self {
        Self::with_board_width(kind, seed, BOARD_WIDTH)
    }

    /// Create a generator that centers pieces on a board of `board_width` columns
    pub fn with_board_width(kind: GeneratorKind, seed: u32, board_width: u8) -> Self {
        Self {
            kind,
            bag: PieceKind::ALL,
            // Start empty: the first draw shuffles a fresh bag.
            bag_index: 7,
            rng: SimpleRng::new(seed),
            board_width,
        }
    }

    pub fn kind(&self) -> GeneratorKind {
        self.kind
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Draw the next piece kind
    pub fn next_kind(&mut self) -> PieceKind {
        match self.kind {
            GeneratorKind::Bag => {
                if self.bag_index >= 7 {
                    self.refill_bag();
                }
                let piece = self.bag[self.bag_index];
                self.bag_index += 1;
                piece
            }
            GeneratorKind::Uniform => {
                PieceKind::ALL[self.rng.next_range(PieceKind::ALL.len() as u32) as usize]
            }
        }
    }

    /// Draw the next piece, positioned at its spawn anchor
    pub fn next(&mut self) -> Piece {
        let kind = self.next_kind();
        Piece::spawn(kind, self.board_width)
    }

    /// Peek at the next kind without consuming it.
    ///
    /// Works on a copy, so the live RNG is untouched and the following
    /// `next()` returns exactly this kind.
    pub fn peek(&self) -> PieceKind {
        self.clone().next_kind()
    }

    /// Kinds still pending in the current bag, front first (empty for uniform)
    pub fn pending(&self) -> &[PieceKind] {
        match self.kind {
            GeneratorKind::Bag => &self.bag[self.bag_index.min(7)..],
            GeneratorKind::Uniform => &[],
        }
    }

    /// Get the current RNG state (for restarting with a continued sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new(GeneratorKind::Bag, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);
        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_next_range_stays_in_bounds() {
        let mut rng = SimpleRng::new(7);
        for max in 1..20 {
            for _ in 0..50 {
                assert!(rng.next_range(max) < max);
            }
        }
        assert_eq!(rng.next_range(0), 0);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = SimpleRng::new(99);
        let mut v = PieceKind::ALL;
        rng.shuffle(&mut v);
        for kind in PieceKind::ALL {
            assert_eq!(v.iter().filter(|&&k| k == kind).count(), 1);
        }
    }

    #[test]
    fn test_generator_starts_with_empty_bag() {
        let gen = PieceGenerator::new(GeneratorKind::Bag, 1);
        assert!(gen.pending().is_empty());
    }

    #[test]
    fn test_generator_draws_all_seven() {
        let mut gen = PieceGenerator::new(GeneratorKind::Bag, 1);

        let drawn: Vec<PieceKind> = (0..7).map(|_| gen.next_kind()).collect();
        for kind in PieceKind::ALL {
            assert!(drawn.contains(&kind), "Missing piece: {:?}", kind);
        }
        assert!(gen.pending().is_empty());
    }

    #[test]
    fn test_generator_pending_shrinks_front_to_back() {
        let mut gen = PieceGenerator::new(GeneratorKind::Bag, 3);
        let first = gen.next_kind();
        assert_eq!(gen.pending().len(), 6);
        let expected_next = gen.pending()[0];
        assert_ne!(expected_next, first);
        assert_eq!(gen.next_kind(), expected_next);
    }

    #[test]
    fn test_peek_matches_next_across_bag_boundary() {
        let mut gen = PieceGenerator::new(GeneratorKind::Bag, 1);
        for _ in 0..20 {
            let peeked = gen.peek();
            assert_eq!(gen.next_kind(), peeked);
        }
    }

    #[test]
    fn test_uniform_peek_matches_next() {
        let mut gen = PieceGenerator::new(GeneratorKind::Uniform, 5);
        for _ in 0..20 {
            let peeked = gen.peek();
            assert_eq!(gen.next_kind(), peeked);
        }
        assert!(gen.pending().is_empty());
    }

    #[test]
    fn test_next_positions_piece_at_spawn() {
        let mut gen = PieceGenerator::with_board_width(GeneratorKind::Bag, 1, 10);
        let piece = gen.next();
        assert_eq!(piece, Piece::spawn(piece.kind, 10));
    }
}
