//! Zobrist hashing of Othello positions.
//! See https://en.wikipedia.org/wiki/Zobrist_hashing for background.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::bitboard::Board;

/// Deterministic seed for the key table. Using a fixed seed (rather than
/// system randomness) makes hashes, and therefore transposition-table
/// behavior, reproducible across runs and test invocations.
const ZOBRIST_SEED: u64 = 0;

pub struct ZobristHasher {
    /// Random 32-bit word per (square, color), [square][color].
    hash_piece: [[u32; 2]; 64],

    /// Precomputed XOR of `hash_piece` for every (row, row-byte-pattern,
    /// color) combination, so a full-board hash costs 8 table lookups
    /// per player instead of a loop over set bits.
    row_precalc: [[[u32; 2]; 256]; 8],
}

impl ZobristHasher {
    /// Build the key tables from the fixed seed. Deterministic: two
    /// `ZobristHasher::new()` calls always produce identical tables.
    pub fn new() -> ZobristHasher {
        let mut rng = ChaCha8Rng::seed_from_u64(ZOBRIST_SEED);

        let mut hash_piece = [[0u32; 2]; 64];
        for square in hash_piece.iter_mut() {
            for color in square.iter_mut() {
                *color = rng.gen::<u32>();
            }
        }

        let mut row_precalc = [[[0u32; 2]; 256]; 8];
        for y in 0..8usize {
            for row in 0u32..256 {
                for color in 0..2usize {
                    let mut hash = 0u32;
                    let mut bits = row;
                    while bits != 0 {
                        let set_index = bits.trailing_zeros() as usize;
                        hash ^= hash_piece[y * 8 + set_index][color];
                        bits &= bits - 1;
                    }
                    row_precalc[y][row as usize][color] = hash;
                }
            }
        }

        ZobristHasher { hash_piece, row_precalc }
    }

    /// Hash the full board. `gen_moves`/`make_move` callers do not keep
    /// incremental hashes (Othello positions are small, copy-on-write
    /// boards rather than mutate-in-place game trees), so every position
    /// is hashed from scratch via the row precalc table.
    pub fn hash(&self, board: &Board) -> u32 {
        let mut h = 0u32;
        for y in 0..8usize {
            for color in 0..2usize {
                let row_byte = (board.players[color] >> (y * 8)) & 0xff;
                h ^= self.row_precalc[y][row_byte as usize][color];
            }
        }
        h
    }

    #[cfg(test)]
    fn slow_hash(&self, board: &Board) -> u32 {
        let mut h = 0u32;
        for color in 0..2usize {
            for square in crate::bitboard::occupied_squares(board.players[color]) {
                h ^= self.hash_piece[square as usize][color];
            }
        }
        h
    }
}

impl Default for ZobristHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Board;

    #[test]
    fn deterministic_across_instances() {
        let a = ZobristHasher::new();
        let b = ZobristHasher::new();
        let board = Board::starting_position();
        assert_eq!(a.hash(&board), b.hash(&board));
    }

    #[test]
    fn row_precalc_matches_naive_square_by_square_hash() {
        let hasher = ZobristHasher::new();
        let board = Board::starting_position();
        assert_eq!(hasher.hash(&board), hasher.slow_hash(&board));
    }

    #[test]
    fn differing_boards_usually_hash_differently() {
        let hasher = ZobristHasher::new();
        let board = Board::starting_position();
        let mut other = board;
        crate::bitboard::set_cell(&mut other, 0, 0);
        assert_ne!(hasher.hash(&board), hasher.hash(&other));
    }
}
