//! Static position evaluation.
//!
//! Scores are always expressed from color 0's perspective (positive is
//! good for color 0); the search negates at each ply to get a
//! perspective-relative negamax value.

use crate::bitboard::{self, Board};

/// Score magnitude assigned to a won/lost/drawn terminal position,
/// multiplied by the final material difference.
pub const EVAL_INF: i32 = 1_000_000;

/// Upper bound on any value passed through the search. Large enough that
/// a terminal score (bounded by `64 * EVAL_INF`) can be negated without
/// overflowing `i32`.
pub const MINIMAX_INF: i32 = 1_000_000_000;

const CORNERS: u64 = 0x8100000000000081;
const AVOID_CORNERS_1: u64 = 0x0042000000004200;
const AVOID_CORNERS_2: u64 = 0x4281000000008142;

fn material(board: &Board) -> i32 {
    bitboard::pop_count(board.players[0]) as i32 - bitboard::pop_count(board.players[1]) as i32
}

fn mobility(player0_moves: u64, player1_moves: u64) -> i32 {
    bitboard::pop_count(player0_moves) as i32 - bitboard::pop_count(player1_moves) as i32
}

fn frontier(board: &Board) -> i32 {
    -(bitboard::pop_count(bitboard::gen_frontiers(board, 0)) as i32)
        + bitboard::pop_count(bitboard::gen_frontiers(board, 1)) as i32
}

fn corners(board: &Board) -> i32 {
    10 * bitboard::pop_count(board.players[0] & CORNERS) as i32
        - 10 * bitboard::pop_count(board.players[1] & CORNERS) as i32
        - 2 * bitboard::pop_count(board.players[0] & AVOID_CORNERS_1) as i32
        + 2 * bitboard::pop_count(board.players[1] & AVOID_CORNERS_1) as i32
        - bitboard::pop_count(board.players[0] & AVOID_CORNERS_2) as i32
        + bitboard::pop_count(board.players[1] & AVOID_CORNERS_2) as i32
}

/// Returns `material * EVAL_INF` if neither player has a legal move
/// (the game is over), else 0.
pub fn evaluate_is_terminal(board: &Board, player0_moves: u64, player1_moves: u64) -> i32 {
    if player0_moves == 0 && player1_moves == 0 {
        material(board) * EVAL_INF
    } else {
        0
    }
}

/// Composite static evaluation of a non-terminal position. Callers should
/// check [`evaluate_is_terminal`] first; this function does not special
/// case the no-moves-for-either-player case beyond what `mobility` alone
/// would produce.
pub fn evaluate_board(board: &Board, player0_moves: u64, player1_moves: u64) -> i32 {
    let mut value = 4 * mobility(player0_moves, player1_moves) + 4 * corners(board);

    // During the midgame, minimize our frontier stones; the endgame cares
    // only about final material, not exposure.
    if bitboard::pop_count(board.occupied()) < 40 {
        value += frontier(board);
    }

    debug_assert!(value < MINIMAX_INF && value > -MINIMAX_INF);
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Board;

    #[test]
    fn starting_position_is_balanced() {
        let board = Board::starting_position();
        let m0 = bitboard::gen_moves(&board, 0);
        let m1 = bitboard::gen_moves(&board, 1);
        assert_eq!(evaluate_is_terminal(&board, m0, m1), 0);
        let score = evaluate_board(&board, m0, m1);
        assert_eq!(score, 0);
    }

    #[test]
    fn full_board_is_terminal_and_scaled_by_material() {
        let mut board = Board::default();
        for sq in 0..64u8 {
            let color = if sq < 40 { 0 } else { 1 };
            bitboard::set_cell(&mut board, sq, color);
        }
        let m0 = bitboard::gen_moves(&board, 0);
        let m1 = bitboard::gen_moves(&board, 1);
        assert_eq!(m0, 0);
        assert_eq!(m1, 0);
        assert_eq!(evaluate_is_terminal(&board, m0, m1), 16 * EVAL_INF);
    }

    #[test]
    fn corners_are_weighted_heavily() {
        let mut board = Board::default();
        bitboard::set_cell(&mut board, 0, 0); // a1, corner, color 0
        let score = corners(&board);
        assert_eq!(score, 10);
    }

    #[test]
    fn x_squares_are_penalized() {
        let mut board = Board::default();
        bitboard::set_cell(&mut board, bitboard::xy_to_move(1, 1), 0); // b2, an X-square
        assert_eq!(corners(&board), -2);
    }
}
