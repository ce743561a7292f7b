//! Core-side decision driver: the thin stateful wrapper a caller
//! constructs once per process and reuses across decisions.

use log::info;

use crate::bitboard::{self, Board};
use crate::search::{self, SearchProgress};
use crate::transposition::{TranspositionTable, DEFAULT_SIZE_LOG2};
use crate::zobrist::ZobristHasher;

/// If the piece count jumps by more than this between two decisions, the
/// board is assumed to belong to a different game and the table is
/// cleared rather than trusted.
const NEW_GAME_PIECE_DELTA: i32 = 5;

pub struct Engine {
    table: TranspositionTable,
    hasher: ZobristHasher,
    pieces_on_last_board: i32,
}

impl Engine {
    /// Allocate a production-sized engine (a 2^24-entry transposition
    /// table). Use [`Engine::with_table_size`] in tests to keep the
    /// suite fast.
    pub fn new() -> Engine {
        Engine::with_table_size(DEFAULT_SIZE_LOG2)
    }

    pub fn with_table_size(size_log2: u32) -> Engine {
        Engine {
            table: TranspositionTable::alloc(size_log2),
            hasher: ZobristHasher::new(),
            pieces_on_last_board: 4,
        }
    }

    /// Unconditionally reset for a fresh game.
    pub fn new_game(&mut self) {
        self.table.clear();
        self.pieces_on_last_board = 4;
    }

    fn clear_table_if_new_board(&mut self, board: &Board) {
        let num_pieces = bitboard::pop_count(board.occupied()) as i32;
        if (self.pieces_on_last_board - num_pieces).abs() > NEW_GAME_PIECE_DELTA {
            self.table.clear();
        }
        self.pieces_on_last_board = num_pieces;
    }

    /// Decide `player`'s move for `board` within `time_budget_secs`.
    /// Ages the transposition table, clears it if the board looks like
    /// the start of a new game, then runs the bounded-time search.
    pub fn decide(&mut self, board: &Board, player: u8, time_budget_secs: f64) -> (u8, i32) {
        self.table.age();
        self.clear_table_if_new_board(board);

        let (mov, score) = search::get_move(
            board,
            player,
            &mut self.table,
            &self.hasher,
            time_budget_secs,
            |progress: SearchProgress| {
                info!(
                    "depth {} nodes {} elapsed {:.2?} best {} value {}",
                    progress.depth,
                    progress.nodes_visited,
                    progress.elapsed,
                    bitboard::move_to_string(progress.best_move),
                    progress.value
                );
            },
        );

        info!(
            "selected {} score {} (table load factor {:.4})",
            bitboard::move_to_string(mov),
            score,
            self.table.load_factor()
        );

        (mov, score)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
