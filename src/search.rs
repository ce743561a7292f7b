//! Iterative-deepening negamax search with alpha-beta pruning and
//! transposition-table-assisted move ordering.
//!
//! Time-bounded search is cooperative: every [`TIME_CHECK_BOARDS`] nodes
//! the search samples the wall clock and, if the budget has run out,
//! unwinds to the root via `Err(SearchTimeout)` instead of throwing, as
//! the reference implementation's C++ did. [`get_move`]'s iterative
//! deepening loop catches the timeout and keeps the last fully completed
//! depth's answer.

use std::time::{Duration, Instant};

use crate::bitboard::{self, Board, NO_MOVE};
use crate::evaluate::{self, EVAL_INF, MINIMAX_INF};
use crate::transposition::{BoundKind, TranspositionTable};
use crate::zobrist::ZobristHasher;

/// Sample the wall clock once every this many visited nodes.
const TIME_CHECK_BOARDS: u64 = 2_000_000;

/// Deepest iterative-deepening depth attempted. An Othello game has at
/// most 60 plies after the opening 4 squares are filled, so no position
/// ever needs a deeper search; capping here also keeps the depth counter
/// (passed around as `u8`) from ever approaching its range limit.
const MAX_SEARCH_DEPTH: u8 = 60;

/// Raised from deep inside [`minimax`] when the search's time budget has
/// been exhausted. Not a reportable failure: [`get_move`] always catches
/// it and falls back to the previous iterative-deepening iteration.
#[derive(Debug, thiserror::Error)]
#[error("search time budget exhausted")]
pub struct SearchTimeout;

/// Outcome of one completed (or, for `still_searching`, reported
/// mid-flight) iterative-deepening depth. Exposed so callers can log
/// search progress without the core depending on a particular output
/// format.
#[derive(Debug, Clone, Copy)]
pub struct SearchProgress {
    pub depth: u8,
    pub value: i32,
    pub best_move: u8,
    pub nodes_visited: u64,
    pub elapsed: Duration,
}

struct Search<'a> {
    table: &'a mut TranspositionTable,
    hasher: &'a ZobristHasher,
    /// Total nodes visited this iterative-deepening iteration. Monotonic;
    /// never reset, so it can be reported to callers (see
    /// [`SearchProgress::nodes_visited`]) without losing counts once a
    /// search crosses [`TIME_CHECK_BOARDS`] nodes.
    nodes_visited: u64,
    /// Counts down from [`TIME_CHECK_BOARDS`] to 0; only the time-poll
    /// cadence, never exposed to callers.
    nodes_until_time_check: u64,
    start: Instant,
    time_budget: Duration,
}

impl<'a> Search<'a> {
    fn check_time(&mut self) -> Result<(), SearchTimeout> {
        self.nodes_visited += 1;
        self.nodes_until_time_check -= 1;
        if self.nodes_until_time_check == 0 {
            self.nodes_until_time_check = TIME_CHECK_BOARDS;
            if self.start.elapsed() >= self.time_budget {
                return Err(SearchTimeout);
            }
        }
        Ok(())
    }

    /// Negamax node. `player` is the side to move at this node;
    /// `move_to_make`, if not [`NO_MOVE`], is the move the *previous*
    /// player just made to reach this position. Returns the value from
    /// `player`'s perspective and, via `dst_best_move`, the move found
    /// best (only the root call needs this).
    fn minimax(
        &mut self,
        old_board: &Board,
        move_to_make: u8,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        player: u8,
        dst_best_move: Option<&mut u8>,
    ) -> Result<i32, SearchTimeout> {
        self.check_time()?;

        let orig_alpha = alpha;

        let board = if move_to_make != NO_MOVE {
            bitboard::make_move(old_board, move_to_make, 1 - player)
        } else {
            *old_board
        };

        let sign = if player == 0 { 1 } else { -1 };
        let player0_moves = bitboard::gen_moves(&board, 0);
        let player1_moves = bitboard::gen_moves(&board, 1);

        let terminal = evaluate::evaluate_is_terminal(&board, player0_moves, player1_moves);
        if terminal != 0 {
            return Ok(sign * terminal);
        }
        if depth == 0 {
            return Ok(sign * evaluate::evaluate_board(&board, player0_moves, player1_moves));
        }

        let hash = self.hasher.hash(&board);
        let mut ordering_hint = NO_MOVE;
        if let Some(probe) = self.table.lookup(hash, &board) {
            if probe.depth >= depth {
                match probe.bound {
                    BoundKind::Exact => {
                        if let Some(dst) = dst_best_move {
                            *dst = probe.best_move;
                        }
                        return Ok(probe.value);
                    }
                    BoundKind::LowerBound => alpha = alpha.max(probe.value),
                    BoundKind::UpperBound => beta = beta.min(probe.value),
                }
                if alpha >= beta {
                    if let Some(dst) = dst_best_move {
                        *dst = probe.best_move;
                    }
                    return Ok(probe.value);
                }
            } else {
                ordering_hint = probe.best_move;
            }
        }

        let mut my_moves = if player == 0 { player0_moves } else { player1_moves };
        let mut value = -MINIMAX_INF;
        let mut best_move = NO_MOVE;

        if my_moves == 0 {
            // No legal move: pass the turn.
            value = -self.minimax(&board, NO_MOVE, depth - 1, -beta, -alpha, 1 - player, None)?;
        } else {
            let mut first = ordering_hint;
            while my_moves != 0 || first != NO_MOVE {
                let mov = if first != NO_MOVE {
                    let m = first;
                    first = NO_MOVE;
                    m
                } else {
                    let m = bitboard::get_and_clear_first_move(&mut my_moves);
                    if m == ordering_hint {
                        continue;
                    }
                    m
                };

                let child = -self.minimax(&board, mov, depth - 1, -beta, -alpha, 1 - player, None)?;
                if child > value {
                    value = child;
                    best_move = mov;
                }
                alpha = alpha.max(value);
                if alpha >= beta {
                    break;
                }
            }
        }

        let bound = if value <= orig_alpha {
            BoundKind::UpperBound
        } else if value >= beta {
            BoundKind::LowerBound
        } else {
            BoundKind::Exact
        };
        self.table.insert(hash, board, value, depth, best_move, bound);

        if let Some(dst) = dst_best_move {
            *dst = best_move;
        }
        Ok(value)
    }
}

/// Search from `board` for `player`'s best move within `time_budget`.
/// Always returns a move (or [`NO_MOVE`] only if `player` has none
/// available at the root, which is itself a legitimate answer) and the
/// score of that move, from `player`'s perspective.
pub fn get_move(
    board: &Board,
    player: u8,
    table: &mut TranspositionTable,
    hasher: &ZobristHasher,
    time_budget_secs: f64,
    mut on_progress: impl FnMut(SearchProgress),
) -> (u8, i32) {
    let start = Instant::now();
    let time_budget = Duration::from_secs_f64(time_budget_secs.max(0.0));

    let mut best_move = NO_MOVE;
    let mut best_value = 0;

    for depth in 1u8..=MAX_SEARCH_DEPTH {
        let mut search = Search {
            table,
            hasher,
            nodes_visited: 0,
            nodes_until_time_check: TIME_CHECK_BOARDS,
            start,
            time_budget,
        };
        let mut root_best_move = NO_MOVE;
        // The root itself applies no move: it scores `board` as given,
        // from `player`'s perspective.
        match search.minimax(
            board,
            NO_MOVE,
            depth,
            -MINIMAX_INF,
            MINIMAX_INF,
            player,
            Some(&mut root_best_move),
        ) {
            Ok(value) => {
                best_move = root_best_move;
                best_value = value;
                on_progress(SearchProgress {
                    depth,
                    value,
                    best_move,
                    nodes_visited: search.nodes_visited,
                    elapsed: start.elapsed(),
                });
                if value.abs() > EVAL_INF {
                    break;
                }
            }
            Err(SearchTimeout) => break,
        }

        if start.elapsed() >= time_budget {
            break;
        }
    }

    (best_move, best_value)
}
