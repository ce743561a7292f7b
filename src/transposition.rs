//! Transposition table: a fixed-size, direct-mapped cache of previously
//! searched positions keyed by Zobrist hash.

use crate::bitboard::Board;

/// Production table size: 2^24 entries, matching the reference engine.
pub const DEFAULT_SIZE_LOG2: u32 = 24;

/// The kind of bound a stored value represents, from alpha-beta pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Exact,
    LowerBound,
    UpperBound,
}

#[derive(Debug, Clone, Copy)]
struct TTEntry {
    board: Board,
    value: i32,
    depth: u8,
    best_move: u8,
    bound: BoundKind,
    age: u8,
}

/// What a successful [`TranspositionTable::lookup`] yields.
#[derive(Debug, Clone, Copy)]
pub struct TTProbe {
    pub value: i32,
    pub depth: u8,
    pub best_move: u8,
    pub bound: BoundKind,
}

pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    index_mask: u64,
    set_entries: usize,
}

impl TranspositionTable {
    /// Allocate a table of `2^size_log2` entries. Production code uses
    /// [`DEFAULT_SIZE_LOG2`]; tests use a much smaller table so the suite
    /// stays fast.
    pub fn alloc(size_log2: u32) -> TranspositionTable {
        let size = 1usize << size_log2;
        TranspositionTable {
            entries: vec![None; size],
            index_mask: (size as u64) - 1,
            set_entries: 0,
        }
    }

    fn index(&self, hash: u32) -> usize {
        (hash as u64 & self.index_mask) as usize
    }

    /// Mark every slot unused. Invoked at startup and whenever the driver
    /// detects a board discontinuity (see [`crate::driver`]).
    pub fn clear(&mut self) {
        for slot in self.entries.iter_mut() {
            *slot = None;
        }
        self.set_entries = 0;
    }

    /// Increment the age of every occupied slot. Invoked once per
    /// decision, before search.
    pub fn age(&mut self) {
        for slot in self.entries.iter_mut().flatten() {
            slot.age = slot.age.saturating_add(1);
        }
    }

    /// Fraction of slots currently in use, for logging.
    pub fn load_factor(&self) -> f64 {
        self.set_entries as f64 / self.entries.len() as f64
    }

    /// Look up `board`'s entry, verifying the full board to rule out
    /// hash collisions. On a hit, resets the entry's age to 0.
    pub fn lookup(&mut self, hash: u32, board: &Board) -> Option<TTProbe> {
        let idx = self.index(hash);
        let slot = self.entries[idx].as_mut()?;
        if slot.board != *board {
            return None;
        }
        slot.age = 0;
        Some(TTProbe {
            value: slot.value,
            depth: slot.depth,
            best_move: slot.best_move,
            bound: slot.bound,
        })
    }

    /// Insert a freshly computed entry, replacing the existing slot iff
    /// it is unused, the new search went deeper, or the existing entry
    /// is stale (age >= 2).
    #[allow(clippy::too_many_arguments)]
    pub fn insert(
        &mut self,
        hash: u32,
        board: Board,
        value: i32,
        depth: u8,
        best_move: u8,
        bound: BoundKind,
    ) {
        let idx = self.index(hash);
        let replace = match &self.entries[idx] {
            None => true,
            Some(existing) => depth > existing.depth || existing.age >= 2,
        };
        if !replace {
            return;
        }
        if self.entries[idx].is_none() {
            self.set_entries += 1;
        }
        self.entries[idx] = Some(TTEntry {
            board,
            value,
            depth,
            best_move,
            bound,
            age: 0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Board;
    use crate::zobrist::ZobristHasher;

    #[test]
    fn round_trips_an_inserted_entry() {
        let hasher = ZobristHasher::new();
        let mut table = TranspositionTable::alloc(10);
        let board = Board::starting_position();
        let hash = hasher.hash(&board);
        table.insert(hash, board, 42, 5, 19, BoundKind::Exact);

        let probe = table.lookup(hash, &board).expect("entry should be present");
        assert_eq!(probe.value, 42);
        assert_eq!(probe.depth, 5);
        assert_eq!(probe.best_move, 19);
        assert_eq!(probe.bound, BoundKind::Exact);
    }

    #[test]
    fn lookup_misses_on_collision_with_different_board() {
        let hasher = ZobristHasher::new();
        let mut table = TranspositionTable::alloc(10);
        let board = Board::starting_position();
        let hash = hasher.hash(&board);
        table.insert(hash, board, 42, 5, 19, BoundKind::Exact);

        let mut other = board;
        crate::bitboard::set_cell(&mut other, 0, 0);
        assert!(table.lookup(hash, &other).is_none());
    }

    #[test]
    fn deeper_search_replaces_shallower_entry() {
        let hasher = ZobristHasher::new();
        let mut table = TranspositionTable::alloc(10);
        let board = Board::starting_position();
        let hash = hasher.hash(&board);
        table.insert(hash, board, 1, 3, 0, BoundKind::Exact);
        table.insert(hash, board, 2, 2, 0, BoundKind::Exact);
        let probe = table.lookup(hash, &board).unwrap();
        assert_eq!(probe.value, 1);
        assert_eq!(probe.depth, 3);
    }

    #[test]
    fn stale_entry_is_replaced_once_aged_enough() {
        let hasher = ZobristHasher::new();
        let mut table = TranspositionTable::alloc(10);
        let board = Board::starting_position();
        let hash = hasher.hash(&board);
        table.insert(hash, board, 1, 3, 0, BoundKind::Exact);
        table.age();
        table.age();
        table.insert(hash, board, 2, 1, 0, BoundKind::Exact);
        let probe = table.lookup(hash, &board).unwrap();
        assert_eq!(probe.value, 2);
    }

    #[test]
    fn clear_resets_load_factor_to_zero() {
        let hasher = ZobristHasher::new();
        let mut table = TranspositionTable::alloc(10);
        let board = Board::starting_position();
        let hash = hasher.hash(&board);
        table.insert(hash, board, 1, 3, 0, BoundKind::Exact);
        assert!(table.load_factor() > 0.0);
        table.clear();
        assert_eq!(table.load_factor(), 0.0);
    }
}
