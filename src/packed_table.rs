//! The packed action table and the transaction-based packer that fills it.
//!
//! This is a direct port of `acttab_action`/`acttab_insert` from SQLite's
//! lemon parser generator: lookahead/action pairs for a state are buffered
//! into a transaction, then superimposed onto a shared dense array at the
//! cheapest offset that doesn't collide with anything already there.

use crate::error::Error;

/// Sentinel written into a state's offset field when it has no actions of
/// that half packed at all (as opposed to an offset of zero, which is a
/// legitimate packed location).
pub const NO_OFFSET: i32 = -2_147_483_647;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedSlot {
    pub lookahead: i32,
    pub action: i32,
}

impl PackedSlot {
    pub const EMPTY: PackedSlot = PackedSlot {
        lookahead: -1,
        action: -1,
    };
}

impl Default for PackedSlot {
    fn default() -> Self {
        PackedSlot::EMPTY
    }
}

/// Accumulates one state's (lookahead, action) pairs and superimposes them
/// onto the shared packed array on `commit_state`.
pub struct TablePacker {
    table: Vec<PackedSlot>,
    n_action: usize,
    transaction: Vec<(i32, i32)>,
}

impl TablePacker {
    pub fn new() -> Self {
        Self {
            table: Vec::new(),
            n_action: 0,
            transaction: Vec::new(),
        }
    }

    /// Begins buffering a new state's entries. Any entries left over from a
    /// state that never called `commit_state` are discarded.
    pub fn begin_state(&mut self) {
        self.transaction.clear();
    }

    /// Buffers one entry for the state under construction.
    pub fn emit(&mut self, lookahead: i32, action: i32) {
        assert!(lookahead >= 0, "lookahead must be non-negative");
        self.transaction.push((lookahead, action));
    }

    /// Superimposes the buffered transaction onto the packed array and
    /// returns the offset at which it landed, such that slot `lookahead +
    /// offset` holds this state's `action` for that lookahead.
    ///
    /// Requires at least one `emit` since `begin_state`; a state with no
    /// actions for a half has nothing to commit and should never reach the
    /// packer in the first place (the driver skips empty halves itself).
    pub fn commit_state(&mut self) -> Result<i32, Error> {
        assert!(
            !self.transaction.is_empty(),
            "commit_state called with no buffered entries"
        );

        let n = self.transaction.len();
        let mn_lookahead = self.transaction.iter().map(|(la, _)| *la).min().unwrap();
        let mn_action = self
            .transaction
            .iter()
            .find(|(la, _)| *la == mn_lookahead)
            .unwrap()
            .1;
        let mx_lookahead = self.transaction.iter().map(|(la, _)| *la).max().unwrap();

        if self.n_action + n >= self.table.len() {
            let new_len = self.n_action + n + self.table.len() + 20;
            self.table
                .try_reserve(new_len.saturating_sub(self.table.len()))
                .map_err(|_| Error::OutOfMemory)?;
            self.table.resize(new_len, PackedSlot::EMPTY);
        }

        // Phase A: reuse an existing offset exactly if everything we'd write
        // already matches what's there.
        let mut chosen: Option<i32> = None;
        let mut i = self.n_action as i32 - 1;
        while i >= 0 {
            if self.table[i as usize].lookahead == mn_lookahead
                && self.table[i as usize].action == mn_action
            {
                let offset = i - mn_lookahead;
                if self.phase_a_matches(offset) {
                    chosen = Some(offset);
                    break;
                }
            }
            i -= 1;
        }

        // Phase B: find the first hole where the whole transaction fits
        // without disturbing any existing populated slot.
        if chosen.is_none() {
            let limit = self.table.len() as i32 - mx_lookahead - 1;
            let mut i = 0i32;
            'search: while i <= limit {
                if self.table[i as usize].lookahead < 0 && self.phase_b_fits(i) {
                    chosen = Some(i - mn_lookahead);
                    break 'search;
                }
                i += 1;
            }
        }

        let offset = match chosen {
            Some(o) => o,
            None => {
                // No hole in the existing table; append past the end.
                let offset = self.table.len() as i32 - mn_lookahead;
                let needed = (offset + mx_lookahead + 1) as usize;
                self.table
                    .try_reserve(needed.saturating_sub(self.table.len()))
                    .map_err(|_| Error::OutOfMemory)?;
                self.table.resize(needed, PackedSlot::EMPTY);
                offset
            }
        };

        // Phase C: write the transaction back. Slot for `lookahead` always
        // lives at `lookahead + offset`.
        for &(lookahead, action) in &self.transaction {
            let k = (lookahead + offset) as usize;
            self.table[k] = PackedSlot { lookahead, action };
        }
        let new_n_action = offset + mx_lookahead + 1;
        if new_n_action as usize > self.n_action {
            self.n_action = new_n_action as usize;
        }

        Ok(offset)
    }

    /// Verifies that superimposing the buffered transaction at `offset`
    /// would write nothing new: every slot it touches already holds the
    /// identical entry, and no existing populated slot is left unaccounted.
    fn phase_a_matches(&self, offset: i32) -> bool {
        for &(lookahead, action) in &self.transaction {
            let j = lookahead + offset;
            if j < 0 || j as usize >= self.n_action {
                return false;
            }
            let slot = self.table[j as usize];
            if slot.lookahead != lookahead || slot.action != action {
                return false;
            }
        }
        // Count populated slots whose position corresponds to `j - offset`
        // landing in the transaction's own lookahead set; this must equal
        // the transaction length exactly (no foreign entry is covered).
        let covered = (0..self.n_action)
            .filter(|&j| self.table[j].lookahead >= 0)
            .filter(|&j| {
                let la = j as i32 - offset;
                self.transaction.iter().any(|&(tla, _)| tla == la)
            })
            .count();
        covered == self.transaction.len()
    }

    /// Verifies that superimposing the buffered transaction at base index
    /// `i` (i.e. offset `i - mn_lookahead`) lands every entry on a slot
    /// that is either empty or already the sentinel -- and, as a deliberate
    /// strengthening of lemon's literal C search, that no populated slot
    /// anywhere in the table is spuriously claimed by this offset.
    fn phase_b_fits(&self, i: i32) -> bool {
        let mn_lookahead = self.transaction.iter().map(|(la, _)| *la).min().unwrap();
        let offset = i - mn_lookahead;
        for &(lookahead, _) in &self.transaction {
            let k = lookahead - mn_lookahead + i;
            if k < 0 || k as usize >= self.table.len() {
                return false;
            }
            if self.table[k as usize].lookahead >= 0 {
                return false;
            }
        }
        let covered = (0..self.n_action)
            .filter(|&j| self.table[j].lookahead >= 0)
            .filter(|&j| {
                let la = j as i32 - offset;
                self.transaction.iter().any(|&(tla, _)| tla == la)
            })
            .count();
        covered == 0
    }

    pub fn len(&self) -> usize {
        self.n_action
    }

    pub fn is_empty(&self) -> bool {
        self.n_action == 0
    }

    pub fn into_vec(self) -> Vec<PackedSlot> {
        let mut table = self.table;
        table.truncate(self.n_action);
        table
    }
}

impl Default for TablePacker {
    fn default() -> Self {
        Self::new()
    }
}
