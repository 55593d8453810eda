//! Orchestrates canonicalization, compression, resorting and packing into
//! the final generated tables, and the encode/decode bijection between an
//! [`Action`] and the single integer the packed table stores for it.

use std::collections::HashMap;

use crate::action::{Action, ActionKind, ActionList, ActionTarget};
use crate::compressor::compress_state;
use crate::error::Error;
use crate::packed_table::{PackedSlot, TablePacker, NO_OFFSET};
use crate::resorter::resort_states;
use crate::state::State;
use crate::symbol::Symbol;

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub compress: bool,
    pub resort: bool,
    pub basis_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compress: true,
            resort: true,
            basis_only: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedTables {
    pub packed_table: Vec<PackedSlot>,
    pub n_action_tab: usize,
    pub nxstate: u32,
}

/// Encodes one emittable action as the single integer the packed table
/// stores. The ranges are disjoint and ordered: state numbers for `Shift`,
/// then rule numbers (offset by `n_state`) for `ShiftReduce`, then rule
/// numbers again (offset by `n_state + n_rule`) for `Reduce`, then the two
/// fixed slots for `Error` and `Accept`.
pub fn encode_action(action: &Action, n_state: u32, n_rule: u32) -> i32 {
    match (action.kind, action.target) {
        (ActionKind::Shift, ActionTarget::State(final_index)) => final_index as i32,
        (ActionKind::ShiftReduce, ActionTarget::Rule(rule)) => (n_state + rule.i_rule()) as i32,
        (ActionKind::Reduce, ActionTarget::Rule(rule)) => (n_state + n_rule + rule.i_rule()) as i32,
        (ActionKind::Error, _) => (n_state + 2 * n_rule) as i32,
        (ActionKind::Accept, _) => (n_state + 2 * n_rule + 1) as i32,
        _ => panic!("encode_action called on a non-emittable or malformed action: {:?}", action),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedAction {
    Shift { final_index: u32 },
    ShiftReduce { i_rule: u32 },
    Reduce { i_rule: u32 },
    Error,
    Accept,
}

/// Inverse of [`encode_action`]. Panics if `code` falls outside the valid
/// `[0, n_state + 2*n_rule + 1]` range -- a malformed packed table is a
/// caller bug, not a recoverable condition.
pub fn decode_action(code: i32, n_state: u32, n_rule: u32) -> DecodedAction {
    let code = code as u32;
    if code < n_state {
        DecodedAction::Shift { final_index: code }
    } else if code < n_state + n_rule {
        DecodedAction::ShiftReduce {
            i_rule: code - n_state,
        }
    } else if code < n_state + 2 * n_rule {
        DecodedAction::Reduce {
            i_rule: code - n_state - n_rule,
        }
    } else if code == n_state + 2 * n_rule {
        DecodedAction::Error
    } else if code == n_state + 2 * n_rule + 1 {
        DecodedAction::Accept
    } else {
        panic!("action code {} out of range for n_state={} n_rule={}", code, n_state, n_rule);
    }
}

/// Looks up the packed action for `lookahead` starting at `offset`, the way
/// a generated parser's runtime would: read the slot at `lookahead +
/// offset` and accept it only if its stored lookahead matches, since the
/// slot may belong to a different, overlapping state.
pub fn probe(table: &[PackedSlot], offset: i32, lookahead: u32) -> Option<i32> {
    if offset == NO_OFFSET {
        return None;
    }
    let idx = lookahead as i32 + offset;
    if idx < 0 || idx as usize >= table.len() {
        return None;
    }
    let slot = table[idx as usize];
    if slot.lookahead == lookahead as i32 {
        Some(slot.action)
    } else {
        None
    }
}

pub struct Driver {
    pub config: Config,
}

impl Driver {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(
        &self,
        states: &mut [State],
        n_terminal: u32,
        n_rule: u32,
        start_ident: u32,
        error_symbol: Option<Symbol>,
    ) -> Result<GeneratedTables, Error> {
        let n_state = states.len() as u32;

        for state in states.iter_mut() {
            let mut list = ActionList::new();
            for action in state.actions.drain(..) {
                list.push(action);
            }
            state.actions = list.canonicalize();
            compress_state(state, n_terminal, error_symbol, self.config.compress);
        }

        let nxstate = resort_states(states, start_ident, self.config.resort);

        // Shift targets are recorded by the destination state's `ident`;
        // the packed table must instead encode its post-resort `final_index`.
        let index_of: HashMap<u32, u32> = states.iter().map(|s| (s.ident, s.final_index)).collect();

        let mut order: Vec<usize> = (0..states.len()).collect();
        order.sort_by_key(|&i| states[i].final_index);

        let mut packer = TablePacker::new();
        for &idx in &order {
            let final_index = states[idx].final_index;
            if final_index >= nxstate {
                states[idx].i_tkn_ofst = NO_OFFSET;
                states[idx].i_nt_ofst = NO_OFFSET;
                continue;
            }

            let resolved: Vec<Action> = states[idx]
                .actions
                .iter()
                .filter(|a| a.kind.is_emittable())
                .map(|a| resolve_shift_target(*a, &index_of))
                .collect();
            let (tkn, nt): (Vec<&Action>, Vec<&Action>) = resolved
                .iter()
                .partition(|a| a.lookahead.is_terminal(n_terminal));

            states[idx].i_tkn_ofst = pack_half(&mut packer, &tkn, n_state, n_rule)?;
            states[idx].i_nt_ofst = pack_half(&mut packer, &nt, n_state, n_rule)?;
        }

        let n_action_tab = packer.len();
        Ok(GeneratedTables {
            packed_table: packer.into_vec(),
            n_action_tab,
            nxstate,
        })
    }
}

/// Rewrites a `Shift` action's target from the destination state's `ident`
/// to its post-resort `final_index`; every other action kind is returned
/// unchanged.
fn resolve_shift_target(action: Action, index_of: &HashMap<u32, u32>) -> Action {
    match (action.kind, action.target) {
        (ActionKind::Shift, ActionTarget::State(ident)) => {
            let final_index = *index_of
                .get(&ident)
                .unwrap_or_else(|| panic!("shift target state {} not found", ident));
            Action::new(action.lookahead, action.kind, ActionTarget::State(final_index))
        }
        _ => action,
    }
}

fn pack_half(packer: &mut TablePacker, actions: &[&Action], n_state: u32, n_rule: u32) -> Result<i32, Error> {
    if actions.is_empty() {
        return Ok(NO_OFFSET);
    }
    packer.begin_state();
    for action in actions {
        packer.emit(action.lookahead.index() as i32, encode_action(action, n_state, n_rule));
    }
    packer.commit_state()
}
