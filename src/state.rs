//! The per-state record carried through compression, resorting and packing.

use crate::action::{Action, ActionKind};
use crate::packed_table::NO_OFFSET;
use crate::rule::Rule;

/// One LALR state: its actions plus the bookkeeping fields compression,
/// resorting and packing fill in as they run.
#[derive(Debug, Clone)]
pub struct State {
    pub ident: u32,
    pub basis_configuration_count: u32,
    pub all_configuration_count: u32,
    /// Original state number, before resorting.
    pub initial_index: u32,
    /// State number after resorting; what the packed tables actually index by.
    pub final_index: u32,
    pub actions: Vec<Action>,
    /// Count of emittable actions over the terminal half, set by compression.
    pub n_tkn_act: u32,
    /// Count of emittable actions over the nonterminal half, set by compression.
    pub n_nt_act: u32,
    pub i_tkn_ofst: i32,
    pub i_nt_ofst: i32,
    pub i_dflt_reduce: i32,
    pub p_dflt_reduce: Option<Rule>,
    pub auto_reduce: bool,
}

impl State {
    pub fn new(ident: u32, basis_configuration_count: u32, all_configuration_count: u32, actions: Vec<Action>) -> Self {
        Self {
            ident,
            basis_configuration_count,
            all_configuration_count,
            initial_index: ident,
            final_index: ident,
            actions,
            n_tkn_act: 0,
            n_nt_act: 0,
            i_tkn_ofst: NO_OFFSET,
            i_nt_ofst: NO_OFFSET,
            i_dflt_reduce: -1,
            p_dflt_reduce: None,
            auto_reduce: false,
        }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut Vec<Action> {
        &mut self.actions
    }

    /// Number of actions annotated as a conflict by the (out-of-scope)
    /// conflict resolver. Purely observational; never packed.
    pub fn conflict_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| a.kind.is_conflict_annotation())
            .count()
    }
}
