//! Default-reduce compression: collapse the most common terminal REDUCE
//! action in a state into a single fallback, freeing its slots in the
//! packed table.

use std::collections::BTreeMap;

use crate::action::ActionKind;
use crate::rule::Rule;
use crate::state::State;
use crate::symbol::Symbol;

/// Finds the most frequent terminal-half REDUCE target in `state` and, if
/// `compress` allows it and nothing blocks it, makes it the state's default
/// reduce action -- marking the now-redundant explicit entries `NotUsed`.
///
/// `n_tkn_act`/`n_nt_act` are always recomputed, even when `compress` is
/// false, since the resorter needs accurate action counts regardless of
/// whether compression actually ran.
pub fn compress_state(state: &mut State, n_terminal: u32, error_symbol: Option<Symbol>, compress: bool) {
    let mut counts: BTreeMap<Rule, u32> = BTreeMap::new();
    for action in &state.actions {
        if action.kind == ActionKind::Reduce && action.lookahead.is_terminal(n_terminal) {
            if let crate::action::ActionTarget::Rule(rule) = action.target {
                *counts.entry(rule).or_insert(0) += 1;
            }
        }
    }

    let best = counts
        .into_iter()
        .max_by(|(ra, ca), (rb, cb)| ca.cmp(cb).then_with(|| rb.i_rule().cmp(&ra.i_rule())));

    let has_blocking_action = state.actions.iter().any(|a| {
        a.lookahead.is_terminal(n_terminal)
            && (a.kind == ActionKind::Accept
                || (a.kind == ActionKind::Shift
                    && error_symbol.is_some_and(|e| e == a.lookahead)))
    });

    if compress {
        if let Some((rule, count)) = best {
            if count > 1 && !has_blocking_action {
                state.i_dflt_reduce = rule.i_rule() as i32;
                state.p_dflt_reduce = Some(rule);
                for action in state.actions.iter_mut() {
                    if action.kind == ActionKind::Reduce
                        && action.lookahead.is_terminal(n_terminal)
                        && matches!(action.target, crate::action::ActionTarget::Rule(r) if r == rule)
                    {
                        action.kind = ActionKind::NotUsed;
                    }
                }
            }
        }
    }

    state.n_tkn_act = state
        .actions
        .iter()
        .filter(|a| a.kind.is_emittable() && a.lookahead.is_terminal(n_terminal))
        .count() as u32;
    state.n_nt_act = state
        .actions
        .iter()
        .filter(|a| a.kind.is_emittable() && !a.lookahead.is_terminal(n_terminal))
        .count() as u32;

    state.auto_reduce = state.n_tkn_act == 0 && state.i_dflt_reduce >= 0;
}
