//! State resorting: places the start state first, states with the most
//! actions next (for pack density), and auto-reduce states last (so the
//! driver can trim them out of the packed tables entirely).

use crate::state::State;

/// Assigns `final_index` to every state in `states`.
///
/// When `resort` is false, `final_index` is left equal to `initial_index`
/// for every state -- and, per the design, tail-trimming of auto-reduce
/// states is skipped along with resorting, since the driver only ever
/// trims states past `nxstate`, the boundary this function computes.
///
/// Returns `nxstate`: the number of states that still need a row in the
/// packed tables (everything from here to the end is an auto-reduce state,
/// safe to drop from the action tables and resolve directly to its default
/// reduce instead).
pub fn resort_states(states: &mut [State], start_ident: u32, resort: bool) -> u32 {
    let nstate = states.len() as u32;
    if !resort {
        for state in states.iter_mut() {
            state.final_index = state.initial_index;
        }
        return nstate;
    }

    let start_pos = states
        .iter()
        .position(|s| s.ident == start_ident)
        .expect("start state must be present");

    let mut rest: Vec<usize> = (0..states.len())
        .filter(|&i| i != start_pos && !states[i].auto_reduce)
        .collect();
    let mut tail: Vec<usize> = (0..states.len())
        .filter(|&i| i != start_pos && states[i].auto_reduce)
        .collect();

    rest.sort_by(|&a, &b| {
        let sa = &states[a];
        let sb = &states[b];
        let total_a = sa.n_tkn_act + sa.n_nt_act;
        let total_b = sb.n_tkn_act + sb.n_nt_act;
        total_b
            .cmp(&total_a)
            .then_with(|| sb.n_tkn_act.cmp(&sa.n_tkn_act))
            .then_with(|| sb.i_dflt_reduce.cmp(&sa.i_dflt_reduce))
            .then_with(|| sa.initial_index.cmp(&sb.initial_index))
    });
    tail.sort_by_key(|&i| states[i].initial_index);

    let nxstate = 1 + rest.len() as u32;

    states[start_pos].final_index = 0;
    for (new_index, &original_pos) in rest.iter().enumerate() {
        states[original_pos].final_index = 1 + new_index as u32;
    }
    for (offset, &original_pos) in tail.iter().enumerate() {
        states[original_pos].final_index = nxstate + offset as u32;
    }

    nxstate
}
