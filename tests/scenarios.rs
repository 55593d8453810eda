//! End-to-end scenarios exercising the full compress -> resort -> pack
//! pipeline against concrete, hand-built grammars.

use acttab::{
    decode_action, probe, Action, ActionKind, ActionTarget, Config, DecodedAction, Driver, Rule,
    State, Symbol, NO_OFFSET,
};

fn sym(i: u32) -> Symbol {
    Symbol::new(i)
}

/// Scenario A — minimal grammar `S -> a`: one state with a single terminal
/// shift to the accepting state, and the accepting state itself.
#[test]
fn scenario_a_minimal_shift_grammar() {
    let s0 = State::new(
        0,
        1,
        1,
        vec![Action::new(sym(0), ActionKind::Shift, ActionTarget::State(1))],
    );
    let s1 = State::new(
        1,
        1,
        1,
        vec![Action::new(sym(1), ActionKind::Accept, ActionTarget::None)],
    );
    let mut states = vec![s0, s1];
    let n_state = states.len() as u32;
    let driver = Driver::new(Config::default());
    let tables = driver.run(&mut states, 2, 0, 0, None).unwrap();

    let start = states.iter().find(|s| s.ident == 0).unwrap();
    let accept_state = states.iter().find(|s| s.ident == 1).unwrap();
    let code = probe(&tables.packed_table, start.i_tkn_ofst, 0 /* the `a` symbol */).unwrap();
    assert_eq!(
        decode_action(code, n_state, 0),
        DecodedAction::Shift { final_index: accept_state.final_index }
    );
}

/// Scenario B — conflict-free two-rule `E -> E + T | T; T -> id`: the state
/// reached after parsing `T` reduces on every terminal lookahead except
/// `+`. Default-reduce compression must remove the redundant explicit
/// `REDUCE T` entries, leaving `iDfltReduce` set to that rule and only the
/// `+` shift surviving in the packed table.
#[test]
fn scenario_b_default_reduce_compression() {
    let reduce_t = Rule::new(1, 1); // T -> id
    let plus = sym(0);
    let other_terminals = [sym(1), sym(2)];
    let mut actions: Vec<Action> = other_terminals
        .iter()
        .map(|&la| Action::new(la, ActionKind::Reduce, ActionTarget::Rule(reduce_t)))
        .collect();
    actions.push(Action::new(plus, ActionKind::Shift, ActionTarget::State(0)));

    let mut states = vec![State::new(0, 1, 1, actions)];
    let driver = Driver::new(Config::default());
    let tables = driver.run(&mut states, 3, 2, 0, None).unwrap();

    let state = &states[0];
    assert_eq!(state.i_dflt_reduce, reduce_t.i_rule() as i32);
    assert_eq!(tables.n_action_tab, 1, "only the `+` shift remains explicit");
    let code = probe(&tables.packed_table, state.i_tkn_ofst, plus.index()).unwrap();
    assert!(matches!(decode_action(code, 1, 2), DecodedAction::Shift { .. }));
}

/// Scenario C — overlap reuse: two states whose sorted terminal action
/// lists are identical must share the same packed offset, and the second
/// state must add nothing new to the table.
#[test]
fn scenario_c_overlap_reuse() {
    let start = State::new(
        0,
        1,
        1,
        vec![Action::new(sym(0), ActionKind::Shift, ActionTarget::State(1))],
    );
    // Both echo back to the start state on the same two lookaheads.
    let twin_actions = || {
        vec![
            Action::new(sym(1), ActionKind::Shift, ActionTarget::State(0)),
            Action::new(sym(2), ActionKind::Shift, ActionTarget::State(0)),
        ]
    };
    let state_a = State::new(1, 1, 1, twin_actions());
    let state_b = State::new(2, 1, 1, twin_actions());

    let mut states = vec![start, state_a, state_b];
    let driver = Driver::new(Config::default());
    let tables = driver.run(&mut states, 3, 0, 0, None).unwrap();

    let a = states.iter().find(|s| s.ident == 1).unwrap();
    let b = states.iter().find(|s| s.ident == 2).unwrap();
    assert_eq!(a.i_tkn_ofst, b.i_tkn_ofst, "identical action lists must reuse the same offset");
    assert_eq!(tables.n_action_tab, 3, "the twin state contributed no new packed entries");
}

/// Scenario D — hole filling: three states with disjoint singleton
/// terminal lookahead sets {5}, {7}, {3} must pack into a tight shared
/// span rather than one slot per state per the raw lookahead range.
#[test]
fn scenario_d_hole_filling() {
    let s_a = State::new(0, 1, 1, vec![Action::new(sym(5), ActionKind::Accept, ActionTarget::None)]);
    let s_b = State::new(1, 1, 1, vec![Action::new(sym(7), ActionKind::Accept, ActionTarget::None)]);
    let s_c = State::new(2, 1, 1, vec![Action::new(sym(3), ActionKind::Accept, ActionTarget::None)]);

    let mut states = vec![s_a, s_b, s_c];
    let n_state = states.len() as u32;
    let driver = Driver::new(Config::default());
    let tables = driver.run(&mut states, 8, 0, 0, None).unwrap();

    assert!(tables.n_action_tab <= 8, "disjoint singleton lookaheads must pack densely");
    for (ident, lookahead) in [(0u32, 5u32), (1, 7), (2, 3)] {
        let state = states.iter().find(|s| s.ident == ident).unwrap();
        let code = probe(&tables.packed_table, state.i_tkn_ofst, lookahead)
            .expect("each state's own offset must retrieve its own action");
        assert_eq!(decode_action(code, n_state, 0), DecodedAction::Accept);
    }
}

/// Scenario E — resort: with resort enabled, a busier state must receive a
/// lower final index than a quieter one, regardless of original order.
#[test]
fn scenario_e_resort_orders_by_action_count() {
    let start = State::new(
        0,
        1,
        1,
        vec![Action::new(sym(5), ActionKind::Shift, ActionTarget::State(1))],
    );
    let state1 = State::new(1, 1, 1, vec![Action::new(sym(0), ActionKind::Shift, ActionTarget::State(0))]);
    let state2 = State::new(
        2,
        1,
        1,
        vec![
            Action::new(sym(0), ActionKind::Shift, ActionTarget::State(0)),
            Action::new(sym(1), ActionKind::Shift, ActionTarget::State(0)),
        ],
    );
    let state3 = State::new(
        3,
        1,
        1,
        (0..5)
            .map(|i| Action::new(sym(i), ActionKind::Shift, ActionTarget::State(0)))
            .collect(),
    );

    let mut states = vec![start, state1, state2, state3];
    let driver = Driver::new(Config::default());
    driver.run(&mut states, 6, 0, 0, None).unwrap();

    let by_ident = |ident: u32| states.iter().find(|s| s.ident == ident).unwrap();
    assert!(
        by_ident(3).final_index < by_ident(1).final_index,
        "the 5-action state must sort ahead of the 1-action state"
    );
}

/// Scenario F — no-compress option: with `compress` disabled, no state may
/// have a default reduce, and every reduce stays explicit in the packed
/// table.
#[test]
fn scenario_f_no_compress_option() {
    let rule = Rule::new(4, 2);
    let actions = vec![
        Action::new(sym(0), ActionKind::Reduce, ActionTarget::Rule(rule)),
        Action::new(sym(1), ActionKind::Reduce, ActionTarget::Rule(rule)),
        Action::new(sym(2), ActionKind::Reduce, ActionTarget::Rule(rule)),
    ];
    let mut states = vec![State::new(0, 1, 1, actions)];
    let config = Config {
        compress: false,
        resort: true,
        basis_only: false,
    };
    let driver = Driver::new(config);
    let tables = driver.run(&mut states, 3, 5, 0, None).unwrap();

    let state = &states[0];
    assert_eq!(state.i_dflt_reduce, -1, "compression must not run at all");
    assert_eq!(tables.n_action_tab, 3, "every reduce stays explicit");
    for lookahead in 0..3u32 {
        let code = probe(&tables.packed_table, state.i_tkn_ofst, lookahead).unwrap();
        assert_eq!(decode_action(code, 1, 5), DecodedAction::Reduce { i_rule: 4 });
    }
}

/// An ACCEPT action on the terminal half blocks default-reduce compression
/// outright, even though a rule would otherwise dominate.
#[test]
fn blocking_accept_action_prevents_default_reduce_compression() {
    let rule = Rule::new(1, 1);
    let actions = vec![
        Action::new(sym(0), ActionKind::Reduce, ActionTarget::Rule(rule)),
        Action::new(sym(1), ActionKind::Reduce, ActionTarget::Rule(rule)),
        Action::new(sym(2), ActionKind::Accept, ActionTarget::None),
    ];
    let mut states = vec![State::new(0, 1, 1, actions)];
    let driver = Driver::new(Config::default());
    driver.run(&mut states, 3, 2, 0, None).unwrap();

    assert_eq!(states[0].i_dflt_reduce, -1);
    assert_eq!(states[0].n_tkn_act, 3);
}

/// A shift on the designated error-recovery symbol also blocks
/// compression, distinct from the ACCEPT case.
#[test]
fn blocking_error_symbol_shift_prevents_default_reduce_compression() {
    let rule = Rule::new(1, 1);
    let error_symbol = sym(2);
    let actions = vec![
        Action::new(sym(0), ActionKind::Reduce, ActionTarget::Rule(rule)),
        Action::new(sym(1), ActionKind::Reduce, ActionTarget::Rule(rule)),
        Action::new(error_symbol, ActionKind::Shift, ActionTarget::State(0)),
    ];
    let mut states = vec![State::new(0, 1, 1, actions)];
    let driver = Driver::new(Config::default());
    driver.run(&mut states, 3, 2, 0, Some(error_symbol)).unwrap();

    assert_eq!(states[0].i_dflt_reduce, -1);
}

/// Resorting must also drop purely auto-reducing states out of `nxstate`,
/// so they never receive a row in the packed tables.
#[test]
fn auto_reduce_states_are_placed_in_the_resort_tail() {
    let start = State::new(
        0,
        1,
        1,
        vec![Action::new(sym(0), ActionKind::Shift, ActionTarget::State(1))],
    );
    let busy = State::new(
        1,
        1,
        1,
        vec![
            Action::new(sym(1), ActionKind::Shift, ActionTarget::State(2)),
            Action::new(sym(2), ActionKind::Shift, ActionTarget::State(0)),
        ],
    );
    let rule = Rule::new(0, 0);
    let auto = State::new(
        2,
        1,
        1,
        vec![
            Action::new(sym(0), ActionKind::Reduce, ActionTarget::Rule(rule)),
            Action::new(sym(1), ActionKind::Reduce, ActionTarget::Rule(rule)),
        ],
    );
    let mut states = vec![start, busy, auto];
    let driver = Driver::new(Config::default());
    let tables = driver.run(&mut states, 3, 1, 0, None).unwrap();

    let by_ident = |ident: u32| states.iter().find(|s| s.ident == ident).unwrap();
    assert_eq!(tables.nxstate, 2);
    assert!(by_ident(2).auto_reduce);
    assert_eq!(by_ident(2).i_tkn_ofst, NO_OFFSET);
}

/// Several states with disjoint lookahead ranges pack into genuinely
/// overlapping table space, and each state's own offset still retrieves
/// only its own actions.
#[test]
fn overlapping_states_probe_to_the_correct_actions() {
    let s0 = State::new(
        0,
        1,
        1,
        vec![
            Action::new(sym(0), ActionKind::Shift, ActionTarget::State(1)),
            Action::new(sym(1), ActionKind::Shift, ActionTarget::State(2)),
        ],
    );
    let s1 = State::new(
        1,
        1,
        1,
        vec![Action::new(sym(2), ActionKind::Accept, ActionTarget::None)],
    );
    let s2 = State::new(
        2,
        1,
        1,
        vec![Action::new(sym(3), ActionKind::Accept, ActionTarget::None)],
    );
    let mut states = vec![s0, s1, s2];
    let n_state = states.len() as u32;
    let driver = Driver::new(Config::default());
    let tables = driver.run(&mut states, 4, 0, 0, None).unwrap();

    for ident in 0..3u32 {
        let state = states.iter().find(|s| s.ident == ident).unwrap();
        for action in state.actions.iter().filter(|a| a.kind.is_emittable()) {
            let code = probe(&tables.packed_table, state.i_tkn_ofst, action.lookahead.index())
                .expect("every emitted action for a packed state must be retrievable");
            let decoded = decode_action(code, n_state, 0);
            match action.kind {
                ActionKind::Shift => assert!(matches!(decoded, DecodedAction::Shift { .. })),
                ActionKind::Accept => assert_eq!(decoded, DecodedAction::Accept),
                _ => unreachable!(),
            }
        }
    }
}
