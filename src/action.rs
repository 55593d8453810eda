//! Per-state actions and the comparator/deduplication pass (`ActionList`)
//! that gives the packer well-defined, repeatable input.

use std::collections::BTreeSet;

use crate::rule::Rule;
use crate::symbol::Symbol;

/// The closed set of action kinds. Declaration order is the comparator's
/// ordinal tiebreak order -- do not reorder these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionKind {
    Shift,
    ShiftReduce,
    Reduce,
    Accept,
    Error,
    NotUsed,
    SsConflict,
    SrConflict,
    RrConflict,
    ShResolved,
    RdResolved,
}

impl ActionKind {
    /// Carries semantic payload for table output.
    pub fn is_emittable(self) -> bool {
        matches!(
            self,
            ActionKind::Shift
                | ActionKind::ShiftReduce
                | ActionKind::Reduce
                | ActionKind::Accept
                | ActionKind::Error
        )
    }

    /// Observational only: reported by the upstream conflict resolver, never packed.
    pub fn is_conflict_annotation(self) -> bool {
        matches!(
            self,
            ActionKind::SsConflict
                | ActionKind::SrConflict
                | ActionKind::RrConflict
                | ActionKind::ShResolved
                | ActionKind::RdResolved
        )
    }
}

/// The payload that goes with an action: a state for `Shift`, a rule for
/// `Reduce`/`ShiftReduce`, nothing for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionTarget {
    State(u32),
    Rule(Rule),
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub lookahead: Symbol,
    pub kind: ActionKind,
    pub target: ActionTarget,
}

impl Action {
    pub fn new(lookahead: Symbol, kind: ActionKind, target: ActionTarget) -> Self {
        Self {
            lookahead,
            kind,
            target,
        }
    }
}

/// A state's raw accumulated actions, reduced to canonical order.
///
/// This is a pure function of its input: sort by `lookahead` ascending, then
/// `kind` ordinal, then (for `Reduce`/`ShiftReduce`) by the target rule's
/// `i_rule`, then by original insertion order. After sorting, duplicate
/// `(lookahead, kind, target)` triples collapse to their first survivor.
/// `NotUsed` and conflict-annotation entries are kept (for report output)
/// but excluded from emission by [`ActionKind::is_emittable`].
pub struct ActionList {
    entries: Vec<Action>,
}

impl ActionList {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn push(&mut self, action: Action) {
        self.entries.push(action);
    }

    pub fn canonicalize(self) -> Vec<Action> {
        let mut indexed: Vec<(usize, Action)> = self.entries.into_iter().enumerate().collect();
        indexed.sort_by(|(ia, a), (ib, b)| {
            a.lookahead
                .index()
                .cmp(&b.lookahead.index())
                .then_with(|| a.kind.cmp(&b.kind))
                .then_with(|| rule_tiebreak(a).cmp(&rule_tiebreak(b)))
                .then_with(|| ia.cmp(ib))
        });

        let mut seen = BTreeSet::new();
        let mut out = Vec::with_capacity(indexed.len());
        for (_, action) in indexed {
            let key = (action.lookahead.index(), action.kind, action.target);
            if seen.insert(key) {
                out.push(action);
            }
        }
        out
    }
}

impl Default for ActionList {
    fn default() -> Self {
        Self::new()
    }
}

fn rule_tiebreak(action: &Action) -> Option<u32> {
    match action.target {
        ActionTarget::Rule(r) => Some(r.i_rule()),
        _ => None,
    }
}
