//! Merging of indistinguishable DFA states.
//!
//! Each pass groups states by their signature, i.e. the accepting flag plus
//! every `(symbol, target)` pair under the pass's numbering, and keeps only the
//! first state of each group. Merges can expose new equal signatures, so passes
//! repeat until one merges nothing. Passes never touch their input.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use log::{debug, trace};
use vec_map::VecMap;

use crate::dfa::{Dfa, DfaState};
use crate::state::StateId;
use crate::symbol::Symbol;

#[derive(PartialEq, Eq, PartialOrd, Ord, Debug)]
struct Signature {
    accepting: bool,
    transitions: Vec<(Symbol, StateId)>,
}

impl Signature {
    fn of(state: &DfaState) -> Signature {
        Signature {
            accepting: state.accepting,
            transitions: state.transitions.iter().map(|(&c, &to)| (c, to)).collect(),
        }
    }
}

impl Dfa {
    /// Runs one merging pass. Returns `None` if no two states share a
    /// signature, i.e. this DFA is already minimal.
    pub fn minimize_once(&self) -> Option<Dfa> {
        let mut first: BTreeMap<Signature, StateId> = BTreeMap::new();
        // Merged state index -> the surviving state it merges into.
        let mut merged: VecMap<StateId> = VecMap::new();
        for (id, state) in self.states() {
            match first.entry(Signature::of(state)) {
                Entry::Vacant(view) => {
                    view.insert(id);
                }
                Entry::Occupied(view) => {
                    trace!("merging state {} into {}", id, view.get());
                    merged.insert(id.index(), *view.get());
                }
            }
        }
        if merged.is_empty() {
            return None;
        }

        let mut renumbered: VecMap<StateId> = VecMap::with_capacity(self.len());
        for (id, _) in self.states() {
            if !merged.contains_key(id.index()) {
                let next = StateId::new(renumbered.len());
                renumbered.insert(id.index(), next);
            }
        }
        let resolve = |old: StateId| -> StateId {
            let survivor = merged.get(old.index()).copied().unwrap_or(old);
            renumbered[survivor.index()]
        };

        let states = self
            .states()
            .filter(|(id, _)| !merged.contains_key(id.index()))
            .map(|(_, state)| DfaState {
                accepting: state.accepting,
                transitions: state
                    .transitions
                    .iter()
                    .map(|(&c, &to)| (c, resolve(to)))
                    .collect(),
                origin: None,
            })
            .collect();
        Some(Dfa::from_states(states))
    }

    /// Merges states until no pass finds anything to merge, returning the
    /// result as a new DFA. The start state stays state `0`.
    pub fn minimize(&self) -> Dfa {
        let mut current = match self.minimize_once() {
            Some(next) => next,
            None => {
                debug!("DFA with {} states is already minimal", self.len());
                return self.clone();
            }
        };
        let mut passes = 1;
        while let Some(next) = current.minimize_once() {
            debug!("pass {}: {} -> {} states", passes, current.len(), next.len());
            current = next;
            passes += 1;
        }
        debug!(
            "minimized {} states to {} in {} passes",
            self.len(),
            current.len(),
            passes
        );
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 0 -a-> 1 -b-> 3 (accepting), 0 -b-> 2 -b-> 4 (accepting)
    fn diamond() -> Dfa {
        let mut dfa = Dfa::new();
        let s: Vec<StateId> = (0..5).map(|i| dfa.add_state(i >= 3)).collect();
        dfa.add_transition(s[0], 'a', s[1]);
        dfa.add_transition(s[0], 'b', s[2]);
        dfa.add_transition(s[1], 'b', s[3]);
        dfa.add_transition(s[2], 'b', s[4]);
        dfa
    }

    #[test]
    fn merges_take_several_passes() {
        let dfa = diamond();

        // First pass can only see that 3 and 4 are equal.
        let once = dfa.minimize_once().unwrap();
        assert_eq!(once.len(), 4);
        // Second pass now sees 1 and 2 pointing at the same state.
        let twice = once.minimize_once().unwrap();
        assert_eq!(twice.len(), 3);
        assert!(twice.minimize_once().is_none());

        let min = dfa.minimize();
        assert_eq!(min, twice);
        let mid = min.transition(StateId::START, 'a').unwrap();
        assert_eq!(min.transition(StateId::START, 'b'), Some(mid));
        let end = min.transition(mid, 'b').unwrap();
        assert!(min.is_accepting(end));
    }

    #[test]
    fn input_is_left_untouched() {
        let dfa = diamond();
        let before = dfa.clone();
        let _ = dfa.minimize();
        assert_eq!(dfa, before);
    }

    #[test]
    fn survivors_keep_relative_order() {
        // 0 -x-> 1, 0 -y-> 2, 0 -z-> 3; 1 and 3 are accepting sinks, 2 is not.
        let mut dfa = Dfa::new();
        let s: Vec<StateId> = (0..4).map(|i| dfa.add_state(i % 2 == 1)).collect();
        dfa.add_transition(s[0], 'x', s[1]);
        dfa.add_transition(s[0], 'y', s[2]);
        dfa.add_transition(s[0], 'z', s[3]);

        let min = dfa.minimize_once().unwrap();
        assert_eq!(min.len(), 3);
        assert_eq!(min.transition(StateId::START, 'x'), Some(StateId::new(1)));
        assert_eq!(min.transition(StateId::START, 'y'), Some(StateId::new(2)));
        assert_eq!(min.transition(StateId::START, 'z'), Some(StateId::new(1)));
        assert!(min.origin(StateId::START).is_none());
    }

    #[test]
    fn self_loops_compare_by_raw_target() {
        // 1 and 2 both loop on `a` to themselves. Their signatures name
        // different targets, so the pass keeps them apart.
        let mut dfa = Dfa::new();
        let s: Vec<StateId> = (0..3).map(|i| dfa.add_state(i > 0)).collect();
        dfa.add_transition(s[0], 'a', s[1]);
        dfa.add_transition(s[0], 'b', s[2]);
        dfa.add_transition(s[1], 'a', s[1]);
        dfa.add_transition(s[2], 'a', s[2]);
        assert!(dfa.minimize_once().is_none());

        // Loops into a shared state do match.
        let mut dfa = Dfa::new();
        let s: Vec<StateId> = (0..3).map(|i| dfa.add_state(i > 0)).collect();
        dfa.add_transition(s[0], 'a', s[1]);
        dfa.add_transition(s[0], 'b', s[2]);
        dfa.add_transition(s[1], 'a', s[0]);
        dfa.add_transition(s[2], 'a', s[0]);
        assert_eq!(dfa.minimize().len(), 2);
    }

    #[test]
    fn single_state_is_minimal() {
        let mut dfa = Dfa::new();
        dfa.add_state(true);
        assert!(dfa.minimize_once().is_none());
        assert_eq!(dfa.minimize(), dfa);
    }
}
