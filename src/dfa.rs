use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use bit_set::BitSet;
use log::{debug, trace};

use crate::nfa::{fmt_set, Nfa};
use crate::state::StateId;
use crate::symbol::{Alphabet, Symbol};

/// One state of a `Dfa`.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct DfaState {
    pub accepting: bool,
    /// At most one target per symbol. A missing symbol means the input is
    /// rejected from here.
    pub transitions: BTreeMap<Symbol, StateId>,
    /// The NFA states this state stands for, when built by subset construction.
    pub origin: Option<BitSet>,
}

/// A deterministic finite automaton whose transition function may be partial.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Dfa {
    states: Vec<DfaState>,
}

impl Dfa {
    /// Creates a DFA with no states. Add at least one before matching: the
    /// first state added is the start state.
    pub fn new() -> Dfa {
        Dfa { states: Vec::new() }
    }

    pub fn add_state(&mut self, accepting: bool) -> StateId {
        let id = StateId::new(self.states.len());
        self.states.push(DfaState { accepting, ..DfaState::default() });
        id
    }

    pub fn set_accepting(&mut self, state: StateId, accepting: bool) {
        self.states[state.index()].accepting = accepting;
    }

    /// Sets the transition from `from` on `symbol`, replacing any previous one.
    pub fn add_transition(&mut self, from: StateId, symbol: Symbol, to: StateId) {
        assert!(to.index() < self.states.len(), "transition target {} out of range", to);
        self.states[from.index()].transitions.insert(symbol, to);
    }

    pub fn transition(&self, from: StateId, symbol: Symbol) -> Option<StateId> {
        self.states[from.index()].transitions.get(&symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = (StateId, &DfaState)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| (StateId::new(i), s))
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.states[state.index()].accepting
    }

    pub fn origin(&self, state: StateId) -> Option<&BitSet> {
        self.states[state.index()].origin.as_ref()
    }

    /// Every symbol that labels at least one transition.
    pub fn alphabet(&self) -> Alphabet {
        self.states
            .iter()
            .flat_map(|s| s.transitions.keys().copied())
            .collect()
    }

    pub(crate) fn from_states(states: Vec<DfaState>) -> Dfa {
        Dfa { states }
    }

    /// Builds the DFA equivalent to `nfa` by subset construction.
    ///
    /// Each DFA state is an epsilon-closed set of NFA states; sets are interned
    /// by value, so two states never share an origin. The start state is the
    /// closure of NFA state `0`.
    pub fn from_nfa(nfa: &Nfa) -> Dfa {
        struct Worklist {
            ids: BTreeMap<BitSet, StateId>,
            pending: Vec<BitSet>,
            dfa: Dfa,
        }

        fn index(worklist: &mut Worklist, nfa: &Nfa, set: BitSet) -> StateId {
            let next_index = StateId::new(worklist.ids.len());
            match worklist.ids.entry(set) {
                Entry::Vacant(view) => {
                    let set = view.key().clone();
                    view.insert(next_index);
                    trace!("DFA state {} = {:?}", next_index, set);
                    worklist.dfa.states.push(DfaState {
                        accepting: nfa.contains_accepting(&set),
                        transitions: BTreeMap::new(),
                        origin: Some(set.clone()),
                    });
                    worklist.pending.push(set);
                    next_index
                }
                Entry::Occupied(view) => *view.get(),
            }
        }

        let alphabet = nfa.alphabet();
        let mut worklist = Worklist {
            ids: BTreeMap::new(),
            pending: Vec::new(),
            dfa: Dfa::new(),
        };
        index(&mut worklist, nfa, nfa.start_set());

        while let Some(set) = worklist.pending.pop() {
            let from = worklist.ids[&set];
            for c in &alphabet {
                let mut next = nfa.step(&set, c);
                if next.is_empty() {
                    continue;
                }
                nfa.epsilon_closure(&mut next);
                let to = index(&mut worklist, nfa, next);
                worklist.dfa.states[from.index()].transitions.insert(c, to);
            }
        }

        debug!(
            "subset construction: {} NFA states -> {} DFA states over {}",
            nfa.len(),
            worklist.dfa.len(),
            alphabet
        );
        worklist.dfa
    }
}

impl Index<StateId> for Dfa {
    type Output = DfaState;
    fn index(&self, id: StateId) -> &DfaState {
        &self.states[id.index()]
    }
}

impl fmt::Display for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (id, state) in self.states() {
            write!(f, "State {}: ", id)?;
            if id == StateId::START {
                write!(f, "Start, ")?;
            }
            write!(f, "{}", if state.accepting { "Accepting" } else { "Not Accepting" })?;
            write!(f, "\tTransitions: {{")?;
            for (i, (c, to)) in state.transitions.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{} -> {}", c, to)?;
            }
            writeln!(f, "}}")?;
        }
        if self.states.iter().any(|s| s.origin.is_some()) {
            writeln!(f, "NFA -> DFA mapping:")?;
            for (id, state) in self.states() {
                if let Some(origin) = &state.origin {
                    fmt_set(f, origin)?;
                    writeln!(f, " -> State {}", id)?;
                }
            }
        }
        Ok(())
    }
}
