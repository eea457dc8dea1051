use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Index;

use bit_set::BitSet;

use crate::state::StateId;
use crate::symbol::{Alphabet, Symbol};

/// One state of an `Nfa`.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct NfaState {
    pub accepting: bool,
    /// Targets reachable without consuming input.
    pub epsilon: BTreeSet<StateId>,
    /// Targets reachable by consuming a symbol; a symbol may lead to several.
    pub letters: BTreeMap<Symbol, BTreeSet<StateId>>,
}

/// A nondeterministic finite automaton with epsilon transitions.
///
/// States live in a single arena indexed by `StateId`; state `0` is the start
/// state. An `Nfa` is normally produced by parsing a regex (`str::parse`) or
/// an automaton description (`Nfa::from_description`) and then handed to
/// `Dfa::from_nfa`.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Nfa {
    states: Vec<NfaState>,
}

impl Nfa {
    pub fn new() -> Nfa {
        Nfa { states: Vec::new() }
    }

    /// Creates an automaton with `n` unconnected, non-accepting states.
    pub fn with_states(n: usize) -> Nfa {
        Nfa { states: vec![NfaState::default(); n] }
    }

    pub fn add_state(&mut self) -> StateId {
        let id = StateId::new(self.states.len());
        self.states.push(NfaState::default());
        id
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = (StateId, &NfaState)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| (StateId::new(i), s))
    }

    pub fn set_accepting(&mut self, state: StateId, accepting: bool) {
        self.states[state.index()].accepting = accepting;
    }

    pub fn add_epsilon(&mut self, from: StateId, to: StateId) {
        assert!(to.index() < self.states.len(), "epsilon target {} out of range", to);
        self.states[from.index()].epsilon.insert(to);
    }

    pub fn add_letter(&mut self, from: StateId, symbol: Symbol, to: StateId) {
        assert!(to.index() < self.states.len(), "letter target {} out of range", to);
        self.states[from.index()]
            .letters
            .entry(symbol)
            .or_default()
            .insert(to);
    }

    /// Every symbol that labels at least one letter transition.
    pub fn alphabet(&self) -> Alphabet {
        self.states
            .iter()
            .flat_map(|s| s.letters.keys().copied())
            .collect()
    }

    /// Extends `set` with every state reachable from it by epsilon edges.
    pub fn epsilon_closure(&self, set: &mut BitSet) {
        let mut stack: Vec<usize> = set.iter().collect();
        while let Some(s) = stack.pop() {
            for next in &self.states[s].epsilon {
                if set.insert(next.index()) {
                    stack.push(next.index());
                }
            }
        }
    }

    /// The epsilon closure of the start state, or the empty set for an
    /// automaton without states.
    pub fn start_set(&self) -> BitSet {
        let mut set = BitSet::with_capacity(self.states.len());
        if !self.states.is_empty() {
            set.insert(StateId::START.index());
            self.epsilon_closure(&mut set);
        }
        set
    }

    /// The states reached from `set` by consuming `symbol`, before closure.
    pub fn step(&self, set: &BitSet, symbol: Symbol) -> BitSet {
        let mut next = BitSet::with_capacity(self.states.len());
        for s in set.iter() {
            if let Some(targets) = self.states[s].letters.get(&symbol) {
                for t in targets {
                    next.insert(t.index());
                }
            }
        }
        next
    }

    pub fn contains_accepting(&self, set: &BitSet) -> bool {
        set.iter().any(|s| self.states[s].accepting)
    }

    /// Runs the automaton directly on `input` by tracking the set of live
    /// states. This is the reference the deterministic automata must agree with.
    pub fn accepts(&self, input: &str) -> bool {
        let mut current = self.start_set();
        for c in input.chars() {
            if current.is_empty() {
                return false;
            }
            current = self.step(&current, c);
            self.epsilon_closure(&mut current);
        }
        self.contains_accepting(&current)
    }
}

impl Index<StateId> for Nfa {
    type Output = NfaState;
    fn index(&self, id: StateId) -> &NfaState {
        &self.states[id.index()]
    }
}

pub(crate) fn fmt_set<I, T>(f: &mut fmt::Formatter, items: I) -> fmt::Result
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    write!(f, "{{")?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "}}")
}

impl fmt::Display for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (id, state) in self.states() {
            write!(f, "State {}: ", id)?;
            if id == StateId::START {
                write!(f, "Start, ")?;
            }
            write!(f, "{}", if state.accepting { "Accepting" } else { "Not Accepting" })?;
            write!(f, "\tEpsilon: ")?;
            fmt_set(f, &state.epsilon)?;
            write!(f, "\tLetters: {{")?;
            for (i, (c, targets)) in state.letters.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{} -> ", c)?;
                fmt_set(f, targets)?;
            }
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}
