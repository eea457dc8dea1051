use std::fmt;
use std::ops::Range;

use bit_set::BitSet;

use crate::dfa::Dfa;
use crate::state::StateId;

/// The result of running a whole string through a `Dfa`.
///
/// Offsets count characters from the start of the input.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MatchOutcome {
    Matched,
    /// The symbol at `offset` has no transition from the state reached so far.
    NoTransition { offset: usize },
    /// The input ran out in a non-accepting state. `offset` is the input length.
    EndOfInput { offset: usize },
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        *self == MatchOutcome::Matched
    }

    pub fn failure_offset(&self) -> Option<usize> {
        match *self {
            MatchOutcome::Matched => None,
            MatchOutcome::NoTransition { offset } | MatchOutcome::EndOfInput { offset } => {
                Some(offset)
            }
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MatchOutcome::Matched => write!(f, "match"),
            MatchOutcome::NoTransition { offset } => write!(f, "no match at offset {}", offset),
            MatchOutcome::EndOfInput { offset } => {
                write!(f, "no match at offset {} (end of input)", offset)
            }
        }
    }
}

impl Dfa {
    /// Matches the whole of `input`, reporting where it failed if it did.
    pub fn run(&self, input: &str) -> MatchOutcome {
        let mut state = StateId::START;
        let mut len = 0;
        for (offset, c) in input.chars().enumerate() {
            state = match self.transition(state, c) {
                Some(next) => next,
                None => return MatchOutcome::NoTransition { offset },
            };
            len = offset + 1;
        }
        if self.is_accepting(state) {
            MatchOutcome::Matched
        } else {
            MatchOutcome::EndOfInput { offset: len }
        }
    }

    pub fn is_match(&self, input: &str) -> bool {
        self.run(input).is_match()
    }

    /// States from which some accepting state can be reached, found by walking
    /// transitions backwards from every accepting state.
    pub fn live_states(&self) -> BitSet {
        let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); self.len()];
        for (id, state) in self.states() {
            for to in state.transitions.values() {
                incoming[to.index()].push(id.index());
            }
        }

        let mut live = BitSet::with_capacity(self.len());
        let mut stack = Vec::new();
        for (id, state) in self.states() {
            if state.accepting {
                live.insert(id.index());
                stack.push(id.index());
            }
        }
        while let Some(s) = stack.pop() {
            for &from in &incoming[s] {
                if live.insert(from) {
                    stack.push(from);
                }
            }
        }
        live
    }

    /// States with no path to any accepting state, ascending. They stay in the
    /// automaton; a matcher may treat them as a reject sink.
    pub fn dead_states(&self) -> Vec<StateId> {
        let live = self.live_states();
        (0..self.len())
            .filter(|&i| !live.contains(i))
            .map(StateId::new)
            .collect()
    }
}

/// Searches text with a `Dfa`, stopping early once a dead state is entered.
pub struct Matcher<'a> {
    dfa: &'a Dfa,
    live: BitSet,
}

impl<'a> Matcher<'a> {
    pub fn new(dfa: &'a Dfa) -> Matcher<'a> {
        Matcher { dfa, live: dfa.live_states() }
    }

    pub fn run(&self, input: &str) -> MatchOutcome {
        self.dfa.run(input)
    }

    /// The byte length of the longest prefix of `input` the DFA accepts.
    pub fn longest_prefix(&self, input: &str) -> Option<usize> {
        let mut state = StateId::START;
        let mut best = if self.dfa.is_accepting(state) { Some(0) } else { None };
        for (i, c) in input.char_indices() {
            if !self.live.contains(state.index()) {
                break;
            }
            state = match self.dfa.transition(state, c) {
                Some(next) => next,
                None => break,
            };
            if self.dfa.is_accepting(state) {
                best = Some(i + c.len_utf8());
            }
        }
        best
    }

    /// The leftmost-longest substring of `input` the DFA accepts, as a byte
    /// range.
    pub fn find(&self, input: &str) -> Option<Range<usize>> {
        let starts = input
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(input.len()));
        for start in starts {
            if let Some(len) = self.longest_prefix(&input[start..]) {
                return Some(start..start + len);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nfa::Nfa;

    fn dfa(pattern: &str) -> Dfa {
        let nfa: Nfa = pattern.parse().unwrap();
        Dfa::from_nfa(&nfa).minimize()
    }

    #[test]
    fn run_reports_failure_offsets() {
        let dfa = dfa("a*b");
        assert_eq!(dfa.run("aab"), MatchOutcome::Matched);
        assert_eq!(dfa.run("ba"), MatchOutcome::NoTransition { offset: 1 });
        assert_eq!(dfa.run("ac"), MatchOutcome::NoTransition { offset: 1 });
        assert_eq!(dfa.run("aa"), MatchOutcome::EndOfInput { offset: 2 });
        assert_eq!(dfa.run(""), MatchOutcome::EndOfInput { offset: 0 });
        assert_eq!(dfa.run("ba").failure_offset(), Some(1));
        assert_eq!(dfa.run("b").to_string(), "match");
    }

    #[test]
    fn dead_states_cannot_reach_acceptance() {
        // 0 -a-> 1 (accepting), 0 -b-> 2 -b-> 2, 2 -c-> 3
        let mut dfa = Dfa::new();
        let s: Vec<StateId> = (0..4).map(|i| dfa.add_state(i == 1)).collect();
        dfa.add_transition(s[0], 'a', s[1]);
        dfa.add_transition(s[0], 'b', s[2]);
        dfa.add_transition(s[2], 'b', s[2]);
        dfa.add_transition(s[2], 'c', s[3]);
        assert_eq!(dfa.dead_states(), vec![s[2], s[3]]);
        // Nothing was removed.
        assert_eq!(dfa.len(), 4);
    }

    #[test]
    fn no_accepting_states_means_all_dead() {
        let mut dfa = Dfa::new();
        let a = dfa.add_state(false);
        let b = dfa.add_state(false);
        dfa.add_transition(a, 'x', b);
        assert_eq!(dfa.dead_states(), vec![a, b]);
    }

    #[test]
    fn longest_prefix_and_find() {
        let dfa = dfa("ab+");
        let m = Matcher::new(&dfa);
        assert_eq!(m.longest_prefix("abbbc"), Some(4));
        assert_eq!(m.longest_prefix("a"), None);
        assert_eq!(m.find("xxabbyab"), Some(2..5));
        assert_eq!(m.find("xxx"), None);

        let dfa = self::dfa("a*");
        let m = Matcher::new(&dfa);
        assert_eq!(m.longest_prefix("b"), Some(0));
        assert_eq!(m.find("baa"), Some(0..0));
    }

    #[test]
    fn search_stops_in_dead_states() {
        // 0 -a-> 1 (accepting), 0 -b-> 2, 2 -b-> 2: after `b` nothing can match.
        let mut dfa = Dfa::new();
        let s: Vec<StateId> = (0..3).map(|i| dfa.add_state(i == 1)).collect();
        dfa.add_transition(s[0], 'a', s[1]);
        dfa.add_transition(s[0], 'b', s[2]);
        dfa.add_transition(s[2], 'b', s[2]);
        let m = Matcher::new(&dfa);
        assert_eq!(m.longest_prefix("bbbb"), None);
        assert_eq!(m.find("bbba"), Some(3..4));
        assert!(!m.run("bb").is_match());
    }
}
