//! Text forms of a `Dfa`.
//!
//! The table form has one line per state:
//!
//! ```text
//! <+|-> <stateId> <target-for-column-1> <target-for-column-2> ...
//! ```
//!
//! with `E` standing in for a missing transition.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};

use crate::dfa::Dfa;
use crate::error::FormatError;
use crate::state::StateId;
use crate::symbol::{Alphabet, Symbol};

/// Marks a missing transition in the table form.
pub const NO_TRANSITION: &str = "E";

fn flag(accepting: bool) -> char {
    if accepting {
        '+'
    } else {
        '-'
    }
}

/// Writes `dfa` as a transition table with one column per symbol of `columns`.
pub fn write_table<W: Write>(dfa: &Dfa, columns: &[Symbol], mut out: W) -> io::Result<()> {
    for (id, state) in dfa.states() {
        write!(out, "{} {}", flag(state.accepting), id)?;
        for c in columns {
            match state.transitions.get(c) {
                Some(to) => write!(out, " {}", to)?,
                None => write!(out, " {}", NO_TRANSITION)?,
            }
        }
        writeln!(out)?;
    }
    out.flush()
}

/// Renders `dfa` in the automaton description format, readable by
/// `Nfa::from_description`.
///
/// Every state gets an `epsilon` self-loop line ahead of its letter edges, so
/// its acceptance flag is kept even when it has no outgoing transitions and
/// state `0` is the first id the reader sees. Letter edges to the same target
/// share a line. Fails if `epsilon` is also one of the DFA's letters.
pub fn to_description(dfa: &Dfa, epsilon: Symbol) -> Result<String, FormatError> {
    let alphabet = dfa.alphabet();
    if alphabet.contains(epsilon) {
        return Err(FormatError::EpsilonIsLetter { symbol: epsilon });
    }
    Ok(DescriptionText { dfa, epsilon, alphabet }.to_string())
}

struct DescriptionText<'a> {
    dfa: &'a Dfa,
    epsilon: Symbol,
    alphabet: Alphabet,
}

impl<'a> fmt::Display for DescriptionText<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.dfa.len(), self.epsilon)?;
        for c in &self.alphabet {
            write!(f, " {}", c)?;
        }
        writeln!(f)?;

        for (id, state) in self.dfa.states() {
            let flag = flag(state.accepting);
            writeln!(f, "{} {} {} {}", flag, id, id, self.epsilon)?;
            let mut by_target: BTreeMap<StateId, Vec<Symbol>> = BTreeMap::new();
            for (&c, &to) in &state.transitions {
                by_target.entry(to).or_default().push(c);
            }
            for (to, symbols) in by_target {
                write!(f, "{} {} {}", flag, id, to)?;
                for c in symbols {
                    write!(f, " {}", c)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nfa::Nfa;

    fn sample() -> Dfa {
        // 0 -a-> 1 (accepting), 1 -a,b-> 1
        let mut dfa = Dfa::new();
        let s0 = dfa.add_state(false);
        let s1 = dfa.add_state(true);
        dfa.add_transition(s0, 'a', s1);
        dfa.add_transition(s1, 'a', s1);
        dfa.add_transition(s1, 'b', s1);
        dfa
    }

    #[test]
    fn table_uses_sentinel() {
        let mut out = Vec::new();
        write_table(&sample(), &['a', 'b', 'c'], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "- 0 1 E E\n+ 1 1 1 E\n");
    }

    #[test]
    fn description_round_trips() {
        let dfa = sample();
        let text = to_description(&dfa, '~').unwrap();
        assert_eq!(text, "2 ~ a b\n- 0 0 ~\n- 0 1 a\n+ 1 1 ~\n+ 1 1 a b\n");

        let read = Nfa::from_description(&text).unwrap();
        let again = Dfa::from_nfa(&read.nfa);
        for s in &["", "a", "ab", "abba", "b", "ba"] {
            assert_eq!(again.is_match(s), dfa.is_match(s), "{:?}", s);
        }
    }

    #[test]
    fn accepting_sink_survives() {
        let mut dfa = Dfa::new();
        let s0 = dfa.add_state(false);
        let s1 = dfa.add_state(true);
        dfa.add_transition(s0, 'x', s1);

        let read = Nfa::from_description(&to_description(&dfa, '_').unwrap()).unwrap();
        assert!(read.nfa.accepts("x"));
        assert!(!read.nfa.accepts(""));
    }

    #[test]
    fn epsilon_must_not_be_a_letter() {
        assert_eq!(
            to_description(&sample(), 'a'),
            Err(FormatError::EpsilonIsLetter { symbol: 'a' })
        );
        assert_eq!(
            to_description(&sample(), 'b'),
            Err(FormatError::EpsilonIsLetter { symbol: 'b' })
        );
        assert!(to_description(&sample(), 'c').is_ok());
    }
}
