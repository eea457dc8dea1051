//! Reading automata from the line-oriented description format.
//!
//! ```text
//! <stateCount> <epsilonSymbol> <alphabetSymbol>...
//! <+|-> <fromId> <toId> <symbol>...
//! ```
//!
//! The flag on an edge line marks its source state as accepting (`+`) or not
//! (`-`); a later line for the same source overrides an earlier one. Source
//! ids may be any non-negative integers and are renumbered densely in the
//! order they are first seen, so the first edge's source becomes the start
//! state. Declared states that no edge mentions are unreachable and are not
//! allocated.

use std::collections::HashMap;

use log::debug;

use crate::error::FormatError;
use crate::nfa::Nfa;
use crate::state::StateId;
use crate::symbol::{Alphabet, Symbol};

/// The result of reading an automaton description.
#[derive(Clone, Debug)]
pub struct Description {
    pub nfa: Nfa,
    /// The symbol that marks epsilon edges.
    pub epsilon: Symbol,
    /// The alphabet as written in the header, in header order.
    pub declared: Vec<Symbol>,
    /// The symbols actually used on letter edges.
    pub alphabet: Alphabet,
}

fn symbol(line: usize, token: &str) -> Result<Symbol, FormatError> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(FormatError::BadSymbol { line, token: token.to_owned() }),
    }
}

fn number(line: usize, token: &str) -> Result<u64, FormatError> {
    token.parse().map_err(|source| FormatError::BadNumber {
        line,
        token: token.to_owned(),
        source,
    })
}

struct Renumber {
    ids: HashMap<u64, StateId>,
}

impl Renumber {
    fn get(&mut self, raw: u64) -> StateId {
        let next = StateId::new(self.ids.len());
        *self.ids.entry(raw).or_insert(next)
    }
}

impl Nfa {
    /// Parses an automaton description.
    pub fn from_description(text: &str) -> Result<Description, FormatError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l))
            .filter(|(_, l)| !l.trim().is_empty());

        let (header_line, header) = lines.next().ok_or(FormatError::MissingHeader)?;
        let mut fields = header.split_whitespace();
        let count = fields.next().ok_or(FormatError::MissingField {
            line: header_line,
            field: "state count",
        })?;
        let count = number(header_line, count)?;
        let epsilon = fields.next().ok_or(FormatError::MissingField {
            line: header_line,
            field: "epsilon symbol",
        })?;
        let epsilon = symbol(header_line, epsilon)?;
        let declared = fields
            .map(|t| symbol(header_line, t))
            .collect::<Result<Vec<_>, _>>()?;

        // Lines are validated before anything is added. Only referenced states
        // are allocated; the header count is an upper bound, not a size.
        let mut renumber = Renumber { ids: HashMap::new() };
        let mut edges = Vec::new();
        for (line, text) in lines {
            let mut fields = text.split_whitespace();
            let accepting = match fields.next() {
                Some("+") => true,
                Some("-") => false,
                Some(other) => {
                    return Err(FormatError::BadFlag { line, token: other.to_owned() });
                }
                None => unreachable!("blank lines are filtered"),
            };
            let from = fields
                .next()
                .ok_or(FormatError::MissingField { line, field: "source state" })?;
            let to = fields
                .next()
                .ok_or(FormatError::MissingField { line, field: "destination state" })?;
            let from = renumber.get(number(line, from)?);
            let to = renumber.get(number(line, to)?);
            let symbols = fields
                .map(|t| symbol(line, t))
                .collect::<Result<Vec<_>, _>>()?;
            if symbols.is_empty() {
                return Err(FormatError::MissingField { line, field: "edge symbol" });
            }
            edges.push((accepting, from, to, symbols));
        }

        let found = renumber.ids.len();
        if (found as u64) > count {
            return Err(FormatError::TooManyStates { declared: count, found });
        }

        let mut nfa = Nfa::with_states(found);
        let mut alphabet = Alphabet::new();
        for (accepting, from, to, symbols) in edges {
            nfa.set_accepting(from, accepting);
            for c in symbols {
                if c == epsilon {
                    nfa.add_epsilon(from, to);
                } else {
                    alphabet.insert(c);
                    nfa.add_letter(from, c, to);
                }
            }
        }
        debug!(
            "read a description with {} states ({} used) over {}",
            count, found, alphabet
        );

        Ok(Description { nfa, epsilon, declared, alphabet })
    }
}
