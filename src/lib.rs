//! Compiles regular expressions into minimized deterministic automata.
//!
//! The pipeline is: pattern (or automaton description) → `Nfa` → `Dfa` by
//! subset construction → minimized `Dfa` → matching. Every stage returns a new
//! value and leaves its input alone.
//!
//! ```
//! use regex_dfa::compile;
//!
//! let dfa = compile("a(b|c)*d").unwrap();
//! assert!(dfa.is_match("abcbcd"));
//! assert!(!dfa.is_match("abc"));
//! ```
extern crate bit_set;
extern crate vec_map;

pub use description::Description;
pub use dfa::{Dfa, DfaState};
pub use error::{Error, FormatError, SyntaxError};
pub use matcher::{MatchOutcome, Matcher};
pub use nfa::{Nfa, NfaState};
pub use state::StateId;
pub use symbol::{Alphabet, Symbol};
pub mod description;
pub mod dfa;
pub mod error;
pub mod matcher;
pub mod minimize;
pub mod nfa;
pub mod regex;
pub mod state;
pub mod symbol;
pub mod table;

/// Parses `pattern` and returns its minimized DFA.
pub fn compile(pattern: &str) -> Result<Dfa, SyntaxError> {
    let nfa: Nfa = pattern.parse()?;
    Ok(Dfa::from_nfa(&nfa).minimize())
}
