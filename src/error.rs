use std::io;
use std::num::ParseIntError;

use thiserror::Error;

/// A malformed regular expression. Offsets count characters, not bytes.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum SyntaxError {
    #[error("found `)` with no matching `(` at offset {offset}")]
    UnmatchedClose { offset: usize },
    #[error("found `(` with no matching `)` (opened at offset {offset})")]
    UnmatchedOpen { offset: usize },
    #[error("unexpected `{quantifier}` at offset {offset}")]
    StrayQuantifier { quantifier: char, offset: usize },
}

/// A malformed automaton description, on reading or writing. Line numbers
/// start at 1.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum FormatError {
    #[error("missing header line")]
    MissingHeader,
    #[error("line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },
    #[error("line {line}: `{token}` is not a state number")]
    BadNumber {
        line: usize,
        token: String,
        #[source]
        source: ParseIntError,
    },
    #[error("line {line}: expected `+` or `-`, found `{token}`")]
    BadFlag { line: usize, token: String },
    #[error("line {line}: `{token}` is not a single symbol")]
    BadSymbol { line: usize, token: String },
    #[error("header declares {declared} states but the transitions use {found}")]
    TooManyStates { declared: u64, found: usize },
    #[error("epsilon symbol `{symbol}` is also used as a letter")]
    EpsilonIsLetter { symbol: char },
}

/// Everything that can stop the command-line driver.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("input file is empty")]
    EmptyInput,
}
