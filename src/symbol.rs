use std::collections::btree_set::{self, BTreeSet};
use std::fmt;
use std::iter::FromIterator;

/// A single input symbol.
pub type Symbol = char;

/// Returns true if `c` is a postfix quantifier.
pub fn is_quantifier(c: Symbol) -> bool {
    c == '*' || c == '+'
}

/// The set of distinct symbols used on letter transitions.
///
/// Iteration is in ascending order.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Alphabet {
    symbols: BTreeSet<Symbol>,
}

impl Alphabet {
    pub fn new() -> Alphabet {
        Alphabet { symbols: BTreeSet::new() }
    }

    /// Adds a symbol, returning whether it was new.
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        self.symbols.insert(symbol)
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.symbols.contains(&symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> Symbols {
        Symbols { inner: self.symbols.iter() }
    }

    /// Orders the alphabet for a table: `preferred` first (in the given order,
    /// skipping duplicates), then every remaining symbol ascending.
    pub fn columns(&self, preferred: &[Symbol]) -> Vec<Symbol> {
        let mut columns: Vec<Symbol> = Vec::with_capacity(self.len() + preferred.len());
        for &c in preferred {
            if !columns.contains(&c) {
                columns.push(c);
            }
        }
        for c in self.iter() {
            if !columns.contains(&c) {
                columns.push(c);
            }
        }
        columns
    }
}

/// Iterator over the symbols of an `Alphabet`, ascending.
pub struct Symbols<'a> {
    inner: btree_set::Iter<'a, Symbol>,
}

impl<'a> Iterator for Symbols<'a> {
    type Item = Symbol;
    fn next(&mut self) -> Option<Symbol> {
        self.inner.next().copied()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Alphabet {
    type Item = Symbol;
    type IntoIter = Symbols<'a>;
    fn into_iter(self) -> Symbols<'a> {
        self.iter()
    }
}

impl FromIterator<Symbol> for Alphabet {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Alphabet {
        Alphabet { symbols: iter.into_iter().collect() }
    }
}

impl Extend<Symbol> for Alphabet {
    fn extend<I: IntoIterator<Item = Symbol>>(&mut self, iter: I) {
        self.symbols.extend(iter)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, c) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, "}}")
    }
}
