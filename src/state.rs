use std::fmt;

/// Identifies a state of an `Nfa` or a `Dfa`.
///
/// Ids are dense: an automaton with `n` states uses exactly `0..n`, and state
/// `0` is always the start state. Indexing an automaton with an id it does not
/// own panics, the same as indexing a slice out of bounds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StateId(usize);

impl StateId {
    /// The start state of every automaton.
    pub const START: StateId = StateId(0);

    pub fn new(index: usize) -> StateId {
        StateId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<StateId> for usize {
    fn from(id: StateId) -> usize {
        id.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn large_indices_do_not_wrap() {
        let big = u32::MAX as usize + 1;
        let id = StateId::new(big);
        assert_eq!(id.index(), big);
        assert_ne!(id, StateId::START);
        assert_eq!(usize::from(id), big);
    }
}
