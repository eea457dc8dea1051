use std::iter::{Enumerate, Peekable};
use std::str::{self, Chars};

use log::debug;

use crate::error::SyntaxError;
use crate::nfa::Nfa;
use crate::state::StateId;
use crate::symbol::{is_quantifier, Symbol};

/*
Syntax accepted:

Pattern : Item*
Item    : Symbol Quant?
        : '(' Pattern ')' Quant?
        : '|'
Quant   : '*' | '+'

Concatenation is adjacency. `|` separates alternatives of the innermost open
group, or of the whole pattern at top level.
*/

/// An open scope while parsing. The bottom of the stack is always `Root`.
#[derive(Copy, Clone, Debug)]
enum Frame {
    Root {
        entry: StateId,
        pending_exit: Option<StateId>,
    },
    Group {
        entry: StateId,
        pending_exit: Option<StateId>,
        opened_at: usize,
    },
}

impl Frame {
    fn entry(&self) -> StateId {
        match *self {
            Frame::Root { entry, .. } | Frame::Group { entry, .. } => entry,
        }
    }

    fn pending_exit(&self) -> Option<StateId> {
        match *self {
            Frame::Root { pending_exit, .. } | Frame::Group { pending_exit, .. } => pending_exit,
        }
    }

    fn with_exit(self, exit: StateId) -> Frame {
        match self {
            Frame::Root { entry, .. } => Frame::Root { entry, pending_exit: Some(exit) },
            Frame::Group { entry, opened_at, .. } => Frame::Group {
                entry,
                pending_exit: Some(exit),
                opened_at,
            },
        }
    }
}

type Res<T> = Result<T, SyntaxError>;

/// Builds an `Nfa` in a single left-to-right pass over the pattern.
struct Parser<'a> {
    it: Peekable<Enumerate<Chars<'a>>>,
    nfa: Nfa,
    frames: Vec<Frame>,
    /// Where the next token attaches.
    current: StateId,
}

impl<'a> Parser<'a> {
    fn new(pattern: &'a str) -> Parser<'a> {
        let mut nfa = Nfa::new();
        let start = nfa.add_state();
        Parser {
            it: pattern.chars().enumerate().peekable(),
            nfa,
            frames: vec![Frame::Root { entry: start, pending_exit: None }],
            current: start,
        }
    }

    /// Consumes a postfix quantifier if one comes next.
    fn quantifier(&mut self) -> Option<char> {
        match self.it.peek() {
            Some(&(_, q)) if is_quantifier(q) => {
                self.it.next();
                Some(q)
            }
            _ => None,
        }
    }

    fn symbol(&mut self, c: Symbol) {
        let next = self.nfa.add_state();
        match self.quantifier() {
            Some('*') => {
                self.nfa.add_epsilon(self.current, next);
                self.nfa.add_letter(next, c, next);
            }
            Some(_) => {
                self.nfa.add_letter(self.current, c, next);
                self.nfa.add_letter(next, c, next);
            }
            None => self.nfa.add_letter(self.current, c, next),
        }
        self.current = next;
    }

    fn open(&mut self, offset: usize) {
        let entry = self.nfa.add_state();
        self.nfa.add_epsilon(self.current, entry);
        self.frames.push(Frame::Group { entry, pending_exit: None, opened_at: offset });
        self.current = entry;
    }

    fn close(&mut self, offset: usize) -> Res<()> {
        let frame = match self.frames.pop() {
            Some(frame @ Frame::Group { .. }) => frame,
            _ => return Err(SyntaxError::UnmatchedClose { offset }),
        };
        let entry = frame.entry();
        let exit = match frame.pending_exit() {
            Some(exit) => exit,
            None => self.nfa.add_state(),
        };
        match self.quantifier() {
            Some('*') => {
                self.nfa.add_epsilon(exit, entry);
                self.nfa.add_epsilon(entry, exit);
            }
            Some(_) => self.nfa.add_epsilon(exit, entry),
            None => {}
        }
        self.nfa.add_epsilon(self.current, exit);
        self.current = exit;
        Ok(())
    }

    fn alternate(&mut self) {
        // The root frame is never popped here, so the stack is never empty.
        let frame = match self.frames.pop() {
            Some(frame) => frame,
            None => unreachable!("scope stack lost its root frame"),
        };
        let exit = match frame.pending_exit() {
            Some(exit) => exit,
            None => self.nfa.add_state(),
        };
        self.frames.push(frame.with_exit(exit));
        self.nfa.add_epsilon(self.current, exit);
        self.current = frame.entry();
    }

    fn finish(mut self) -> Res<Nfa> {
        match self.frames.pop() {
            Some(Frame::Root { pending_exit: Some(exit), .. }) => {
                self.nfa.add_epsilon(self.current, exit);
                self.nfa.set_accepting(exit, true);
            }
            Some(Frame::Root { pending_exit: None, .. }) => {
                self.nfa.set_accepting(self.current, true);
            }
            Some(Frame::Group { opened_at, .. }) => {
                return Err(SyntaxError::UnmatchedOpen { offset: opened_at });
            }
            None => unreachable!("scope stack lost its root frame"),
        }
        Ok(self.nfa)
    }

    fn parse(pattern: &'a str) -> Res<Nfa> {
        let mut parser = Parser::new(pattern);
        while let Some((offset, c)) = parser.it.next() {
            match c {
                '(' => parser.open(offset),
                ')' => parser.close(offset)?,
                '|' => parser.alternate(),
                '*' | '+' => {
                    return Err(SyntaxError::StrayQuantifier { quantifier: c, offset });
                }
                c => parser.symbol(c),
            }
        }
        let nfa = parser.finish()?;
        debug!("parsed {:?} into an NFA with {} states", pattern, nfa.len());
        Ok(nfa)
    }
}

impl str::FromStr for Nfa {
    type Err = SyntaxError;
    /// Parse a string as a regular expression.
    fn from_str(s: &str) -> Result<Nfa, SyntaxError> {
        Parser::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nfa(pattern: &str) -> Nfa {
        match pattern.parse::<Nfa>() {
            Ok(nfa) => nfa,
            Err(e) => panic!("{:?} failed to parse: {}", pattern, e),
        }
    }

    fn accepting(nfa: &Nfa) -> Vec<StateId> {
        nfa.states().filter(|(_, s)| s.accepting).map(|(id, _)| id).collect()
    }

    #[test]
    fn plain_symbols_chain() {
        let nfa = nfa("ab");
        assert_eq!(nfa.len(), 3);
        assert_eq!(accepting(&nfa), vec![StateId::new(2)]);
        assert!(nfa.accepts("ab"));
        assert!(!nfa.accepts("a"));
    }

    #[test]
    fn star_on_symbol_uses_epsilon_entry() {
        let nfa = nfa("a*");
        let start = &nfa[StateId::START];
        assert!(start.letters.is_empty());
        assert!(start.epsilon.contains(&StateId::new(1)));
        assert!(nfa[StateId::new(1)].letters[&'a'].contains(&StateId::new(1)));
        assert!(nfa.accepts(""));
        assert!(nfa.accepts("aaaa"));
    }

    #[test]
    fn plus_on_symbol_requires_one() {
        let nfa = nfa("a+");
        assert!(!nfa.accepts(""));
        assert!(nfa.accepts("a"));
        assert!(nfa.accepts("aaa"));
    }

    #[test]
    fn alternation_shares_one_exit() {
        let nfa = nfa("a|b|c");
        assert_eq!(accepting(&nfa).len(), 1);
        for s in &["a", "b", "c"] {
            assert!(nfa.accepts(s), "{}", s);
        }
        assert!(!nfa.accepts("ab"));
        assert!(!nfa.accepts(""));
    }

    #[test]
    fn empty_alternatives() {
        let nfa = nfa("a|");
        assert!(nfa.accepts(""));
        assert!(nfa.accepts("a"));
        let nfa = self::nfa("(|b)c");
        assert!(nfa.accepts("c"));
        assert!(nfa.accepts("bc"));
    }

    #[test]
    fn grouped_quantifiers() {
        let star = nfa("(ab)*");
        assert!(star.accepts(""));
        assert!(star.accepts("abab"));
        assert!(!star.accepts("aba"));

        let plus = nfa("(ab)+");
        assert!(!plus.accepts(""));
        assert!(plus.accepts("ab"));
        assert!(plus.accepts("ababab"));
    }

    #[test]
    fn empty_pattern_accepts_empty_string() {
        let nfa = nfa("");
        assert_eq!(nfa.len(), 1);
        assert!(nfa.accepts(""));
        assert!(!nfa.accepts("a"));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(")a".parse::<Nfa>(), Err(SyntaxError::UnmatchedClose { offset: 0 }));
        assert_eq!("a)".parse::<Nfa>(), Err(SyntaxError::UnmatchedClose { offset: 1 }));
        assert_eq!("(a".parse::<Nfa>(), Err(SyntaxError::UnmatchedOpen { offset: 0 }));
        assert_eq!("(a(b)".parse::<Nfa>(), Err(SyntaxError::UnmatchedOpen { offset: 0 }));
        assert_eq!("((a)".parse::<Nfa>(), Err(SyntaxError::UnmatchedOpen { offset: 0 }));
        assert_eq!("a((b)".parse::<Nfa>(), Err(SyntaxError::UnmatchedOpen { offset: 1 }));
        assert_eq!(
            "*a".parse::<Nfa>(),
            Err(SyntaxError::StrayQuantifier { quantifier: '*', offset: 0 })
        );
        assert_eq!(
            "a|+".parse::<Nfa>(),
            Err(SyntaxError::StrayQuantifier { quantifier: '+', offset: 2 })
        );
        assert_eq!(
            "a**".parse::<Nfa>(),
            Err(SyntaxError::StrayQuantifier { quantifier: '*', offset: 2 })
        );
        assert_eq!(
            "(*)".parse::<Nfa>(),
            Err(SyntaxError::StrayQuantifier { quantifier: '*', offset: 1 })
        );
    }
}
