/*!
Thompson's construction over postfix tokens.
*/

use crate::{
    config::Config,
    nfa::{Fragment, Nfa, State, StateId, Transit},
    postfix::{compile_to_postfix_with, Postfix, Token},
    Error, Result,
};

/// Build an NFA from postfix tokens using the default configuration.
///
/// ```
/// use re_stream::{build_nfa, Postfix};
///
/// let postfix: Postfix = "ab*.".parse()?;
/// let nfa = build_nfa(&postfix)?;
/// assert_eq!(nfa.len(), 4);
/// # Ok::<(), re_stream::Error>(())
/// ```
pub fn build_nfa(postfix: &Postfix) -> Result<Nfa> {
    Compiler::new().build_from_postfix(postfix)
}

/// Compiles patterns into Thompson NFAs.
///
/// Each postfix token pushes or combines fragments on a stack. Every operator
/// creates at most one state, so the NFA has `O(len(pattern))` states.
#[derive(Clone, Debug, Default)]
pub struct Compiler {
    config: Config,
}

impl Compiler {
    /// Create a new compiler with the default configuration.
    pub fn new() -> Compiler {
        Compiler { config: Config::default() }
    }

    /// Apply the given configuration to this compiler.
    pub fn configure(&mut self, config: Config) -> &mut Compiler {
        self.config = config;
        self
    }

    /// Compile a pattern into an NFA.
    pub fn build(&self, pattern: &str) -> Result<Nfa> {
        let postfix = compile_to_postfix_with(pattern, &self.config)?;
        self.build_from_postfix(&postfix)
    }

    /// Build an NFA from postfix tokens.
    ///
    /// This fails with [`Error::MalformedAutomaton`] unless the tokens reduce
    /// to exactly one fragment. Postfix produced by
    /// [`compile_to_postfix`](crate::compile_to_postfix) always does.
    pub fn build_from_postfix(&self, postfix: &Postfix) -> Result<Nfa> {
        if let Some(limit) = self.config.get_size_limit() {
            // One state per non-concatenation token, plus the terminal.
            let needed = 1 + postfix
                .tokens()
                .iter()
                .filter(|token| token.allocates())
                .count();
            if needed > limit {
                return Err(Error::TooComplex { limit });
            }
        }
        let mut builder = Builder::new();
        for &token in postfix.tokens() {
            builder.push(token)?;
        }
        let nfa = builder.finish()?;
        debug!("built NFA with {} states from postfix {}", nfa.len(), postfix);
        Ok(nfa)
    }
}

/// The mutable half of construction: the state arena plus the fragment
/// stack.
#[derive(Debug)]
struct Builder {
    states: Vec<State>,
    stack: Vec<Fragment>,
    terminal: StateId,
}

impl Builder {
    fn new() -> Builder {
        let mut builder =
            Builder { states: vec![], stack: vec![], terminal: 0 };
        builder.terminal = builder.add(Transit::Free);
        builder
    }

    fn add(&mut self, transit: Transit) -> StateId {
        let id = self.states.len();
        self.states.push(State::new(transit));
        id
    }

    /// Add a free state branching to `targets`, in order.
    fn split(&mut self, targets: &[StateId]) -> StateId {
        let id = self.add(Transit::Free);
        self.states[id].next.extend_from_slice(targets);
        id
    }

    /// Connect every dangling end in `ends` to `to`.
    fn patch(&mut self, ends: &[StateId], to: StateId) {
        for &end in ends {
            self.states[end].next.push(to);
        }
    }

    fn pop(&mut self) -> Result<Fragment> {
        self.stack.pop().ok_or(Error::MalformedAutomaton { fragments: 0 })
    }

    fn push(&mut self, token: Token) -> Result<()> {
        let frag = match token {
            Token::Literal(c) => Fragment::single(self.add(Transit::Char(c))),
            Token::Concat => {
                let e2 = self.pop()?;
                let e1 = self.pop()?;
                self.patch(&e1.ends, e2.start);
                Fragment { start: e1.start, ends: e2.ends }
            }
            Token::Alternate => {
                let e1 = self.pop()?;
                let mut e2 = self.pop()?;
                let s = self.split(&[e1.start, e2.start]);
                let mut ends = e1.ends;
                ends.append(&mut e2.ends);
                Fragment { start: s, ends }
            }
            Token::ZeroOrOne => {
                let e1 = self.pop()?;
                let s = self.split(&[e1.start]);
                let mut ends = e1.ends;
                ends.push(s);
                Fragment { start: s, ends }
            }
            Token::ZeroOrMore => {
                let e1 = self.pop()?;
                let s = self.split(&[e1.start]);
                self.patch(&e1.ends, s);
                Fragment::single(s)
            }
            Token::OneOrMore => {
                let e1 = self.pop()?;
                let s = self.split(&[e1.start]);
                self.patch(&e1.ends, s);
                Fragment { start: e1.start, ends: vec![s] }
            }
        };
        self.stack.push(frag);
        Ok(())
    }

    fn finish(mut self) -> Result<Nfa> {
        if self.stack.len() != 1 {
            return Err(Error::MalformedAutomaton {
                fragments: self.stack.len(),
            });
        }
        let frag = self.pop()?;
        let terminal = self.terminal;
        self.patch(&frag.ends, terminal);
        Ok(Nfa::from_parts(self.states, frag.start, terminal))
    }
}
