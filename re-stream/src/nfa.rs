/*!
The automaton graph: states, their transitions and the compiled [`Nfa`].
*/

use core::fmt;

use crate::{compiler::Compiler, Result};

/// A state ID in the NFA: an index into [`Nfa::states`].
pub type StateId = usize;

/// The condition under which a state hands control to its next states.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Transit {
    /// Consume exactly this character.
    Char(char),
    /// Move on without consuming anything (an epsilon transition).
    Free,
}

impl Transit {
    /// Returns true if this is a free transition.
    pub fn is_free(self) -> bool {
        matches!(self, Transit::Free)
    }

    /// Returns true if this transition consumes `c`.
    pub fn consumes(self, c: char) -> bool {
        self == Transit::Char(c)
    }
}

/// A Thompson NFA state.
///
/// Literal states have at most one next state. Free states built for `|`,
/// `?`, `*` and `+` have one or two.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct State {
    /// What it takes to leave this state.
    pub transit: Transit,
    /// The states reachable once `transit` is satisfied, in construction
    /// order.
    pub next: Vec<StateId>,
}

impl State {
    pub(crate) fn new(transit: Transit) -> State {
        State { transit, next: vec![] }
    }
}

/// An NFA fragment during construction: an entry state plus the states whose
/// outgoing edges still dangle.
#[derive(Clone, Debug)]
pub(crate) struct Fragment {
    pub(crate) start: StateId,
    pub(crate) ends: Vec<StateId>,
}

impl Fragment {
    /// A fragment made of one state that is both its entry and its only end.
    pub(crate) fn single(id: StateId) -> Fragment {
        Fragment { start: id, ends: vec![id] }
    }
}

/// A compiled Thompson NFA.
///
/// The graph may contain cycles (from `*` and `+`) and states with several
/// predecessors, so states live in an arena and refer to each other by
/// [`StateId`]. Exactly one state, [`Nfa::terminal`], marks a completed match.
/// It has a free transition and no next states, and is recognized by its ID
/// alone.
///
/// An `Nfa` is never mutated once built. Wrap it in an
/// [`Arc`](std::sync::Arc) to share it between [`Matcher`](crate::Matcher)s.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Nfa {
    states: Vec<State>,
    start: StateId,
    terminal: StateId,
}

impl Nfa {
    /// Compile `pattern` with the default configuration.
    ///
    /// ```
    /// use re_stream::{Nfa, Transit};
    ///
    /// let nfa = Nfa::new("ab")?;
    /// assert_eq!(nfa.len(), 3);
    /// assert_eq!(nfa.state(nfa.start()).transit, Transit::Char('a'));
    /// # Ok::<(), re_stream::Error>(())
    /// ```
    pub fn new(pattern: &str) -> Result<Nfa> {
        Compiler::new().build(pattern)
    }

    pub(crate) fn from_parts(
        states: Vec<State>,
        start: StateId,
        terminal: StateId,
    ) -> Nfa {
        Nfa { states, start, terminal }
    }

    /// Return the state every match attempt begins from.
    pub fn start(&self) -> StateId {
        self.start
    }

    /// Return the terminal marker. Reaching it completes a match.
    pub fn terminal(&self) -> StateId {
        self.terminal
    }

    /// Returns true if `id` is the terminal marker.
    pub fn is_terminal(&self, id: StateId) -> bool {
        id == self.terminal
    }

    /// Return the state with the given ID.
    ///
    /// # Panics
    ///
    /// If `id` did not come from this NFA.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    /// Return all states, indexed by their ID.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Return the number of states, including the terminal marker.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false: every NFA has at least a terminal marker and a start
    /// state.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl fmt::Display for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, state) in self.states.iter().enumerate() {
            let marker = if id == self.start { '>' } else { ' ' };
            write!(f, "{}{:06}: ", marker, id)?;
            if id == self.terminal {
                writeln!(f, "MATCH")?;
                continue;
            }
            match state.transit {
                Transit::Char(c) => write!(f, "{:?}", c)?,
                Transit::Free => write!(f, "free")?,
            }
            write!(f, " =>")?;
            for next in &state.next {
                write!(f, " {}", next)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
