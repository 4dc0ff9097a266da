/*!
Character-at-a-time simulation of a compiled NFA.
*/

use std::sync::Arc;

use crate::{
    nfa::{Nfa, StateId},
    Result,
};

/// A stream cursor over a compiled [`Nfa`].
///
/// A matcher owns the mutable state of one stream: the active states of the
/// match attempt in progress and the characters consumed by it. The NFA
/// itself is shared, so one compiled pattern can drive many matchers.
///
/// A matcher is in one of two modes:
///
/// * **Not started.** A pushed character is tested against the start state
///   (after following its free transitions). If it can be consumed, a new
///   attempt begins with just that character. Otherwise it is discarded.
/// * **Started.** A pushed character advances every active state. If none can
///   consume it, the attempt fails: the buffer is cleared and the matcher is
///   not started again. The character that broke the attempt is *not* retried
///   as the first character of a new one.
///
/// Each time the terminal marker is reached the callback receives the
/// characters of the attempt so far. Several branches may reach it on the
/// same push (as in `a|a`), in which case the callback runs once per branch.
/// An attempt that reaches the terminal marker and cannot be extended any
/// further is complete, and the matcher returns to not started.
#[derive(Clone, Debug)]
pub struct Matcher {
    nfa: Arc<Nfa>,
    started: bool,
    active: Vec<StateId>,
    matched: String,
    scratch: Scratch,
}

/// Reusable buffers for a single step, so pushing never allocates once they
/// have grown to fit the NFA.
#[derive(Clone, Debug)]
struct Scratch {
    /// States in the epsilon closure, in discovery order. Reused for the
    /// free states expanded while counting terminal hits.
    closure: Vec<StateId>,
    /// The states reached by consuming the pushed character.
    next: Vec<StateId>,
    /// Worklist for counting terminal hits.
    stack: Vec<StateId>,
    /// Indexed by state ID.
    seen: Vec<bool>,
}

impl Scratch {
    fn new(nfa: &Nfa) -> Scratch {
        Scratch {
            closure: vec![],
            next: vec![],
            stack: vec![],
            seen: vec![false; nfa.len()],
        }
    }
}

impl Matcher {
    /// Create a new matcher that is not started.
    pub fn new(nfa: Arc<Nfa>) -> Matcher {
        let scratch = Scratch::new(&nfa);
        Matcher {
            nfa,
            started: false,
            active: vec![],
            matched: String::new(),
            scratch,
        }
    }

    /// Return the NFA this matcher runs.
    pub fn nfa(&self) -> &Arc<Nfa> {
        &self.nfa
    }

    /// Returns true if a match attempt is in progress.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Return the characters consumed by the attempt in progress.
    ///
    /// This is empty when the matcher is not started.
    pub fn matched(&self) -> &str {
        &self.matched
    }

    /// Abandon the attempt in progress, if any.
    pub fn reset(&mut self) {
        self.started = false;
        self.active.clear();
        self.matched.clear();
    }

    /// Push every character of `chunk`, in order.
    pub fn push_str<F: FnMut(&str)>(&mut self, chunk: &str, on_match: &mut F) {
        for c in chunk.chars() {
            self.push(c, on_match);
        }
    }

    /// Push one character, calling `on_match` once for every completed match.
    pub fn push<F: FnMut(&str)>(&mut self, c: char, on_match: &mut F) {
        if !self.started {
            let start = self.nfa.start();
            self.active.clear();
            self.active.push(start);
        }
        self.step(c);
        if self.scratch.next.is_empty() {
            if self.started {
                trace!("attempt {:?} broken by {:?}", self.matched, c);
            }
            self.reset();
            return;
        }
        if !self.started {
            self.started = true;
            self.matched.clear();
            trace!("attempt started by {:?}", c);
        }
        self.matched.push(c);

        let hits = self.count_terminal_hits();
        let terminal = self.nfa.terminal();
        self.active.clear();
        self.active.extend(
            self.scratch.next.iter().copied().filter(|&id| id != terminal),
        );
        for _ in 0..hits {
            trace!("match {:?}", self.matched);
            on_match(&self.matched);
        }
        if self.active.is_empty() {
            self.reset();
        }
    }

    /// Compute the epsilon closure of the active states, then collect into
    /// `scratch.next` the next states of every closure member that consumes
    /// `c`.
    fn step(&mut self, c: char) {
        let Scratch { closure, next, seen, .. } = &mut self.scratch;
        let nfa = &*self.nfa;

        closure.clear();
        for &id in &self.active {
            if !seen[id] {
                seen[id] = true;
                closure.push(id);
            }
        }
        // Closure members are appended while scanning, so free transitions
        // chain transitively before `c` is applied.
        let mut i = 0;
        while i < closure.len() {
            let state = nfa.state(closure[i]);
            i += 1;
            if !state.transit.is_free() {
                continue;
            }
            for &id in &state.next {
                if !seen[id] {
                    seen[id] = true;
                    closure.push(id);
                }
            }
        }

        next.clear();
        for &id in closure.iter() {
            seen[id] = false;
            let state = nfa.state(id);
            if state.transit.consumes(c) {
                next.extend_from_slice(&state.next);
            }
        }
    }

    /// Count how many times the terminal marker is reached from
    /// `scratch.next`, either directly or through free transitions.
    ///
    /// Every occurrence of the terminal in the new set counts, so two
    /// branches that finish together count twice. Each free state is
    /// expanded at most once.
    fn count_terminal_hits(&mut self) -> usize {
        let Scratch { closure: expanded, next, stack, seen } =
            &mut self.scratch;
        let nfa = &*self.nfa;

        let mut hits = 0;
        expanded.clear();
        stack.clear();
        stack.extend(next.iter().rev().copied());
        while let Some(id) = stack.pop() {
            if nfa.is_terminal(id) {
                hits += 1;
                continue;
            }
            let state = nfa.state(id);
            if !state.transit.is_free() || seen[id] {
                continue;
            }
            seen[id] = true;
            expanded.push(id);
            stack.extend(state.next.iter().rev().copied());
        }
        for &id in expanded.iter() {
            seen[id] = false;
        }
        hits
    }
}

/// A pattern compiled together with the callback that receives its matches.
///
/// This is the simplest way to match a stream: build it once, then
/// [`push`](Automaton::push) characters as they arrive.
///
/// ```
/// use re_stream::Automaton;
///
/// let mut count = 0;
/// let mut auto = Automaton::new("a|a", |_: &str| count += 1)?;
/// auto.push('a');
/// drop(auto);
/// assert_eq!(count, 2);
/// # Ok::<(), re_stream::Error>(())
/// ```
pub struct Automaton<F> {
    matcher: Matcher,
    on_match: F,
}

impl<F: FnMut(&str)> Automaton<F> {
    /// Compile `pattern` and attach `on_match` to it.
    ///
    /// No automaton is returned if the pattern is malformed.
    pub fn new(pattern: &str, on_match: F) -> Result<Automaton<F>> {
        let nfa = Nfa::new(pattern)?;
        Ok(Automaton::with_nfa(Arc::new(nfa), on_match))
    }

    /// Attach `on_match` to an already compiled NFA.
    pub fn with_nfa(nfa: Arc<Nfa>, on_match: F) -> Automaton<F> {
        Automaton { matcher: Matcher::new(nfa), on_match }
    }

    /// Push one character.
    pub fn push(&mut self, c: char) {
        self.matcher.push(c, &mut self.on_match);
    }

    /// Push every character of `chunk`, in order.
    pub fn push_str(&mut self, chunk: &str) {
        self.matcher.push_str(chunk, &mut self.on_match);
    }

    /// Abandon the attempt in progress, if any.
    pub fn reset(&mut self) {
        self.matcher.reset();
    }

    /// Returns true if a match attempt is in progress.
    pub fn is_started(&self) -> bool {
        self.matcher.is_started()
    }

    /// Return the characters consumed by the attempt in progress.
    pub fn matched(&self) -> &str {
        self.matcher.matched()
    }

    /// Return the underlying stream cursor.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }
}

impl<F> core::fmt::Debug for Automaton<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Automaton").field("matcher", &self.matcher).finish()
    }
}
