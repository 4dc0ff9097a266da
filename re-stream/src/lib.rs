/*!
A streaming regular expression matcher built on Thompson's NFA construction.

Most matchers scan a complete haystack. This crate instead consumes input one
character at a time, which suits text that arrives incrementally (a socket, a
pipe, a log tail), and invokes a callback every time a match completes. Nothing
is buffered beyond the characters of the match attempt currently in progress
and nothing is ever re-scanned.

Compilation happens in three stages:

1. [`compile_to_postfix`] turns the infix pattern into a [`Postfix`] token
   sequence in which concatenation is explicit and precedence is resolved.
2. [`Compiler`] runs Thompson's construction over the postfix tokens and
   produces an immutable [`Nfa`].
3. A [`Matcher`] walks the NFA one pushed character at a time.

# Example

```
use re_stream::Automaton;

let mut matches = vec![];
let mut auto = Automaton::new("ab*c", |m: &str| matches.push(m.to_string()))?;
auto.push_str("xxabbbcyyac");
drop(auto);
assert_eq!(matches, vec!["abbbc", "ac"]);
# Ok::<(), re_stream::Error>(())
```

# Sharing one compiled pattern

An [`Nfa`] is never mutated after construction, so a single compiled pattern
can back any number of independent streams:

```
use std::sync::Arc;
use re_stream::{Matcher, Nfa};

let nfa = Arc::new(Nfa::new("colou?r")?);
let (mut left, mut right) = (Matcher::new(nfa.clone()), Matcher::new(nfa));
let mut found = vec![];
left.push_str("color", &mut |m: &str| found.push(m.to_string()));
right.push_str("colour", &mut |m: &str| found.push(m.to_string()));
assert_eq!(found, vec!["color", "colour"]);
# Ok::<(), re_stream::Error>(())
```

# Syntax

Every character is a literal except for the following:

```text
(re)    grouping
x|y     alternation
x*      zero or more
x+      one or more
x?      zero or one
```

Adjacent atoms are implicitly concatenated. There is no escaping, no character
classes and no anchors.

# Crate features

* **logging** (enabled by default) - Emits compile and match diagnostics
  through the `log` crate.
*/

#![deny(missing_docs)]

#[macro_use]
mod macros;

pub mod compiler;
pub mod config;
pub mod matcher;
pub mod nfa;
pub mod postfix;

pub use compiler::{build_nfa, Compiler};
pub use config::Config;
pub use matcher::{Automaton, Matcher};
pub use nfa::{Nfa, State, StateId, Transit};
pub use postfix::{compile_to_postfix, compile_to_postfix_with, Postfix, Token};

/// The result of compiling a pattern into a streaming automaton.
pub type Result<T> = core::result::Result<T, Error>;

/// An error that occurred while compiling a pattern.
///
/// Every error is reported at construction time. Once an automaton exists,
/// pushing characters into it can never fail.
///
/// Offsets are counted in characters, not bytes, from the start of the
/// pattern (or of the textual postfix form, for [`Error::InvalidPostfixToken`]).
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An unmatched `(` or `)`, or a group with nothing inside it.
    #[error("unbalanced parenthesis at offset {offset}")]
    UnbalancedParen {
        /// Offset of the offending parenthesis.
        offset: usize,
    },
    /// A `|` with no atom before it in the current group, or a group or
    /// pattern that ends right after a `|`.
    #[error("alternation without an operand at offset {offset}")]
    DanglingAlternation {
        /// Offset of the offending `|`.
        offset: usize,
    },
    /// A `*`, `+` or `?` with no atom to apply to.
    #[error("quantifier '{quantifier}' without an operand at offset {offset}")]
    DanglingQuantifier {
        /// The quantifier character.
        quantifier: char,
        /// Offset of the quantifier.
        offset: usize,
    },
    /// The pattern is empty.
    #[error("empty pattern")]
    EmptyPattern,
    /// Groups are nested deeper than [`Config::nest_limit`] allows.
    #[error("group nesting exceeds the limit of {limit} at offset {offset}")]
    NestLimitExceeded {
        /// The configured limit.
        limit: u32,
        /// Offset of the `(` that crossed the limit.
        offset: usize,
    },
    /// A token that cannot appear in postfix notation.
    #[error("invalid postfix token '{token}' at offset {offset}")]
    InvalidPostfixToken {
        /// The rejected character.
        token: char,
        /// Offset of the token in the textual postfix form.
        offset: usize,
    },
    /// The postfix sequence did not reduce to exactly one fragment.
    ///
    /// This signals a bug when the postfix came from [`compile_to_postfix`].
    #[error("stack error: {fragments} fragment(s) left after construction")]
    MalformedAutomaton {
        /// Number of fragments on the stack when the error was detected.
        fragments: usize,
    },
    /// The automaton would have more states than [`Config::size_limit`]
    /// allows.
    #[error("automaton exceeds the size limit of {limit} states")]
    TooComplex {
        /// The configured limit.
        limit: usize,
    },
}
