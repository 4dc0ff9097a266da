/*!
Conversion of infix patterns into postfix notation.

Postfix notation places each operator after its operands, which makes
concatenation explicit and linearizes precedence (quantifiers bind tighter
than concatenation, which binds tighter than alternation). The result can be
evaluated left to right with a single stack of NFA fragments, which is what
[`Compiler`](crate::Compiler) does.

```
use re_stream::compile_to_postfix;

assert_eq!(compile_to_postfix("a(b|c)*d")?.to_string(), "abc|*.d.");
# Ok::<(), re_stream::Error>(())
```
*/

use core::{fmt, str::FromStr};

use crate::{config::Config, Error, Result};

/// A single postfix instruction.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Token {
    /// Match exactly this character.
    Literal(char),
    /// Concatenate the two topmost fragments.
    Concat,
    /// Alternate between the two topmost fragments.
    Alternate,
    /// Zero or one of the topmost fragment (`?`).
    ZeroOrOne,
    /// Zero or more of the topmost fragment (`*`).
    ZeroOrMore,
    /// One or more of the topmost fragment (`+`).
    OneOrMore,
}

impl Token {
    /// Return the character used for this token in textual postfix form.
    ///
    /// Concatenation is written as `.`, so a literal `.` and a concatenation
    /// render the same way. The typed form never confuses the two.
    pub fn as_char(self) -> char {
        match self {
            Token::Literal(c) => c,
            Token::Concat => '.',
            Token::Alternate => '|',
            Token::ZeroOrOne => '?',
            Token::ZeroOrMore => '*',
            Token::OneOrMore => '+',
        }
    }

    /// Returns true if this token creates a new NFA state when built.
    ///
    /// Concatenation only patches existing states.
    pub(crate) fn allocates(self) -> bool {
        !matches!(self, Token::Concat)
    }
}

/// A pattern in postfix notation.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Postfix {
    tokens: Vec<Token>,
}

impl Postfix {
    /// Return the tokens in evaluation order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Return the number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Emit `count` copies of `token`.
    fn push_n(&mut self, token: Token, count: usize) {
        self.tokens.extend(core::iter::repeat(token).take(count));
    }
}

impl From<Vec<Token>> for Postfix {
    fn from(tokens: Vec<Token>) -> Postfix {
        Postfix { tokens }
    }
}

impl fmt::Display for Postfix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{}", token.as_char())?;
        }
        Ok(())
    }
}

/// Parses the textual postfix form.
///
/// `.` `|` `?` `*` `+` are operators and every other character is a literal,
/// except for `(` and `)` which cannot occur in postfix notation and are
/// rejected with [`Error::InvalidPostfixToken`]. Nothing is checked about
/// operand counts; that happens when the tokens are built into an NFA.
impl FromStr for Postfix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Postfix> {
        let mut postfix = Postfix::default();
        for (offset, c) in s.chars().enumerate() {
            let token = match c {
                '.' => Token::Concat,
                '|' => Token::Alternate,
                '?' => Token::ZeroOrOne,
                '*' => Token::ZeroOrMore,
                '+' => Token::OneOrMore,
                '(' | ')' => {
                    return Err(Error::InvalidPostfixToken { token: c, offset })
                }
                c => Token::Literal(c),
            };
            postfix.push(token);
        }
        Ok(postfix)
    }
}

/// Convert `pattern` to postfix notation using the default [`Config`].
pub fn compile_to_postfix(pattern: &str) -> Result<Postfix> {
    compile_to_postfix_with(pattern, &Config::default())
}

/// Convert `pattern` to postfix notation.
///
/// Only [`Config::nest_limit`] applies at this stage.
pub fn compile_to_postfix_with(
    pattern: &str,
    config: &Config,
) -> Result<Postfix> {
    Translator::new(config).translate(pattern)
}

/// Counters saved when a group opens and restored when it closes.
#[derive(Clone, Copy, Debug)]
struct Frame {
    alternations: usize,
    atoms: usize,
    /// Offset of the last `|` seen at this level.
    last_alternation: usize,
    /// Offset of the `(` that opened the group being saved for.
    open_paren: usize,
}

/// A single left-to-right scan over the pattern.
///
/// `atoms` never exceeds 2: as soon as a third atom arrives, the first two are
/// joined with a concatenation and count as one.
#[derive(Debug)]
struct Translator<'c> {
    config: &'c Config,
    postfix: Postfix,
    alternations: usize,
    atoms: usize,
    last_alternation: usize,
    stack: Vec<Frame>,
}

impl<'c> Translator<'c> {
    fn new(config: &'c Config) -> Translator<'c> {
        Translator {
            config,
            postfix: Postfix::default(),
            alternations: 0,
            atoms: 0,
            last_alternation: 0,
            stack: vec![],
        }
    }

    fn translate(mut self, pattern: &str) -> Result<Postfix> {
        for (offset, c) in pattern.chars().enumerate() {
            match c {
                '(' => self.open_group(offset)?,
                ')' => self.close_group(offset)?,
                '|' => self.alternate(offset)?,
                '*' | '+' | '?' => self.quantify(c, offset)?,
                c => {
                    self.concat_pending();
                    self.postfix.push(Token::Literal(c));
                    self.atoms += 1;
                }
            }
        }
        if let Some(frame) = self.stack.last() {
            return Err(Error::UnbalancedParen { offset: frame.open_paren });
        }
        if self.atoms == 0 {
            return Err(if self.alternations > 0 {
                Error::DanglingAlternation { offset: self.last_alternation }
            } else {
                Error::EmptyPattern
            });
        }
        self.flush();
        debug!("compiled {:?} to postfix {}", pattern, self.postfix);
        Ok(self.postfix)
    }

    /// Join the two pending atoms before a third one is added.
    fn concat_pending(&mut self) {
        if self.atoms > 1 {
            self.atoms -= 1;
            self.postfix.push(Token::Concat);
        }
    }

    /// Emit the concatenations and alternations pending at the current
    /// level. Alternations go last since they bind loosest.
    fn flush(&mut self) {
        self.postfix.push_n(Token::Concat, self.atoms.saturating_sub(1));
        self.postfix.push_n(Token::Alternate, self.alternations);
    }

    fn open_group(&mut self, offset: usize) -> Result<()> {
        let limit = self.config.get_nest_limit();
        if self.stack.len() >= limit as usize {
            return Err(Error::NestLimitExceeded { limit, offset });
        }
        self.concat_pending();
        self.stack.push(Frame {
            alternations: self.alternations,
            atoms: self.atoms,
            last_alternation: self.last_alternation,
            open_paren: offset,
        });
        self.alternations = 0;
        self.atoms = 0;
        Ok(())
    }

    fn close_group(&mut self, offset: usize) -> Result<()> {
        if self.stack.is_empty() || self.atoms == 0 {
            return Err(Error::UnbalancedParen { offset });
        }
        self.flush();
        let frame = match self.stack.pop() {
            Some(frame) => frame,
            None => return Err(Error::UnbalancedParen { offset }),
        };
        self.alternations = frame.alternations;
        self.atoms = frame.atoms + 1;
        self.last_alternation = frame.last_alternation;
        Ok(())
    }

    fn alternate(&mut self, offset: usize) -> Result<()> {
        if self.atoms == 0 {
            return Err(Error::DanglingAlternation { offset });
        }
        self.postfix.push_n(Token::Concat, self.atoms - 1);
        self.alternations += 1;
        self.atoms = 0;
        self.last_alternation = offset;
        Ok(())
    }

    fn quantify(&mut self, quantifier: char, offset: usize) -> Result<()> {
        if self.atoms == 0 {
            return Err(Error::DanglingQuantifier { quantifier, offset });
        }
        self.postfix.push(match quantifier {
            '*' => Token::ZeroOrMore,
            '+' => Token::OneOrMore,
            _ => Token::ZeroOrOne,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(pattern: &str) -> String {
        compile_to_postfix(pattern).unwrap().to_string()
    }

    #[test]
    fn test_concatenation_is_explicit() {
        assert_eq!(post("a"), "a");
        assert_eq!(post("ab"), "ab.");
        assert_eq!(post("abcd"), "ab.c.d.");
    }

    #[test]
    fn test_alternation_binds_loosest() {
        assert_eq!(post("a|b"), "ab|");
        assert_eq!(post("ab|cd"), "ab.cd.|");
        assert_eq!(post("a|b|c"), "abc||");
    }

    #[test]
    fn test_quantifiers_bind_tightest() {
        assert_eq!(post("ab*c"), "ab*.c.");
        assert_eq!(post("colou?r"), "co.l.o.u?.r.");
        assert_eq!(post("a+?"), "a+?");
    }

    #[test]
    fn test_groups_become_single_atoms() {
        assert_eq!(post("(ab)"), "ab.");
        assert_eq!(post("a(b|c)*d"), "abc|*.d.");
        assert_eq!(post("x(a|b)(c|d)"), "xab|.cd|.");
        assert_eq!(post("((a))"), "a");
    }

    #[test]
    fn test_literal_dot_stays_a_literal() {
        let postfix = compile_to_postfix("a.b").unwrap();
        assert_eq!(
            postfix.tokens(),
            &[
                Token::Literal('a'),
                Token::Literal('.'),
                Token::Concat,
                Token::Literal('b'),
                Token::Concat,
            ]
        );
    }

    #[test]
    fn test_unbalanced_parens() {
        assert_eq!(
            compile_to_postfix("a)").unwrap_err(),
            Error::UnbalancedParen { offset: 1 }
        );
        assert_eq!(
            compile_to_postfix("(a").unwrap_err(),
            Error::UnbalancedParen { offset: 0 }
        );
        assert_eq!(
            compile_to_postfix("a(b(c)").unwrap_err(),
            Error::UnbalancedParen { offset: 1 }
        );
        assert_eq!(
            compile_to_postfix("()").unwrap_err(),
            Error::UnbalancedParen { offset: 1 }
        );
        assert_eq!(
            compile_to_postfix("(a|)").unwrap_err(),
            Error::UnbalancedParen { offset: 3 }
        );
    }

    #[test]
    fn test_dangling_alternation() {
        assert_eq!(
            compile_to_postfix("|a").unwrap_err(),
            Error::DanglingAlternation { offset: 0 }
        );
        assert_eq!(
            compile_to_postfix("a||b").unwrap_err(),
            Error::DanglingAlternation { offset: 2 }
        );
        assert_eq!(
            compile_to_postfix("a|").unwrap_err(),
            Error::DanglingAlternation { offset: 1 }
        );
        assert_eq!(
            compile_to_postfix("(a|b)|").unwrap_err(),
            Error::DanglingAlternation { offset: 5 }
        );
    }

    #[test]
    fn test_dangling_quantifier() {
        assert_eq!(
            compile_to_postfix("*a").unwrap_err(),
            Error::DanglingQuantifier { quantifier: '*', offset: 0 }
        );
        assert_eq!(
            compile_to_postfix("a|+").unwrap_err(),
            Error::DanglingQuantifier { quantifier: '+', offset: 2 }
        );
        assert_eq!(
            compile_to_postfix("(?a)").unwrap_err(),
            Error::DanglingQuantifier { quantifier: '?', offset: 1 }
        );
    }

    #[test]
    fn test_empty_pattern() {
        assert_eq!(compile_to_postfix("").unwrap_err(), Error::EmptyPattern);
    }

    #[test]
    fn test_nest_limit() {
        let config = Config::new().nest_limit(2);
        assert!(compile_to_postfix_with("((a))", &config).is_ok());
        assert_eq!(
            compile_to_postfix_with("(((a)))", &config).unwrap_err(),
            Error::NestLimitExceeded { limit: 2, offset: 2 }
        );
        // Sequential groups don't accumulate depth.
        assert!(compile_to_postfix_with("(a)(b)(c)", &config).is_ok());
    }

    #[test]
    fn test_parse_textual_postfix() {
        let postfix: Postfix = "ab|*c.".parse().unwrap();
        assert_eq!(
            postfix.tokens(),
            &[
                Token::Literal('a'),
                Token::Literal('b'),
                Token::Alternate,
                Token::ZeroOrMore,
                Token::Literal('c'),
                Token::Concat,
            ]
        );
        assert_eq!(postfix.to_string(), "ab|*c.");
    }

    #[test]
    fn test_parse_rejects_parens() {
        assert_eq!(
            "ab(".parse::<Postfix>().unwrap_err(),
            Error::InvalidPostfixToken { token: '(', offset: 2 }
        );
        assert_eq!(
            ")".parse::<Postfix>().unwrap_err(),
            Error::InvalidPostfixToken { token: ')', offset: 0 }
        );
    }
}
