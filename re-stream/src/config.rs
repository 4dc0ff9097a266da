/*!
Options that control how a pattern is compiled.
*/

/// The default maximum group nesting depth.
const DEFAULT_NEST_LIMIT: u32 = 250;

/// The configuration used by [`Compiler`](crate::Compiler) and
/// [`compile_to_postfix_with`](crate::compile_to_postfix_with).
///
/// Options are set with builder methods and read back with the `get_`
/// accessors:
///
/// ```
/// use re_stream::{Compiler, Config, Error};
///
/// let config = Config::new().size_limit(Some(4));
/// let err = Compiler::new().configure(config).build("abcd").unwrap_err();
/// assert_eq!(err, Error::TooComplex { limit: 4 });
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    nest_limit: u32,
    size_limit: Option<usize>,
}

impl Config {
    /// Return a new default configuration.
    pub fn new() -> Config {
        Config { nest_limit: DEFAULT_NEST_LIMIT, size_limit: None }
    }

    /// Set the maximum depth of nested groups.
    ///
    /// A pattern opening more than `limit` groups at once fails with
    /// [`Error::NestLimitExceeded`](crate::Error::NestLimitExceeded). A limit
    /// of `0` rejects every group.
    ///
    /// The default is 250.
    pub fn nest_limit(mut self, limit: u32) -> Config {
        self.nest_limit = limit;
        self
    }

    /// Set the maximum number of states, counting the terminal marker, that
    /// a compiled automaton may contain.
    ///
    /// Thompson's construction is linear in the pattern length, so this is a
    /// bound on pattern size that stays meaningful after compilation. When
    /// exceeded, compilation fails with
    /// [`Error::TooComplex`](crate::Error::TooComplex).
    ///
    /// The default is no limit.
    pub fn size_limit(mut self, limit: Option<usize>) -> Config {
        self.size_limit = limit;
        self
    }

    /// Return the maximum group nesting depth.
    pub fn get_nest_limit(&self) -> u32 {
        self.nest_limit
    }

    /// Return the state limit, if any.
    pub fn get_size_limit(&self) -> Option<usize> {
        self.size_limit
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.get_nest_limit(), 250);
        assert_eq!(config.get_size_limit(), None);
    }

    #[test]
    fn test_builder_methods() {
        let config = Config::new().nest_limit(3).size_limit(Some(10));
        assert_eq!(config.get_nest_limit(), 3);
        assert_eq!(config.get_size_limit(), Some(10));
    }
}
