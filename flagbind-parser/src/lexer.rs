//! A lexer for generating tokens from a command line.

use alloc::borrow::Cow;
use alloc::format;
use alloc::vec::Vec;
use core::str::Chars;

use crate::fmt::trace;

/// The flag marker.
pub const MARKER: char = '-';

/// The terminator, after which every argument is a literal.
pub const TERMINATOR: &str = "--";

/// Variant of `Flag` token. Only store the identifier, not the hyphens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Flag<'a> {
    /// A short flag (e.g. -v).
    Short(char),

    /// A long flag (e.g. --verbose).
    Long(&'a str),
}

impl<'a> Flag<'a> {
    /// Spell the flag with its markers, as it would appear on its own in `arg`, the raw argument
    /// it has been read from.
    ///
    /// The spelling borrows from `arg` whenever the flag is written first in it. Only short flags
    /// coming later in a cluster (e.g. `b` in `-ab`) need a fresh string.
    pub fn spelling(&self, arg: &'a str) -> Cow<'a, str> {
        match *self {
            Flag::Long(name) => match arg.get(..name.len() + 2) {
                Some(prefix) => Cow::Borrowed(prefix),
                None => Cow::Owned(format!("{TERMINATOR}{name}")),
            },

            Flag::Short(c) => {
                let end = 1 + c.len_utf8();

                if arg.get(1..).is_some_and(|rest| rest.starts_with(c)) {
                    Cow::Borrowed(&arg[..end])
                } else {
                    Cow::Owned(format!("{MARKER}{c}"))
                }
            }
        }
    }
}

/// Defines a `Token` that has been read from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Token<'a> {
    /// Everything that is not a flag, or anything after the terminator.
    Literal(&'a str),

    /// Flag, along with the raw argument it has been read from.
    Flag {
        /// The flag identifier.
        flag: Flag<'a>,

        /// The raw argument (e.g. `-abc` for each of `a`, `b` and `c`).
        arg: &'a str,
    },

    /// Value written after `=` in the same argument as its flag (e.g. `5` in `--count=5`).
    Attached(&'a str),

    /// The terminator has been met. Only literals follow.
    Terminator,
}

impl Token<'_> {
    /// Evaluate if the token string is a short flag or a cluster of short flags.
    #[inline(always)]
    pub fn is_short_flag(input: &str) -> bool {
        input.starts_with(MARKER) && !input.starts_with(TERMINATOR) && input.len() > 1
    }

    /// Evaluate if the token string is a long flag.
    #[inline(always)]
    pub fn is_long_flag(input: &str) -> bool {
        input.starts_with(TERMINATOR) && input.len() > TERMINATOR.len()
    }

    /// Evaluate if the token string is a flag.
    #[inline(always)]
    pub fn is_flag(input: &str) -> bool {
        Self::is_short_flag(input) || Self::is_long_flag(input)
    }
}

/// Defines a lexer that is responsible for streaming tokens from the command line input.
///
/// A lexer acts like an forward iterator. Each raw argument may yield several tokens: a cluster
/// of short flags gives one flag token per character, and an attached value gives one more
/// token right after the flags of its argument.
#[derive(Clone, Debug)]
pub struct Tokens<'a, S> {
    argv: &'a [S],
    cursor: usize,
    terminated: bool,
    cluster: Option<(&'a str, Chars<'a>)>,
    attached: Option<&'a str>,
}

impl<'a, S> Tokens<'a, S>
where
    S: AsRef<str>,
{
    /// Create a new lexer from the command line input.
    pub fn new(argv: &'a [S]) -> Self {
        Tokens {
            argv,
            cursor: 0,
            terminated: false,
            cluster: None,
            attached: None,
        }
    }

    /// Yield the tokens left over from the last raw argument, if any.
    fn pending(&mut self) -> Option<Token<'a>> {
        if let Some((arg, chars)) = &mut self.cluster {
            if let Some(c) = chars.next() {
                let arg = *arg;
                return Some(Token::Flag {
                    flag: Flag::Short(c),
                    arg,
                });
            }

            self.cluster = None;
        }

        self.attached.take().map(Token::Attached)
    }

    fn next_token(&mut self) -> Option<Token<'a>> {
        if let Some(token) = self.pending() {
            return Some(token);
        }

        let argv = self.argv;
        let arg: &'a str = argv.get(self.cursor)?.as_ref();
        self.cursor += 1;

        if self.terminated || !arg.starts_with(MARKER) || arg.len() == 1 {
            return Some(Token::Literal(arg));
        }

        if arg == TERMINATOR {
            self.terminated = true;
            return Some(Token::Terminator);
        }

        let (name, value) = match arg.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (arg, None),
        };

        // Long flag.
        if let Some(long) = name.strip_prefix(TERMINATOR) {
            if long.is_empty() {
                return Some(Token::Literal(arg));
            }

            self.attached = value;
            return Some(Token::Flag {
                flag: Flag::Long(long),
                arg,
            });
        }

        // Short flag, or a cluster of them.
        let shorts = &name[MARKER.len_utf8()..];
        if shorts.is_empty() {
            return Some(Token::Literal(arg));
        }

        self.cluster = Some((arg, shorts.chars()));
        self.attached = value;
        self.pending()
    }
}

impl<'a, S> Iterator for Tokens<'a, S>
where
    S: AsRef<str>,
{
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();

        if let Some(token) = &token {
            trace!("token: {}", token);
        }

        token
    }
}

/// Split the whole command line into tokens.
pub fn tokenize<S>(argv: &[S]) -> Vec<Token<'_>>
where
    S: AsRef<str>,
{
    Tokens::new(argv).collect()
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use googletest::prelude::*;

    use super::*;

    fn short(c: char, arg: &str) -> Token<'_> {
        Token::Flag {
            flag: Flag::Short(c),
            arg,
        }
    }

    fn long<'a>(name: &'a str, arg: &'a str) -> Token<'a> {
        Token::Flag {
            flag: Flag::Long(name),
            arg,
        }
    }

    #[test]
    fn it_should_match_short_flag() {
        let mut lexer = Tokens::new(&["-f"]);

        let token = lexer.next();
        assert_that!(token.is_some(), eq(true));
        assert_that!(token.unwrap(), eq(short('f', "-f")));
        assert_that!(lexer.next().is_none(), eq(true));
    }

    #[test]
    fn it_should_match_long_flag() {
        let mut lexer = Tokens::new(&["--flag"]);

        let token = lexer.next();
        assert_that!(token.is_some(), eq(true));
        assert_that!(token.unwrap(), eq(long("flag", "--flag")));
    }

    #[test]
    fn it_should_expand_short_flag_cluster() {
        let tokens = tokenize(&["-abc"]);

        assert_that!(
            tokens,
            eq(&vec![short('a', "-abc"), short('b', "-abc"), short('c', "-abc")])
        );
    }

    #[test]
    fn it_should_split_attached_value_from_long_flag() {
        let tokens = tokenize(&["--count=5"]);

        assert_that!(
            tokens,
            eq(&vec![long("count", "--count=5"), Token::Attached("5")])
        );
    }

    #[test]
    fn it_should_attach_value_after_the_whole_cluster() {
        let tokens = tokenize(&["-vc=5", "x"]);

        assert_that!(
            tokens,
            eq(&vec![
                short('v', "-vc=5"),
                short('c', "-vc=5"),
                Token::Attached("5"),
                Token::Literal("x"),
            ])
        );
    }

    #[test]
    fn it_should_split_on_first_equal_sign_only() {
        let tokens = tokenize(&["--define=key=value"]);

        assert_that!(
            tokens,
            eq(&vec![
                long("define", "--define=key=value"),
                Token::Attached("key=value")
            ])
        );
    }

    #[test]
    fn it_should_keep_empty_attached_value() {
        let tokens = tokenize(&["--name="]);

        assert_that!(
            tokens,
            eq(&vec![long("name", "--name="), Token::Attached("")])
        );
    }

    #[test]
    fn it_should_match_literals() {
        let tokens = tokenize(&["value", "-", "a-b", ""]);

        assert_that!(
            tokens,
            eq(&vec![
                Token::Literal("value"),
                Token::Literal("-"),
                Token::Literal("a-b"),
                Token::Literal(""),
            ])
        );
    }

    #[test]
    fn it_should_treat_flags_without_name_as_literals() {
        let tokens = tokenize(&["-=x", "--=y"]);

        assert_that!(
            tokens,
            eq(&vec![Token::Literal("-=x"), Token::Literal("--=y")])
        );
    }

    #[test]
    fn it_should_stop_at_terminator() {
        let tokens = tokenize(&["-v", "--", "--not-a-flag", "--", "-x=1"]);

        assert_that!(
            tokens,
            eq(&vec![
                short('v', "-v"),
                Token::Terminator,
                Token::Literal("--not-a-flag"),
                Token::Literal("--"),
                Token::Literal("-x=1"),
            ])
        );
    }

    #[test]
    fn it_should_split_cluster_by_character() {
        let tokens = tokenize(&["-éa"]);

        assert_that!(tokens, eq(&vec![short('é', "-éa"), short('a', "-éa")]));
    }

    #[test]
    fn it_should_accept_owned_arguments() {
        let argv = vec![alloc::string::String::from("--name"), "value".into()];
        let tokens = tokenize(&argv);

        assert_that!(
            tokens,
            eq(&vec![long("name", "--name"), Token::Literal("value")])
        );
    }

    #[test]
    fn it_should_spell_flags_from_their_argument() {
        assert_that!(Flag::Long("count").spelling("--count=5"), eq(&"--count"));
        assert_that!(Flag::Short('a').spelling("-abc"), eq(&"-a"));
        assert_that!(Flag::Short('b').spelling("-abc"), eq(&"-b"));
        assert_that!(
            matches!(Flag::Short('b').spelling("-abc"), Cow::Owned(_)),
            eq(true)
        );
    }

    #[test]
    fn it_should_classify_flag_strings() {
        assert_that!(Token::is_short_flag("-v"), eq(true));
        assert_that!(Token::is_short_flag("--v"), eq(false));
        assert_that!(Token::is_long_flag("--verbose"), eq(true));
        assert_that!(Token::is_flag("--"), eq(false));
        assert_that!(Token::is_flag("-"), eq(false));
    }
}
