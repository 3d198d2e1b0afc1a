//! A parser dispatching a token stream to the registered flags.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::binder::{Arity, Custom, Destination};
use crate::fmt::debug;
use crate::lexer::{Flag, Token, Tokens};
use crate::registry::{FlagEntry, IntoFlagName, Registry};

/// Defines the possible errors that may occur during registration of flags and parsing of
/// arguments.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The flag name does not follow the `-x` or `--name` forms.
    #[error("invalid flag name `{name}`")]
    InvalidFlagName {
        /// The rejected name.
        name: String,
    },

    /// The flag name is already registered.
    #[error("flag `{name}` is already defined")]
    DuplicateFlag {
        /// The duplicate name.
        name: String,
    },

    /// The flag is not registered.
    #[error("unknown flag `{flag}`")]
    UnknownFlag {
        /// The flag as spelled on the command line.
        flag: String,
    },

    /// The flag expects a value but none follows it.
    #[error("missing value after `{flag}`")]
    MissingValue {
        /// The flag as spelled on the command line.
        flag: String,
    },

    /// The value cannot be converted to the destination type.
    #[error("cannot parse `{token}` as {expected}")]
    InvalidValue {
        /// The offending token.
        token: String,

        /// The destination type name.
        expected: &'static str,
    },

    /// A fixed-capacity destination is already full.
    #[error("cannot hold more than {capacity} values")]
    CapacityExceeded {
        /// The destination capacity.
        capacity: usize,
    },
}

impl Error {
    /// Build an [`Error::InvalidValue`], as a custom binder would.
    pub fn invalid_value(token: &str, expected: &'static str) -> Self {
        Error::InvalidValue {
            token: token.into(),
            expected,
        }
    }
}

/// What to do with flags that are not registered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UnknownFlags {
    /// Fail with [`Error::UnknownFlag`].
    #[default]
    Reject,

    /// Keep them, as spelled, among the remaining arguments.
    Keep,
}

/// Parser configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Options {
    /// Policy for flags that are not registered.
    pub unknown_flags: UnknownFlags,
}

impl Options {
    /// Default options: unknown flags are rejected.
    pub const fn new() -> Self {
        Options {
            unknown_flags: UnknownFlags::Reject,
        }
    }

    /// Set the policy for unknown flags.
    pub const fn unknown_flags(mut self, policy: UnknownFlags) -> Self {
        self.unknown_flags = policy;
        self
    }
}

/// Arguments left once the flags and their values have been taken out, in their original
/// order.
pub type Remaining<'a> = Vec<Cow<'a, str>>;

/// The flag waiting for its value(s).
#[derive(Clone, Copy, Debug)]
struct Active<'a> {
    index: usize,
    flag: Flag<'a>,
    arg: &'a str,
    bound: usize,
}

impl<'a> Active<'a> {
    fn missing_value(&self) -> Error {
        Error::MissingValue {
            flag: self.flag.spelling(self.arg).into_owned(),
        }
    }
}

/// Defines a parser binding flags to caller-owned destinations.
///
/// Destinations are borrowed for `'d`, and so are flag names and help texts. Parsed arguments
/// are borrowed for `'a`, which lets `&'a str` destinations point straight into them. The
/// destinations can be read again once the parser is dropped.
///
/// ```
/// use flagbind_parser::Parser;
///
/// let mut count = 0u32;
/// let mut verbose = false;
///
/// let argv = ["-v", "--count=3", "input.txt"];
/// let rest = {
///     let mut parser = Parser::new();
///     parser.flag("-v", "Verbose output.", &mut verbose)?;
///     parser.flag("--count", "Number of runs.", &mut count)?;
///     parser.parse(&argv)?
/// };
///
/// assert!(verbose);
/// assert_eq!(count, 3);
/// assert_eq!(rest, ["input.txt"]);
/// # Ok::<(), flagbind_parser::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct Parser<'d, 'a> {
    registry: Registry<'d, 'a>,
    options: Options,
}

impl<'d, 'a> Parser<'d, 'a> {
    /// Create a parser with no flag and default options.
    pub fn new() -> Self {
        Self::with_options(Options::new())
    }

    /// Create a parser with no flag.
    pub fn with_options(options: Options) -> Self {
        Parser {
            registry: Registry::new(),
            options,
        }
    }

    /// The parser configuration.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The parser configuration, for modification.
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// The registered flags.
    pub fn registry(&self) -> &Registry<'d, 'a> {
        &self.registry
    }

    /// Register a flag bound to `target`.
    ///
    /// The flag arity follows from the destination type: `bool` is a switch, collections take
    /// many values, and anything else takes exactly one.
    pub fn flag<N, T>(&mut self, name: N, help: &'d str, target: &'d mut T) -> Result<(), Error>
    where
        N: IntoFlagName<'d>,
        T: Destination<'a>,
    {
        let name = name.into_flag_name()?;
        let entry = FlagEntry::new(name, help, target.binder());

        debug!("register flag: {}, arity: {}", name.as_str(), entry.arity());
        self.registry.insert(entry)
    }

    /// Register a flag bound through a function.
    ///
    /// The function receives every value token and returns `true` when it may accept another
    /// one right after.
    pub fn custom<N, F>(&mut self, name: N, help: &'d str, arity: Arity, f: F) -> Result<(), Error>
    where
        N: IntoFlagName<'d>,
        F: FnMut(&'a str) -> Result<bool, Error> + 'd,
    {
        let name = name.into_flag_name()?;
        let entry = FlagEntry::new(name, help, Box::new(Custom::new(arity, f)));

        debug!("register custom flag: {}, arity: {}", name.as_str(), arity);
        self.registry.insert(entry)
    }

    /// Render the usage text of the registered flags.
    pub fn usage(&self, program: Option<&str>) -> String {
        crate::usage::render(program, &self.registry)
    }

    /// Parse the command line input, binding every registered flag found in it.
    ///
    /// The input must not include the program name. On success, returns the arguments that
    /// are neither flags nor flag values. On error, destinations bound before the error keep
    /// their new value.
    pub fn parse<S>(&mut self, argv: &'a [S]) -> Result<Remaining<'a>, Error>
    where
        S: AsRef<str>,
    {
        let mut tokens = Tokens::new(argv).peekable();
        let mut out = Remaining::new();
        let mut active: Option<Active<'a>> = None;

        while let Some(token) = tokens.next() {
            match token {
                Token::Literal(literal) => {
                    let Some(mut current) = active.take() else {
                        out.push(Cow::Borrowed(literal));
                        continue;
                    };

                    let binder = self.registry.binder_mut(current.index);

                    // A switch never takes its value from the next argument.
                    if binder.arity() == Arity::Boolean {
                        binder.bind("")?;
                        out.push(Cow::Borrowed(literal));
                        continue;
                    }

                    let more = binder.bind(literal)?;
                    current.bound += 1;

                    if more {
                        active = Some(current);
                    }
                }

                Token::Flag { flag, arg } => {
                    if let Some(current) = active.take() {
                        self.close(current)?;
                    }

                    if let Some(index) = self.registry.position(&flag) {
                        debug!("open flag: {}", flag);
                        active = Some(Active {
                            index,
                            flag,
                            arg,
                            bound: 0,
                        });
                        continue;
                    }

                    let spelling = flag.spelling(arg);

                    if self.options.unknown_flags == UnknownFlags::Reject {
                        return Err(Error::UnknownFlag {
                            flag: spelling.into_owned(),
                        });
                    }

                    debug!("keep unknown flag: {}", flag);

                    // The attached value goes along with its unknown flag.
                    let kept = match tokens.next_if(|x| matches!(x, Token::Attached(_))) {
                        Some(Token::Attached(value)) => spell_with_value(spelling, value, arg),
                        _ => spelling,
                    };

                    out.push(kept);
                }

                Token::Attached(value) => {
                    // The lexer only yields an attached value right after its flag, which is
                    // either active or consumed along with it when unknown.
                    let Some(current) = active.take() else {
                        debug_assert!(false, "attached value without a flag");
                        continue;
                    };

                    debug!("close flag: {}", current.flag);
                    self.registry.binder_mut(current.index).bind(value)?;
                }

                Token::Terminator => {
                    if let Some(current) = active.take() {
                        self.close(current)?;
                    }
                }
            }
        }

        if let Some(current) = active.take() {
            self.close(current)?;
        }

        Ok(out)
    }

    /// Close the active flag, either because another flag follows or the input ends.
    fn close(&mut self, current: Active<'a>) -> Result<(), Error> {
        debug!("close flag: {}", current.flag);

        let binder = self.registry.binder_mut(current.index);

        match binder.arity() {
            Arity::Boolean => {
                binder.bind("")?;
            }

            Arity::Single if current.bound == 0 => {
                return Err(current.missing_value());
            }

            // A collection may stay empty.
            Arity::Single | Arity::Multiple => {}
        }

        Ok(())
    }
}

/// Spell an unknown flag along with its attached value.
fn spell_with_value<'a>(spelling: Cow<'a, str>, value: &'a str, arg: &'a str) -> Cow<'a, str> {
    match spelling {
        // The flag is alone in its argument (e.g. `--name=value`).
        Cow::Borrowed(name) if name.len() + 1 + value.len() == arg.len() => Cow::Borrowed(arg),
        other => Cow::Owned(format!("{other}={value}")),
    }
}
