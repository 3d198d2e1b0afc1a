//! flagbind, a `no_std` command-line flag parser binding values straight into caller-owned
//! variables.
#![no_std]
#![deny(missing_docs)]

extern crate alloc;

use alloc::string::String;

pub use flagbind_macros as macros;
pub use flagbind_parser as parser;

pub use macros::{Flags, flag_name};

use parser::{Options, Parser, Remaining};

/// Defines the possible errors that may occur during usage of the crate.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// An error comes from the parsing of arguments.
    #[error(transparent)]
    Parser(#[from] parser::Error),
}

/// A set of flags bound to the fields of a value, usually derived with `#[derive(Flags)]`.
///
/// Arguments are borrowed for `'a`, so that fields of type `&'a str` point into them.
pub trait Flags<'a> {
    /// Register one flag per bound field.
    fn register<'d>(&'d mut self, parser: &mut Parser<'d, 'a>) -> Result<(), parser::Error>;

    /// Parse the command line input into the fields, with default options.
    ///
    /// Returns the arguments that are neither flags nor flag values.
    fn parse_args<S>(&mut self, argv: &'a [S]) -> Result<Remaining<'a>, Error>
    where
        S: AsRef<str>,
    {
        self.parse_args_with(Options::default(), argv)
    }

    /// Parse the command line input into the fields.
    fn parse_args_with<S>(
        &mut self,
        options: Options,
        argv: &'a [S],
    ) -> Result<Remaining<'a>, Error>
    where
        S: AsRef<str>,
    {
        let mut parser = Parser::with_options(options);
        self.register(&mut parser)?;
        Ok(parser.parse(argv)?)
    }

    /// Render the usage text of the flags.
    fn usage(&mut self, program: Option<&str>) -> Result<String, Error> {
        let mut parser = Parser::new();
        self.register(&mut parser)?;
        Ok(parser.usage(program))
    }
}
