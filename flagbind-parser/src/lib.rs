#![no_std]

extern crate alloc;

mod fmt;

pub mod binder;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod usage;

pub use binder::{Arity, Binder, Destination, Value};
pub use lexer::{Flag, Token, Tokens};
pub use parser::{Error, Options, Parser, Remaining, UnknownFlags};
pub use registry::{FlagEntry, FlagName, IntoFlagName, Registry};
