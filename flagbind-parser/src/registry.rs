//! Registered flags, looked up by name.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::binder::{Arity, Binder};
use crate::lexer::{Flag, MARKER, TERMINATOR};
use crate::parser::Error;

/// Validate a flag name.
///
/// A valid name is either short, one marker and exactly one character (e.g. `-v`), or long, two
/// markers and at least one character (e.g. `--verbose`). It contains neither `=` nor ASCII
/// whitespace.
pub const fn is_valid(name: &str) -> bool {
    let bytes = name.as_bytes();

    if bytes.is_empty() || bytes[0] != b'-' {
        return false;
    }

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'=' || bytes[i].is_ascii_whitespace() {
            return false;
        }
        i += 1;
    }

    // Long flag, the bare terminator excluded.
    if bytes.len() >= 2 && bytes[1] == b'-' {
        return bytes.len() > 2;
    }

    // Short flag: count the UTF-8 leading bytes after the marker.
    let mut chars = 0;
    let mut i = 1;
    while i < bytes.len() {
        if bytes[i] & 0xc0 != 0x80 {
            chars += 1;
        }
        i += 1;
    }

    chars == 1
}

/// A validated flag name, markers included (e.g. `-v` or `--verbose`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlagName<'n>(&'n str);

impl<'n> FlagName<'n> {
    /// Validate a flag name.
    pub fn new(name: &'n str) -> Result<Self, Error> {
        if is_valid(name) {
            Ok(FlagName(name))
        } else {
            Err(Error::InvalidFlagName { name: name.into() })
        }
    }

    /// Validate a flag name in a constant context, where an invalid name fails the build.
    ///
    /// ```
    /// use flagbind_parser::FlagName;
    ///
    /// const COUNT: FlagName<'static> = FlagName::checked("--count");
    /// assert_eq!(COUNT.as_str(), "--count");
    /// ```
    pub const fn checked(name: &'n str) -> Self {
        if !is_valid(name) {
            panic!("invalid flag name");
        }

        FlagName(name)
    }

    /// Wrap a name that has already been validated, usually at compile time by `flag_name!`.
    #[doc(hidden)]
    pub const fn new_unchecked(name: &'n str) -> Self {
        FlagName(name)
    }

    /// The name, markers included.
    pub const fn as_str(&self) -> &'n str {
        self.0
    }

    /// Evaluate if the name is a short one (e.g. `-v`).
    pub fn is_short(&self) -> bool {
        !self.0.starts_with(TERMINATOR)
    }

    /// Evaluate if `flag`, as produced by the lexer, designates this name.
    pub fn matches(&self, flag: &Flag<'_>) -> bool {
        match *flag {
            Flag::Long(name) => self.0.strip_prefix(TERMINATOR) == Some(name),
            Flag::Short(c) => {
                self.is_short()
                    && self
                        .0
                        .strip_prefix(MARKER)
                        .is_some_and(|rest| rest.starts_with(c))
            }
        }
    }
}

impl fmt::Display for FlagName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.0)
    }
}

impl AsRef<str> for FlagName<'_> {
    fn as_ref(&self) -> &str {
        self.0
    }
}

/// Conversion into a flag name, validated at registration.
pub trait IntoFlagName<'n> {
    /// Convert into a valid flag name.
    fn into_flag_name(self) -> Result<FlagName<'n>, Error>;
}

impl<'n> IntoFlagName<'n> for &'n str {
    fn into_flag_name(self) -> Result<FlagName<'n>, Error> {
        FlagName::new(self)
    }
}

impl<'n> IntoFlagName<'n> for FlagName<'n> {
    fn into_flag_name(self) -> Result<FlagName<'n>, Error> {
        Ok(self)
    }
}

/// A registered flag.
pub struct FlagEntry<'d, 'a> {
    name: FlagName<'d>,
    help: &'d str,
    binder: Box<dyn Binder<'a> + 'd>,
}

impl<'d, 'a> FlagEntry<'d, 'a> {
    /// Create an entry.
    pub fn new(name: FlagName<'d>, help: &'d str, binder: Box<dyn Binder<'a> + 'd>) -> Self {
        FlagEntry { name, help, binder }
    }

    /// The flag name.
    pub fn name(&self) -> FlagName<'d> {
        self.name
    }

    /// The help text.
    pub fn help(&self) -> &'d str {
        self.help
    }

    /// The number of values the flag accepts.
    pub fn arity(&self) -> Arity {
        self.binder.arity()
    }
}

impl fmt::Debug for FlagEntry<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagEntry")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("arity", &self.arity())
            .finish()
    }
}

/// The ordered set of registered flags.
#[derive(Debug, Default)]
pub struct Registry<'d, 'a> {
    entries: Vec<FlagEntry<'d, 'a>>,
}

impl<'d, 'a> Registry<'d, 'a> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Registry {
            entries: Vec::new(),
        }
    }

    /// Register a flag, unless its name is already taken.
    pub fn insert(&mut self, entry: FlagEntry<'d, 'a>) -> Result<(), Error> {
        if self.get(entry.name.as_str()).is_some() {
            return Err(Error::DuplicateFlag {
                name: entry.name.as_str().into(),
            });
        }

        self.entries.push(entry);
        Ok(())
    }

    /// Look up a flag by its name, markers included.
    pub fn get(&self, name: &str) -> Option<&FlagEntry<'d, 'a>> {
        self.entries.iter().find(|x| x.name.as_str() == name)
    }

    /// Position of the flag designated by a lexer flag.
    pub fn position(&self, flag: &Flag<'_>) -> Option<usize> {
        self.entries.iter().position(|x| x.name.matches(flag))
    }

    /// The binder of the flag at `index`, as returned by [`Registry::position`].
    pub(crate) fn binder_mut(&mut self, index: usize) -> &mut (dyn Binder<'a> + 'd) {
        self.entries[index].binder.as_mut()
    }

    /// Iterate over the flags in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &FlagEntry<'d, 'a>> {
        self.entries.iter()
    }

    /// Number of registered flags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Evaluate if no flag is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use googletest::prelude::*;

    use crate::binder::Destination;

    use super::*;

    #[test]
    fn it_should_accept_valid_names() {
        for name in ["-v", "-é", "--v", "--verbose", "--dry-run", "---"] {
            assert_that!(is_valid(name), eq(true));
            assert_that!(FlagName::new(name).is_ok(), eq(true));
        }
    }

    #[test]
    fn it_should_reject_invalid_names() {
        for name in [
            "", "-", "--", "v", "verbose", "-vv", "-v=", "--a=b", "--a b", "-\t", "--\n",
        ] {
            assert_that!(is_valid(name), eq(false));
            assert_that!(
                FlagName::new(name),
                eq(&Err(Error::InvalidFlagName { name: name.into() }))
            );
        }
    }

    #[test]
    fn it_should_validate_in_constant_context() {
        const NAME: FlagName<'static> = FlagName::checked("-q");
        assert_that!(NAME.as_str(), eq("-q"));
        assert_that!(NAME.is_short(), eq(true));
    }

    #[test]
    fn it_should_match_lexer_flags() {
        let short = FlagName::checked("-c");
        let long = FlagName::checked("--c");

        assert_that!(short.matches(&Flag::Short('c')), eq(true));
        assert_that!(short.matches(&Flag::Long("c")), eq(false));
        assert_that!(long.matches(&Flag::Long("c")), eq(true));
        assert_that!(long.matches(&Flag::Short('c')), eq(false));
        assert_that!(long.matches(&Flag::Long("count")), eq(false));
    }

    #[test]
    fn it_should_reject_duplicate_names() {
        let mut a = false;
        let mut b = 0u32;
        let mut registry = Registry::new();

        let entry = FlagEntry::new(FlagName::checked("--a"), "first", a.binder());
        assert_that!(registry.insert(entry), eq(&Ok(())));

        let entry = FlagEntry::new(FlagName::checked("--a"), "second", b.binder());
        assert_that!(
            registry.insert(entry),
            eq(&Err(Error::DuplicateFlag { name: "--a".into() }))
        );

        assert_that!(registry.len(), eq(1));
        assert_that!(registry.get("--a").map(FlagEntry::help), eq(Some("first")));
    }

    #[test]
    fn it_should_keep_registration_order() {
        let mut a = false;
        let mut b = 0u32;
        let mut c: Vec<i32> = Vec::new();
        let mut registry = Registry::new();

        for entry in [
            FlagEntry::new(FlagName::checked("--zeta"), "", a.binder()),
            FlagEntry::new(FlagName::checked("-b"), "", b.binder()),
            FlagEntry::new(FlagName::checked("--alpha"), "", c.binder()),
        ] {
            assert_that!(registry.insert(entry).is_ok(), eq(true));
        }

        let names: Vec<&str> = registry.iter().map(|x| x.name().as_str()).collect();
        assert_that!(names, eq(&vec!["--zeta", "-b", "--alpha"]));

        let arities: Vec<Arity> = registry.iter().map(FlagEntry::arity).collect();
        assert_that!(
            arities,
            eq(&vec![Arity::Boolean, Arity::Single, Arity::Multiple])
        );
    }
}
