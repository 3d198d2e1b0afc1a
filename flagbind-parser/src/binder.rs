//! Value binders, writing tokens into caller-owned destinations.
//!
//! A binder is built once per flag, at registration time, from a mutable borrow of the
//! destination. The parser only sees it through the narrow [`Binder`] trait object.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::parser::Error;

/// Number of value tokens a flag accepts per occurrence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Arity {
    /// Exactly one value (e.g. `--count 5`).
    Single,

    /// Zero or one value, the absence of value meaning `true` (e.g. `--verbose`).
    Boolean,

    /// One value per token until the next flag (e.g. `--tag a b --tag c`).
    Multiple,
}

/// Type-erased adapter from a token to a destination.
pub trait Binder<'a> {
    /// The arity of the flag.
    fn arity(&self) -> Arity;

    /// Bind a token to the destination.
    ///
    /// On success, returns `true` if the binder may accept another token right after this one.
    fn bind(&mut self, token: &'a str) -> Result<bool, Error>;
}

/// A scalar value that can be parsed from a single token.
pub trait Value<'a>: Sized {
    /// Type name reported in errors.
    const TYPE_NAME: &'static str;

    /// Parse the whole token, or fail.
    fn parse_value(token: &'a str) -> Result<Self, Error>;
}

macro_rules! make_value_from_str_impl {
    ($($target:ty),* $(,)?) => {
        $(
            impl<'a> Value<'a> for $target {
                const TYPE_NAME: &'static str = stringify!($target);

                fn parse_value(token: &'a str) -> Result<Self, Error> {
                    token
                        .parse::<$target>()
                        .map_err(|_| Error::invalid_value(token, Self::TYPE_NAME))
                }
            }
        )*
    };
}

make_value_from_str_impl!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl<'a> Value<'a> for bool {
    const TYPE_NAME: &'static str = "bool";

    fn parse_value(token: &'a str) -> Result<Self, Error> {
        match token {
            "" | "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(Error::invalid_value(token, Self::TYPE_NAME)),
        }
    }
}

impl<'a> Value<'a> for String {
    const TYPE_NAME: &'static str = "string";

    fn parse_value(token: &'a str) -> Result<Self, Error> {
        Ok(token.into())
    }
}

impl<'a> Value<'a> for &'a str {
    const TYPE_NAME: &'static str = "string";

    fn parse_value(token: &'a str) -> Result<Self, Error> {
        Ok(token)
    }
}

/// An ordered sequence of scalar values.
pub trait Collection<'a> {
    /// Element type.
    type Item: Value<'a>;

    /// Append a value at the end of the sequence.
    fn push_value(&mut self, value: Self::Item) -> Result<(), Error>;
}

impl<'a, T> Collection<'a> for Vec<T>
where
    T: Value<'a>,
{
    type Item = T;

    fn push_value(&mut self, value: T) -> Result<(), Error> {
        self.push(value);
        Ok(())
    }
}

impl<'a, T, const N: usize> Collection<'a> for heapless::Vec<T, N>
where
    T: Value<'a>,
{
    type Item = T;

    fn push_value(&mut self, value: T) -> Result<(), Error> {
        self.push(value)
            .map_err(|_| Error::CapacityExceeded { capacity: N })
    }
}

/// Binds a single-valued flag.
#[derive(Debug)]
pub struct Scalar<'d, T>(&'d mut T);

impl<'d, T> Scalar<'d, T> {
    /// Create a binder writing into `target`.
    pub fn new(target: &'d mut T) -> Self {
        Scalar(target)
    }
}

impl<'a, T> Binder<'a> for Scalar<'_, T>
where
    T: Value<'a>,
{
    fn arity(&self) -> Arity {
        Arity::Single
    }

    fn bind(&mut self, token: &'a str) -> Result<bool, Error> {
        *self.0 = T::parse_value(token)?;
        Ok(false)
    }
}

/// Binds a boolean flag, set to `true` by an empty token.
#[derive(Debug)]
pub struct Switch<'d>(&'d mut bool);

impl<'d> Switch<'d> {
    /// Create a binder writing into `target`.
    pub fn new(target: &'d mut bool) -> Self {
        Switch(target)
    }
}

impl<'a> Binder<'a> for Switch<'_> {
    fn arity(&self) -> Arity {
        Arity::Boolean
    }

    fn bind(&mut self, token: &'a str) -> Result<bool, Error> {
        *self.0 = bool::parse_value(token)?;
        Ok(false)
    }
}

/// Binds a multi-valued flag, appending one element per token.
#[derive(Debug)]
pub struct Many<'d, C>(&'d mut C);

impl<'d, C> Many<'d, C> {
    /// Create a binder appending to `target`.
    pub fn new(target: &'d mut C) -> Self {
        Many(target)
    }
}

impl<'a, C> Binder<'a> for Many<'_, C>
where
    C: Collection<'a>,
{
    fn arity(&self) -> Arity {
        Arity::Multiple
    }

    fn bind(&mut self, token: &'a str) -> Result<bool, Error> {
        let value = C::Item::parse_value(token)?;
        self.0.push_value(value)?;
        Ok(true)
    }
}

/// Binds through a caller-supplied function.
///
/// With [`Arity::Boolean`], the function receives an empty token when the flag is given without
/// a value.
pub struct Custom<F> {
    arity: Arity,
    f: F,
}

impl<F> Custom<F> {
    /// Create a binder calling `f` for every token.
    pub fn new(arity: Arity, f: F) -> Self {
        Custom { arity, f }
    }
}

impl<'a, F> Binder<'a> for Custom<F>
where
    F: FnMut(&'a str) -> Result<bool, Error>,
{
    fn arity(&self) -> Arity {
        self.arity
    }

    fn bind(&mut self, token: &'a str) -> Result<bool, Error> {
        (self.f)(token)
    }
}

/// A destination that a flag can be bound to.
///
/// Implemented for every scalar [`Value`] and for collections of them. Collections of
/// collections are not destinations.
pub trait Destination<'a> {
    /// Build the binder writing into `self`.
    fn binder<'d>(&'d mut self) -> Box<dyn Binder<'a> + 'd>;
}

macro_rules! make_scalar_destination_impl {
    ($($target:ty),* $(,)?) => {
        $(
            impl<'a> Destination<'a> for $target {
                fn binder<'d>(&'d mut self) -> Box<dyn Binder<'a> + 'd> {
                    Box::new(Scalar::new(self))
                }
            }
        )*
    };
}

make_scalar_destination_impl!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
);

impl<'a> Destination<'a> for &'a str {
    fn binder<'d>(&'d mut self) -> Box<dyn Binder<'a> + 'd> {
        Box::new(Scalar::new(self))
    }
}

impl<'a> Destination<'a> for bool {
    fn binder<'d>(&'d mut self) -> Box<dyn Binder<'a> + 'd> {
        Box::new(Switch::new(self))
    }
}

impl<'a, T> Destination<'a> for Vec<T>
where
    T: Value<'a>,
{
    fn binder<'d>(&'d mut self) -> Box<dyn Binder<'a> + 'd> {
        Box::new(Many::new(self))
    }
}

impl<'a, T, const N: usize> Destination<'a> for heapless::Vec<T, N>
where
    T: Value<'a>,
{
    fn binder<'d>(&'d mut self) -> Box<dyn Binder<'a> + 'd> {
        Box::new(Many::new(self))
    }
}
