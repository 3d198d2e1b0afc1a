use proc_macro::TokenStream;

mod arg;
mod attr;
mod derive;
mod helpers;
mod name;

/// Validate a flag name at compile time and expand to a `FlagName<'static>`.
///
/// ```ignore
/// let name = flag_name!("--count");
/// ```
#[proc_macro]
pub fn flag_name(item: TokenStream) -> TokenStream {
    name::run(item.into()).into()
}

/// Bind every named field of a struct to a flag.
///
/// Field attributes, under `#[flag(..)]`:
/// - `name = "--x"`, the full flag name;
/// - `short` or `short = 'x'`, a short flag, by default the first letter of the field;
/// - `long` or `long = "x"`, a long flag, by default the field name with dashes;
/// - `help = ".."`, the help text, by default the doc comment;
/// - `skip`, no flag for the field.
///
/// Without any of `name`, `short` or `long`, the flag is `--field-name`.
#[proc_macro_derive(Flags, attributes(flag))]
pub fn derive_flags(item: TokenStream) -> TokenStream {
    derive::run(item.into()).into()
}
