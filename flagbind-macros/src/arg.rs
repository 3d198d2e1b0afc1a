//! Field-to-flag mapping.

use proc_macro2::Span;
use syn::{Field, Ident, Lit, LitStr, Type, spanned::Spanned};

use crate::attr::{Attr, AttrName, parse_doc};
use crate::helpers::{check_flag_name, dashed};

/// Argument metadata.
pub struct MetaArg {
    /// Argument span.
    pub span: Span,

    /// Argument identifier (i.e. field identifier).
    pub id: Ident,

    /// Type.
    pub ty: Type,

    /// Attributes.
    pub attrs: Vec<Attr>,

    /// Doc comment, if any.
    pub doc: Option<String>,
}

impl MetaArg {
    /// Create a new argument metadata.
    pub fn new(field: &Field, attrs: Vec<Attr>) -> Result<Self, syn::Error> {
        let id = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;

        Ok(MetaArg {
            span: field.span(),
            id,
            ty: field.ty.clone(),
            doc: parse_doc(&field.attrs),
            attrs,
        })
    }

    /// Evaluate if the field is not bound to any flag.
    pub fn is_skipped(&self) -> bool {
        self.attrs.iter().any(|x| x.name == AttrName::Skip)
    }

    /// The flag name, markers included, spanned at the attribute defining it.
    pub fn flag_name(&self) -> Result<LitStr, syn::Error> {
        let mut defs = self
            .attrs
            .iter()
            .filter(|x| matches!(x.name, AttrName::Name | AttrName::Short | AttrName::Long));

        let def = defs.next();

        if let Some(extra) = defs.next() {
            return Err(syn::Error::new(
                extra.id.span(),
                "a field binds to a single flag, use one of `name`, `short` or `long`",
            ));
        }

        let (name, span) = match def {
            None => (format!("--{}", dashed(&self.id)), self.id.span()),
            Some(attr) => (self.name_from_attr(attr)?, attr.id.span()),
        };

        check_flag_name(&name, span)?;
        Ok(LitStr::new(&name, span))
    }

    fn name_from_attr(&self, attr: &Attr) -> Result<String, syn::Error> {
        match attr.name {
            AttrName::Name => attr.lit_str().map(LitStr::value).ok_or_else(|| {
                syn::Error::new(attr.id.span(), "expected `name` to be a literal string")
            }),

            AttrName::Short => {
                let short = match (&attr.value, attr.lit()) {
                    (None, _) => dashed(&self.id).chars().next(),
                    (Some(_), Some(Lit::Char(c))) => Some(c.value()),
                    _ => None,
                };

                short.map(|c| format!("-{c}")).ok_or_else(|| {
                    syn::Error::new(attr.id.span(), "expected `short` to be a character")
                })
            }

            _ => match &attr.value {
                None => Ok(format!("--{}", dashed(&self.id))),
                Some(_) => attr
                    .lit_str()
                    .map(|x| format!("--{}", x.value()))
                    .ok_or_else(|| {
                        syn::Error::new(attr.id.span(), "expected `long` to be a literal string")
                    }),
            },
        }
    }

    /// The help text, from the `help` attribute or else the doc comment.
    pub fn help(&self) -> Result<String, syn::Error> {
        let Some(attr) = self.attrs.iter().find(|x| x.name == AttrName::Help) else {
            return Ok(self.doc.clone().unwrap_or_default());
        };

        attr.lit_str()
            .map(LitStr::value)
            .ok_or_else(|| syn::Error::new(attr.id.span(), "expected `help` to be a literal string"))
    }
}

#[cfg(test)]
mod tests {
    use syn::Field;

    use super::*;

    fn meta(field: Field) -> anyhow::Result<MetaArg> {
        let attrs = Attr::parse_all(&field.attrs)?;
        Ok(MetaArg::new(&field, attrs)?)
    }

    #[test]
    fn it_should_default_to_long_flag() -> anyhow::Result<()> {
        let arg = meta(syn::parse_quote!(dry_run: bool))?;

        assert_eq!("--dry-run", arg.flag_name()?.value());
        assert_eq!("", arg.help()?);
        assert!(!arg.is_skipped());

        Ok(())
    }

    #[test]
    fn it_should_derive_short_flag_from_field() -> anyhow::Result<()> {
        let arg = meta(syn::parse_quote! {
            #[flag(short)]
            verbose: bool
        })?;

        assert_eq!("-v", arg.flag_name()?.value());

        Ok(())
    }

    #[test]
    fn it_should_use_given_names() -> anyhow::Result<()> {
        let short = meta(syn::parse_quote! {
            #[flag(short = 'n')]
            count: u32
        })?;
        assert_eq!("-n", short.flag_name()?.value());

        let long = meta(syn::parse_quote! {
            #[flag(long = "num")]
            count: u32
        })?;
        assert_eq!("--num", long.flag_name()?.value());

        let name = meta(syn::parse_quote! {
            #[flag(name = "-#")]
            count: u32
        })?;
        assert_eq!("-#", name.flag_name()?.value());

        Ok(())
    }

    #[test]
    fn it_should_reject_several_names() -> anyhow::Result<()> {
        let arg = meta(syn::parse_quote! {
            #[flag(short, long)]
            verbose: bool
        })?;

        assert!(arg.flag_name().is_err());

        Ok(())
    }

    #[test]
    fn it_should_reject_invalid_names() -> anyhow::Result<()> {
        let arg = meta(syn::parse_quote! {
            #[flag(name = "count")]
            count: u32
        })?;
        assert!(arg.flag_name().is_err());

        let arg = meta(syn::parse_quote! {
            #[flag(long = "a b")]
            count: u32
        })?;
        assert!(arg.flag_name().is_err());

        let arg = meta(syn::parse_quote! {
            #[flag(short = "c")]
            count: u32
        })?;
        assert!(arg.flag_name().is_err());

        Ok(())
    }

    #[test]
    fn it_should_prefer_help_attribute_over_doc() -> anyhow::Result<()> {
        let documented = meta(syn::parse_quote! {
            /// Number of runs.
            count: u32
        })?;
        assert_eq!("Number of runs.", documented.help()?);

        let both = meta(syn::parse_quote! {
            /// Number of runs.
            #[flag(help = "How many times.")]
            count: u32
        })?;
        assert_eq!("How many times.", both.help()?);

        Ok(())
    }

    #[test]
    fn it_should_detect_skipped_field() -> anyhow::Result<()> {
        let arg = meta(syn::parse_quote! {
            #[flag(skip)]
            cache: Vec<u8>
        })?;

        assert!(arg.is_skipped());

        Ok(())
    }
}
