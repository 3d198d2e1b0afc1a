//! Attribute helpers.

use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ExprLit, Ident, Lit, LitStr, Meta, MetaNameValue, Token};

/// Attribute name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AttrName {
    /// Full flag name, markers included.
    Name,

    /// Short flag.
    Short,

    /// Long flag.
    Long,

    /// Help text.
    Help,

    /// Field not bound to any flag.
    Skip,
}

/// Attribute value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrValue {
    /// LitStr is a literal string.
    LitStr(LitStr),

    /// Expr is an expression.
    Expr(Expr),
}

/// This defines a `flag` attribute argument.
#[derive(Clone, Debug)]
pub struct Attr {
    /// The attribute identifier.
    pub id: Ident,

    /// The attribute name.
    pub name: AttrName,

    /// The attribute optional value.
    pub value: Option<AttrValue>,
}

impl Attr {
    /// Parse all `flag` attributes given as input.
    pub fn parse_all(attrs: &[Attribute]) -> Result<Vec<Self>, syn::Error> {
        let mut parsed = Vec::new();

        for attr in attrs {
            if !attr.path().is_ident("flag") {
                continue;
            }

            let args = attr.parse_args_with(Punctuated::<Self, Token![,]>::parse_terminated)?;
            parsed.extend(args);
        }

        Ok(parsed)
    }

    /// The value as a literal string, if so.
    pub fn lit_str(&self) -> Option<&LitStr> {
        match &self.value {
            Some(AttrValue::LitStr(lit)) => Some(lit),
            Some(AttrValue::Expr(Expr::Lit(ExprLit {
                lit: Lit::Str(lit),
                ..
            }))) => Some(lit),
            _ => None,
        }
    }

    /// The value as a literal, if so.
    pub fn lit(&self) -> Option<&Lit> {
        match &self.value {
            Some(AttrValue::Expr(Expr::Lit(ExprLit { lit, .. }))) => Some(lit),
            _ => None,
        }
    }
}

impl Parse for Attr {
    fn parse(input: ParseStream<'_>) -> Result<Self, syn::Error> {
        let id: Ident = input.parse()?;

        let name = match id.to_string().as_str() {
            "name" => AttrName::Name,
            "short" => AttrName::Short,
            "long" => AttrName::Long,
            "help" => AttrName::Help,
            "skip" => AttrName::Skip,
            other => {
                return Err(syn::Error::new(
                    id.span(),
                    format!("unknown flag attribute `{other}`"),
                ));
            }
        };

        let value = if input.peek(Token![=]) {
            // Skip the assign sign.
            let assign = input.parse::<Token![=]>()?;

            if input.peek(LitStr) {
                Some(AttrValue::LitStr(input.parse::<LitStr>()?))
            } else if let Ok(expr) = input.parse::<Expr>() {
                Some(AttrValue::Expr(expr))
            } else {
                return Err(syn::Error::new(
                    assign.span,
                    "expected a string or an expression after `=`",
                ));
            }
        } else {
            None
        };

        Ok(Attr { id, name, value })
    }
}

/// Collect the doc comments of an item, one line each.
///
/// Returns `None` when there is no doc comment or when it is blank.
pub fn parse_doc(attrs: &[Attribute]) -> Option<String> {
    let lines = attrs
        .iter()
        .filter(|x| x.path().is_ident("doc"))
        .filter_map(|x| match &x.meta {
            Meta::NameValue(MetaNameValue {
                value:
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(lit), ..
                    }),
                ..
            }) => Some(lit.value()),
            _ => None,
        })
        .map(|line| match line.strip_prefix(' ') {
            Some(line) => line.trim_end().to_string(),
            None => line.trim_end().to_string(),
        })
        .collect::<Vec<_>>();

    let doc = lines.join("\n");
    let doc = doc.trim();

    if doc.is_empty() {
        None
    } else {
        Some(doc.to_string())
    }
}
