//! Derive macro implementation.

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::{
    Data, DataStruct, DeriveInput, Fields, FieldsNamed, GenericParam, Generics, Lifetime,
    LifetimeParam, spanned::Spanned,
};

use crate::arg::MetaArg;
use crate::attr::Attr;

pub fn run(item: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(item) {
        Ok(x) => x,
        Err(e) => return e.into_compile_error(),
    };

    try_run(&input).unwrap_or_else(syn::Error::into_compile_error)
}

pub fn try_run(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let ident = &input.ident;

    match input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(ref fields),
            ..
        }) => {
            let args = collect_args_meta(fields)?;
            let body = build_register_body(&args)?;

            let (generics, lt) = build_impl_generics(&input.generics)?;
            let (impl_generics, _, _) = generics.split_for_impl();
            let (_, ty_generics, where_clause) = input.generics.split_for_impl();

            Ok(quote! {
                impl #impl_generics flagbind::Flags<#lt> for #ident #ty_generics #where_clause {
                    fn register<'__d>(
                        &'__d mut self,
                        __parser: &mut flagbind::parser::Parser<'__d, #lt>,
                    ) -> ::core::result::Result<(), flagbind::parser::Error> {
                        #body
                        ::core::result::Result::Ok(())
                    }
                }
            })
        }

        _ => {
            let span = proc_macro2::Span::call_site();
            let error = syn::Error::new(
                span,
                "#[derive(Flags)] only supports structs with named fields",
            );
            Err(error)
        }
    }
}

fn collect_args_meta(fields: &FieldsNamed) -> Result<Vec<MetaArg>, syn::Error> {
    fields
        .named
        .iter()
        .map(|x| {
            let attrs = Attr::parse_all(&x.attrs)?;
            MetaArg::new(x, attrs)
        })
        .collect()
}

/// The lifetime of the parsed arguments: the one of the struct if any, or a fresh one.
fn build_impl_generics(generics: &Generics) -> Result<(Generics, Lifetime), syn::Error> {
    let mut lifetimes = generics.lifetimes();

    match (lifetimes.next(), lifetimes.next()) {
        (None, _) => {
            let lt: Lifetime = syn::parse_quote!('__a);

            let mut generics = generics.clone();
            generics
                .params
                .insert(0, GenericParam::Lifetime(LifetimeParam::new(lt.clone())));

            Ok((generics, lt))
        }

        (Some(x), None) => Ok((generics.clone(), x.lifetime.clone())),

        (Some(_), Some(extra)) => Err(syn::Error::new(
            extra.span(),
            "#[derive(Flags)] supports at most one lifetime parameter",
        )),
    }
}

fn build_register_body(args: &[MetaArg]) -> Result<TokenStream, syn::Error> {
    let mut body = TokenStream::new();
    let mut names: HashSet<String> = HashSet::new();

    for arg in args.iter().filter(|x| !x.is_skipped()) {
        let name = arg.flag_name()?;

        if !names.insert(name.value()) {
            return Err(syn::Error::new(
                name.span(),
                format!("flag `{}` is already used elsewhere", name.value()),
            ));
        }

        body.extend(build_arg_register(arg, &name)?);
    }

    Ok(body)
}

fn build_arg_register(arg: &MetaArg, name: &syn::LitStr) -> Result<TokenStream, syn::Error> {
    let id = &arg.id;
    let help = arg.help()?;
    let target = quote_spanned!(arg.ty.span()=> &mut self.#id);

    Ok(quote_spanned! { arg.span=>
        __parser.flag(flagbind::parser::FlagName::new_unchecked(#name), #help, #target)?;
    })
}
