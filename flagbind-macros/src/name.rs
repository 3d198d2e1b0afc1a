//! Compile-time validated flag names.

use proc_macro2::TokenStream;
use quote::quote;
use syn::LitStr;

use crate::helpers::check_flag_name;

pub fn run(item: TokenStream) -> TokenStream {
    try_run(item).unwrap_or_else(syn::Error::into_compile_error)
}

pub fn try_run(item: TokenStream) -> Result<TokenStream, syn::Error> {
    let lit: LitStr = syn::parse2(item)?;
    check_flag_name(&lit.value(), lit.span())?;

    Ok(quote! {
        flagbind::parser::FlagName::new_unchecked(#lit)
    })
}
