use flagbind_parser::registry::is_valid;
use proc_macro2::Span;
use syn::Ident;
use syn::ext::IdentExt;

/// Check a flag name with the same rules as the parser applies at registration.
pub fn check_flag_name(name: &str, span: Span) -> Result<(), syn::Error> {
    if is_valid(name) {
        Ok(())
    } else {
        Err(syn::Error::new(
            span,
            format!("invalid flag name `{name}`, expected `-x` or `--name`"),
        ))
    }
}

/// The long flag name derived from a field identifier (e.g. `dry_run` gives `dry-run`).
pub fn dashed(id: &Ident) -> String {
    id.unraw().to_string().replace('_', "-")
}
