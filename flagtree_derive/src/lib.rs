//! Derive support for `flagtree`.
//! See the `flagtree` crate root for full details.
extern crate proc_macro;

mod generate;
mod load;
mod model;

use crate::model::DeriveFlags;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;

/// Derive [`Flags`](https://docs.rs/flagtree/latest/flagtree/trait.Flags.html) for a struct with named fields.
///
/// Every field is declared in field order, addressed in dotted lookups by its field name:
/// * A plain field (or one marked `#[flag(..)]`) is a flag whose value type follows the field type.
/// Keys: `short`, `long`, `description`, `nonempty = bool`, `env`, `delimiter`, `default`, `required`, `global`.
/// Without a `short` or `long` alias, the field name is the long alias.
/// * `#[command(..)]` marks a command whose nested declarations come from the field type, which must also derive `Flags`.
/// Keys: `name` (the command as typed, defaulting to the lowercase field name), `description`, `nonempty = bool`, `required`.
/// * `#[settings(allow_unknown_arg)]` marks the settings of the enclosing scope (the field type is `flagtree::Settings`).
#[proc_macro_derive(Flags, attributes(flag, command, settings))]
pub fn flags(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    match DeriveFlags::try_from(input) {
        Ok(flags) => TokenStream2::from(flags).into(),
        Err(error) => error.to_compile_error().into(),
    }
}
