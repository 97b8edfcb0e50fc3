use crate::model::{DeriveValue, FieldKind, IntermediateAttributes};
use quote::ToTokens;

impl IntermediateAttributes {
    /// Parse the attribute as `key = value` pairs and bare `key` singletons, accepting only the keys of the kind.
    pub(crate) fn parse(attribute: &syn::Attribute, kind: FieldKind) -> Result<Self, syn::Error> {
        let mut attributes = IntermediateAttributes::default();

        // `#[flag]` carries no arguments.
        if let syn::Meta::Path(_) = attribute.meta {
            return Ok(attributes);
        }

        let attributes_parser =
            syn::punctuated::Punctuated::<syn::Expr, syn::Token![,]>::parse_terminated;

        for expression in attribute.parse_args_with(attributes_parser)? {
            match &expression {
                syn::Expr::Assign(assignment) => {
                    let key = assignment.left.to_token_stream().to_string();

                    if !kind.pairs().contains(&key.as_str()) {
                        return Err(unknown_key(&assignment.left, kind, &key));
                    }

                    if attributes.pairs.contains_key(&key) {
                        return Err(syn::Error::new_spanned(
                            &assignment.left,
                            format!("Invalid - `{key}` is repeated in #[{}(..)].", kind.attribute()),
                        ));
                    }

                    attributes.pairs.insert(
                        key,
                        DeriveValue {
                            tokens: assignment.right.to_token_stream(),
                        },
                    );
                }
                syn::Expr::Path(path) => {
                    let key = path.to_token_stream().to_string();

                    if !kind.singletons().contains(&key.as_str()) {
                        return Err(unknown_key(path, kind, &key));
                    }

                    attributes.singletons.insert(key);
                }
                _ => {
                    return Err(syn::Error::new_spanned(
                        expression,
                        format!(
                            "Invalid - #[{}(..)] expects `key = value` or `key` items.",
                            kind.attribute()
                        ),
                    ));
                }
            };
        }

        Ok(attributes)
    }
}

fn unknown_key(tokens: impl ToTokens, kind: FieldKind, key: &str) -> syn::Error {
    syn::Error::new_spanned(
        tokens,
        format!("Invalid - unknown key `{key}` in #[{}(..)].", kind.attribute()),
    )
}
