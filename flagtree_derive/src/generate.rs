use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;

use crate::model::{DeriveField, DeriveFlags, DeriveValue, FieldKind};

impl From<DeriveFlags> for TokenStream2 {
    fn from(value: DeriveFlags) -> Self {
        let DeriveFlags {
            struct_name,
            fields,
        } = value;
        let declarations = fields.iter().map(declaration);
        let captures = fields.iter().filter_map(capture);

        quote! {
            impl flagtree::Flags for #struct_name {
                fn declare(schema: flagtree::Schema) -> flagtree::Schema {
                    schema #( #declarations )*
                }

                #[allow(unused_variables)]
                fn capture(&mut self, resolution: &flagtree::Resolution, path: &str) {
                    #( #captures )*
                }
            }
        }
    }
}

fn name(field: &DeriveField) -> String {
    field.field_name.unraw().to_string()
}

fn setters(field: &DeriveField) -> TokenStream2 {
    let kind = field.kind;
    let pairs = kind
        .pairs()
        .iter()
        // The command name is passed to the constructor instead.
        .filter(|key| !(kind == FieldKind::Command && **key == "name"))
        .filter_map(|key| {
            field.attributes.pairs.get(*key).map(|DeriveValue { tokens }| {
                let setter = format_ident!("{key}");
                quote! { .#setter(#tokens) }
            })
        });
    let singletons = kind
        .singletons()
        .iter()
        .filter(|key| field.attributes.singletons.contains(**key))
        .map(|key| {
            let setter = format_ident!("{key}");
            quote! { .#setter() }
        });

    quote! { #( #pairs )* #( #singletons )* }
}

fn declaration(field: &DeriveField) -> TokenStream2 {
    let name = name(field);
    let field_type = &field.field_type.tokens;
    let setters = setters(field);

    match field.kind {
        FieldKind::Flag => {
            let pairs = &field.attributes.pairs;
            let fallback_long = if pairs.contains_key("short") || pairs.contains_key("long") {
                quote! {}
            } else {
                quote! { .long(#name) }
            };

            quote! {
                .add(flagtree::Parameter::of::<#field_type>(#name) #fallback_long #setters)
            }
        }
        FieldKind::Command => {
            let command = match field.attributes.pairs.get("name") {
                Some(DeriveValue { tokens }) => quote! { #tokens },
                None => quote! { "" },
            };

            quote! {
                .command(
                    flagtree::Command::new(#name, #command) #setters,
                    <#field_type as flagtree::Flags>::declare,
                )
            }
        }
        FieldKind::Settings => quote! {
            .settings(flagtree::Settings::new() #setters)
        },
    }
}

fn capture(field: &DeriveField) -> Option<TokenStream2> {
    let name = name(field);
    let field_name = &field.field_name;
    let field_type = &field.field_type.tokens;

    match field.kind {
        FieldKind::Flag => Some(quote! {
            if let Some(value) = resolution.get::<#field_type>(&flagtree::dotted(path, #name)) {
                self.#field_name = value;
            }
        }),
        FieldKind::Command => Some(quote! {
            flagtree::Flags::capture(&mut self.#field_name, resolution, &flagtree::dotted(path, #name));
        }),
        FieldKind::Settings => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IntermediateAttributes;
    use proc_macro2::{Literal, Span};
    use std::collections::{HashMap, HashSet};

    fn ident(name: &str) -> syn::Ident {
        syn::Ident::new(name, Span::call_site())
    }

    fn field(
        name: &str,
        field_type: TokenStream2,
        kind: FieldKind,
        singletons: &[&str],
        pairs: &[(&str, TokenStream2)],
    ) -> DeriveField {
        DeriveField {
            field_name: ident(name),
            field_type: DeriveValue { tokens: field_type },
            kind,
            attributes: IntermediateAttributes {
                singletons: singletons.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
                pairs: pairs
                    .iter()
                    .map(|(key, tokens)| {
                        (
                            key.to_string(),
                            DeriveValue {
                                tokens: tokens.clone(),
                            },
                        )
                    })
                    .collect::<HashMap<_, _>>(),
            },
        }
    }

    fn string(value: &str) -> TokenStream2 {
        let literal = Literal::string(value);
        quote! { #literal }
    }

    #[test]
    fn render_empty() {
        // Setup
        let flags = DeriveFlags {
            struct_name: ident("Empty"),
            fields: vec![],
        };

        // Execute
        let token_stream = TokenStream2::from(flags);

        // Verify
        assert_eq!(
            token_stream.to_string(),
            quote! {
                impl flagtree::Flags for Empty {
                    fn declare(schema: flagtree::Schema) -> flagtree::Schema {
                        schema
                    }

                    #[allow(unused_variables)]
                    fn capture(&mut self, resolution: &flagtree::Resolution, path: &str) {
                    }
                }
            }
            .to_string()
        );
    }

    #[test]
    fn render_flag() {
        // Setup
        let field = field(
            "string",
            quote! { String },
            FieldKind::Flag,
            &["required", "global"],
            &[
                ("default", string("foo")),
                ("short", string("s")),
                ("nonempty", quote! { false }),
            ],
        );

        // Execute
        let declared = declaration(&field);
        let captured = capture(&field).unwrap();

        // Verify
        assert_eq!(
            declared.to_string(),
            quote! {
                .add(flagtree::Parameter::of::<String>("string")
                    .short("s")
                    .nonempty(false)
                    .default("foo")
                    .required()
                    .global())
            }
            .to_string()
        );
        assert_eq!(
            captured.to_string(),
            quote! {
                if let Some(value) = resolution.get::<String>(&flagtree::dotted(path, "string")) {
                    self.string = value;
                }
            }
            .to_string()
        );
    }

    #[test]
    fn render_flag_fallback_long() {
        // Setup
        let field = field("count", quote! { Vec<u64> }, FieldKind::Flag, &[], &[]);

        // Execute
        let declared = declaration(&field);

        // Verify
        assert_eq!(
            declared.to_string(),
            quote! {
                .add(flagtree::Parameter::of::<Vec<u64> >("count").long("count"))
            }
            .to_string()
        );
    }

    #[test]
    fn render_command() {
        // Setup
        let field = field(
            "math",
            quote! { Math },
            FieldKind::Command,
            &["required"],
            &[("name", string("calc")), ("description", string("Math functions"))],
        );

        // Execute
        let declared = declaration(&field);
        let captured = capture(&field).unwrap();

        // Verify
        assert_eq!(
            declared.to_string(),
            quote! {
                .command(
                    flagtree::Command::new("math", "calc").description("Math functions").required(),
                    <Math as flagtree::Flags>::declare,
                )
            }
            .to_string()
        );
        assert_eq!(
            captured.to_string(),
            quote! {
                flagtree::Flags::capture(&mut self.math, resolution, &flagtree::dotted(path, "math"));
            }
            .to_string()
        );
    }

    #[test]
    fn render_settings() {
        // Setup
        let field = field(
            "settings",
            quote! { flagtree::Settings },
            FieldKind::Settings,
            &["allow_unknown_arg"],
            &[],
        );

        // Execute
        let declared = declaration(&field);

        // Verify
        assert_eq!(
            declared.to_string(),
            quote! {
                .settings(flagtree::Settings::new().allow_unknown_arg())
            }
            .to_string()
        );
        assert!(capture(&field).is_none());
    }

    #[test]
    fn render_raw_name() {
        // Setup
        let field = DeriveField {
            field_name: syn::Ident::new_raw("type", Span::call_site()),
            ..field("unused", quote! { String }, FieldKind::Flag, &[], &[])
        };

        // Execute
        let captured = capture(&field).unwrap();

        // Verify
        assert_eq!(
            captured.to_string(),
            quote! {
                if let Some(value) = resolution.get::<String>(&flagtree::dotted(path, "type")) {
                    self.r#type = value;
                }
            }
            .to_string()
        );
    }
}
