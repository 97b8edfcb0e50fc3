mod attribute;
mod field;

use crate::model::{DeriveField, DeriveFlags};

impl TryFrom<syn::DeriveInput> for DeriveFlags {
    type Error = syn::Error;

    fn try_from(value: syn::DeriveInput) -> Result<Self, Self::Error> {
        if !value.generics.params.is_empty() {
            return Err(syn::Error::new(
                value.ident.span(),
                "Invalid - #[derive(Flags)] does not support generic structs.",
            ));
        }

        match &value.data {
            syn::Data::Struct(ds) => {
                let fields = match ds {
                    syn::DataStruct {
                        fields: syn::Fields::Named(ref fields),
                        ..
                    } => fields
                        .named
                        .iter()
                        .map(DeriveField::try_from)
                        .collect::<Result<Vec<_>, _>>()?,
                    syn::DataStruct {
                        fields: syn::Fields::Unit,
                        ..
                    } => Vec::default(),
                    syn::DataStruct { .. } => {
                        return Err(syn::Error::new(
                            value.ident.span(),
                            "Invalid - #[derive(Flags)] requires named fields.",
                        ));
                    }
                };

                Ok(DeriveFlags {
                    struct_name: value.ident.clone(),
                    fields,
                })
            }
            _ => Err(syn::Error::new(
                value.ident.span(),
                "Invalid - #[derive(Flags)] only applies to structs.",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldKind;

    #[test]
    fn load_empty() {
        // Setup
        let input: syn::DeriveInput = syn::parse_str(
            r#"
                #[derive(Default, Flags)]
                struct Empty;
            "#,
        )
        .unwrap();

        // Execute
        let flags = DeriveFlags::try_from(input).unwrap();

        // Verify
        assert_eq!(flags.struct_name.to_string(), "Empty");
        assert!(flags.fields.is_empty());
    }

    #[test]
    fn load_fields() {
        // Setup
        let input: syn::DeriveInput = syn::parse_str(
            r#"
                #[derive(Default, Flags)]
                struct Cli {
                    #[flag(short = "v", global)]
                    verbose: bool,
                    count: usize,
                    #[command(description = "Run things")]
                    run: Run,
                    #[settings(allow_unknown_arg)]
                    settings: Settings,
                }
            "#,
        )
        .unwrap();

        // Execute
        let flags = DeriveFlags::try_from(input).unwrap();

        // Verify
        let kinds: Vec<(String, FieldKind)> = flags
            .fields
            .iter()
            .map(|field| (field.field_name.to_string(), field.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("verbose".to_string(), FieldKind::Flag),
                ("count".to_string(), FieldKind::Flag),
                ("run".to_string(), FieldKind::Command),
                ("settings".to_string(), FieldKind::Settings),
            ]
        );
    }

    #[test]
    fn load_enum() {
        // Setup
        let input: syn::DeriveInput = syn::parse_str(
            r#"
                enum Cli { A, B }
            "#,
        )
        .unwrap();

        // Execute
        let error = DeriveFlags::try_from(input).unwrap_err();

        // Verify
        assert_eq!(
            error.to_string(),
            "Invalid - #[derive(Flags)] only applies to structs."
        );
    }

    #[test]
    fn load_tuple() {
        // Setup
        let input: syn::DeriveInput = syn::parse_str(
            r#"
                struct Cli(bool);
            "#,
        )
        .unwrap();

        // Execute
        let error = DeriveFlags::try_from(input).unwrap_err();

        // Verify
        assert_eq!(
            error.to_string(),
            "Invalid - #[derive(Flags)] requires named fields."
        );
    }

    #[test]
    fn load_generic() {
        // Setup
        let input: syn::DeriveInput = syn::parse_str(
            r#"
                struct Cli<T> { value: T }
            "#,
        )
        .unwrap();

        // Execute
        let error = DeriveFlags::try_from(input).unwrap_err();

        // Verify
        assert_eq!(
            error.to_string(),
            "Invalid - #[derive(Flags)] does not support generic structs."
        );
    }
}
