use crate::model::{DeriveField, DeriveValue, FieldKind, IntermediateAttributes};
use quote::ToTokens;

impl TryFrom<&syn::Field> for DeriveField {
    type Error = syn::Error;

    fn try_from(value: &syn::Field) -> Result<Self, Self::Error> {
        let field_name = value
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new_spanned(value, "Invalid - field must be named."))?;
        let mut found: Option<(FieldKind, &syn::Attribute)> = None;

        for attribute in &value.attrs {
            let kind = if attribute.path().is_ident("flag") {
                FieldKind::Flag
            } else if attribute.path().is_ident("command") {
                FieldKind::Command
            } else if attribute.path().is_ident("settings") {
                FieldKind::Settings
            } else {
                continue;
            };

            if let Some((existing, _)) = found {
                return Err(syn::Error::new_spanned(
                    attribute,
                    format!(
                        "Invalid - field `{field_name}` cannot be both #[{}] and #[{}].",
                        existing.attribute(),
                        kind.attribute(),
                    ),
                ));
            }

            found.replace((kind, attribute));
        }

        let (kind, attributes) = match found {
            Some((kind, attribute)) => (kind, IntermediateAttributes::parse(attribute, kind)?),
            // A field without any attribute is a flag.
            None => (FieldKind::Flag, IntermediateAttributes::default()),
        };

        Ok(DeriveField {
            field_name,
            field_type: DeriveValue {
                tokens: value.ty.to_token_stream(),
            },
            kind,
            attributes,
        })
    }
}
