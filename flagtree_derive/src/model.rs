use proc_macro2::TokenStream as TokenStream2;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub(crate) struct DeriveValue {
    pub(crate) tokens: TokenStream2,
}

impl PartialEq for DeriveValue {
    fn eq(&self, other: &Self) -> bool {
        self.tokens.to_string() == other.tokens.to_string()
    }
}

impl Eq for DeriveValue {}

/// The contents of one `#[flag(..)]`, `#[command(..)]` or `#[settings(..)]` attribute.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct IntermediateAttributes {
    pub(crate) singletons: HashSet<String>,
    pub(crate) pairs: HashMap<String, DeriveValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Flag,
    Command,
    Settings,
}

impl FieldKind {
    pub(crate) fn attribute(&self) -> &'static str {
        match self {
            FieldKind::Flag => "flag",
            FieldKind::Command => "command",
            FieldKind::Settings => "settings",
        }
    }

    // Setter methods emitted in this order, so the generated code is stable.
    pub(crate) fn pairs(&self) -> &'static [&'static str] {
        match self {
            FieldKind::Flag => &[
                "short",
                "long",
                "description",
                "nonempty",
                "env",
                "delimiter",
                "default",
            ],
            FieldKind::Command => &["name", "description", "nonempty"],
            FieldKind::Settings => &[],
        }
    }

    pub(crate) fn singletons(&self) -> &'static [&'static str] {
        match self {
            FieldKind::Flag => &["required", "global"],
            FieldKind::Command => &["required"],
            FieldKind::Settings => &["allow_unknown_arg"],
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DeriveField {
    pub(crate) field_name: syn::Ident,
    pub(crate) field_type: DeriveValue,
    pub(crate) kind: FieldKind,
    pub(crate) attributes: IntermediateAttributes,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DeriveFlags {
    pub(crate) struct_name: syn::Ident,
    pub(crate) fields: Vec<DeriveField>,
}
