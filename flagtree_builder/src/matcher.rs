mod bind;
mod classify;
mod command;
mod core;
mod declaration;
mod model;

pub(crate) use self::core::*;
pub use declaration::{DeclarationError, Declarations};
pub use model::{CommandOccurrence, Dash, DeclKind, FlagDecl, Token, TokenKind};
pub(crate) use model::SettingsDecl;
