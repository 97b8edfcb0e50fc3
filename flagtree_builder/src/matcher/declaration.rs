use std::collections::HashMap;
use thiserror::Error;

use crate::matcher::model::{FlagDecl, SettingsDecl};
use crate::model::DeclId;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// A mistake in the declared schema, detected when the schema is built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    /// Two sibling flags share a short alias.
    #[error("short argument {alias} in {field} field is already defined in {existing} field")]
    DuplicateShort {
        /// The repeated alias.
        alias: String,
        /// The declaration repeating it.
        field: String,
        /// The declaration that defined it first.
        existing: String,
    },

    /// Two sibling flags share a long alias.
    #[error("long argument {alias} in {field} field is already defined in {existing} field")]
    DuplicateLong {
        /// The repeated alias.
        alias: String,
        /// The declaration repeating it.
        field: String,
        /// The declaration that defined it first.
        existing: String,
    },

    /// Two sibling commands share a command name.
    #[error("command {command} in {field} field is already defined in {existing} field")]
    DuplicateCommand {
        /// The repeated command name.
        command: String,
        /// The declaration repeating it.
        field: String,
        /// The declaration that defined it first.
        existing: String,
    },

    /// A short alias longer than one character.
    #[error("short argument {alias} in {field} field must be one character long")]
    ShortTooLong {
        /// The offending alias.
        alias: String,
        /// The declaration carrying it.
        field: String,
    },

    /// A flag with neither a short nor a long alias.
    #[error("argument {field} needs a short or long name")]
    MissingAlias {
        /// The declaration missing its aliases.
        field: String,
    },

    /// A command marked global.
    #[error("command {command} can't be global")]
    GlobalCommand {
        /// The command name.
        command: String,
    },

    /// A flag nested inside a command marked global.
    #[error("argument {arg} can't be global")]
    GlobalNested {
        /// The flag as typed (ex: `-s`).
        arg: String,
    },

    /// A second settings marker in the same scope.
    #[error("settings for {scope} are already defined")]
    DuplicateSettings {
        /// The scope (ex: `the top level`, `command bar`).
        scope: String,
    },
}

/// The validated, immutable set of declarations produced by [`Schema::build`](crate::Schema::build).
///
/// Declarations are held in pre-order: a command is always followed by its nested declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declarations {
    decls: Vec<FlagDecl>,
    settings: Vec<SettingsDecl>,
}

impl Declarations {
    pub(crate) fn new(
        decls: Vec<FlagDecl>,
        settings: Vec<SettingsDecl>,
    ) -> Result<Self, DeclarationError> {
        let declarations = Self { decls, settings };
        declarations.check()?;
        Ok(declarations)
    }

    fn check(&self) -> Result<(), DeclarationError> {
        // Keyed by (parent, alias), holding the name of the first declaration.
        let mut shorts: HashMap<(Option<DeclId>, &str), &str> = HashMap::default();
        let mut longs: HashMap<(Option<DeclId>, &str), &str> = HashMap::default();
        let mut commands: HashMap<(Option<DeclId>, &str), &str> = HashMap::default();

        for decl in &self.decls {
            if let Some(command) = decl.command() {
                if decl.global {
                    return Err(DeclarationError::GlobalCommand {
                        command: command.to_string(),
                    });
                }

                if let Some(existing) = commands.insert((decl.parent, command), &decl.name) {
                    return Err(DeclarationError::DuplicateCommand {
                        command: command.to_string(),
                        field: decl.name.clone(),
                        existing: existing.to_string(),
                    });
                }

                continue;
            }

            if decl.short().is_none() && decl.long().is_none() {
                return Err(DeclarationError::MissingAlias {
                    field: decl.name.clone(),
                });
            }

            if let Some(short) = decl.short() {
                if short.chars().count() > 1 {
                    return Err(DeclarationError::ShortTooLong {
                        alias: short.to_string(),
                        field: decl.name.clone(),
                    });
                }

                if let Some(existing) = shorts.insert((decl.parent, short), &decl.name) {
                    return Err(DeclarationError::DuplicateShort {
                        alias: short.to_string(),
                        field: decl.name.clone(),
                        existing: existing.to_string(),
                    });
                }
            }

            if let Some(long) = decl.long() {
                if let Some(existing) = longs.insert((decl.parent, long), &decl.name) {
                    return Err(DeclarationError::DuplicateLong {
                        alias: long.to_string(),
                        field: decl.name.clone(),
                        existing: existing.to_string(),
                    });
                }
            }

            if decl.global && decl.parent.is_some() {
                return Err(DeclarationError::GlobalNested {
                    arg: decl.formatted_arg(),
                });
            }
        }

        let mut scopes: Vec<Option<DeclId>> = Vec::default();

        for setting in &self.settings {
            if scopes.contains(&setting.parent) {
                return Err(DeclarationError::DuplicateSettings {
                    scope: self.scope_name(setting.parent),
                });
            }

            scopes.push(setting.parent);
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Checked {} declarations and {} settings.",
                self.decls.len(),
                self.settings.len()
            );
        }

        Ok(())
    }

    fn scope_name(&self, scope: Option<DeclId>) -> String {
        match scope.and_then(|id| self.get(id).command()) {
            Some(command) => format!("command {command}"),
            None => "the top level".to_string(),
        }
    }

    /// All declarations, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FlagDecl> {
        self.decls.iter()
    }

    /// The number of declarations.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Whether nothing was declared.
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// The declaration with the given id.
    ///
    /// Panics if the id was issued by a different schema.
    pub fn get(&self, id: DeclId) -> &FlagDecl {
        &self.decls[id.0]
    }

    pub(crate) fn commands(&self) -> impl Iterator<Item = &FlagDecl> {
        self.decls.iter().filter(|decl| decl.is_command())
    }

    pub(crate) fn flags(&self) -> impl Iterator<Item = &FlagDecl> {
        self.decls.iter().filter(|decl| !decl.is_command())
    }

    /// Find a declaration by its dot separated path of names (ex: `"bar.qux.string"`).
    ///
    /// Each segment is matched against the declarations nested directly inside the previous segment.
    pub fn lookup(&self, dotted: &str) -> Option<&FlagDecl> {
        if dotted.is_empty() {
            return None;
        }

        let mut parent: Option<DeclId> = None;
        let mut result = None;

        for segment in dotted.split('.') {
            let decl = self
                .decls
                .iter()
                .find(|decl| decl.parent == parent && decl.name == segment)?;
            parent = Some(decl.id);
            result = Some(decl);
        }

        result
    }

    /// Find a flag by its short or long alias (without dashes) inside an optional command, given as a dotted path.
    ///
    /// When the command does not resolve, the top level is searched.
    pub fn lookup_alias(&self, alias: &str, command: Option<&str>) -> Option<&FlagDecl> {
        let parent = command
            .and_then(|dotted| self.lookup(dotted))
            .map(|decl| decl.id);

        self.flags()
            .find(|decl| decl.parent == parent && decl.matches_alias(alias))
    }

    /// The dot separated path of names leading to the declaration.
    pub fn path(&self, id: DeclId) -> String {
        let mut names = Vec::default();
        let mut current = Some(id);

        while let Some(id) = current {
            let decl = self.get(id);
            names.push(decl.name.as_str());
            current = decl.parent;
        }

        names.reverse();
        names.join(".")
    }

    /// Whether the scope (`None` for the top level) declares a settings marker allowing unknown arguments.
    pub(crate) fn allows_unknown_arg(&self, scope: Option<DeclId>) -> bool {
        self.settings
            .iter()
            .any(|setting| setting.parent == scope && setting.allow_unknown_arg)
    }
}
