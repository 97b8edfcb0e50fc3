use std::collections::HashMap;
use thiserror::Error;

use crate::api::{Field, Flags, HandlerError};
use crate::matcher::*;
use crate::model::{DeclId, InvalidScalar, ResolvedBy, Value, ValueType};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Behaviour to look up environment variables for the flag fallbacks.
pub trait Environment {
    /// The value of the variable, if it is set.
    fn var(&self, name: &str) -> Option<String>;
}

/// The environment of the running process (via [`std::env::var`]).
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

fn required_for(command: &Option<String>) -> String {
    match command {
        Some(command) => format!(" for {command} command"),
        None => String::default(),
    }
}

/// A mistake in the command line input.
/// Every one of these is collected; none stops the resolution of the remaining flags.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// An argument token is missing its value (ex: `--string`, `--int=`, `--bool=`).
    #[error("argument {arg} needs a value")]
    MissingValue {
        /// The argument as typed (ex: `--int`).
        arg: String,
    },

    /// A value could not be coerced into the declared type.
    #[error("failed to parse '{value}' as {type_name}")]
    InvalidValue {
        /// The offending value.
        value: String,
        /// The name of the scalar family (ex: `int64`).
        type_name: &'static str,
    },

    /// An argument or unnamed token that matches no declaration, in a scope that does not allow unknown arguments.
    #[error("unknown argument {arg}")]
    UnknownArgument {
        /// The argument as typed (ex: `-x`), or the unnamed token.
        arg: String,
    },

    /// A required flag was not typed, and no environment variable or default supplied it.
    #[error("argument {arg} is required{}", required_for(.command))]
    Required {
        /// The flag's formatted alias (ex: `-r`).
        arg: String,
        /// The command name holding the flag, unless it is top level.
        command: Option<String>,
    },

    /// A nonempty flag was typed with an empty value.
    #[error("argument {arg} needs a value")]
    EmptyValue {
        /// The flag's formatted alias (ex: `-s`).
        arg: String,
    },

    /// A required command was not typed.
    #[error("command {command} is required")]
    CommandRequired {
        /// The command name.
        command: String,
    },

    /// A nonempty command was typed without any argument.
    #[error("command {command} needs an argument")]
    CommandNeedsArgument {
        /// The command name.
        command: String,
    },
}

impl From<InvalidScalar> for ResolveError {
    fn from(error: InvalidScalar) -> Self {
        ResolveError::InvalidValue {
            value: error.token,
            type_name: error.scalar.type_name(),
        }
    }
}

/// The resolved state of one declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    tokens: Vec<usize>,
    value: Option<Value>,
    resolved_by: ResolvedBy,
    errors: Vec<ResolveError>,
}

impl Binding {
    /// The indices of the bound tokens, in positional order.
    ///
    /// For a command: its own token followed by the argument and unnamed tokens directly in its scope.
    pub fn tokens(&self) -> &[usize] {
        &self.tokens
    }

    /// The typed value of a flag (`None` for a command).
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Where the value came from.
    pub fn resolved_by(&self) -> ResolvedBy {
        self.resolved_by
    }

    /// The errors of this declaration and its bound tokens.
    pub fn errors(&self) -> &[ResolveError] {
        &self.errors
    }
}

/// The complete result of resolving the input tokens against the declarations.
///
/// ### Example
/// ```
/// # use flagtree_builder as flagtree;
/// use flagtree::{Command, Parameter, ResolvedBy, Schema, ValueType};
///
/// let declarations = Schema::new()
///     .add(Parameter::new("string", ValueType::STRING).short("s"))
///     .command(Command::new("bar", "bar"), |sub| {
///         sub.add(Parameter::new("string", ValueType::STRING).short("s"))
///     })
///     .build()
///     .unwrap();
///
/// let resolution = declarations.resolve(&["./app", "-s=foo", "bar", "-s=baz"]);
///
/// assert_eq!(resolution.get::<String>("string"), Some("foo".to_string()));
/// assert_eq!(resolution.get::<String>("bar.string"), Some("baz".to_string()));
/// assert_eq!(resolution.resolved_by("bar.string"), Some(ResolvedBy::Argument));
/// assert_eq!(
///     resolution.resolved_arguments("bar"),
///     Some(vec!["bar".to_string(), "-s=baz".to_string()])
/// );
/// assert!(resolution.errors().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    declarations: Declarations,
    occurrences: Vec<CommandOccurrence>,
    tokens: Vec<Token>,
    bindings: Vec<Binding>,
    unknown: Vec<ResolveError>,
    pub(crate) handler_error: Option<HandlerError>,
}

impl Declarations {
    /// Resolve the input tokens (including the program as the first token), falling back on the process environment.
    pub fn resolve(&self, tokens: &[&str]) -> Resolution {
        resolve(self.clone(), tokens, &ProcessEnvironment)
    }

    /// Resolve the input tokens (including the program as the first token), falling back on the given environment.
    ///
    /// ### Example
    /// ```
    /// # use flagtree_builder as flagtree;
    /// use std::collections::HashMap;
    /// use flagtree::{Parameter, ResolvedBy, Schema, ValueType};
    ///
    /// let declarations = Schema::new()
    ///     .add(Parameter::new("ints", ValueType::INTS).long("ints").env("INTS").delimiter(","))
    ///     .build()
    ///     .unwrap();
    /// let environment = HashMap::from([("INTS".to_string(), "1, 2".to_string())]);
    ///
    /// let resolution = declarations.resolve_with(&["./app"], &environment);
    ///
    /// assert_eq!(resolution.get::<Vec<isize>>("ints"), Some(vec![1, 2]));
    /// assert_eq!(resolution.resolved_by("ints"), Some(ResolvedBy::Environment));
    /// ```
    pub fn resolve_with(&self, tokens: &[&str], environment: &impl Environment) -> Resolution {
        resolve(self.clone(), tokens, environment)
    }
}

pub(crate) fn resolve(
    declarations: Declarations,
    tokens: &[&str],
    environment: &(impl Environment + ?Sized),
) -> Resolution {
    let Matches {
        occurrences,
        mut tokens,
        bound,
    } = TokenMatcher::new(&declarations).matches(tokens);
    let mut bindings = Vec::with_capacity(declarations.len());

    for (decl, indices) in declarations.iter().zip(bound) {
        let binding = match decl.value_type() {
            Some(value_type) => {
                let (value, resolved_by, coercion_errors) =
                    coerce(decl, value_type, &indices, &mut tokens, environment);
                let mut errors: Vec<ResolveError> =
                    flag_constraint(&declarations, decl, &indices, &tokens, resolved_by, &occurrences)
                        .into_iter()
                        .collect();
                errors.extend(coercion_errors);
                Binding {
                    tokens: indices,
                    value: Some(value),
                    resolved_by,
                    errors,
                }
            }
            None => {
                let occurrence = occurrence(&occurrences, decl.id);
                let resolved_by = if occurrence.is_matched() {
                    ResolvedBy::Argument
                } else {
                    ResolvedBy::Unset
                };
                Binding {
                    errors: command_constraint(&declarations, decl, occurrence, &tokens)
                        .into_iter()
                        .collect(),
                    tokens: indices,
                    value: None,
                    resolved_by,
                }
            }
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Declaration {} '{}' resolved by {}: {:?}, errors: {:?}.",
                decl.id, decl.name, binding.resolved_by, binding.value, binding.errors
            );
        }

        bindings.push(binding);
    }

    let unknown = unknown_arguments(&declarations, &tokens);

    Resolution {
        declarations,
        occurrences,
        tokens,
        bindings,
        unknown,
        handler_error: None,
    }
}

fn occurrence(occurrences: &[CommandOccurrence], id: DeclId) -> &CommandOccurrence {
    occurrences
        .iter()
        .find(|occurrence| occurrence.decl == id)
        .expect("internal error - every command must have an occurrence")
}

/// Coerce the bound tokens into the flag's value, falling back on the environment and the default when nothing was bound.
fn coerce(
    decl: &FlagDecl,
    value_type: ValueType,
    indices: &[usize],
    tokens: &mut [Token],
    environment: &(impl Environment + ?Sized),
) -> (Value, ResolvedBy, Vec<ResolveError>) {
    let mut value = Value::zero(value_type);
    let mut errors = Vec::default();

    for &index in indices {
        let token = &mut tokens[index];

        // `-b` means true, while `-b=` is explicitly unset.
        if value_type.is_bool() && token.value.is_empty() && !token.unset {
            token.value = "true".to_string();
            token.trail.push("implicit true");
        }

        if token.value.is_empty() {
            let missing = if value_type.is_bool() {
                token.unset
            } else if value_type.is_string() {
                !token.unset
            } else {
                true
            };

            if missing {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Token {index} '{}' is missing its value.", token.raw);
                }

                errors.push(ResolveError::MissingValue {
                    arg: token.formatted_arg(),
                });
                continue;
            }
        }

        assign(&mut value, value_type, decl.delimiter(), &token.value, &mut errors);
    }

    if !indices.is_empty() {
        return (value, ResolvedBy::Argument, errors);
    }

    if let Some(variable) = decl.env().and_then(|name| environment.var(name)) {
        assign(&mut value, value_type, decl.delimiter(), &variable, &mut errors);
        return (value, ResolvedBy::Environment, errors);
    }

    if let Some(default) = decl.default_value() {
        assign(&mut value, value_type, decl.delimiter(), default, &mut errors);
        return (value, ResolvedBy::Default, errors);
    }

    (value, ResolvedBy::Unset, errors)
}

fn assign(
    value: &mut Value,
    value_type: ValueType,
    delimiter: Option<&str>,
    raw: &str,
    errors: &mut Vec<ResolveError>,
) {
    match delimiter {
        Some(delimiter) if value_type.is_repeatable() => {
            for piece in raw.split(delimiter).map(str::trim) {
                if piece.is_empty() {
                    continue;
                }

                if let Err(error) = value.assign(piece) {
                    errors.push(error.into());
                }
            }
        }
        _ => {
            if let Err(error) = value.assign(raw) {
                errors.push(error.into());
            }
        }
    }
}

/// The nonempty or required violation of a flag, when its command was typed (or it is top level).
fn flag_constraint(
    declarations: &Declarations,
    decl: &FlagDecl,
    indices: &[usize],
    tokens: &[Token],
    resolved_by: ResolvedBy,
    occurrences: &[CommandOccurrence],
) -> Option<ResolveError> {
    let command = match decl.parent {
        Some(parent) => {
            if !occurrence(occurrences, parent).is_matched() {
                return None;
            }

            declarations.get(parent).command().map(str::to_string)
        }
        None => None,
    };

    if decl.nonempty && indices.iter().any(|&index| tokens[index].value.is_empty()) {
        return Some(ResolveError::EmptyValue {
            arg: decl.formatted_arg(),
        });
    }

    if decl.required
        && indices.is_empty()
        && !matches!(resolved_by, ResolvedBy::Environment | ResolvedBy::Default)
    {
        return Some(ResolveError::Required {
            arg: decl.formatted_arg(),
            command,
        });
    }

    None
}

fn command_constraint(
    declarations: &Declarations,
    decl: &FlagDecl,
    occurrence: &CommandOccurrence,
    tokens: &[Token],
) -> Option<ResolveError> {
    let command = decl.command().unwrap_or(&decl.name).to_string();

    match occurrence.range() {
        None if decl.required => Some(ResolveError::CommandRequired { command }),
        Some((from, to)) if decl.nonempty => {
            let arguments = tokens[from + 1..to]
                .iter()
                .filter(|token| token.kind == TokenKind::Argument)
                .filter(|token| {
                    !token
                        .flag
                        .map_or(false, |flag| declarations.get(flag).global)
                })
                .count();

            if arguments == 0 {
                Some(ResolveError::CommandNeedsArgument { command })
            } else {
                None
            }
        }
        _ => None,
    }
}

fn unknown_arguments(declarations: &Declarations, tokens: &[Token]) -> Vec<ResolveError> {
    tokens
        .iter()
        .filter(|token| match token.kind {
            TokenKind::Argument => token.flag.is_none(),
            TokenKind::Unnamed => true,
            _ => false,
        })
        .filter(|token| !declarations.allows_unknown_arg(token.command))
        .map(|token| {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Token {} '{}' is an unknown argument.", token.index, token.raw);
            }

            ResolveError::UnknownArgument {
                arg: token.formatted_arg(),
            }
        })
        .collect()
}

impl Resolution {
    /// The declarations this resolution was made against.
    pub fn declarations(&self) -> &Declarations {
        &self.declarations
    }

    /// Find a declaration by its dotted path of names (ex: `"bar.string"`).
    pub fn lookup(&self, dotted: &str) -> Option<&FlagDecl> {
        self.declarations.lookup(dotted)
    }

    /// Find a flag by its alias (without dashes) inside an optional command, given as a dotted path.
    pub fn lookup_alias(&self, alias: &str, command: Option<&str>) -> Option<&FlagDecl> {
        self.declarations.lookup_alias(alias, command)
    }

    /// The resolved state of the declaration at the dotted path.
    pub fn binding(&self, dotted: &str) -> Option<&Binding> {
        self.lookup(dotted)
            .map(|decl| &self.bindings[decl.id.index()])
    }

    /// The resolved state of the declaration.
    pub fn binding_of(&self, id: DeclId) -> &Binding {
        &self.bindings[id.index()]
    }

    /// The typed value of the flag at the dotted path.
    pub fn value(&self, dotted: &str) -> Option<&Value> {
        self.binding(dotted).and_then(Binding::value)
    }

    /// The typed value of the flag at the dotted path, as the Rust type `T`.
    ///
    /// `None` when there is no such flag or when `T` does not match its value type.
    pub fn get<T: Field>(&self, dotted: &str) -> Option<T> {
        self.value(dotted).and_then(T::from_value)
    }

    /// Where the value of the declaration at the dotted path came from.
    pub fn resolved_by(&self, dotted: &str) -> Option<ResolvedBy> {
        self.binding(dotted).map(Binding::resolved_by)
    }

    /// The arguments typed for the declaration at the dotted path, or `None` if it was not typed.
    ///
    /// For a flag: the value of every bound token, in positional order.
    /// For a command: the command followed by its direct arguments re-rendered as `-alias=value`.
    /// Unnamed tokens are included only when the command allows unknown arguments.
    pub fn resolved_arguments(&self, dotted: &str) -> Option<Vec<String>> {
        let decl = self.lookup(dotted)?;
        let binding = &self.bindings[decl.id.index()];

        if binding.tokens.is_empty() {
            return None;
        }

        if !decl.is_command() {
            return Some(
                binding
                    .tokens
                    .iter()
                    .map(|&index| self.tokens[index].value.clone())
                    .collect(),
            );
        }

        let allows_unknown_arg = self.declarations.allows_unknown_arg(Some(decl.id));

        Some(
            binding
                .tokens
                .iter()
                .map(|&index| &self.tokens[index])
                .filter_map(|token| match token.kind {
                    TokenKind::Command => Some(token.name.clone()),
                    TokenKind::Argument => Some(token.render()),
                    TokenKind::Unnamed if allows_unknown_arg => Some(token.raw.clone()),
                    _ => None,
                })
                .collect(),
        )
    }

    /// Every error: per declaration in declaration order, followed by the unknown arguments in positional order.
    pub fn errors(&self) -> Vec<&ResolveError> {
        self.bindings
            .iter()
            .flat_map(|binding| binding.errors.iter())
            .chain(self.unknown.iter())
            .collect()
    }

    /// The error of the handler that stopped the parser, when that handler does not exit on error.
    ///
    /// See [`FlagHandler::exit_on_error`](crate::FlagHandler::exit_on_error).
    pub fn handler_error(&self) -> Option<&HandlerError> {
        self.handler_error.as_ref()
    }

    /// The classified input tokens.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// One occurrence per declared command, in declaration order.
    pub fn occurrences(&self) -> &[CommandOccurrence] {
        &self.occurrences
    }

    /// Capture the resolved values into a new `T`.
    pub fn capture<T: Flags + Default>(&self) -> T {
        let mut flags = T::default();
        flags.capture(self, "");
        flags
    }
}
