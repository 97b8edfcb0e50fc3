use crate::api::Field;
use crate::matcher::{DeclKind, FlagDecl};
use crate::model::{DeclId, ValueType};

fn alias(value: &str) -> Option<String> {
    let value = value.trim();

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// A leaf flag declaration, matched on the command line by its short (`-s`) and/or long (`--string`) alias.
///
/// ### Example
/// ```
/// # use flagtree_builder as flagtree;
/// use flagtree::{Parameter, Schema, ValueType};
///
/// let declarations = Schema::new()
///     .add(
///         Parameter::new("string", ValueType::STRING)
///             .short("s")
///             .long("string")
///             .description("A string value")
///             .default("foo"),
///     )
///     .build()
///     .unwrap();
///
/// let resolution = declarations.resolve(&["./app", "-s=bar"]);
/// assert_eq!(resolution.get::<String>("string"), Some("bar".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    short: Option<String>,
    long: Option<String>,
    value_type: ValueType,
    description: Option<String>,
    required: bool,
    nonempty: Option<bool>,
    global: bool,
    env: Option<String>,
    delimiter: Option<String>,
    default: Option<String>,
}

impl Parameter {
    /// Declare a flag of the value type.
    /// The `name` addresses the flag in dotted lookups.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            short: None,
            long: None,
            value_type,
            description: None,
            required: false,
            nonempty: None,
            global: false,
            env: None,
            delimiter: None,
            default: None,
        }
    }

    /// Declare a flag whose value type follows the Rust type `T`.
    ///
    /// ### Example
    /// ```
    /// # use flagtree_builder as flagtree;
    /// use flagtree::{Parameter, ValueType};
    ///
    /// assert_eq!(
    ///     Parameter::of::<Vec<u64>>("items"),
    ///     Parameter::new("items", ValueType::UINT64S),
    /// );
    /// ```
    pub fn of<T: Field>(name: impl Into<String>) -> Self {
        Self::new(name, T::value_type())
    }

    /// The single character alias, typed as `-s`.
    pub fn short(mut self, short: &str) -> Self {
        self.short = alias(short);
        self
    }

    /// The long alias, typed as `--string`.
    pub fn long(mut self, long: &str) -> Self {
        self.long = alias(long);
        self
    }

    /// Document the flag in the usage text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// Require the flag to be typed, unless an environment variable or default supplies it.
    /// A required flag is also nonempty, unless overridden with [`Parameter::nonempty`].
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Whether a typed occurrence must carry a non-empty value (ex: rejects `--string=`).
    pub fn nonempty(mut self, nonempty: bool) -> Self {
        self.nonempty.replace(nonempty);
        self
    }

    /// Match the flag at any command depth.
    /// Only top level flags may be global.
    pub fn global(mut self) -> Self {
        self.global = true;
        self
    }

    /// The environment variable to fall back on when the flag is not typed.
    pub fn env(mut self, env: &str) -> Self {
        self.env = alias(env);
        self
    }

    /// Split each value of a repeatable flag on the delimiter (ex: `--ints=1,2,3`).
    pub fn delimiter(mut self, delimiter: &str) -> Self {
        if delimiter.is_empty() {
            self.delimiter = None;
        } else {
            self.delimiter.replace(delimiter.to_string());
        }

        self
    }

    /// The value to fall back on when the flag is neither typed nor found in the environment.
    pub fn default(mut self, default: &str) -> Self {
        self.default = alias(default);
        self
    }

    pub(crate) fn has_alias(&self, alias: &str) -> bool {
        self.short.as_deref() == Some(alias) || self.long.as_deref() == Some(alias)
    }

    pub(crate) fn into_decl(self, id: DeclId, parent: Option<DeclId>) -> FlagDecl {
        FlagDecl {
            id,
            name: self.name,
            kind: DeclKind::Flag {
                short: self.short,
                long: self.long,
                value_type: self.value_type,
            },
            description: self.description,
            required: self.required,
            nonempty: self.nonempty.unwrap_or(self.required),
            global: self.global,
            env: self.env,
            delimiter: self.delimiter,
            default: self.default,
            parent,
        }
    }
}

/// A command declaration, matched positionally on the command line by its command name.
///
/// Flags and commands nested inside are declared via [`Schema::command`](crate::Schema::command).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    command: String,
    description: Option<String>,
    required: bool,
    nonempty: Option<bool>,
    global: bool,
}

impl Command {
    /// Declare a command.
    /// The `name` addresses the command in dotted lookups, while `command` is what gets typed on the command line.
    /// An empty `command` falls back to the lowercase `name`.
    ///
    /// ### Example
    /// ```
    /// # use flagtree_builder as flagtree;
    /// use flagtree::{Command, Parameter, Schema, ValueType};
    ///
    /// let declarations = Schema::new()
    ///     .command(Command::new("Math", ""), |sub| {
    ///         sub.add(Parameter::new("value", ValueType::FLOAT64).short("v"))
    ///     })
    ///     .build()
    ///     .unwrap();
    ///
    /// let resolution = declarations.resolve(&["./app", "math", "-v=2.5"]);
    /// assert_eq!(resolution.get::<f64>("Math.value"), Some(2.5));
    /// ```
    pub fn new(name: impl Into<String>, command: &str) -> Self {
        let name = name.into();
        let command = match alias(command) {
            Some(command) => command,
            None => name.trim().to_lowercase(),
        };

        Self {
            name,
            command,
            description: None,
            required: false,
            nonempty: None,
            global: false,
        }
    }

    /// Document the command in the usage text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// Require the command to be typed.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Whether a typed command must be followed by at least one argument.
    pub fn nonempty(mut self, nonempty: bool) -> Self {
        self.nonempty.replace(nonempty);
        self
    }

    /// Commands cannot be global; building a schema with a global command fails.
    pub fn global(mut self) -> Self {
        self.global = true;
        self
    }

    pub(crate) fn into_decl(self, id: DeclId, parent: Option<DeclId>) -> FlagDecl {
        FlagDecl {
            id,
            name: self.name,
            kind: DeclKind::Command {
                command: self.command,
            },
            description: self.description,
            required: self.required,
            // Unlike flags, a required command does not imply nonempty.
            nonempty: self.nonempty.unwrap_or(false),
            global: self.global,
            env: None,
            delimiter: None,
            default: None,
            parent,
        }
    }
}

/// The settings marker of a scope (the top level or a command).
///
/// At most one may be declared per scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    allow_unknown_arg: bool,
}

impl Settings {
    /// Create a settings marker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow arguments and unnamed tokens that match no declared flag in this scope.
    /// They are reported by [`Resolution::resolved_arguments`](crate::Resolution::resolved_arguments) of the command instead of as errors.
    pub fn allow_unknown_arg(mut self) -> Self {
        self.allow_unknown_arg = true;
        self
    }

    pub(crate) fn allows_unknown_arg(&self) -> bool {
        self.allow_unknown_arg
    }
}
