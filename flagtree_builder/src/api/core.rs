use thiserror::Error;

use crate::api::{Command, Flags, Parameter, Settings};
use crate::constant::*;
use crate::matcher::{DeclarationError, Declarations, FlagDecl, SettingsDecl};
use crate::model::{DeclId, ValueType};
use crate::parser::{ConsoleInterface, GeneralParser, Policy, Printer, Resolution, UserInterface};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Flag(Parameter),
    Command(Command, Schema),
    Settings(Settings),
}

/// The tree of flag, command and settings declarations.
///
/// ### Example
/// ```
/// # use flagtree_builder as flagtree;
/// use flagtree::{Command, Parameter, Schema, Settings, ValueType};
///
/// let declarations = Schema::new()
///     .add(Parameter::new("verbose", ValueType::BOOL).short("v").global())
///     .command(Command::new("bar", "bar"), |sub| {
///         sub.add(Parameter::new("string", ValueType::STRING).short("s"))
///             .settings(Settings::new().allow_unknown_arg())
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(declarations.len(), 3);
/// assert!(declarations.lookup("bar.string").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    entries: Vec<Entry>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a flag in this scope.
    pub fn add(mut self, parameter: Parameter) -> Self {
        self.entries.push(Entry::Flag(parameter));
        self
    }

    /// Declare a command in this scope, along with its nested declarations.
    pub fn command(mut self, command: Command, setup: impl FnOnce(Schema) -> Schema) -> Self {
        self.entries
            .push(Entry::Command(command, setup(Schema::default())));
        self
    }

    /// Declare the settings marker for this scope.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.entries.push(Entry::Settings(settings));
        self
    }

    /// Declare the fields of `T` in this scope.
    pub fn flags<T: Flags>(self) -> Self {
        T::declare(self)
    }

    /// Finalize the declarations.
    /// Ids are assigned in pre-order, and every declaration check is performed (the first failure is returned).
    pub fn build(self) -> Result<Declarations, DeclarationError> {
        let mut decls = Vec::default();
        let mut settings = Vec::default();
        self.flatten(None, &mut decls, &mut settings);
        Declarations::new(decls, settings)
    }

    fn flatten(
        self,
        parent: Option<DeclId>,
        decls: &mut Vec<FlagDecl>,
        settings: &mut Vec<SettingsDecl>,
    ) {
        for entry in self.entries {
            match entry {
                Entry::Flag(parameter) => {
                    let id = DeclId(decls.len());
                    decls.push(parameter.into_decl(id, parent));
                }
                Entry::Command(command, sub) => {
                    let id = DeclId(decls.len());
                    decls.push(command.into_decl(id, parent));
                    sub.flatten(Some(id), decls, settings);
                }
                Entry::Settings(marker) => {
                    settings.push(SettingsDecl {
                        parent,
                        allow_unknown_arg: marker.allows_unknown_arg(),
                    });
                }
            }
        }
    }

    fn has_alias(&self, alias: &str) -> bool {
        self.entries.iter().any(|entry| match entry {
            Entry::Flag(parameter) => parameter.has_alias(alias),
            _ => false,
        })
    }

    fn prepend(mut self, parameter: Parameter) -> Self {
        self.entries.insert(0, Entry::Flag(parameter));
        self
    }
}

/// An error raised by a [`FlagHandler`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    /// Create a handler error with the message.
    pub fn new(message: impl Into<String>) -> Self {
        HandlerError(message.into())
    }
}

type Handler = Box<dyn Fn(&Resolution, &[String]) -> Result<(), HandlerError>>;

/// A callback invoked with the resolved arguments of a flag or command, whenever it was typed.
///
/// ### Example
/// ```
/// # use flagtree_builder as flagtree;
/// use flagtree::{FlagHandler, HandlerError};
///
/// let handler = FlagHandler::new("bar", |_resolution, arguments| {
///     if arguments.len() > 3 {
///         Err(HandlerError::new("too many arguments for bar"))
///     } else {
///         Ok(())
///     }
/// })
/// .priority(10);
/// ```
pub struct FlagHandler {
    name: String,
    priority: i32,
    exit_on_error: bool,
    handler: Handler,
}

impl std::fmt::Debug for FlagHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagHandler")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("exit_on_error", &self.exit_on_error)
            .finish()
    }
}

impl FlagHandler {
    /// Handle the flag or command at the dotted `name`.
    pub fn new(
        name: impl Into<String>,
        handler: impl Fn(&Resolution, &[String]) -> Result<(), HandlerError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            priority: 0,
            exit_on_error: true,
            handler: Box::new(handler),
        }
    }

    /// Handlers run in descending priority order.
    /// Handlers of equal priority run in the order they were added.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Whether a handler error is printed and ends the parser with `Err(1)` (the default).
    ///
    /// Otherwise the parser stops running handlers and hands the error back through [`Resolution::handler_error`].
    pub fn exit_on_error(mut self, exit_on_error: bool) -> Self {
        self.exit_on_error = exit_on_error;
        self
    }

    pub(crate) fn exits_on_error(&self) -> bool {
        self.exit_on_error
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn invoke(
        &self,
        resolution: &Resolution,
        arguments: &[String],
    ) -> Result<(), HandlerError> {
        (self.handler)(resolution, arguments)
    }
}

/// The command line facade.
///
/// ### Example
/// ```
/// # use flagtree_builder as flagtree;
/// use flagtree::{CommandLine, Parameter, ValueType};
///
/// let parser = CommandLine::new("program")
///     .add(Parameter::new("string", ValueType::STRING).short("s"))
///     .build();
///
/// let resolution = parser.parse_tokens(&["program", "-s=foo"]).unwrap();
/// assert_eq!(resolution.get::<String>("string"), Some("foo".to_string()));
/// ```
#[derive(Debug)]
pub struct CommandLine {
    program: String,
    version: Option<String>,
    about: Option<String>,
    policy: Policy,
    schema: Schema,
    handlers: Vec<FlagHandler>,
}

impl CommandLine {
    /// Create a command line for the program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            version: None,
            about: None,
            policy: Policy::default(),
            schema: Schema::default(),
            handlers: Vec::default(),
        }
    }

    /// The program version, printed by the auto version flags.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version.replace(version.into());
        self
    }

    /// Document the program in the usage text.
    /// If repeated, only the final about message will apply.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// Print the usage text when only the program is typed, or when `-h`/`--help` is true.
    ///
    /// The help flag is declared automatically unless the top level already declares `-h` or `--help`.
    pub fn auto_help(mut self) -> Self {
        self.policy.auto_help = true;
        self
    }

    /// Print the version when `-v`/`--version` is true, or the extended version when `--vv` is true.
    ///
    /// The version flags are declared automatically unless the top level already declares one of them.
    pub fn auto_version(mut self) -> Self {
        self.policy.auto_version = true;
        self
    }

    /// Stop at the first resolution error, printing it.
    pub fn any_error(mut self) -> Self {
        self.policy.any_error = true;
        self
    }

    /// Enable [`CommandLine::auto_help`], [`CommandLine::auto_version`] and [`CommandLine::any_error`].
    pub fn auto(self) -> Self {
        self.auto_help().auto_version().any_error()
    }

    /// Declare a top level flag.
    pub fn add(mut self, parameter: Parameter) -> Self {
        self.schema = self.schema.add(parameter);
        self
    }

    /// Declare a top level command, along with its nested declarations.
    pub fn command(mut self, command: Command, setup: impl FnOnce(Schema) -> Schema) -> Self {
        self.schema = self.schema.command(command, setup);
        self
    }

    /// Declare the top level settings marker.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.schema = self.schema.settings(settings);
        self
    }

    /// Declare the fields of `T` at the top level.
    pub fn flags<T: Flags>(mut self) -> Self {
        self.schema = self.schema.flags::<T>();
        self
    }

    /// Register a flag handler.
    pub fn handle(mut self, handler: FlagHandler) -> Self {
        self.handlers.push(handler);
        self
    }

    pub(crate) fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<GeneralParser, DeclarationError> {
        let CommandLine {
            program,
            version,
            about,
            policy,
            mut schema,
            mut handlers,
        } = self;

        if policy.auto_version
            && ![VERSION_SHORT, VERSION_LONG, VERSION_EXTENDED_LONG]
                .iter()
                .any(|alias| schema.has_alias(alias))
        {
            schema = schema
                .prepend(
                    Parameter::new(VERSION_EXTENDED_NAME, ValueType::BOOL)
                        .long(VERSION_EXTENDED_LONG)
                        .description(VERSION_EXTENDED_MESSAGE),
                )
                .prepend(
                    Parameter::new(VERSION_NAME, ValueType::BOOL)
                        .short(VERSION_SHORT)
                        .long(VERSION_LONG)
                        .description(VERSION_MESSAGE),
                );
        }

        if policy.auto_help
            && ![HELP_SHORT, HELP_LONG]
                .iter()
                .any(|alias| schema.has_alias(alias))
        {
            schema = schema.prepend(
                Parameter::new(HELP_NAME, ValueType::BOOL)
                    .short(HELP_SHORT)
                    .long(HELP_LONG)
                    .description(HELP_MESSAGE),
            );
        }

        let declarations = schema.build()?;
        // Stable, so equal priorities keep their registration order.
        handlers.sort_by(|a, b| b.priority.cmp(&a.priority));
        let printer = Printer::terminal(program.clone(), about, &declarations);

        Ok(GeneralParser::new(
            program,
            version,
            declarations,
            policy,
            handlers,
            printer,
            user_interface,
        ))
    }

    /// Build the command line parser as a Result.
    /// This finalizes the configuration and checks for declaration errors (ex: a repeated alias).
    pub fn build_parser(self) -> Result<GeneralParser, DeclarationError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the command line parser.
    /// This finalizes the configuration and checks for declaration errors (ex: a repeated alias).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> GeneralParser {
        match self.build_parser() {
            Ok(gp) => gp,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::util::InMemoryInterface;
    use crate::test::assert_contains;

    #[test]
    fn schema_empty() {
        // Execute
        let declarations = Schema::new().build().unwrap();

        // Verify
        assert!(declarations.is_empty());
    }

    #[test]
    fn schema_pre_order() {
        // Execute
        let declarations = Schema::new()
            .add(Parameter::new("string", ValueType::STRING).short("s"))
            .command(Command::new("bar", "bar"), |sub| {
                sub.add(Parameter::new("string", ValueType::STRING).short("s"))
                    .command(Command::new("qux", "qux"), |sub| {
                        sub.add(Parameter::new("int", ValueType::INT).long("int"))
                    })
                    .add(Parameter::new("bool", ValueType::BOOL).short("b"))
            })
            .add(Parameter::new("last", ValueType::BOOL).long("last"))
            .build()
            .unwrap();

        // Verify
        let paths: Vec<(usize, String)> = declarations
            .iter()
            .map(|decl| (decl.id().index(), declarations.path(decl.id())))
            .collect();
        assert_eq!(
            paths,
            vec![
                (0, "string".to_string()),
                (1, "bar".to_string()),
                (2, "bar.string".to_string()),
                (3, "bar.qux".to_string()),
                (4, "bar.qux.int".to_string()),
                (5, "bar.bool".to_string()),
                (6, "last".to_string()),
            ]
        );
        assert_eq!(declarations.get(DeclId(4)).parent(), Some(DeclId(3)));
        assert_eq!(declarations.get(DeclId(5)).parent(), Some(DeclId(1)));
    }

    #[test]
    fn schema_settings_scopes() {
        // Execute
        let declarations = Schema::new()
            .settings(Settings::new())
            .command(Command::new("bar", "bar"), |sub| {
                sub.settings(Settings::new().allow_unknown_arg())
            })
            .build()
            .unwrap();

        // Verify
        assert!(!declarations.allows_unknown_arg(None));
        assert!(declarations.allows_unknown_arg(Some(DeclId(0))));
    }

    #[test]
    fn schema_duplicate_settings() {
        // Execute
        let error = Schema::new()
            .settings(Settings::new())
            .settings(Settings::new().allow_unknown_arg())
            .build()
            .unwrap_err();

        // Verify
        assert_matches!(error, DeclarationError::DuplicateSettings { .. });
    }

    #[test]
    fn schema_global_command() {
        // Execute
        let error = Schema::new()
            .command(Command::new("bar", "").global(), |sub| sub)
            .build()
            .unwrap_err();

        // Verify
        assert_eq!(error.to_string(), "command bar can't be global");
    }

    #[test]
    fn auto_flags_declared() {
        // Execute
        let parser = CommandLine::new("program")
            .auto()
            .build_with_interface(Box::new(InMemoryInterface::default()))
            .unwrap();

        // Verify
        let aliases: Vec<String> = parser
            .declarations()
            .iter()
            .map(|decl| decl.formatted_arg())
            .collect();
        assert_eq!(aliases, vec!["-h", "-v", "--vv"]);
    }

    #[test]
    fn auto_flags_defer_to_declared() {
        // Execute
        let parser = CommandLine::new("program")
            .auto()
            .add(Parameter::new("host", ValueType::STRING).short("h"))
            .add(Parameter::new("verbose", ValueType::BOOL).long("version"))
            .build_with_interface(Box::new(InMemoryInterface::default()))
            .unwrap();

        // Verify
        let names: Vec<&str> = parser
            .declarations()
            .iter()
            .map(|decl| decl.name())
            .collect();
        assert_eq!(names, vec!["host", "verbose"]);
    }

    #[test]
    fn build_parser_error() {
        // Execute
        let error = CommandLine::new("program")
            .add(Parameter::new("a", ValueType::BOOL).short("x"))
            .add(Parameter::new("b", ValueType::BOOL).short("x"))
            .build_parser()
            .unwrap_err();

        // Verify
        assert_contains!(error.to_string(), "already defined in a field");
    }

    #[test]
    fn handler_error_display() {
        assert_eq!(HandlerError::new("boom").to_string(), "boom");
    }
}
