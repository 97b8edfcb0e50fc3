use std::env;

use crate::api::{FlagHandler, HandlerError};
use crate::constant::*;
use crate::matcher::Declarations;
use crate::model::Value;
use crate::parser::base::*;
use crate::parser::interface::{ParseError, UserInterface};
use crate::parser::printer::Printer;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

impl From<&ResolveError> for ParseError {
    fn from(error: &ResolveError) -> Self {
        ParseError(error.to_string())
    }
}

impl From<HandlerError> for ParseError {
    fn from(error: HandlerError) -> Self {
        ParseError(error.to_string())
    }
}

/// The behaviours applied after resolution.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Policy {
    pub(crate) auto_help: bool,
    pub(crate) auto_version: bool,
    pub(crate) any_error: bool,
}

/// The configured command line parser.
/// Built via [`CommandLine::build`](crate::CommandLine::build) or [`CommandLine::build_parser`](crate::CommandLine::build_parser).
pub struct GeneralParser {
    program: String,
    version: Option<String>,
    declarations: Declarations,
    policy: Policy,
    handlers: Vec<FlagHandler>,
    printer: Printer,
    user_interface: Box<dyn UserInterface>,
}

impl std::fmt::Debug for GeneralParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneralParser")
            .field("program", &self.program)
            .field("version", &self.version)
            .field("policy", &self.policy)
            .field("handlers", &self.handlers)
            .finish()
    }
}

impl GeneralParser {
    pub(crate) fn new(
        program: String,
        version: Option<String>,
        declarations: Declarations,
        policy: Policy,
        handlers: Vec<FlagHandler>,
        printer: Printer,
        user_interface: Box<dyn UserInterface>,
    ) -> Self {
        Self {
            program,
            version,
            declarations,
            policy,
            handlers,
            printer,
            user_interface,
        }
    }

    /// The declarations this parser resolves against.
    pub fn declarations(&self) -> &Declarations {
        &self.declarations
    }

    /// Run the command line parser against the input tokens, using the process environment for the fallbacks.
    /// The first token is the program, as in [`env::args`].
    ///
    /// After resolution the configured behaviours apply in order:
    /// 1. With `any_error`, the first resolution error is printed and the parser returns with `Err(1)`.
    /// 2. With `auto_version`, a true `-v`/`--version` prints the version (or `--vv` the extended version) and returns with `Err(0)`.
    /// 3. With `auto_help`, a lone program token or a true `-h`/`--help` prints the usage and returns with `Err(0)`.
    /// 4. Each handler whose flag or command was resolved runs, in descending priority.
    /// The first handler error is printed and the parser returns with `Err(1)`.
    /// A handler that does not [exit on error](crate::FlagHandler::exit_on_error) instead stops the remaining handlers, returning the resolution with its [`Resolution::handler_error`].
    ///
    /// Otherwise, the resolution is returned.
    pub fn parse_tokens(self, tokens: &[&str]) -> Result<Resolution, i32> {
        self.parse_tokens_with(tokens, &ProcessEnvironment)
    }

    /// Run the command line parser against the input tokens, looking up the fallbacks in `environment`.
    /// See [`GeneralParser::parse_tokens`].
    pub fn parse_tokens_with(
        self,
        tokens: &[&str],
        environment: &impl Environment,
    ) -> Result<Resolution, i32> {
        let GeneralParser {
            program,
            version,
            declarations,
            policy,
            handlers,
            printer,
            user_interface,
        } = self;
        let mut resolution = resolve(declarations, tokens, environment);

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Resolved {} tokens with {} errors.",
                tokens.len(),
                resolution.errors().len()
            );
        }

        if policy.any_error {
            if let Some(error) = resolution.errors().first() {
                user_interface.print_error(ParseError::from(*error));
                return Err(1);
            }
        }

        if policy.auto_version {
            let extended = switched(&resolution, &[VERSION_EXTENDED_LONG]);

            if extended || switched(&resolution, &[VERSION_SHORT, VERSION_LONG]) {
                print_version(&program, version.as_deref(), extended, &*user_interface);
                return Err(0);
            }
        }

        if policy.auto_help && (tokens.len() <= 1 || switched(&resolution, &[HELP_SHORT, HELP_LONG]))
        {
            printer.print_help(&*user_interface);
            return Err(0);
        }

        for handler in &handlers {
            if let Some(arguments) = resolution.resolved_arguments(handler.name()) {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Invoking handler '{}' with {arguments:?}.", handler.name());
                }

                if let Err(error) = handler.invoke(&resolution, &arguments) {
                    if handler.exits_on_error() {
                        user_interface.print_error(ParseError::from(error));
                        return Err(1);
                    }

                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Handler '{}' failed without exiting: {error}.", handler.name());
                    }

                    resolution.handler_error.replace(error);
                    break;
                }
            }
        }

        Ok(resolution)
    }

    /// Run the command line parser against the Cli [`env::args`].
    /// See [`GeneralParser::parse_tokens`].
    ///
    /// Where `parse_tokens` returns `Err(code)`, this exits with that code (via [`std::process::exit`]).
    pub fn parse(self) -> Resolution {
        let command_input: Vec<String> = env::args().collect();

        match self.parse_tokens(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            Ok(resolution) => resolution,
            Err(exit_code) => std::process::exit(exit_code),
        }
    }
}

// Whether any top level flag with one of the aliases resolved to true.
fn switched(resolution: &Resolution, aliases: &[&str]) -> bool {
    aliases
        .iter()
        .filter_map(|alias| resolution.lookup_alias(alias, None))
        .any(|decl| resolution.binding_of(decl.id()).value() == Some(&Value::Bool(true)))
}

fn print_version(
    program: &str,
    version: Option<&str>,
    extended: bool,
    user_interface: &(impl UserInterface + ?Sized),
) {
    let version = version.unwrap_or_default();

    if extended {
        user_interface.print(format!("App name    : {program}"));
        user_interface.print(format!("App version : {version}"));
        user_interface.print(format!("Flagtree    : {}", env!("CARGO_PKG_VERSION")));
    } else {
        user_interface.print(version.trim_start_matches('v').to_string());
    }
}
