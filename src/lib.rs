//! `flagtree` is a declarative, tree shaped command line flag parser for Rust.
//!
//! Flags and commands are declared up front as a tree, and a single resolution pass turns the raw tokens into:
//! * A classification of every token (program, command, argument, argument value, or unnamed).
//! * A typed value per declared flag, along with where it came from (argument, environment variable, default, or unset).
//! * Every mistake in the input, collected rather than stopping at the first.
//!
//! `flagtree` prioritizes the following design concerns:
//! * *Scoped arguments*:
//! An argument only ever binds to a flag of the command it was typed under, unless the flag is global.
//! * *Explainable resolution*:
//! Every token and command occurrence carries a short trail of the rules that classified it.
//! * *Complete error reporting*:
//! Resolution never short-circuits; the program decides what to do with the errors.
//!
//! # Usage
//! This page includes a few demos on using `flagtree`.
//!
//! via [derive Api](./derive/index.html):
//! ```no_run
#![doc = include_str!("../demos/derived.rs")]
//! ```
//! or via builder Api (this page):
//! ```no_run
#![doc = include_str!("../demos/basic.rs")]
//! ```
//!
//! The builder demo generates the following Cli program:
//! ```console
//! $ basic -h
//! Usage: basic [options...] COMMAND [options...]
//!
//! Prints and calculates things.
//!
//! Options:
//!   -h, --help        Display usage
//!   -v, --version     Display version
//!       --vv          Display version (extended)
//!       --verbose     Show how each token was resolved
//!
//! Commands:
//!   echo              Print the words
//!     -u, --upper     Print in uppercase
//!     -w, --words     The words to print
//!   math              Math functions
//!     sqrt            Calculate the square root
//!       -n, --number  The input value (default 0 - override $NUMBER)
//!
//! $ basic echo --words=hello,world -u
//! HELLO WORLD
//!
//! $ basic math sqrt -n 16
//! 4
//!
//! $ basic echo
//! argument -w is required for echo command
//! ```
//!
//! # Builder Api
//! Configure `flagtree` by starting with a [`CommandLine`] and `add`ing [`Parameter`]s and [`Command`]s.
//! Each command takes a setup function, which declares the flags and commands nested inside it via a [`Schema`].
//!
//! A [`Parameter`] declares a flag with a [`ValueType`]: one of `bool`, `int`, `int64`, `uint`, `uint64`, `float64` or `string`, either as a single value or repeatable (ex: [`ValueType::INTS`]).
//! Flags are typed as `-s`/`--long`, with the value following an `=` or in the next token.
//! * `required()`: the flag must be typed, unless its environment variable or default supplies it.
//! * `nonempty(bool)`: a typed flag must carry a non-empty value (on by default for required flags).
//! * `global()`: a top level flag that also matches inside any command.
//! * `env(..)` and `default(..)`: the fallbacks when the flag is not typed, in that order.
//! * `delimiter(..)`: split each value of a repeatable flag (ex: `--ints=1,2,3`).
//!
//! A [`Command`] is typed positionally by its command name, and owns the tokens up to the next command that is not nested inside it.
//! Commands may be `required()` or `nonempty(true)` (at least one argument must follow).
//! A [`Settings`] marker with `allow_unknown_arg()` lets a scope accept arguments that match no flag.
//!
//! The values are read from the [`Resolution`] by dotted path of names (ex: `"math.sqrt.number"`), as the Rust type of the flag:
//! ```
//! use flagtree::{Command, Parameter, ResolvedBy, Schema, ValueType};
//!
//! let declarations = Schema::new()
//!     .add(Parameter::new("items", ValueType::UINT64S).long("items").delimiter(","))
//!     .command(Command::new("bar", ""), |sub| {
//!         sub.add(Parameter::new("string", ValueType::STRING).short("s").default("foo"))
//!     })
//!     .build()
//!     .unwrap();
//! let resolution = declarations.resolve(&["./app", "--items=1,2", "bar", "--items", "3"]);
//!
//! assert_eq!(resolution.get::<Vec<u64>>("items"), Some(vec![1, 2]));
//! assert_eq!(resolution.get::<String>("bar.string"), Some("foo".to_string()));
//! assert_eq!(resolution.resolved_by("bar.string"), Some(ResolvedBy::Default));
//! assert_eq!(resolution.errors().len(), 1);
//! assert_eq!(resolution.errors()[0].to_string(), "unknown argument --items");
//! ```
//!
//! # Cli Semantics
//! * The first token is the program; it is never a command or an argument.
//! * `--name=value` and `-n=value` carry their value inline.
//! `--name value` takes the following token as its value, unless that token is a command or starts with a dash.
//! A bool flag typed without a value (`-b`) is `true`, while `-b=` is explicitly unset.
//! * One layer of matching `"` or `'` quotes is trimmed from a value.
//! * For a single valued flag the last typed value wins; a repeatable flag collects every value in order.
//! * A command may share its name with an ancestor; the nested one only matches once its parent was typed.
//!
//! # Facade
//! [`CommandLine::auto`] enables the conventional behaviours after resolution:
//! stop on the first error, print the version for `-v`/`--version`/`--vv`, and print the usage for `-h`/`--help` or a lone program token.
//! [`FlagHandler`]s then run, in descending priority, for every flag or command that was typed.
//! A failing handler prints its error and exits with code 1, unless it was built with [`FlagHandler::exit_on_error`]`(false)`,
//! in which case its error is returned through [`Resolution::handler_error`].
//!
//! # Features
//! * `tracing_debug`: Emit `tracing` debug events for every resolution decision.
pub mod derive;
pub use flagtree_builder::*;
