//! Derive Api for `flagtree` configuration.
//!
//! ### Getting Started
//! Use the derive Api by instrumenting a struct `S` with `#[derive(Default, Flags)]`.
//! This implements [`Flags`](../trait.Flags.html) for `S`, which both declares the flags of `S` (via [`CommandLine::flags`](../struct.CommandLine.html#method.flags))
//! and captures their resolved values back into `S` (via [`Resolution::capture`](../struct.Resolution.html#method.capture)).
//!
//! ```no_run
#![doc = include_str!("../demos/derived.rs")]
//! ```
//!
//! ### Field Configuration
//! Each named field is declared in field order, and addressed in dotted lookups by its field name.
//! * A plain field, or one instrumented with `#[flag(..)]`, is a flag.
//! Its value type follows the field type, which must be one of `bool`, `isize`, `i64`, `usize`, `u64`, `f64`, `String`, or a `Vec` of these.
//! Without a `short` or `long` alias, the field name is used as the long alias.
//! * `#[command(..)]` declares a command; the field type must itself derive `Flags`, and declares the nested flags and commands.
//! * `#[settings(allow_unknown_arg)]` declares the settings of the enclosing scope; the field type is [`Settings`](../struct.Settings.html).
//!
//! ```console
//! Attribute   | Keys
//! ----------------------------------------------------------------------------------------------------
//! #[flag]     | short = "..", long = "..", description = "..", env = "..", delimiter = "..",
//!             | default = "..", nonempty = bool, required, global
//! #[command]  | name = "..", description = "..", nonempty = bool, required
//! #[settings] | allow_unknown_arg
//! ```
//!
//! A partial example of these rules is provided as follows:
//! ```ignore
//! #[derive(Default, Flags)]
//! struct Parameters {
//!     items: Vec<u64>,
//!     // the above generates:
//!     //  .add(Parameter::of::<Vec<u64>>("items").long("items"))
//!
//!     #[flag(short = "s", env = "STRING", required)]
//!     string: String,
//!     // the above generates:
//!     //  .add(Parameter::of::<String>("string").short("s").env("STRING").required())
//!
//!     #[command(name = "run")]
//!     runner: Runner,
//!     // the above generates:
//!     //  .command(Command::new("runner", "run"), <Runner as Flags>::declare)
//! }
//! ```
pub use flagtree_derive::*;
