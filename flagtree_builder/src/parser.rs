mod base;
mod interface;
mod middleware;
mod printer;

pub use base::{Binding, Environment, ProcessEnvironment, Resolution, ResolveError};
pub(crate) use interface::{ConsoleInterface, UserInterface};
pub use middleware::GeneralParser;
pub(crate) use middleware::Policy;
pub(crate) use printer::Printer;

#[cfg(test)]
pub(crate) use interface::util;
