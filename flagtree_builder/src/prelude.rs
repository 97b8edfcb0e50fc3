//! Traits which, typically, may be imported without concern: `use flagtree::prelude::*`.

pub use crate::api::{Field, Flags};
