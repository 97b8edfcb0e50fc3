use crate::api::Schema;
use crate::parser::Resolution;

/// Behaviour for a type whose fields are declared as flags and commands.
///
/// Typically implemented with `#[derive(Flags)]`.
pub trait Flags {
    /// Add the declarations for this type's fields to the schema.
    fn declare(schema: Schema) -> Schema;

    /// Copy the resolved values into this type's fields.
    ///
    /// `path` is the dotted path of the command holding these fields, or `""` at the top level.
    fn capture(&mut self, resolution: &Resolution, path: &str);
}

/// Join a dotted `path` with a field `name`.
#[doc(hidden)]
pub fn dotted(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}
