use std::fmt;
use std::str::FromStr;

/// Identity of a declaration.
///
/// Ids are assigned in declaration order by a pre-order walk of the schema, so a parent command always has a lower id than its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub(crate) usize);

impl DeclId {
    /// The position of the declaration in [`Declarations::iter`](crate::Declarations::iter).
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The scalar family of a flag value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// `true` or `false`.
    Bool,
    /// A platform width signed integer (`isize`).
    Int,
    /// `i64`.
    Int64,
    /// A platform width unsigned integer (`usize`).
    Uint,
    /// `u64`.
    Uint64,
    /// `f64`.
    Float64,
    /// Any text.
    String,
}

impl ScalarType {
    /// The name used in coercion error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int => "int",
            ScalarType::Int64 => "int64",
            ScalarType::Uint => "uint",
            ScalarType::Uint64 => "uint64",
            ScalarType::Float64 => "float64",
            ScalarType::String => "string",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// The declared value type of a flag: a scalar family, either as a single value or as a repeatable (ordered list) value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueType {
    scalar: ScalarType,
    repeatable: bool,
}

#[allow(missing_docs)]
impl ValueType {
    pub const BOOL: ValueType = ValueType::scalar(ScalarType::Bool);
    pub const INT: ValueType = ValueType::scalar(ScalarType::Int);
    pub const INT64: ValueType = ValueType::scalar(ScalarType::Int64);
    pub const UINT: ValueType = ValueType::scalar(ScalarType::Uint);
    pub const UINT64: ValueType = ValueType::scalar(ScalarType::Uint64);
    pub const FLOAT64: ValueType = ValueType::scalar(ScalarType::Float64);
    pub const STRING: ValueType = ValueType::scalar(ScalarType::String);
    pub const BOOLS: ValueType = ValueType::list(ScalarType::Bool);
    pub const INTS: ValueType = ValueType::list(ScalarType::Int);
    pub const INT64S: ValueType = ValueType::list(ScalarType::Int64);
    pub const UINTS: ValueType = ValueType::list(ScalarType::Uint);
    pub const UINT64S: ValueType = ValueType::list(ScalarType::Uint64);
    pub const FLOAT64S: ValueType = ValueType::list(ScalarType::Float64);
    pub const STRINGS: ValueType = ValueType::list(ScalarType::String);

    /// A single value of the scalar family.
    pub const fn scalar(scalar: ScalarType) -> Self {
        Self {
            scalar,
            repeatable: false,
        }
    }

    /// An ordered list of values of the scalar family.
    pub const fn list(scalar: ScalarType) -> Self {
        Self {
            scalar,
            repeatable: true,
        }
    }

    pub fn scalar_type(&self) -> ScalarType {
        self.scalar
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    pub(crate) fn is_bool(&self) -> bool {
        self.scalar == ScalarType::Bool
    }

    pub(crate) fn is_string(&self) -> bool {
        self.scalar == ScalarType::String
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repeatable {
            write!(f, "[]{}", self.scalar)
        } else {
            write!(f, "{}", self.scalar)
        }
    }
}

/// Where the final value of a flag came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResolvedBy {
    /// At least one argument token was bound to the flag.
    Argument,
    /// The declared environment variable was present.
    Environment,
    /// The declared default was applied.
    Default,
    /// Nothing supplied a value; the flag holds its zero value.
    #[default]
    Unset,
}

impl fmt::Display for ResolvedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolvedBy::Argument => "argument",
            ResolvedBy::Environment => "environment",
            ResolvedBy::Default => "default",
            ResolvedBy::Unset => "unset",
        };
        write!(f, "{name}")
    }
}

/// A typed flag value.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Value {
    Bool(bool),
    Int(isize),
    Int64(i64),
    Uint(usize),
    Uint64(u64),
    Float64(f64),
    String(String),
    Bools(Vec<bool>),
    Ints(Vec<isize>),
    Int64s(Vec<i64>),
    Uints(Vec<usize>),
    Uint64s(Vec<u64>),
    Float64s(Vec<f64>),
    Strings(Vec<String>),
}

/// The coercion of a raw string into a scalar family failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InvalidScalar {
    pub(crate) token: String,
    pub(crate) scalar: ScalarType,
}

impl Value {
    /// The zero value of the value type: `false`, `0`, `0.0`, `""` or an empty list.
    pub fn zero(value_type: ValueType) -> Self {
        match (value_type.scalar_type(), value_type.is_repeatable()) {
            (ScalarType::Bool, false) => Value::Bool(false),
            (ScalarType::Int, false) => Value::Int(0),
            (ScalarType::Int64, false) => Value::Int64(0),
            (ScalarType::Uint, false) => Value::Uint(0),
            (ScalarType::Uint64, false) => Value::Uint64(0),
            (ScalarType::Float64, false) => Value::Float64(0.0),
            (ScalarType::String, false) => Value::String(String::default()),
            (ScalarType::Bool, true) => Value::Bools(Vec::default()),
            (ScalarType::Int, true) => Value::Ints(Vec::default()),
            (ScalarType::Int64, true) => Value::Int64s(Vec::default()),
            (ScalarType::Uint, true) => Value::Uints(Vec::default()),
            (ScalarType::Uint64, true) => Value::Uint64s(Vec::default()),
            (ScalarType::Float64, true) => Value::Float64s(Vec::default()),
            (ScalarType::String, true) => Value::Strings(Vec::default()),
        }
    }

    /// The number of values held: 1 for a scalar, the list length for a repeatable value.
    pub fn len(&self) -> usize {
        match self {
            Value::Bools(items) => items.len(),
            Value::Ints(items) => items.len(),
            Value::Int64s(items) => items.len(),
            Value::Uints(items) => items.len(),
            Value::Uint64s(items) => items.len(),
            Value::Float64s(items) => items.len(),
            Value::Strings(items) => items.len(),
            _ => 1,
        }
    }

    /// Whether this is an empty list.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coerce `token` and store it: scalar values are overwritten, list values are appended to.
    ///
    /// An empty token is a no-op for the numeric families.
    pub(crate) fn assign(&mut self, token: &str) -> Result<(), InvalidScalar> {
        match self {
            Value::Bool(value) => *value = parse_bool(token)?,
            Value::Bools(items) => items.push(parse_bool(token)?),
            Value::String(value) => *value = token.to_string(),
            Value::Strings(items) => items.push(token.to_string()),
            _ if token.is_empty() => {}
            Value::Int(value) => *value = parse_number(token, ScalarType::Int)?,
            Value::Int64(value) => *value = parse_number(token, ScalarType::Int64)?,
            Value::Uint(value) => *value = parse_number(token, ScalarType::Uint)?,
            Value::Uint64(value) => *value = parse_number(token, ScalarType::Uint64)?,
            Value::Float64(value) => *value = parse_number(token, ScalarType::Float64)?,
            Value::Ints(items) => items.push(parse_number(token, ScalarType::Int)?),
            Value::Int64s(items) => items.push(parse_number(token, ScalarType::Int64)?),
            Value::Uints(items) => items.push(parse_number(token, ScalarType::Uint)?),
            Value::Uint64s(items) => items.push(parse_number(token, ScalarType::Uint64)?),
            Value::Float64s(items) => items.push(parse_number(token, ScalarType::Float64)?),
        };

        Ok(())
    }
}

fn parse_bool(token: &str) -> Result<bool, InvalidScalar> {
    match token {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(InvalidScalar {
            token: token.to_string(),
            scalar: ScalarType::Bool,
        }),
    }
}

fn parse_number<T: FromStr>(token: &str, scalar: ScalarType) -> Result<T, InvalidScalar> {
    T::from_str(token).map_err(|_| InvalidScalar {
        token: token.to_string(),
        scalar,
    })
}
