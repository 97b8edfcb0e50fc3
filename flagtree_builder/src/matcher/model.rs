use std::fmt;

use crate::model::{DeclId, ValueType};

/// What a declaration describes: a leaf flag or a command container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    /// A leaf flag matched by its short and/or long alias.
    Flag {
        /// Single character alias, typed as `-s`.
        short: Option<String>,
        /// Long alias, typed as `--long`.
        long: Option<String>,
        /// The declared value type.
        value_type: ValueType,
    },
    /// A command matched positionally by its name.
    Command {
        /// The text that selects the command on the command line.
        command: String,
    },
}

/// One declared flag or command.
///
/// Built once by [`Schema::build`](crate::Schema::build) and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDecl {
    pub(crate) id: DeclId,
    pub(crate) name: String,
    pub(crate) kind: DeclKind,
    pub(crate) description: Option<String>,
    pub(crate) required: bool,
    pub(crate) nonempty: bool,
    pub(crate) global: bool,
    pub(crate) env: Option<String>,
    pub(crate) delimiter: Option<String>,
    pub(crate) default: Option<String>,
    pub(crate) parent: Option<DeclId>,
}

#[allow(missing_docs)]
impl FlagDecl {
    pub fn id(&self) -> DeclId {
        self.id
    }

    /// The segment used to address this declaration in a dotted lookup (ex: `"bar"` in `"bar.string"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &DeclKind {
        &self.kind
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_nonempty(&self) -> bool {
        self.nonempty
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    pub fn env(&self) -> Option<&str> {
        self.env.as_deref()
    }

    pub fn delimiter(&self) -> Option<&str> {
        self.delimiter.as_deref()
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// The enclosing command, or `None` for a top level declaration.
    pub fn parent(&self) -> Option<DeclId> {
        self.parent
    }

    pub fn is_command(&self) -> bool {
        matches!(self.kind, DeclKind::Command { .. })
    }

    pub fn short(&self) -> Option<&str> {
        match &self.kind {
            DeclKind::Flag { short, .. } => short.as_deref(),
            DeclKind::Command { .. } => None,
        }
    }

    pub fn long(&self) -> Option<&str> {
        match &self.kind {
            DeclKind::Flag { long, .. } => long.as_deref(),
            DeclKind::Command { .. } => None,
        }
    }

    pub fn command(&self) -> Option<&str> {
        match &self.kind {
            DeclKind::Flag { .. } => None,
            DeclKind::Command { command } => Some(command),
        }
    }

    pub fn value_type(&self) -> Option<ValueType> {
        match &self.kind {
            DeclKind::Flag { value_type, .. } => Some(*value_type),
            DeclKind::Command { .. } => None,
        }
    }

    /// The alias as typed on the command line, preferring the short form (ex: `-s`, or `--string` when there is no short alias).
    pub fn formatted_arg(&self) -> String {
        match (self.short(), self.long()) {
            (Some(short), _) => format!("-{short}"),
            (None, Some(long)) => format!("--{long}"),
            (None, None) => self.command().unwrap_or(&self.name).to_string(),
        }
    }

    pub(crate) fn matches_alias(&self, name: &str) -> bool {
        !name.is_empty() && (self.short() == Some(name) || self.long() == Some(name))
    }
}

/// The per-scope marker allowing arguments that match no declared flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SettingsDecl {
    pub(crate) parent: Option<DeclId>,
    pub(crate) allow_unknown_arg: bool,
}

/// The positional match (or absence) of one declared command in the input tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOccurrence {
    pub(crate) decl: DeclId,
    pub(crate) parent: Option<DeclId>,
    pub(crate) index: Option<usize>,
    pub(crate) index_to: Option<usize>,
    pub(crate) trail: Vec<&'static str>,
}

impl CommandOccurrence {
    pub(crate) fn new(decl: DeclId, parent: Option<DeclId>) -> Self {
        Self {
            decl,
            parent,
            index: None,
            index_to: None,
            trail: Vec::default(),
        }
    }

    /// The declared command.
    pub fn decl(&self) -> DeclId {
        self.decl
    }

    /// The enclosing command declaration.
    pub fn parent(&self) -> Option<DeclId> {
        self.parent
    }

    /// The token index of the command name, or `None` when the command was not typed.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The half-open token range `[from, to)` owned by this occurrence, including nested occurrences.
    pub fn range(&self) -> Option<(usize, usize)> {
        match (self.index, self.index_to) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        }
    }

    pub(crate) fn is_matched(&self) -> bool {
        self.index.is_some()
    }

    /// Whether `index` lies strictly inside the range (the command token itself excluded).
    pub(crate) fn owns(&self, index: usize) -> bool {
        match self.range() {
            Some((from, to)) => from < index && index < to,
            None => false,
        }
    }

    /// The rules that set this occurrence's indices, in application order.
    pub fn trail(&self) -> &[&'static str] {
        &self.trail
    }
}

/// The dash style of an argument token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dash {
    /// No leading dash (a bare token).
    #[default]
    None,
    /// `-name`
    Single,
    /// `--name`
    Double,
}

impl fmt::Display for Dash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dash = match self {
            Dash::None => "",
            Dash::Single => "-",
            Dash::Double => "--",
        };
        write!(f, "{dash}")
    }
}

/// The classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// The first token: the program itself.
    Program,
    /// The name of a matched command occurrence.
    Command,
    /// A dash prefixed argument, possibly carrying an `=value`.
    Argument,
    /// The token following a valueless argument, supplying its value.
    ArgumentValue,
    /// A bare positional token.
    Unnamed,
}

/// One input token after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub(crate) index: usize,
    pub(crate) raw: String,
    pub(crate) name: String,
    pub(crate) value: String,
    pub(crate) dash: Dash,
    pub(crate) has_eq: bool,
    pub(crate) unset: bool,
    pub(crate) kind: TokenKind,
    pub(crate) command: Option<DeclId>,
    pub(crate) pair: Option<usize>,
    pub(crate) index_to: usize,
    pub(crate) flag: Option<DeclId>,
    pub(crate) trail: Vec<&'static str>,
}

#[allow(missing_docs)]
impl Token {
    pub(crate) fn new(index: usize, raw: &str) -> Self {
        Self {
            index,
            raw: raw.to_string(),
            name: String::default(),
            value: String::default(),
            dash: Dash::None,
            has_eq: false,
            unset: false,
            kind: TokenKind::Unnamed,
            command: None,
            pair: None,
            index_to: index + 1,
            flag: None,
            trail: Vec::default(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The dash stripped, quote trimmed name (ex: `string` for `--string=foo`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The effective value: from `=value`, from the consumed following token, or rewritten to `true` for a bool flag.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn dash(&self) -> Dash {
        self.dash
    }

    /// Whether the value was explicitly emptied (ex: `--flag=`, `--flag=""`).
    pub fn is_unset(&self) -> bool {
        self.unset
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The innermost command occurrence owning this token, or `None` for the top level.
    pub fn command(&self) -> Option<DeclId> {
        self.command
    }

    /// For an argument, the token supplying its value; for an argument value, the argument it supplies.
    pub fn pair(&self) -> Option<usize> {
        self.pair
    }

    /// The flag this argument was bound to.
    pub fn flag(&self) -> Option<DeclId> {
        self.flag
    }

    /// The rules that classified and bound this token, in application order.
    pub fn trail(&self) -> &[&'static str] {
        &self.trail
    }

    /// The argument as typed with its effective value folded in (ex: `-s=bar`, `-b=true`).
    pub(crate) fn render(&self) -> String {
        match self.kind {
            TokenKind::Argument => {
                let mut out = format!("{}{}", self.dash, self.name);

                if !self.value.is_empty() {
                    out.push('=');
                    out.push_str(&self.value);
                }

                out
            }
            _ => self.raw.clone(),
        }
    }

    /// The argument without its value, as used in error messages (ex: `-s`).
    pub(crate) fn formatted_arg(&self) -> String {
        match self.kind {
            TokenKind::Argument => format!("{}{}", self.dash, self.name),
            _ => self.raw.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn flag(short: Option<&str>, long: Option<&str>) -> FlagDecl {
        FlagDecl {
            id: DeclId(0),
            name: "flag".to_string(),
            kind: DeclKind::Flag {
                short: short.map(str::to_string),
                long: long.map(str::to_string),
                value_type: ValueType::BOOL,
            },
            description: None,
            required: false,
            nonempty: false,
            global: false,
            env: None,
            delimiter: None,
            default: None,
            parent: None,
        }
    }

    #[rstest]
    #[case(Some("s"), Some("string"), "-s")]
    #[case(None, Some("string"), "--string")]
    #[case(Some("s"), None, "-s")]
    fn formatted_arg(
        #[case] short: Option<&str>,
        #[case] long: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(flag(short, long).formatted_arg(), expected);
    }

    #[test]
    fn matches_alias() {
        let decl = flag(Some("s"), Some("string"));
        assert!(decl.matches_alias("s"));
        assert!(decl.matches_alias("string"));
        assert!(!decl.matches_alias("strings"));
        assert!(!flag(None, None).matches_alias(""));
    }

    #[test]
    fn occurrence_owns() {
        let mut occurrence = CommandOccurrence::new(DeclId(0), None);
        assert!(!occurrence.owns(1));
        occurrence.index = Some(2);
        occurrence.index_to = Some(5);
        assert!(!occurrence.owns(2));
        assert!(occurrence.owns(3));
        assert!(occurrence.owns(4));
        assert!(!occurrence.owns(5));
    }

    #[rstest]
    #[case(Dash::Single, "b", "true", "-b=true")]
    #[case(Dash::Double, "string", "", "--string")]
    #[case(Dash::Double, "string", "foo bar", "--string=foo bar")]
    fn render_argument(
        #[case] dash: Dash,
        #[case] name: &str,
        #[case] value: &str,
        #[case] expected: &str,
    ) {
        let mut token = Token::new(1, "ignored");
        token.kind = TokenKind::Argument;
        token.dash = dash;
        token.name = name.to_string();
        token.value = value.to_string();
        assert_eq!(token.render(), expected);
    }
}
