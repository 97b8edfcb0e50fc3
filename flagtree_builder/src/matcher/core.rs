use crate::matcher::bind::bind;
use crate::matcher::classify::classify;
use crate::matcher::command::resolve_commands;
use crate::matcher::declaration::Declarations;
use crate::matcher::model::{CommandOccurrence, Token};

/// The structural result of matching tokens against the declarations, before any value is coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Matches {
    pub(crate) occurrences: Vec<CommandOccurrence>,
    pub(crate) tokens: Vec<Token>,
    /// Per declaration (indexed by id), the bound token indices.
    pub(crate) bound: Vec<Vec<usize>>,
}

#[derive(Debug)]
pub(crate) struct TokenMatcher<'d> {
    declarations: &'d Declarations,
}

impl<'d> TokenMatcher<'d> {
    pub(crate) fn new(declarations: &'d Declarations) -> Self {
        Self { declarations }
    }

    pub(crate) fn matches(&self, tokens: &[&str]) -> Matches {
        // 1. Find the command boundaries.
        let occurrences = resolve_commands(self.declarations, tokens);
        // 2. Classify each token against those boundaries.
        let mut tokens = classify(tokens, &occurrences);
        // 3. Bind the argument tokens to their flags.
        let bound = bind(self.declarations, &mut tokens);

        Matches {
            occurrences,
            tokens,
            bound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::model::TokenKind;

    #[test]
    fn matches_empty() {
        // Setup
        let declarations = Declarations::new(vec![], vec![]).unwrap();
        let matcher = TokenMatcher::new(&declarations);

        // Execute
        let matches = matcher.matches(&[]);

        // Verify
        assert_eq!(matches.occurrences, vec![]);
        assert_eq!(matches.tokens, vec![]);
        assert_eq!(matches.bound, Vec::<Vec<usize>>::new());
    }

    #[test]
    fn matches_without_declarations() {
        // Setup
        let declarations = Declarations::new(vec![], vec![]).unwrap();
        let matcher = TokenMatcher::new(&declarations);

        // Execute
        let matches = matcher.matches(&["./app", "-s=foo", "bar"]);

        // Verify
        let kinds: Vec<TokenKind> = matches.tokens.iter().map(|t| t.kind()).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Program, TokenKind::Argument, TokenKind::Unnamed]
        );
        assert_eq!(matches.tokens[1].flag(), None);
    }
}
