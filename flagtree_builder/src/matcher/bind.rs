use crate::matcher::declaration::Declarations;
use crate::matcher::model::{FlagDecl, Token, TokenKind};
use crate::model::DeclId;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Bind argument tokens to the declared flags, returning per declaration the bound token indices in positional order.
///
/// Every occurrence of a flag is kept; last wins is applied when the values are coerced.
/// Commands are bound to their own token followed by the argument and unnamed tokens directly in their scope.
pub(crate) fn bind(declarations: &Declarations, tokens: &mut [Token]) -> Vec<Vec<usize>> {
    let mut bound: Vec<Vec<usize>> = vec![Vec::default(); declarations.len()];

    // 1. Global flags claim their arguments at any depth, ahead of any command scoped flag.
    for decl in declarations.flags().filter(|decl| decl.global) {
        for index in 0..tokens.len() {
            if claimable(&tokens[index], decl) {
                claim(tokens, index, decl.id, "global argument");
                bound[decl.id.index()].push(index);
            }
        }
    }

    // 2. Every other flag binds only within the exact scope of its parent.
    for decl in declarations.flags().filter(|decl| !decl.global) {
        let rule = match decl.parent {
            Some(_) => "command argument",
            None => "top level argument",
        };

        for index in 0..tokens.len() {
            if tokens[index].command == decl.parent && claimable(&tokens[index], decl) {
                claim(tokens, index, decl.id, rule);
                bound[decl.id.index()].push(index);
            }
        }
    }

    // 3. Commands collect their own token and the tokens directly in their scope, minus those claimed by global flags.
    for decl in declarations.commands() {
        for token in tokens.iter() {
            let own = token.kind == TokenKind::Command && token.flag == Some(decl.id);
            let member = token.command == Some(decl.id)
                && matches!(token.kind, TokenKind::Argument | TokenKind::Unnamed)
                && !is_global(declarations, token.flag);

            if own || member {
                bound[decl.id.index()].push(token.index);
            }
        }
    }

    #[cfg(feature = "tracing_debug")]
    {
        for (index, indices) in bound.iter().enumerate() {
            if !indices.is_empty() {
                debug!("Declaration #{index} bound tokens {indices:?}.");
            }
        }
    }

    bound
}

fn claimable(token: &Token, decl: &FlagDecl) -> bool {
    token.kind == TokenKind::Argument && token.flag.is_none() && decl.matches_alias(&token.name)
}

fn claim(tokens: &mut [Token], index: usize, decl: DeclId, rule: &'static str) {
    let token = &mut tokens[index];
    token.flag.replace(decl);
    token.trail.push(rule);

    if let Some(pair) = token.pair {
        let value = &mut tokens[pair];
        value.flag.replace(decl);
        value.trail.push(rule);
    }
}

fn is_global(declarations: &Declarations, flag: Option<DeclId>) -> bool {
    flag.map_or(false, |id| declarations.get(id).global)
}
