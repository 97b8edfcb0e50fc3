use crate::matcher::command::owner;
use crate::matcher::model::{CommandOccurrence, Dash, Token, TokenKind};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Classify every token exactly once, given the resolved command occurrences.
pub(crate) fn classify(tokens: &[&str], occurrences: &[CommandOccurrence]) -> Vec<Token> {
    // 1. Mark the program, the command tokens and the owner of every other token.
    let mut classified: Vec<Token> = tokens
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let mut token = Token::new(index, raw);

            if index == 0 {
                token.kind = TokenKind::Program;
                token.trail.push("program");
            } else if let Some(occurrence) = occurrences.iter().find(|o| o.index == Some(index)) {
                token.kind = TokenKind::Command;
                token.name = raw.to_string();
                token.flag.replace(occurrence.decl);
                token.command = occurrence.parent;
                token.index_to = occurrence.index_to.unwrap_or(index + 1);
                token.trail.push("command token");
            } else if let Some(occurrence) = owner(occurrences, index) {
                token.command.replace(occurrence.decl);
                token.trail.push("in command range");
            }

            token
        })
        .collect();

    // 2. Split the remaining tokens into arguments, argument values and unnamed tokens.
    for index in 1..classified.len() {
        // Commands, the program and already consumed argument values are final.
        if classified[index].kind != TokenKind::Unnamed {
            continue;
        }

        let raw = classified[index].raw.clone();
        let dash = if raw.starts_with("--") {
            Dash::Double
        } else if raw.starts_with('-') {
            Dash::Single
        } else {
            classified[index].trail.push("unnamed");
            continue;
        };
        let name = raw.trim_start_matches('-').trim();

        if let Some((name, value)) = split_equals(name) {
            let value = trim_quotes(value);
            let token = &mut classified[index];
            token.kind = TokenKind::Argument;
            token.dash = dash;
            token.name = name.to_string();
            token.value = value.to_string();
            token.has_eq = true;
            token.unset = value.is_empty();
            token.trail.push("argument with equals value");
        } else {
            // The lookahead never crosses a command token.
            let next_value = classified
                .get(index + 1)
                .filter(|next| next.kind == TokenKind::Unnamed && !next.raw.starts_with('-'))
                .map(|next| trim_quotes(&next.raw).to_string());
            let token = &mut classified[index];
            token.kind = TokenKind::Argument;
            token.dash = dash;
            token.name = name.to_string();

            match next_value {
                Some(value) => {
                    token.value = value.clone();
                    token.pair.replace(index + 1);
                    token.index_to = index + 2;
                    token.trail.push("argument with next value");

                    let next = &mut classified[index + 1];
                    next.kind = TokenKind::ArgumentValue;
                    next.value = value;
                    next.pair.replace(index);
                    next.trail.push("argument value");
                }
                None => {
                    token.trail.push("argument without value");
                }
            }
        }

        #[cfg(feature = "tracing_debug")]
        {
            let token = &classified[index];
            debug!(
                "Token {index} '{}' classified as {:?} name '{}' value '{}'.",
                token.raw, token.kind, token.name, token.value
            );
        }
    }

    classified
}

/// Split `name=value`, unless a quote character precedes the first `=`.
fn split_equals(name: &str) -> Option<(&str, &str)> {
    let equals = name.find('=')?;

    match name.find(|c| c == '"' || c == '\'') {
        Some(quote) if quote < equals => None,
        _ => Some((&name[..equals], &name[equals + 1..])),
    }
}

/// Remove a single layer of matching `"` or `'` quotes.
fn trim_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }

    value
}
