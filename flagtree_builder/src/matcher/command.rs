use crate::matcher::declaration::Declarations;
use crate::matcher::model::CommandOccurrence;
use crate::model::DeclId;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Locate every declared command in the input tokens and compute the range of tokens each occurrence owns.
///
/// One occurrence is produced per declared command, in declaration order, whether or not it was typed.
/// The first token is the program and never matches a command.
pub(crate) fn resolve_commands(
    declarations: &Declarations,
    tokens: &[&str],
) -> Vec<CommandOccurrence> {
    let mut occurrences: Vec<CommandOccurrence> = declarations
        .commands()
        .map(|decl| CommandOccurrence::new(decl.id, decl.parent))
        .collect();
    // The chain of matched commands currently open, outermost first.
    let mut chain: Vec<DeclId> = Vec::default();

    // 1. Find the command tokens.
    for (index, token) in tokens.iter().enumerate().skip(1) {
        for occurrence in occurrences.iter_mut() {
            // A command matches at most once.
            if occurrence.is_matched() {
                continue;
            }

            if declarations.get(occurrence.decl).command() != Some(*token) {
                continue;
            }

            let eligible = match occurrence.parent {
                Some(parent) => chain.contains(&parent),
                None => true,
            };

            if !eligible {
                continue;
            }

            match occurrence.parent {
                Some(parent) => {
                    let position = chain
                        .iter()
                        .position(|open| open == &parent)
                        .expect("internal error - eligible parent must be on the chain");
                    chain.truncate(position + 1);
                    occurrence.trail.push("nested command token");
                }
                None => {
                    chain.clear();
                    occurrence.trail.push("command token");
                }
            }

            chain.push(occurrence.decl);
            occurrence.index.replace(index);

            #[cfg(feature = "tracing_debug")]
            {
                debug!(
                    "Command {} matched at token {index}, open chain: {chain:?}.",
                    occurrence.decl
                );
            }

            break;
        }
    }

    // 2. Close each range at the next matched command outside of its own sub-tree.
    let matched: Vec<(usize, DeclId)> = occurrences
        .iter()
        .filter_map(|occurrence| occurrence.index.map(|index| (index, occurrence.decl)))
        .collect();

    for occurrence in occurrences.iter_mut() {
        let Some(from) = occurrence.index else {
            continue;
        };

        let next = matched
            .iter()
            .filter(|(index, decl)| {
                *index > from && !is_descendant(declarations, *decl, occurrence.decl)
            })
            .map(|(index, _)| *index)
            .min();

        match next {
            Some(to) => {
                occurrence.index_to.replace(to);
                occurrence.trail.push("closed by next command");
            }
            None => {
                occurrence.index_to.replace(tokens.len());
                occurrence.trail.push("closed by end of input");
            }
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Command {} owns tokens {:?}.",
                occurrence.decl,
                occurrence.range()
            );
        }
    }

    occurrences
}

/// Whether `decl` is nested (at any depth) inside `ancestor`.
fn is_descendant(declarations: &Declarations, decl: DeclId, ancestor: DeclId) -> bool {
    let mut current = declarations.get(decl).parent;

    while let Some(parent) = current {
        if parent == ancestor {
            return true;
        }

        current = declarations.get(parent).parent;
    }

    false
}

/// The innermost matched occurrence whose range strictly contains `index`.
pub(crate) fn owner(occurrences: &[CommandOccurrence], index: usize) -> Option<&CommandOccurrence> {
    occurrences
        .iter()
        .filter(|occurrence| occurrence.owns(index))
        .max_by_key(|occurrence| occurrence.index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::declaration::Declarations;
    use crate::matcher::model::{DeclKind, FlagDecl};
    use rstest::rstest;

    fn command(id: usize, command: &str, parent: Option<usize>) -> FlagDecl {
        FlagDecl {
            id: DeclId(id),
            name: command.to_string(),
            kind: DeclKind::Command {
                command: command.to_string(),
            },
            description: None,
            required: false,
            nonempty: false,
            global: false,
            env: None,
            delimiter: None,
            default: None,
            parent: parent.map(DeclId),
        }
    }

    // foo, bar and bar.qux
    fn declarations() -> Declarations {
        Declarations::new(
            vec![
                command(0, "foo", None),
                command(1, "bar", None),
                command(2, "qux", Some(1)),
            ],
            vec![],
        )
        .unwrap()
    }

    fn ranges(occurrences: &[CommandOccurrence]) -> Vec<Option<(usize, usize)>> {
        occurrences.iter().map(|o| o.range()).collect()
    }

    #[test]
    fn none_typed() {
        // Execute
        let occurrences = resolve_commands(&declarations(), &["./app", "-s"]);

        // Verify
        assert_eq!(ranges(&occurrences), vec![None, None, None]);
        assert_eq!(occurrences[0].index(), None);
        assert!(occurrences[0].trail().is_empty());
    }

    #[rstest]
    #[case(vec!["./app", "foo"], vec![Some((1, 2)), None, None])]
    #[case(vec!["./app", "foo", "-b"], vec![Some((1, 3)), None, None])]
    #[case(vec!["./app", "-b", "bar", "-s", "qux", "-s"], vec![None, Some((2, 6)), Some((4, 6))])]
    #[case(vec!["./app", "bar", "qux", "foo"], vec![Some((3, 4)), Some((1, 3)), Some((2, 3))])]
    #[case(vec!["./app", "foo", "-b", "bar", "-s"], vec![Some((1, 3)), Some((3, 5)), None])]
    // Declaration order does not dictate positional order.
    #[case(vec!["./app", "bar", "-s", "foo", "-b"], vec![Some((3, 5)), Some((1, 3)), None])]
    fn resolved_ranges(
        #[case] tokens: Vec<&str>,
        #[case] expected: Vec<Option<(usize, usize)>>,
    ) {
        // Execute
        let occurrences = resolve_commands(&declarations(), tokens.as_slice());

        // Verify
        assert_eq!(ranges(&occurrences), expected);
    }

    #[rstest]
    // qux before its parent is a plain token.
    #[case(vec!["./app", "qux", "bar"], vec![None, Some((2, 3)), None])]
    // qux after a different top level command is a plain token.
    #[case(vec!["./app", "bar", "foo", "qux"], vec![Some((2, 4)), Some((1, 2)), None])]
    // Commands match at most once.
    #[case(vec!["./app", "foo", "foo"], vec![Some((1, 3)), None, None])]
    // The program is never a command.
    #[case(vec!["foo", "foo"], vec![Some((1, 2)), None, None])]
    fn ineligible(#[case] tokens: Vec<&str>, #[case] expected: Vec<Option<(usize, usize)>>) {
        // Execute
        let occurrences = resolve_commands(&declarations(), tokens.as_slice());

        // Verify
        assert_eq!(ranges(&occurrences), expected);
    }

    #[test]
    fn nested_same_name() {
        // Setup
        let declarations = Declarations::new(
            vec![command(0, "foo", None), command(1, "foo", Some(0))],
            vec![],
        )
        .unwrap();

        // Execute
        let occurrences = resolve_commands(&declarations, &["./app", "foo", "-b", "foo", "-b"]);

        // Verify
        assert_eq!(ranges(&occurrences), vec![Some((1, 5)), Some((3, 5))]);
        assert_eq!(occurrences[1].trail(), &["nested command token", "closed by end of input"]);
    }

    #[rstest]
    #[case(1, None)]
    #[case(2, Some(1))]
    #[case(3, Some(1))]
    #[case(4, Some(2))]
    #[case(5, Some(2))]
    #[case(6, None)]
    #[case(7, Some(0))]
    fn innermost_owner(#[case] index: usize, #[case] expected: Option<usize>) {
        // Setup
        let tokens = vec!["./app", "bar", "-s", "qux", "-s", "quux", "foo", "-b"];
        let occurrences = resolve_commands(&declarations(), tokens.as_slice());

        // Execute
        let result = owner(&occurrences, index);

        // Verify
        assert_eq!(result.map(|o| o.decl().index()), expected);
    }
}
