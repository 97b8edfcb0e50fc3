use terminal_size::{terminal_size, Width};

use crate::matcher::{Declarations, FlagDecl};
use crate::parser::interface::*;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

const PADDING: usize = 2;
const INDENT: usize = 2;

#[derive(Debug, PartialEq, Eq)]
struct UsageRow {
    indent: usize,
    left: String,
    right: String,
}

impl UsageRow {
    fn new(depth: usize, decl: &FlagDecl) -> Self {
        Self {
            indent: INDENT * (depth + 1),
            left: left_column(decl),
            right: right_column(decl),
        }
    }

    fn left_column(&self) -> String {
        let indent = self.indent;
        format!("{:indent$}{}", "", self.left)
    }
}

fn left_column(decl: &FlagDecl) -> String {
    if let Some(command) = decl.command() {
        return command.to_string();
    }

    match (decl.short(), decl.long()) {
        (Some(short), Some(long)) => format!("-{short}, --{long}"),
        (Some(short), None) => format!("-{short}"),
        (None, Some(long)) => format!("    --{long}"),
        (None, None) => String::default(),
    }
}

fn right_column(decl: &FlagDecl) -> String {
    let default = decl
        .default_value()
        .filter(|default| *default != "false");
    let suffix = match (default, decl.env()) {
        (Some(default), Some(env)) => Some(format!("(default {default} - override ${env})")),
        (Some(default), None) => Some(format!("(default {default})")),
        (None, Some(env)) => Some(format!("(default ${env})")),
        (None, None) => None,
    };

    [decl.description().map(str::to_string), suffix]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<String>>()
        .join(" ")
}

/// Renders the usage text of a declaration tree.
pub(crate) struct Printer {
    program: String,
    about: Option<String>,
    options: Vec<UsageRow>,
    commands: Vec<UsageRow>,
    terminal_width: Option<usize>,
}

impl Printer {
    pub(crate) fn terminal(
        program: String,
        about: Option<String>,
        declarations: &Declarations,
    ) -> Self {
        let terminal_width = match terminal_size() {
            Some((Width(width), _)) => Some(width as usize),
            None => None,
        };

        Self::new(program, about, declarations, terminal_width)
    }

    pub(crate) fn new(
        program: String,
        about: Option<String>,
        declarations: &Declarations,
        terminal_width: Option<usize>,
    ) -> Self {
        let mut options = Vec::default();
        let mut commands = Vec::default();

        for decl in declarations.iter() {
            if decl.parent().is_none() && !decl.is_command() {
                options.push(UsageRow::new(0, decl));
            } else {
                commands.push(UsageRow::new(depth(declarations, decl), decl));
            }
        }

        Self {
            program,
            about,
            options,
            commands,
            terminal_width,
        }
    }

    fn usage(&self) -> String {
        let mut usage = format!("Usage: {}", self.program);

        if !self.options.is_empty() {
            usage.push_str(" [options...]");
        }

        if !self.commands.is_empty() {
            usage.push_str(" COMMAND [options...]");
        }

        usage
    }

    fn renderer(&self) -> ColumnRenderer {
        let rows = self.options.iter().chain(self.commands.iter());
        let left_width = rows
            .clone()
            .map(|row| row.indent + row.left.chars().count())
            .max()
            .unwrap_or(1);
        let middle_width = rows
            .map(|row| row.right.chars().count())
            .max()
            .unwrap_or(2);
        let padding = PaddingWidth::new(PADDING).expect("internal error - padding must be valid");
        let left = LeftWidth::new(std::cmp::max(left_width, 1))
            .expect("internal error - left must be valid");
        let middle = MiddleWidth::new(std::cmp::max(middle_width, 2))
            .expect("internal error - middle must be valid");

        match self.terminal_width {
            Some(total) => ColumnRenderer::guided(padding, left, middle, TotalWidth(total)),
            None => ColumnRenderer::new(padding, left, middle),
        }
    }

    pub(crate) fn print_help(&self, user_interface: &(impl UserInterface + ?Sized)) {
        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Printing usage for {} options and {} command rows.",
                self.options.len(),
                self.commands.len()
            );
        }

        user_interface.print(self.usage());
        user_interface.print(String::default());

        if let Some(about) = &self.about {
            user_interface.print(about.clone());
            user_interface.print(String::default());
        }

        let renderer = self.renderer();
        let sections = [("Options:", &self.options), ("Commands:", &self.commands)];
        let mut first = true;

        for (title, rows) in sections {
            if rows.is_empty() {
                continue;
            }

            if !first {
                user_interface.print(String::default());
            }

            first = false;
            user_interface.print(title.to_string());

            for row in rows {
                for line in renderer.render(&row.left_column(), &row.right) {
                    user_interface.print(line);
                }
            }
        }
    }
}

fn depth(declarations: &Declarations, decl: &FlagDecl) -> usize {
    let mut depth = 0;
    let mut parent = decl.parent();

    while let Some(id) = parent {
        depth += 1;
        parent = declarations.get(id).parent();
    }

    depth
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Command, Parameter, Schema};
    use crate::model::ValueType;
    use crate::parser::util::InMemoryInterface;
    use rstest::rstest;

    fn row(left: &str, right: &str) -> String {
        format!("{left:18}  {right}")
    }

    #[test]
    fn print_help() {
        // Setup
        let declarations = Schema::new()
            .add(
                Parameter::new("help", ValueType::BOOL)
                    .short("h")
                    .long("help")
                    .description("Display usage"),
            )
            .add(
                Parameter::new("vv", ValueType::BOOL)
                    .long("vv")
                    .description("Display version (extended)"),
            )
            .add(
                Parameter::new("string", ValueType::STRING)
                    .short("s")
                    .description("A string")
                    .default("foo")
                    .env("STRING"),
            )
            .command(Command::new("echo", "").description("Print arguments"), |sub| {
                sub.add(
                    Parameter::new("upper", ValueType::BOOL)
                        .short("u")
                        .long("upper")
                        .description("Uppercase")
                        .default("false"),
                )
            })
            .command(Command::new("math", "").description("Math functions"), |sub| {
                sub.command(
                    Command::new("sqrt", "").description("Calculate square root"),
                    |sub| {
                        sub.add(
                            Parameter::new("number", ValueType::FLOAT64)
                                .short("n")
                                .long("number")
                                .description("Number")
                                .env("NUMBER"),
                        )
                    },
                )
            })
            .build()
            .unwrap();
        let printer = Printer::new(
            "app".to_string(),
            Some("An app".to_string()),
            &declarations,
            None,
        );
        let interface = InMemoryInterface::default();

        // Execute
        printer.print_help(&interface);

        // Verify
        let expected = vec![
            "Usage: app [options...] COMMAND [options...]".to_string(),
            "".to_string(),
            "An app".to_string(),
            "".to_string(),
            "Options:".to_string(),
            row("  -h, --help", "Display usage"),
            row("      --vv", "Display version (extended)"),
            row("  -s", "A string (default foo - override $STRING)"),
            "".to_string(),
            "Commands:".to_string(),
            row("  echo", "Print arguments"),
            row("    -u, --upper", "Uppercase"),
            row("  math", "Math functions"),
            row("    sqrt", "Calculate square root"),
            row("      -n, --number", "Number (default $NUMBER)"),
        ];
        assert_eq!(interface.consume_message(), expected.join("\n"));
    }

    #[test]
    fn print_help_empty() {
        // Setup
        let declarations = Schema::new().build().unwrap();
        let printer = Printer::new("app".to_string(), None, &declarations, None);
        let interface = InMemoryInterface::default();

        // Execute
        printer.print_help(&interface);

        // Verify
        assert_eq!(interface.consume_message(), "Usage: app\n");
    }

    #[test]
    fn print_help_commands_only() {
        // Setup
        let declarations = Schema::new()
            .command(Command::new("run", ""), |sub| sub)
            .build()
            .unwrap();
        let printer = Printer::new("app".to_string(), None, &declarations, None);
        let interface = InMemoryInterface::default();

        // Execute
        printer.print_help(&interface);

        // Verify
        assert_eq!(
            interface.consume_message(),
            "Usage: app COMMAND [options...]\n\nCommands:\n  run"
        );
    }

    #[test]
    fn print_help_wraps() {
        // Setup
        let declarations = Schema::new()
            .add(
                Parameter::new("flag", ValueType::BOOL)
                    .short("f")
                    .description("one two three four five six seven eight nine ten"),
            )
            .build()
            .unwrap();
        let printer = Printer::new("app".to_string(), None, &declarations, Some(30));
        let interface = InMemoryInterface::default();

        // Execute
        printer.print_help(&interface);

        // Verify
        // Target width 28, leaving 22 for the description.
        assert_eq!(
            interface.consume_message(),
            vec![
                "Usage: app [options...]",
                "",
                "Options:",
                "  -f  one two three four",
                "      five six seven eight",
                "      nine ten",
            ]
            .join("\n")
        );
    }

    #[rstest]
    #[case(Some("s"), Some("string"), "-s, --string")]
    #[case(Some("s"), None, "-s")]
    #[case(None, Some("string"), "    --string")]
    fn left_columns(
        #[case] short: Option<&str>,
        #[case] long: Option<&str>,
        #[case] expected: &str,
    ) {
        // Setup
        let mut parameter = Parameter::new("string", ValueType::STRING);

        if let Some(short) = short {
            parameter = parameter.short(short);
        }

        if let Some(long) = long {
            parameter = parameter.long(long);
        }

        let declarations = Schema::new().add(parameter).build().unwrap();

        // Execute
        let left = left_column(declarations.iter().next().unwrap());

        // Verify
        assert_eq!(left, expected);
    }

    #[rstest]
    #[case(None, None, None, "")]
    #[case(Some("Words"), None, None, "Words")]
    #[case(Some("Words"), Some("1"), None, "Words (default 1)")]
    #[case(Some("Words"), Some("false"), None, "Words")]
    #[case(Some("Words"), None, Some("X"), "Words (default $X)")]
    #[case(None, Some("1"), Some("X"), "(default 1 - override $X)")]
    fn right_columns(
        #[case] description: Option<&str>,
        #[case] default: Option<&str>,
        #[case] env: Option<&str>,
        #[case] expected: &str,
    ) {
        // Setup
        let mut parameter = Parameter::new("value", ValueType::STRING).short("v");

        if let Some(description) = description {
            parameter = parameter.description(description);
        }

        if let Some(default) = default {
            parameter = parameter.default(default);
        }

        if let Some(env) = env {
            parameter = parameter.env(env);
        }

        let declarations = Schema::new().add(parameter).build().unwrap();

        // Execute
        let right = right_column(declarations.iter().next().unwrap());

        // Verify
        assert_eq!(right, expected);
    }
}
