use flagtree::{Command, CommandLine, FlagHandler, HandlerError, Parameter, ValueType};

fn main() {
    let parser = CommandLine::new("basic")
        .version("v0.3.1")
        .about("Prints and calculates things.")
        .auto()
        .add(
            Parameter::new("verbose", ValueType::BOOL)
                .long("verbose")
                .global()
                .description("Show how each token was resolved"),
        )
        .command(Command::new("echo", "").description("Print the words"), |sub| {
            sub.add(
                Parameter::new("upper", ValueType::BOOL)
                    .short("u")
                    .long("upper")
                    .description("Print in uppercase"),
            )
            .add(
                Parameter::new("words", ValueType::STRINGS)
                    .short("w")
                    .long("words")
                    .delimiter(",")
                    .required()
                    .description("The words to print"),
            )
        })
        .command(Command::new("math", "").description("Math functions"), |sub| {
            sub.command(
                Command::new("sqrt", "").description("Calculate the square root"),
                |sub| {
                    sub.add(
                        Parameter::new("number", ValueType::FLOAT64)
                            .short("n")
                            .long("number")
                            .env("NUMBER")
                            .default("0")
                            .description("The input value"),
                    )
                },
            )
        })
        .handle(FlagHandler::new("echo", |resolution, _| {
            let words: Vec<String> = resolution.get("echo.words").unwrap_or_default();
            let line = words.join(" ");

            if resolution.get::<bool>("echo.upper").unwrap_or_default() {
                println!("{}", line.to_uppercase());
            } else {
                println!("{line}");
            }

            Ok(())
        }))
        .handle(FlagHandler::new("math.sqrt", |resolution, _| {
            let number: f64 = resolution.get("math.sqrt.number").unwrap_or_default();

            if number < 0.0 {
                return Err(HandlerError::new(format!(
                    "cannot take the square root of {number}"
                )));
            }

            println!("{}", number.sqrt());
            Ok(())
        }))
        .build();

    let resolution = parser.parse();

    if resolution.get::<bool>("verbose").unwrap_or_default() {
        for token in resolution.tokens() {
            println!(
                "{:>2} {:<16} {:?} {}",
                token.index(),
                token.raw(),
                token.kind(),
                token.trail().join(", ")
            );
        }
    }
}
