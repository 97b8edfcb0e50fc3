use flagtree::{derive::*, CommandLine, Settings};

#[derive(Debug, Default, Flags)]
struct Cli {
    #[flag(long = "verbose", global, description = "Print the captured flags")]
    verbose: bool,

    #[command(description = "Print the arguments")]
    echo: Echo,

    #[command(description = "Math functions")]
    math: Math,
}

#[derive(Debug, Default, Flags)]
struct Echo {
    #[flag(short = "u", long = "upper", description = "Print in uppercase")]
    upper: bool,

    #[settings(allow_unknown_arg)]
    settings: Settings,
}

#[derive(Debug, Default, Flags)]
struct Math {
    #[command(name = "sqrt", description = "Calculate the square root")]
    square_root: SquareRoot,
}

#[derive(Debug, Default, Flags)]
struct SquareRoot {
    #[flag(short = "n", env = "NUMBER", default = "0", description = "The input value")]
    number: f64,
}

fn main() {
    let resolution = CommandLine::new("derived")
        .version("v0.3.1")
        .auto()
        .flags::<Cli>()
        .build()
        .parse();
    let cli: Cli = resolution.capture();

    if cli.verbose {
        println!("{cli:?}");
    }

    if let Some(arguments) = resolution.resolved_arguments("echo") {
        // The first argument is the command itself.
        let line = arguments[1..].join(" ");

        if cli.echo.upper {
            println!("{}", line.to_uppercase());
        } else {
            println!("{line}");
        }
    }

    if resolution.resolved_arguments("math.square_root").is_some() {
        println!("{}", cli.math.square_root.number.sqrt());
    }
}
