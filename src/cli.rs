use clap::{value_parser, Arg, ArgAction, Command};

use crate::DEFAULT_DATABASE_PATH;

pub fn build_cli() -> Command {
    Command::new("puzzle_ratings")
        .version("0.1.0")
        .about("Rating distribution of a Lichess puzzle database")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .default_value(DEFAULT_DATABASE_PATH)
                .help("SQLite puzzle database")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .conflicts_with("quiet")
                .help("Log the queries that are run")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Only report warnings and errors, no progress spinner")
                .global(true),
        )
        .subcommand(
            Command::new("histogram")
                .about("Print the rating histogram of the puzzles. This is the default.")
                .arg(
                    Arg::new("bins")
                        .long("bins")
                        .default_value("50")
                        .value_parser(value_parser!(usize))
                        .help("Number of bins"),
                )
                .arg(
                    Arg::new("svg")
                        .long("svg")
                        .help("Also write the histogram as SVG to this file"),
                )
                .arg(
                    Arg::new("min-rating")
                        .long("min-rating")
                        .value_parser(value_parser!(i64))
                        .help("Ignore puzzles rated below this"),
                )
                .arg(
                    Arg::new("max-rating")
                        .long("max-rating")
                        .value_parser(value_parser!(i64))
                        .help("Ignore puzzles rated above this"),
                ),
        )
        .subcommand(
            Command::new("stats")
                .about("Print the number of puzzles and the minimum, maximum, mean and median rating.")
                .arg(
                    Arg::new("min-rating")
                        .long("min-rating")
                        .value_parser(value_parser!(i64))
                        .help("Ignore puzzles rated below this"),
                )
                .arg(
                    Arg::new("max-rating")
                        .long("max-rating")
                        .value_parser(value_parser!(i64))
                        .help("Ignore puzzles rated above this"),
                ),
        )
        .subcommand(
            Command::new("top")
                .about("Print the highest ratings, one per line.")
                .arg(
                    Arg::new("count")
                        .short('n')
                        .long("count")
                        .default_value("10")
                        .value_parser(value_parser!(u64))
                        .help("How many ratings to print"),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Print a shell completion script.")
                .arg_required_else_help(true)
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(value_parser!(clap_complete::Shell)),
                ),
        )
}
