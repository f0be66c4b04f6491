use std::io;
use std::path::PathBuf;

use clap::ArgMatches;
use log::debug;

use puzzle_ratings::cli::build_cli;
use puzzle_ratings::*;

fn init_logging(args: &ArgMatches) {
    let level = if args.get_flag("verbose") {
        "debug"
    } else if args.get_flag("quiet") {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn rating_range(args: &ArgMatches) -> Result<Option<RatingRange>> {
    let lowest = args.get_one::<i64>("min-rating").copied();
    let highest = args.get_one::<i64>("max-rating").copied();
    if lowest.is_none() && highest.is_none() {
        return Ok(None);
    }
    RatingRange::new(lowest, highest).map(Some)
}

fn run(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .map(String::as_str)
        .unwrap_or(DEFAULT_DATABASE_PATH);
    let show_progress = !matches.get_flag("quiet");
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match matches.subcommand() {
        Some(("histogram", sub_matches)) => {
            let config = HistogramConfig {
                bins: sub_matches.get_one::<usize>("bins").copied().unwrap_or(DEFAULT_BINS),
                range: rating_range(sub_matches)?,
                svg: sub_matches.get_one::<String>("svg").map(PathBuf::from),
                show_progress,
                ..HistogramConfig::default()
            };
            debug!("{:?}", config);
            report_histogram(input, &config, &mut out)?;
        }
        Some(("stats", sub_matches)) => {
            print_stats(input, rating_range(sub_matches)?, show_progress, &mut out)?;
        }
        Some(("top", sub_matches)) => {
            let n = sub_matches.get_one::<u64>("count").copied().unwrap_or(10);
            print_top(input, n, &mut out)?;
        }
        Some(("completions", sub_matches)) => {
            if let Some(shell) = sub_matches.get_one::<clap_complete::Shell>("shell") {
                clap_complete::generate(*shell, &mut build_cli(), "puzzle_ratings", &mut out);
            }
        }
        _ => {
            let config = HistogramConfig { show_progress, ..HistogramConfig::default() };
            report_histogram(input, &config, &mut out)?;
        }
    }
    Ok(())
}

fn main() {
    let matches = build_cli().get_matches();
    init_logging(&matches);

    if let Err(e) = run(&matches) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
