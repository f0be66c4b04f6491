use std::env;

use puzzle_ratings::{plot_histogram, DEFAULT_DATABASE_PATH};

// Usage: rating_histogram [database]
fn main(){
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let path = env::args().nth(1).unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());

    if let Err(e) = plot_histogram(&path) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
