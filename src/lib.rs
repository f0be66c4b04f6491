pub mod cli;
mod error;
mod histogram;
mod puzzle_db;
mod stats;
mod svg;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::info;

pub use error::{Error, Result};
pub use histogram::{Histogram, PlotLabels, DEFAULT_BINS, DEFAULT_TITLE, DEFAULT_X_LABEL, DEFAULT_Y_LABEL};
pub use puzzle_db::{PuzzleDatabase, RatingRange};
pub use stats::RatingStats;
pub use svg::{save_svg, write_svg};

pub const DEFAULT_DATABASE_PATH: &str = "validated_puzzles.db";

/// How a histogram report is built and where it goes besides the text output.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramConfig {
    pub bins: usize,
    pub range: Option<RatingRange>,
    pub labels: PlotLabels,
    pub svg: Option<PathBuf>,
    pub show_progress: bool,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        HistogramConfig {
            bins: DEFAULT_BINS,
            range: None,
            labels: PlotLabels::default(),
            svg: None,
            show_progress: false,
        }
    }
}

fn progress_bar(show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {pos} ratings read ({elapsed})") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Reads every rating from the puzzle table at `path`, highest first.
/// The database is closed again before this returns.
pub fn load_ratings(path: impl AsRef<Path>, range: Option<RatingRange>, show_progress: bool) -> Result<Vec<i64>> {
    let db = PuzzleDatabase::open(path)?;
    let pb = progress_bar(show_progress);
    let ratings = db.ratings(range, &pb);
    pb.finish_and_clear();
    let ratings = ratings?;
    info!("Read {} ratings from {}", ratings.len(), db.path().display());
    Ok(ratings)
}

/// Loads the ratings, builds the histogram and writes it to an SVG file if one
/// is configured, then to `out`. Nothing reaches `out` unless every rating
/// converted and the SVG file was written.
pub fn report_histogram(path: impl AsRef<Path>, config: &HistogramConfig, out: &mut impl Write) -> Result<Histogram> {
    let ratings = load_ratings(path, config.range, config.show_progress)?;
    let histogram = Histogram::new(&ratings, config.bins)?;

    if let Some(svg_path) = &config.svg {
        save_svg(&histogram, &config.labels, svg_path)?;
    }
    histogram.write_text(&config.labels, out)?;
    out.flush()?;
    Ok(histogram)
}

/// Shows the rating distribution of the puzzles in the database at `path`
/// with 50 bins and the standard title and labels.
pub fn plot_histogram(path: impl AsRef<Path>) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report_histogram(path, &HistogramConfig::default(), &mut out)?;
    Ok(())
}

pub fn print_stats(path: impl AsRef<Path>, range: Option<RatingRange>, show_progress: bool, out: &mut impl Write) -> Result<()> {
    let ratings = load_ratings(path, range, show_progress)?;
    match RatingStats::from_ratings(&ratings) {
        Some(stats) => writeln!(out, "{}", stats)?,
        None => writeln!(out, "Number of puzzles: 0")?,
    }
    Ok(())
}

pub fn print_top(path: impl AsRef<Path>, n: u64, out: &mut impl Write) -> Result<()> {
    if n == 0 {
        return Err(Error::Config("number of top ratings must be at least 1".to_string()));
    }
    let db = PuzzleDatabase::open(path)?;
    for rating in db.top_ratings(n)? {
        writeln!(out, "{}", rating)?;
    }
    Ok(())
}
