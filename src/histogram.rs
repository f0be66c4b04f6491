use std::io::Write;

use crate::error::{Error, Result};

pub const DEFAULT_BINS: usize = 50;
pub const DEFAULT_TITLE: &str = "Rating Distribution of Chess Puzzles";
pub const DEFAULT_X_LABEL: &str = "Rating";
pub const DEFAULT_Y_LABEL: &str = "Frequency";

// Width of the longest bar in the text rendering
const N_COLUMNS: u64 = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for PlotLabels {
    fn default() -> Self {
        PlotLabels {
            title: DEFAULT_TITLE.to_string(),
            x_label: DEFAULT_X_LABEL.to_string(),
            y_label: DEFAULT_Y_LABEL.to_string(),
        }
    }
}

/// Equal-width histogram over the closed interval [min, max] of the values.
///
/// Bins are half-open except the last one, which also holds the maximum.
/// An empty input spans [0, 1] and a single distinct value `v` spans
/// [v - 0.5, v + 0.5], so the bin count never depends on the data. Past
/// 2^52 the half-unit margin is not representable and the range widens to
/// the neighbouring floats instead, keeping the bin width above zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<u64>,
}

impl Histogram {
    pub fn new(values: &[i64], n_bins: usize) -> Result<Histogram> {
        if n_bins == 0 {
            return Err(Error::Config("number of bins must be at least 1".to_string()));
        }

        let (lo, hi) = match (values.iter().min(), values.iter().max()) {
            (Some(&lo), Some(&hi)) if lo as f64 == hi as f64 => widen(lo as f64),
            (Some(&lo), Some(&hi)) => (lo as f64, hi as f64),
            _ => (0.0, 1.0),
        };
        let bin_width = (hi - lo) / n_bins as f64;

        let mut edges: Vec<f64> = (0..n_bins).map(|i| lo + i as f64 * bin_width).collect();
        edges.push(hi);

        let mut counts: Vec<u64> = vec![0; n_bins];
        for &x in values {
            let bin = ((x as f64 - lo) / bin_width) as usize;
            counts[bin.min(n_bins - 1)] += 1;
        }

        Ok(Histogram { edges, counts })
    }

    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    /// `n_bins() + 1` edges in increasing order.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn min_edge(&self) -> f64 {
        self.edges[0]
    }

    pub fn max_edge(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    pub fn bin_width(&self) -> f64 {
        (self.max_edge() - self.min_edge()) / self.n_bins() as f64
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// (start, end, count) of every bin, left to right.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, u64)> + '_ {
        self.edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(w, &c)| (w[0], w[1], c))
    }

    /// Prints the title, the axis labels and one `start<TAB>#### count` line per bin.
    pub fn write_text(&self, labels: &PlotLabels, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "{}", labels.title)?;
        writeln!(out, "{}\t{}", labels.x_label, labels.y_label)?;

        let max_counter = self.max_count();
        let whole = self.bin_width().fract() == 0.0 && self.min_edge().fract() == 0.0;
        let precision = if whole { 0 } else { 2 };
        for (start, _, c) in self.bins() {
            let n_chars = if max_counter == 0 { 0 } else { c * N_COLUMNS / max_counter };
            write!(out, "{:.*}\t", precision, start)?;
            out.write_all(vec![b'#'; n_chars as usize].as_slice())?;
            writeln!(out, " {}", c)?;
        }
        Ok(())
    }
}

// [v - 0.5, v + 0.5], or the adjacent floats where v is too large for that.
fn widen(v: f64) -> (f64, f64) {
    let lo = if v - 0.5 < v { v - 0.5 } else { v.next_down() };
    let hi = if v + 0.5 > v { v + 0.5 } else { v.next_up() };
    (lo, hi)
}
