use std::fmt;

/// Summary of a rating sample.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingStats {
    pub count: usize,
    pub min: i64,
    pub max: i64,
    pub mean: f64,
    pub median: f64,
}

impl RatingStats {
    /// Returns None for an empty sample.
    pub fn from_ratings(ratings: &[i64]) -> Option<RatingStats> {
        if ratings.is_empty() {
            return None;
        }
        let mut sorted = ratings.to_vec();
        sorted.sort_unstable();

        let n = sorted.len();
        let sum: i128 = sorted.iter().map(|&x| x as i128).sum();
        let median = if n % 2 == 1 {
            sorted[n / 2] as f64
        } else {
            (sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0
        };

        Some(RatingStats {
            count: n,
            min: sorted[0],
            max: sorted[n - 1],
            mean: sum as f64 / n as f64,
            median,
        })
    }
}

impl fmt::Display for RatingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of puzzles: {}", self.count)?;
        writeln!(f, "Minimum rating: {}", self.min)?;
        writeln!(f, "Maximum rating: {}", self.max)?;
        writeln!(f, "Average rating: {:.2}", self.mean)?;
        write!(f, "Median rating: {}", self.median)
    }
}
