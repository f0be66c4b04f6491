use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use log::debug;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, ErrorCode, OpenFlags};

use crate::error::{Error, Result};

const RATINGS_QUERY: &str = "SELECT Rating FROM lichess_db_puzzle ORDER BY Rating DESC";
const TOP_RATINGS_QUERY: &str = "SELECT Rating FROM lichess_db_puzzle ORDER BY Rating DESC LIMIT ?1";

/// Inclusive bounds on the ratings that are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingRange {
    pub lowest: i64,
    pub highest: i64,
}

impl RatingRange {
    pub fn new(lowest: Option<i64>, highest: Option<i64>) -> Result<RatingRange> {
        let range = RatingRange {
            lowest: lowest.unwrap_or(i64::MIN),
            highest: highest.unwrap_or(i64::MAX),
        };
        if range.lowest > range.highest {
            return Err(Error::Config(format!(
                "lowest rating {} is above highest rating {}",
                range.lowest, range.highest
            )));
        }
        Ok(range)
    }

    pub fn contains(&self, rating: i64) -> bool {
        self.lowest <= rating && rating <= self.highest
    }
}

/// Read-only handle to a puzzle database. The connection is closed when this
/// value is dropped, whichever way the caller leaves.
pub struct PuzzleDatabase {
    path: PathBuf,
    conn: Connection,
}

impl PuzzleDatabase {
    pub fn open(path: impl AsRef<Path>) -> Result<PuzzleDatabase> {
        let path = path.as_ref().to_path_buf();
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&path, flags).map_err(|source| Error::Connection {
            path: path.clone(),
            source,
        })?;
        debug!("Opened {} read-only", path.display());
        Ok(PuzzleDatabase { path, conn })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All ratings, highest first. With a range, only ratings inside it.
    ///
    /// The range is applied to converted values, so every row is still
    /// converted and an invalid rating fails the read even when it would fall
    /// outside the range.
    pub fn ratings(&self, range: Option<RatingRange>, progress: &ProgressBar) -> Result<Vec<i64>> {
        let mut ratings = self.query_ratings(RATINGS_QUERY, [], progress)?;
        if let Some(r) = range {
            ratings.retain(|&x| r.contains(x));
        }
        Ok(ratings)
    }

    /// The `n` highest ratings, highest first.
    pub fn top_ratings(&self, n: u64) -> Result<Vec<i64>> {
        let limit = i64::try_from(n).unwrap_or(i64::MAX);
        self.query_ratings(TOP_RATINGS_QUERY, params![limit], &ProgressBar::hidden())
    }

    fn query_ratings(&self, sql: &str, params: impl rusqlite::Params, progress: &ProgressBar) -> Result<Vec<i64>> {
        debug!("Running {}", sql);
        let mut stmt = self.conn.prepare(sql).map_err(|e| self.classify(sql, e))?;
        let mut rows = stmt.query(params).map_err(|e| self.classify(sql, e))?;

        let mut ratings = Vec::<i64>::new();
        while let Some(row) = rows.next().map_err(|e| self.classify(sql, e))? {
            let value = row.get_ref(0).map_err(|e| self.classify(sql, e))?;
            ratings.push(rating_from_value(value, ratings.len())?);
            progress.inc(1);
        }
        Ok(ratings)
    }

    // SQLite opens lazily, so a file that is not a database is only detected
    // once the first statement touches it.
    fn classify(&self, sql: &str, source: rusqlite::Error) -> Error {
        match source.sqlite_error_code() {
            Some(ErrorCode::NotADatabase) | Some(ErrorCode::CannotOpen) | Some(ErrorCode::DatabaseCorrupt) => {
                Error::Connection { path: self.path.clone(), source }
            }
            _ => Error::Query { sql: sql.to_string(), source },
        }
    }
}

// Integers pass through, finite reals are truncated toward zero and text is
// parsed after trimming surrounding whitespace. Anything else is rejected.
fn rating_from_value(value: ValueRef<'_>, row: usize) -> Result<i64> {
    let invalid = |shown: String| Error::Value { row, value: shown };
    match value {
        ValueRef::Integer(i) => Ok(i),
        ValueRef::Real(f) => {
            if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                Ok(f.trunc() as i64)
            } else {
                Err(invalid(f.to_string()))
            }
        }
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            text.trim().parse::<i64>().map_err(|_| invalid(format!("{:?}", text)))
        }
        ValueRef::Null => Err(invalid("NULL".to_string())),
        ValueRef::Blob(b) => Err(invalid(format!("<blob of {} bytes>", b.len()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database_with(ratings: &[&dyn rusqlite::ToSql]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("puzzles.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE lichess_db_puzzle (PuzzleId TEXT, FEN TEXT, Moves TEXT, Rating INTEGER);",
        )
        .unwrap();
        for (i, r) in ratings.iter().enumerate() {
            conn.execute(
                "INSERT INTO lichess_db_puzzle (PuzzleId, FEN, Moves, Rating) VALUES (?1, '', '', ?2)",
                params![format!("p{}", i), r],
            )
            .unwrap();
        }
        (dir, path)
    }

    #[test]
    fn test_ratings_in_descending_order(){
        let (_dir, path) = database_with(&[&1500, &900, &2100, &1500]);
        let db = PuzzleDatabase::open(&path).unwrap();
        let ratings = db.ratings(None, &ProgressBar::hidden()).unwrap();
        assert_eq!(ratings, vec![2100, 1500, 1500, 900]);
    }

    #[test]
    fn test_empty_table(){
        let (_dir, path) = database_with(&[]);
        let db = PuzzleDatabase::open(&path).unwrap();
        assert!(db.ratings(None, &ProgressBar::hidden()).unwrap().is_empty());
    }

    #[test]
    fn test_range_is_inclusive(){
        let (_dir, path) = database_with(&[&1000, &1200, &1400, &1600]);
        let db = PuzzleDatabase::open(&path).unwrap();
        let range = RatingRange::new(Some(1200), Some(1400)).unwrap();
        assert_eq!(db.ratings(Some(range), &ProgressBar::hidden()).unwrap(), vec![1400, 1200]);

        let open_ended = RatingRange::new(Some(1300), None).unwrap();
        assert_eq!(db.ratings(Some(open_ended), &ProgressBar::hidden()).unwrap(), vec![1600, 1400]);
    }

    #[test]
    fn test_range_does_not_hide_invalid_rating(){
        let (_dir, path) = database_with(&[&1500, &"abc", &rusqlite::types::Null]);
        let db = PuzzleDatabase::open(&path).unwrap();
        let range = RatingRange::new(Some(1000), Some(2000)).unwrap();
        assert!(matches!(db.ratings(Some(range), &ProgressBar::hidden()), Err(Error::Value { .. })));

        let (_dir, path) = database_with(&[&1500, &rusqlite::types::Null]);
        let db = PuzzleDatabase::open(&path).unwrap();
        let open_ended = RatingRange::new(Some(1000), None).unwrap();
        assert!(matches!(db.ratings(Some(open_ended), &ProgressBar::hidden()), Err(Error::Value { .. })));
    }

    #[test]
    fn test_range_applies_to_converted_value(){
        let (_dir, path) = database_with(&[&1500, &1650.9_f64, &1700]);
        let db = PuzzleDatabase::open(&path).unwrap();
        let range = RatingRange::new(Some(1000), Some(1650)).unwrap();
        assert_eq!(db.ratings(Some(range), &ProgressBar::hidden()).unwrap(), vec![1650, 1500]);
    }

    #[test]
    fn test_inverted_range_rejected(){
        assert!(matches!(RatingRange::new(Some(2000), Some(1000)), Err(Error::Config(_))));
    }

    #[test]
    fn test_top_ratings(){
        let (_dir, path) = database_with(&[&1000, &2500, &1800, &2200]);
        let db = PuzzleDatabase::open(&path).unwrap();
        assert_eq!(db.top_ratings(2).unwrap(), vec![2500, 2200]);
        assert_eq!(db.top_ratings(10).unwrap().len(), 4);
    }

    #[test]
    fn test_text_and_real_ratings_convert(){
        let (_dir, path) = database_with(&[&" 1700 ", &1650.9_f64]);
        let db = PuzzleDatabase::open(&path).unwrap();
        let mut ratings = db.ratings(None, &ProgressBar::hidden()).unwrap();
        ratings.sort();
        assert_eq!(ratings, vec![1650, 1700]);
    }

    #[test]
    fn test_non_numeric_rating_fails(){
        let (_dir, path) = database_with(&[&1500, &"abc"]);
        let db = PuzzleDatabase::open(&path).unwrap();
        match db.ratings(None, &ProgressBar::hidden()) {
            Err(Error::Value { value, .. }) => assert!(value.contains("abc")),
            other => panic!("expected a value error, got {:?}", other),
        }
    }

    #[test]
    fn test_null_rating_fails(){
        let (_dir, path) = database_with(&[&rusqlite::types::Null]);
        let db = PuzzleDatabase::open(&path).unwrap();
        assert!(matches!(db.ratings(None, &ProgressBar::hidden()), Err(Error::Value { row: 0, .. })));
    }

    #[test]
    fn test_missing_file_is_connection_error(){
        let dir = tempfile::tempdir().unwrap();
        let result = PuzzleDatabase::open(dir.path().join("nope.db"));
        assert!(matches!(result, Err(Error::Connection { .. })));
    }

    #[test]
    fn test_garbage_file_is_connection_error(){
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.db");
        std::fs::write(&path, vec![b'x'; 4096]).unwrap();
        let result = PuzzleDatabase::open(&path).and_then(|db| db.ratings(None, &ProgressBar::hidden()));
        assert!(matches!(result, Err(Error::Connection { .. })));
    }

    #[test]
    fn test_missing_table_is_query_error(){
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.db");
        Connection::open(&path).unwrap().execute_batch("CREATE TABLE players (PlayerRating INTEGER);").unwrap();
        let db = PuzzleDatabase::open(&path).unwrap();
        assert!(matches!(db.ratings(None, &ProgressBar::hidden()), Err(Error::Query { .. })));
    }
}
