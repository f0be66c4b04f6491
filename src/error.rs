use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The database file is missing, unreadable or not an SQLite database.
    #[error("cannot open puzzle database {}: {source}", path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The statement was rejected, e.g. the puzzle table or its Rating column is missing.
    #[error("query `{sql}` failed: {source}")]
    Query {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Row numbers are zero-based positions in query order.
    #[error("row {row}: rating {value} is not an integer")]
    Value { row: usize, value: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
