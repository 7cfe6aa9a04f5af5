use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// A seek asked for a row past the end of the file.
    /// Recoverable; the reader keeps its previous position.
    #[error("row {index} is out of range (row count {count})")]
    OutOfRange { index: u64, count: u64 },
}
