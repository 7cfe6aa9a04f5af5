mod cursor;
mod error;
mod header;
mod reader;
mod row;
mod scan;
mod tokenizer;

pub use error::Error;
pub use reader::{Reader, Rows};
pub use row::Row;

/// The delimiter/quote/escape triple governing field parsing.
/// Single-byte each; set once at construction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote: u8,
    pub escape: u8,
}

impl Dialect {
    pub fn new(delimiter: u8, quote: u8, escape: u8) -> Dialect {
        Dialect {
            delimiter,
            quote,
            escape,
        }
    }
}

impl Default for Dialect {
    fn default() -> Dialect {
        Dialect::new(b',', b'"', b'\\')
    }
}

/// Where the header row lives, if anywhere.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HeaderSpec {
    /// No header; rows are positional.
    None,
    /// Zero-based row index of the header. Rows above it are skipped
    /// without parsing; data rows start right below it.
    Row(u64),
}

impl Default for HeaderSpec {
    fn default() -> HeaderSpec {
        HeaderSpec::Row(0)
    }
}
