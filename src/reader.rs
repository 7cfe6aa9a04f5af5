use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use log::debug;

use crate::cursor::Cursor;
use crate::error::Error;
use crate::header;
use crate::row::{self, Row};
use crate::scan;
use crate::tokenizer::Tokenizer;
use crate::{Dialect, HeaderSpec};

/// Random-access reader over one delimited-text source.
///
/// Construction scans the source once to capture the header, count the data
/// rows and size the line buffer; afterwards any row is reachable through
/// `seek` and the `rewind`/`valid`/`current`/`next`/`key` cycle, in constant
/// space. The source handle is owned by the reader and released on drop.
///
/// A reader is single-threaded state; all navigation takes `&mut self`.
/// Independent readers over the same file don't affect each other.
pub struct Reader<R> {
    stream: BufReader<R>,
    tokenizer: Tokenizer,
    headers: Vec<String>,
    cursor: Cursor,
    row_count: u64,
    max_line_len: usize,
    logical: u64,
    // Memoized row for `logical`; only trusted while the physical cursor
    // sits exactly one row past it. The inner Option is the absent/end
    // sentinel.
    cache: Option<Option<Row>>,
}

impl Reader<File> {
    /// Opens `path` with the default dialect and a header on row 0.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Reader<File>, Error> {
        Reader::open_with(path, Dialect::default(), HeaderSpec::default())
    }

    pub fn open_with<P: AsRef<Path>>(
        path: P,
        dialect: Dialect,
        header: HeaderSpec,
    ) -> Result<Reader<File>, Error> {
        Reader::from_reader(File::open(path)?, dialect, header)
    }
}

impl<R: Read + Seek> Reader<R> {
    /// Builds a reader over any seekable byte source.
    ///
    /// Runs the one-time scan and leaves the stream at the first data row.
    /// A scan failure aborts construction; the source is dropped with it.
    pub fn from_reader(source: R, dialect: Dialect, header: HeaderSpec) -> Result<Reader<R>, Error> {
        let mut stream = BufReader::new(source);
        let mut tokenizer = Tokenizer::new(dialect);
        let scan = scan::scan(&mut stream, &mut tokenizer, header)?;
        tokenizer.reset();
        let headers = header::dedup(scan.raw_header);
        if !headers.is_empty() {
            debug!("resolved {} header keys", headers.len());
        }
        Ok(Reader {
            cursor: Cursor::new(scan.content_offset),
            row_count: scan.row_count,
            max_line_len: scan.max_line_len,
            stream,
            tokenizer,
            headers,
            logical: 0,
            cache: None,
        })
    }

    /// Deduplicated header keys; empty for headerless sources.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows below the header. May grow if a later read finds
    /// rows past the scanned count; it never shrinks.
    pub fn count(&self) -> u64 {
        self.row_count
    }

    /// The row index the reader is currently positioned at.
    pub fn key(&self) -> u64 {
        self.logical
    }

    /// Moves back to the first data row and forgets the cached row.
    pub fn rewind(&mut self) -> Result<(), Error> {
        self.cursor.rewind(&mut self.stream)?;
        self.tokenizer.reset();
        self.logical = 0;
        self.cache = None;
        Ok(())
    }

    /// Positions the reader on row `index` and materializes it.
    ///
    /// Fails with [`Error::OutOfRange`] when the row doesn't exist; the
    /// previous position and cached row then remain in effect.
    pub fn seek(&mut self, index: u64) -> Result<(), Error> {
        let fetched = self.cursor.read_at(
            &mut self.stream,
            &mut self.tokenizer,
            index,
            self.max_line_len,
            &mut self.row_count,
        )?;
        self.logical = index;
        self.cache = Some(fetched.map(|fields| row::materialize(fields, &self.headers)));
        Ok(())
    }

    /// Advances the logical position by one. Touches no I/O; the row is
    /// materialized lazily by `current` or `valid`.
    pub fn next(&mut self) {
        self.logical += 1;
        self.cache = None;
    }

    /// The row at the current position, or `None` past the end of data.
    ///
    /// Materializes lazily and memoizes: repeated calls without an
    /// intervening `next`/`seek` neither re-read nor advance the stream.
    /// Running off the end here is not an error, unlike an explicit `seek`.
    pub fn current(&mut self) -> Result<Option<&Row>, Error> {
        if self.cursor.physical() != self.logical + 1 {
            self.cache = None;
        }
        if self.cache.is_none() {
            let fetched = match self.cursor.read_at(
                &mut self.stream,
                &mut self.tokenizer,
                self.logical,
                self.max_line_len,
                &mut self.row_count,
            ) {
                Ok(Some(fields)) => Some(row::materialize(fields, &self.headers)),
                Ok(None) | Err(Error::OutOfRange { .. }) => None,
                Err(err) => return Err(err),
            };
            self.cache = Some(fetched);
        }
        Ok(self.cache.as_ref().and_then(|cached| cached.as_ref()))
    }

    /// Whether the current position holds a row. Blank rows are valid;
    /// `false` is the ordinary iteration-termination signal.
    pub fn valid(&mut self) -> Result<bool, Error> {
        Ok(self.current()?.is_some())
    }

    /// Iterates rows from the current position onwards.
    pub fn rows(&mut self) -> Rows<'_, R> {
        Rows { reader: self }
    }
}

pub struct Rows<'r, R> {
    reader: &'r mut Reader<R>,
}

impl<'r, R: Read + Seek> Iterator for Rows<'r, R> {
    type Item = Result<Row, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match self.reader.current() {
            Ok(Some(row)) => row.clone(),
            Ok(None) => return None,
            Err(err) => return Some(Err(err)),
        };
        self.reader.next();
        Some(Ok(row))
    }
}
