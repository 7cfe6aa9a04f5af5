use std::io::{BufRead, Seek, SeekFrom};

use log::debug;

use crate::error::Error;
use crate::tokenizer::{Parsed, Skipped, Tokenizer};

/// Reconciles arbitrary requested row indices against a stream that only
/// moves forwards.
///
/// The only stored state is the content offset and a count of rows the
/// stream has consumed, so space stays constant no matter how large the
/// file is; backward seeks pay for that with a rewind to the content offset
/// followed by a skip-only fast-forward.
pub(crate) struct Cursor {
    content_offset: u64,
    physical: u64,
}

impl Cursor {
    pub fn new(content_offset: u64) -> Cursor {
        Cursor {
            content_offset,
            physical: 0,
        }
    }

    /// Rows consumed from the stream so far.
    pub fn physical(&self) -> u64 {
        self.physical
    }

    /// Repositions the stream at the first data row.
    pub fn rewind<S: Seek>(&mut self, stream: &mut S) -> Result<(), Error> {
        stream.seek(SeekFrom::Start(self.content_offset))?;
        self.physical = 0;
        Ok(())
    }

    /// Makes row `index` the next record on the stream and parses it.
    ///
    /// Rewinds at most once, only when the stream has already passed the
    /// target; everything else is a forward skip that never parses fields.
    /// On success the physical cursor lands on `index + 1` and `row_count`
    /// grows monotonically to cover the row. At end-of-stream the row is
    /// reported absent, or out of range when `index` is past the known count.
    pub fn read_at<S: BufRead + Seek>(
        &mut self,
        stream: &mut S,
        tokenizer: &mut Tokenizer,
        index: u64,
        max_bytes: usize,
        row_count: &mut u64,
    ) -> Result<Option<Vec<String>>, Error> {
        if self.physical > index {
            debug!(
                "physical cursor at {} is past row {}, rewinding",
                self.physical, index
            );
            self.rewind(stream)?;
            tokenizer.reset();
        }

        while self.physical < index {
            match tokenizer.skip_one(stream)? {
                Skipped::Line => self.physical += 1,
                Skipped::Eof => return self.absent(index, *row_count),
            }
        }

        match tokenizer.parse_one(stream, max_bytes)? {
            Parsed::Fields(fields) => {
                self.advance_past(index, row_count);
                Ok(Some(fields))
            }
            Parsed::Blank => {
                self.advance_past(index, row_count);
                Ok(Some(Vec::new()))
            }
            Parsed::Eof => self.absent(index, *row_count),
        }
    }

    fn advance_past(&mut self, index: u64, row_count: &mut u64) {
        self.physical = index + 1;
        // The scan may have undercounted if the file grew afterwards;
        // the count never shrinks.
        if index + 1 > *row_count {
            *row_count = index + 1;
        }
    }

    fn absent(&self, index: u64, row_count: u64) -> Result<Option<Vec<String>>, Error> {
        if index >= row_count {
            Err(Error::OutOfRange {
                index,
                count: row_count,
            })
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dialect;
    use std::io::Cursor as MemStream;

    fn stream() -> MemStream<Vec<u8>> {
        MemStream::new(b"1,ann\n2,ben\n3,cat\n".to_vec())
    }

    #[test]
    fn forward_then_backward() {
        let mut stream = stream();
        let mut tokenizer = Tokenizer::new(Dialect::default());
        let mut cursor = Cursor::new(0);
        let mut count = 3;

        let row = cursor
            .read_at(&mut stream, &mut tokenizer, 2, 64, &mut count)
            .unwrap();
        assert_eq!(row.unwrap(), ["3", "cat"]);
        assert_eq!(cursor.physical(), 3);

        // Behind the physical cursor: rewind then fast-forward.
        let row = cursor
            .read_at(&mut stream, &mut tokenizer, 1, 64, &mut count)
            .unwrap();
        assert_eq!(row.unwrap(), ["2", "ben"]);
        assert_eq!(cursor.physical(), 2);
        assert_eq!(count, 3);
    }

    #[test]
    fn past_the_end_is_out_of_range() {
        let mut stream = stream();
        let mut tokenizer = Tokenizer::new(Dialect::default());
        let mut cursor = Cursor::new(0);
        let mut count = 3;

        let err = cursor
            .read_at(&mut stream, &mut tokenizer, 3, 64, &mut count)
            .unwrap_err();
        assert!(matches!(err, Error::OutOfRange { index: 3, count: 3 }));
    }

    #[test]
    fn undercounted_rows_grow_the_count() {
        let mut stream = stream();
        let mut tokenizer = Tokenizer::new(Dialect::default());
        let mut cursor = Cursor::new(0);
        let mut count = 1;

        let row = cursor
            .read_at(&mut stream, &mut tokenizer, 2, 64, &mut count)
            .unwrap();
        assert_eq!(row.unwrap(), ["3", "cat"]);
        assert_eq!(count, 3);
    }
}
