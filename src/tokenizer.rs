use std::io::{self, BufRead};
use std::mem;

use memchr::memchr;

use crate::Dialect;

#[derive(Debug, Eq, PartialEq)]
pub(crate) enum Parsed {
    Fields(Vec<String>),
    /// A physical line carrying nothing but its terminator.
    Blank,
    Eof,
}

#[derive(Debug, Eq, PartialEq)]
pub(crate) enum Skipped {
    Line,
    Eof,
}

/// Parses one physical line at a time on top of `csv_core::Reader`.
///
/// The underlying stream is consumed strictly forwards; repositioning is the
/// caller's business. One physical line always yields exactly one record.
pub(crate) struct Tokenizer {
    core: csv_core::Reader,
    line: Vec<u8>,
    output: Vec<u8>,
    ends: Vec<usize>,
}

impl Tokenizer {
    pub fn new(dialect: Dialect) -> Tokenizer {
        Tokenizer {
            core: csv_core::ReaderBuilder::new()
                .delimiter(dialect.delimiter)
                .quote(dialect.quote)
                .escape(Some(dialect.escape))
                .build(),
            line: Vec::new(),
            output: Vec::new(),
            ends: Vec::new(),
        }
    }

    /// Forgets any parser state; must be called whenever the stream is
    /// repositioned behind the tokenizer's back.
    pub fn reset(&mut self) {
        self.core.reset();
    }

    /// Reads one physical line from `stream` and parses it as one record.
    /// `max_bytes` pre-sizes the line buffer so the read happens in one pass.
    pub fn parse_one<R: BufRead>(&mut self, stream: &mut R, max_bytes: usize) -> io::Result<Parsed> {
        let mut line = mem::take(&mut self.line);
        line.clear();
        line.reserve(max_bytes);
        let bytes_read = stream.read_until(b'\n', &mut line)?;
        let parsed = if bytes_read == 0 {
            Parsed::Eof
        } else {
            self.parse_line(&line)
        };
        self.line = line;
        Ok(parsed)
    }

    /// Parses the raw bytes of one physical line into owned fields.
    pub fn parse_line(&mut self, line: &[u8]) -> Parsed {
        if matches!(line, b"" | b"\n" | b"\r\n" | b"\r") {
            return Parsed::Blank;
        }

        // Unescaped output never exceeds the raw line, but start from the raw
        // length and let csv-core ask for more if it disagrees.
        if self.output.len() < line.len() {
            self.output.resize(line.len(), 0);
        }
        // We don't know the exact count of the fields,
        // but let's approximate with each field having 8 bytes at average
        if self.ends.len() < line.len() / 8 + 1 {
            self.ends.resize(line.len() / 8 + 1, 0);
        }

        let mut input = line;
        let mut data_len = 0;
        let mut ends_len = 0;
        loop {
            let (result, bytes_in, bytes_out, ends_out) = self.core.read_record(
                input,
                &mut self.output[data_len..],
                &mut self.ends[ends_len..],
            );

            input = &input[bytes_in..];
            data_len += bytes_out;
            ends_len += ends_out;

            match result {
                // Adds capacity and tries again
                csv_core::ReadRecordResult::OutputFull => {
                    let grown = self.output.len() * 2;
                    self.output.resize(grown, 0);
                }
                csv_core::ReadRecordResult::OutputEndsFull => {
                    let grown = self.ends.len() * 2;
                    self.ends.resize(grown, 0);
                }
                // A line without a trailing terminator still holds a full
                // record; the CSV core reader finalizes it when an empty
                // slice is passed in.
                csv_core::ReadRecordResult::InputEmpty => input = &[],
                csv_core::ReadRecordResult::Record | csv_core::ReadRecordResult::End => break,
            }
        }

        let mut fields = Vec::with_capacity(ends_len);
        let mut field_start = 0;
        for &field_end in &self.ends[..ends_len] {
            let field = &self.output[field_start..field_end];
            fields.push(String::from_utf8_lossy(field).into_owned());
            field_start = field_end;
        }
        Parsed::Fields(fields)
    }

    /// Advances past one physical line without parsing any fields.
    pub fn skip_one<R: BufRead>(&mut self, stream: &mut R) -> io::Result<Skipped> {
        let mut consumed_any = false;
        loop {
            let (terminated, used) = {
                let buffered = stream.fill_buf()?;
                if buffered.is_empty() {
                    return Ok(if consumed_any { Skipped::Line } else { Skipped::Eof });
                }
                match memchr(b'\n', buffered) {
                    Some(at) => (true, at + 1),
                    None => (false, buffered.len()),
                }
            };
            stream.consume(used);
            consumed_any = true;
            if terminated {
                return Ok(Skipped::Line);
            }
        }
    }
}
