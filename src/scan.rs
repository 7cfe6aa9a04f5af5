use std::io::{self, BufRead, Seek, SeekFrom};

use log::debug;

use crate::tokenizer::{Parsed, Tokenizer};
use crate::HeaderSpec;

/// Slack added to the longest observed line so a buffer sized from it still
/// fits the same line under `\n` vs `\r\n` terminator variance.
const TERMINATOR_MARGIN: usize = 2;

pub(crate) struct Scan {
    /// Raw header fields, duplicates and all. Empty when no header row.
    pub raw_header: Vec<String>,
    pub row_count: u64,
    pub max_line_len: usize,
    pub content_offset: u64,
}

/// One-time forward pass over the whole file.
///
/// Lines above the header row are discarded without parsing; the header row
/// itself goes through the tokenizer; every line below it counts as a data
/// row and contributes to the maximum line length. Leaves the stream
/// positioned at the content offset.
pub(crate) fn scan<R: BufRead + Seek>(
    stream: &mut R,
    tokenizer: &mut Tokenizer,
    header: HeaderSpec,
) -> io::Result<Scan> {
    let header_row = match header {
        HeaderSpec::Row(index) => Some(index),
        HeaderSpec::None => None,
    };

    let mut raw_header = Vec::new();
    let mut header_seen = false;
    let mut row_count = 0u64;
    let mut max_line_len = 0usize;
    let mut content_offset = 0u64;
    let mut line = Vec::new();
    let mut index = 0u64;

    loop {
        line.clear();
        if stream.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        match header_row {
            Some(at) if index < at => {} // preamble, discarded unparsed
            Some(at) if index == at => {
                if let Parsed::Fields(fields) = tokenizer.parse_line(&line) {
                    raw_header = fields;
                }
                header_seen = true;
                content_offset = stream.stream_position()?;
            }
            _ => {
                row_count += 1;
                max_line_len = max_line_len.max(line.len());
            }
        }
        index += 1;
    }

    // A header row past the last line leaves no data region at all.
    if header_row.is_some() && !header_seen {
        content_offset = stream.stream_position()?;
    }
    stream.seek(SeekFrom::Start(content_offset))?;

    debug!(
        "scanned {} data rows, longest line {} bytes, content offset {}",
        row_count, max_line_len, content_offset
    );
    Ok(Scan {
        raw_header,
        row_count,
        max_line_len: max_line_len + TERMINATOR_MARGIN,
        content_offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dialect;
    use std::io::Cursor;

    fn scan_str(contents: &str, header: HeaderSpec) -> Scan {
        let mut stream = Cursor::new(contents.as_bytes().to_vec());
        let mut tokenizer = Tokenizer::new(Dialect::default());
        scan(&mut stream, &mut tokenizer, header).unwrap()
    }

    #[test]
    fn counts_rows_below_header() {
        let scan = scan_str("id,name\n1,ann\n2,ben\n", HeaderSpec::Row(0));
        assert_eq!(scan.raw_header, ["id", "name"]);
        assert_eq!(scan.row_count, 2);
        assert_eq!(scan.content_offset, 8);
        assert_eq!(scan.max_line_len, 6 + TERMINATOR_MARGIN);
    }

    #[test]
    fn no_header_counts_every_line() {
        let scan = scan_str("1,ann\n2,ben\n", HeaderSpec::None);
        assert!(scan.raw_header.is_empty());
        assert_eq!(scan.row_count, 2);
        assert_eq!(scan.content_offset, 0);
    }

    #[test]
    fn preamble_above_header_is_not_counted() {
        let scan = scan_str("junk\nmore junk\nid\n1\n", HeaderSpec::Row(2));
        assert_eq!(scan.raw_header, ["id"]);
        assert_eq!(scan.row_count, 1);
    }

    #[test]
    fn header_row_past_eof_leaves_no_data() {
        let scan = scan_str("only\n", HeaderSpec::Row(5));
        assert!(scan.raw_header.is_empty());
        assert_eq!(scan.row_count, 0);
        assert_eq!(scan.content_offset, 5);
    }

    #[test]
    fn empty_file() {
        let scan = scan_str("", HeaderSpec::Row(0));
        assert!(scan.raw_header.is_empty());
        assert_eq!(scan.row_count, 0);
        assert_eq!(scan.content_offset, 0);
    }
}
