use crate::error::ConvertError;
use csv::{Terminator, Writer, WriterBuilder};
use std::io::{BufRead, Write};
use tracing::trace;

/// CSV writer used for every output: `\n` terminated, minimal quoting,
/// rows may be shorter than the header.
pub fn csv_writer<W: Write>(out: W) -> Writer<W> {
    WriterBuilder::new()
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out)
}

/// Fields of one data line: split on single spaces (no collapsing) and cut
/// down to `width` fields.
pub fn split_row(line: &str, width: usize) -> Vec<&str> {
    line.split(' ').take(width).collect()
}

/// Write the header row, then re-delimit every remaining line of `reader`.
///
/// An empty line is a row holding one empty field, except for the empty
/// lines at the very end of the input, which are dropped.
/// Returns the number of data rows written.
pub fn transcode<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut Writer<W>,
    column_names: &[String],
) -> Result<u64, ConvertError> {
    writer.write_record(column_names)?;

    let width = column_names.len();
    let mut rows = 0u64;
    // empty lines seen but not yet written; only kept if more data follows
    let mut pending_empty = 0u64;
    let mut buf = String::new();
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        let line = buf.trim_end_matches(['\n', '\r']);
        if line.is_empty() {
            pending_empty += 1;
            continue;
        }
        for _ in 0..pending_empty {
            writer.write_record([""])?;
            rows += 1;
        }
        pending_empty = 0;

        let fields = split_row(line, width);
        trace!(row = rows, fields = fields.len(), "row");
        writer.write_record(&fields)?;
        rows += 1;
    }

    writer.flush()?;
    Ok(rows)
}
