use crate::convert::sanitize::sanitize;
use crate::error::ConvertError;
use std::io::BufRead;
use tracing::{debug, instrument};

/// One declared column: 1-based position and sanitized name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub position: usize,
    pub name: String,
}

/// The comment block at the top of a `.dat` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Raw header lines, line terminators removed, comment markers intact.
    pub lines: Vec<String>,
    /// Column descriptors, numbered 1..=N in order.
    pub columns: Vec<Column>,
}

impl Header {
    /// First header line without comment markers, e.g. `Avida time data`.
    pub fn description(&self) -> &str {
        self.lines.first().map(|l| strip_comment(l)).unwrap_or("")
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// Drop leading `#` markers and surrounding whitespace.
pub fn strip_comment(line: &str) -> &str {
    line.trim_start_matches('#').trim()
}

/// Split `"<n>:<text>"` on the first colon and parse `n`.
fn split_numbered(line: &str) -> Result<(usize, &str), ConvertError> {
    let stripped = strip_comment(line);
    let (num, text) = stripped
        .split_once(':')
        .ok_or_else(|| malformed(line))?;
    let n = num.trim().parse::<usize>().map_err(|_| malformed(line))?;
    Ok((n, text.trim()))
}

fn malformed(line: &str) -> ConvertError {
    ConvertError::MalformedLine {
        line: line.to_string(),
    }
}

/// Read header lines up to (and consuming) the first blank line, then
/// recover and validate the column descriptors at its end.
///
/// The last header line reads `"<count>:<name>"`; it and the `count - 1`
/// lines before it must be numbered `1..=count`.
#[instrument(level = "debug", skip(reader))]
pub fn parse_header<R: BufRead>(reader: &mut R) -> Result<Header, ConvertError> {
    let mut lines = Vec::new();
    let mut buf = String::new();

    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            return Err(ConvertError::TruncatedHeader {
                lines_read: lines.len(),
            });
        }
        if buf.trim().is_empty() {
            break;
        }
        lines.push(buf.trim_end_matches(['\n', '\r']).to_string());
    }

    let last = lines.last().ok_or(ConvertError::EmptyHeader)?;
    let (declared, _) = split_numbered(last)?;
    if declared == 0 {
        return Err(malformed(last));
    }
    if declared > lines.len() {
        return Err(ConvertError::ColumnCountExceedsHeader {
            declared,
            available: lines.len(),
        });
    }

    let candidates = &lines[lines.len() - declared..];
    let mut columns = Vec::with_capacity(declared);
    for (idx, line) in candidates.iter().enumerate() {
        let expected = idx + 1;
        let (found, name) = split_numbered(line)?;
        if found != expected {
            return Err(ConvertError::ColumnNumbering {
                expected,
                found,
                line: line.clone(),
            });
        }
        columns.push(Column {
            position: found,
            name: sanitize(name),
        });
    }

    debug!(
        header_lines = lines.len(),
        columns = columns.len(),
        "parsed header"
    );
    Ok(Header { lines, columns })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use anyhow::Result;
    use std::io::{BufRead, Cursor};

    const TIME_DAT: &str = "# Avida time data
# Sun Oct 19 10:12:04 2026
#  1: update
#  2: average generation
#  3: num_executed?
#  4: Avg. Merit

100 1.5 3 0.25
";

    #[test]
    fn test_parses_avida_header() -> Result<()> {
        let mut rdr = Cursor::new(TIME_DAT);
        let header = parse_header(&mut rdr)?;

        assert_eq!(header.lines.len(), 6);
        assert_eq!(header.description(), "Avida time data");
        assert_eq!(
            header.column_names(),
            vec!["update", "average_generation", "num_executed_", "Avg__Merit"]
        );
        let positions: Vec<usize> = header.columns.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);

        // blank separator consumed, data left for the transcoder
        let mut rest = String::new();
        rdr.read_line(&mut rest)?;
        assert_eq!(rest, "100 1.5 3 0.25\n");
        Ok(())
    }

    #[test]
    fn test_count_line_is_last_descriptor() -> Result<()> {
        let input = "1:Update\n2:Merit\n3:Fitness\n\n";
        let header = parse_header(&mut Cursor::new(input))?;
        assert_eq!(header.column_names(), vec!["Update", "Merit", "Fitness"]);
        Ok(())
    }

    #[test]
    fn test_only_trailing_block_becomes_columns() -> Result<()> {
        // earlier numbered lines outside the declared block are ignored
        let input = "#1:old\n#2:older\n#1:A\n#2:B\n#3:C\n\n1 2 3\n";
        let header = parse_header(&mut Cursor::new(input))?;
        assert_eq!(header.column_names(), vec!["A", "B", "C"]);
        assert_eq!(header.lines.len(), 5);
        Ok(())
    }

    #[test]
    fn test_whitespace_only_line_ends_header() -> Result<()> {
        let input = "#1:a\r\n#2:b\r\n   \t\r\n1 2\r\n";
        let header = parse_header(&mut Cursor::new(input))?;
        assert_eq!(header.lines, vec!["#1:a", "#2:b"]);
        Ok(())
    }

    #[test]
    fn test_misnumbered_descriptor() {
        let input = "1:Update\n3:Foo\n3:Fitness\n\n";
        let err = parse_header(&mut Cursor::new(input)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HeaderMalformed);
        match err {
            ConvertError::ColumnNumbering {
                expected, found, ..
            } => {
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_colon_names_the_line() {
        let input = "# description\n1:a\n2 b\n3:c\n\n";
        let err = parse_header(&mut Cursor::new(input)).unwrap_err();
        match err {
            ConvertError::MalformedLine { line } => assert_eq!(line, "2 b"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_last_line_without_count() {
        let input = "# Avida time data\n# a timestamp\n\n";
        let err = parse_header(&mut Cursor::new(input)).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedLine { ref line } if line == "# a timestamp"));
    }

    #[test]
    fn test_zero_count_is_malformed() {
        let err = parse_header(&mut Cursor::new("0:nothing\n\n")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HeaderMalformed);
    }

    #[test]
    fn test_declared_count_exceeds_header() {
        let input = "1:a\n5:e\n\n";
        let err = parse_header(&mut Cursor::new(input)).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::ColumnCountExceedsHeader {
                declared: 5,
                available: 2
            }
        ));
    }

    #[test]
    fn test_truncated_header() {
        let input = "# Avida time data\n1:a\n2:b";
        let err = parse_header(&mut Cursor::new(input)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedHeader);
        assert!(matches!(err, ConvertError::TruncatedHeader { lines_read: 3 }));
    }

    #[test]
    fn test_empty_stream_is_truncated() {
        let err = parse_header(&mut Cursor::new("")).unwrap_err();
        assert!(matches!(err, ConvertError::TruncatedHeader { lines_read: 0 }));
    }

    #[test]
    fn test_leading_blank_line_is_empty_header() {
        let err = parse_header(&mut Cursor::new("\n1:a\n\n")).unwrap_err();
        assert!(matches!(err, ConvertError::EmptyHeader));
    }
}
