use std::{io, path::PathBuf};
use thiserror::Error;

/// Broad classification of a [`ConvertError`], as reported to the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TruncatedHeader,
    HeaderMalformed,
    UnsupportedInput,
    Io,
}

/// Everything that can go wrong while converting a `.dat` file.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Header content ───────────────────────────────────────────────────────
    #[error("header ended after {lines_read} lines without a terminating blank line")]
    TruncatedHeader { lines_read: usize },

    #[error("header is empty: the first line is blank")]
    EmptyHeader,

    #[error("malformed header line (expected `<n>:<name>`): {line:?}")]
    MalformedLine { line: String },

    #[error("column numbering out of order: expected {expected}, got {found} in {line:?}")]
    ColumnNumbering {
        expected: usize,
        found: usize,
        line: String,
    },

    #[error("header declares {declared} columns but only has {available} lines")]
    ColumnCountExceedsHeader { declared: usize, available: usize },

    #[error("{file_name}: expected description {expected:?}, found {found:?}")]
    DescriptionMismatch {
        file_name: String,
        expected: String,
        found: String,
    },

    #[error("{file_name}: expected {expected} columns, header declares {found}")]
    ColumnCountMismatch {
        file_name: String,
        expected: usize,
        found: usize,
    },

    // ── Caller input ─────────────────────────────────────────────────────────
    #[error("unsupported input file type: {file_name}")]
    UnsupportedInput { file_name: String },

    #[error("output {path} would overwrite an input file")]
    OutputCollision { path: PathBuf },

    #[error("source and target suffix are both {suffix:?}")]
    SameSuffix { suffix: String },

    #[error("invalid file type registry {path}: {message}")]
    Registry { path: PathBuf, message: String },

    // ── Filesystem ───────────────────────────────────────────────────────────
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::TruncatedHeader { .. } => ErrorKind::TruncatedHeader,
            ConvertError::EmptyHeader
            | ConvertError::MalformedLine { .. }
            | ConvertError::ColumnNumbering { .. }
            | ConvertError::ColumnCountExceedsHeader { .. }
            | ConvertError::DescriptionMismatch { .. }
            | ConvertError::ColumnCountMismatch { .. } => ErrorKind::HeaderMalformed,
            ConvertError::UnsupportedInput { .. }
            | ConvertError::OutputCollision { .. }
            | ConvertError::SameSuffix { .. }
            | ConvertError::Registry { .. } => ErrorKind::UnsupportedInput,
            ConvertError::Io(_) => ErrorKind::Io,
        }
    }

    /// True when the caller supplied something unusable (unknown file type,
    /// bad path, bad registry) rather than the file content being wrong.
    pub fn is_caller_input(&self) -> bool {
        match self {
            ConvertError::UnsupportedInput { .. }
            | ConvertError::OutputCollision { .. }
            | ConvertError::SameSuffix { .. }
            | ConvertError::Registry { .. } => true,
            ConvertError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
            ),
            _ => false,
        }
    }
}

impl From<csv::Error> for ConvertError {
    fn from(err: csv::Error) -> Self {
        match err.into_kind() {
            csv::ErrorKind::Io(e) => ConvertError::Io(e),
            other => ConvertError::Io(io::Error::other(format!("csv writer: {:?}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_separate_content_from_caller_problems() {
        let header = ConvertError::ColumnNumbering {
            expected: 2,
            found: 3,
            line: "3:Foo".into(),
        };
        assert_eq!(header.kind(), ErrorKind::HeaderMalformed);
        assert!(!header.is_caller_input());

        let unsupported = ConvertError::UnsupportedInput {
            file_name: "mystery.dat".into(),
        };
        assert_eq!(unsupported.kind(), ErrorKind::UnsupportedInput);
        assert!(unsupported.is_caller_input());

        let missing = ConvertError::from(io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(missing.kind(), ErrorKind::Io);
        assert!(missing.is_caller_input());

        assert_eq!(
            ConvertError::TruncatedHeader { lines_read: 4 }.kind(),
            ErrorKind::TruncatedHeader
        );
    }

    #[test]
    fn test_numbering_message_names_expected_and_found() {
        let err = ConvertError::ColumnNumbering {
            expected: 2,
            found: 3,
            line: "3:Foo".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("expected 2"), "{msg}");
        assert!(msg.contains("got 3"), "{msg}");
        assert!(msg.contains("3:Foo"), "{msg}");
    }
}
