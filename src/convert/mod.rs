// src/convert/mod.rs
pub mod header;
pub mod output;
pub mod sanitize;
pub mod transcode;

use crate::error::ConvertError;
use crate::registry::{FileType, FileTypeRegistry};
use header::parse_header;
use output::AtomicOutput;
use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
};
use tracing::{info, instrument};
use transcode::{csv_writer, transcode};

/// What one conversion produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    /// First header line, comment markers stripped.
    pub description: String,
    pub columns: Vec<String>,
    pub rows: u64,
}

/// Convert one `.dat` stream into CSV.
///
/// Both streams are owned by the call and dropped on every exit path,
/// including header errors, which are returned unchanged.
pub fn convert_file<R: BufRead, W: Write>(
    reader: R,
    writer: W,
) -> Result<ConvertSummary, ConvertError> {
    convert_file_checked(reader, writer, None)
}

/// Like [`convert_file`], additionally checking the header against `expected`.
pub fn convert_file_checked<R: BufRead, W: Write>(
    mut reader: R,
    writer: W,
    expected: Option<(&str, &FileType)>,
) -> Result<ConvertSummary, ConvertError> {
    let header = parse_header(&mut reader)?;
    if let Some((file_name, file_type)) = expected {
        file_type.check(file_name, &header)?;
    }

    let columns = header.column_names();
    let mut out = csv_writer(writer);
    let rows = transcode(&mut reader, &mut out, &columns)?;

    Ok(ConvertSummary {
        description: header.description().to_string(),
        columns,
        rows,
    })
}

/// Convert the file at `input` into `output`.
///
/// The output only appears once the whole file converted; on error any
/// previous file at `output` is left as it was. With a registry, the input's
/// file name must be a known type. `input` and `output` must differ.
#[instrument(level = "info", skip(input, output, registry), fields(input = %input.display(), output = %output.display()))]
pub fn convert_path(
    input: &Path,
    output: &Path,
    registry: Option<&FileTypeRegistry>,
) -> Result<ConvertSummary, ConvertError> {
    if input == output {
        return Err(ConvertError::OutputCollision {
            path: output.to_path_buf(),
        });
    }

    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let expected = match registry {
        Some(reg) => Some(reg.lookup(&file_name)?),
        None => None,
    };

    let reader = BufReader::new(File::open(input)?);
    let mut out = AtomicOutput::create(output)?;
    let summary = convert_file_checked(
        reader,
        &mut out,
        expected.map(|t| (file_name.as_str(), t)),
    )?;
    let written: PathBuf = out.persist()?;

    info!(
        description = %summary.description,
        columns = summary.columns.len(),
        rows = summary.rows,
        output = %written.display(),
        "converted"
    );
    Ok(summary)
}
