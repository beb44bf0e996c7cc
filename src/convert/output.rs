//! Output file that only appears at its final path once fully written.
//!
//! Data goes to a temporary file beside the destination; `persist` renames it
//! into place. Dropping an `AtomicOutput` without persisting deletes the
//! temporary file, so a failed conversion leaves nothing behind.

use crate::error::ConvertError;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub struct AtomicOutput {
    writer: BufWriter<NamedTempFile>,
    final_path: PathBuf,
}

impl AtomicOutput {
    pub fn create(final_path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let final_path = final_path.as_ref().to_path_buf();
        let parent = match final_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let temp = NamedTempFile::new_in(&parent)?;
        Ok(Self {
            writer: BufWriter::new(temp),
            final_path,
        })
    }

    /// Flush and move the temporary file over `final_path`.
    pub fn persist(self) -> Result<PathBuf, ConvertError> {
        let temp = self.writer.into_inner().map_err(|e| e.into_error())?;
        temp.persist(&self.final_path).map_err(|e| e.error)?;
        Ok(self.final_path)
    }
}

impl Write for AtomicOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
