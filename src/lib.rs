//! Convert Avida `.dat` output files into CSV.
//!
//! A `.dat` file starts with a `#`-commented header whose trailing lines
//! number the columns (`#  1: Update`, `#  2: Merit`, ...), followed by a
//! blank line and space-delimited data rows.

pub mod batch;
pub mod convert;
pub mod error;
pub mod registry;

pub use batch::{convert_directory, BatchOptions, BatchReport};
pub use convert::{convert_file, convert_path, ConvertSummary};
pub use error::{ConvertError, ErrorKind};
pub use registry::{FileType, FileTypeRegistry};
