use crate::convert::header::Header;
use crate::error::ConvertError;
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path};

/// What a known `.dat` file is expected to look like.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileType {
    /// First header line, comment markers stripped (e.g. `Avida time data`).
    pub description: String,
    /// Number of declared columns.
    pub columns: usize,
}

/// Explicit mapping from file name (e.g. `time.dat`) to its [`FileType`].
///
/// Loaded from YAML:
///
/// ```yaml
/// time.dat:
///   description: Avida time data
///   columns: 4
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FileTypeRegistry {
    types: BTreeMap<String, FileType>,
}

impl FileTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file_name: impl Into<String>, file_type: FileType) {
        self.types.insert(file_name.into(), file_type);
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text).map_err(|e| ConvertError::Registry {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Look up the expected type for `file_name`; unknown names are rejected.
    pub fn lookup(&self, file_name: &str) -> Result<&FileType, ConvertError> {
        self.types
            .get(file_name)
            .ok_or_else(|| ConvertError::UnsupportedInput {
                file_name: file_name.to_string(),
            })
    }
}

impl FileType {
    /// Check a parsed header against this type.
    pub fn check(&self, file_name: &str, header: &Header) -> Result<(), ConvertError> {
        if header.description() != self.description {
            return Err(ConvertError::DescriptionMismatch {
                file_name: file_name.to_string(),
                expected: self.description.clone(),
                found: header.description().to_string(),
            });
        }
        if header.columns.len() != self.columns {
            return Err(ConvertError::ColumnCountMismatch {
                file_name: file_name.to_string(),
                expected: self.columns,
                found: header.columns.len(),
            });
        }
        Ok(())
    }
}
