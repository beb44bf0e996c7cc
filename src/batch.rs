// src/batch.rs
use crate::convert::{convert_path, ConvertSummary};
use crate::error::ConvertError;
use crate::registry::FileTypeRegistry;
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{debug, error, info, instrument, warn};
use walkdir::WalkDir;

pub const SOURCE_SUFFIX: &str = ".dat";
pub const TARGET_SUFFIX: &str = ".csv";

/// Settings for one directory run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub source_suffix: String,
    pub target_suffix: String,
    /// Remove each source once its output has been written.
    pub delete_after_conversion: bool,
    /// Stop at the first failed file instead of moving on.
    pub fail_fast: bool,
    pub registry: Option<FileTypeRegistry>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            source_suffix: SOURCE_SUFFIX.to_string(),
            target_suffix: TARGET_SUFFIX.to_string(),
            delete_after_conversion: false,
            fail_fast: false,
            registry: None,
        }
    }
}

#[derive(Debug)]
pub struct Converted {
    pub source: PathBuf,
    pub output: PathBuf,
    pub summary: ConvertSummary,
    pub source_deleted: bool,
}

#[derive(Debug)]
pub struct FileFailure {
    pub source: PathBuf,
    pub error: ConvertError,
}

/// Outcome of [`convert_directory`].
#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<Converted>,
    pub failures: Vec<FileFailure>,
    /// Files discovered but never tried because `fail_fast` stopped the run.
    pub not_attempted: usize,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.not_attempted == 0
    }
}

/// `path` with the trailing `from` suffix of its file name swapped for `to`.
pub fn output_path(path: &Path, from: &str, to: &str) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(from)?;
    Some(path.with_file_name(format!("{}{}", stem, to)))
}

/// Every file under `root` whose name ends in `suffix`, depth-first with
/// entries of each directory in file-name order.
pub fn find_targets(root: &Path, suffix: &str) -> Result<Vec<PathBuf>, ConvertError> {
    let mut targets = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(suffix));
        if matches {
            targets.push(entry.into_path());
        }
    }
    Ok(targets)
}

/// Convert every matching file under `root`.
///
/// Per-file failures are recorded in the report (and stop the run when
/// `fail_fast` is set); a failed file keeps its source and gets no output.
/// Discovery errors and a target suffix equal to the source suffix are
/// returned as `Err` before anything is written.
#[instrument(level = "info", skip(root, options), fields(root = %root.display()))]
pub fn convert_directory(
    root: &Path,
    options: &BatchOptions,
) -> Result<BatchReport, ConvertError> {
    if options.source_suffix == options.target_suffix {
        return Err(ConvertError::SameSuffix {
            suffix: options.source_suffix.clone(),
        });
    }

    let start = Instant::now();
    let targets = find_targets(root, &options.source_suffix)?;
    info!("{} {} files found", targets.len(), options.source_suffix);
    let sources: HashSet<&Path> = targets.iter().map(PathBuf::as_path).collect();

    let mut report = BatchReport::default();
    for (idx, source) in targets.iter().enumerate() {
        match convert_one(source, &sources, options) {
            Ok(done) => report.converted.push(done),
            Err(err) => {
                error!(source = %source.display(), "conversion failed: {}", err);
                report.failures.push(FileFailure {
                    source: source.clone(),
                    error: err,
                });
                if options.fail_fast {
                    report.not_attempted = targets.len() - idx - 1;
                    warn!(remaining = report.not_attempted, "stopping at first failure");
                    break;
                }
            }
        }
    }

    info!(
        converted = report.converted.len(),
        failed = report.failures.len(),
        elapsed = ?start.elapsed(),
        "batch complete"
    );
    Ok(report)
}

fn convert_one(
    source: &Path,
    sources: &HashSet<&Path>,
    options: &BatchOptions,
) -> Result<Converted, ConvertError> {
    let output = output_path(source, &options.source_suffix, &options.target_suffix)
        .ok_or_else(|| ConvertError::UnsupportedInput {
            file_name: source.display().to_string(),
        })?;
    // never write over a file this run still has to read
    if sources.contains(output.as_path()) {
        return Err(ConvertError::OutputCollision { path: output });
    }

    let summary = convert_path(source, &output, options.registry.as_ref())?;

    let source_deleted = if options.delete_after_conversion {
        fs::remove_file(source)?;
        debug!(source = %source.display(), "deleted source");
        true
    } else {
        false
    };

    Ok(Converted {
        source: source.to_path_buf(),
        output,
        summary,
        source_deleted,
    })
}
